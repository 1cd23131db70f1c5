// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # EdgeFirst Edge Detection Bridge
//!
//! Per-frame edge detection and grey conversion applied directly to
//! host-owned RGBA_8888 bitmaps, without copying frames in or out.
//!
//! ## Features
//!
//! - **Scoped host access**: bitmaps are locked through a [`BitmapHost`] and
//!   wrapped in an [`AccessGrant`] that unlocks on drop, on success, on error
//!   and on panic.
//! - **Strided views**: [`PixelBuffer`] and [`PixelBufferMut`] honour the
//!   host row stride and never touch row padding.
//! - **Operators**: Canny edge detection with configurable hysteresis
//!   thresholds (default 50/150) and BT.601 grey conversion, selected per
//!   call with [`Operator`].
//! - **Android**: JNI exports for `NativeProcessor.processFrame` and
//!   `NativeProcessor.convertToGrayscale` backed by `libjnigraphics`.
//!
//! ## Example
//!
//! ```
//! use edgefirst_edges::{convert_to_grayscale, process_frame, MemoryBitmap, MemoryHost};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = MemoryHost::new();
//! let input = MemoryBitmap::from_fn(64, 48, 0, |x, _| {
//!     if x < 32 { [20, 20, 20, 255] } else { [220, 220, 220, 255] }
//! });
//! let output = MemoryBitmap::new(64, 48);
//!
//! let stats = process_frame(&host, &input, &output)?;
//! assert_eq!((stats.width, stats.height), (64, 48));
//!
//! convert_to_grayscale(&host, &input, &output)?;
//! assert_eq!(host.outstanding(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Safety
//!
//! Raw host memory is only turned into slices inside [`host`], under the
//! contract of the `unsafe` [`BitmapHost`] trait. Everything downstream works
//! on borrowed slices.

pub mod bridge;
pub mod buffer;
pub mod error;
pub mod format;
pub mod host;
pub mod jni;
pub mod luma;
pub mod operator;
pub mod transform;

pub use bridge::{convert_to_grayscale, process_frame, run, FrameStats};
pub use buffer::{PixelBuffer, PixelBufferMut};
pub use error::FrameError;
pub use format::{BitmapInfo, PixelFormat};
pub use host::{acquire, release, AccessGrant, BitmapHost, MemoryBitmap, MemoryHost};
pub use operator::{Operator, Thresholds};
pub use transform::process;
