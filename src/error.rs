// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::format::PixelFormat;
use thiserror::Error;

/// Failures reported by the frame bridge.
///
/// Every variant is raised before any destination pixel is written, so a
/// failed call leaves the output bitmap untouched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    /// The bitmap is not 4-channel 8-bit.
    #[error("unsupported pixel format {0}, expected RGBA_8888")]
    UnsupportedFormat(PixelFormat),

    /// The host refused to grant access to the bitmap pixels.
    #[error("failed to lock bitmap pixels: {0}")]
    LockFailed(String),

    /// Source and destination sizes differ.
    #[error("dimension mismatch: source {src_width}x{src_height}, destination {dst_width}x{dst_height}")]
    DimensionMismatch {
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
    },

    /// A buffer has zero width or height.
    #[error("empty frame {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },

    /// The reported row stride cannot hold a row of pixels, or the buffer size
    /// overflows the address space.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: u32, stride: u32 },

    /// A caller-supplied slice is shorter than its declared geometry.
    #[error("buffer holds {actual} bytes, {required} required")]
    BufferTooSmall { required: usize, actual: usize },

    /// An edge threshold is NaN or infinite.
    #[error("invalid edge thresholds low {low} high {high}")]
    InvalidThresholds { low: f32, high: f32 },
}
