// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Host-facing entry points.
//!
//! Both entry points share [`run`]: lock the input, lock the output, transform,
//! unlock. The grants are locals, so they unlock in reverse order on every
//! return path.

use crate::{
    error::FrameError,
    host::{acquire, BitmapHost},
    operator::Operator,
    transform::process,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, info_span};

/// Summary of one processed frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameStats {
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub operator: Operator,
    /// Wall time from first lock to last write, in milliseconds.
    pub processing_time_ms: f64,
}

/// Runs Canny edge detection (thresholds 50/150) from `input` into `output`.
pub fn process_frame<H>(host: &H, input: &H::Bitmap, output: &H::Bitmap) -> Result<FrameStats, FrameError>
where
    H: BitmapHost + ?Sized,
{
    run(host, input, output, Operator::edge())
}

/// Writes the grey version of `input` into `output`.
pub fn convert_to_grayscale<H>(
    host: &H,
    input: &H::Bitmap,
    output: &H::Bitmap,
) -> Result<FrameStats, FrameError>
where
    H: BitmapHost + ?Sized,
{
    run(host, input, output, Operator::Grayscale)
}

/// Locks both bitmaps, applies `op` and releases the locks.
///
/// # Errors
///
/// Any [`FrameError`]. Nothing is written to `output` unless the call
/// succeeds, and both bitmaps are unlocked when this returns, whatever the
/// outcome.
pub fn run<H>(
    host: &H,
    input: &H::Bitmap,
    output: &H::Bitmap,
    op: Operator,
) -> Result<FrameStats, FrameError>
where
    H: BitmapHost + ?Sized,
{
    let _span = info_span!("frame", operator = op.name()).entered();
    let start = Instant::now();

    let src = acquire(host, input)?;
    let mut dst = acquire(host, output)?;
    if src.overlaps(&dst) {
        return Err(FrameError::LockFailed(
            "input and output share pixel memory".into(),
        ));
    }

    process(&src.pixels(), &mut dst.pixels_mut(), op)?;

    let stats = FrameStats {
        width: src.width(),
        height: src.height(),
        operator: op,
        processing_time_ms: start.elapsed().as_secs_f64() * 1e3,
    };
    info!(
        width = stats.width,
        height = stats.height,
        operator = %op,
        elapsed_ms = stats.processing_time_ms,
        "frame processed"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryBitmap, MemoryHost};

    #[test]
    fn same_bitmap_for_input_and_output() {
        let host = MemoryHost::new();
        let bitmap = MemoryBitmap::new(8, 8);
        assert!(matches!(
            convert_to_grayscale(&host, &bitmap, &bitmap),
            Err(FrameError::LockFailed(_))
        ));
        assert_eq!(host.outstanding(), 0);
        assert!(!bitmap.is_locked());
    }

    #[test]
    fn stats() -> Result<(), FrameError> {
        let host = MemoryHost::new();
        let input = MemoryBitmap::new(6, 4);
        let output = MemoryBitmap::new(6, 4);
        let stats = process_frame(&host, &input, &output)?;
        assert_eq!((stats.width, stats.height), (6, 4));
        assert_eq!(stats.operator, Operator::edge());
        assert!(stats.processing_time_ms >= 0.0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["mode"], "edge");
        assert_eq!(json["width"], 6);
        Ok(())
    }
}
