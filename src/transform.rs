// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! The per-frame transform.
//!
//! [`process`] reads only from `src` and writes only the pixel bytes of `dst`,
//! never its row padding. Grey conversion works pixel by pixel; the edge
//! operator reduces `src` to a luma plane, hands it to
//! [`imageproc::edges::canny`] and expands the resulting mask into `dst`.

use crate::{
    buffer::{PixelBuffer, PixelBufferMut},
    error::FrameError,
    luma,
    operator::Operator,
};
use image::GrayImage;
use imageproc::edges::canny;

/// Mask value of an edge pixel. Every other pixel is 0.
pub const EDGE_VALUE: u8 = 255;

/// Checks a source/destination pair before any pixel is touched.
///
/// Zero-area frames are reported first, then differing sizes.
pub fn check_frames(src: (u32, u32), dst: (u32, u32)) -> Result<(), FrameError> {
    for (width, height) in [src, dst] {
        if width == 0 || height == 0 {
            return Err(FrameError::EmptyFrame { width, height });
        }
    }
    if src != dst {
        return Err(FrameError::DimensionMismatch {
            src_width: src.0,
            src_height: src.1,
            dst_width: dst.0,
            dst_height: dst.1,
        });
    }
    Ok(())
}

/// Applies `op` to `src` and stores the RGBA result in `dst`.
///
/// # Errors
///
/// [`FrameError::EmptyFrame`], [`FrameError::DimensionMismatch`] or
/// [`FrameError::InvalidThresholds`]; `dst` is untouched in every case.
pub fn process(src: &PixelBuffer, dst: &mut PixelBufferMut, op: Operator) -> Result<(), FrameError> {
    check_frames(
        (src.width(), src.height()),
        (dst.width(), dst.height()),
    )?;

    match op {
        Operator::Grayscale => luma::grayscale(src, dst),
        Operator::EdgeDetect(thresholds) => {
            let (low, high) = thresholds.ordered()?;
            let required = src.width() as usize * src.height() as usize;
            let mut plane = vec![0u8; required];
            luma::reduce(src, &mut plane);
            let gray = GrayImage::from_raw(src.width(), src.height(), plane).ok_or(
                FrameError::BufferTooSmall {
                    required,
                    actual: required,
                },
            )?;
            let edges = canny(&gray, low, high);
            luma::expand(edges.as_raw(), dst);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Thresholds;

    fn rgba(width: usize, height: usize, f: impl Fn(usize, usize) -> [u8; 4]) -> Vec<u8> {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        data
    }

    /// Runs the edge operator over a tightly packed RGBA frame.
    fn edges(src: &[u8], width: usize, height: usize, low: f32, high: f32) -> Result<Vec<u8>, FrameError> {
        let mut out = vec![0x11u8; width * height * 4];
        process(
            &PixelBuffer::new(src, width as u32, height as u32, width * 4)?,
            &mut PixelBufferMut::new(&mut out, width as u32, height as u32, width * 4)?,
            Operator::EdgeDetect(Thresholds::new(low, high)),
        )?;
        Ok(out)
    }

    fn is_edge(out: &[u8], width: usize, x: usize, y: usize) -> bool {
        out[(y * width + x) * 4] == EDGE_VALUE
    }

    /// Vertical step at column 16 of a 32x32 frame whose contrast fades
    /// linearly from 60 in the top row to 40 in the bottom row. The gradient
    /// along the step stays above 80 and only its upper part exceeds 100.
    fn fading_step() -> Vec<u8> {
        rgba(32, 32, |x, y| {
            let v = if x < 16 { 60 } else { 120 - (20 * y / 31) as u8 };
            [v, v, v, 255]
        })
    }

    #[test]
    fn empty_before_mismatch() {
        assert_eq!(
            check_frames((0, 10), (5, 5)),
            Err(FrameError::EmptyFrame {
                width: 0,
                height: 10
            })
        );
        assert_eq!(
            check_frames((5, 5), (5, 0)),
            Err(FrameError::EmptyFrame {
                width: 5,
                height: 0
            })
        );
        assert_eq!(
            check_frames((100, 100), (50, 50)),
            Err(FrameError::DimensionMismatch {
                src_width: 100,
                src_height: 100,
                dst_width: 50,
                dst_height: 50
            })
        );
        assert_eq!(check_frames((3, 7), (3, 7)), Ok(()));
    }

    #[test]
    fn grayscale_channels_equal() -> Result<(), FrameError> {
        let src = rgba(7, 5, |x, y| [(x * 30) as u8, (y * 40) as u8, 200, 17]);
        let mut out = vec![0u8; 7 * 5 * 4];
        let src_view = PixelBuffer::new(&src, 7, 5, 28)?;
        process(
            &src_view,
            &mut PixelBufferMut::new(&mut out, 7, 5, 28)?,
            Operator::Grayscale,
        )?;
        for px in out.chunks_exact(4) {
            assert!(px.iter().all(|&c| c == px[0]));
        }
        assert_eq!(out[0], luma::luma(&src[0..4]));
        Ok(())
    }

    #[test]
    fn edge_mask_is_binary() -> Result<(), FrameError> {
        let src = rgba(20, 20, |x, y| {
            let v = if (x / 5 + y / 5) % 2 == 0 { 30 } else { 220 };
            [v, v / 2, 255 - v, 255]
        });
        let out = edges(&src, 20, 20, 50.0, 150.0)?;
        for px in out.chunks_exact(4) {
            assert!(px == [0; 4] || px == [EDGE_VALUE; 4], "{px:?}");
        }
        assert!(out.contains(&EDGE_VALUE));
        Ok(())
    }

    #[test]
    fn flat_frame_has_no_edges() -> Result<(), FrameError> {
        let src = rgba(16, 12, |_, _| [90, 140, 30, 255]);
        let out = edges(&src, 16, 12, 1.0, 2.0)?;
        assert!(out.iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn tiny_frames() -> Result<(), FrameError> {
        for (w, h) in [(1, 1), (1, 7), (5, 1), (2, 2)] {
            let src = rgba(w, h, |x, y| [(x * 200) as u8, (y * 90) as u8, 0, 255]);
            let out = edges(&src, w, h, 50.0, 150.0)?;
            assert!(out.iter().all(|&b| b == 0 || b == EDGE_VALUE));
        }
        Ok(())
    }

    #[test]
    fn hysteresis_needs_a_seed() -> Result<(), FrameError> {
        let out = edges(&fading_step(), 32, 32, 50.0, 150.0)?;
        assert!(out.iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn weak_edges_follow_strong_seed() -> Result<(), FrameError> {
        let out = edges(&fading_step(), 32, 32, 50.0, 100.0)?;
        for y in 1..31 {
            assert!(
                is_edge(&out, 32, 15, y) || is_edge(&out, 32, 16, y),
                "row {y} lost the edge"
            );
            for x in (0..32).filter(|x| !(15..=16).contains(x)) {
                assert!(!is_edge(&out, 32, x, y), "stray edge at {x},{y}");
            }
        }
        Ok(())
    }

    #[test]
    fn swapped_thresholds_match() -> Result<(), FrameError> {
        let src = fading_step();
        assert_eq!(edges(&src, 32, 32, 100.0, 50.0)?, edges(&src, 32, 32, 50.0, 100.0)?);
        Ok(())
    }

    #[test]
    fn invalid_thresholds_leave_destination_untouched() -> Result<(), FrameError> {
        let src = fading_step();
        let mut out = vec![9u8; 32 * 32 * 4];
        let err = process(
            &PixelBuffer::new(&src, 32, 32, 128)?,
            &mut PixelBufferMut::new(&mut out, 32, 32, 128)?,
            Operator::EdgeDetect(Thresholds::new(f32::NAN, 150.0)),
        );
        assert!(matches!(err, Err(FrameError::InvalidThresholds { .. })));
        assert!(out.iter().all(|&b| b == 9));
        Ok(())
    }

    #[test]
    fn failures_leave_destination_untouched() -> Result<(), FrameError> {
        let src = vec![200u8; 4 * 4 * 4];
        let mut out = vec![9u8; 2 * 2 * 4];
        let err = process(
            &PixelBuffer::new(&src, 4, 4, 16)?,
            &mut PixelBufferMut::new(&mut out, 2, 2, 8)?,
            Operator::Grayscale,
        );
        assert!(matches!(err, Err(FrameError::DimensionMismatch { .. })));
        assert!(out.iter().all(|&b| b == 9));
        Ok(())
    }

    #[test]
    fn padding_is_preserved() -> Result<(), FrameError> {
        let stride = 3 * 4 + 8;
        let src = vec![120u8; stride * 3];
        let mut out = vec![0xABu8; stride * 3];
        process(
            &PixelBuffer::new(&src, 3, 3, stride)?,
            &mut PixelBufferMut::new(&mut out, 3, 3, stride)?,
            Operator::EdgeDetect(Thresholds::new(10.0, 20.0)),
        )?;
        for row in out.chunks_exact(stride) {
            assert_eq!(&row[..12], &[0u8; 12]);
            assert_eq!(&row[12..], &[0xABu8; 8]);
        }
        Ok(())
    }
}
