// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! RGBA ↔ single channel conversions.
//!
//! Luma uses the ITU-R BT.601 weights in 14-bit fixed point
//! (`0.299 R + 0.587 G + 0.114 B`), rounded to nearest. The weights sum to
//! exactly `1 << 14`, so a pixel whose colour channels are equal maps to that
//! same value and the conversion is idempotent on grey input.

use crate::{
    buffer::{PixelBuffer, PixelBufferMut},
    format::RGBA_CHANNELS,
};

const SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Luma of one RGBA pixel. Alpha is ignored.
#[inline]
pub fn luma(px: &[u8]) -> u8 {
    let y = px[0] as u32 * R_WEIGHT + px[1] as u32 * G_WEIGHT + px[2] as u32 * B_WEIGHT;
    ((y + ROUND) >> SHIFT) as u8
}

/// Writes the luma of every pixel of `src` into the tightly packed plane
/// `plane` (`width * height` bytes).
pub fn reduce(src: &PixelBuffer, plane: &mut [u8]) {
    let width = src.width() as usize;
    debug_assert_eq!(plane.len(), width * src.height() as usize);
    for (row, out) in src.rows().zip(plane.chunks_exact_mut(width.max(1))) {
        for (px, y) in row.chunks_exact(RGBA_CHANNELS).zip(out.iter_mut()) {
            *y = luma(px);
        }
    }
}

/// Replicates each plane value into all four channels of `dst`.
pub fn expand(plane: &[u8], dst: &mut PixelBufferMut) {
    let width = dst.width() as usize;
    debug_assert_eq!(plane.len(), width * dst.height() as usize);
    for (out, row) in dst.rows_mut().zip(plane.chunks_exact(width.max(1))) {
        for (px, &v) in out.chunks_exact_mut(RGBA_CHANNELS).zip(row) {
            px.fill(v);
        }
    }
}

/// Grey conversion straight from `src` into `dst` without an intermediate
/// plane. Both views must have the same dimensions.
pub fn grayscale(src: &PixelBuffer, dst: &mut PixelBufferMut) {
    for (row, out) in src.rows().zip(dst.rows_mut()) {
        for (px, o) in row
            .chunks_exact(RGBA_CHANNELS)
            .zip(out.chunks_exact_mut(RGBA_CHANNELS))
        {
            o.fill(luma(px));
        }
    }
}
