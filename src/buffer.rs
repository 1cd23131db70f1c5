// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Non-owning strided views over RGBA_8888 pixel memory.
//!
//! A view never owns the bytes it points at. Views handed out by an
//! [`AccessGrant`](crate::host::AccessGrant) borrow the grant, so the borrow
//! checker rejects any use after the host lock is released.
//!
//! Rows are addressed as `y * stride`; padding bytes between the end of a row
//! and the next stride boundary are never read or written.

use crate::{error::FrameError, format::RGBA_CHANNELS};
use core::fmt;

/// Smallest slice that can back `height` rows of `width` pixels at `stride`.
/// The final row does not need its padding.
fn required_len(width: u32, height: u32, stride: usize) -> Result<usize, FrameError> {
    let invalid = || FrameError::InvalidStride {
        width,
        stride: stride.min(u32::MAX as usize) as u32,
    };
    let row_bytes = (width as usize)
        .checked_mul(RGBA_CHANNELS)
        .ok_or_else(invalid)?;
    if stride < row_bytes {
        return Err(invalid());
    }
    if height == 0 {
        return Ok(0);
    }
    stride
        .checked_mul(height as usize - 1)
        .and_then(|len| len.checked_add(row_bytes))
        .ok_or_else(invalid)
}

fn check_len(data_len: usize, width: u32, height: u32, stride: usize) -> Result<(), FrameError> {
    let required = required_len(width, height, stride)?;
    if data_len < required {
        return Err(FrameError::BufferTooSmall {
            required,
            actual: data_len,
        });
    }
    Ok(())
}

/// Read-only view of an RGBA_8888 frame.
#[derive(Copy, Clone)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wraps `data` as a `width`×`height` frame whose rows start every
    /// `stride` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidStride`] if `stride < width * 4` and
    /// [`FrameError::BufferTooSmall`] if `data` cannot hold every row.
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self, FrameError> {
        check_len(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Wraps a slice whose geometry has already been validated.
    pub(crate) fn from_parts(data: &'a [u8], width: u32, height: u32, stride: usize) -> Self {
        debug_assert!(check_len(data.len(), width, height, stride).is_ok());
        Self {
            data,
            width,
            height,
            stride,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.height as usize, "row {y} out of bounds");
        let data: &'a [u8] = self.data;
        let start = y * self.stride;
        &data[start..start + self.width as usize * RGBA_CHANNELS]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let this = *self;
        (0..self.height as usize).map(move |y| this.row(y))
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let px = &self.row(y)[x * RGBA_CHANNELS..(x + 1) * RGBA_CHANNELS];
        [px[0], px[1], px[2], px[3]]
    }
}

impl fmt::Debug for PixelBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}

/// Writable view of an RGBA_8888 frame.
pub struct PixelBufferMut<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> PixelBufferMut<'a> {
    /// Writable counterpart of [`PixelBuffer::new`], with the same errors.
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Result<Self, FrameError> {
        check_len(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub(crate) fn from_parts(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
    ) -> Self {
        debug_assert!(check_len(data.len(), width, height, stride).is_ok());
        Self {
            data,
            width,
            height,
            stride,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Mutable pixel bytes of row `y`, without padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height as usize, "row {y} out of bounds");
        let start = y * self.stride;
        &mut self.data[start..start + self.width as usize * RGBA_CHANNELS]
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        let row_bytes = self.width as usize * RGBA_CHANNELS;
        // stride is only zero for zero-width frames
        self.data
            .chunks_mut(self.stride.max(1))
            .take(self.height as usize)
            .map(move |row| &mut row[..row_bytes])
    }
}

impl fmt::Debug for PixelBufferMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PixelBufferMut")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_rows() -> Result<(), FrameError> {
        // 2x2 frame with 4 bytes of padding per row
        let data: Vec<u8> = (0..24).collect();
        let buf = PixelBuffer::new(&data, 2, 2, 12)?;
        assert_eq!(buf.row(0), &data[0..8]);
        assert_eq!(buf.row(1), &data[12..20]);
        assert_eq!(buf.pixel(1, 1), [16, 17, 18, 19]);
        assert_eq!(buf.rows().count(), 2);
        Ok(())
    }

    #[test]
    fn last_row_without_padding() {
        let data = vec![0u8; 12 + 8];
        assert!(PixelBuffer::new(&data, 2, 2, 12).is_ok());
        assert_eq!(
            PixelBuffer::new(&data[..19], 2, 2, 12).unwrap_err(),
            FrameError::BufferTooSmall {
                required: 20,
                actual: 19
            }
        );
    }

    #[test]
    fn stride_smaller_than_row() {
        let data = vec![0u8; 64];
        assert_eq!(
            PixelBuffer::new(&data, 4, 2, 12).unwrap_err(),
            FrameError::InvalidStride {
                width: 4,
                stride: 12
            }
        );
    }

    #[test]
    fn rows_mut_skip_padding() -> Result<(), FrameError> {
        let mut data = vec![0u8; 2 * 12];
        let mut buf = PixelBufferMut::new(&mut data, 2, 2, 12)?;
        for row in buf.rows_mut() {
            assert_eq!(row.len(), 8);
            row.fill(0xff);
        }
        assert!(data[0..8].iter().all(|&b| b == 0xff));
        assert!(data[8..12].iter().all(|&b| b == 0));
        assert!(data[12..20].iter().all(|&b| b == 0xff));
        assert!(data[20..24].iter().all(|&b| b == 0));
        Ok(())
    }

    #[test]
    fn empty_views() -> Result<(), FrameError> {
        let buf = PixelBuffer::new(&[], 0, 10, 0)?;
        assert!(buf.is_empty());
        assert_eq!(buf.rows().filter(|r| !r.is_empty()).count(), 0);
        Ok(())
    }
}
