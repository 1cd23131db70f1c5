// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::FrameError;
use core::fmt;
use jnigraphics_sys::{
    AndroidBitmapInfo, ANDROID_BITMAP_FORMAT_A_8, ANDROID_BITMAP_FORMAT_NONE,
    ANDROID_BITMAP_FORMAT_RGBA_1010102, ANDROID_BITMAP_FORMAT_RGBA_4444,
    ANDROID_BITMAP_FORMAT_RGBA_8888, ANDROID_BITMAP_FORMAT_RGBA_F16, ANDROID_BITMAP_FORMAT_RGB_565,
};

/// Number of bytes in one RGBA_8888 pixel.
pub const RGBA_CHANNELS: usize = 4;

/// Bitmap pixel formats a host may report.
///
/// Only [`PixelFormat::Rgba8888`] is accepted by the transform; the other
/// variants exist so a rejection can name what the host actually handed over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 4 channels, 8 bits each
    Rgba8888,
    /// 16-bit packed RGB
    Rgb565,
    /// 16-bit packed RGBA
    Rgba4444,
    /// Single 8-bit alpha channel
    Alpha8,
    /// 4 channels, half float each
    RgbaF16,
    /// 10-bit RGB with 2-bit alpha
    Rgba1010102,
    /// Anything else, including `ANDROID_BITMAP_FORMAT_NONE`
    Unknown(i32),
}

impl From<i32> for PixelFormat {
    fn from(value: i32) -> Self {
        match value {
            ANDROID_BITMAP_FORMAT_RGBA_8888 => PixelFormat::Rgba8888,
            ANDROID_BITMAP_FORMAT_RGB_565 => PixelFormat::Rgb565,
            ANDROID_BITMAP_FORMAT_RGBA_4444 => PixelFormat::Rgba4444,
            ANDROID_BITMAP_FORMAT_A_8 => PixelFormat::Alpha8,
            ANDROID_BITMAP_FORMAT_RGBA_F16 => PixelFormat::RgbaF16,
            ANDROID_BITMAP_FORMAT_RGBA_1010102 => PixelFormat::Rgba1010102,
            other => PixelFormat::Unknown(other),
        }
    }
}

impl From<PixelFormat> for i32 {
    fn from(value: PixelFormat) -> Self {
        match value {
            PixelFormat::Rgba8888 => ANDROID_BITMAP_FORMAT_RGBA_8888,
            PixelFormat::Rgb565 => ANDROID_BITMAP_FORMAT_RGB_565,
            PixelFormat::Rgba4444 => ANDROID_BITMAP_FORMAT_RGBA_4444,
            PixelFormat::Alpha8 => ANDROID_BITMAP_FORMAT_A_8,
            PixelFormat::RgbaF16 => ANDROID_BITMAP_FORMAT_RGBA_F16,
            PixelFormat::Rgba1010102 => ANDROID_BITMAP_FORMAT_RGBA_1010102,
            PixelFormat::Unknown(v) => v,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PixelFormat::Rgba8888 => write!(f, "RGBA_8888"),
            PixelFormat::Rgb565 => write!(f, "RGB_565"),
            PixelFormat::Rgba4444 => write!(f, "RGBA_4444"),
            PixelFormat::Alpha8 => write!(f, "A_8"),
            PixelFormat::RgbaF16 => write!(f, "RGBA_F16"),
            PixelFormat::Rgba1010102 => write!(f, "RGBA_1010102"),
            PixelFormat::Unknown(ANDROID_BITMAP_FORMAT_NONE) => write!(f, "NONE"),
            PixelFormat::Unknown(v) => write!(f, "UNKNOWN({v})"),
        }
    }
}

/// Geometry and format of a host bitmap as reported before locking.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmapInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes from the start of one row to the start of the next
    pub stride: u32,
    pub format: PixelFormat,
}

impl BitmapInfo {
    /// Describes a tightly packed RGBA_8888 bitmap.
    ///
    /// A width whose rows do not fit in a `u32` stride saturates the stride,
    /// which [`BitmapInfo::validate`] then rejects.
    pub const fn rgba(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stride: width.saturating_mul(RGBA_CHANNELS as u32),
            format: PixelFormat::Rgba8888,
        }
    }

    /// Bytes of pixel data in a single row, excluding padding.
    pub const fn row_bytes(&self) -> usize {
        self.width as usize * RGBA_CHANNELS
    }

    /// Checks the bitmap is RGBA_8888 with a stride wide enough for its rows
    /// and returns the number of bytes the locked memory must span.
    pub fn validate(&self) -> Result<usize, FrameError> {
        if self.format != PixelFormat::Rgba8888 {
            return Err(FrameError::UnsupportedFormat(self.format));
        }
        layout_len(self.width, self.height, self.stride)
    }
}

/// Byte length of a `height`-row RGBA_8888 buffer with the given stride.
pub(crate) fn layout_len(width: u32, height: u32, stride: u32) -> Result<usize, FrameError> {
    let invalid = || FrameError::InvalidStride { width, stride };
    let row_bytes = (width as usize)
        .checked_mul(RGBA_CHANNELS)
        .ok_or_else(invalid)?;
    if (stride as usize) < row_bytes {
        return Err(invalid());
    }
    (stride as usize)
        .checked_mul(height as usize)
        .ok_or_else(invalid)
}

impl From<AndroidBitmapInfo> for BitmapInfo {
    fn from(value: AndroidBitmapInfo) -> Self {
        Self {
            width: value.width,
            height: value.height,
            stride: value.stride,
            format: value.format.into(),
        }
    }
}

impl fmt::Display for BitmapInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} {} stride:{}",
            self.width, self.height, self.format, self.stride
        )
    }
}
