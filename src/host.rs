// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Access to host-owned bitmaps.
//!
//! A [`BitmapHost`] owns the pixel memory and hands out temporary access to
//! it through a lock/unlock pair. [`acquire`] turns one successful lock into
//! an [`AccessGrant`] which unlocks the bitmap when dropped, so every exit
//! path (early `?` return, panic unwinding out of an operator, or a normal
//! return) releases the host lock exactly once.
//!
//! [`MemoryHost`] is an in-process host backed by heap buffers. The command
//! line tool and the tests use it; the Android host lives in
//! [`crate::jni`].

use crate::{
    buffer::{PixelBuffer, PixelBufferMut},
    error::FrameError,
    format::{BitmapInfo, RGBA_CHANNELS},
};
use std::{
    cell::{Cell, UnsafeCell},
    ptr::NonNull,
    slice::{from_raw_parts, from_raw_parts_mut},
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::{debug, trace};

/// A source of lockable bitmaps.
///
/// # Safety
///
/// When [`BitmapHost::lock`] returns `Ok(ptr)`, `ptr` must be valid for reads
/// and writes of `stride * height` bytes (as reported by
/// [`BitmapHost::info`] for the same bitmap), and nothing else may access that
/// memory until the matching [`BitmapHost::unlock`] call. The reported info
/// must not change while the bitmap is locked.
pub unsafe trait BitmapHost {
    /// Host-side bitmap handle.
    type Bitmap: ?Sized;

    /// Reports geometry and pixel format without locking.
    fn info(&self, bitmap: &Self::Bitmap) -> Result<BitmapInfo, FrameError>;

    /// Pins the bitmap pixels and returns their base address.
    fn lock(&self, bitmap: &Self::Bitmap) -> Result<NonNull<u8>, FrameError>;

    /// Releases a lock taken by [`BitmapHost::lock`].
    fn unlock(&self, bitmap: &Self::Bitmap);
}

/// Scoped access to the pixels of one locked bitmap.
///
/// The grant owns the host lock. Dropping it (or calling
/// [`AccessGrant::release`]) unlocks the bitmap; pixel views borrow the grant
/// and therefore cannot outlive it.
pub struct AccessGrant<'h, H: BitmapHost + ?Sized> {
    host: &'h H,
    bitmap: &'h H::Bitmap,
    info: BitmapInfo,
    base: NonNull<u8>,
    len: usize,
}

/// Validates `bitmap` and locks its pixels.
///
/// # Errors
///
/// - [`FrameError::UnsupportedFormat`] if the bitmap is not RGBA_8888.
/// - [`FrameError::InvalidStride`] if the reported stride cannot hold a row.
/// - [`FrameError::LockFailed`] if the host refuses the lock.
///
/// Format and stride are checked before the lock is taken, so a rejected
/// bitmap is never left locked.
pub fn acquire<'h, H>(host: &'h H, bitmap: &'h H::Bitmap) -> Result<AccessGrant<'h, H>, FrameError>
where
    H: BitmapHost + ?Sized,
{
    let info = host.info(bitmap)?;
    let len = info.validate()?;
    let base = host.lock(bitmap)?;
    debug!(%info, "bitmap locked");
    Ok(AccessGrant {
        host,
        bitmap,
        info,
        base,
        len,
    })
}

/// Explicitly ends a grant. Equivalent to dropping it.
pub fn release<H: BitmapHost + ?Sized>(grant: AccessGrant<'_, H>) {
    grant.release()
}

impl<H: BitmapHost + ?Sized> AccessGrant<'_, H> {
    pub fn info(&self) -> BitmapInfo {
        self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    /// Read-only view of the locked pixels.
    pub fn pixels(&self) -> PixelBuffer<'_> {
        // SAFETY: the host guarantees `base` is valid for `len` bytes until
        // unlock, and the view borrows `self`, which unlocks on drop.
        let data = unsafe { from_raw_parts(self.base.as_ptr(), self.len) };
        PixelBuffer::from_parts(
            data,
            self.info.width,
            self.info.height,
            self.info.stride as usize,
        )
    }

    /// Writable view of the locked pixels.
    pub fn pixels_mut(&mut self) -> PixelBufferMut<'_> {
        // SAFETY: as for `pixels`; the exclusive borrow of `self` prevents a
        // second view of this grant.
        let data = unsafe { from_raw_parts_mut(self.base.as_ptr(), self.len) };
        PixelBufferMut::from_parts(
            data,
            self.info.width,
            self.info.height,
            self.info.stride as usize,
        )
    }

    /// Whether the locked memory of two grants shares any byte. Two grants on
    /// the same bitmap would otherwise hand out aliasing views.
    pub fn overlaps<G: BitmapHost + ?Sized>(&self, other: &AccessGrant<'_, G>) -> bool {
        if self.len == 0 || other.len == 0 {
            return false;
        }
        let a = self.base.as_ptr() as usize;
        let b = other.base.as_ptr() as usize;
        a < b + other.len && b < a + self.len
    }

    /// Unlocks the bitmap now instead of at end of scope.
    pub fn release(self) {
        drop(self)
    }
}

impl<H: BitmapHost + ?Sized> Drop for AccessGrant<'_, H> {
    fn drop(&mut self) {
        self.host.unlock(self.bitmap);
        debug!(info = %self.info, "bitmap unlocked");
    }
}

/// In-process [`BitmapHost`] over heap-allocated bitmaps.
///
/// Counts every lock and unlock so callers can verify that grants are
/// balanced.
#[derive(Debug, Default)]
pub struct MemoryHost {
    locks: AtomicUsize,
    unlocks: AtomicUsize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful locks so far.
    pub fn lock_count(&self) -> usize {
        self.locks.load(Ordering::Acquire)
    }

    /// Number of unlocks so far.
    pub fn unlock_count(&self) -> usize {
        self.unlocks.load(Ordering::Acquire)
    }

    /// Locks not yet released.
    pub fn outstanding(&self) -> usize {
        self.lock_count() - self.unlock_count()
    }
}

unsafe impl BitmapHost for MemoryHost {
    type Bitmap = MemoryBitmap;

    fn info(&self, bitmap: &MemoryBitmap) -> Result<BitmapInfo, FrameError> {
        Ok(bitmap.info)
    }

    fn lock(&self, bitmap: &MemoryBitmap) -> Result<NonNull<u8>, FrameError> {
        if bitmap.recycled {
            return Err(FrameError::LockFailed("bitmap has been recycled".into()));
        }
        if bitmap.locked.replace(true) {
            return Err(FrameError::LockFailed("bitmap is already locked".into()));
        }
        self.locks.fetch_add(1, Ordering::AcqRel);
        // SAFETY: no view exists while the bitmap is unlocked, and `&mut`
        // access to the bitmap itself is impossible while it is borrowed here.
        let ptr = unsafe { (*bitmap.pixels.get()).as_mut_ptr() };
        trace!(?ptr, "memory bitmap locked");
        NonNull::new(ptr).ok_or_else(|| FrameError::LockFailed("null pixel address".into()))
    }

    fn unlock(&self, bitmap: &MemoryBitmap) {
        if bitmap.locked.replace(false) {
            self.unlocks.fetch_add(1, Ordering::AcqRel);
        }
    }
}

/// A heap-backed bitmap served by [`MemoryHost`].
///
/// Pixel contents are only reachable through `&mut self`, which cannot
/// coexist with an [`AccessGrant`] borrowing the bitmap.
#[derive(Debug)]
pub struct MemoryBitmap {
    info: BitmapInfo,
    pixels: UnsafeCell<Box<[u8]>>,
    locked: Cell<bool>,
    recycled: bool,
}

impl MemoryBitmap {
    /// Tightly packed, zero-filled RGBA_8888 bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_info(BitmapInfo::rgba(width, height))
    }

    /// Zero-filled bitmap of `stride * height` bytes reporting `info`. The
    /// format is not checked, which lets callers model hosts that hand over
    /// non-RGBA bitmaps.
    pub fn with_info(info: BitmapInfo) -> Self {
        let len = info.stride as usize * info.height as usize;
        Self {
            info,
            pixels: UnsafeCell::new(vec![0u8; len].into_boxed_slice()),
            locked: Cell::new(false),
            recycled: false,
        }
    }

    /// RGBA_8888 bitmap with `padding` extra bytes per row, filled by `f(x, y)`.
    /// Padding bytes are set to `0xAB` so stray writes are easy to spot.
    ///
    /// If the padded row does not fit in a `u32` stride the stride saturates,
    /// no pixel memory is allocated and the bitmap fails validation when
    /// acquired.
    pub fn from_fn<F>(width: u32, height: u32, padding: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let info = BitmapInfo {
            stride: BitmapInfo::rgba(width, height).stride.saturating_add(padding),
            ..BitmapInfo::rgba(width, height)
        };
        if info.validate().is_err() {
            return Self {
                info,
                pixels: UnsafeCell::new(Box::default()),
                locked: Cell::new(false),
                recycled: false,
            };
        }
        let mut bitmap = Self::with_info(info);
        let stride = info.stride as usize;
        let data = bitmap.data_mut();
        for y in 0..height {
            let row = &mut data[y as usize * stride..(y as usize + 1) * stride];
            let (pixels, pad) = row.split_at_mut(info.row_bytes());
            for (x, px) in pixels.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
                px.copy_from_slice(&f(x as u32, y));
            }
            pad.fill(0xAB);
        }
        bitmap
    }

    pub fn info(&self) -> BitmapInfo {
        self.info
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Marks the bitmap as recycled; later locks fail.
    pub fn recycle(&mut self) {
        self.recycled = true;
    }

    /// All bytes including row padding.
    ///
    /// Takes `&mut self` even though it only reads: the exclusive borrow is
    /// what guarantees no [`AccessGrant`] on this bitmap is still writing.
    pub fn data(&mut self) -> &[u8] {
        self.pixels.get_mut()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixels.get_mut()
    }

    /// Read-only view of the pixels for inspection outside a grant.
    ///
    /// # Errors
    ///
    /// Fails like [`BitmapInfo::validate`] for non-RGBA or badly strided
    /// bitmaps.
    pub fn view(&mut self) -> Result<PixelBuffer<'_>, FrameError> {
        let info = self.info;
        info.validate()?;
        PixelBuffer::new(
            self.pixels.get_mut(),
            info.width,
            info.height,
            info.stride as usize,
        )
    }
}
