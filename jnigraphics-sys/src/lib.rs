// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Low-level FFI bindings for the Android NDK bitmap API.
//!
//! The symbols live in `libjnigraphics.so` and are resolved at runtime through
//! [`libloading`], so the bindings build on any target and only fail when the
//! library is opened on a system without it.
#![allow(non_camel_case_types, non_snake_case, non_upper_case_globals)]

use libc::{c_int, c_void};
use std::ffi::OsStr;

/// Opaque `JNIEnv*` as seen through the C ABI.
pub type JNIEnv = c_void;
/// Opaque local or global JNI object reference.
pub type jobject = *mut c_void;

pub const ANDROID_BITMAP_RESULT_SUCCESS: c_int = 0;
pub const ANDROID_BITMAP_RESULT_BAD_PARAMETER: c_int = -1;
pub const ANDROID_BITMAP_RESULT_JNI_EXCEPTION: c_int = -2;
pub const ANDROID_BITMAP_RESULT_ALLOCATION_FAILED: c_int = -3;

pub const ANDROID_BITMAP_FORMAT_NONE: i32 = 0;
pub const ANDROID_BITMAP_FORMAT_RGBA_8888: i32 = 1;
pub const ANDROID_BITMAP_FORMAT_RGB_565: i32 = 4;
pub const ANDROID_BITMAP_FORMAT_RGBA_4444: i32 = 7;
pub const ANDROID_BITMAP_FORMAT_A_8: i32 = 8;
pub const ANDROID_BITMAP_FORMAT_RGBA_F16: i32 = 9;
pub const ANDROID_BITMAP_FORMAT_RGBA_1010102: i32 = 10;

/// Default soname of the NDK bitmap library.
pub const LIBJNIGRAPHICS: &str = "libjnigraphics.so";

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct AndroidBitmapInfo {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: i32,
    pub flags: u32,
}

pub struct jnigraphics {
    __library: ::libloading::Library,
    pub AndroidBitmap_getInfo: Result<
        unsafe extern "C" fn(
            env: *mut JNIEnv,
            jbitmap: jobject,
            info: *mut AndroidBitmapInfo,
        ) -> c_int,
        ::libloading::Error,
    >,
    pub AndroidBitmap_lockPixels: Result<
        unsafe extern "C" fn(env: *mut JNIEnv, jbitmap: jobject, addrPtr: *mut *mut c_void) -> c_int,
        ::libloading::Error,
    >,
    pub AndroidBitmap_unlockPixels: Result<
        unsafe extern "C" fn(env: *mut JNIEnv, jbitmap: jobject) -> c_int,
        ::libloading::Error,
    >,
}

impl jnigraphics {
    /// Opens the library at `path` and resolves the bitmap symbols.
    ///
    /// # Safety
    ///
    /// Loading a shared library runs its initialisers; the caller must trust
    /// the library found at `path`.
    pub unsafe fn new<P>(path: P) -> Result<Self, ::libloading::Error>
    where
        P: AsRef<OsStr>,
    {
        let library = ::libloading::Library::new(path)?;
        Self::from_library(library)
    }

    /// # Safety
    ///
    /// See [`jnigraphics::new`].
    pub unsafe fn from_library<L>(library: L) -> Result<Self, ::libloading::Error>
    where
        L: Into<::libloading::Library>,
    {
        let __library = library.into();
        let AndroidBitmap_getInfo = __library.get(b"AndroidBitmap_getInfo\0").map(|sym| *sym);
        let AndroidBitmap_lockPixels = __library
            .get(b"AndroidBitmap_lockPixels\0")
            .map(|sym| *sym);
        let AndroidBitmap_unlockPixels = __library
            .get(b"AndroidBitmap_unlockPixels\0")
            .map(|sym| *sym);
        Ok(jnigraphics {
            __library,
            AndroidBitmap_getInfo,
            AndroidBitmap_lockPixels,
            AndroidBitmap_unlockPixels,
        })
    }

    /// # Safety
    ///
    /// `env` must be the JNI environment of the calling thread and `jbitmap` a
    /// live `android.graphics.Bitmap` reference.
    pub unsafe fn AndroidBitmap_getInfo(
        &self,
        env: *mut JNIEnv,
        jbitmap: jobject,
        info: *mut AndroidBitmapInfo,
    ) -> c_int {
        (self
            .AndroidBitmap_getInfo
            .as_ref()
            .expect("Expected function, got error."))(env, jbitmap, info)
    }

    /// # Safety
    ///
    /// Same requirements as [`jnigraphics::AndroidBitmap_getInfo`]. On success
    /// the pixels stay pinned until `AndroidBitmap_unlockPixels` is called.
    pub unsafe fn AndroidBitmap_lockPixels(
        &self,
        env: *mut JNIEnv,
        jbitmap: jobject,
        addrPtr: *mut *mut c_void,
    ) -> c_int {
        (self
            .AndroidBitmap_lockPixels
            .as_ref()
            .expect("Expected function, got error."))(env, jbitmap, addrPtr)
    }

    /// # Safety
    ///
    /// Must pair with a successful `AndroidBitmap_lockPixels` on the same
    /// bitmap.
    pub unsafe fn AndroidBitmap_unlockPixels(&self, env: *mut JNIEnv, jbitmap: jobject) -> c_int {
        (self
            .AndroidBitmap_unlockPixels
            .as_ref()
            .expect("Expected function, got error."))(env, jbitmap)
    }
}
