// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! JNI exports for `com.prerana.edgedetection.native.NativeProcessor`.
//!
//! The Java side declares
//!
//! ```kotlin
//! external fun processFrame(input: Bitmap, output: Bitmap)
//! external fun convertToGrayscale(input: Bitmap, output: Bitmap)
//! ```
//!
//! Both return nothing, so failures are logged (to logcat under [`LOG_TAG`]
//! on Android) and the output bitmap is left as it was. Panics are caught at the boundary; the bitmap locks are
//! released while unwinding.

use crate::{
    bridge::run,
    error::FrameError,
    format::BitmapInfo,
    host::BitmapHost,
    operator::Operator,
};
use jnigraphics_sys::{
    jnigraphics, jobject, AndroidBitmapInfo, JNIEnv, ANDROID_BITMAP_RESULT_SUCCESS, LIBJNIGRAPHICS,
};
use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    ptr::{null_mut, NonNull},
    sync::{Once, OnceLock},
};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// [`BitmapHost`] over `android.graphics.Bitmap` objects of one JNI call.
pub struct AndroidHost<'l> {
    lib: &'l jnigraphics,
    env: *mut JNIEnv,
}

impl<'l> AndroidHost<'l> {
    /// # Safety
    ///
    /// `env` must be the JNI environment of the current thread and stay valid
    /// for the lifetime of the host.
    pub unsafe fn new(lib: &'l jnigraphics, env: *mut JNIEnv) -> Self {
        Self { lib, env }
    }
}

unsafe impl BitmapHost for AndroidHost<'_> {
    type Bitmap = jobject;

    fn info(&self, bitmap: &jobject) -> Result<BitmapInfo, FrameError> {
        let mut info = AndroidBitmapInfo::default();
        let ret = unsafe { self.lib.AndroidBitmap_getInfo(self.env, *bitmap, &mut info) };
        if ret != ANDROID_BITMAP_RESULT_SUCCESS {
            return Err(FrameError::LockFailed(format!(
                "AndroidBitmap_getInfo failed: {ret}"
            )));
        }
        Ok(info.into())
    }

    fn lock(&self, bitmap: &jobject) -> Result<NonNull<u8>, FrameError> {
        let mut addr = null_mut();
        let ret = unsafe { self.lib.AndroidBitmap_lockPixels(self.env, *bitmap, &mut addr) };
        if ret != ANDROID_BITMAP_RESULT_SUCCESS {
            return Err(FrameError::LockFailed(format!(
                "AndroidBitmap_lockPixels failed: {ret}"
            )));
        }
        match NonNull::new(addr.cast::<u8>()) {
            Some(ptr) => Ok(ptr),
            None => {
                self.unlock(bitmap);
                Err(FrameError::LockFailed("null pixel address".into()))
            }
        }
    }

    fn unlock(&self, bitmap: &jobject) {
        let ret = unsafe { self.lib.AndroidBitmap_unlockPixels(self.env, *bitmap) };
        if ret != ANDROID_BITMAP_RESULT_SUCCESS {
            warn!("AndroidBitmap_unlockPixels failed: {}", ret);
        }
    }
}

fn library() -> Option<&'static jnigraphics> {
    static LIB: OnceLock<Option<jnigraphics>> = OnceLock::new();
    LIB.get_or_init(|| match unsafe { jnigraphics::new(LIBJNIGRAPHICS) } {
        Ok(lib) => Some(lib),
        Err(e) => {
            error!("failed to load {}: {:?}", LIBJNIGRAPHICS, e);
            None
        }
    })
    .as_ref()
}

/// Logcat tag for everything the bridge logs on a device.
pub const LOG_TAG: &str = "EdgeDetection";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // the host may already have installed a subscriber
        #[cfg(target_os = "android")]
        {
            use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
            match tracing_android::layer(LOG_TAG) {
                Ok(layer) => {
                    let _ = tracing_subscriber::registry()
                        .with(layer.with_filter(filter))
                        .try_init();
                }
                Err(e) => eprintln!("logcat unavailable: {e}"),
            }
        }
        #[cfg(not(target_os = "android"))]
        {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        }
    });
}

unsafe fn dispatch(env: *mut JNIEnv, input: jobject, output: jobject, op: Operator) {
    init_logging();
    let Some(lib) = library() else {
        return;
    };
    let host = AndroidHost::new(lib, env);
    match catch_unwind(AssertUnwindSafe(|| run(&host, &input, &output, op))) {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => warn!("{} failed: {}", op.name(), e),
        Err(_) => error!("{} panicked", op.name()),
    }
}

/// # Safety
///
/// Called by the JVM with a valid environment and two live bitmap references.
#[no_mangle]
pub unsafe extern "C" fn Java_com_prerana_edgedetection_native_NativeProcessor_processFrame(
    env: *mut JNIEnv,
    _this: jobject,
    bitmap_in: jobject,
    bitmap_out: jobject,
) {
    dispatch(env, bitmap_in, bitmap_out, Operator::edge())
}

/// # Safety
///
/// Called by the JVM with a valid environment and two live bitmap references.
#[no_mangle]
pub unsafe extern "C" fn Java_com_prerana_edgedetection_native_NativeProcessor_convertToGrayscale(
    env: *mut JNIEnv,
    _this: jobject,
    bitmap_in: jobject,
    bitmap_out: jobject,
) {
    dispatch(env, bitmap_in, bitmap_out, Operator::Grayscale)
}
