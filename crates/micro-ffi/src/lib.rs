//! C FFI bindings for micro numeric modules.
//!
//! Exposes module instances to C callers through opaque `u64` handles.
//! Every entry point returns a [`status::MicroStatus`] code (or a
//! documented sentinel), never writes out-parameters on error, and
//! catches panics at the boundary. The message of the last caught panic
//! on the calling thread is available from
//! [`micro_last_panic_message`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

thread_local! {
    /// Message of the most recent panic caught on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_owned()
    }
}

/// Run a body under `catch_unwind`, returning `$default` on panic.
///
/// `return` inside the body returns from the guarded closure, not the
/// enclosing function.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {{
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                let msg = $crate::panic_message(&*payload);
                tracing::error!(panic = %msg, "panic caught at FFI boundary");
                $crate::LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
                $default
            }
        }
    }};
}

/// `ffi_guard_or!` for bodies returning a status code.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::MicroStatus::Panicked as i32, $body)
    };
}

/// Lock a mutex or return `InternalError` from the enclosing body.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::MicroStatus::InternalError as i32,
        }
    };
}

pub mod config;
pub(crate) mod handle;
pub mod metrics;
pub mod module;
pub mod status;

pub use config::MicroModuleConfig;
pub use metrics::MicroMemoryMetrics;
pub use status::MicroStatus;

/// Copy the last caught panic message on this thread into `buf`.
///
/// Returns the full message length in bytes, excluding the terminator.
/// With a null `buf` or zero `cap` nothing is written, so the call can
/// size a buffer first. Otherwise at most `cap - 1` bytes are copied and
/// the result is nul-terminated. Returns 0 when no panic was recorded.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn micro_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: buf is valid for cap bytes per caller contract, and
            // n + 1 <= cap.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, n);
                *buf.add(n) = 0;
            }
        }
        bytes.len().min(i32::MAX as usize) as i32
    })
}
