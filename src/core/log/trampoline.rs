//! Native log callback
//!
//! The engine calls [`log_trampoline`] from its own threads with the router
//! address as `data`. Formatting happens before the sink lock is taken; the
//! handler runs under it.

use super::{LogLevel, LogRecord, LogRouter};
use crate::core::engine::{Engine, RawLogContext, VaList};
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;

extern "C" {
    fn vasprintf(strp: *mut *mut c_char, fmt: *const c_char, ap: VaList) -> c_int;
}

/// Render the engine's format string into an owned string
///
/// Returns `None` on a null format or when `vasprintf` fails.
unsafe fn format_message(fmt: *const c_char, args: VaList) -> Option<String> {
    if fmt.is_null() {
        return None;
    }

    let mut out: *mut c_char = ptr::null_mut();
    if vasprintf(&mut out, fmt, args) < 0 || out.is_null() {
        return None;
    }

    let text = CStr::from_ptr(out).to_string_lossy().into_owned();
    libc::free(out as *mut c_void);
    Some(text)
}

unsafe fn borrowed_str<'a>(p: *const c_char) -> Option<&'a str> {
    if p.is_null() {
        None
    } else {
        CStr::from_ptr(p).to_str().ok()
    }
}

/// `libvlc_log_cb` registered for callback-mode sinks
///
/// # Safety
///
/// `data` must be the address of a live [`LogRouter`]. The instance keeps it
/// alive until the engine no longer calls back (logging is disabled before
/// the router or the native handle goes away).
pub(crate) unsafe extern "C" fn log_trampoline<E: Engine>(
    data: *mut c_void,
    level: c_int,
    ctx: *const RawLogContext,
    fmt: *const c_char,
    args: VaList,
) {
    if data.is_null() {
        return;
    }

    let message = format_message(fmt, args);
    let origin = E::log_context(ctx);
    let router = &*(data as *const LogRouter);

    let record = LogRecord {
        level: LogLevel::from_raw(level),
        message: message.as_deref(),
        module: borrowed_str(origin.module),
        file: borrowed_str(origin.file),
        line: (origin.line > 0).then_some(origin.line),
    };

    if catch_unwind(AssertUnwindSafe(|| router.dispatch(&record))).is_err() {
        tracing::warn!("Log handler panicked; engine message dropped");
    }
}
