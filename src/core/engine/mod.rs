//! Native engine boundary
//!
//! [`Engine`] is the set of libVLC entry points this crate drives, expressed as
//! associated functions over raw pointers. [`libvlc::LibVlc`] binds the real
//! library; [`stub::StubEngine`] is an in-process engine for tests and for
//! builds without libVLC installed.

#[cfg(feature = "libvlc")]
pub mod libvlc;
pub mod stub;

use crate::versioning::VersionId;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint, c_void};

/// Opaque engine instance (`libvlc_instance_t`)
#[repr(C)]
pub struct RawInstance {
    _private: [u8; 0],
}

/// Opaque per-message log context (`libvlc_log_t`)
#[repr(C)]
pub struct RawLogContext {
    _private: [u8; 0],
}

/// C `va_list` as received by a log callback
///
/// On every supported target a `va_list` parameter travels as a single pointer
/// (x86_64 decays the array type, AArch64 passes the struct by reference,
/// Apple targets use `char *`), so it is carried through untouched.
pub type VaList = *mut c_void;

/// `libvlc_log_cb`
pub type LogCallback = unsafe extern "C" fn(
    data: *mut c_void,
    level: c_int,
    ctx: *const RawLogContext,
    fmt: *const c_char,
    args: VaList,
);

/// Source location attached to a log message by the engine
#[derive(Debug, Clone, Copy)]
pub struct RawLogOrigin {
    pub module: *const c_char,
    pub file: *const c_char,
    pub line: c_uint,
}

impl Default for RawLogOrigin {
    fn default() -> Self {
        RawLogOrigin {
            module: std::ptr::null(),
            file: std::ptr::null(),
            line: 0,
        }
    }
}

/// The engine entry points used by [`crate::Instance`]
///
/// # Safety
///
/// Implementors must uphold libVLC's contracts: `new` returns either null or
/// a handle valid until `release`; `log_set` routes every message to `cb` with
/// the given `data` until `log_unset`, `log_set_file` or `release`; and
/// `log_unset`, `log_set` and `log_set_file` do not return while a previously
/// registered callback is still executing.
pub unsafe trait Engine: 'static {
    /// Version of the headers this binding was compiled against
    const HEADER_VERSION: VersionId;

    /// `libvlc_new`
    unsafe fn new(argc: c_int, argv: *const *const c_char) -> *mut RawInstance;

    /// `libvlc_release`
    unsafe fn release(instance: *mut RawInstance);

    /// `libvlc_log_set`
    unsafe fn log_set(instance: *mut RawInstance, cb: LogCallback, data: *mut c_void);

    /// `libvlc_log_unset`
    unsafe fn log_unset(instance: *mut RawInstance);

    /// `libvlc_log_set_file`
    unsafe fn log_set_file(instance: *mut RawInstance, stream: *mut libc::FILE);

    /// `libvlc_log_get_context`
    unsafe fn log_context(ctx: *const RawLogContext) -> RawLogOrigin;

    /// `libvlc_set_user_agent`
    unsafe fn set_user_agent(instance: *mut RawInstance, name: *const c_char, http: *const c_char);

    /// `libvlc_set_app_id`
    unsafe fn set_app_id(
        instance: *mut RawInstance,
        id: *const c_char,
        version: *const c_char,
        icon: *const c_char,
    );

    /// `libvlc_get_version`
    fn version() -> &'static CStr;

    /// `libvlc_get_compiler`
    fn compiler() -> &'static CStr;

    /// `libvlc_get_changeset`
    fn changeset() -> &'static CStr;

    /// `libvlc_errmsg`, if the engine recorded one on this thread
    fn last_error() -> Option<&'static CStr> {
        None
    }
}
