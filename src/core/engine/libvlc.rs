//! Binding to the system libVLC
//!
//! Declares the subset of `vlc/libvlc.h` used by the instance and logging
//! layers. Enabled with the `libvlc` cargo feature.

use super::{Engine, LogCallback, RawInstance, RawLogContext, RawLogOrigin};
use crate::versioning::VersionId;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint, c_void};

#[link(name = "vlc")]
extern "C" {
    fn libvlc_new(argc: c_int, argv: *const *const c_char) -> *mut RawInstance;
    fn libvlc_release(p_instance: *mut RawInstance);
    fn libvlc_log_set(p_instance: *mut RawInstance, cb: LogCallback, data: *mut c_void);
    fn libvlc_log_unset(p_instance: *mut RawInstance);
    fn libvlc_log_set_file(p_instance: *mut RawInstance, stream: *mut libc::FILE);
    fn libvlc_log_get_context(
        ctx: *const RawLogContext,
        module: *mut *const c_char,
        file: *mut *const c_char,
        line: *mut c_uint,
    );
    fn libvlc_set_user_agent(p_instance: *mut RawInstance, name: *const c_char, http: *const c_char);
    fn libvlc_set_app_id(
        p_instance: *mut RawInstance,
        id: *const c_char,
        version: *const c_char,
        icon: *const c_char,
    );
    fn libvlc_get_version() -> *const c_char;
    fn libvlc_get_compiler() -> *const c_char;
    fn libvlc_get_changeset() -> *const c_char;
    fn libvlc_errmsg() -> *const c_char;
}

/// The linked libVLC (4.x headers)
pub enum LibVlc {}

unsafe fn static_cstr(p: *const c_char) -> &'static CStr {
    if p.is_null() {
        c""
    } else {
        CStr::from_ptr(p)
    }
}

unsafe impl Engine for LibVlc {
    const HEADER_VERSION: VersionId = VersionId::new(4, 0, 0, 0);

    unsafe fn new(argc: c_int, argv: *const *const c_char) -> *mut RawInstance {
        libvlc_new(argc, argv)
    }

    unsafe fn release(instance: *mut RawInstance) {
        libvlc_release(instance)
    }

    unsafe fn log_set(instance: *mut RawInstance, cb: LogCallback, data: *mut c_void) {
        libvlc_log_set(instance, cb, data)
    }

    unsafe fn log_unset(instance: *mut RawInstance) {
        libvlc_log_unset(instance)
    }

    unsafe fn log_set_file(instance: *mut RawInstance, stream: *mut libc::FILE) {
        libvlc_log_set_file(instance, stream)
    }

    unsafe fn log_context(ctx: *const RawLogContext) -> RawLogOrigin {
        let mut origin = RawLogOrigin::default();
        if !ctx.is_null() {
            libvlc_log_get_context(ctx, &mut origin.module, &mut origin.file, &mut origin.line);
        }
        origin
    }

    unsafe fn set_user_agent(instance: *mut RawInstance, name: *const c_char, http: *const c_char) {
        libvlc_set_user_agent(instance, name, http)
    }

    unsafe fn set_app_id(
        instance: *mut RawInstance,
        id: *const c_char,
        version: *const c_char,
        icon: *const c_char,
    ) {
        libvlc_set_app_id(instance, id, version, icon)
    }

    fn version() -> &'static CStr {
        unsafe { static_cstr(libvlc_get_version()) }
    }

    fn compiler() -> &'static CStr {
        unsafe { static_cstr(libvlc_get_compiler()) }
    }

    fn changeset() -> &'static CStr {
        unsafe { static_cstr(libvlc_get_changeset()) }
    }

    fn last_error() -> Option<&'static CStr> {
        let msg = unsafe { libvlc_errmsg() };
        if msg.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(msg) })
        }
    }
}

