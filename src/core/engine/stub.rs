//! In-process engine
//!
//! `StubEngine` implements the [`Engine`] contract without libVLC: it validates
//! arguments against a small option table, keeps per-instance log routing
//! behind a reader/writer lock (emitters read, registration writes, exactly as
//! libVLC's logger does), and lets any thread emit messages through a
//! [`StubEmitter`].

use super::{Engine, LogCallback, RawInstance, RawLogContext, RawLogOrigin};
use crate::core::instance::Instance;
use crate::core::log::LogLevel;
use crate::versioning::VersionId;
use parking_lot::{Mutex, RwLock};
use std::cell::Cell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Options the stub accepts, with or without `=value`
const KNOWN_OPTIONS: &[&str] = &[
    "--no-video",
    "--no-audio",
    "--quiet",
    "--verbose",
    "--intf",
    "--vout",
    "--aout",
    "--network-caching",
    "--file-caching",
    "--no-media-library",
    "--no-stats",
    "--reset-plugins-cache",
];

const SHORT_OPTIONS: &[&str] = &["-q", "-v", "-vv", "-vvv"];

thread_local! {
    static LAST_ERROR: Cell<Option<&'static CStr>> = const { Cell::new(None) };
}

/// Engine implemented in-process
pub enum StubEngine {}

/// Which native hook a stub instance currently has installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubHook {
    None,
    Callback,
    File,
}

enum Hook {
    None,
    Callback { cb: LogCallback, data: *mut c_void },
    File(*mut libc::FILE),
}

// The hook only holds pointers the owner guarantees valid while registered.
unsafe impl Send for Hook {}
unsafe impl Sync for Hook {}

/// Context handed to the log callback as `RawLogContext`
#[repr(C)]
struct StubLogContext {
    module: CString,
    file: CString,
    line: c_uint,
}

struct StubInstance {
    args: Vec<String>,
    hook: RwLock<Hook>,
    user_agent: Mutex<Option<(String, String)>>,
    app_id: Mutex<Option<(String, String, String)>>,
    released: AtomicBool,
}

extern "C" {
    /// Calls `cb` with the trailing arguments packed into a `va_list`
    pub(crate) fn vlc_bridge_stub_log(
        cb: LogCallback,
        data: *mut c_void,
        level: c_int,
        ctx: *const RawLogContext,
        fmt: *const c_char,
        ...
    );
}

impl StubInstance {
    fn emit(&self, level: LogLevel, module: &str, message: Option<&CStr>) -> bool {
        self.deliver(level, module, message, |cb, data, level, ctx| unsafe {
            match message {
                Some(message) => {
                    vlc_bridge_stub_log(cb, data, level, ctx, c"%s".as_ptr(), message.as_ptr())
                }
                None => vlc_bridge_stub_log(cb, data, level, ctx, ptr::null()),
            }
        })
    }

    /// Hand one message to the installed hook
    ///
    /// `call` performs the callback invocation; `text` is what a file hook
    /// writes. Returns whether a hook consumed the message.
    fn deliver<F>(&self, level: LogLevel, module: &str, text: Option<&CStr>, call: F) -> bool
    where
        F: FnOnce(LogCallback, *mut c_void, c_int, *const RawLogContext),
    {
        if self.released.load(Ordering::Acquire) {
            return false;
        }

        let hook = self.hook.read();
        match &*hook {
            Hook::None => false,
            Hook::Callback { cb, data } => {
                let ctx = StubLogContext {
                    module: CString::new(module).unwrap_or_default(),
                    file: CString::new(file!()).unwrap_or_default(),
                    line: line!(),
                };
                call(
                    *cb,
                    *data,
                    level.as_raw(),
                    &ctx as *const StubLogContext as *const RawLogContext,
                );
                true
            }
            Hook::File(stream) => {
                let Some(text) = text else {
                    return false;
                };
                let line = format!("{} {}: {}\n", level.label(), module, text.to_string_lossy());
                let Ok(line) = CString::new(line) else {
                    return false;
                };
                unsafe {
                    libc::fputs(line.as_ptr(), *stream);
                    libc::fflush(*stream);
                }
                true
            }
        }
    }
}

fn option_is_known(arg: &str) -> bool {
    if SHORT_OPTIONS.contains(&arg) {
        return true;
    }
    let name = arg.split_once('=').map_or(arg, |(name, _)| name);
    KNOWN_OPTIONS.contains(&name)
}

unsafe fn stub_instance<'a>(instance: *mut RawInstance) -> &'a StubInstance {
    &*(instance as *const StubInstance)
}

unsafe fn lossy(p: *const c_char) -> String {
    if p.is_null() {
        String::new()
    } else {
        CStr::from_ptr(p).to_string_lossy().into_owned()
    }
}

unsafe impl Engine for StubEngine {
    const HEADER_VERSION: VersionId = VersionId::new(4, 0, 0, 0);

    unsafe fn new(argc: c_int, argv: *const *const c_char) -> *mut RawInstance {
        let mut args = Vec::with_capacity(argc.max(0) as usize);
        for i in 0..argc.max(0) as usize {
            let arg = lossy(*argv.add(i));
            if !option_is_known(&arg) {
                LAST_ERROR.with(|e| e.set(Some(c"unknown option")));
                return ptr::null_mut();
            }
            args.push(arg);
        }

        let inner = Arc::new(StubInstance {
            args,
            hook: RwLock::new(Hook::None),
            user_agent: Mutex::new(None),
            app_id: Mutex::new(None),
            released: AtomicBool::new(false),
        });
        Arc::into_raw(inner) as *mut RawInstance
    }

    unsafe fn release(instance: *mut RawInstance) {
        let inner = Arc::from_raw(instance as *const StubInstance);
        let already = inner.released.swap(true, Ordering::AcqRel);
        debug_assert!(!already, "stub instance released twice");
        *inner.hook.write() = Hook::None;
    }

    unsafe fn log_set(instance: *mut RawInstance, cb: LogCallback, data: *mut c_void) {
        *stub_instance(instance).hook.write() = Hook::Callback { cb, data };
    }

    unsafe fn log_unset(instance: *mut RawInstance) {
        *stub_instance(instance).hook.write() = Hook::None;
    }

    unsafe fn log_set_file(instance: *mut RawInstance, stream: *mut libc::FILE) {
        *stub_instance(instance).hook.write() = Hook::File(stream);
    }

    unsafe fn log_context(ctx: *const RawLogContext) -> RawLogOrigin {
        if ctx.is_null() {
            return RawLogOrigin::default();
        }
        let ctx = &*(ctx as *const StubLogContext);
        RawLogOrigin {
            module: ctx.module.as_ptr(),
            file: ctx.file.as_ptr(),
            line: ctx.line,
        }
    }

    unsafe fn set_user_agent(instance: *mut RawInstance, name: *const c_char, http: *const c_char) {
        *stub_instance(instance).user_agent.lock() = Some((lossy(name), lossy(http)));
    }

    unsafe fn set_app_id(
        instance: *mut RawInstance,
        id: *const c_char,
        version: *const c_char,
        icon: *const c_char,
    ) {
        *stub_instance(instance).app_id.lock() = Some((lossy(id), lossy(version), lossy(icon)));
    }

    fn version() -> &'static CStr {
        c"4.0.0-dev Stub"
    }

    fn compiler() -> &'static CStr {
        c"rustc"
    }

    fn changeset() -> &'static CStr {
        c"stub"
    }

    fn last_error() -> Option<&'static CStr> {
        LAST_ERROR.with(|e| e.take())
    }
}

impl StubEngine {
    /// Handle for emitting messages into `instance` from any thread
    pub fn emitter(instance: &Instance<StubEngine>) -> StubEmitter {
        let raw = instance.as_raw() as *const StubInstance;
        // SAFETY: `raw` came from `Arc::into_raw` in `new` and the instance
        // still holds that strong count.
        let inner = unsafe {
            Arc::increment_strong_count(raw);
            Arc::from_raw(raw)
        };
        StubEmitter { inner }
    }
}

/// Thread-safe message source bound to one stub instance
///
/// Stays valid after the instance is dropped; emitting then does nothing.
#[derive(Clone)]
pub struct StubEmitter {
    inner: Arc<StubInstance>,
}

impl StubEmitter {
    /// Emit `message` at `level`; returns whether a hook consumed it
    pub fn emit(&self, level: LogLevel, module: &str, message: &str) -> bool {
        match CString::new(message) {
            Ok(fmt) => self.inner.emit(level, module, Some(&fmt)),
            Err(_) => false,
        }
    }

    /// Emit a message with no format string, which cannot be formatted
    pub fn emit_unformattable(&self, level: LogLevel, module: &str) -> bool {
        self.inner.emit(level, module, None)
    }

    /// Emit through `call`, which invokes the registered callback with its
    /// own format string and arguments
    #[cfg(test)]
    pub(crate) fn emit_with<F>(&self, level: LogLevel, module: &str, call: F) -> bool
    where
        F: FnOnce(LogCallback, *mut c_void, c_int, *const RawLogContext),
    {
        self.inner.deliver(level, module, None, call)
    }

    pub fn hook(&self) -> StubHook {
        match &*self.inner.hook.read() {
            Hook::None => StubHook::None,
            Hook::Callback { .. } => StubHook::Callback,
            Hook::File(_) => StubHook::File,
        }
    }

    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::Acquire)
    }

    /// Arguments the instance was created with
    pub fn args(&self) -> Vec<String> {
        self.inner.args.clone()
    }

    pub fn user_agent(&self) -> Option<(String, String)> {
        self.inner.user_agent.lock().clone()
    }

    pub fn app_id(&self) -> Option<(String, String, String)> {
        self.inner.app_id.lock().clone()
    }
}
