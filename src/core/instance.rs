//! Engine instance with routed logging
//!
//! An [`Instance`] owns a [`NativeHandle`] and the [`LogRouter`] the engine
//! calls back into. Sink transitions take `&mut self`, so they are
//! serialized by ownership; the router lock serializes them against engine
//! threads.
//!
//! Native register/unregister calls are made *after* the router lock is
//! released: the engine waits for in-flight callbacks before switching, and
//! those callbacks may be waiting on the router lock. The sink is always
//! swapped first, so a callback racing with the switch sees the new sink and
//! drops its message instead of reaching a handler that was just removed.

use crate::core::engine::{Engine, RawInstance};
use crate::core::handle::{to_cstrings, NativeHandle};
use crate::core::log::{
    log_trampoline, tracing_handler, LogFile, LogHandler, LogMode, LogRecord, LogRouter, LogSink,
};
use crate::error::Result;
use crate::versioning::VersionId;
use std::borrow::Cow;
use std::os::raw::c_void;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// An initialized engine instance
///
/// Dropping it disables logging (unregistering any callback, closing any log
/// file) and then releases the native handle.
///
/// # Examples
///
/// ```rust
/// use vlc_bridge::{Instance, LogMode, StubEngine};
///
/// # fn main() -> vlc_bridge::Result<()> {
/// let mut instance = Instance::<StubEngine>::create(&["--no-video"])?;
/// instance.on_log(|record| println!("[{}] {:?}", record.level, record.message));
/// assert_eq!(instance.log_mode(), LogMode::Callback);
/// # Ok(())
/// # }
/// ```
pub struct Instance<E: Engine> {
    // Dropped before `router`: the engine must be gone before its context is.
    handle: NativeHandle<E>,
    router: Box<LogRouter>,
}

impl<E: Engine> Instance<E> {
    /// Create an instance with engine command-line `args`
    ///
    /// # Errors
    ///
    /// `Initialization` when the engine rejects the arguments.
    pub fn create<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let handle = NativeHandle::acquire(args)?;
        info!("Created engine instance ({} argument(s))", args.len());
        Ok(Instance {
            handle,
            router: Box::new(LogRouter::new()),
        })
    }

    /// Create an instance with no arguments
    pub fn new() -> Result<Self> {
        Self::create::<&str>(&[])
    }

    /// Raw engine pointer, valid for the lifetime of `self`
    pub fn as_raw(&self) -> *mut RawInstance {
        self.handle.as_ptr()
    }

    fn router_ptr(&self) -> *mut c_void {
        &*self.router as *const LogRouter as *mut c_void
    }

    /// Which sink currently receives engine logs
    pub fn log_mode(&self) -> LogMode {
        self.router.mode()
    }

    /// Route engine logs to `handler`, or disable callback logging with `None`
    ///
    /// Replacing an active callback swaps the handler without touching the
    /// engine registration. Switching from file mode closes the file once the
    /// engine has moved to the callback.
    pub fn set_log_callback(&mut self, handler: Option<LogHandler>) {
        let Some(handler) = handler else {
            if self.router.mode() == LogMode::Callback {
                self.disable_logging();
            }
            return;
        };

        let handler = match self.router.swap_handler(handler) {
            Ok(_previous) => {
                debug!("Replaced log callback");
                return;
            }
            Err(handler) => handler,
        };

        let previous = self.router.replace(LogSink::Callback(handler));
        unsafe { E::log_set(self.as_raw(), log_trampoline::<E>, self.router_ptr()) };
        debug!("Log sink {:?} -> Callback", previous);
    }

    /// Route engine logs to a closure
    pub fn on_log<F>(&mut self, handler: F)
    where
        F: Fn(&LogRecord<'_>) + Send + Sync + 'static,
    {
        self.set_log_callback(Some(Arc::new(handler)));
    }

    /// Forward engine logs to `tracing` under target `vlc`
    pub fn log_to_tracing(&mut self) {
        self.set_log_callback(Some(tracing_handler()));
    }

    /// Let the engine append its log lines to `path`, or stop file logging
    ///
    /// The new file is opened before anything else changes; if that fails
    /// the current sink stays exactly as it was.
    ///
    /// # Errors
    ///
    /// `InvalidLogTarget` or `LogTarget` when the file cannot be opened for
    /// append.
    pub fn set_log_file<P: AsRef<Path>>(&mut self, path: Option<P>) -> Result<()> {
        let Some(path) = path else {
            if self.router.mode() == LogMode::File {
                self.disable_logging();
            }
            return Ok(());
        };

        let file = match LogFile::open_append(path.as_ref()) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Keeping current log sink: {}", e);
                return Err(e);
            }
        };

        let stream = file.as_ptr();
        let previous = self.router.replace(LogSink::File(file));
        unsafe { E::log_set_file(self.as_raw(), stream) };
        debug!("Log sink {:?} -> File({:?})", previous, path.as_ref());
        Ok(())
    }

    /// Shorthand for `set_log_file(Some(path))`
    pub fn log_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.set_log_file(Some(path))
    }

    /// Unregister whatever sink is active and close any log file
    pub fn disable_logging(&mut self) {
        let previous = self.router.replace(LogSink::Disabled);
        if matches!(previous, LogSink::Disabled) {
            return;
        }
        unsafe { E::log_unset(self.as_raw()) };
        debug!("Log sink {:?} -> Disabled", previous);
    }

    /// Set the application name and HTTP user agent the engine reports
    pub fn set_user_agent(&self, name: &str, http: &str) -> Result<()> {
        let strings = to_cstrings(&[name, http])?;
        unsafe { E::set_user_agent(self.as_raw(), strings[0].as_ptr(), strings[1].as_ptr()) };
        Ok(())
    }

    /// Set the application identifier, version and icon name
    pub fn set_app_id(&self, id: &str, version: &str, icon: &str) -> Result<()> {
        let strings = to_cstrings(&[id, version, icon])?;
        unsafe {
            E::set_app_id(
                self.as_raw(),
                strings[0].as_ptr(),
                strings[1].as_ptr(),
                strings[2].as_ptr(),
            )
        };
        Ok(())
    }

    /// Engine version string, e.g. `"3.0.20 Vetinari"`
    pub fn version() -> Cow<'static, str> {
        E::version().to_string_lossy()
    }

    /// Compiler used to build the engine
    pub fn compiler() -> Cow<'static, str> {
        E::compiler().to_string_lossy()
    }

    /// Source changeset of the engine build
    pub fn changeset() -> Cow<'static, str> {
        E::changeset().to_string_lossy()
    }

    /// Engine version this crate's declarations were written against
    pub fn header_version() -> VersionId {
        VersionId::current::<E>()
    }

    /// Version reported by the linked engine at run time
    pub fn runtime_version() -> Result<VersionId> {
        Self::version().parse()
    }
}

impl<E: Engine> Drop for Instance<E> {
    fn drop(&mut self) {
        self.disable_logging();
        info!("Tearing down engine instance");
    }
}

impl<E: Engine> std::fmt::Debug for Instance<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("handle", &self.handle)
            .field("log_mode", &self.log_mode())
            .finish()
    }
}
