//! Owned engine instance handle

use crate::core::engine::{Engine, RawInstance};
use crate::error::{Result, VlcError};
use std::ffi::CString;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_int};
use std::ptr::{self, NonNull};
use tracing::{debug, warn};

/// A live `libvlc_instance_t`, released exactly once on drop
pub struct NativeHandle<E: Engine> {
    raw: NonNull<RawInstance>,
    _engine: PhantomData<E>,
}

// libVLC instances are reference counted and thread-safe.
unsafe impl<E: Engine> Send for NativeHandle<E> {}
unsafe impl<E: Engine> Sync for NativeHandle<E> {}

/// Convert strings to owned C strings, rejecting interior NULs
pub(crate) fn to_cstrings<S: AsRef<str>>(items: &[S]) -> Result<Vec<CString>> {
    items
        .iter()
        .map(|s| {
            CString::new(s.as_ref())
                .map_err(|_| VlcError::InvalidArgument(format!("{:?} contains a NUL byte", s.as_ref())))
        })
        .collect()
}

impl<E: Engine> NativeHandle<E> {
    /// Initialize an engine instance with `args`
    ///
    /// The C strings and pointer array live only for the duration of the
    /// init call and are freed on every path.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if an argument is not representable as a C string,
    /// `Initialization` if the engine returns no instance.
    pub fn acquire<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let owned = to_cstrings(args)?;
        let argc = c_int::try_from(owned.len())
            .map_err(|_| VlcError::InvalidArgument(format!("too many arguments: {}", owned.len())))?;

        let mut argv: Vec<*const c_char> = owned.iter().map(|a| a.as_ptr()).collect();
        argv.push(ptr::null());

        let raw = unsafe { E::new(argc, argv.as_ptr()) };

        match NonNull::new(raw) {
            Some(raw) => {
                debug!("Engine instance acquired with {} argument(s)", argc);
                Ok(NativeHandle {
                    raw,
                    _engine: PhantomData,
                })
            }
            None => {
                let reason = E::last_error().map(|m| m.to_string_lossy().into_owned());
                let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();
                warn!("Engine rejected arguments {:?}: {:?}", args, reason);
                Err(VlcError::Initialization { args, reason })
            }
        }
    }

    pub fn as_ptr(&self) -> *mut RawInstance {
        self.raw.as_ptr()
    }

    /// Release the instance now
    pub fn release(self) {
        drop(self)
    }
}

impl<E: Engine> Drop for NativeHandle<E> {
    fn drop(&mut self) {
        debug!("Releasing engine instance");
        unsafe { E::release(self.raw.as_ptr()) }
    }
}

impl<E: Engine> std::fmt::Debug for NativeHandle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NativeHandle").field(&self.raw).finish()
    }
}
