//! # vlc-bridge - libVLC instance lifecycle and log routing
//!
//! `vlc-bridge` owns a libVLC instance handle and routes the engine's
//! diagnostic output to one of three sinks:
//!
//! - **Disabled**: nothing registered with the engine
//! - **Callback**: every message is formatted and handed to a closure
//! - **File**: the engine appends its log lines to a file
//!
//! Sink changes are safe against the engine's own threads logging
//! concurrently, and dropping an [`Instance`] always disables logging before
//! the native handle is released.
//!
//! ## Quick Start
//!
//! ```rust
//! use vlc_bridge::{Instance, StubEngine};
//!
//! # fn main() -> vlc_bridge::Result<()> {
//! let mut instance = Instance::<StubEngine>::create(&["--no-video"])?;
//!
//! // Route engine messages to tracing
//! instance.log_to_tracing();
//!
//! // Or to a file
//! let dir = tempfile::tempdir()?;
//! instance.log_to_file(dir.path().join("vlc.log"))?;
//!
//! println!("engine {}", Instance::<StubEngine>::version());
//! # Ok(())
//! # }
//! ```
//!
//! ## Engines
//!
//! [`StubEngine`] runs in-process and needs no native library. Enable the
//! `libvlc` feature to link the system libVLC and use [`VlcInstance`].

#[cfg(not(unix))]
compile_error!("vlc-bridge requires a Unix target (fdopen, vasprintf)");

pub mod config;
pub mod core;
pub mod error;
pub mod versioning;

pub use crate::config::{AppId, InstanceBuilder, InstanceConfig, UserAgent};
pub use crate::core::{
    engine::{
        stub::{StubEmitter, StubEngine, StubHook},
        Engine, LogCallback, RawInstance, RawLogContext, RawLogOrigin, VaList,
    },
    handle::NativeHandle,
    instance::Instance,
    log::{tracing_handler, LogFile, LogHandler, LogLevel, LogMode, LogRecord},
};
pub use crate::error::{Result, VlcError};
pub use crate::versioning::VersionId;

#[cfg(feature = "libvlc")]
pub use crate::core::engine::libvlc::LibVlc;

/// Instance bound to the system libVLC
#[cfg(feature = "libvlc")]
pub type VlcInstance = Instance<LibVlc>;
