//! Engine binding, handle ownership and log routing

pub mod engine;
pub mod handle;
pub mod instance;
pub mod log;
