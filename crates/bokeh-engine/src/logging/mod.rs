//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else in the crate logs
//! through the `log` facade only, so a host engine can plug in its own backend.

mod init;

pub use init::{init_logging, LoggingConfig};
