//! Logging utilities.
//!
//! Centralizes logger initialization so the demo binary and tests share one
//! setup path. Only the `log` facade is exposed to the rest of the crate.

mod init;

pub use init::{LoggingConfig, init_logging};
