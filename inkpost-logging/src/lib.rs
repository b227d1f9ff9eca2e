//! Structured logging setup for Inkpost
//!
//! The engine crates only emit `tracing` events; this crate installs the
//! global subscriber that renders them, driven by the `logging` domain of
//! the Inkpost configuration.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
pub use inkpost_config::{LogFormat, LogLevel, LoggingConfig};
