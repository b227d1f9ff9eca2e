//! Domain-driven configuration management for Inkpost
//!
//! Configuration is split by functional domain (access decisions, logging),
//! each with its own defaults and validation, and can be loaded from YAML
//! with `INKPOST_*` environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    access::AccessConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    InkpostConfig,
};
