//! Configuration loading and environment variable handling

use crate::domains::InkpostConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "INKPOST".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<InkpostConfig> {
        let content = std::fs::read_to_string(path)?;
        self.from_yaml_str(&content)
    }

    /// Load configuration from YAML text with environment overrides
    pub fn from_yaml_str(&self, content: &str) -> ConfigResult<InkpostConfig> {
        let mut config: InkpostConfig = serde_yaml::from_str(content)?;

        // Apply environment variable overrides
        self.apply_env_overrides(&mut config)?;

        // Validate all domains
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<InkpostConfig> {
        let mut config = InkpostConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<InkpostConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut InkpostConfig) -> ConfigResult<()> {
        self.apply_access_overrides(&mut config.access)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply access config overrides
    fn apply_access_overrides(
        &self,
        config: &mut crate::domains::access::AccessConfig,
    ) -> ConfigResult<()> {
        if let Ok(fallthrough) = self.get_env_var("TIER_FALLTHROUGH") {
            config.tier_fallthrough = fallthrough
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid TIER_FALLTHROUGH: {}", e)))?;
        }

        if let Ok(audit) = self.get_env_var("AUDIT_DECISIONS") {
            config.audit_decisions = audit
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid AUDIT_DECISIONS: {}", e)))?;
        }

        if let Ok(length) = self.get_env_var("EXCERPT_LENGTH") {
            config.excerpt_length = length
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid EXCERPT_LENGTH: {}", e)))?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
