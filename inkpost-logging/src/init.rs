use anyhow::{Context, Result};
use inkpost_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Build the event filter for a logging configuration.
///
/// `RUST_LOG` is only consulted when the configured directives are invalid.
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directive = config.filter_directive();
    EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_from_default_env())
        .with_context(|| format!("Invalid log filter '{}'", directive))
}

/// Initialize the global subscriber from configuration
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    // Use try_init to avoid panic if global subscriber already set
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpost_config::LogLevel;

    #[test]
    fn test_env_filter_from_config() {
        let mut config = LoggingConfig::default();
        config.level = LogLevel::Debug;
        config.directives.push("inkpost_access=trace".to_string());

        let filter = build_env_filter(&config).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("inkpost_access=trace"));
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_simple_tracing("info").unwrap();
        init_simple_tracing("debug").unwrap();
        init_logging_from_config(&LoggingConfig::default()).unwrap();
    }
}
