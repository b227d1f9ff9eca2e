use inkpost_logging::{init_logging_from_config, LogFormat, LogLevel, LoggingConfig};

#[test]
fn test_logging_config_integration() {
    let yaml_config = r#"
level: debug
format: json
include_location: true
directives:
  - inkpost_storage=warn
"#;

    let config: LoggingConfig = serde_yaml::from_str(yaml_config).unwrap();

    // Verify config was parsed correctly
    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);
    assert!(config.include_target);

    init_logging_from_config(&config).unwrap();
    tracing::info!(post_id = 7, "subscriber installed");

    // A second initialisation must not fail
    init_logging_from_config(&LoggingConfig::default()).unwrap();
}

#[test]
fn test_minimal_logging_config() {
    let config: LoggingConfig = serde_yaml::from_str("{}").unwrap();

    assert_eq!(config.level, LogLevel::Info);
    assert_eq!(config.format, LogFormat::Text);
    assert!(config.directives.is_empty());
}
