//! Integration tests for inkpost-config

use inkpost_api_types::Capability;
use inkpost_config::*;
use std::io::Write;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = InkpostConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("INKPOST_TIER_FALLTHROUGH", Some("true")),
        ("INKPOST_AUDIT_DECISIONS", Some("true")),
        ("INKPOST_EXCERPT_LENGTH", Some("80")),
        ("INKPOST_LOG_LEVEL", Some("debug")),
        ("INKPOST_LOG_FORMAT", Some("json")),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert!(config.access.tier_fallthrough);
        assert!(config.access.audit_decisions);
        assert_eq!(config.access.excerpt_length, 80);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("INKPOST_TIER_FALLTHROUGH", Some("sometimes"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("TIER_FALLTHROUGH"));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("BLOG_LOG_LEVEL", Some("trace"))], || {
        let config = ConfigLoader::with_prefix("BLOG").from_env().unwrap();
        assert_eq!(config.logging.level, LogLevel::Trace);
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = InkpostConfig::generate_sample();

    // Parse it back
    let parsed: InkpostConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert!(!parsed.access.tier_fallthrough);
}

#[test]
fn test_config_from_file() {
    let yaml = r#"
access:
  tier_fallthrough: false
  audit_decisions: true
  default_tiers:
    public_access: none
    authenticated_access: read_only
    team_access: read_and_edit
    owner_access: read_and_edit
  max_title_length: 120

logging:
  level: warn
  format: compact
  directives:
    - inkpost_access=debug
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();

        assert!(config.access.audit_decisions);
        assert_eq!(config.access.default_tiers.public_access, Capability::None);
        assert_eq!(config.access.max_title_length, 120);
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert_eq!(config.logging.filter_directive(), "warn,inkpost_access=debug");
    });
}

#[test]
fn test_file_with_widening_defaults_is_rejected() {
    let yaml = r#"
access:
  default_tiers:
    authenticated_access: read_and_edit
    team_access: read_only
"#;

    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let err = ConfigLoader::new().from_yaml_str(yaml).unwrap_err();
        match err {
            ConfigError::DomainError { domain, message } => {
                assert_eq!(domain, "access");
                assert!(message.contains("authenticated_access"));
            }
            other => panic!("unexpected error: {other}"),
        }
    });
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ConfigLoader::new()
        .from_file("/definitely/not/here/inkpost.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}
