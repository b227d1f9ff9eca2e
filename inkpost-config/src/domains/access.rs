//! Access decision configuration

use inkpost_api_types::TierSettings;
use serde::{Deserialize, Serialize};

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};

/// Settings that shape how access decisions are made
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Let an actor fall back to the best of every tier they qualify for
    /// instead of only the first matching tier
    #[serde(default = "crate::domains::utils::default_false")]
    pub tier_fallthrough: bool,

    /// Emit an info-level event for every denied decision
    #[serde(default = "crate::domains::utils::default_false")]
    pub audit_decisions: bool,

    /// Tier settings applied to new posts that do not specify them
    #[serde(default)]
    pub default_tiers: TierSettings,

    /// Characters kept in a post excerpt
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Maximum post title length in characters
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            tier_fallthrough: false,
            audit_decisions: false,
            default_tiers: TierSettings::default(),
            excerpt_length: default_excerpt_length(),
            max_title_length: default_max_title_length(),
        }
    }
}

impl AccessConfig {
    pub fn with_tier_fallthrough(mut self, enabled: bool) -> Self {
        self.tier_fallthrough = enabled;
        self
    }

    pub fn with_default_tiers(mut self, tiers: TierSettings) -> Self {
        self.default_tiers = tiers;
        self
    }
}

impl Validatable for AccessConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.excerpt_length, "excerpt_length", self.domain_name())?;
        validate_positive(self.max_title_length, "max_title_length", self.domain_name())?;

        // Defaults are copied onto new posts, so they must already be consistent
        if let Some((broader, narrower)) = self.default_tiers.widening_violations().next() {
            return Err(self.validation_error(format!(
                "default_tiers: {} ({}) grants more than {} ({})",
                broader.field_name(),
                self.default_tiers.get(broader),
                narrower.field_name(),
                self.default_tiers.get(narrower),
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "access"
    }
}

fn default_excerpt_length() -> usize {
    200
}

fn default_max_title_length() -> usize {
    255
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpost_api_types::Capability;

    #[test]
    fn test_access_config_defaults() {
        let config = AccessConfig::default();
        assert!(!config.tier_fallthrough);
        assert!(!config.audit_decisions);
        assert_eq!(config.excerpt_length, 200);
        assert_eq!(config.max_title_length, 255);
        assert_eq!(config.default_tiers, TierSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_widening_default_tiers() {
        let mut tiers = TierSettings::default();
        tiers.authenticated_access = Capability::ReadAndEdit;
        tiers.team_access = Capability::ReadOnly;
        let config = AccessConfig::default().with_default_tiers(tiers);

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("authenticated_access"));
        assert!(err.contains("team_access"));
    }

    #[test]
    fn test_rejects_zero_lengths() {
        let config = AccessConfig {
            excerpt_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parses_stored_tier_labels() {
        let yaml = r#"
tier_fallthrough: true
default_tiers:
  public_access: none
  authenticated_access: read only
  team_access: read and edit
"#;
        let config: AccessConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.tier_fallthrough);
        assert_eq!(config.default_tiers.public_access, Capability::None);
        assert_eq!(config.default_tiers.authenticated_access, Capability::ReadOnly);
        assert_eq!(config.default_tiers.owner_access, Capability::ReadAndEdit);
        assert_eq!(config.excerpt_length, 200);
    }
}
