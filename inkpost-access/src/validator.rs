//! Integrity checks on posts and comments before they are persisted

use inkpost_api_types::{Capability, Post, Tier, TierSettings};
use inkpost_config::AccessConfig;

use crate::error::ValidationError;

/// Rejects posts whose tiers widen access toward broader audiences, and
/// fields that are empty or too long.
///
/// The widening rule covers `authenticated <= team <= owner`. Public access
/// is a separate publishing switch and is not ordered against the others.
#[derive(Debug, Clone)]
pub struct ConsistencyValidator {
    max_title_length: usize,
}

impl Default for ConsistencyValidator {
    fn default() -> Self {
        Self::new(&AccessConfig::default())
    }
}

impl ConsistencyValidator {
    pub fn new(config: &AccessConfig) -> Self {
        Self {
            max_title_length: config.max_title_length,
        }
    }

    /// Check the tier ordering, reporting the first violated pair
    pub fn validate_tiers(&self, tiers: &TierSettings) -> Result<(), ValidationError> {
        match tiers.widening_violations().next() {
            Some((broader, narrower)) => Err(ValidationError::TierWidening {
                broader,
                broader_capability: tiers.get(broader),
                narrower,
                narrower_capability: tiers.get(narrower),
            }),
            None => Ok(()),
        }
    }

    /// Full check of a post about to be created or updated
    pub fn validate(&self, post: &Post) -> Result<(), ValidationError> {
        self.validate_tiers(&post.tiers)?;
        self.validate_title(&post.title)?;
        Self::validate_content("content", &post.content)
    }

    pub fn validate_title(&self, title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyContent { field: "title" });
        }

        let actual = title.chars().count();
        if actual > self.max_title_length {
            return Err(ValidationError::FieldTooLong {
                field: "title",
                max: self.max_title_length,
                actual,
            });
        }
        Ok(())
    }

    /// Non-whitespace text is required for post bodies and comments
    pub fn validate_content(field: &'static str, content: &str) -> Result<(), ValidationError> {
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyContent { field });
        }
        Ok(())
    }

    /// Parse a stored tier value, accepting both the snake_case keys and
    /// the older human labels
    pub fn parse_capability(tier: Tier, raw: &str) -> Result<Capability, ValidationError> {
        raw.parse::<Capability>()
            .map_err(|err| ValidationError::malformed_tier(tier, err))
    }

    /// Build and check tier settings from raw stored values, one per tier
    pub fn parse_tiers(
        &self,
        public: &str,
        authenticated: &str,
        team: &str,
        owner: &str,
    ) -> Result<TierSettings, ValidationError> {
        let tiers = TierSettings::new(
            Self::parse_capability(Tier::Public, public)?,
            Self::parse_capability(Tier::Authenticated, authenticated)?,
            Self::parse_capability(Tier::Team, team)?,
            Self::parse_capability(Tier::Owner, owner)?,
        );
        self.validate_tiers(&tiers)?;
        Ok(tiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpost_storage::testing::PostBuilder;

    #[test]
    fn test_default_tiers_are_consistent() {
        let validator = ConsistencyValidator::default();
        assert!(validator.validate_tiers(&TierSettings::default()).is_ok());
    }

    #[test]
    fn test_authenticated_wider_than_team_is_rejected() {
        let validator = ConsistencyValidator::default();
        let tiers = TierSettings::new(
            Capability::ReadOnly,
            Capability::ReadAndEdit,
            Capability::ReadOnly,
            Capability::ReadAndEdit,
        );

        let err = validator.validate_tiers(&tiers).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TierWidening {
                broader: Tier::Authenticated,
                broader_capability: Capability::ReadAndEdit,
                narrower: Tier::Team,
                narrower_capability: Capability::ReadOnly,
            }
        );
    }

    #[test]
    fn test_team_wider_than_owner_is_rejected() {
        let validator = ConsistencyValidator::default();
        let tiers = TierSettings::new(
            Capability::None,
            Capability::None,
            Capability::ReadAndEdit,
            Capability::ReadOnly,
        );

        assert!(matches!(
            validator.validate_tiers(&tiers),
            Err(ValidationError::TierWidening {
                broader: Tier::Team,
                narrower: Tier::Owner,
                ..
            })
        ));
    }

    #[test]
    fn test_public_is_not_ordered() {
        let validator = ConsistencyValidator::default();
        let tiers = TierSettings::new(
            Capability::ReadAndEdit,
            Capability::None,
            Capability::None,
            Capability::None,
        );
        assert!(validator.validate_tiers(&tiers).is_ok());
    }

    #[test]
    fn test_title_rules() {
        let validator = ConsistencyValidator::new(&AccessConfig {
            max_title_length: 5,
            ..AccessConfig::default()
        });

        assert!(validator.validate_title("Hello").is_ok());
        assert_eq!(
            validator.validate_title("   "),
            Err(ValidationError::EmptyContent { field: "title" })
        );
        assert_eq!(
            validator.validate_title("Héllo!"),
            Err(ValidationError::FieldTooLong {
                field: "title",
                max: 5,
                actual: 6,
            })
        );
    }

    #[test]
    fn test_validate_post() {
        let validator = ConsistencyValidator::default();
        let post = PostBuilder::new().build();
        assert!(validator.validate(&post).is_ok());

        let blank = PostBuilder::new().with_content(" \n ").build();
        assert_eq!(
            validator.validate(&blank),
            Err(ValidationError::EmptyContent { field: "content" })
        );
    }

    #[test]
    fn test_parse_tiers_accepts_both_spellings() {
        let validator = ConsistencyValidator::default();
        let tiers = validator
            .parse_tiers("read only", "read_only", "read and edit", "READ_AND_EDIT")
            .unwrap();
        assert_eq!(tiers, TierSettings::default());

        let err = validator
            .parse_tiers("read only", "sometimes", "none", "none")
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedTier {
                field: "authenticated_access".to_string(),
                value: "sometimes".to_string(),
            }
        );
    }
}
