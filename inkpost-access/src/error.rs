//! Error types for access decisions

use http::StatusCode;
use inkpost_api_types::{Capability, Operation, ParseEnumError, ResourceKind, Tier};
use inkpost_storage::DatabaseError;
use thiserror::Error;

/// Result type for access operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors surfaced by the access engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    /// The actor may not perform the operation
    #[error("Permission denied: {operation} on {resource} ({reason})")]
    AuthorizationDenied {
        operation: Operation,
        resource: String,
        reason: String,
    },

    /// Input or stored data breaks an integrity rule
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced post, comment or like does not exist
    #[error("Resource not found: {kind} {id}")]
    ResourceNotFound { kind: ResourceKind, id: i32 },

    /// The operation needs a signed-in actor
    #[error("Authentication required to {operation} {kind}")]
    UnauthenticatedRequired {
        operation: Operation,
        kind: ResourceKind,
    },

    /// Persistence failure
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

impl AccessError {
    pub fn denied(
        operation: Operation,
        resource: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::AuthorizationDenied {
            operation,
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: ResourceKind, id: i32) -> Self {
        Self::ResourceNotFound { kind, id }
    }

    pub fn unauthenticated(operation: Operation, kind: ResourceKind) -> Self {
        Self::UnauthenticatedRequired { operation, kind }
    }

    /// HTTP status an API layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthorizationDenied { .. } => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::UnauthenticatedRequired { .. } => StatusCode::UNAUTHORIZED,
            Self::Storage(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::AuthorizationDenied { .. })
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::UnauthenticatedRequired { .. })
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ResourceNotFound { .. } => true,
            Self::Storage(err) => err.is_not_found(),
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Integrity violations on posts and comments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A broader tier grants more than a narrower one
    #[error(
        "{} ({}) cannot grant more than {} ({})",
        .broader.field_name(),
        .broader_capability,
        .narrower.field_name(),
        .narrower_capability
    )]
    TierWidening {
        broader: Tier,
        broader_capability: Capability,
        narrower: Tier,
        narrower_capability: Capability,
    },

    #[error("{field} cannot be empty")]
    EmptyContent { field: &'static str },

    /// A tier value outside the capability vocabulary
    #[error("{field}: '{value}' is not a valid access level")]
    MalformedTier { field: String, value: String },

    #[error("{field} is {actual} characters, the maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl ValidationError {
    pub fn malformed_tier(tier: Tier, err: ParseEnumError) -> Self {
        Self::MalformedTier {
            field: tier.field_name().to_string(),
            value: err.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let denied =
            AccessError::denied(Operation::Update, "post_1", "public tier grants read_only");
        assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);
        assert!(denied.is_permission_denied());
        assert!(!denied.is_unauthenticated());

        let missing = AccessError::not_found(ResourceKind::Post, 9);
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        assert!(missing.is_not_found());

        let anonymous = AccessError::unauthenticated(Operation::Create, ResourceKind::Like);
        assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
        assert!(anonymous.is_unauthenticated());
        assert!(!anonymous.is_permission_denied());

        let invalid = AccessError::from(ValidationError::EmptyContent { field: "content" });
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert!(invalid.is_validation());

        let storage = AccessError::from(DatabaseError::constraint("duplicate like"));
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let storage_missing = AccessError::from(DatabaseError::not_found("post", 3));
        assert_eq!(storage_missing.status_code(), StatusCode::NOT_FOUND);
        assert!(storage_missing.is_not_found());
    }

    #[test]
    fn test_messages_use_singular_kinds() {
        let missing = AccessError::not_found(ResourceKind::Post, 99);
        assert_eq!(missing.to_string(), "Resource not found: post 99");

        let anonymous = AccessError::unauthenticated(Operation::Create, ResourceKind::Comment);
        assert_eq!(anonymous.to_string(), "Authentication required to create comment");
    }

    #[test]
    fn test_widening_message_names_fields() {
        let err = ValidationError::TierWidening {
            broader: Tier::Authenticated,
            broader_capability: Capability::ReadAndEdit,
            narrower: Tier::Team,
            narrower_capability: Capability::ReadOnly,
        };

        let message = err.to_string();
        assert!(message.contains("authenticated_access"));
        assert!(message.contains("team_access"));
    }

    #[test]
    fn test_malformed_tier_from_parse_error() {
        let parse_err = "sometimes".parse::<Capability>().unwrap_err();
        let err = ValidationError::malformed_tier(Tier::Public, parse_err);

        assert_eq!(
            err,
            ValidationError::MalformedTier {
                field: "public_access".to_string(),
                value: "sometimes".to_string(),
            }
        );
    }
}
