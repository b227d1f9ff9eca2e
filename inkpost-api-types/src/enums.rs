use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored enum value cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Access level granted at a tier.
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// `none < read_only < read_and_edit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    #[default]
    None,
    #[serde(alias = "read only")]
    ReadOnly,
    #[serde(alias = "read and edit")]
    ReadAndEdit,
}

impl Capability {
    pub const fn allows_read(self) -> bool {
        matches!(self, Capability::ReadOnly | Capability::ReadAndEdit)
    }

    pub const fn allows_edit(self) -> bool {
        matches!(self, Capability::ReadAndEdit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::None => "none",
            Capability::ReadOnly => "read_only",
            Capability::ReadAndEdit => "read_and_edit",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ParseEnumError;

    // Older rows store the human labels ("read only"), newer ones the snake_case keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Capability::None),
            "read_only" | "read only" => Ok(Capability::ReadOnly),
            "read_and_edit" | "read and edit" => Ok(Capability::ReadAndEdit),
            _ => Err(ParseEnumError {
                kind: "capability",
                value: s.to_string(),
            }),
        }
    }
}

/// Relationship of an actor to a post, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Owner,
    Team,
    Authenticated,
    Public,
}

impl Tier {
    /// All tiers, most trusted first
    pub const PRECEDENCE: [Tier; 4] = [Tier::Owner, Tier::Team, Tier::Authenticated, Tier::Public];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Owner => "owner",
            Tier::Team => "team",
            Tier::Authenticated => "authenticated",
            Tier::Public => "public",
        }
    }

    /// Name of the post field holding this tier's capability
    pub fn field_name(&self) -> &'static str {
        match self {
            Tier::Owner => "owner_access",
            Tier::Team => "team_access",
            Tier::Authenticated => "authenticated_access",
            Tier::Public => "public_access",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation requested on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Read,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of resource the engine can authorize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Post,
    Comment,
    Like,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Post => "post",
            ResourceKind::Comment => "comment",
            ResourceKind::Like => "like",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
