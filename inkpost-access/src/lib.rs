//! Access control for Inkpost posts, comments and likes
//!
//! This crate decides who may read and change blog content:
//! - Four access tiers per post (owner, team, authenticated, public)
//!   resolved first-match, with an optional fallthrough mode
//! - A superuser override that bypasses stored tier settings
//! - Comments and likes governed by their parent post
//! - Tier consistency validation before anything is persisted
//! - List filtering that agrees with single-resource checks

pub mod auth;
pub mod error;
pub mod filter;
pub mod graph;
pub mod permissions;
pub mod policy;
pub mod service;
pub mod tier;
pub mod validator;

pub use auth::{Actor, ActorBuilder, AnonymousSuperuser};
pub use error::{AccessError, AccessResult, ValidationError};
pub use filter::{ChildFilter, QueryFilter};
pub use graph::{HydratedPost, ResourceGraph};
pub use permissions::PermissionChecker;
pub use policy::{AccessPolicy, Basis, Decision, Resource};
pub use service::{AccessService, Engagement, LikeToggle};
pub use tier::{TierGrant, TierResolver};
pub use validator::ConsistencyValidator;

/// Re-export commonly used types
pub use inkpost_api_types::{Capability, Operation, ResourceKind, Tier, TierSettings};
pub use inkpost_config::AccessConfig;
