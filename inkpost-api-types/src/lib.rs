//! Shared types for the Inkpost blog permission engine
//!
//! This crate holds the identifiers, tier/capability enums and blog entities
//! (posts, comments, likes) that the storage layer and the access engine
//! both speak, so neither has to depend on the other for its vocabulary.

pub mod domain;
pub mod enums;
pub mod ids;

// Re-export main types for convenience
pub use domain::{Child, Comment, Like, NewPost, Post, PostPatch, TierOverrides, TierSettings};
pub use enums::{Capability, Operation, ParseEnumError, ResourceKind, Tier};
pub use ids::{CommentId, LikeId, PostId, TeamId, UserId};
