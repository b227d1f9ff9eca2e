//! Testing utilities for inkpost-storage
//!
//! - Mock repository implementations using mockall
//! - Test data builders with the builder pattern
//!
//! Enable with the `testing` feature:
//!
//! ```toml
//! [dev-dependencies]
//! inkpost-storage = { path = "../inkpost-storage", features = ["testing"] }
//! ```

pub mod builders;
pub mod mocks;

pub use builders::{CommentBuilder, LikeBuilder, PostBuilder};
pub use mocks::MockStore;
