//! Storage abstraction and repository pattern for Inkpost
//!
//! The access engine never issues queries itself. It consumes hydrated
//! entities through the repository traits defined here, which keeps the
//! decision code free of I/O and lets any backend plug in.

pub mod error;
pub mod memory;
pub mod repositories;

#[cfg(feature = "testing")]
pub mod testing;

// Re-export core types for convenience
pub use error::{DatabaseError, StorageResult};
pub use memory::InMemoryBlogStore;
pub use repositories::{
    BlogStore, CascadeSummary, EngagementRepository, MembershipRepository, PostRepository,
    Repository,
};
