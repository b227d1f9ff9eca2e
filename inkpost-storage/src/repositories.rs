//! Repository interfaces consumed by the access engine
//!
//! These traits are the persistence collaborator contract: fetch a post,
//! fetch an author's teams, fetch a post's children, and delete a post
//! together with everything it owns. Mutation helpers for comments and
//! likes live here as well so the service layer can stay backend-agnostic.

use async_trait::async_trait;
use inkpost_api_types::{
    Child, Comment, CommentId, Like, LikeId, Post, PostId, TeamId, UserId,
};
use std::collections::BTreeSet;

use crate::error::StorageResult;

/// Outcome of deleting a post and everything it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeSummary {
    pub post_id: PostId,
    pub comments_removed: usize,
    pub likes_removed: usize,
}

/// Base repository trait with health check capability
#[async_trait]
pub trait Repository: Send + Sync {
    /// Check if the repository is healthy and can serve requests
    async fn health_check(&self) -> StorageResult<()>;
}

/// Post storage
#[async_trait]
pub trait PostRepository: Repository {
    async fn fetch_post(&self, id: PostId) -> StorageResult<Option<Post>>;

    /// Every stored post, ordered by id
    async fn fetch_posts(&self) -> StorageResult<Vec<Post>>;

    /// Store a new post; the id on the input is ignored and assigned by the store
    async fn create_post(&self, post: Post) -> StorageResult<Post>;

    /// Replace an existing post
    async fn update_post(&self, post: Post) -> StorageResult<Post>;

    /// Delete a post together with its comments and likes
    async fn delete_cascade(&self, id: PostId) -> StorageResult<CascadeSummary>;
}

/// Comment and like storage
#[async_trait]
pub trait EngagementRepository: Repository {
    /// Comments and likes owned by a post
    async fn fetch_children(&self, post_id: PostId) -> StorageResult<Vec<Child>>;

    async fn fetch_comment(&self, id: CommentId) -> StorageResult<Option<Comment>>;

    async fn fetch_like(&self, id: LikeId) -> StorageResult<Option<Like>>;

    /// The like a user left on a post, if any
    async fn find_like(&self, post_id: PostId, user_id: UserId) -> StorageResult<Option<Like>>;

    async fn fetch_comments(&self) -> StorageResult<Vec<Comment>>;

    async fn fetch_likes(&self) -> StorageResult<Vec<Like>>;

    async fn create_comment(&self, comment: Comment) -> StorageResult<Comment>;

    /// Replace the content of an existing comment
    async fn update_comment(&self, comment: Comment) -> StorageResult<Comment>;

    /// Store a like; a second like by the same user on the same post is a constraint error
    async fn create_like(&self, like: Like) -> StorageResult<Like>;

    async fn delete_comment(&self, id: CommentId) -> StorageResult<()>;

    async fn delete_like(&self, id: LikeId) -> StorageResult<()>;
}

/// Team membership lookups
#[async_trait]
pub trait MembershipRepository: Repository {
    /// Teams the user currently belongs to
    async fn fetch_author_teams(&self, user_id: UserId) -> StorageResult<BTreeSet<TeamId>>;
}

/// Everything the access service needs from a backend
pub trait BlogStore: PostRepository + EngagementRepository + MembershipRepository {}

impl<T> BlogStore for T where T: PostRepository + EngagementRepository + MembershipRepository {}
