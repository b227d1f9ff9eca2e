//! Mock implementations for testing
//!
//! `MockStore` implements every repository trait, so it satisfies
//! `BlogStore` and can stand in for a real backend wherever expectations on
//! the exact lookups matter.

use async_trait::async_trait;
use inkpost_api_types::{
    Child, Comment, CommentId, Like, LikeId, Post, PostId, TeamId, UserId,
};
use mockall::mock;
use std::collections::BTreeSet;

use crate::error::StorageResult;
use crate::repositories::{
    CascadeSummary, EngagementRepository, MembershipRepository, PostRepository, Repository,
};

mock! {
    pub Store {}

    #[async_trait]
    impl Repository for Store {
        async fn health_check(&self) -> StorageResult<()>;
    }

    #[async_trait]
    impl PostRepository for Store {
        async fn fetch_post(&self, id: PostId) -> StorageResult<Option<Post>>;
        async fn fetch_posts(&self) -> StorageResult<Vec<Post>>;
        async fn create_post(&self, post: Post) -> StorageResult<Post>;
        async fn update_post(&self, post: Post) -> StorageResult<Post>;
        async fn delete_cascade(&self, id: PostId) -> StorageResult<CascadeSummary>;
    }

    #[async_trait]
    impl EngagementRepository for Store {
        async fn fetch_children(&self, post_id: PostId) -> StorageResult<Vec<Child>>;
        async fn fetch_comment(&self, id: CommentId) -> StorageResult<Option<Comment>>;
        async fn fetch_like(&self, id: LikeId) -> StorageResult<Option<Like>>;
        async fn find_like(&self, post_id: PostId, user_id: UserId) -> StorageResult<Option<Like>>;
        async fn fetch_comments(&self) -> StorageResult<Vec<Comment>>;
        async fn fetch_likes(&self) -> StorageResult<Vec<Like>>;
        async fn create_comment(&self, comment: Comment) -> StorageResult<Comment>;
        async fn update_comment(&self, comment: Comment) -> StorageResult<Comment>;
        async fn create_like(&self, like: Like) -> StorageResult<Like>;
        async fn delete_comment(&self, id: CommentId) -> StorageResult<()>;
        async fn delete_like(&self, id: LikeId) -> StorageResult<()>;
    }

    #[async_trait]
    impl MembershipRepository for Store {
        async fn fetch_author_teams(&self, user_id: UserId) -> StorageResult<BTreeSet<TeamId>>;
    }
}
