//! In-memory backend
//!
//! Used by tests and by embedders that keep the blog in process. All state
//! sits behind one async `RwLock`, so every operation observes a consistent
//! snapshot and the cascade delete is atomic.

use async_trait::async_trait;
use chrono::Utc;
use inkpost_api_types::{
    Child, Comment, CommentId, Like, LikeId, Post, PostId, TeamId, UserId,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DatabaseError, StorageResult};
use crate::repositories::{
    CascadeSummary, EngagementRepository, MembershipRepository, PostRepository, Repository,
};

#[derive(Debug, Default)]
struct StoreState {
    posts: BTreeMap<PostId, Post>,
    comments: BTreeMap<CommentId, Comment>,
    likes: BTreeMap<LikeId, Like>,
    memberships: HashMap<UserId, BTreeSet<TeamId>>,
    last_post_id: i32,
    last_comment_id: i32,
    last_like_id: i32,
}

/// Blog storage held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryBlogStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a user into a team
    pub async fn add_membership(&self, user_id: UserId, team_id: TeamId) {
        let mut state = self.state.write().await;
        state.memberships.entry(user_id).or_default().insert(team_id);
    }

    /// Take a user out of a team; returns whether they were a member
    pub async fn remove_membership(&self, user_id: UserId, team_id: TeamId) -> bool {
        let mut state = self.state.write().await;
        state
            .memberships
            .get_mut(&user_id)
            .map(|teams| teams.remove(&team_id))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Repository for InMemoryBlogStore {
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn fetch_post(&self, id: PostId) -> StorageResult<Option<Post>> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn fetch_posts(&self) -> StorageResult<Vec<Post>> {
        Ok(self.state.read().await.posts.values().cloned().collect())
    }

    async fn create_post(&self, mut post: Post) -> StorageResult<Post> {
        let mut state = self.state.write().await;
        state.last_post_id += 1;
        post.id = PostId::new(state.last_post_id);

        let now = Utc::now();
        post.created_at = now;
        post.updated_at = now;

        debug!(post_id = %post.id, author = %post.author_id, "Stored post");
        state.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(&self, mut post: Post) -> StorageResult<Post> {
        let mut state = self.state.write().await;
        let existing = state
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| DatabaseError::not_found("post", post.id))?;

        // Identity and creation time are owned by the store
        post.author_id = existing.author_id;
        post.created_at = existing.created_at;
        post.updated_at = Utc::now();
        *existing = post.clone();
        Ok(post)
    }

    async fn delete_cascade(&self, id: PostId) -> StorageResult<CascadeSummary> {
        let mut state = self.state.write().await;
        if state.posts.remove(&id).is_none() {
            return Err(DatabaseError::not_found("post", id));
        }

        let comments_before = state.comments.len();
        state.comments.retain(|_, c| c.post_id != id);
        let likes_before = state.likes.len();
        state.likes.retain(|_, l| l.post_id != id);

        let summary = CascadeSummary {
            post_id: id,
            comments_removed: comments_before - state.comments.len(),
            likes_removed: likes_before - state.likes.len(),
        };
        debug!(
            post_id = %id,
            comments = summary.comments_removed,
            likes = summary.likes_removed,
            "Deleted post with children"
        );
        Ok(summary)
    }
}

#[async_trait]
impl EngagementRepository for InMemoryBlogStore {
    async fn fetch_children(&self, post_id: PostId) -> StorageResult<Vec<Child>> {
        let state = self.state.read().await;
        let comments = state
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .map(Child::from);
        let likes = state
            .likes
            .values()
            .filter(|l| l.post_id == post_id)
            .cloned()
            .map(Child::from);
        Ok(comments.chain(likes).collect())
    }

    async fn fetch_comment(&self, id: CommentId) -> StorageResult<Option<Comment>> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn fetch_like(&self, id: LikeId) -> StorageResult<Option<Like>> {
        Ok(self.state.read().await.likes.get(&id).cloned())
    }

    async fn find_like(&self, post_id: PostId, user_id: UserId) -> StorageResult<Option<Like>> {
        Ok(self
            .state
            .read()
            .await
            .likes
            .values()
            .find(|l| l.post_id == post_id && l.author_id == user_id)
            .cloned())
    }

    async fn fetch_comments(&self) -> StorageResult<Vec<Comment>> {
        Ok(self.state.read().await.comments.values().cloned().collect())
    }

    async fn fetch_likes(&self) -> StorageResult<Vec<Like>> {
        Ok(self.state.read().await.likes.values().cloned().collect())
    }

    async fn create_comment(&self, mut comment: Comment) -> StorageResult<Comment> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&comment.post_id) {
            return Err(DatabaseError::not_found("post", comment.post_id));
        }

        state.last_comment_id += 1;
        comment.id = CommentId::new(state.last_comment_id);
        comment.created_at = Utc::now();
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(&self, comment: Comment) -> StorageResult<Comment> {
        let mut state = self.state.write().await;
        let existing = state
            .comments
            .get_mut(&comment.id)
            .ok_or_else(|| DatabaseError::not_found("comment", comment.id))?;

        existing.content = comment.content;
        Ok(existing.clone())
    }

    async fn create_like(&self, mut like: Like) -> StorageResult<Like> {
        let mut state = self.state.write().await;
        if !state.posts.contains_key(&like.post_id) {
            return Err(DatabaseError::not_found("post", like.post_id));
        }
        if state
            .likes
            .values()
            .any(|l| l.post_id == like.post_id && l.author_id == like.author_id)
        {
            return Err(DatabaseError::constraint(format!(
                "{} already likes {}",
                like.author_id, like.post_id
            )));
        }

        state.last_like_id += 1;
        like.id = LikeId::new(state.last_like_id);
        like.created_at = Utc::now();
        state.likes.insert(like.id, like.clone());
        Ok(like)
    }

    async fn delete_comment(&self, id: CommentId) -> StorageResult<()> {
        self.state
            .write()
            .await
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::not_found("comment", id))
    }

    async fn delete_like(&self, id: LikeId) -> StorageResult<()> {
        self.state
            .write()
            .await
            .likes
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::not_found("like", id))
    }
}

#[async_trait]
impl MembershipRepository for InMemoryBlogStore {
    async fn fetch_author_teams(&self, user_id: UserId) -> StorageResult<BTreeSet<TeamId>> {
        Ok(self
            .state
            .read()
            .await
            .memberships
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}
