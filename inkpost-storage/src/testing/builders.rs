//! Builder pattern utilities for creating test entities

use chrono::Utc;
use inkpost_api_types::{Comment, CommentId, Like, LikeId, Post, PostId, TierSettings, UserId};

/// Builder pattern for creating test posts
pub struct PostBuilder {
    post: Post,
}

impl PostBuilder {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            post: Post {
                id: PostId::new(1),
                author_id: UserId::new(1),
                title: "test-post".to_string(),
                content: "Test content".to_string(),
                tiers: TierSettings::default(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.post.id = PostId::new(id);
        self
    }

    pub fn with_author(mut self, author: UserId) -> Self {
        self.post.author_id = author;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.post.content = content.into();
        self
    }

    pub fn with_tiers(mut self, tiers: TierSettings) -> Self {
        self.post.tiers = tiers;
        self
    }

    pub fn build(self) -> Post {
        self.post
    }
}

impl Default for PostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for creating test comments
pub struct CommentBuilder {
    comment: Comment,
}

impl CommentBuilder {
    pub fn new(post_id: PostId) -> Self {
        Self {
            comment: Comment {
                id: CommentId::new(1),
                post_id,
                author_id: UserId::new(1),
                content: "Test comment".to_string(),
                created_at: Utc::now(),
            },
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.comment.id = CommentId::new(id);
        self
    }

    pub fn with_author(mut self, author: UserId) -> Self {
        self.comment.author_id = author;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.comment.content = content.into();
        self
    }

    pub fn build(self) -> Comment {
        self.comment
    }
}

/// Builder pattern for creating test likes
pub struct LikeBuilder {
    like: Like,
}

impl LikeBuilder {
    pub fn new(post_id: PostId) -> Self {
        Self {
            like: Like {
                id: LikeId::new(1),
                post_id,
                author_id: UserId::new(1),
                created_at: Utc::now(),
            },
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.like.id = LikeId::new(id);
        self
    }

    pub fn with_author(mut self, author: UserId) -> Self {
        self.like.author_id = author;
        self
    }

    pub fn build(self) -> Like {
        self.like
    }
}
