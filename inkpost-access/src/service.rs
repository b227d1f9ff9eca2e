//! Request-level operations on posts, comments and likes
//!
//! Each operation resolves the resources it touches through the
//! [`ResourceGraph`] first, so a missing post is reported as not found
//! before any access decision is made. Decisions are re-resolved on every
//! call and never cached across requests.

use chrono::Utc;
use inkpost_api_types::{
    Child, Comment, CommentId, Like, LikeId, NewPost, Operation, Post, PostId, PostPatch,
    ResourceKind, TierSettings,
};
use inkpost_config::AccessConfig;
use inkpost_storage::{BlogStore, CascadeSummary, EngagementRepository, PostRepository};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::Actor;
use crate::error::{AccessError, AccessResult};
use crate::filter::ChildFilter;
use crate::graph::{HydratedPost, ResourceGraph};
use crate::permissions::PermissionChecker;
use crate::policy::Resource;
use crate::validator::ConsistencyValidator;

/// Result of toggling a like
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "like", rename_all = "snake_case")]
pub enum LikeToggle {
    Created(Like),
    Removed(LikeId),
}

/// Summary of a post's comments and likes as seen by one actor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Engagement {
    pub post_id: PostId,
    pub excerpt: String,
    pub comments: usize,
    pub likes: usize,
    pub liked_by_actor: bool,
    pub can_engage: bool,
}

/// Access-checked operations over a blog store
pub struct AccessService<S: ?Sized> {
    graph: ResourceGraph<S>,
    checker: PermissionChecker,
    validator: ConsistencyValidator,
    default_tiers: TierSettings,
    excerpt_length: usize,
}

impl<S> AccessService<S>
where
    S: BlogStore + ?Sized,
{
    pub fn new(store: Arc<S>, config: &AccessConfig) -> Self {
        Self {
            graph: ResourceGraph::new(store),
            checker: PermissionChecker::from_config(config),
            validator: ConsistencyValidator::new(config),
            default_tiers: config.default_tiers,
            excerpt_length: config.excerpt_length,
        }
    }

    pub fn graph(&self) -> &ResourceGraph<S> {
        &self.graph
    }

    pub fn checker(&self) -> &PermissionChecker {
        &self.checker
    }

    /// Create a post authored by the actor. Unset tiers take the configured defaults.
    pub async fn create_post(&self, actor: &Actor, input: NewPost) -> AccessResult<Post> {
        self.checker
            .require(actor, Resource::PostCollection, Operation::Create)?;
        let author_id = actor
            .user_id()
            .ok_or_else(|| AccessError::unauthenticated(Operation::Create, ResourceKind::Post))?;

        let now = Utc::now();
        let draft = Post {
            id: PostId::new(0),
            author_id,
            title: input.title,
            content: input.content,
            tiers: input.tiers.apply_to(self.default_tiers),
            created_at: now,
            updated_at: now,
        };
        self.validator.validate(&draft)?;

        let post = self.graph.store().create_post(draft).await?;
        info!(post_id = %post.id, author = %author_id, "Post created");
        Ok(post)
    }

    pub async fn get_post(&self, actor: &Actor, id: PostId) -> AccessResult<Post> {
        let post = self.graph.post(id).await?;
        self.checker
            .require(actor, Resource::Post(&post), Operation::Read)?;
        Ok(post.post)
    }

    /// Every post the actor may read, ordered by id
    pub async fn list_posts(&self, actor: &Actor) -> AccessResult<Vec<Post>> {
        let posts = self.graph.posts().await?;
        let visible: Vec<Post> = self
            .checker
            .query_filter(actor)
            .visible_set(&posts)
            .into_iter()
            .map(|hydrated| hydrated.post.clone())
            .collect();

        debug!(
            actor = %actor.subject(),
            total = posts.len(),
            visible = visible.len(),
            "Filtered post listing"
        );
        Ok(visible)
    }

    pub async fn update_post(
        &self,
        actor: &Actor,
        id: PostId,
        patch: PostPatch,
    ) -> AccessResult<Post> {
        let current = self.graph.post(id).await?;
        self.checker
            .require(actor, Resource::Post(&current), Operation::Update)?;

        let updated = patch.apply(&current.post);
        self.validator.validate(&updated)?;

        let post = self.graph.store().update_post(updated).await?;
        info!(
            post_id = %post.id,
            actor = %actor.subject(),
            tiers_changed = patch.touches_tiers(),
            "Post updated"
        );
        Ok(post)
    }

    /// Delete a post along with its comments and likes
    pub async fn delete_post(&self, actor: &Actor, id: PostId) -> AccessResult<CascadeSummary> {
        let post = self.graph.post(id).await?;
        self.checker
            .require(actor, Resource::Post(&post), Operation::Delete)?;

        let summary = self.graph.store().delete_cascade(id).await?;
        info!(
            post_id = %id,
            actor = %actor.subject(),
            comments = summary.comments_removed,
            likes = summary.likes_removed,
            "Post deleted"
        );
        Ok(summary)
    }

    pub async fn add_comment(
        &self,
        actor: &Actor,
        post_id: PostId,
        content: impl Into<String>,
    ) -> AccessResult<Comment> {
        let parent = self.graph.post(post_id).await?;
        let author_id = actor
            .user_id()
            .ok_or_else(|| AccessError::unauthenticated(Operation::Create, ResourceKind::Comment))?;

        let draft = Comment {
            id: CommentId::new(0),
            post_id,
            author_id,
            content: content.into(),
            created_at: Utc::now(),
        };
        self.checker.require(
            actor,
            Resource::Comment {
                parent: &parent,
                comment: &draft,
            },
            Operation::Create,
        )?;

        let comment = self.graph.store().create_comment(draft).await?;
        info!(comment_id = %comment.id, post_id = %post_id, "Comment added");
        Ok(comment)
    }

    /// Replace a comment's content; only its author or a superuser may
    pub async fn update_comment(
        &self,
        actor: &Actor,
        id: CommentId,
        content: impl Into<String>,
    ) -> AccessResult<Comment> {
        let (comment, parent) = self.graph.comment(id).await?;
        self.checker.require(
            actor,
            Resource::Comment {
                parent: &parent,
                comment: &comment,
            },
            Operation::Update,
        )?;

        let content = content.into();
        ConsistencyValidator::validate_content("content", &content)?;

        let updated = self
            .graph
            .store()
            .update_comment(Comment { content, ..comment })
            .await?;
        Ok(updated)
    }

    pub async fn delete_comment(&self, actor: &Actor, id: CommentId) -> AccessResult<()> {
        let (comment, parent) = self.graph.comment(id).await?;
        self.checker.require(
            actor,
            Resource::Comment {
                parent: &parent,
                comment: &comment,
            },
            Operation::Delete,
        )?;

        self.graph.store().delete_comment(id).await?;
        info!(comment_id = %id, actor = %actor.subject(), "Comment deleted");
        Ok(())
    }

    /// Like a post, or remove the actor's existing like on it
    pub async fn toggle_like(&self, actor: &Actor, post_id: PostId) -> AccessResult<LikeToggle> {
        let parent = self.graph.post(post_id).await?;
        let author_id = actor
            .user_id()
            .ok_or_else(|| AccessError::unauthenticated(Operation::Create, ResourceKind::Like))?;
        let store = self.graph.store();

        if let Some(existing) = store.find_like(post_id, author_id).await? {
            self.checker.require(
                actor,
                Resource::Like {
                    parent: &parent,
                    like: &existing,
                },
                Operation::Delete,
            )?;
            store.delete_like(existing.id).await?;
            info!(like_id = %existing.id, post_id = %post_id, "Like removed");
            return Ok(LikeToggle::Removed(existing.id));
        }

        let draft = Like {
            id: LikeId::new(0),
            post_id,
            author_id,
            created_at: Utc::now(),
        };
        self.checker.require(
            actor,
            Resource::Like {
                parent: &parent,
                like: &draft,
            },
            Operation::Create,
        )?;

        let like = store.create_like(draft).await?;
        info!(like_id = %like.id, post_id = %post_id, "Like created");
        Ok(LikeToggle::Created(like))
    }

    pub async fn delete_like(&self, actor: &Actor, id: LikeId) -> AccessResult<()> {
        let (like, parent) = self.graph.like(id).await?;
        self.checker.require(
            actor,
            Resource::Like {
                parent: &parent,
                like: &like,
            },
            Operation::Delete,
        )?;

        self.graph.store().delete_like(id).await?;
        Ok(())
    }

    /// Comments on posts the actor may read, narrowed by `filter`
    pub async fn list_comments(
        &self,
        actor: &Actor,
        filter: ChildFilter,
    ) -> AccessResult<Vec<Comment>> {
        let comments = self.graph.store().fetch_comments().await?;
        let children = self
            .visible_children(actor, &filter, comments.into_iter().map(Child::from))
            .await?;

        Ok(children
            .into_iter()
            .filter_map(|child| match child {
                Child::Comment(comment) => Some(comment),
                Child::Like(_) => None,
            })
            .collect())
    }

    /// Likes on posts the actor may read, narrowed by `filter`
    pub async fn list_likes(&self, actor: &Actor, filter: ChildFilter) -> AccessResult<Vec<Like>> {
        let likes = self.graph.store().fetch_likes().await?;
        let children = self
            .visible_children(actor, &filter, likes.into_iter().map(Child::from))
            .await?;

        Ok(children
            .into_iter()
            .filter_map(|child| match child {
                Child::Like(like) => Some(like),
                Child::Comment(_) => None,
            })
            .collect())
    }

    async fn visible_children<I>(
        &self,
        actor: &Actor,
        filter: &ChildFilter,
        children: I,
    ) -> AccessResult<Vec<Child>>
    where
        I: IntoIterator<Item = Child>,
    {
        let parents: HashMap<PostId, HydratedPost> = match filter.post_id {
            Some(post_id) => match self.graph.post(post_id).await {
                Ok(post) => HashMap::from([(post_id, post)]),
                Err(err) if err.is_not_found() => HashMap::new(),
                Err(err) => return Err(err),
            },
            None => self
                .graph
                .posts()
                .await?
                .into_iter()
                .map(|post| (post.id(), post))
                .collect(),
        };

        Ok(self
            .checker
            .query_filter(actor)
            .visible_children(children, &parents, filter))
    }

    /// Excerpt and engagement counts for a readable post
    pub async fn engagement(&self, actor: &Actor, post_id: PostId) -> AccessResult<Engagement> {
        let post = self.graph.post(post_id).await?;
        self.checker
            .require(actor, Resource::Post(&post), Operation::Read)?;

        let children = self.graph.children(post_id).await?;
        let likes = children
            .iter()
            .filter(|child| matches!(child, Child::Like(_)))
            .count();
        let liked_by_actor = actor.user_id().is_some_and(|user_id| {
            children
                .iter()
                .any(|child| matches!(child, Child::Like(like) if like.author_id == user_id))
        });

        Ok(Engagement {
            post_id,
            excerpt: post.post.excerpt(self.excerpt_length).to_string(),
            comments: children.len() - likes,
            likes,
            liked_by_actor,
            can_engage: self.checker.can_engage(actor, &post),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ActorBuilder;
    use inkpost_api_types::{Capability, TeamId, TierOverrides, UserId};
    use inkpost_storage::testing::{MockStore, PostBuilder};
    use inkpost_storage::{DatabaseError, InMemoryBlogStore};

    fn service() -> (Arc<InMemoryBlogStore>, AccessService<InMemoryBlogStore>) {
        let store = Arc::new(InMemoryBlogStore::new());
        let service = AccessService::new(Arc::clone(&store), &AccessConfig::default());
        (store, service)
    }

    #[tokio::test]
    async fn test_create_applies_default_tiers() {
        let (_, service) = service();
        let author = Actor::user(UserId::new(1));

        let post = service
            .create_post(&author, NewPost::new("Hello", "First post"))
            .await
            .unwrap();

        assert_eq!(post.author_id, UserId::new(1));
        assert_eq!(post.tiers, TierSettings::default());
    }

    #[tokio::test]
    async fn test_create_rejects_widening_tiers() {
        let (store, service) = service();
        let author = Actor::user(UserId::new(1));
        let input = NewPost::new("Hello", "Body").with_tiers(TierOverrides {
            authenticated_access: Some(Capability::ReadAndEdit),
            team_access: Some(Capability::ReadOnly),
            ..TierOverrides::default()
        });

        let err = service.create_post(&author, input).await.unwrap_err();
        assert!(err.is_validation());
        assert!(store.fetch_posts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_cannot_create() {
        let (_, service) = service();
        let err = service
            .create_post(&Actor::anonymous(), NewPost::new("Hello", "Body"))
            .await
            .unwrap_err();

        assert_eq!(err, AccessError::unauthenticated(Operation::Create, ResourceKind::Post));
    }

    #[tokio::test]
    async fn test_superuser_creates_like_any_signed_in_user() {
        let (_, service) = service();
        let admin = Actor::superuser(UserId::new(9));

        let post = service
            .create_post(&admin, NewPost::new("Notice", "Maintenance tonight"))
            .await
            .unwrap();
        assert_eq!(post.author_id, UserId::new(9));

        let comment = service.add_comment(&admin, post.id, "Done").await.unwrap();
        assert_eq!(comment.author_id, UserId::new(9));
        assert!(matches!(
            service.toggle_like(&admin, post.id).await.unwrap(),
            LikeToggle::Created(_)
        ));
    }

    #[tokio::test]
    async fn test_not_found_before_denied() {
        let (_, service) = service();
        let err = service
            .get_post(&Actor::anonymous(), PostId::new(12))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_validates_and_checks_capability() {
        let (_, service) = service();
        let author = Actor::user(UserId::new(1));
        let post = service
            .create_post(&author, NewPost::new("Hello", "Body"))
            .await
            .unwrap();

        let stranger = Actor::user(UserId::new(2));
        let patch = PostPatch {
            title: Some("Taken over".to_string()),
            ..PostPatch::default()
        };
        let err = service
            .update_post(&stranger, post.id, patch.clone())
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());

        let widening = PostPatch {
            tiers: TierOverrides {
                team_access: Some(Capability::None),
                ..TierOverrides::default()
            },
            ..PostPatch::default()
        };
        let err = service.update_post(&author, post.id, widening).await.unwrap_err();
        assert!(err.is_validation());

        let updated = service.update_post(&author, post.id, patch).await.unwrap();
        assert_eq!(updated.title, "Taken over");
    }

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let (store, service) = service();
        let author = Actor::user(UserId::new(1));
        let post = service
            .create_post(&author, NewPost::new("Hello", "Body"))
            .await
            .unwrap();
        store.add_membership(UserId::new(1), TeamId::new(3)).await;

        let teammate = ActorBuilder::for_user(UserId::new(2))
            .with_team(TeamId::new(3))
            .build();
        let comment = service.add_comment(&teammate, post.id, "Nice").await.unwrap();

        let err = service.add_comment(&teammate, post.id, "  ").await.unwrap_err();
        assert!(err.is_validation());

        let err = service
            .update_comment(&author, comment.id, "Edited by someone else")
            .await
            .unwrap_err();
        assert!(err.is_permission_denied());

        let edited = service
            .update_comment(&teammate, comment.id, "Very nice")
            .await
            .unwrap();
        assert_eq!(edited.content, "Very nice");

        service.delete_comment(&teammate, comment.id).await.unwrap();
        let err = service.delete_comment(&teammate, comment.id).await.unwrap_err();
        assert_eq!(err, AccessError::not_found(ResourceKind::Comment, comment.id.get()));
    }

    #[tokio::test]
    async fn test_engagement_counts() {
        let (_, service) = service();
        let author = Actor::user(UserId::new(1));
        let post = service
            .create_post(&author, NewPost::new("Hello", "Body text"))
            .await
            .unwrap();

        service.add_comment(&author, post.id, "First").await.unwrap();
        service.toggle_like(&author, post.id).await.unwrap();

        let summary = service.engagement(&author, post.id).await.unwrap();
        assert_eq!(summary.comments, 1);
        assert_eq!(summary.likes, 1);
        assert!(summary.liked_by_actor);
        assert!(summary.can_engage);
        assert_eq!(summary.excerpt, "Body text");

        let anonymous = service.engagement(&Actor::anonymous(), post.id).await.unwrap();
        assert!(!anonymous.liked_by_actor);
        assert!(!anonymous.can_engage);
    }

    #[tokio::test]
    async fn test_storage_failure_is_propagated() {
        let mut store = MockStore::new();
        let post = PostBuilder::new().with_id(1).with_author(UserId::new(1)).build();
        let fetched = post.clone();
        store
            .expect_fetch_post()
            .returning(move |_| Ok(Some(fetched.clone())));
        store
            .expect_fetch_author_teams()
            .returning(|_| Ok(Default::default()));
        store
            .expect_delete_cascade()
            .returning(|_| Err(DatabaseError::Connection {
                message: "connection reset".to_string(),
            }));

        let service = AccessService::new(Arc::new(store), &AccessConfig::default());
        let err = service
            .delete_post(&Actor::user(UserId::new(1)), post.id)
            .await
            .unwrap_err();

        assert!(matches!(err, AccessError::Storage(DatabaseError::Connection { .. })));
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
