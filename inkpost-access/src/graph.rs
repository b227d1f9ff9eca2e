//! Navigation from posts to their children and back
//!
//! Posts own comments and likes. Every child access decision is made
//! against its parent post, so the graph always hands back the parent
//! together with the author's team memberships, loaded at lookup time.

use inkpost_api_types::{
    Child, Comment, CommentId, Like, LikeId, Post, PostId, ResourceKind, TeamId, TierSettings,
    UserId,
};
use inkpost_storage::{BlogStore, EngagementRepository, MembershipRepository, PostRepository};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AccessError, AccessResult};

/// A post together with the data needed to resolve tiers against it
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedPost {
    pub post: Post,
    pub author_team_ids: BTreeSet<TeamId>,
}

impl HydratedPost {
    pub fn new(post: Post, author_team_ids: BTreeSet<TeamId>) -> Self {
        Self {
            post,
            author_team_ids,
        }
    }

    pub fn id(&self) -> PostId {
        self.post.id
    }

    pub fn author_id(&self) -> UserId {
        self.post.author_id
    }

    pub fn tiers(&self) -> &TierSettings {
        &self.post.tiers
    }
}

/// Read-side view of the store used by the access engine
pub struct ResourceGraph<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ResourceGraph<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ResourceGraph<S>
where
    S: BlogStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn author_team_ids(&self, author_id: UserId) -> AccessResult<BTreeSet<TeamId>> {
        Ok(self.store.fetch_author_teams(author_id).await?)
    }

    /// Attach the author's current teams to a post
    pub async fn hydrate(&self, post: Post) -> AccessResult<HydratedPost> {
        let teams = self.author_team_ids(post.author_id).await?;
        Ok(HydratedPost::new(post, teams))
    }

    pub async fn post(&self, id: PostId) -> AccessResult<HydratedPost> {
        let post = self
            .store
            .fetch_post(id)
            .await?
            .ok_or_else(|| AccessError::not_found(ResourceKind::Post, id.get()))?;
        self.hydrate(post).await
    }

    /// Every post, hydrated. Team lookups are shared between posts by the same author.
    pub async fn posts(&self) -> AccessResult<Vec<HydratedPost>> {
        let posts = self.store.fetch_posts().await?;
        let mut teams_by_author: HashMap<UserId, BTreeSet<TeamId>> = HashMap::new();
        let mut hydrated = Vec::with_capacity(posts.len());

        for post in posts {
            let teams = match teams_by_author.get(&post.author_id) {
                Some(teams) => teams.clone(),
                None => {
                    let teams = self.author_team_ids(post.author_id).await?;
                    teams_by_author.insert(post.author_id, teams.clone());
                    teams
                }
            };
            hydrated.push(HydratedPost::new(post, teams));
        }

        debug!(
            posts = hydrated.len(),
            authors = teams_by_author.len(),
            "Hydrated post listing"
        );
        Ok(hydrated)
    }

    /// The post that owns a child, hydrated with the author's current teams.
    /// A child whose post has gone is reported as a missing post.
    pub async fn parent_of(&self, child: &Child) -> AccessResult<HydratedPost> {
        self.post(child.post_id()).await
    }

    pub async fn comment(&self, id: CommentId) -> AccessResult<(Comment, HydratedPost)> {
        let comment = self
            .store
            .fetch_comment(id)
            .await?
            .ok_or_else(|| AccessError::not_found(ResourceKind::Comment, id.get()))?;
        let parent = self.parent_of(&Child::Comment(comment.clone())).await?;
        Ok((comment, parent))
    }

    pub async fn like(&self, id: LikeId) -> AccessResult<(Like, HydratedPost)> {
        let like = self
            .store
            .fetch_like(id)
            .await?
            .ok_or_else(|| AccessError::not_found(ResourceKind::Like, id.get()))?;
        let parent = self.parent_of(&Child::Like(like.clone())).await?;
        Ok((like, parent))
    }

    pub async fn children(&self, post_id: PostId) -> AccessResult<Vec<Child>> {
        Ok(self.store.fetch_children(post_id).await?)
    }
}
