//! Visibility filtering for list endpoints
//!
//! A list must contain exactly the items a detail request would allow.
//! [`QueryFilter`] is built once per actor and then evaluated against
//! each hydrated post, because tier settings and author teams vary by post.

use inkpost_api_types::{Child, PostId, Tier, TeamId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::auth::Actor;
use crate::graph::HydratedPost;
use crate::tier::TierResolver;

/// Optional narrowing of comment and like listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildFilter {
    pub post_id: Option<PostId>,
    pub user_id: Option<UserId>,
}

impl ChildFilter {
    pub fn for_post(post_id: PostId) -> Self {
        Self {
            post_id: Some(post_id),
            user_id: None,
        }
    }

    pub fn by_user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn matches(&self, child: &Child) -> bool {
        self.post_id.map_or(true, |id| child.post_id() == id)
            && self.user_id.map_or(true, |id| child.author_id() == id)
    }
}

/// Per-actor read predicate over posts
#[derive(Debug, Clone)]
pub struct QueryFilter {
    user_id: Option<UserId>,
    is_superuser: bool,
    team_ids: BTreeSet<TeamId>,
    fallthrough: bool,
}

impl QueryFilter {
    pub fn new(actor: &Actor, resolver: &TierResolver) -> Self {
        Self {
            user_id: actor.user_id(),
            is_superuser: actor.is_superuser(),
            team_ids: actor.team_ids().clone(),
            fallthrough: resolver.is_fallthrough(),
        }
    }

    /// True when a read of `post` would be allowed.
    ///
    /// One clause per tier in precedence order, each guarded by the
    /// membership test for that tier. Strict mode stops at the first
    /// clause whose guard holds; fallthrough accepts any of them.
    pub fn is_visible(&self, post: &HydratedPost) -> bool {
        if self.is_superuser {
            return true;
        }

        let authenticated = self.user_id.is_some();
        let clauses = [
            (Tier::Owner, self.user_id == Some(post.author_id())),
            (
                Tier::Team,
                authenticated && !self.team_ids.is_disjoint(&post.author_team_ids),
            ),
            (Tier::Authenticated, authenticated),
            (Tier::Public, true),
        ];

        let mut readable = clauses
            .into_iter()
            .filter(|(_, guard)| *guard)
            .map(|(tier, _)| post.tiers().get(tier).allows_read());

        if self.fallthrough {
            readable.any(|ok| ok)
        } else {
            readable.next().unwrap_or(false)
        }
    }

    /// The posts this actor may read, in input order
    pub fn visible_set<'p>(&self, posts: &'p [HydratedPost]) -> Vec<&'p HydratedPost> {
        posts.iter().filter(|post| self.is_visible(post)).collect()
    }

    /// Children whose parent is readable and that match `filter`.
    /// Children of posts missing from `parents` are dropped.
    pub fn visible_children<I>(
        &self,
        children: I,
        parents: &HashMap<PostId, HydratedPost>,
        filter: &ChildFilter,
    ) -> Vec<Child>
    where
        I: IntoIterator<Item = Child>,
    {
        children
            .into_iter()
            .filter(|child| filter.matches(child))
            .filter(|child| {
                parents
                    .get(&child.post_id())
                    .is_some_and(|parent| self.is_visible(parent))
            })
            .collect()
    }
}
