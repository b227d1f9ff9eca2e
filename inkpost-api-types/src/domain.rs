use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Capability, Tier};
use crate::ids::{CommentId, LikeId, PostId, UserId};

/// The four independent tier settings stored on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierSettings {
    pub public_access: Capability,
    pub authenticated_access: Capability,
    pub team_access: Capability,
    pub owner_access: Capability,
}

impl TierSettings {
    pub const fn new(
        public_access: Capability,
        authenticated_access: Capability,
        team_access: Capability,
        owner_access: Capability,
    ) -> Self {
        Self {
            public_access,
            authenticated_access,
            team_access,
            owner_access,
        }
    }

    /// Capability configured for a tier
    pub fn get(&self, tier: Tier) -> Capability {
        match tier {
            Tier::Owner => self.owner_access,
            Tier::Team => self.team_access,
            Tier::Authenticated => self.authenticated_access,
            Tier::Public => self.public_access,
        }
    }

    /// Tier pairs `(broader, narrower)` where the broader tier may never
    /// grant more than the narrower one. Public is intentionally absent.
    pub const WIDENING_PAIRS: [(Tier, Tier); 2] =
        [(Tier::Authenticated, Tier::Team), (Tier::Team, Tier::Owner)];

    /// Every `(broader, narrower)` pair whose ordering is violated
    pub fn widening_violations(&self) -> impl Iterator<Item = (Tier, Tier)> + '_ {
        Self::WIDENING_PAIRS
            .into_iter()
            .filter(move |(broader, narrower)| self.get(*broader) > self.get(*narrower))
    }
}

impl Default for TierSettings {
    fn default() -> Self {
        Self {
            public_access: Capability::ReadOnly,
            authenticated_access: Capability::ReadOnly,
            team_access: Capability::ReadAndEdit,
            owner_access: Capability::ReadAndEdit,
        }
    }
}

/// Partial tier settings supplied on create or update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierOverrides {
    pub public_access: Option<Capability>,
    pub authenticated_access: Option<Capability>,
    pub team_access: Option<Capability>,
    pub owner_access: Option<Capability>,
}

impl TierOverrides {
    /// Overlay the supplied values on `base`
    pub fn apply_to(&self, base: TierSettings) -> TierSettings {
        TierSettings {
            public_access: self.public_access.unwrap_or(base.public_access),
            authenticated_access: self.authenticated_access.unwrap_or(base.authenticated_access),
            team_access: self.team_access.unwrap_or(base.team_access),
            owner_access: self.owner_access.unwrap_or(base.owner_access),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.public_access.is_none()
            && self.authenticated_access.is_none()
            && self.team_access.is_none()
            && self.owner_access.is_none()
    }
}

/// A blog post and its access tiers.
///
/// The author's teams are deliberately not stored here; they are looked up
/// when a decision is made so membership changes take effect immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub tiers: TierSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// First `max_chars` characters of the content
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.content.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.content[..idx],
            None => &self.content,
        }
    }
}

/// Input for creating a post; the author comes from the acting user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(flatten)]
    pub tiers: TierOverrides,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tiers: TierOverrides::default(),
        }
    }

    pub fn with_tiers(mut self, tiers: TierOverrides) -> Self {
        self.tiers = tiers;
        self
    }
}

/// Partial update of a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(flatten)]
    pub tiers: TierOverrides,
}

impl PostPatch {
    /// Produce the updated post without touching identity or timestamps
    pub fn apply(&self, post: &Post) -> Post {
        let mut updated = post.clone();
        if let Some(title) = &self.title {
            updated.title = title.clone();
        }
        if let Some(content) = &self.content {
            updated.content = content.clone();
        }
        updated.tiers = self.tiers.apply_to(post.tiers);
        updated
    }

    pub fn touches_tiers(&self) -> bool {
        !self.tiers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A resource owned by a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Child {
    Comment(Comment),
    Like(Like),
}

impl Child {
    pub fn post_id(&self) -> PostId {
        match self {
            Child::Comment(c) => c.post_id,
            Child::Like(l) => l.post_id,
        }
    }

    pub fn author_id(&self) -> UserId {
        match self {
            Child::Comment(c) => c.author_id,
            Child::Like(l) => l.author_id,
        }
    }
}

impl From<Comment> for Child {
    fn from(comment: Comment) -> Self {
        Child::Comment(comment)
    }
}

impl From<Like> for Child {
    fn from(like: Like) -> Self {
        Child::Like(like)
    }
}
