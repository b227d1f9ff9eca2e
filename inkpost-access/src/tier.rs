//! Tier resolution
//!
//! An actor's relationship to a post is one of four tiers, checked in
//! precedence order: the author is `Owner`, a user sharing a team with the
//! author is `Team`, any other signed-in user is `Authenticated`, and an
//! anonymous request is `Public`. The first tier that matches wins.
//!
//! In strict mode (the default) the matched tier's capability is final,
//! even when a broader tier on the same post would grant more. With
//! fallthrough enabled the actor receives the best capability of every
//! tier they qualify for.

use inkpost_api_types::{Capability, Operation, Tier};
use inkpost_config::AccessConfig;
use serde::Serialize;

use crate::auth::Actor;
use crate::graph::HydratedPost;

/// Outcome of resolving an actor against a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierGrant {
    /// First tier the actor matched
    pub tier: Tier,
    /// Effective capability on the post
    pub capability: Capability,
    /// Granted by the superuser override rather than by the post's settings
    pub superuser_override: bool,
}

impl TierGrant {
    /// Reads need `read_only`; every write needs `read_and_edit`
    pub fn permits(&self, operation: Operation) -> bool {
        match operation {
            Operation::Read => self.capability.allows_read(),
            Operation::Create | Operation::Update | Operation::Delete => {
                self.capability.allows_edit()
            }
        }
    }
}

/// Maps an actor and a post to a tier and capability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierResolver {
    fallthrough: bool,
}

impl TierResolver {
    /// First-match resolution
    pub fn strict() -> Self {
        Self { fallthrough: false }
    }

    /// Best-of-all-qualifying-tiers resolution
    pub fn with_fallthrough() -> Self {
        Self { fallthrough: true }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self {
            fallthrough: config.tier_fallthrough,
        }
    }

    pub fn is_fallthrough(&self) -> bool {
        self.fallthrough
    }

    /// Tiers the actor qualifies for, most trusted first. `Public` always qualifies.
    pub fn qualifying_tiers(&self, actor: &Actor, post: &HydratedPost) -> Vec<Tier> {
        Tier::PRECEDENCE
            .into_iter()
            .filter(|tier| Self::qualifies(*tier, actor, post))
            .collect()
    }

    fn qualifies(tier: Tier, actor: &Actor, post: &HydratedPost) -> bool {
        match tier {
            Tier::Owner => actor.is_user(post.author_id()),
            Tier::Team => {
                actor.is_authenticated() && actor.shares_team_with(&post.author_team_ids)
            }
            Tier::Authenticated => actor.is_authenticated(),
            Tier::Public => true,
        }
    }

    /// The single tier the actor falls into. A superuser is always `Owner`.
    pub fn resolve_tier(&self, actor: &Actor, post: &HydratedPost) -> Tier {
        if actor.is_superuser() {
            return Tier::Owner;
        }

        Tier::PRECEDENCE
            .into_iter()
            .find(|tier| Self::qualifies(*tier, actor, post))
            .unwrap_or(Tier::Public)
    }

    /// Resolve the actor's tier and effective capability on a post
    pub fn resolve(&self, actor: &Actor, post: &HydratedPost) -> TierGrant {
        if actor.is_superuser() {
            return TierGrant {
                tier: Tier::Owner,
                capability: Capability::ReadAndEdit,
                superuser_override: true,
            };
        }

        let tier = self.resolve_tier(actor, post);
        let capability = if self.fallthrough {
            self.qualifying_tiers(actor, post)
                .into_iter()
                .map(|t| post.tiers().get(t))
                .max()
                .unwrap_or(Capability::None)
        } else {
            post.tiers().get(tier)
        };

        TierGrant {
            tier,
            capability,
            superuser_override: false,
        }
    }
}
