//! Permission checking utilities

use inkpost_api_types::Operation;
use inkpost_config::AccessConfig;

use crate::auth::Actor;
use crate::error::AccessResult;
use crate::filter::QueryFilter;
use crate::graph::HydratedPost;
use crate::policy::{AccessPolicy, Basis, Resource};
use crate::tier::TierGrant;

/// Convenience layer over [`AccessPolicy`] for common checks
#[derive(Debug, Clone, Default)]
pub struct PermissionChecker {
    policy: AccessPolicy,
}

impl PermissionChecker {
    pub fn new(policy: AccessPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(AccessPolicy::new(config))
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Check if the actor may perform the operation
    pub fn check(&self, actor: &Actor, resource: Resource<'_>, operation: Operation) -> bool {
        self.policy.authorize(actor, resource, operation).is_allowed()
    }

    /// Like [`check`](Self::check), but turns a denial into its error
    pub fn require(
        &self,
        actor: &Actor,
        resource: Resource<'_>,
        operation: Operation,
    ) -> AccessResult<Basis> {
        self.policy.authorize(actor, resource, operation).into_result()
    }

    pub fn can_create_post(&self, actor: &Actor) -> bool {
        self.check(actor, Resource::PostCollection, Operation::Create)
    }

    pub fn can_read_post(&self, actor: &Actor, post: &HydratedPost) -> bool {
        self.check(actor, Resource::Post(post), Operation::Read)
    }

    pub fn can_update_post(&self, actor: &Actor, post: &HydratedPost) -> bool {
        self.check(actor, Resource::Post(post), Operation::Update)
    }

    pub fn can_delete_post(&self, actor: &Actor, post: &HydratedPost) -> bool {
        self.check(actor, Resource::Post(post), Operation::Delete)
    }

    /// Whether the actor could comment on or like the post
    pub fn can_engage(&self, actor: &Actor, post: &HydratedPost) -> bool {
        actor.is_authenticated() && self.effective_grant(actor, post).permits(Operation::Create)
    }

    /// Tier and capability the actor holds on a post
    pub fn effective_grant(&self, actor: &Actor, post: &HydratedPost) -> TierGrant {
        self.policy.resolver().resolve(actor, post)
    }

    /// Read filter for list endpoints
    pub fn query_filter(&self, actor: &Actor) -> QueryFilter {
        QueryFilter::new(actor, self.policy.resolver())
    }

    /// Batch permission check
    pub fn batch_check(&self, actor: &Actor, checks: &[(Resource<'_>, Operation)]) -> Vec<bool> {
        checks
            .iter()
            .map(|(resource, operation)| self.check(actor, *resource, *operation))
            .collect()
    }
}
