//! Access decisions for posts, comments and likes
//!
//! [`AccessPolicy::authorize`] is a pure function of the actor, the
//! already-hydrated resource and the operation. It never touches storage
//! and never mutates state, so one policy can be shared by every request.

use inkpost_api_types::{Comment, Like, Operation, ResourceKind, UserId};
use inkpost_config::AccessConfig;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::Actor;
use crate::error::{AccessError, AccessResult};
use crate::graph::HydratedPost;
use crate::tier::{TierGrant, TierResolver};
use crate::validator::ConsistencyValidator;

/// What an access decision is made about
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// The post collection; used for listing and for creating posts
    PostCollection,
    Post(&'a HydratedPost),
    /// An existing comment, or the draft of one being created
    Comment {
        parent: &'a HydratedPost,
        comment: &'a Comment,
    },
    /// An existing like, or the draft of one being created
    Like {
        parent: &'a HydratedPost,
        like: &'a Like,
    },
}

impl<'a> Resource<'a> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::PostCollection | Resource::Post(_) => ResourceKind::Post,
            Resource::Comment { .. } => ResourceKind::Comment,
            Resource::Like { .. } => ResourceKind::Like,
        }
    }

    /// The post whose tiers govern this resource
    pub fn governing_post(&self) -> Option<&'a HydratedPost> {
        match *self {
            Resource::PostCollection => None,
            Resource::Post(post) => Some(post),
            Resource::Comment { parent, .. } | Resource::Like { parent, .. } => Some(parent),
        }
    }

    /// Human-readable target for log events and denial messages
    pub fn label(&self, operation: Operation) -> String {
        match (self, operation) {
            (Resource::PostCollection, _) => ResourceKind::Post.to_string(),
            (Resource::Post(post), _) => post.id().to_string(),
            (Resource::Comment { parent, .. }, Operation::Create) => {
                format!("{} on {}", ResourceKind::Comment, parent.id())
            }
            (Resource::Like { parent, .. }, Operation::Create) => {
                format!("{} on {}", ResourceKind::Like, parent.id())
            }
            (Resource::Comment { comment, .. }, _) => comment.id.to_string(),
            (Resource::Like { like, .. }, _) => like.id.to_string(),
        }
    }
}

/// Why an operation was allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum Basis {
    /// The capability resolved for the actor's tier on the governing post
    Tier(TierGrant),
    /// The actor wrote the comment or like
    ResourceAuthor,
    /// Superuser override on a comment or like
    Superuser,
    /// Creating a post only needs a signed-in actor
    Authenticated,
    /// Listing is open; every item in it is filtered separately
    Listing,
}

/// Tagged outcome of [`AccessPolicy::authorize`]
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Allow(Basis),
    Deny(AccessError),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn into_result(self) -> AccessResult<Basis> {
        match self {
            Decision::Allow(basis) => Ok(basis),
            Decision::Deny(err) => Err(err),
        }
    }
}

/// The single policy type, parameterized by each post's stored tiers
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    resolver: TierResolver,
    audit_decisions: bool,
}

impl AccessPolicy {
    pub fn new(config: &AccessConfig) -> Self {
        Self {
            resolver: TierResolver::from_config(config),
            audit_decisions: config.audit_decisions,
        }
    }

    pub fn with_resolver(resolver: TierResolver) -> Self {
        Self {
            resolver,
            audit_decisions: false,
        }
    }

    pub fn resolver(&self) -> &TierResolver {
        &self.resolver
    }

    /// Decide whether `actor` may perform `operation` on `resource`.
    ///
    /// Resource existence must be settled by the caller beforehand; a
    /// missing post is a not-found condition, never a denial.
    pub fn authorize(
        &self,
        actor: &Actor,
        resource: Resource<'_>,
        operation: Operation,
    ) -> Decision {
        let decision = match resource {
            Resource::PostCollection => self.authorize_collection(actor, operation),
            Resource::Post(_) if operation == Operation::Create => {
                self.authorize_collection(actor, operation)
            }
            Resource::Post(post) => self.authorize_post(actor, post, operation),
            Resource::Comment { parent, comment } => self.authorize_child(
                actor,
                &resource,
                parent,
                comment.author_id,
                Some(&comment.content),
                operation,
            ),
            Resource::Like { parent, like } => self.authorize_child(
                actor,
                &resource,
                parent,
                like.author_id,
                None,
                operation,
            ),
        };

        self.record(actor, &resource, operation, &decision);
        decision
    }

    fn authorize_collection(&self, actor: &Actor, operation: Operation) -> Decision {
        match operation {
            Operation::Read => Decision::Allow(Basis::Listing),
            Operation::Create if actor.is_authenticated() => Decision::Allow(Basis::Authenticated),
            Operation::Create => Decision::Deny(AccessError::unauthenticated(
                Operation::Create,
                ResourceKind::Post,
            )),
            Operation::Update | Operation::Delete => Decision::Deny(AccessError::denied(
                operation,
                ResourceKind::Post,
                "bulk changes are not supported",
            )),
        }
    }

    fn authorize_post(&self, actor: &Actor, post: &HydratedPost, operation: Operation) -> Decision {
        let grant = self.resolver.resolve(actor, post);
        if grant.permits(operation) {
            Decision::Allow(Basis::Tier(grant))
        } else {
            Decision::Deny(AccessError::denied(operation, post.id(), deny_reason(&grant)))
        }
    }

    fn authorize_child(
        &self,
        actor: &Actor,
        resource: &Resource<'_>,
        parent: &HydratedPost,
        author_id: UserId,
        content: Option<&str>,
        operation: Operation,
    ) -> Decision {
        match operation {
            Operation::Read => self.authorize_post(actor, parent, Operation::Read),
            Operation::Create => {
                if !actor.is_authenticated() {
                    return Decision::Deny(AccessError::unauthenticated(
                        operation,
                        resource.kind(),
                    ));
                }

                let grant = self.resolver.resolve(actor, parent);
                if !grant.permits(Operation::Read) {
                    return Decision::Deny(AccessError::denied(
                        operation,
                        parent.id(),
                        deny_reason(&grant),
                    ));
                }

                // Empty content is a validation failure, even for actors who could write
                if let Some(content) = content {
                    if let Err(err) = ConsistencyValidator::validate_content("content", content) {
                        return Decision::Deny(err.into());
                    }
                }

                if grant.permits(Operation::Create) {
                    Decision::Allow(Basis::Tier(grant))
                } else {
                    Decision::Deny(AccessError::denied(
                        operation,
                        parent.id(),
                        deny_reason(&grant),
                    ))
                }
            }
            Operation::Update | Operation::Delete => {
                if actor.is_superuser() {
                    Decision::Allow(Basis::Superuser)
                } else if actor.is_user(author_id) {
                    Decision::Allow(Basis::ResourceAuthor)
                } else {
                    Decision::Deny(AccessError::denied(
                        operation,
                        resource.label(operation),
                        format!("only the author may {} it", operation),
                    ))
                }
            }
        }
    }

    fn record(
        &self,
        actor: &Actor,
        resource: &Resource<'_>,
        operation: Operation,
        decision: &Decision,
    ) {
        let target = resource.label(operation);
        let grant = match decision {
            Decision::Allow(Basis::Tier(grant)) => Some(*grant),
            _ => None,
        };
        debug!(
            actor = %actor.subject(),
            resource = %target,
            operation = %operation,
            allowed = decision.is_allowed(),
            tier = ?grant.map(|g| g.tier),
            capability = ?grant.map(|g| g.capability),
            "Access decision"
        );

        if self.audit_decisions {
            if let Decision::Deny(err) = decision {
                info!(
                    actor = %actor.subject(),
                    resource = %target,
                    operation = %operation,
                    reason = %err,
                    "Access denied"
                );
            }
        }
    }
}

fn deny_reason(grant: &TierGrant) -> String {
    format!("{} tier grants {}", grant.tier, grant.capability)
}
