//! The acting identity behind a request

use inkpost_api_types::{TeamId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Who is asking.
///
/// An anonymous request has no user id; authenticated requests carry the
/// user's id and the teams they belong to. Only a signed-in user can hold
/// the superuser override, so every superuser is also authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ActorRecord")]
pub struct Actor {
    user_id: Option<UserId>,
    is_superuser: bool,
    team_ids: BTreeSet<TeamId>,
}

/// Raised when session data claims superuser rights without a user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("superuser override requires a signed-in user")]
pub struct AnonymousSuperuser;

#[derive(Deserialize)]
struct ActorRecord {
    #[serde(default)]
    user_id: Option<UserId>,
    #[serde(default)]
    is_superuser: bool,
    #[serde(default)]
    team_ids: BTreeSet<TeamId>,
}

impl TryFrom<ActorRecord> for Actor {
    type Error = AnonymousSuperuser;

    fn try_from(record: ActorRecord) -> Result<Self, Self::Error> {
        if record.is_superuser && record.user_id.is_none() {
            return Err(AnonymousSuperuser);
        }
        Ok(Self {
            user_id: record.user_id,
            is_superuser: record.is_superuser,
            team_ids: record.team_ids,
        })
    }
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed-in user without teams
    pub fn user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn superuser(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            is_superuser: true,
            team_ids: BTreeSet::new(),
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Bypasses tier resolution entirely
    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn team_ids(&self) -> &BTreeSet<TeamId> {
        &self.team_ids
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn is_user(&self, user_id: UserId) -> bool {
        self.user_id == Some(user_id)
    }

    /// True when the actor and an author share at least one team
    pub fn shares_team_with(&self, author_teams: &BTreeSet<TeamId>) -> bool {
        !self.team_ids.is_disjoint(author_teams)
    }

    pub fn add_team(&mut self, team_id: TeamId) {
        self.team_ids.insert(team_id);
    }

    /// Subject string used in log events
    pub fn subject(&self) -> String {
        match self.user_id {
            Some(id) => id.to_string(),
            None => "anonymous".to_string(),
        }
    }
}

/// Helper to build a signed-in [`Actor`] from session data
pub struct ActorBuilder {
    actor: Actor,
}

impl ActorBuilder {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            actor: Actor::user(user_id),
        }
    }

    pub fn with_team(mut self, team_id: TeamId) -> Self {
        self.actor.add_team(team_id);
        self
    }

    pub fn with_teams(mut self, team_ids: impl IntoIterator<Item = TeamId>) -> Self {
        self.actor.team_ids.extend(team_ids);
        self
    }

    /// Grant the superuser override
    pub fn as_superuser(mut self) -> Self {
        self.actor.is_superuser = true;
        self
    }

    pub fn build(self) -> Actor {
        self.actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anonymous_actor() {
        let actor = Actor::anonymous();
        assert!(!actor.is_authenticated());
        assert!(!actor.is_superuser());
        assert_eq!(actor.subject(), "anonymous");
    }

    #[test]
    fn test_team_overlap() {
        let actor = ActorBuilder::for_user(UserId::new(1))
            .with_teams([TeamId::new(10), TeamId::new(20)])
            .build();

        let author_teams: BTreeSet<_> = [TeamId::new(20), TeamId::new(30)].into_iter().collect();
        assert!(actor.shares_team_with(&author_teams));

        let strangers: BTreeSet<_> = [TeamId::new(30)].into_iter().collect();
        assert!(!actor.shares_team_with(&strangers));
        assert!(!actor.shares_team_with(&BTreeSet::new()));
    }

    #[test]
    fn test_actor_builder() {
        let actor = ActorBuilder::for_user(UserId::new(7))
            .with_team(TeamId::new(3))
            .as_superuser()
            .build();

        assert!(actor.is_authenticated());
        assert!(actor.is_user(UserId::new(7)));
        assert!(actor.is_superuser());
        assert!(actor.team_ids().contains(&TeamId::new(3)));
        assert_eq!(actor.subject(), "user_7");
    }

    #[test]
    fn test_session_superuser_needs_user() {
        let err = serde_json::from_value::<Actor>(json!({ "is_superuser": true })).unwrap_err();
        assert!(err.to_string().contains("requires a signed-in user"));

        let admin: Actor =
            serde_json::from_value(json!({ "user_id": 4, "is_superuser": true })).unwrap();
        assert!(admin.is_superuser());
        assert!(admin.is_authenticated());

        let reader: Actor = serde_json::from_value(json!({ "team_ids": [2] })).unwrap();
        assert!(!reader.is_authenticated());
        assert!(reader.team_ids().contains(&TeamId::new(2)));
    }
}
