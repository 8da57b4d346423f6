use std::str::FromStr;

use atrium_core::{ActorId, AppError, AppResult, ProjectId, RoleId};
use serde::{Deserialize, Serialize};

/// Kind of account subject to authorization checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// Staff user account.
    User,
    /// Client account.
    Client,
}

impl ActorKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Client => "client",
        }
    }
}

impl FromStr for ActorKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(Self::User),
            "client" => Ok(Self::Client),
            _ => Err(AppError::Validation(format!(
                "unknown actor kind '{value}'"
            ))),
        }
    }
}

/// User or client account with at most one global role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    kind: ActorKind,
    global_role_id: Option<RoleId>,
}

impl Actor {
    /// Creates an actor snapshot.
    pub fn new(id: ActorId, kind: ActorKind, global_role_id: Option<RoleId>) -> AppResult<Self> {
        if id.is_blank() {
            return Err(AppError::Validation("actor id must not be blank".to_owned()));
        }

        Ok(Self {
            id,
            kind,
            global_role_id,
        })
    }

    /// Returns the actor id.
    #[must_use]
    pub fn id(&self) -> &ActorId {
        &self.id
    }

    /// Returns the account kind.
    #[must_use]
    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Returns the application-wide role, if one is assigned.
    #[must_use]
    pub fn global_role_id(&self) -> Option<&RoleId> {
        self.global_role_id.as_ref()
    }

    /// Replaces the global role. Assigning a new role drops the previous one.
    pub fn set_global_role(&mut self, role_id: Option<RoleId>) {
        self.global_role_id = role_id;
    }
}

/// Binding of an actor to a project with an optional project-specific role.
///
/// At most one assignment exists per `(actor_id, project_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAssignment {
    actor_id: ActorId,
    project_id: ProjectId,
    role_id: Option<RoleId>,
}

impl ProjectAssignment {
    /// Creates a project assignment.
    pub fn new(
        actor_id: ActorId,
        project_id: ProjectId,
        role_id: Option<RoleId>,
    ) -> AppResult<Self> {
        if actor_id.is_blank() {
            return Err(AppError::Validation(
                "assignment actor id must not be blank".to_owned(),
            ));
        }

        if project_id.is_blank() {
            return Err(AppError::Validation(
                "assignment project id must not be blank".to_owned(),
            ));
        }

        Ok(Self {
            actor_id,
            project_id,
            role_id,
        })
    }

    /// Returns the assigned actor.
    #[must_use]
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the project.
    #[must_use]
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the project-specific role. `None` grants nothing.
    #[must_use]
    pub fn role_id(&self) -> Option<&RoleId> {
        self.role_id.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use atrium_core::{ActorId, ProjectId, RoleId};

    use super::{Actor, ActorKind, ProjectAssignment};

    #[test]
    fn blank_actor_id_is_rejected() {
        assert!(Actor::new(ActorId::from(""), ActorKind::User, None).is_err());
    }

    #[test]
    fn setting_global_role_replaces_previous() {
        let mut actor = Actor::new(
            ActorId::from("U1"),
            ActorKind::User,
            Some(RoleId::from("employee")),
        )
        .unwrap_or_else(|_| panic!("actor should be valid"));
        actor.set_global_role(Some(RoleId::from("manager")));
        assert_eq!(actor.global_role_id(), Some(&RoleId::from("manager")));
    }

    #[test]
    fn assignment_without_role_is_allowed() {
        let assignment = ProjectAssignment::new(ActorId::from("U1"), ProjectId::from("P1"), None)
            .unwrap_or_else(|_| panic!("assignment should be valid"));
        assert!(assignment.role_id().is_none());
    }

    #[test]
    fn assignment_with_blank_project_is_rejected() {
        assert!(ProjectAssignment::new(ActorId::from("U1"), ProjectId::from(" "), None).is_err());
    }
}
