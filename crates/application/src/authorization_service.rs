use std::sync::Arc;

use atrium_core::{ActorId, AppError, AppResult, ProjectId, RoleId};
use atrium_domain::{Actor, Role, RoleScope};
use tracing::debug;

use crate::{
    AccessSnapshot, ActorDirectory, DenyFallback, FallbackPolicy, ProjectAssignmentDirectory,
    RoleDirectory,
};

mod enforcement;
mod permissions;
mod sections;


/// Application service for actor authorization checks.
///
/// Loads snapshots through the injected directories, then decides with the
/// pure [`AccessSnapshot`] rules.
#[derive(Clone)]
pub struct AuthorizationService {
    actors: Arc<dyn ActorDirectory>,
    assignments: Arc<dyn ProjectAssignmentDirectory>,
    roles: Arc<dyn RoleDirectory>,
    fallback: Arc<dyn FallbackPolicy>,
}

impl AuthorizationService {
    /// Creates a new authorization service that denies unmatched queries.
    #[must_use]
    pub fn new(
        actors: Arc<dyn ActorDirectory>,
        assignments: Arc<dyn ProjectAssignmentDirectory>,
        roles: Arc<dyn RoleDirectory>,
    ) -> Self {
        Self {
            actors,
            assignments,
            roles,
            fallback: Arc::new(DenyFallback),
        }
    }

    /// Replaces the strategy used when no role grants a permission.
    #[must_use]
    pub fn with_fallback_policy(mut self, fallback: Arc<dyn FallbackPolicy>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Loads the full snapshot for an actor and optional project.
    pub async fn load_snapshot(
        &self,
        actor_id: &ActorId,
        project_id: Option<&ProjectId>,
    ) -> AppResult<AccessSnapshot> {
        if actor_id.is_blank() {
            return Err(AppError::InvalidQuery("actor id is missing".to_owned()));
        }

        if project_id.is_some_and(ProjectId::is_blank) {
            return Err(AppError::InvalidQuery(
                "project id was supplied but is blank".to_owned(),
            ));
        }

        let actor = self.load_actor(actor_id).await?;
        let global_role = self.load_global_role(&actor).await?;
        let project_role = match project_id {
            Some(project_id) => self.load_project_role(actor_id, project_id).await?,
            None => None,
        };

        Ok(AccessSnapshot {
            actor,
            global_role,
            project_id: project_id.cloned(),
            project_role,
        })
    }

    async fn load_actor(&self, actor_id: &ActorId) -> AppResult<Actor> {
        self.actors.find_actor(actor_id).await?.ok_or_else(|| {
            AppError::InvalidQuery(format!("actor '{actor_id}' cannot be resolved"))
        })
    }

    async fn load_global_role(&self, actor: &Actor) -> AppResult<Option<Role>> {
        let Some(role_id) = actor.global_role_id() else {
            return Ok(None);
        };

        let role = self.load_role(role_id, actor.id()).await?;
        if role.scope() != RoleScope::Application {
            return Err(AppError::InvalidQuery(format!(
                "global role '{role_id}' of actor '{}' is project-scoped",
                actor.id()
            )));
        }

        Ok(Some(role))
    }

    async fn load_project_role(
        &self,
        actor_id: &ActorId,
        project_id: &ProjectId,
    ) -> AppResult<Option<Role>> {
        let Some(assignment) = self
            .assignments
            .find_assignment(actor_id, project_id)
            .await?
        else {
            debug!(
                actor_id = %actor_id,
                project_id = %project_id,
                "actor is not assigned to project"
            );
            return Ok(None);
        };

        match assignment.role_id() {
            Some(role_id) => self.load_role(role_id, actor_id).await.map(Some),
            None => Ok(None),
        }
    }

    async fn load_role(&self, role_id: &RoleId, actor_id: &ActorId) -> AppResult<Role> {
        self.roles.find_role(role_id).await?.ok_or_else(|| {
            AppError::InvalidQuery(format!(
                "role '{role_id}' referenced by actor '{actor_id}' cannot be resolved"
            ))
        })
    }
}
