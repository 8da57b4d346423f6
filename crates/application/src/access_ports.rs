use async_trait::async_trait;

use atrium_core::{ActorId, AppResult, ProjectId, RoleId};
use atrium_domain::{Actor, ProjectAssignment, Role};

/// Read port for actor snapshots.
///
/// Implementations report storage failures as
/// [`AppError::UpstreamLookup`](atrium_core::AppError::UpstreamLookup) and
/// return `Ok(None)` for unknown actors.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// Finds an actor and its global role reference.
    async fn find_actor(&self, actor_id: &ActorId) -> AppResult<Option<Actor>>;
}

/// Read port for project assignments.
#[async_trait]
pub trait ProjectAssignmentDirectory: Send + Sync {
    /// Finds the assignment binding an actor to a project.
    async fn find_assignment(
        &self,
        actor_id: &ActorId,
        project_id: &ProjectId,
    ) -> AppResult<Option<ProjectAssignment>>;

    /// Lists every project assignment of an actor.
    async fn find_assignments_for_actor(
        &self,
        actor_id: &ActorId,
    ) -> AppResult<Vec<ProjectAssignment>>;
}

/// Read port for roles and their permission sets.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Finds a role with its permissions.
    async fn find_role(&self, role_id: &RoleId) -> AppResult<Option<Role>>;
}
