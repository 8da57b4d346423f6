use std::collections::HashMap;

use async_trait::async_trait;
use atrium_application::{ActorDirectory, ProjectAssignmentDirectory, RoleDirectory};
use atrium_core::{ActorId, AppError, AppResult, ProjectId, RoleId};
use atrium_domain::{
    Actor, Permission, PermissionSlug, ProjectAssignment, Role, RoleScope, standard_permissions,
    standard_roles,
};
use tokio::sync::RwLock;

/// In-memory access directory implementing every authorization lookup port.
#[derive(Debug, Default)]
pub struct InMemoryAccessDirectory {
    permissions: RwLock<HashMap<PermissionSlug, Permission>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    actors: RwLock<HashMap<ActorId, Actor>>,
    assignments: RwLock<HashMap<(ActorId, ProjectId), ProjectAssignment>>,
}

impl InMemoryAccessDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the standard permission catalog and application roles.
    pub async fn seed_standard_catalog(&self) -> AppResult<()> {
        for permission in standard_permissions()? {
            self.save_permission(permission).await?;
        }

        for role in standard_roles()? {
            self.save_role(role).await?;
        }

        Ok(())
    }

    /// Stores a permission, failing when the slug already exists.
    pub async fn save_permission(&self, permission: Permission) -> AppResult<()> {
        let mut permissions = self.permissions.write().await;
        if permissions.contains_key(permission.slug()) {
            return Err(AppError::Conflict(format!(
                "permission '{}' already exists",
                permission.slug()
            )));
        }

        permissions.insert(permission.slug().clone(), permission);
        Ok(())
    }

    /// Lists permissions ordered by slug.
    pub async fn list_permissions(&self) -> Vec<Permission> {
        let mut listed: Vec<Permission> = self.permissions.read().await.values().cloned().collect();
        listed.sort_by(|left, right| left.slug().cmp(right.slug()));
        listed
    }

    /// Stores or replaces a role.
    ///
    /// Every permission of the role must already be registered. A role held
    /// as a global role cannot be replaced by a project-scoped one.
    pub async fn save_role(&self, role: Role) -> AppResult<()> {
        {
            let permissions = self.permissions.read().await;
            if let Some(unknown) = role
                .permissions()
                .find(|permission| !permissions.contains_key(permission.slug()))
            {
                return Err(AppError::Validation(format!(
                    "role '{}' grants unknown permission '{}'",
                    role.slug(),
                    unknown.slug()
                )));
            }
        }

        let mut roles = self.roles.write().await;
        if let Some(conflict) = roles
            .values()
            .find(|stored| stored.id() != role.id() && stored.is_same_role(&role))
        {
            return Err(AppError::Conflict(format!(
                "role slug '{}' is already used by role '{}'",
                role.slug(),
                conflict.id()
            )));
        }

        if role.scope() == RoleScope::Project {
            let actors = self.actors.read().await;
            if let Some(holder) = actors
                .values()
                .find(|actor| actor.global_role_id() == Some(role.id()))
            {
                return Err(AppError::Validation(format!(
                    "role '{}' is the global role of actor '{}' and cannot be project-scoped",
                    role.slug(),
                    holder.id()
                )));
            }
        }

        roles.insert(role.id().clone(), role);
        Ok(())
    }

    /// Lists roles ordered by slug.
    pub async fn list_roles(&self) -> Vec<Role> {
        let mut listed: Vec<Role> = self.roles.read().await.values().cloned().collect();
        listed.sort_by(|left, right| left.slug().cmp(right.slug()));
        listed
    }

    /// Stores or replaces an actor snapshot.
    ///
    /// The global role must exist and be application-scoped.
    pub async fn save_actor(&self, actor: Actor) -> AppResult<()> {
        if let Some(role_id) = actor.global_role_id() {
            self.ensure_global_role(role_id).await?;
        }

        self.actors.write().await.insert(actor.id().clone(), actor);
        Ok(())
    }

    /// Replaces an actor's global role. `None` clears it.
    pub async fn set_global_role(
        &self,
        actor_id: &ActorId,
        role_id: Option<RoleId>,
    ) -> AppResult<()> {
        if let Some(role_id) = &role_id {
            self.ensure_global_role(role_id).await?;
        }

        let mut actors = self.actors.write().await;
        let actor = actors
            .get_mut(actor_id)
            .ok_or_else(|| AppError::NotFound(format!("actor '{actor_id}' does not exist")))?;
        actor.set_global_role(role_id);
        Ok(())
    }

    /// Attaches an actor to a project, overwriting any previous assignment
    /// for the same pair.
    pub async fn assign_project_role(
        &self,
        actor_id: &ActorId,
        project_id: &ProjectId,
        role_id: Option<RoleId>,
    ) -> AppResult<()> {
        if !self.actors.read().await.contains_key(actor_id) {
            return Err(AppError::NotFound(format!(
                "actor '{actor_id}' does not exist"
            )));
        }

        if let Some(role_id) = &role_id {
            self.ensure_role_exists(role_id).await?;
        }

        let assignment = ProjectAssignment::new(actor_id.clone(), project_id.clone(), role_id)?;
        self.assignments
            .write()
            .await
            .insert((actor_id.clone(), project_id.clone()), assignment);
        Ok(())
    }

    /// Removes an actor from a project.
    pub async fn detach_from_project(
        &self,
        actor_id: &ActorId,
        project_id: &ProjectId,
    ) -> AppResult<()> {
        self.assignments
            .write()
            .await
            .remove(&(actor_id.clone(), project_id.clone()))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "actor '{actor_id}' is not assigned to project '{project_id}'"
                ))
            })
    }

    /// Lists assignments of one project ordered by actor.
    pub async fn list_project_assignments(&self, project_id: &ProjectId) -> Vec<ProjectAssignment> {
        let assignments = self.assignments.read().await;
        let mut listed: Vec<ProjectAssignment> = assignments
            .iter()
            .filter_map(|((_, stored_project_id), assignment)| {
                (stored_project_id == project_id).then_some(assignment.clone())
            })
            .collect();
        listed.sort_by(|left, right| left.actor_id().cmp(right.actor_id()));
        listed
    }

    async fn ensure_global_role(&self, role_id: &RoleId) -> AppResult<()> {
        let roles = self.roles.read().await;
        let role = roles
            .get(role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;

        if role.scope() != RoleScope::Application {
            return Err(AppError::Validation(format!(
                "role '{role_id}' is project-scoped and cannot be a global role"
            )));
        }

        Ok(())
    }

    async fn ensure_role_exists(&self, role_id: &RoleId) -> AppResult<()> {
        if self.roles.read().await.contains_key(role_id) {
            return Ok(());
        }

        Err(AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}

#[async_trait]
impl ActorDirectory for InMemoryAccessDirectory {
    async fn find_actor(&self, actor_id: &ActorId) -> AppResult<Option<Actor>> {
        Ok(self.actors.read().await.get(actor_id).cloned())
    }
}

#[async_trait]
impl ProjectAssignmentDirectory for InMemoryAccessDirectory {
    async fn find_assignment(
        &self,
        actor_id: &ActorId,
        project_id: &ProjectId,
    ) -> AppResult<Option<ProjectAssignment>> {
        Ok(self
            .assignments
            .read()
            .await
            .get(&(actor_id.clone(), project_id.clone()))
            .cloned())
    }

    async fn find_assignments_for_actor(
        &self,
        actor_id: &ActorId,
    ) -> AppResult<Vec<ProjectAssignment>> {
        let assignments = self.assignments.read().await;
        let mut listed: Vec<ProjectAssignment> = assignments
            .iter()
            .filter_map(|((stored_actor_id, _), assignment)| {
                (stored_actor_id == actor_id).then_some(assignment.clone())
            })
            .collect();
        listed.sort_by(|left, right| left.project_id().cmp(right.project_id()));
        Ok(listed)
    }
}

#[async_trait]
impl RoleDirectory for InMemoryAccessDirectory {
    async fn find_role(&self, role_id: &RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(role_id).cloned())
    }
}

#[cfg(test)]
mod tests;
