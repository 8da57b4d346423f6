use atrium_domain::{AuthorizationDecision, AuthorizationQuery, PermissionSlug};
use tracing::warn;

use super::*;

impl AuthorizationService {
    /// Ensures an actor has the permission, turning a denial into
    /// [`AppError::Forbidden`].
    ///
    /// Own-records decisions from the fallback policy pass; callers must read
    /// the returned scope.
    pub async fn require_permission(
        &self,
        query: &AuthorizationQuery,
    ) -> AppResult<AuthorizationDecision> {
        let decision = self.authorize(query).await?;
        if decision.allowed {
            return Ok(decision);
        }

        warn!(
            actor_id = %query.actor_id,
            permission = %query.permission_slug,
            project_id = query.project_id.as_ref().map(ProjectId::as_str),
            "actor is missing required permission"
        );

        let scope = query
            .project_id
            .as_ref()
            .map(|project_id| format!(" in project '{project_id}'"))
            .unwrap_or_default();

        Err(AppError::Forbidden(format!(
            "actor '{}' is missing permission '{}'{scope}",
            query.actor_id, query.permission_slug
        )))
    }

    /// Returns whether any of the permissions is held through a role.
    ///
    /// The fallback policy does not take part: this answers "does the actor
    /// hold", like the effective permission set.
    pub async fn has_any_permission<S: AsRef<str>>(
        &self,
        actor_id: &ActorId,
        permission_slugs: &[S],
        project_id: Option<&ProjectId>,
    ) -> AppResult<bool> {
        if permission_slugs.is_empty() {
            return Err(AppError::InvalidQuery(format!(
                "no permissions supplied for actor '{actor_id}'"
            )));
        }

        let wanted = permission_slugs
            .iter()
            .map(|slug| {
                PermissionSlug::new(slug.as_ref())
                    .map_err(|error| AppError::InvalidQuery(error.to_string()))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let effective = self
            .resolve_effective_permissions(actor_id, project_id)
            .await?;

        Ok(effective.contains_any(&wanted))
    }
}
