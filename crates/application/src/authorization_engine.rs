//! Pure authorization decisions over caller-supplied snapshots.
//!
//! Nothing here performs I/O or keeps state; the same snapshot and query
//! always produce the same decision.

use atrium_core::ProjectId;
use atrium_domain::{
    Actor, AuthorizationDecision, EffectivePermissions, MatchedSource, PermissionSlug, Role,
    RoleScope, ValidatedQuery,
};

use crate::FallbackPolicy;

/// Everything needed to decide for one actor, optionally inside one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSnapshot {
    /// Actor the snapshot belongs to.
    pub actor: Actor,
    /// The actor's resolved global role. Project-scoped roles never grant
    /// from this slot.
    pub global_role: Option<Role>,
    /// Project the project role belongs to.
    pub project_id: Option<ProjectId>,
    /// The actor's resolved role in `project_id`.
    pub project_role: Option<Role>,
}

impl AccessSnapshot {
    /// Decides a validated query.
    ///
    /// Order: global role, then the project role when the query names the
    /// snapshot's project, then the fallback policy.
    #[must_use]
    pub fn evaluate(
        &self,
        query: &ValidatedQuery,
        fallback: &dyn FallbackPolicy,
    ) -> AuthorizationDecision {
        if let Some(decision) = global_match(self.global_role.as_ref(), query.permission()) {
            return decision;
        }

        let project_role = match (query.project_id(), self.project_id.as_ref()) {
            (Some(queried), Some(loaded)) if queried == loaded => self.project_role.as_ref(),
            _ => None,
        };

        if let Some(decision) = project_match(project_role, query.permission()) {
            return decision;
        }

        fallback.decide_unmatched(&self.actor, query)
    }

    /// Returns the union of global and project role permissions.
    #[must_use]
    pub fn effective_permissions(&self) -> EffectivePermissions {
        EffectivePermissions::union(
            global_tier(self.global_role.as_ref()),
            self.project_role.as_ref(),
        )
    }
}

/// Global tier: a global grant is sufficient regardless of project scope.
///
/// Only application-scope roles take part.
#[must_use]
pub fn global_match(
    global_role: Option<&Role>,
    permission: &PermissionSlug,
) -> Option<AuthorizationDecision> {
    global_tier(global_role)
        .filter(|role| role.has_permission(permission))
        .map(|_| AuthorizationDecision::granted(MatchedSource::Global))
}

/// Project tier.
#[must_use]
pub fn project_match(
    project_role: Option<&Role>,
    permission: &PermissionSlug,
) -> Option<AuthorizationDecision> {
    project_role
        .filter(|role| role.has_permission(permission))
        .map(|_| AuthorizationDecision::granted(MatchedSource::Project))
}

fn global_tier(global_role: Option<&Role>) -> Option<&Role> {
    global_role.filter(|role| role.scope() == RoleScope::Application)
}
