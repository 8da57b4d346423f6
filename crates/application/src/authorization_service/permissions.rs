use atrium_domain::{AuthorizationDecision, AuthorizationQuery, EffectivePermissions};

use crate::authorization_engine::{global_match, project_match};

use super::*;

impl AuthorizationService {
    /// Decides whether an actor holds a permission, optionally inside a
    /// project.
    ///
    /// Denial is returned as a decision. Errors mean the query was malformed,
    /// referenced something unresolvable, or a directory failed.
    pub async fn authorize(&self, query: &AuthorizationQuery) -> AppResult<AuthorizationDecision> {
        let query = query.validate()?;
        let actor = self.load_actor(query.actor_id()).await?;
        let global_role = self.load_global_role(&actor).await?;

        // The assignment is never consulted when the global role already grants.
        if let Some(decision) = global_match(global_role.as_ref(), query.permission()) {
            log_decision(&query, decision);
            return Ok(decision);
        }

        let project_role = match query.project_id() {
            Some(project_id) => {
                self.load_project_role(query.actor_id(), project_id)
                    .await?
            }
            None => None,
        };

        let snapshot = AccessSnapshot {
            actor,
            global_role,
            project_id: query.project_id().cloned(),
            project_role,
        };
        let decision = snapshot.evaluate(&query, self.fallback.as_ref());
        log_decision(&query, decision);

        Ok(decision)
    }

    /// Decides whether an actor holds a permission globally or through the
    /// role of any project it is assigned to.
    ///
    /// Assignments are checked in project order and the first granting
    /// project role wins. The fallback policy decides when nothing matches.
    pub async fn authorize_in_any_project(
        &self,
        actor_id: &ActorId,
        permission_slug: &str,
    ) -> AppResult<AuthorizationDecision> {
        let query = AuthorizationQuery::global(actor_id.clone(), permission_slug).validate()?;
        let actor = self.load_actor(query.actor_id()).await?;
        let global_role = self.load_global_role(&actor).await?;

        if let Some(decision) = global_match(global_role.as_ref(), query.permission()) {
            log_decision(&query, decision);
            return Ok(decision);
        }

        let mut assignments = self
            .assignments
            .find_assignments_for_actor(query.actor_id())
            .await?;
        assignments.sort_by(|left, right| left.project_id().cmp(right.project_id()));

        for assignment in &assignments {
            let Some(role_id) = assignment.role_id() else {
                continue;
            };

            let role = self.load_role(role_id, query.actor_id()).await?;
            if let Some(decision) = project_match(Some(&role), query.permission()) {
                debug!(
                    actor_id = %query.actor_id(),
                    project_id = %assignment.project_id(),
                    "permission granted through project role"
                );
                log_decision(&query, decision);
                return Ok(decision);
            }
        }

        let decision = self.fallback.decide_unmatched(&actor, &query);
        log_decision(&query, decision);

        Ok(decision)
    }

    /// Returns every permission the actor holds through its global role and,
    /// when a project is given, its role in that project.
    pub async fn resolve_effective_permissions(
        &self,
        actor_id: &ActorId,
        project_id: Option<&ProjectId>,
    ) -> AppResult<EffectivePermissions> {
        let snapshot = self.load_snapshot(actor_id, project_id).await?;
        Ok(snapshot.effective_permissions())
    }
}

fn log_decision(query: &atrium_domain::ValidatedQuery, decision: AuthorizationDecision) {
    debug!(
        actor_id = %query.actor_id(),
        permission = %query.permission(),
        project_id = query.project_id().map(ProjectId::as_str),
        allowed = decision.allowed,
        matched_source = decision.matched_source.as_str(),
        "authorization decided"
    );
}
