use atrium_domain::NavigationSection;

use super::*;

impl AuthorizationService {
    /// Returns the navigation sections an actor may see.
    ///
    /// A section is visible when the actor holds at least one of the
    /// permissions required by that section (logical OR). Derived from the
    /// effective permission set only.
    pub async fn resolve_visible_sections(
        &self,
        actor_id: &ActorId,
        project_id: Option<&ProjectId>,
    ) -> AppResult<Vec<NavigationSection>> {
        let permissions = self
            .resolve_effective_permissions(actor_id, project_id)
            .await?;

        let mut sections = Vec::new();
        for section in NavigationSection::all() {
            let required = section.required_permission_slugs()?;
            if required.is_empty() || permissions.contains_any(&required) {
                sections.push(*section);
            }
        }

        Ok(sections)
    }
}
