use std::collections::{HashMap, HashSet};
use std::path::Path;

use atrium_core::{ActorId, AppError, AppResult, PermissionId, ProjectId, RoleId};
use atrium_domain::{
    Actor, ActorKind, Permission, PermissionSlug, Role, RoleInput, RoleScope, canonical_role_slug,
};
use serde::Deserialize;
use tracing::info;

use crate::InMemoryAccessDirectory;

/// JSON document describing permissions, roles, actors and assignments.
///
/// Role references may use legacy names (`Super Admin`, `super_admin`); they
/// are normalized to canonical slugs while loading. Role ids equal their
/// canonical slugs, so two role entries normalizing to the same slug are
/// rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessSnapshotDocument {
    /// Registered permissions.
    #[serde(default)]
    pub permissions: Vec<PermissionRecord>,
    /// Roles and the permission slugs they grant.
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
    /// Actors with an optional global role reference.
    #[serde(default)]
    pub actors: Vec<ActorRecord>,
    /// Project assignments.
    #[serde(default)]
    pub assignments: Vec<AssignmentRecord>,
}

/// Permission entry of an access snapshot document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionRecord {
    /// Permission slug.
    pub slug: String,
    /// Display name, derived from the slug when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// Grouping category.
    #[serde(default)]
    pub category: Option<String>,
}

/// Role entry of an access snapshot document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleRecord {
    /// Role slug or legacy name.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Application or project scope.
    pub scope: RoleScope,
    /// Granted permission slugs.
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Actor entry of an access snapshot document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorRecord {
    /// Actor id.
    pub id: String,
    /// Account kind.
    #[serde(default = "default_actor_kind")]
    pub kind: ActorKind,
    /// Global role slug or legacy name.
    #[serde(default)]
    pub global_role: Option<String>,
}

/// Assignment entry of an access snapshot document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentRecord {
    /// Assigned actor.
    pub actor_id: String,
    /// Project.
    pub project_id: String,
    /// Project role slug or legacy name.
    #[serde(default)]
    pub role: Option<String>,
}

fn default_actor_kind() -> ActorKind {
    ActorKind::User
}

impl AccessSnapshotDocument {
    /// Parses a document from JSON text.
    pub fn from_json_str(value: &str) -> AppResult<Self> {
        serde_json::from_str(value).map_err(|error| {
            AppError::Validation(format!("invalid access snapshot document: {error}"))
        })
    }

    /// Reads and parses a document from disk.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to read access snapshot '{}': {error}",
                path.display()
            ))
        })?;

        Self::from_json_str(contents.as_str())
    }

    /// Loads the document into a fresh in-memory directory.
    pub async fn into_directory(self) -> AppResult<InMemoryAccessDirectory> {
        let directory = InMemoryAccessDirectory::new();
        let mut catalog: HashMap<PermissionSlug, Permission> = HashMap::new();

        for record in self.permissions {
            let permission = record.into_permission()?;
            catalog.insert(permission.slug().clone(), permission.clone());
            directory.save_permission(permission).await?;
        }

        let role_count = self.roles.len();
        let mut seen_roles = HashSet::new();
        for record in self.roles {
            let legacy_name = record.slug.clone();
            let role = record.into_role(&catalog)?;
            if !seen_roles.insert(role.slug().clone()) {
                return Err(AppError::Validation(format!(
                    "role '{legacy_name}' duplicates role '{}'",
                    role.slug()
                )));
            }

            directory.save_role(role).await?;
        }

        let actor_count = self.actors.len();
        let mut seen_actors = HashSet::new();
        for record in self.actors {
            if !seen_actors.insert(record.id.clone()) {
                return Err(AppError::Validation(format!(
                    "actor '{}' is listed more than once",
                    record.id
                )));
            }

            let global_role = record
                .global_role
                .as_deref()
                .map(canonical_role_id)
                .transpose()?;
            let actor = Actor::new(ActorId::from(record.id), record.kind, global_role)?;
            directory.save_actor(actor).await?;
        }

        let assignment_count = self.assignments.len();
        let mut seen_pairs = HashSet::new();
        for record in self.assignments {
            let actor_id = ActorId::from(record.actor_id);
            let project_id = ProjectId::from(record.project_id);
            if !seen_pairs.insert((actor_id.clone(), project_id.clone())) {
                return Err(AppError::Validation(format!(
                    "actor '{actor_id}' is assigned to project '{project_id}' more than once"
                )));
            }

            let role_id = record.role.as_deref().map(canonical_role_id).transpose()?;
            directory
                .assign_project_role(&actor_id, &project_id, role_id)
                .await?;
        }

        info!(
            permissions = catalog.len(),
            roles = role_count,
            actors = actor_count,
            assignments = assignment_count,
            "access snapshot loaded"
        );

        Ok(directory)
    }
}

impl PermissionRecord {
    fn into_permission(self) -> AppResult<Permission> {
        let slug = PermissionSlug::new(self.slug)?;
        match self.name {
            Some(name) => Permission::new(
                PermissionId::from(slug.as_str()),
                slug,
                name,
                self.category,
            ),
            None => Ok(Permission::from_slug(slug, self.category.as_deref())),
        }
    }
}

impl RoleRecord {
    fn into_role(self, catalog: &HashMap<PermissionSlug, Permission>) -> AppResult<Role> {
        let slug = canonical_role_slug(self.slug.as_str())?;
        let permissions = self
            .permissions
            .iter()
            .map(|value| {
                let permission_slug = PermissionSlug::new(value.as_str())?;
                catalog.get(&permission_slug).cloned().ok_or_else(|| {
                    AppError::Validation(format!(
                        "role '{slug}' grants unknown permission '{permission_slug}'"
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Role::new(RoleInput {
            id: RoleId::from(slug.as_str()),
            name: self.name,
            slug,
            scope: self.scope,
            permissions,
        })
    }
}

fn canonical_role_id(reference: &str) -> AppResult<RoleId> {
    canonical_role_slug(reference).map(|slug| RoleId::from(slug.as_str()))
}

#[cfg(test)]
mod tests {
    use atrium_application::{AuthorizationService, RoleDirectory};
    use atrium_core::{AppError, RoleId};
    use atrium_domain::{AuthorizationQuery, MatchedSource};
    use std::sync::Arc;

    use super::AccessSnapshotDocument;

    const DOCUMENT: &str = r#"{
        "permissions": [
            { "slug": "view_projects", "category": "Project Management" },
            { "slug": "manage_project_users", "category": "Project Management" },
            { "slug": "upload_documents", "name": "Upload Documents" }
        ],
        "roles": [
            { "slug": "Manager", "name": "Manager", "scope": "application",
              "permissions": ["view_projects", "manage_project_users"] },
            { "slug": "contractor", "name": "Contractor", "scope": "project",
              "permissions": ["upload_documents"] }
        ],
        "actors": [
            { "id": "U1", "global_role": "manager" },
            { "id": "C1", "kind": "client" }
        ],
        "assignments": [
            { "actor_id": "U1", "project_id": "P1", "role": "Contractor" }
        ]
    }"#;

    #[tokio::test]
    async fn document_loads_and_answers_queries() {
        let directory = AccessSnapshotDocument::from_json_str(DOCUMENT)
            .unwrap_or_else(|error| panic!("parse failed: {error}"))
            .into_directory()
            .await
            .unwrap_or_else(|error| panic!("load failed: {error}"));
        let directory = Arc::new(directory);
        let service =
            AuthorizationService::new(directory.clone(), directory.clone(), directory.clone());

        let decision = service
            .authorize(&AuthorizationQuery::in_project("U1", "upload_documents", "P1"))
            .await
            .unwrap_or_else(|error| panic!("authorize failed: {error}"));
        assert_eq!(decision.matched_source, MatchedSource::Project);

        let role = directory.find_role(&RoleId::from("manager")).await.ok().flatten();
        assert_eq!(role.map(|role| role.permission_count()), Some(2));
    }

    #[tokio::test]
    async fn legacy_role_names_are_normalized() {
        let document = r#"{
            "roles": [{ "slug": "super_admin", "name": "Super Admin", "scope": "application" }],
            "actors": [{ "id": "U9", "global_role": "Super Admin" }]
        }"#;

        let directory = AccessSnapshotDocument::from_json_str(document)
            .unwrap_or_else(|error| panic!("parse failed: {error}"))
            .into_directory()
            .await;
        assert!(directory.is_ok());
    }

    #[tokio::test]
    async fn role_with_unknown_permission_is_rejected() {
        let document = r#"{
            "roles": [{ "slug": "manager", "name": "Manager", "scope": "application",
                        "permissions": ["view_everything"] }]
        }"#;

        let result = AccessSnapshotDocument::from_json_str(document)
            .unwrap_or_else(|error| panic!("parse failed: {error}"))
            .into_directory()
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_assignment_pair_is_rejected() {
        let document = r#"{
            "actors": [{ "id": "U1" }],
            "assignments": [
                { "actor_id": "U1", "project_id": "P1" },
                { "actor_id": "U1", "project_id": "P1" }
            ]
        }"#;

        let result = AccessSnapshotDocument::from_json_str(document)
            .unwrap_or_else(|error| panic!("parse failed: {error}"))
            .into_directory()
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn roles_colliding_after_normalization_are_rejected() {
        let document = r#"{
            "permissions": [{ "slug": "view_users" }, { "slug": "view_roles" }],
            "roles": [
                { "slug": "super_admin", "name": "Super Admin", "scope": "application",
                  "permissions": ["view_users", "view_roles"] },
                { "slug": "Super Admin", "name": "Super Admin", "scope": "application" }
            ]
        }"#;

        let result = AccessSnapshotDocument::from_json_str(document)
            .unwrap_or_else(|error| panic!("parse failed: {error}"))
            .into_directory()
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_actor_is_rejected() {
        let document = r#"{
            "roles": [{ "slug": "manager", "name": "Manager", "scope": "application" }],
            "actors": [{ "id": "U1", "global_role": "manager" }, { "id": "U1" }]
        }"#;

        let result = AccessSnapshotDocument::from_json_str(document)
            .unwrap_or_else(|error| panic!("parse failed: {error}"))
            .into_directory()
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn project_scoped_global_role_is_rejected() {
        let document = r#"{
            "permissions": [{ "slug": "upload_documents" }],
            "roles": [{ "slug": "project-member", "name": "Project Member", "scope": "project",
                        "permissions": ["upload_documents"] }],
            "actors": [{ "id": "U7", "global_role": "project-member" }]
        }"#;

        let result = AccessSnapshotDocument::from_json_str(document)
            .unwrap_or_else(|error| panic!("parse failed: {error}"))
            .into_directory()
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = AccessSnapshotDocument::from_json_str(r#"{ "groups": [] }"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
