use std::collections::BTreeMap;

use atrium_core::{ActorId, AppError, AppResult, ProjectId};
use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionSlug, Role};

/// Input of a single authorization decision.
///
/// The permission slug is kept raw so malformed transport values surface as
/// [`AppError::InvalidQuery`] during validation rather than at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationQuery {
    /// Actor asking for access.
    pub actor_id: ActorId,
    /// Requested permission slug.
    pub permission_slug: String,
    /// Project the request is scoped to, if any.
    pub project_id: Option<ProjectId>,
}

impl AuthorizationQuery {
    /// Creates a query without project scope.
    #[must_use]
    pub fn global(actor_id: impl Into<ActorId>, permission_slug: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            permission_slug: permission_slug.into(),
            project_id: None,
        }
    }

    /// Creates a query scoped to one project.
    #[must_use]
    pub fn in_project(
        actor_id: impl Into<ActorId>,
        permission_slug: impl Into<String>,
        project_id: impl Into<ProjectId>,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            permission_slug: permission_slug.into(),
            project_id: Some(project_id.into()),
        }
    }

    /// Checks the query shape and returns its typed form.
    pub fn validate(&self) -> AppResult<ValidatedQuery> {
        if self.actor_id.is_blank() {
            return Err(AppError::InvalidQuery("actor id is missing".to_owned()));
        }

        if self.permission_slug.trim().is_empty() {
            return Err(AppError::InvalidQuery(format!(
                "permission slug is missing for actor '{}'",
                self.actor_id
            )));
        }

        let permission = PermissionSlug::new(self.permission_slug.as_str())
            .map_err(|error| AppError::InvalidQuery(error.to_string()))?;

        if let Some(project_id) = &self.project_id
            && project_id.is_blank()
        {
            return Err(AppError::InvalidQuery(
                "project id was supplied but is blank".to_owned(),
            ));
        }

        Ok(ValidatedQuery {
            actor_id: self.actor_id.clone(),
            permission,
            project_id: self.project_id.clone(),
        })
    }
}

/// Authorization query whose fields passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    actor_id: ActorId,
    permission: PermissionSlug,
    project_id: Option<ProjectId>,
}

impl ValidatedQuery {
    /// Returns the actor id.
    #[must_use]
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Returns the requested permission.
    #[must_use]
    pub fn permission(&self) -> &PermissionSlug {
        &self.permission
    }

    /// Returns the project scope, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<&ProjectId> {
        self.project_id.as_ref()
    }
}

/// Tier that produced an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedSource {
    /// The actor's global role grants the permission.
    Global,
    /// The actor's role in the queried project grants the permission.
    Project,
    /// No role grants the permission.
    None,
}

impl MatchedSource {
    /// Returns a stable value for logs and audit records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
            Self::None => "none",
        }
    }
}

/// Breadth of an allowed decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    /// Unrestricted access to the resource.
    Full,
    /// Access limited to records owned by the actor.
    OwnRecords,
}

/// Outcome of an authorization query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Tier that matched.
    pub matched_source: MatchedSource,
    /// Breadth of the allowed access.
    pub scope: AccessScope,
}

impl AuthorizationDecision {
    /// Full access granted by a role tier.
    #[must_use]
    pub fn granted(matched_source: MatchedSource) -> Self {
        Self {
            allowed: true,
            matched_source,
            scope: AccessScope::Full,
        }
    }

    /// Hard denial.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            allowed: false,
            matched_source: MatchedSource::None,
            scope: AccessScope::Full,
        }
    }

    /// Access restricted to the actor's own records, issued when no role
    /// tier matched.
    #[must_use]
    pub fn own_records_only() -> Self {
        Self {
            allowed: true,
            matched_source: MatchedSource::None,
            scope: AccessScope::OwnRecords,
        }
    }

    /// Returns whether access is restricted to own records.
    #[must_use]
    pub fn is_own_records_only(&self) -> bool {
        self.allowed && self.scope == AccessScope::OwnRecords
    }
}

/// Permission held by an actor together with the tier that grants it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedPermission {
    /// Granted permission.
    #[serde(flatten)]
    pub permission: Permission,
    /// Tier that grants it.
    pub source: MatchedSource,
}

/// Union of the permissions an actor holds through its global role and one
/// project role, deduplicated by slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<GrantedPermission>", from = "Vec<GrantedPermission>")]
pub struct EffectivePermissions {
    permissions: BTreeMap<PermissionSlug, GrantedPermission>,
}

impl EffectivePermissions {
    /// Builds the union of the global role and project role permission sets.
    ///
    /// On slug collisions the global role's entry is kept and tagged
    /// [`MatchedSource::Global`].
    #[must_use]
    pub fn union(global_role: Option<&Role>, project_role: Option<&Role>) -> Self {
        let mut permissions = BTreeMap::new();
        let tiers = [
            (global_role, MatchedSource::Global),
            (project_role, MatchedSource::Project),
        ];
        for (role, source) in tiers {
            let Some(role) = role else {
                continue;
            };

            for permission in role.permissions() {
                permissions
                    .entry(permission.slug().clone())
                    .or_insert_with(|| GrantedPermission {
                        permission: permission.clone(),
                        source,
                    });
            }
        }

        Self { permissions }
    }

    /// Returns whether the permission is part of the set.
    #[must_use]
    pub fn contains(&self, slug: &PermissionSlug) -> bool {
        self.permissions.contains_key(slug)
    }

    /// Returns whether any of the slugs is part of the set.
    #[must_use]
    pub fn contains_any<'a>(&self, slugs: impl IntoIterator<Item = &'a PermissionSlug>) -> bool {
        slugs.into_iter().any(|slug| self.contains(slug))
    }

    /// Returns the tier granting a permission, `None` when it is not held.
    #[must_use]
    pub fn source_of(&self, slug: &PermissionSlug) -> Option<MatchedSource> {
        self.permissions.get(slug).map(|granted| granted.source)
    }

    /// Returns granted permissions ordered by slug.
    pub fn iter(&self) -> impl Iterator<Item = &GrantedPermission> {
        self.permissions.values()
    }

    /// Returns slugs in order.
    pub fn slugs(&self) -> impl Iterator<Item = &PermissionSlug> {
        self.permissions.keys()
    }

    /// Returns the number of distinct permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl From<EffectivePermissions> for Vec<GrantedPermission> {
    fn from(value: EffectivePermissions) -> Self {
        value.permissions.into_values().collect()
    }
}

impl From<Vec<GrantedPermission>> for EffectivePermissions {
    fn from(value: Vec<GrantedPermission>) -> Self {
        let mut permissions = BTreeMap::new();
        for granted in value {
            permissions
                .entry(granted.permission.slug().clone())
                .or_insert(granted);
        }

        Self { permissions }
    }
}
