use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use atrium_core::{AppError, AppResult, NonEmptyString, RoleId};
use serde::{Deserialize, Serialize};

use crate::permission::validate_slug;
use crate::{Permission, PermissionSlug};

/// Canonical role identity, e.g. `super-admin`.
///
/// Role comparisons always go through this value, never through display
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleSlug(String);

impl RoleSlug {
    /// Creates a validated role slug.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validate_slug("role", value.into()).map(Self)
    }

    /// Returns the slug value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for RoleSlug {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for RoleSlug {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleSlug> for String {
    fn from(value: RoleSlug) -> Self {
        value.0
    }
}

impl Display for RoleSlug {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Where a role's permissions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleScope {
    /// Permissions apply everywhere.
    Application,
    /// Permissions apply only inside the project the role is attached to.
    Project,
}

impl RoleScope {
    /// Returns a stable storage value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Project => "project",
        }
    }
}

impl FromStr for RoleScope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "application" => Ok(Self::Application),
            "project" => Ok(Self::Project),
            _ => Err(AppError::Validation(format!(
                "unknown role scope '{value}'"
            ))),
        }
    }
}

/// Input payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInput {
    /// Role id.
    pub id: RoleId,
    /// Display name.
    pub name: String,
    /// Canonical slug.
    pub slug: RoleSlug,
    /// Application or project scope.
    pub scope: RoleScope,
    /// Granted permissions. Repeated slugs collapse into one entry.
    pub permissions: Vec<Permission>,
}

/// Named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    slug: RoleSlug,
    scope: RoleScope,
    permissions: BTreeMap<PermissionSlug, Permission>,
}

impl Role {
    /// Creates a validated role.
    pub fn new(input: RoleInput) -> AppResult<Self> {
        let mut role = Self {
            id: input.id,
            name: NonEmptyString::new(input.name)?,
            slug: input.slug,
            scope: input.scope,
            permissions: BTreeMap::new(),
        };

        for permission in input.permissions {
            role.grant(permission);
        }

        Ok(role)
    }

    /// Adds a permission, returning `false` when the slug was already granted.
    pub fn grant(&mut self, permission: Permission) -> bool {
        if self.permissions.contains_key(permission.slug()) {
            return false;
        }

        self.permissions.insert(permission.slug().clone(), permission);
        true
    }

    /// Removes a permission by slug, returning whether it was granted.
    pub fn revoke(&mut self, slug: &PermissionSlug) -> bool {
        self.permissions.remove(slug).is_some()
    }

    /// Returns whether the role grants the permission.
    #[must_use]
    pub fn has_permission(&self, slug: &PermissionSlug) -> bool {
        self.permissions.contains_key(slug)
    }

    /// Returns granted permissions ordered by slug.
    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.values()
    }

    /// Returns the number of granted permissions.
    #[must_use]
    pub fn permission_count(&self) -> usize {
        self.permissions.len()
    }

    /// Returns the role id.
    #[must_use]
    pub fn id(&self) -> &RoleId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the canonical slug.
    #[must_use]
    pub fn slug(&self) -> &RoleSlug {
        &self.slug
    }

    /// Returns the role scope.
    #[must_use]
    pub fn scope(&self) -> RoleScope {
        self.scope
    }

    /// Returns whether two roles share the same canonical identity.
    #[must_use]
    pub fn is_same_role(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}
