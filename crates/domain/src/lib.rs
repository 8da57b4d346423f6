//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod actor;
mod authorization;
mod catalog;
mod navigation;
mod permission;
mod role;
mod role_alias;

pub use actor::{Actor, ActorKind, ProjectAssignment};
pub use authorization::{
    AccessScope, AuthorizationDecision, AuthorizationQuery, EffectivePermissions,
    GrantedPermission, MatchedSource, ValidatedQuery,
};
pub use catalog::{standard_permissions, standard_roles};
pub use navigation::NavigationSection;
pub use permission::{Permission, PermissionSlug, SLUG_MAX_LENGTH};
pub use role::{Role, RoleInput, RoleScope, RoleSlug};
pub use role_alias::canonical_role_slug;
