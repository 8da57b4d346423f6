//! Standard permission catalog and application roles.
//!
//! Mirrors the seed data the application ships with. Used for seeding
//! development directories and as a realistic fixture in tests.

use atrium_core::{AppError, AppResult, RoleId};

use crate::{Permission, PermissionSlug, Role, RoleInput, RoleScope, RoleSlug};

const CLIENT_MANAGEMENT: &str = "Client Management";
const USER_MANAGEMENT: &str = "User Management";
const PROJECT_MANAGEMENT: &str = "Project Management";
const EMAIL_MANAGEMENT: &str = "Email Management";
const ROLE_MANAGEMENT: &str = "Role & Permission Management";
const DASHBOARD: &str = "Dashboard";

const PERMISSIONS: &[(&str, &str)] = &[
    (CLIENT_MANAGEMENT, "view_clients"),
    (CLIENT_MANAGEMENT, "create_clients"),
    (CLIENT_MANAGEMENT, "edit_clients"),
    (CLIENT_MANAGEMENT, "delete_clients"),
    (CLIENT_MANAGEMENT, "view_client_financial"),
    (CLIENT_MANAGEMENT, "view_client_contacts"),
    (USER_MANAGEMENT, "view_users"),
    (USER_MANAGEMENT, "create_users"),
    (USER_MANAGEMENT, "edit_users"),
    (USER_MANAGEMENT, "delete_users"),
    (USER_MANAGEMENT, "assign_roles"),
    (PROJECT_MANAGEMENT, "view_projects"),
    (PROJECT_MANAGEMENT, "create_projects"),
    (PROJECT_MANAGEMENT, "edit_projects"),
    (PROJECT_MANAGEMENT, "delete_projects"),
    (PROJECT_MANAGEMENT, "view_project_financial"),
    (PROJECT_MANAGEMENT, "view_project_transactions"),
    (PROJECT_MANAGEMENT, "manage_projects"),
    (PROJECT_MANAGEMENT, "view_project_documents"),
    (PROJECT_MANAGEMENT, "upload_project_documents"),
    (PROJECT_MANAGEMENT, "manage_project_expenses"),
    (PROJECT_MANAGEMENT, "manage_project_income"),
    (PROJECT_MANAGEMENT, "manage_project_services_and_payments"),
    (PROJECT_MANAGEMENT, "view_project_services_and_payments"),
    (PROJECT_MANAGEMENT, "add_project_notes"),
    (PROJECT_MANAGEMENT, "view_project_notes"),
    (PROJECT_MANAGEMENT, "manage_project_users"),
    (PROJECT_MANAGEMENT, "view_project_users"),
    (PROJECT_MANAGEMENT, "manage_project_clients"),
    (PROJECT_MANAGEMENT, "view_project_clients"),
    (EMAIL_MANAGEMENT, "compose_emails"),
    (EMAIL_MANAGEMENT, "view_emails"),
    (EMAIL_MANAGEMENT, "approve_emails"),
    (EMAIL_MANAGEMENT, "view_rejected_emails"),
    (EMAIL_MANAGEMENT, "resubmit_emails"),
    (ROLE_MANAGEMENT, "manage_roles"),
    (ROLE_MANAGEMENT, "view_roles"),
    (ROLE_MANAGEMENT, "create_roles"),
    (ROLE_MANAGEMENT, "edit_roles"),
    (ROLE_MANAGEMENT, "delete_roles"),
    (ROLE_MANAGEMENT, "assign_permissions"),
    (DASHBOARD, "view_dashboard"),
    (DASHBOARD, "view_statistics"),
];

const MANAGER_PERMISSIONS: &[&str] = &[
    "view_clients",
    "create_clients",
    "edit_clients",
    "view_client_financial",
    "view_client_contacts",
    "view_users",
    "create_users",
    "edit_users",
    "view_projects",
    "create_projects",
    "edit_projects",
    "view_project_financial",
    "view_project_transactions",
    "manage_projects",
    "view_project_documents",
    "upload_project_documents",
    "manage_project_expenses",
    "manage_project_income",
    "manage_project_services_and_payments",
    "view_project_services_and_payments",
    "add_project_notes",
    "view_project_notes",
    "manage_project_users",
    "view_project_users",
    "manage_project_clients",
    "view_project_clients",
    "compose_emails",
    "view_emails",
    "approve_emails",
    "view_rejected_emails",
    "resubmit_emails",
    "view_dashboard",
    "view_statistics",
];

const EMPLOYEE_PERMISSIONS: &[&str] = &[
    "view_clients",
    "view_projects",
    "view_project_documents",
    "view_project_financial",
    "view_project_transactions",
    "view_project_services_and_payments",
    "view_project_notes",
    "view_project_users",
    "view_project_clients",
    "compose_emails",
    "view_emails",
    "view_rejected_emails",
    "resubmit_emails",
    "view_dashboard",
];

const CONTRACTOR_PERMISSIONS: &[&str] = &[
    "view_projects",
    "view_project_documents",
    "view_project_services_and_payments",
    "view_project_notes",
    "view_project_users",
    "view_project_clients",
    "compose_emails",
    "view_emails",
    "view_rejected_emails",
    "resubmit_emails",
    "view_dashboard",
];

const PROJECT_MANAGER_PERMISSIONS: &[&str] = &[
    "view_project_financial",
    "view_project_transactions",
    "view_client_contacts",
    "view_users",
    "manage_projects",
];

const PROJECT_MEMBER_PERMISSIONS: &[&str] = &[];

const PROJECT_VIEWER_PERMISSIONS: &[&str] = &[];

/// Returns every permission of the standard catalog, grouped by category.
pub fn standard_permissions() -> AppResult<Vec<Permission>> {
    PERMISSIONS
        .iter()
        .map(|(category, slug)| {
            PermissionSlug::new(*slug).map(|slug| Permission::from_slug(slug, Some(*category)))
        })
        .collect()
}

/// Returns the standard roles.
///
/// Application roles: `super-admin` (every permission), `manager`,
/// `employee` and `contractor`. Project roles: `project-manager`,
/// `project-member` and `project-viewer`; the last two start empty and are
/// filled by administrators.
///
/// Role ids equal their slugs.
pub fn standard_roles() -> AppResult<Vec<Role>> {
    let catalog = standard_permissions()?;
    let all_slugs: Vec<&str> = PERMISSIONS.iter().map(|(_, slug)| *slug).collect();

    [
        ("super-admin", "Super Admin", RoleScope::Application, all_slugs.as_slice()),
        ("manager", "Manager", RoleScope::Application, MANAGER_PERMISSIONS),
        ("employee", "Employee", RoleScope::Application, EMPLOYEE_PERMISSIONS),
        ("contractor", "Contractor", RoleScope::Application, CONTRACTOR_PERMISSIONS),
        (
            "project-manager",
            "Project Manager",
            RoleScope::Project,
            PROJECT_MANAGER_PERMISSIONS,
        ),
        (
            "project-member",
            "Project Member",
            RoleScope::Project,
            PROJECT_MEMBER_PERMISSIONS,
        ),
        (
            "project-viewer",
            "Project Viewer",
            RoleScope::Project,
            PROJECT_VIEWER_PERMISSIONS,
        ),
    ]
    .into_iter()
    .map(|(slug, name, scope, granted)| build_role(&catalog, slug, name, scope, granted))
    .collect()
}

fn build_role(
    catalog: &[Permission],
    slug: &str,
    name: &str,
    scope: RoleScope,
    granted: &[&str],
) -> AppResult<Role> {
    let permissions = granted
        .iter()
        .map(|wanted| {
            catalog
                .iter()
                .find(|permission| permission.slug().as_str() == *wanted)
                .cloned()
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "role '{slug}' references permission '{wanted}' missing from the catalog"
                    ))
                })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Role::new(RoleInput {
        id: RoleId::from(slug),
        name: name.to_owned(),
        slug: RoleSlug::new(slug)?,
        scope,
        permissions,
    })
}

#[cfg(test)]
mod tests {
    use super::{standard_permissions, standard_roles};
    use crate::{PermissionSlug, RoleScope};

    #[test]
    fn catalog_slugs_are_unique() {
        let permissions = standard_permissions().unwrap_or_default();
        let mut slugs: Vec<&str> = permissions.iter().map(|p| p.slug().as_str()).collect();
        let total = slugs.len();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), total);
        assert_eq!(total, 43);
    }

    #[test]
    fn super_admin_holds_entire_catalog() {
        let roles = standard_roles().unwrap_or_default();
        let super_admin = roles.iter().find(|role| role.slug().as_str() == "super-admin");
        assert_eq!(super_admin.map(|role| role.permission_count()), Some(43));
    }

    #[test]
    fn contractor_cannot_view_clients() {
        let roles = standard_roles().unwrap_or_default();
        let contractor = roles.iter().find(|role| role.slug().as_str() == "contractor");
        let view_clients = PermissionSlug::new("view_clients")
            .unwrap_or_else(|_| panic!("slug should be valid"));
        assert_eq!(contractor.map(|role| role.has_permission(&view_clients)), Some(false));
    }

    #[test]
    fn project_roles_are_project_scoped() {
        let roles = standard_roles().unwrap_or_default();
        let project_roles: Vec<&str> = roles
            .iter()
            .filter(|role| role.scope() == RoleScope::Project)
            .map(|role| role.slug().as_str())
            .collect();
        assert_eq!(project_roles, vec!["project-manager", "project-member", "project-viewer"]);

        let project_manager = roles
            .iter()
            .find(|role| role.slug().as_str() == "project-manager");
        assert_eq!(project_manager.map(|role| role.permission_count()), Some(5));
    }
}
