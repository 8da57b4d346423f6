use atrium_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::PermissionSlug;

/// Top-level navigation sections whose visibility follows permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationSection {
    /// Landing dashboard.
    Dashboard,
    /// Client list.
    Clients,
    /// Project list.
    Projects,
    /// Team member administration.
    Users,
    /// Email composer.
    ComposeEmail,
    /// Email approval queue.
    ApproveEmails,
    /// Rejected email follow-up.
    RejectedEmails,
    /// Role and permission administration.
    Administration,
}

impl NavigationSection {
    /// Returns a stable value for this section.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Clients => "clients",
            Self::Projects => "projects",
            Self::Users => "users",
            Self::ComposeEmail => "compose_email",
            Self::ApproveEmails => "approve_emails",
            Self::RejectedEmails => "rejected_emails",
            Self::Administration => "administration",
        }
    }

    /// Returns all sections in menu order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[NavigationSection] = &[
            NavigationSection::Dashboard,
            NavigationSection::Clients,
            NavigationSection::Projects,
            NavigationSection::Users,
            NavigationSection::ComposeEmail,
            NavigationSection::ApproveEmails,
            NavigationSection::RejectedEmails,
            NavigationSection::Administration,
        ];

        ALL
    }

    /// Returns the permission slugs that reveal this section.
    ///
    /// Holding any one of them is enough. An empty list means the section is
    /// always visible.
    #[must_use]
    pub fn required_permissions(&self) -> &'static [&'static str] {
        match self {
            Self::Dashboard => &[],
            Self::Clients => &["view_clients"],
            Self::Projects => &["view_projects"],
            Self::Users => &["view_users", "create_users", "edit_users"],
            Self::ComposeEmail => &["compose_emails"],
            Self::ApproveEmails => &["approve_emails"],
            Self::RejectedEmails => &["view_rejected_emails", "resubmit_emails"],
            Self::Administration => &["manage_roles", "view_roles"],
        }
    }

    /// Returns the required permissions as typed slugs.
    ///
    /// A malformed entry is an [`AppError::Internal`] because the table is
    /// part of the build, not of any request.
    pub fn required_permission_slugs(&self) -> AppResult<Vec<PermissionSlug>> {
        self.required_permissions()
            .iter()
            .map(|slug| {
                PermissionSlug::new(*slug).map_err(|error| {
                    AppError::Internal(format!(
                        "navigation section '{}' lists an invalid permission: {error}",
                        self.as_str()
                    ))
                })
            })
            .collect()
    }
}
