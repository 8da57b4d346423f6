use std::fmt::{Display, Formatter};
use std::str::FromStr;

use atrium_core::{AppError, AppResult, NonEmptyString, PermissionId};
use serde::{Deserialize, Serialize};

/// Maximum length of permission and role slugs.
pub const SLUG_MAX_LENGTH: usize = 100;

/// Stable identifier of an atomic capability, e.g. `manage_project_users`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionSlug(String);

impl PermissionSlug {
    /// Creates a validated permission slug.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        validate_slug("permission", value.into()).map(Self)
    }

    /// Returns the slug value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PermissionSlug {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for PermissionSlug {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionSlug> for String {
    fn from(value: PermissionSlug) -> Self {
        value.0
    }
}

impl Display for PermissionSlug {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Checks the shared slug grammar: a lowercase ASCII letter followed by
/// lowercase letters, digits, `_`, `-` or `.`.
pub(crate) fn validate_slug(kind: &str, value: String) -> AppResult<String> {
    if value.is_empty() {
        return Err(AppError::Validation(format!("{kind} slug must not be empty")));
    }

    if value.len() > SLUG_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "{kind} slug must not exceed {SLUG_MAX_LENGTH} characters"
        )));
    }

    let mut characters = value.chars();
    let starts_with_letter = characters
        .next()
        .is_some_and(|first| first.is_ascii_lowercase());
    let rest_is_valid = characters.all(|character| {
        character.is_ascii_lowercase()
            || character.is_ascii_digit()
            || matches!(character, '_' | '-' | '.')
    });

    if !starts_with_letter || !rest_is_valid {
        return Err(AppError::Validation(format!(
            "{kind} slug '{value}' must start with a lowercase letter and contain only lowercase letters, digits, '_', '-' or '.'"
        )));
    }

    Ok(value)
}

/// Atomic capability that roles bundle together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    slug: PermissionSlug,
    name: String,
    category: Option<String>,
}

impl Permission {
    /// Creates a permission record.
    ///
    /// The category is grouping metadata and never takes part in decisions.
    pub fn new(
        id: PermissionId,
        slug: PermissionSlug,
        name: impl Into<String>,
        category: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            slug,
            name: NonEmptyString::new(name)?.into(),
            category: category
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
        })
    }

    /// Creates a permission whose id and display name derive from its slug.
    ///
    /// `view_project_notes` becomes "View Project Notes". Slugs always start
    /// with a letter, so the derived name is never empty.
    #[must_use]
    pub fn from_slug(slug: PermissionSlug, category: Option<&str>) -> Self {
        let name = slug
            .as_str()
            .split(['_', '-', '.'])
            .filter(|part| !part.is_empty())
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            id: PermissionId::from(slug.as_str()),
            name,
            slug,
            category: category.map(str::to_owned),
        }
    }

    /// Returns the permission id.
    #[must_use]
    pub fn id(&self) -> &PermissionId {
        &self.id
    }

    /// Returns the stable slug used in checks.
    #[must_use]
    pub fn slug(&self) -> &PermissionSlug {
        &self.slug
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the grouping category, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

fn title_case(part: &str) -> String {
    let mut characters = part.chars();
    match characters.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + characters.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Permission, PermissionSlug};

    #[test]
    fn snake_case_slug_is_accepted() {
        assert!(PermissionSlug::new("manage_project_users").is_ok());
    }

    #[test]
    fn empty_slug_is_rejected() {
        assert!(PermissionSlug::new("").is_err());
    }

    #[test]
    fn uppercase_slug_is_rejected() {
        assert!(PermissionSlug::new("View_Projects").is_err());
    }

    #[test]
    fn slug_with_spaces_is_rejected() {
        assert!(PermissionSlug::new("view projects").is_err());
    }

    #[test]
    fn display_name_is_derived_from_slug() {
        let slug = PermissionSlug::new("view_project_notes")
            .unwrap_or_else(|_| panic!("slug should be valid"));
        let permission = Permission::from_slug(slug, Some("Project Management"));
        assert_eq!(permission.name(), "View Project Notes");
        assert_eq!(permission.category(), Some("Project Management"));
        assert_eq!(permission.id().as_str(), "view_project_notes");
    }

    #[test]
    fn slug_deserialization_validates() {
        let parsed: Result<PermissionSlug, _> = serde_json::from_str("\"Not A Slug\"");
        assert!(parsed.is_err());
    }

    proptest! {
        #[test]
        fn well_formed_slugs_are_accepted(value in "[a-z][a-z0-9_.-]{0,40}") {
            prop_assert!(PermissionSlug::new(value).is_ok());
        }

        #[test]
        fn slugs_starting_with_non_letter_are_rejected(value in "[0-9_.-][a-z0-9_]{0,20}") {
            prop_assert!(PermissionSlug::new(value).is_err());
        }
    }
}
