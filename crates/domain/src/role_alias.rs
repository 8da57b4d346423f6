//! Legacy role-name normalization.
//!
//! Historical data refers to the same role as `super-admin`, `super_admin` or
//! `Super Admin`. This module maps such variants onto the canonical
//! [`RoleSlug`] before data reaches the authorization engine, which only ever
//! compares canonical slugs.

use atrium_core::{AppError, AppResult};

use crate::RoleSlug;

/// Converts a legacy role reference into its canonical slug.
///
/// Lowercases the value, trims it and folds whitespace and `_` runs into a
/// single `-`.
pub fn canonical_role_slug(value: &str) -> AppResult<RoleSlug> {
    let mut canonical = String::with_capacity(value.len());
    let mut pending_separator = false;

    for character in value.trim().chars() {
        if character.is_whitespace() || character == '_' || character == '-' {
            pending_separator = !canonical.is_empty();
            continue;
        }

        if pending_separator {
            canonical.push('-');
            pending_separator = false;
        }
        canonical.extend(character.to_lowercase());
    }

    RoleSlug::new(canonical).map_err(|error| {
        AppError::Validation(format!(
            "role reference '{value}' has no canonical slug: {error}"
        ))
    })
}
