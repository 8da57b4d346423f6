//! Shared primitives for all Rust crates in Atrium.

#![forbid(unsafe_code)]

/// Opaque identifiers shared across crates.
pub mod ids;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ids::{ActorId, PermissionId, ProjectId, RoleId};

/// Result type used across Atrium crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
///
/// A denied authorization check is not an error: it is reported through the
/// decision value. Only `Forbidden` models denial, and only for callers that
/// explicitly ask for enforcement.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authorization query is malformed or references something unresolvable.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A lookup provider failed while preparing an authorization decision.
    #[error("upstream lookup failure: {0}")]
    UpstreamLookup(String),

    /// Actor is blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
