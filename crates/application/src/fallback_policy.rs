use std::collections::BTreeSet;

use atrium_core::AppResult;
use atrium_domain::{Actor, AuthorizationDecision, PermissionSlug, ValidatedQuery};

/// Strategy consulted when neither the global nor the project role grants a
/// permission.
pub trait FallbackPolicy: Send + Sync {
    /// Returns the decision for an unmatched query.
    fn decide_unmatched(&self, actor: &Actor, query: &ValidatedQuery) -> AuthorizationDecision;
}

/// Hard denial for every unmatched query.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyFallback;

impl FallbackPolicy for DenyFallback {
    fn decide_unmatched(&self, _actor: &Actor, _query: &ValidatedQuery) -> AuthorizationDecision {
        AuthorizationDecision::denied()
    }
}

/// Degrades selected listing permissions to "own records only" instead of
/// denying them.
#[derive(Debug, Clone, Default)]
pub struct OwnRecordsFallback {
    permissions: BTreeSet<PermissionSlug>,
}

impl OwnRecordsFallback {
    /// Creates a fallback covering the given permissions.
    #[must_use]
    pub fn new(permissions: impl IntoIterator<Item = PermissionSlug>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Creates a fallback from raw slug values.
    pub fn from_slugs<S: AsRef<str>>(slugs: impl IntoIterator<Item = S>) -> AppResult<Self> {
        let permissions = slugs
            .into_iter()
            .map(|slug| PermissionSlug::new(slug.as_ref()))
            .collect::<AppResult<BTreeSet<_>>>()?;

        Ok(Self { permissions })
    }

    /// Returns whether the permission degrades to own records.
    #[must_use]
    pub fn covers(&self, slug: &PermissionSlug) -> bool {
        self.permissions.contains(slug)
    }
}

impl FallbackPolicy for OwnRecordsFallback {
    fn decide_unmatched(&self, _actor: &Actor, query: &ValidatedQuery) -> AuthorizationDecision {
        if self.covers(query.permission()) {
            AuthorizationDecision::own_records_only()
        } else {
            AuthorizationDecision::denied()
        }
    }
}
