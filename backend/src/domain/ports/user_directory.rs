//! Driving port for identity resolution and account lookups.

use async_trait::async_trait;

use crate::domain::{BearerToken, Error, ExternalUserId, UsageStatistics, User, VerifiedIdentity};

/// Outcome of resolving a verified identity to a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The resolved user.
    pub user: User,
    /// Whether this call created the record.
    pub created: bool,
}

/// Use-case port for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Verify a credential, failing with `unauthorized` when it is refused.
    async fn authenticate(&self, token: &BearerToken) -> Result<VerifiedIdentity, Error>;

    /// Find the user for `identity`, creating one on first sight.
    async fn resolve_or_create(&self, identity: &VerifiedIdentity) -> Result<Registration, Error>;

    /// Look up a user by subject id, failing with `not_found`.
    async fn find_user(&self, external_id: &ExternalUserId) -> Result<User, Error>;

    /// Counters for a user; zeroed when no scan was recorded yet.
    async fn usage_statistics(&self, external_id: &ExternalUserId)
    -> Result<UsageStatistics, Error>;
}
