//! Port abstraction for per-user scan counters.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ScanCategory, UsageStatistics, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by usage statistics adapters.
    pub enum UsageStatsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "usage stats connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "usage stats query failed: {message}",
    }
}

/// Port for counting scans per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsageStatsRepository: Send + Sync {
    /// Count one scan of `category` for `user` taken at `at`.
    ///
    /// Implementations must apply the increment atomically so concurrent
    /// scans by the same user never lose updates. A missing row is created
    /// with the increment applied.
    async fn record_scan(
        &self,
        user: UserId,
        category: ScanCategory,
        at: DateTime<Utc>,
    ) -> Result<(), UsageStatsRepositoryError>;

    /// Fetch the counters for `user`, if any scan was ever recorded.
    async fn find(&self, user: UserId) -> Result<Option<UsageStatistics>, UsageStatsRepositoryError>;
}

/// Repository used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsageStatsRepository;

#[async_trait]
impl UsageStatsRepository for FixtureUsageStatsRepository {
    async fn record_scan(
        &self,
        _user: UserId,
        _category: ScanCategory,
        _at: DateTime<Utc>,
    ) -> Result<(), UsageStatsRepositoryError> {
        Ok(())
    }

    async fn find(&self, _user: UserId) -> Result<Option<UsageStatistics>, UsageStatsRepositoryError> {
        Ok(None)
    }
}
