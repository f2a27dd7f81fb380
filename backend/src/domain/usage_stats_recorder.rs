//! Records scan counters for authenticated users.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::UsageStatsRepository;
use crate::domain::{ScanCategory, UserId};

/// Applies one [`UsageStatistics`](crate::domain::UsageStatistics)
/// increment per recorded scan.
#[derive(Clone)]
pub struct UsageStatsRecorder<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> UsageStatsRecorder<R> {
    /// Create a recorder over `repo`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> UsageStatsRecorder<R>
where
    R: UsageStatsRepository + ?Sized,
{
    /// Count one scan of `category` for `user`.
    ///
    /// Returns `false` when the store refused the update. The failure is
    /// logged here; callers decide whether it matters.
    #[must_use]
    pub async fn record_scan(&self, user: UserId, category: ScanCategory) -> bool {
        match self.repo.record_scan(user, category, self.clock.utc()).await {
            Ok(()) => {
                debug!(user_id = %user, %category, "usage statistics updated");
                true
            }
            Err(err) => {
                error!(user_id = %user, %category, error = %err, "usage statistics update failed");
                false
            }
        }
    }
}
