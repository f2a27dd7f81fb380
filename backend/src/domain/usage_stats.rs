//! Per-user scan counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ScanCategory, UserId};

/// Aggregate scan counters for one user.
///
/// Counters only ever grow. The persistent store applies the same
/// transition as [`UsageStatistics::record_scan`] in a single atomic upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStatistics {
    user_id: UserId,
    total_scans: u32,
    skin_scans: u32,
    eye_scans: u32,
    last_scan_at: Option<DateTime<Utc>>,
}

impl UsageStatistics {
    /// Zeroed statistics for a user who has not scanned yet.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            total_scans: 0,
            skin_scans: 0,
            eye_scans: 0,
            last_scan_at: None,
        }
    }

    /// Rehydrate persisted counters.
    pub fn from_counts(
        user_id: UserId,
        total_scans: u32,
        skin_scans: u32,
        eye_scans: u32,
        last_scan_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user_id,
            total_scans,
            skin_scans,
            eye_scans,
            last_scan_at,
        }
    }

    /// Count one scan of `category` taken at `at`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use scan_backend::domain::{ScanCategory, UsageStatistics, UserId};
    ///
    /// let mut stats = UsageStatistics::empty(UserId::random());
    /// stats.record_scan(ScanCategory::Eye, Utc::now());
    /// assert_eq!(stats.total_scans(), 1);
    /// assert_eq!(stats.eye_scans(), 1);
    /// assert_eq!(stats.skin_scans(), 0);
    /// ```
    pub fn record_scan(&mut self, category: ScanCategory, at: DateTime<Utc>) {
        self.total_scans = self.total_scans.saturating_add(1);
        match category {
            ScanCategory::Skin => self.skin_scans = self.skin_scans.saturating_add(1),
            ScanCategory::Eye => self.eye_scans = self.eye_scans.saturating_add(1),
        }
        self.last_scan_at = Some(at);
    }

    /// Owner.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Scans of any category.
    pub fn total_scans(&self) -> u32 {
        self.total_scans
    }

    /// Skin scans.
    pub fn skin_scans(&self) -> u32 {
        self.skin_scans
    }

    /// Eye scans.
    pub fn eye_scans(&self) -> u32 {
        self.eye_scans
    }

    /// Count for one category.
    pub fn scans_for(&self, category: ScanCategory) -> u32 {
        match category {
            ScanCategory::Skin => self.skin_scans,
            ScanCategory::Eye => self.eye_scans,
        }
    }

    /// Timestamp of the latest recorded scan.
    pub fn last_scan_at(&self) -> Option<DateTime<Utc>> {
        self.last_scan_at
    }
}
