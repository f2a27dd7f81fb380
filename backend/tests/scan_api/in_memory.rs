//! In-memory repositories standing in for PostgreSQL.
//!
//! They honour the same contracts as the Diesel adapters: subject id and
//! email are unique, listings are newest first with ties broken by id, and
//! counters are incremented under a lock.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;
use scan_backend::domain::ports::{
    ScanListing, ScanRepository, ScanRepositoryError, UsageStatsRepository,
    UsageStatsRepositoryError, UserPersistenceError, UserRepository,
};
use scan_backend::domain::{
    ExternalUserId, Scan, ScanCategory, UsageStatistics, User, UserId,
};

#[derive(Default)]
pub(crate) struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    pub(crate) fn all(&self) -> Vec<User> {
        self.users.lock().expect("users lock").clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_external_id(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("users lock");
        Ok(users
            .iter()
            .find(|user| user.external_id() == external_id)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|user| user.id() == *id).cloned())
    }

    async fn insert_if_absent(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.lock().expect("users lock");
        let taken = users.iter().any(|existing| {
            existing.external_id() == user.external_id() || existing.email() == user.email()
        });
        if taken {
            return Ok(false);
        }
        users.push(user.clone());
        Ok(true)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryScanRepository {
    scans: Mutex<Vec<Scan>>,
}

impl InMemoryScanRepository {
    pub(crate) fn all(&self) -> Vec<Scan> {
        self.scans.lock().expect("scans lock").clone()
    }
}

#[async_trait]
impl ScanRepository for InMemoryScanRepository {
    async fn insert(&self, scan: &Scan) -> Result<(), ScanRepositoryError> {
        self.scans.lock().expect("scans lock").push(scan.clone());
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
        category: Option<ScanCategory>,
        page: PageRequest,
    ) -> Result<ScanListing, ScanRepositoryError> {
        let mut matching: Vec<Scan> = self
            .scans
            .lock()
            .expect("scans lock")
            .iter()
            .filter(|scan| scan.owner() == owner)
            .filter(|scan| category.is_none_or(|wanted| scan.category() == wanted))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });

        let total = u64::try_from(matching.len()).expect("scan count fits u64");
        let offset = usize::try_from(page.offset()).expect("offset fits usize");
        let limit = usize::try_from(page.limit()).expect("limit fits usize");
        Ok(ScanListing {
            scans: matching.into_iter().skip(offset).take(limit).collect(),
            total,
        })
    }
}

#[derive(Default)]
pub(crate) struct InMemoryUsageStatsRepository {
    stats: Mutex<Vec<UsageStatistics>>,
}

#[async_trait]
impl UsageStatsRepository for InMemoryUsageStatsRepository {
    async fn record_scan(
        &self,
        user: UserId,
        category: ScanCategory,
        at: DateTime<Utc>,
    ) -> Result<(), UsageStatsRepositoryError> {
        let mut stats = self.stats.lock().expect("stats lock");
        match stats.iter_mut().find(|entry| entry.user_id() == user) {
            Some(entry) => entry.record_scan(category, at),
            None => {
                let mut entry = UsageStatistics::empty(user);
                entry.record_scan(category, at);
                stats.push(entry);
            }
        }
        Ok(())
    }

    async fn find(&self, user: UserId) -> Result<Option<UsageStatistics>, UsageStatsRepositoryError> {
        let stats = self.stats.lock().expect("stats lock");
        Ok(stats.iter().find(|entry| entry.user_id() == user).cloned())
    }
}
