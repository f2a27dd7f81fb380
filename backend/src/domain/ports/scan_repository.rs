//! Port abstraction for scan persistence.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Scan, ScanCategory, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by scan repository adapters.
    pub enum ScanRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "scan repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "scan repository query failed: {message}",
    }
}

/// One slice of an owner's scans plus the owner's total count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanListing {
    /// Scans on the requested page, newest first.
    pub scans: Vec<Scan>,
    /// Scans matching the filter across all pages.
    pub total: u64,
}

/// Port for writing and listing scans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanRepository: Send + Sync {
    /// Persist a new scan.
    async fn insert(&self, scan: &Scan) -> Result<(), ScanRepositoryError>;

    /// List scans owned by `owner`, newest first, ties broken by id
    /// descending, optionally filtered by category.
    async fn list_for_owner(
        &self,
        owner: UserId,
        category: Option<ScanCategory>,
        page: PageRequest,
    ) -> Result<ScanListing, ScanRepositoryError>;
}

/// Repository used when no database is configured.
///
/// Writes are discarded and listings are always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureScanRepository;

#[async_trait]
impl ScanRepository for FixtureScanRepository {
    async fn insert(&self, _scan: &Scan) -> Result<(), ScanRepositoryError> {
        Ok(())
    }

    async fn list_for_owner(
        &self,
        _owner: UserId,
        _category: Option<ScanCategory>,
        _page: PageRequest,
    ) -> Result<ScanListing, ScanRepositoryError> {
        Ok(ScanListing::default())
    }
}
