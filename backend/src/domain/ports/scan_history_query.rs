//! Driving port for reading a user's scan history.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, ExternalUserId, Scan, ScanCategory};

/// Input for one history page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanHistoryRequest {
    /// Subject id proven by the caller's credential.
    pub requester: ExternalUserId,
    /// Subject id whose history is requested.
    pub owner: ExternalUserId,
    /// Optional category filter.
    pub category: Option<ScanCategory>,
    /// Page window.
    pub page: PageRequest,
}

/// Use-case port for listing scans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanHistoryQuery: Send + Sync {
    /// Return one page of the owner's scans, newest first.
    ///
    /// Fails with `forbidden` when the requester is not the owner and with
    /// `not_found` when the owner has never registered.
    async fn list_scans(&self, request: ScanHistoryRequest) -> Result<Page<Scan>, Error>;
}
