//! Driving port for submitting a scan image.
//!
//! Inbound adapters hand over the raw upload and whatever credential the
//! client presented; the implementation decides between the guest and the
//! authenticated flow.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{BearerToken, Error, ImageUpload, ScanCategory, Verdict};

/// Input for one scan submission.
#[derive(Debug, Clone)]
pub struct ScanSubmissionRequest {
    /// Requested category, already parsed from the path.
    pub category: ScanCategory,
    /// Raw image as received.
    pub upload: ImageUpload,
    /// Credential from the `Authorization` header, if any.
    pub credential: Option<BearerToken>,
}

/// Result of a scan submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    /// Persisted scan id; `None` for guests or when persistence failed.
    pub scan_id: Option<Uuid>,
    /// Classification result, real or fallback.
    pub verdict: Verdict,
    /// Public URL of the stored image.
    pub image_url: String,
    /// Time the submission completed.
    pub timestamp: DateTime<Utc>,
}

/// Use-case port for scan ingestion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanSubmission: Send + Sync {
    /// Validate, store, classify, and (for known users) record a scan.
    async fn submit(&self, request: ScanSubmissionRequest) -> Result<ScanOutcome, Error>;
}
