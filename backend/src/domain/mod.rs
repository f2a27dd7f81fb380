//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, plus the services implementing the driving ports. Types document
//! their invariants and serialisation contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport agnostic failure payload.
//! - User, ExternalUserId, EmailAddress, DisplayName: account identity.
//! - Scan, ScanCategory, Severity, Verdict: classification records.
//! - ImagePolicy, ImageUpload: upload validation.
//! - UsageStatistics: per-user counters.
//! - ScanIngestionService, ScanHistoryService, UserDirectoryService,
//!   UsageStatsRecorder: use-case implementations.

pub mod clinic;
pub mod error;
pub mod identity;
pub mod image_upload;
pub mod ports;
pub mod scan;
mod scan_history_service;
mod scan_ingestion_service;
pub mod trace_id;
pub mod usage_stats;
mod usage_stats_recorder;
pub mod user;
mod user_directory_service;
pub mod verdict;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::clinic::{
    Clinic, ClinicDetails, ClinicQueryError, DEFAULT_RADIUS_METRES, GeoPoint, MAX_NEARBY_RESULTS,
    MAX_RADIUS_METRES, NearbyClinicsQuery, map_url_for,
};
pub use self::error::{Error, ErrorCode};
pub use self::identity::{BearerToken, VerifiedIdentity};
pub use self::image_upload::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES, ImagePolicy, ImageUpload,
    ImageValidationError, ValidatedImage,
};
pub use self::scan::{Scan, ScanCategory, ScanDraft, Severity, UnknownScanCategory};
pub use self::scan_history_service::ScanHistoryService;
pub use self::scan_ingestion_service::{
    GUEST_FOLDER, ScanCollaborators, ScanIngestionService, object_path,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::usage_stats::UsageStatistics;
pub use self::usage_stats_recorder::UsageStatsRecorder;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, EmailAddress, ExternalUserId, User, UserId,
    UserValidationError,
};
pub use self::user_directory_service::UserDirectoryService;
pub use self::verdict::{FALLBACK_CONFIDENCE, UNKNOWN_LABEL, Verdict};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use scan_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
