//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`IdentityVerifier`, `ImageStore`, `Classifier`, the
//! repositories, `ChatAssistant`, `ClinicDirectory`) describe collaborators
//! the domain calls out to. Driving ports (`ScanSubmission`,
//! `ScanHistoryQuery`, `UserDirectory`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod chat_assistant;
mod classifier;
mod clinic_directory;
mod identity_verifier;
mod image_store;
mod scan_history_query;
mod scan_repository;
mod scan_submission;
mod usage_stats_repository;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use chat_assistant::MockChatAssistant;
pub use chat_assistant::{ChatAssistant, ChatAssistantError, ChatPrompt, FixtureChatAssistant};
#[cfg(test)]
pub use classifier::MockClassifier;
pub use classifier::{Classifier, ClassifierError, ClassifierVerdict, FixtureClassifier};
#[cfg(test)]
pub use clinic_directory::MockClinicDirectory;
pub use clinic_directory::{ClinicDirectory, ClinicDirectoryError, FixtureClinicDirectory};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{FixtureIdentityVerifier, IdentityVerifier, IdentityVerifierError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{FixtureImageStore, ImageStore, ImageStoreError};
#[cfg(test)]
pub use scan_history_query::MockScanHistoryQuery;
pub use scan_history_query::{ScanHistoryQuery, ScanHistoryRequest};
#[cfg(test)]
pub use scan_repository::MockScanRepository;
pub use scan_repository::{FixtureScanRepository, ScanListing, ScanRepository, ScanRepositoryError};
#[cfg(test)]
pub use scan_submission::MockScanSubmission;
pub use scan_submission::{ScanOutcome, ScanSubmission, ScanSubmissionRequest};
#[cfg(test)]
pub use usage_stats_repository::MockUsageStatsRepository;
pub use usage_stats_repository::{
    FixtureUsageStatsRepository, UsageStatsRepository, UsageStatsRepositoryError,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{Registration, UserDirectory};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
