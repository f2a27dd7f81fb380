//! Driven port for the places provider used to find clinics.

use async_trait::async_trait;

use crate::domain::{Clinic, ClinicDetails, NearbyClinicsQuery};

use super::define_port_error;

define_port_error! {
    /// Failures raised by the places provider.
    pub enum ClinicDirectoryError {
        /// The provider did not answer within the deadline.
        Timeout { message: String } => "places provider timed out: {message}",
        /// The provider could not be reached.
        Transport { message: String } => "places provider transport failed: {message}",
        /// The provider refused the request.
        Rejected { status: u16, message: String } =>
            "places provider rejected request ({status}): {message}",
        /// The reply body could not be decoded.
        Decode { message: String } => "places reply could not be decoded: {message}",
        /// No provider key is configured for this deployment.
        Disabled => "clinic lookup is not configured",
    }
}

/// Port for clinic searches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicDirectory: Send + Sync {
    /// Clinics near the query centre, at most
    /// [`MAX_NEARBY_RESULTS`](crate::domain::MAX_NEARBY_RESULTS) of them.
    async fn nearby(&self, query: NearbyClinicsQuery) -> Result<Vec<Clinic>, ClinicDirectoryError>;

    /// Details for one place, or `None` when the provider does not know it.
    async fn details(&self, place_id: &str) -> Result<Option<ClinicDetails>, ClinicDirectoryError>;
}

/// Directory used when no provider key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClinicDirectory;

#[async_trait]
impl ClinicDirectory for FixtureClinicDirectory {
    async fn nearby(&self, _query: NearbyClinicsQuery) -> Result<Vec<Clinic>, ClinicDirectoryError> {
        Err(ClinicDirectoryError::disabled())
    }

    async fn details(&self, _place_id: &str) -> Result<Option<ClinicDetails>, ClinicDirectoryError> {
        Err(ClinicDirectoryError::disabled())
    }
}
