//! Driven port for confirming bearer credentials with the identity provider.

use async_trait::async_trait;

use crate::domain::{BearerToken, VerifiedIdentity};

use super::define_port_error;

define_port_error! {
    /// Reasons a credential could not be turned into a verified identity.
    pub enum IdentityVerifierError {
        /// The provider rejected the credential.
        Rejected { message: String } => "credential rejected: {message}",
        /// The provider did not answer within the deadline.
        Timeout { message: String } => "identity provider timed out: {message}",
        /// The provider could not be reached or replied with garbage.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// No provider is configured for this deployment.
        Disabled => "identity verification is not configured",
    }
}

/// Port that validates a bearer credential against the identity provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Confirm `token` and return the identity it proves.
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedIdentity, IdentityVerifierError>;
}

/// Verifier used when no identity provider is configured.
///
/// Every credential is refused, so scans degrade to the guest flow and
/// authenticated routes answer 401.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityVerifier;

#[async_trait]
impl IdentityVerifier for FixtureIdentityVerifier {
    async fn verify(&self, _token: &BearerToken) -> Result<VerifiedIdentity, IdentityVerifierError> {
        Err(IdentityVerifierError::disabled())
    }
}
