//! Reqwest-backed Firebase identity verifier.
//!
//! Tokens are confirmed with the Identity Toolkit `accounts:lookup` endpoint,
//! which rejects expired, revoked, or forged ID tokens with a 400.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::{LookupRequestDto, LookupResponseDto};
use crate::domain::ports::{IdentityVerifier, IdentityVerifierError};
use crate::domain::{BearerToken, VerifiedIdentity};
use crate::outbound::http_failure::HttpFailure;

/// Identity verifier backed by the Firebase Identity Toolkit.
pub struct FirebaseIdentityVerifier {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl FirebaseIdentityVerifier {
    /// Build a verifier using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

impl From<HttpFailure> for IdentityVerifierError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Timeout(message) => Self::timeout(message),
            HttpFailure::Transport(message) => Self::unavailable(message),
            HttpFailure::Rejected { message, .. } => Self::rejected(message),
        }
    }
}

#[async_trait]
impl IdentityVerifier for FirebaseIdentityVerifier {
    async fn verify(&self, token: &BearerToken) -> Result<VerifiedIdentity, IdentityVerifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&LookupRequestDto {
                id_token: token.expose(),
            })
            .send()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;
        if !status.is_success() {
            return Err(HttpFailure::from_status(status, body.as_ref()).into());
        }

        let identity = parse_lookup(body.as_ref())?;
        debug!(subject = %identity.subject_id, "credential verified");
        Ok(identity)
    }
}

fn parse_lookup(body: &[u8]) -> Result<VerifiedIdentity, IdentityVerifierError> {
    let decoded: LookupResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityVerifierError::unavailable(format!("invalid lookup payload: {error}"))
    })?;
    decoded
        .into_identity()
        .map_err(IdentityVerifierError::rejected)
}
