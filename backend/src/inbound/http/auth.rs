//! Bearer credential extraction used by HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! `Authorization` header parsing and identity checks here. Scan submission
//! treats a missing or refused credential as a guest; every other protected
//! route answers 401.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::ports::UserDirectory;
use crate::domain::{BearerToken, Error, VerifiedIdentity};

use super::ApiResult;

/// Credential presented in the `Authorization: Bearer` header, if any.
///
/// Malformed headers are treated the same as a missing one.
#[derive(Debug, Clone, Default)]
pub struct Credential(Option<BearerToken>);

impl Credential {
    /// Read the credential from request headers.
    pub fn from_request_headers(req: &HttpRequest) -> Self {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(BearerToken::from_authorization_header);
        Self(token)
    }

    /// The token, for flows that tolerate its absence.
    pub fn into_token(self) -> Option<BearerToken> {
        self.0
    }

    /// The token, or `401 Unauthorized` when none was presented.
    pub fn require(self) -> ApiResult<BearerToken> {
        self.0
            .ok_or_else(|| Error::unauthorized("Missing or invalid authorization header"))
    }
}

impl FromRequest for Credential {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request_headers(req)))
    }
}

/// Require a credential and confirm it with the user directory.
pub async fn authenticate(
    users: &dyn UserDirectory,
    credential: Credential,
) -> ApiResult<VerifiedIdentity> {
    let token = credential.require()?;
    users.authenticate(&token).await
}
