//! Credentials presented by clients and identities confirmed by the verifier.

use std::fmt;

use super::{EmailAddress, ExternalUserId};

/// Opaque bearer credential taken from the `Authorization` header.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token. Returns `None` for blank input.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Parse an `Authorization` header value of the form `Bearer <token>`.
    ///
    /// # Examples
    /// ```
    /// use scan_backend::domain::BearerToken;
    ///
    /// assert!(BearerToken::from_authorization_header("Bearer abc").is_some());
    /// assert!(BearerToken::from_authorization_header("Basic abc").is_none());
    /// assert!(BearerToken::from_authorization_header("Bearer ").is_none());
    /// ```
    pub fn from_authorization_header(header: &str) -> Option<Self> {
        let (scheme, token) = header.trim().split_once(' ')?;
        if scheme.eq_ignore_ascii_case("bearer") {
            Self::new(token)
        } else {
            None
        }
    }

    /// Borrow the raw token for forwarding to the verifier.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Identity confirmed by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider subject id.
    pub subject_id: ExternalUserId,
    /// Verified contact email.
    pub email: EmailAddress,
    /// Optional display name reported by the provider.
    pub name: Option<String>,
}
