//! Identity provider adapters.
//!
//! This module provides a thin HTTP implementation of the `IdentityVerifier`
//! port backed by the Firebase Identity Toolkit.

mod dto;
mod firebase_verifier;

pub use firebase_verifier::FirebaseIdentityVerifier;
