//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **identity**: Firebase token verification
//! - **storage**: Supabase Storage uploads
//! - **classifier**: Groq vision-model classification
//! - **chat**: Gemini health assistant
//! - **clinics**: Google Places clinic lookup
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod chat;
pub mod classifier;
pub mod clinics;
pub(crate) mod http_failure;
pub mod identity;
pub mod persistence;
pub mod storage;
