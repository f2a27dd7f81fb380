//! Scan backend library: domain model, ports, adapters, and HTTP surface.
//!
//! The binary in `main.rs` wires these pieces into an Actix server; the
//! library is also what the integration tests drive.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
