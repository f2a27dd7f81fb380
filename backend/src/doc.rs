//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: response bodies plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`])
//! - **Security**: bearer tokens issued by the identity provider
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::accounts::{
    UsageStatsResponse, UserEnvelope, UserResponse, VerifyResponse,
};
use crate::inbound::http::chat::{ChatHistory, ChatRequest, ChatResponse, ChatTurn};
use crate::inbound::http::clinics::{ClinicDetailsResponse, NearbyClinicsResponse};
use crate::inbound::http::health::StatusResponse;
use crate::inbound::http::history::{ScanHistoryResponse, ScanRecordResponse};
use crate::inbound::http::scans::ScanResultResponse;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Identity-provider ID token. Optional for scan submission; \
                         without it the scan is processed as a guest.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Scan backend API",
        description = "Skin and eye image classification with per-user history and usage statistics.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::scans::submit_scan,
        crate::inbound::http::history::list_history,
        crate::inbound::http::accounts::verify,
        crate::inbound::http::accounts::get_user,
        crate::inbound::http::accounts::get_stats,
        crate::inbound::http::chat::chat,
        crate::inbound::http::clinics::nearby,
        crate::inbound::http::clinics::details,
        crate::inbound::http::health::api_health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ScanResultResponse,
        ScanRecordResponse,
        ScanHistoryResponse,
        UserResponse,
        VerifyResponse,
        UserEnvelope,
        UsageStatsResponse,
        ChatRequest,
        ChatHistory,
        ChatTurn,
        ChatResponse,
        NearbyClinicsResponse,
        ClinicDetailsResponse,
        StatusResponse,
    )),
    tags(
        (name = "scans", description = "Image submission and history"),
        (name = "accounts", description = "Identity resolution and usage statistics"),
        (name = "assistant", description = "Health assistant chat"),
        (name = "clinics", description = "Nearby clinic lookup"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
