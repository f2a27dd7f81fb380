//! Scan history HTTP handler.
//!
//! ```text
//! GET /api/scans/history/{user_id}?page=1&per_page=10&type=skin
//! GET /api/detect/history/{user_id}   (alias)
//! ```

use actix_web::{routes, web};
use chrono::{DateTime, Utc};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::Scan;
use crate::domain::ports::ScanHistoryRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Credential, authenticate};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_category, parse_page_request, parse_subject,
};

/// Query parameters accepted by the history endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// 1-based page number; defaults to 1.
    pub page: Option<i64>,
    /// Page size; defaults to 10, at most 100.
    pub per_page: Option<i64>,
    /// Optional category filter: `skin` or `eye`.
    #[serde(rename = "type")]
    pub category: Option<String>,
}

/// One stored scan.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanRecordResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    #[schema(value_type = String, format = Uuid)]
    pub user_id: Uuid,
    #[schema(example = "skin")]
    pub disease_type: String,
    pub disease_name: String,
    pub confidence: f64,
    pub severity: String,
    pub description: String,
    pub recommendations: Vec<String>,
    pub image_url: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Scan> for ScanRecordResponse {
    fn from(scan: Scan) -> Self {
        let verdict = scan.verdict();
        Self {
            id: scan.id(),
            user_id: *scan.owner().as_uuid(),
            disease_type: scan.category().as_str().to_owned(),
            disease_name: verdict.label.clone(),
            confidence: verdict.confidence,
            severity: verdict.severity.to_string(),
            description: verdict.description.clone(),
            recommendations: verdict.recommendations.clone(),
            image_url: scan.image_url().to_owned(),
            timestamp: scan.created_at(),
        }
    }
}

/// A page of scans with the window that produced it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanHistoryResponse {
    pub scans: Vec<ScanRecordResponse>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl From<Page<Scan>> for ScanHistoryResponse {
    fn from(page: Page<Scan>) -> Self {
        let total = page.total();
        let current = page.page();
        let per_page = page.per_page();
        let total_pages = page.total_pages();
        Self {
            scans: page
                .into_items()
                .into_iter()
                .map(ScanRecordResponse::from)
                .collect(),
            total,
            page: current,
            per_page,
            total_pages,
        }
    }
}

/// List the caller's own scans, newest first.
#[utoipa::path(
    get,
    path = "/api/scans/history/{user_id}",
    description = "Also served at `/api/detect/history/{user_id}`.",
    params(
        ("user_id" = String, Path, description = "Identity-provider subject id"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "History page", body = ScanHistoryResponse),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Missing or invalid credential", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Owner not registered", body = ErrorSchema)
    ),
    tags = ["scans"],
    operation_id = "listScanHistory"
)]
#[routes]
#[get("/api/scans/history/{user_id}")]
#[get("/api/detect/history/{user_id}")]
pub async fn list_history(
    state: web::Data<HttpState>,
    credential: Credential,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> ApiResult<web::Json<ScanHistoryResponse>> {
    let identity = authenticate(state.users.as_ref(), credential).await?;
    let owner = parse_subject(path.into_inner(), FieldName::new("user_id"))?;
    let HistoryQuery {
        page,
        per_page,
        category,
    } = query.into_inner();
    let category = parse_optional_category(category.as_deref(), FieldName::new("type"))?;
    let page = parse_page_request(page, per_page)?;

    let scans = state
        .history
        .list_scans(ScanHistoryRequest {
            requester: identity.subject_id,
            owner,
            category,
            page,
        })
        .await?;

    Ok(web::Json(ScanHistoryResponse::from(scans)))
}
