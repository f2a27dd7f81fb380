//! Scan submission HTTP handler.
//!
//! ```text
//! POST /api/scan/{type}    multipart/form-data; field "image"
//! POST /api/detect/{type}  (alias)
//! ```
//!
//! A bearer credential is optional. Without one, or when it is refused, the
//! scan runs as a guest and nothing is persisted.

use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::{routes, web};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt as _;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{ScanOutcome, ScanSubmissionRequest};
use crate::domain::{Error, ImageUpload, ImageValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Credential;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_category};

const IMAGE_FIELD: &str = "image";

/// Result of one scan submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanResultResponse {
    /// Persisted scan id; `null` for guests or when the scan was not stored.
    #[schema(value_type = Option<String>, format = Uuid)]
    pub scan_id: Option<Uuid>,
    #[schema(example = "Eczema")]
    pub disease_name: String,
    /// Confidence exactly as produced. The classifier reports a fraction in
    /// `[0, 1]`; the fallback verdict reports `75.0` on a percentage scale.
    #[schema(example = 0.82)]
    pub confidence: f64,
    /// One of `low`, `medium`, `high`.
    #[schema(example = "medium")]
    pub severity: String,
    pub recommendations: Vec<String>,
    pub description: String,
    pub image_url: String,
    pub timestamp: DateTime<Utc>,
}

impl From<ScanOutcome> for ScanResultResponse {
    fn from(outcome: ScanOutcome) -> Self {
        let ScanOutcome {
            scan_id,
            verdict,
            image_url,
            timestamp,
        } = outcome;
        Self {
            scan_id,
            disease_name: verdict.label,
            confidence: verdict.confidence,
            severity: verdict.severity.to_string(),
            recommendations: verdict.recommendations,
            description: verdict.description,
            image_url,
            timestamp,
        }
    }
}

fn multipart_error(err: &MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

async fn read_field(mut field: Field, max_bytes: usize) -> ApiResult<ImageUpload> {
    let filename = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .unwrap_or_default()
        .to_owned();
    let content_type = field.content_type().map(ToString::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|err| multipart_error(&err))? {
        bytes.extend_from_slice(&chunk);
        if bytes.len() > max_bytes {
            return Err(ImageValidationError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            }
            .into());
        }
    }

    Ok(ImageUpload {
        bytes,
        filename,
        content_type,
    })
}

/// Pull the `image` field out of the form, skipping anything else.
async fn read_image(mut payload: Multipart, max_bytes: usize) -> ApiResult<ImageUpload> {
    while let Some(field) = payload.try_next().await.map_err(|err| multipart_error(&err))? {
        if field.name() == Some(IMAGE_FIELD) {
            return read_field(field, max_bytes).await;
        }
    }
    Err(missing_field_error(FieldName::new(IMAGE_FIELD)))
}

/// Classify an uploaded skin or eye image.
#[utoipa::path(
    post,
    path = "/api/scan/{type}",
    description = "Also served at `/api/detect/{type}`. Guests receive `scan_id: null`.",
    params(("type" = String, Path, description = "Scan category: `skin` or `eye`")),
    request_body(content_type = "multipart/form-data", description = "Form with an `image` file field"),
    responses(
        (status = 200, description = "Scan classified", body = ScanResultResponse),
        (status = 400, description = "Invalid category or image", body = ErrorSchema),
        (status = 500, description = "Image upload failed", body = ErrorSchema)
    ),
    tags = ["scans"],
    operation_id = "submitScan"
)]
#[routes]
#[post("/api/scan/{type}")]
#[post("/api/detect/{type}")]
pub async fn submit_scan(
    state: web::Data<HttpState>,
    credential: Credential,
    path: web::Path<String>,
    payload: Multipart,
) -> ApiResult<web::Json<ScanResultResponse>> {
    let category = parse_category(&path.into_inner(), FieldName::new("type"))?;
    let upload = read_image(payload, state.max_upload_bytes).await?;

    let outcome = state
        .scans
        .submit(ScanSubmissionRequest {
            category,
            upload,
            credential: credential.into_token(),
        })
        .await?;

    Ok(web::Json(ScanResultResponse::from(outcome)))
}
