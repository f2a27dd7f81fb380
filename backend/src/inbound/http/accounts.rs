//! Account HTTP handlers.
//!
//! ```text
//! POST /api/auth/verify          resolve or register the caller
//! GET  /api/auth/user/{uid}      look up a registered user
//! GET  /api/users/{uid}/stats    caller's own usage counters
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, UsageStatistics, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Credential, authenticate};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_subject};

/// Public view of a user record.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: Uuid,
    /// Identity-provider subject id.
    #[schema(example = "firebase-uid-123")]
    pub uid: String,
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            uid: user.external_id().as_str().to_owned(),
            name: user.display_name().as_ref().to_owned(),
            email: user.email().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

/// Body of `POST /api/auth/verify`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    #[schema(example = "User created successfully")]
    pub message: &'static str,
    pub user: UserResponse,
}

/// Body of `GET /api/auth/user/{uid}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

/// Per-user scan counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct UsageStatsResponse {
    #[schema(value_type = String, format = Uuid)]
    pub user_id: Uuid,
    pub total_scans: u32,
    pub skin_scans: u32,
    pub eye_scans: u32,
    /// `null` until the first scan is recorded.
    pub last_scan_date: Option<DateTime<Utc>>,
}

impl From<&UsageStatistics> for UsageStatsResponse {
    fn from(stats: &UsageStatistics) -> Self {
        Self {
            user_id: *stats.user_id().as_uuid(),
            total_scans: stats.total_scans(),
            skin_scans: stats.skin_scans(),
            eye_scans: stats.eye_scans(),
            last_scan_date: stats.last_scan_at(),
        }
    }
}

/// Verify the caller's credential and return their user record, creating it
/// on first sight.
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    responses(
        (status = 200, description = "Existing user", body = VerifyResponse),
        (status = 201, description = "User created", body = VerifyResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorSchema),
        (status = 409, description = "Email already linked to another subject", body = ErrorSchema),
        (status = 500, description = "Persistence failure", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "verifyUser"
)]
#[post("/api/auth/verify")]
pub async fn verify(state: web::Data<HttpState>, credential: Credential) -> ApiResult<HttpResponse> {
    let identity = authenticate(state.users.as_ref(), credential).await?;
    let registration = state.users.resolve_or_create(&identity).await?;

    let (mut response, message) = if registration.created {
        (HttpResponse::Created(), "User created successfully")
    } else {
        (HttpResponse::Ok(), "User verified")
    };
    Ok(response.json(VerifyResponse {
        message,
        user: UserResponse::from(&registration.user),
    }))
}

/// Fetch a registered user by subject id.
#[utoipa::path(
    get,
    path = "/api/auth/user/{uid}",
    params(("uid" = String, Path, description = "Identity-provider subject id")),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 401, description = "Missing or invalid credential", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "getUser"
)]
#[get("/api/auth/user/{uid}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    credential: Credential,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserEnvelope>> {
    authenticate(state.users.as_ref(), credential).await?;
    let uid = parse_subject(path.into_inner(), FieldName::new("uid"))?;
    let user = state.users.find_user(&uid).await?;
    Ok(web::Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

/// Usage counters for the caller.
#[utoipa::path(
    get,
    path = "/api/users/{uid}/stats",
    params(("uid" = String, Path, description = "Identity-provider subject id")),
    responses(
        (status = 200, description = "Counters", body = UsageStatsResponse),
        (status = 401, description = "Missing or invalid credential", body = ErrorSchema),
        (status = 403, description = "Not the caller's own statistics", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "getUsageStats"
)]
#[get("/api/users/{uid}/stats")]
pub async fn get_stats(
    state: web::Data<HttpState>,
    credential: Credential,
    path: web::Path<String>,
) -> ApiResult<web::Json<UsageStatsResponse>> {
    let identity = authenticate(state.users.as_ref(), credential).await?;
    let uid = parse_subject(path.into_inner(), FieldName::new("uid"))?;
    if identity.subject_id != uid {
        return Err(Error::forbidden("Unauthorized access"));
    }
    let stats = state.users.usage_statistics(&uid).await?;
    Ok(web::Json(UsageStatsResponse::from(&stats)))
}
