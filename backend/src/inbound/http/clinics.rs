//! Clinic lookup handlers relayed from the places provider.
//!
//! ```text
//! GET /api/clinics/nearby?latitude=51.5&longitude=-0.12&radius=5000
//! GET /api/clinics/details/{place_id}
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ClinicDirectoryError;
use crate::domain::{Clinic, ClinicDetails, Error, GeoPoint, NearbyClinicsQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, clinic_query_error, missing_field_error};

/// Query parameters for a nearby search.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    /// Latitude in degrees; required.
    pub latitude: Option<f64>,
    /// Longitude in degrees; required.
    pub longitude: Option<f64>,
    /// Search radius in metres; defaults to 5000, at most 50000.
    pub radius: Option<i64>,
}

/// Nearby clinics, at most ten.
#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyClinicsResponse {
    #[schema(value_type = Vec<Object>)]
    pub clinics: Vec<Clinic>,
    pub count: usize,
}

/// Full record for one clinic.
#[derive(Debug, Serialize, ToSchema)]
pub struct ClinicDetailsResponse {
    #[schema(value_type = Object)]
    pub clinic: ClinicDetails,
}

fn directory_error(err: &ClinicDirectoryError) -> Error {
    match err {
        ClinicDirectoryError::Disabled => {
            Error::service_unavailable("Clinic lookup is not configured")
        }
        other => {
            warn!(error = %other, "places provider failed");
            Error::service_unavailable("Clinic lookup is unavailable")
        }
    }
}

fn nearby_query(query: NearbyQuery) -> ApiResult<NearbyClinicsQuery> {
    let latitude = query
        .latitude
        .ok_or_else(|| missing_field_error(FieldName::new("latitude")))?;
    let longitude = query
        .longitude
        .ok_or_else(|| missing_field_error(FieldName::new("longitude")))?;
    let center = GeoPoint::new(latitude, longitude).map_err(|err| clinic_query_error(&err))?;
    NearbyClinicsQuery::new(center, query.radius).map_err(|err| clinic_query_error(&err))
}

/// Find clinics around a coordinate.
#[utoipa::path(
    get,
    path = "/api/clinics/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Nearby clinics", body = NearbyClinicsResponse),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorSchema),
        (status = 503, description = "Places provider unavailable", body = ErrorSchema)
    ),
    tags = ["clinics"],
    security([]),
    operation_id = "nearbyClinics"
)]
#[get("/api/clinics/nearby")]
pub async fn nearby(
    state: web::Data<HttpState>,
    query: web::Query<NearbyQuery>,
) -> ApiResult<web::Json<NearbyClinicsResponse>> {
    let query = nearby_query(query.into_inner())?;
    let clinics = state
        .clinics
        .nearby(query)
        .await
        .map_err(|err| directory_error(&err))?;
    Ok(web::Json(NearbyClinicsResponse {
        count: clinics.len(),
        clinics,
    }))
}

/// Fetch one clinic by its place id.
#[utoipa::path(
    get,
    path = "/api/clinics/details/{place_id}",
    params(("place_id" = String, Path, description = "Places provider id")),
    responses(
        (status = 200, description = "Clinic found", body = ClinicDetailsResponse),
        (status = 404, description = "Clinic not found", body = ErrorSchema),
        (status = 503, description = "Places provider unavailable", body = ErrorSchema)
    ),
    tags = ["clinics"],
    security([]),
    operation_id = "clinicDetails"
)]
#[get("/api/clinics/details/{place_id}")]
pub async fn details(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClinicDetailsResponse>> {
    let place_id = path.into_inner();
    let clinic = state
        .clinics
        .details(&place_id)
        .await
        .map_err(|err| directory_error(&err))?
        .ok_or_else(|| Error::not_found("Clinic not found"))?;
    Ok(web::Json(ClinicDetailsResponse { clinic }))
}
