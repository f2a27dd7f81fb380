//! Clinic lookup types.
//!
//! Clinics are never stored; they are relayed from the places provider on
//! each request.

use serde::{Deserialize, Serialize};

/// Default search radius in metres.
pub const DEFAULT_RADIUS_METRES: u32 = 5_000;

/// Largest radius the places provider accepts.
pub const MAX_RADIUS_METRES: u32 = 50_000;

/// Most clinics returned by one nearby search.
pub const MAX_NEARBY_RESULTS: usize = 10;

/// Validation failures for clinic search input.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ClinicQueryError {
    /// Latitude outside [-90, 90].
    #[error("latitude must be between -90 and 90 (got {0})")]
    Latitude(f64),
    /// Longitude outside [-180, 180].
    #[error("longitude must be between -180 and 180 (got {0})")]
    Longitude(f64),
    /// Radius zero or above [`MAX_RADIUS_METRES`].
    #[error("radius must be between 1 and {MAX_RADIUS_METRES} metres (got {0})")]
    Radius(i64),
}

/// WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Validate a coordinate pair.
    ///
    /// # Examples
    /// ```
    /// use scan_backend::domain::GeoPoint;
    ///
    /// assert!(GeoPoint::new(51.5, -0.12).is_ok());
    /// assert!(GeoPoint::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self, ClinicQueryError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ClinicQueryError::Latitude(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(ClinicQueryError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }
}

/// Nearby clinic search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyClinicsQuery {
    center: GeoPoint,
    radius_metres: u32,
}

impl NearbyClinicsQuery {
    /// Build a query; `radius` defaults to [`DEFAULT_RADIUS_METRES`].
    pub fn new(center: GeoPoint, radius: Option<i64>) -> Result<Self, ClinicQueryError> {
        let radius_metres = match radius {
            None => DEFAULT_RADIUS_METRES,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|metres| (1..=MAX_RADIUS_METRES).contains(metres))
                .ok_or(ClinicQueryError::Radius(value))?,
        };
        Ok(Self {
            center,
            radius_metres,
        })
    }

    /// Search centre.
    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// Search radius in metres.
    pub fn radius_metres(&self) -> u32 {
        self.radius_metres
    }
}

/// Clinic summary returned by a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinic {
    pub name: String,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u32>,
    pub place_id: String,
    pub open_now: Option<bool>,
    pub map_url: String,
}

/// Full record for one clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicDetails {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<GeoPoint>,
    pub open_now: Option<bool>,
    /// Human-readable opening hours, one entry per weekday.
    pub opening_hours: Vec<String>,
    pub map_url: String,
}

/// Link that opens a place in Google Maps.
pub fn map_url_for(place_id: &str) -> String {
    format!("https://www.google.com/maps/place/?q=place_id:{place_id}")
}
