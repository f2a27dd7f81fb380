//! DTOs for Places `nearbysearch` and `details` responses.

use serde::Deserialize;

use crate::domain::{Clinic, ClinicDetails, GeoPoint, MAX_NEARBY_RESULTS, map_url_for};

/// Places status signalling a usable payload.
pub(super) const STATUS_OK: &str = "OK";

#[derive(Debug, Deserialize)]
pub(super) struct NearbyResponseDto {
    pub(super) status: String,
    #[serde(default)]
    pub(super) results: Vec<PlaceDto>,
    pub(super) error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DetailsResponseDto {
    pub(super) status: String,
    pub(super) result: Option<PlaceDto>,
    pub(super) error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PlaceDto {
    pub(super) place_id: Option<String>,
    pub(super) name: Option<String>,
    pub(super) vicinity: Option<String>,
    pub(super) formatted_address: Option<String>,
    pub(super) formatted_phone_number: Option<String>,
    pub(super) website: Option<String>,
    pub(super) rating: Option<f64>,
    pub(super) user_ratings_total: Option<u32>,
    pub(super) geometry: Option<GeometryDto>,
    pub(super) opening_hours: Option<OpeningHoursDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeometryDto {
    pub(super) location: Option<LatLngDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatLngDto {
    pub(super) lat: f64,
    pub(super) lng: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpeningHoursDto {
    pub(super) open_now: Option<bool>,
    #[serde(default)]
    pub(super) weekday_text: Vec<String>,
}

impl PlaceDto {
    fn location(&self) -> Option<GeoPoint> {
        let point = self.geometry.as_ref()?.location.as_ref()?;
        GeoPoint::new(point.lat, point.lng).ok()
    }

    fn open_now(&self) -> Option<bool> {
        self.opening_hours.as_ref()?.open_now
    }

    /// Summary view; places without an id or name are skipped.
    pub(super) fn into_clinic(self) -> Option<Clinic> {
        let location = self.location();
        let open_now = self.open_now();
        let place_id = self.place_id?;
        Some(Clinic {
            name: self.name?,
            address: self.vicinity.or(self.formatted_address),
            location,
            rating: self.rating,
            total_ratings: self.user_ratings_total,
            map_url: map_url_for(&place_id),
            place_id,
            open_now,
        })
    }

    /// Detailed view; the requested id stands in when the reply omits it.
    pub(super) fn into_details(self, requested_id: &str) -> Option<ClinicDetails> {
        let location = self.location();
        let open_now = self.open_now();
        let place_id = self.place_id.unwrap_or_else(|| requested_id.to_owned());
        Some(ClinicDetails {
            name: self.name?,
            address: self.formatted_address.or(self.vicinity),
            phone: self.formatted_phone_number,
            website: self.website,
            rating: self.rating,
            location,
            open_now,
            opening_hours: self
                .opening_hours
                .map(|hours| hours.weekday_text)
                .unwrap_or_default(),
            map_url: map_url_for(&place_id),
            place_id,
        })
    }
}

impl NearbyResponseDto {
    pub(super) fn into_clinics(self) -> Vec<Clinic> {
        self.results
            .into_iter()
            .filter_map(PlaceDto::into_clinic)
            .take(MAX_NEARBY_RESULTS)
            .collect()
    }
}
