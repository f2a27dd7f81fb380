//! Reqwest-backed Places clinic directory.
//!
//! Places reports most failures inside a 200 response via its `status`
//! field. Any status other than `OK` is treated as "nothing found" so the
//! caller sees an empty list or a missing clinic; unexpected statuses are
//! logged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{DetailsResponseDto, NearbyResponseDto, STATUS_OK};
use crate::domain::ports::{ClinicDirectory, ClinicDirectoryError};
use crate::domain::{Clinic, ClinicDetails, NearbyClinicsQuery};
use crate::outbound::http_failure::HttpFailure;

const PLACE_TYPES: &str = "hospital|doctor|health";
const KEYWORD: &str = "clinic";
const DETAIL_FIELDS: &str =
    "place_id,name,formatted_address,formatted_phone_number,opening_hours,rating,website,geometry";
const QUIET_STATUSES: [&str; 2] = ["ZERO_RESULTS", "NOT_FOUND"];

/// Clinic directory backed by the Places web service.
pub struct PlacesClinicDirectory {
    client: Client,
    nearby_url: Url,
    details_url: Url,
    api_key: String,
}

/// Failures constructing [`PlacesClinicDirectory`].
#[derive(Debug, thiserror::Error)]
pub enum PlacesSetupError {
    /// An endpoint could not be built from the configured base URL.
    #[error("invalid Places endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build Places client: {0}")]
    Client(#[from] reqwest::Error),
}

impl PlacesClinicDirectory {
    /// Build a directory rooted at the Places `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoints are malformed or the reqwest
    /// client cannot be constructed.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlacesSetupError> {
        let base = base_url.trim_end_matches('/');
        let nearby_url = Url::parse(&format!("{base}/nearbysearch/json"))?;
        let details_url = Url::parse(&format!("{base}/details/json"))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            nearby_url,
            details_url,
            api_key: api_key.into(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        params: &[(&str, String)],
    ) -> Result<T, ClinicDirectoryError> {
        let response = self
            .client
            .get(url.clone())
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;
        if !status.is_success() {
            return Err(HttpFailure::from_status(status, body.as_ref()).into());
        }
        decode(body.as_ref())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClinicDirectoryError> {
    serde_json::from_slice(body)
        .map_err(|error| ClinicDirectoryError::decode(format!("invalid Places payload: {error}")))
}

fn note_status(operation: &str, status: &str, error_message: Option<&str>) {
    if QUIET_STATUSES.contains(&status) {
        debug!(operation, status, "places lookup found nothing");
    } else {
        warn!(operation, status, error = ?error_message, "places lookup not OK");
    }
}

fn nearby_params(query: &NearbyClinicsQuery) -> Vec<(&'static str, String)> {
    let center = query.center();
    vec![
        ("location", format!("{},{}", center.lat, center.lng)),
        ("radius", query.radius_metres().to_string()),
        ("type", PLACE_TYPES.to_owned()),
        ("keyword", KEYWORD.to_owned()),
    ]
}

fn clinics_from(response: NearbyResponseDto) -> Vec<Clinic> {
    if response.status != STATUS_OK {
        note_status("nearby", &response.status, response.error_message.as_deref());
        return Vec::new();
    }
    response.into_clinics()
}

fn details_from(response: DetailsResponseDto, place_id: &str) -> Option<ClinicDetails> {
    if response.status != STATUS_OK {
        note_status("details", &response.status, response.error_message.as_deref());
        return None;
    }
    response.result?.into_details(place_id)
}

impl From<HttpFailure> for ClinicDirectoryError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Timeout(message) => Self::timeout(message),
            HttpFailure::Transport(message) => Self::transport(message),
            HttpFailure::Rejected { status, message } => Self::rejected(status, message),
        }
    }
}

#[async_trait]
impl ClinicDirectory for PlacesClinicDirectory {
    async fn nearby(&self, query: NearbyClinicsQuery) -> Result<Vec<Clinic>, ClinicDirectoryError> {
        let response: NearbyResponseDto = self
            .get_json(&self.nearby_url, &nearby_params(&query))
            .await?;
        Ok(clinics_from(response))
    }

    async fn details(&self, place_id: &str) -> Result<Option<ClinicDetails>, ClinicDirectoryError> {
        let params = [
            ("place_id", place_id.to_owned()),
            ("fields", DETAIL_FIELDS.to_owned()),
        ];
        let response: DetailsResponseDto = self.get_json(&self.details_url, &params).await?;
        Ok(details_from(response, place_id))
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for query encoding and Places payload mapping.

    use super::*;
    use crate::domain::{GeoPoint, MAX_NEARBY_RESULTS};
    use rstest::rstest;
    use serde_json::json;

    fn place(index: usize) -> serde_json::Value {
        json!({
            "place_id": format!("place-{index}"),
            "name": format!("Clinic {index}"),
            "vicinity": "1 High Street",
            "geometry": { "location": { "lat": 51.5, "lng": -0.12 } },
            "rating": 4.5,
            "user_ratings_total": 120,
            "opening_hours": { "open_now": true }
        })
    }

    fn nearby(body: serde_json::Value) -> Vec<Clinic> {
        let bytes = serde_json::to_vec(&body).expect("encode fixture");
        clinics_from(decode(&bytes).expect("decode fixture"))
    }

    #[rstest]
    fn nearby_params_follow_query() {
        let center = GeoPoint::new(51.5, -0.12).expect("valid point");
        let query = NearbyClinicsQuery::new(center, Some(1_500)).expect("valid query");

        assert_eq!(
            nearby_params(&query),
            vec![
                ("location", "51.5,-0.12".to_owned()),
                ("radius", "1500".to_owned()),
                ("type", PLACE_TYPES.to_owned()),
                ("keyword", KEYWORD.to_owned()),
            ]
        );
    }

    #[rstest]
    fn nearby_maps_places_to_clinics() {
        let clinics = nearby(json!({ "status": "OK", "results": [place(1)] }));

        assert_eq!(
            clinics,
            vec![Clinic {
                name: "Clinic 1".to_owned(),
                address: Some("1 High Street".to_owned()),
                location: Some(GeoPoint { lat: 51.5, lng: -0.12 }),
                rating: Some(4.5),
                total_ratings: Some(120),
                place_id: "place-1".to_owned(),
                open_now: Some(true),
                map_url: "https://www.google.com/maps/place/?q=place_id:place-1".to_owned(),
            }]
        );
    }

    #[rstest]
    fn nearby_caps_results_and_skips_anonymous_places() {
        let mut results: Vec<_> = (0..15).map(place).collect();
        results.insert(0, json!({ "name": "No id" }));

        let clinics = nearby(json!({ "status": "OK", "results": results }));

        assert_eq!(clinics.len(), MAX_NEARBY_RESULTS);
        assert_eq!(clinics.first().map(|c| c.place_id.as_str()), Some("place-0"));
    }

    #[rstest]
    #[case::zero_results("ZERO_RESULTS")]
    #[case::denied("REQUEST_DENIED")]
    fn non_ok_status_yields_no_clinics(#[case] status: &str) {
        assert!(nearby(json!({ "status": status, "results": [place(1)] })).is_empty());
    }

    #[rstest]
    fn details_map_contact_fields() {
        let body = json!({
            "status": "OK",
            "result": {
                "name": "Clinic 9",
                "formatted_address": "9 Low Road, Town",
                "formatted_phone_number": "020 7946 0000",
                "website": "https://clinic9.example",
                "opening_hours": { "open_now": false, "weekday_text": ["Monday: 9AM–5PM"] }
            }
        });
        let response: DetailsResponseDto =
            decode(&serde_json::to_vec(&body).expect("encode")).expect("decode");

        let details = details_from(response, "place-9").expect("details present");

        assert_eq!(details.place_id, "place-9");
        assert_eq!(details.address.as_deref(), Some("9 Low Road, Town"));
        assert_eq!(details.phone.as_deref(), Some("020 7946 0000"));
        assert_eq!(details.open_now, Some(false));
        assert_eq!(details.opening_hours, vec!["Monday: 9AM–5PM".to_owned()]);
        assert_eq!(details.location, None);
    }

    #[rstest]
    fn details_not_found_is_none() {
        let response: DetailsResponseDto =
            decode(br#"{"status":"NOT_FOUND"}"#).expect("decode");
        assert_eq!(details_from(response, "gone"), None);
    }

    #[rstest]
    fn unreadable_payload_is_a_decode_error() {
        assert!(matches!(
            decode::<NearbyResponseDto>(b"<html>"),
            Err(ClinicDirectoryError::Decode { .. })
        ));
    }
}
