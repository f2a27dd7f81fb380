//! Clinic lookup adapters backed by the Google Places web service.

mod dto;
mod places_directory;

pub use places_directory::{PlacesClinicDirectory, PlacesSetupError};
