//! Shared validation helpers for inbound HTTP adapters.

use std::str::FromStr;

use pagination::{PageRequest, PageRequestError};
use serde_json::json;

use crate::domain::{ClinicQueryError, Error, ExternalUserId, ScanCategory};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidCategory,
    InvalidSubject,
    InvalidPagination,
    InvalidCoordinates,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidCategory => "invalid_category",
            ErrorCode::InvalidSubject => "invalid_subject",
            ErrorCode::InvalidPagination => "invalid_pagination",
            ErrorCode::InvalidCoordinates => "invalid_coordinates",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Parse a `skin`/`eye` path or query value.
pub(crate) fn parse_category(value: &str, field: FieldName) -> Result<ScanCategory, Error> {
    ScanCategory::from_str(value).map_err(|_| {
        ValidationError::new(
            field.as_str(),
            "Invalid disease type. Must be skin or eye",
        )
        .with_value(ErrorCode::InvalidCategory, value)
    })
}

pub(crate) fn parse_optional_category(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<ScanCategory>, Error> {
    value.map(|raw| parse_category(raw, field)).transpose()
}

/// Parse an identity-provider subject id taken from the path.
pub(crate) fn parse_subject(value: String, field: FieldName) -> Result<ExternalUserId, Error> {
    ExternalUserId::new(value.clone()).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidSubject, value)
    })
}

pub(crate) fn parse_page_request(
    page: Option<i64>,
    per_page: Option<i64>,
) -> Result<PageRequest, Error> {
    PageRequest::new(page, per_page).map_err(|err| {
        let (field, value) = match err {
            PageRequestError::InvalidPage { value } => ("page", value),
            PageRequestError::InvalidPerPage { value }
            | PageRequestError::PerPageTooLarge { value, .. } => ("per_page", value),
        };
        ValidationError::new(field, err.to_string())
            .with_value(ErrorCode::InvalidPagination, value.to_string())
    })
}

pub(crate) fn clinic_query_error(err: &ClinicQueryError) -> Error {
    let (field, value) = match err {
        ClinicQueryError::Latitude(value) => ("latitude", value.to_string()),
        ClinicQueryError::Longitude(value) => ("longitude", value.to_string()),
        ClinicQueryError::Radius(value) => ("radius", value.to_string()),
    };
    ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidCoordinates, value)
}
