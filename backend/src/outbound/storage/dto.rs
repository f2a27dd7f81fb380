//! DTOs for Supabase Storage responses.

use serde::Deserialize;

/// Body returned after a successful object upload.
#[derive(Debug, Deserialize)]
pub(super) struct UploadResponseDto {
    /// Bucket-qualified object key, e.g. `scans/skin/guest/x.jpg`.
    #[serde(rename = "Key")]
    pub(super) key: Option<String>,
}

/// Error envelope Supabase Storage uses for refused requests.
#[derive(Debug, Deserialize)]
pub(super) struct StorageErrorDto {
    #[serde(default)]
    pub(super) error: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
}

impl StorageErrorDto {
    pub(super) fn summary(&self) -> Option<String> {
        match (self.error.as_deref(), self.message.as_deref()) {
            (Some(error), Some(message)) => Some(format!("{error}: {message}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
            (None, None) => None,
        }
    }
}
