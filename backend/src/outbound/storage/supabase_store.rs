//! Reqwest-backed Supabase Storage adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::{StorageErrorDto, UploadResponseDto};
use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::outbound::http_failure::HttpFailure;

const API_KEY_HEADER: &str = "apikey";
const UPSERT_HEADER: &str = "x-upsert";

/// Image store writing into a single Supabase Storage bucket.
pub struct SupabaseImageStore {
    client: Client,
    project_url: String,
    service_key: String,
    bucket: String,
}

impl SupabaseImageStore {
    /// Build a store using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        project_url: &str,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            project_url: project_url.trim_end_matches('/').to_owned(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        })
    }

    fn upload_url(&self, path: &str) -> Result<Url, ImageStoreError> {
        object_url(&self.project_url, "object", &self.bucket, path)
    }

    fn public_url(&self, path: &str) -> Result<Url, ImageStoreError> {
        object_url(&self.project_url, "object/public", &self.bucket, path)
    }
}

fn object_url(base: &str, scope: &str, bucket: &str, path: &str) -> Result<Url, ImageStoreError> {
    let raw = format!(
        "{base}/storage/v1/{scope}/{bucket}/{}",
        path.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|err| ImageStoreError::transport(format!("invalid object URL: {err}")))
}

impl From<HttpFailure> for ImageStoreError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Timeout(message) => Self::timeout(message),
            HttpFailure::Transport(message) => Self::transport(message),
            HttpFailure::Rejected { status, message } => Self::rejected(status, message),
        }
    }
}

fn rejection(failure: HttpFailure, body: &[u8]) -> ImageStoreError {
    match failure {
        HttpFailure::Rejected { status, message } => {
            let summary = serde_json::from_slice::<StorageErrorDto>(body)
                .ok()
                .and_then(|dto| dto.summary())
                .unwrap_or(message);
            ImageStoreError::rejected(status, summary)
        }
        other => other.into(),
    }
}

#[async_trait]
impl ImageStore for SupabaseImageStore {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, ImageStoreError> {
        let response = self
            .client
            .post(self.upload_url(path)?)
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header(API_KEY_HEADER, &self.service_key)
            .header(CONTENT_TYPE, content_type)
            .header(UPSERT_HEADER, "false")
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;
        if !status.is_success() {
            return Err(rejection(
                HttpFailure::from_status(status, body.as_ref()),
                body.as_ref(),
            ));
        }

        if let Ok(uploaded) = serde_json::from_slice::<UploadResponseDto>(body.as_ref()) {
            debug!(key = ?uploaded.key, bytes = bytes.len(), "image stored");
        }
        Ok(self.public_url(path)?.to_string())
    }
}
