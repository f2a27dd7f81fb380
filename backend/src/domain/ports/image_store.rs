//! Driven port for durable image storage.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised while storing an image.
    pub enum ImageStoreError {
        /// The store did not answer within the deadline.
        Timeout { message: String } => "image store timed out: {message}",
        /// The store could not be reached.
        Transport { message: String } => "image store transport failed: {message}",
        /// The store refused the object.
        Rejected { status: u16, message: String } =>
            "image store rejected upload ({status}): {message}",
        /// No store is configured for this deployment.
        Disabled => "image storage is not configured",
    }
}

/// Port for writing image bytes and obtaining a public URL for them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` at `path` and return the public URL of the object.
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, ImageStoreError>;
}

/// Store used when no bucket is configured; every upload fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageStore;

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn put(
        &self,
        _path: &str,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, ImageStoreError> {
        Err(ImageStoreError::disabled())
    }
}
