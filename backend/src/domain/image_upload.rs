//! Uploaded image validation.
//!
//! Every check here runs before any external collaborator is contacted.

use serde_json::json;

use super::Error;

/// Default maximum image size: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Default allow-listed file extensions.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Raw image received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File contents.
    pub bytes: Vec<u8>,
    /// Client supplied file name.
    pub filename: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
}

/// Image that passed [`ImagePolicy::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedImage {
    bytes: Vec<u8>,
    extension: String,
    content_type: String,
}

impl ValidatedImage {
    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase extension without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// MIME type sent to the image store.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Reasons an upload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    /// No file name was supplied.
    #[error("no image file selected")]
    MissingFile,
    /// The file was empty.
    #[error("image file is empty")]
    EmptyFile,
    /// The file exceeded the size limit.
    #[error("image is {size} bytes; the limit is {max} bytes")]
    TooLarge {
        /// Received size.
        size: usize,
        /// Configured limit.
        max: usize,
    },
    /// The extension is not allow-listed.
    #[error("file type {extension:?} is not allowed")]
    UnsupportedExtension {
        /// Received extension, lowercased.
        extension: String,
    },
    /// The declared MIME type is not an image type.
    #[error("content type {content_type:?} is not an image type")]
    UnsupportedContentType {
        /// Declared content type.
        content_type: String,
    },
}

impl ImageValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::EmptyFile => "empty_file",
            Self::TooLarge { .. } => "file_too_large",
            Self::UnsupportedExtension { .. } => "unsupported_extension",
            Self::UnsupportedContentType { .. } => "unsupported_content_type",
        }
    }
}

impl From<ImageValidationError> for Error {
    fn from(value: ImageValidationError) -> Self {
        let code = value.code();
        Error::invalid_request(value.to_string()).with_details(json!({
            "field": "image",
            "code": code,
        }))
    }
}

/// Size and type limits applied to uploads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePolicy {
    max_bytes: usize,
    allowed_extensions: Vec<String>,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_UPLOAD_BYTES,
            DEFAULT_ALLOWED_EXTENSIONS.iter().map(|ext| (*ext).to_owned()),
        )
    }
}

impl ImagePolicy {
    /// Build a policy; extensions are normalised to lowercase without dots.
    pub fn new(max_bytes: usize, allowed_extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            max_bytes,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    /// Configured size limit.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check an upload against the policy.
    ///
    /// # Examples
    /// ```
    /// use scan_backend::domain::{ImagePolicy, ImageUpload};
    ///
    /// let upload = ImageUpload {
    ///     bytes: vec![0xFF, 0xD8, 0xFF],
    ///     filename: "mole.JPG".to_owned(),
    ///     content_type: Some("image/jpeg".to_owned()),
    /// };
    /// let image = ImagePolicy::default().validate(upload).expect("valid image");
    /// assert_eq!(image.extension(), "jpg");
    /// ```
    pub fn validate(&self, upload: ImageUpload) -> Result<ValidatedImage, ImageValidationError> {
        let ImageUpload {
            bytes,
            filename,
            content_type,
        } = upload;

        if filename.trim().is_empty() {
            return Err(ImageValidationError::MissingFile);
        }
        if bytes.is_empty() {
            return Err(ImageValidationError::EmptyFile);
        }
        if bytes.len() > self.max_bytes {
            return Err(ImageValidationError::TooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            return Err(ImageValidationError::UnsupportedExtension { extension });
        }

        let content_type = match content_type.map(|raw| raw.trim().to_ascii_lowercase()) {
            Some(declared) if declared.starts_with("image/") => declared,
            Some(declared) if declared.is_empty() || declared == "application/octet-stream" => {
                content_type_for(&extension)
            }
            Some(declared) => {
                return Err(ImageValidationError::UnsupportedContentType {
                    content_type: declared,
                });
            }
            None => content_type_for(&extension),
        };

        Ok(ValidatedImage {
            bytes,
            extension,
            content_type,
        })
    }
}

fn content_type_for(extension: &str) -> String {
    match extension {
        "jpg" | "jpeg" => "image/jpeg".to_owned(),
        other => format!("image/{other}"),
    }
}
