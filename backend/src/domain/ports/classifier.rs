//! Driven port for the external image classifier.

use async_trait::async_trait;

use crate::domain::ScanCategory;

use super::define_port_error;

define_port_error! {
    /// Failures raised while classifying an image.
    pub enum ClassifierError {
        /// The classifier did not answer within the deadline.
        Timeout { message: String } => "classifier timed out: {message}",
        /// The classifier could not be reached.
        Transport { message: String } => "classifier transport failed: {message}",
        /// The classifier refused the request.
        Rejected { status: u16, message: String } =>
            "classifier rejected request ({status}): {message}",
        /// The classifier replied with something unusable.
        Decode { message: String } => "classifier reply could not be decoded: {message}",
        /// No classifier is configured for this deployment.
        Disabled => "classifier is not configured",
    }
}

/// Raw classifier reply before defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierVerdict {
    /// Condition name as reported.
    pub label: String,
    /// Confidence on whatever scale the classifier uses.
    pub confidence: f64,
    /// Free-form severity label.
    pub severity: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Ordered advice.
    pub recommendations: Option<Vec<String>>,
}

/// Port for classifying a stored image.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the image found at `image_url` for `category`.
    async fn classify(
        &self,
        image_url: &str,
        category: ScanCategory,
    ) -> Result<ClassifierVerdict, ClassifierError>;
}

/// Classifier used when none is configured; callers fall back.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureClassifier;

#[async_trait]
impl Classifier for FixtureClassifier {
    async fn classify(
        &self,
        _image_url: &str,
        _category: ScanCategory,
    ) -> Result<ClassifierVerdict, ClassifierError> {
        Err(ClassifierError::disabled())
    }
}
