//! Recording doubles for the third-party collaborators behind scan ingestion.

use scan_backend::domain::ports::{
    Classifier, ClassifierError, ClassifierVerdict, IdentityVerifier, IdentityVerifierError,
    ImageStore, ImageStoreError,
};
use scan_backend::domain::{BearerToken, ScanCategory, VerifiedIdentity};

use crate::recording_double_macro::recording_double;

recording_double! {
    /// Configurable outcome for [`RecordingIdentityVerifier`].
    pub(crate) enum VerifierResponse {
        Ok(VerifiedIdentity),
        Err(IdentityVerifierError),
    }

    /// Records the raw bearer tokens presented for verification.
    pub(crate) struct RecordingIdentityVerifier {
        calls: String,
        trait: IdentityVerifier,
        method: verify(&self, token: &BearerToken)
            -> Result<VerifiedIdentity, IdentityVerifierError>,
        record: token.expose().to_owned(),
        calls_lock: "verifier calls lock",
        response_lock: "verifier response lock",
    }
}

recording_double! {
    /// Configurable outcome for [`RecordingImageStore`].
    pub(crate) enum ImageStoreResponse {
        Ok(String),
        Err(ImageStoreError),
    }

    /// Records object path, content type and size of each upload.
    pub(crate) struct RecordingImageStore {
        calls: (String, String, usize),
        trait: ImageStore,
        method: put(&self, path: &str, bytes: &[u8], content_type: &str)
            -> Result<String, ImageStoreError>,
        record: (path.to_owned(), content_type.to_owned(), bytes.len()),
        calls_lock: "image store calls lock",
        response_lock: "image store response lock",
    }
}

recording_double! {
    /// Configurable outcome for [`RecordingClassifier`].
    pub(crate) enum ClassifierResponse {
        Ok(ClassifierVerdict),
        Err(ClassifierError),
    }

    /// Records the image URL and category of each classification.
    pub(crate) struct RecordingClassifier {
        calls: (String, ScanCategory),
        trait: Classifier,
        method: classify(&self, image_url: &str, category: ScanCategory)
            -> Result<ClassifierVerdict, ClassifierError>,
        record: (image_url.to_owned(), category),
        calls_lock: "classifier calls lock",
        response_lock: "classifier response lock",
    }
}

/// Public URL every successful upload reports.
pub(crate) const STORED_IMAGE_URL: &str = "https://storage.test/scan-images/upload.png";

/// Classifier reply used unless a scenario overrides it.
pub(crate) fn confident_verdict() -> ClassifierVerdict {
    ClassifierVerdict {
        label: "Eczema".to_owned(),
        confidence: 0.87,
        severity: Some("low".to_owned()),
        description: Some("Dry, itchy patches consistent with eczema.".to_owned()),
        recommendations: Some(vec!["Moisturise twice daily".to_owned()]),
    }
}
