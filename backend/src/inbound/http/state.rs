//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::DEFAULT_MAX_UPLOAD_BYTES;
use crate::domain::ports::{
    ChatAssistant, ClinicDirectory, FixtureChatAssistant, FixtureClinicDirectory,
    ScanHistoryQuery, ScanSubmission, UserDirectory,
};

/// Parameter object bundling the ports every deployment must provide.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub scans: Arc<dyn ScanSubmission>,
    pub history: Arc<dyn ScanHistoryQuery>,
    pub users: Arc<dyn UserDirectory>,
}

/// Passthrough collaborators that may be left unconfigured.
#[derive(Clone)]
pub struct HttpStateExtraPorts {
    pub chat: Arc<dyn ChatAssistant>,
    pub clinics: Arc<dyn ClinicDirectory>,
}

impl Default for HttpStateExtraPorts {
    fn default() -> Self {
        Self {
            chat: Arc::new(FixtureChatAssistant),
            clinics: Arc::new(FixtureClinicDirectory),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub scans: Arc<dyn ScanSubmission>,
    pub history: Arc<dyn ScanHistoryQuery>,
    pub users: Arc<dyn UserDirectory>,
    pub chat: Arc<dyn ChatAssistant>,
    pub clinics: Arc<dyn ClinicDirectory>,
    /// Multipart bodies stop being buffered past this many image bytes.
    pub max_upload_bytes: usize,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new_with_extra(ports, HttpStateExtraPorts::default())
    }
}

impl HttpState {
    /// Combine the core ports with the passthrough collaborators.
    pub fn new_with_extra(ports: HttpStatePorts, extra: HttpStateExtraPorts) -> Self {
        let HttpStatePorts {
            scans,
            history,
            users,
        } = ports;
        let HttpStateExtraPorts { chat, clinics } = extra;
        Self {
            scans,
            history,
            users,
            chat,
            clinics,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Override the image buffering limit; keep it in step with the
    /// [`ImagePolicy`](crate::domain::ImagePolicy) given to the scan service.
    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
