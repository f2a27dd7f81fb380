//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::VerifiedIdentity;
use crate::domain::ports::{
    MockChatAssistant, MockClinicDirectory, MockScanHistoryQuery, MockScanSubmission,
    MockUserDirectory, ScanSubmission,
};
use crate::domain::test_support::verified_identity;
use crate::inbound::http::state::{HttpState, HttpStateExtraPorts, HttpStatePorts};

const BOUNDARY: &str = "scan-test-boundary";

/// Build a `multipart/form-data` body holding one `image` file field.
///
/// Returns the `Content-Type` header value and the encoded body.
pub fn multipart_image(filename: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Identity the mocked directory hands back for `subject`.
pub fn identity_for(subject: &str) -> VerifiedIdentity {
    verified_identity(subject, "ada@example.com", Some("Ada"))
}

struct StateParts {
    scans: Arc<dyn ScanSubmission>,
    history: MockScanHistoryQuery,
    users: MockUserDirectory,
    chat: MockChatAssistant,
    clinics: MockClinicDirectory,
}

impl Default for StateParts {
    fn default() -> Self {
        Self {
            scans: Arc::new(MockScanSubmission::new()),
            history: MockScanHistoryQuery::new(),
            users: MockUserDirectory::new(),
            chat: MockChatAssistant::new(),
            clinics: MockClinicDirectory::new(),
        }
    }
}

impl StateParts {
    fn build(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new_with_extra(
            HttpStatePorts {
                scans: self.scans,
                history: Arc::new(self.history),
                users: Arc::new(self.users),
            },
            HttpStateExtraPorts {
                chat: Arc::new(self.chat),
                clinics: Arc::new(self.clinics),
            },
        ))
    }
}

/// State whose only live port is the scan pipeline.
pub fn state_with_scans(scans: Arc<dyn ScanSubmission>) -> web::Data<HttpState> {
    StateParts {
        scans,
        ..StateParts::default()
    }
    .build()
}

/// State for history handlers.
pub fn state_with_history(
    users: MockUserDirectory,
    history: MockScanHistoryQuery,
) -> web::Data<HttpState> {
    StateParts {
        users,
        history,
        ..StateParts::default()
    }
    .build()
}

/// State for account handlers.
pub fn state_with_users(users: MockUserDirectory) -> web::Data<HttpState> {
    StateParts {
        users,
        ..StateParts::default()
    }
    .build()
}

/// State for the chat handler.
pub fn state_with_chat(chat: MockChatAssistant) -> web::Data<HttpState> {
    StateParts {
        chat,
        ..StateParts::default()
    }
    .build()
}

/// State for clinic handlers.
pub fn state_with_clinics(clinics: MockClinicDirectory) -> web::Data<HttpState> {
    StateParts {
        clinics,
        ..StateParts::default()
    }
    .build()
}
