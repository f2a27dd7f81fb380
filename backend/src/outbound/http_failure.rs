//! Shared classification of reqwest failures.
//!
//! Each HTTP adapter converts an [`HttpFailure`] into its own port error so
//! timeout, transport, and status handling stay identical across providers.

use reqwest::StatusCode;

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Transport-level outcome of a failed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HttpFailure {
    /// The request or the provider timed out.
    Timeout(String),
    /// The connection failed or the provider answered with a 5xx.
    Transport(String),
    /// The provider refused the request with a 4xx.
    Rejected { status: u16, message: String },
}

impl HttpFailure {
    pub(crate) fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let preview = body_preview(body);
        let message = if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {preview}", status.as_u16())
        };

        match status {
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::Timeout(message),
            _ if status.is_client_error() => Self::Rejected {
                status: status.as_u16(),
                message,
            },
            _ => Self::Transport(message),
        }
    }
}

/// Whitespace-compacted, truncated rendering of a response body for logs.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
