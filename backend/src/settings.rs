//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `SCAN_*` environment variables, or a config
//! file. Collaborator credentials are optional: a missing key disables that
//! collaborator and the server falls back to its fixture behaviour.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_UPLOAD_BYTES, ImagePolicy};

const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `host` is not an IP address.
    #[error("invalid bind host {host:?}: {message}")]
    InvalidHost {
        /// Configured host.
        host: String,
        /// Parser message.
        message: String,
    },
}

/// Runtime configuration for the scan backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCAN")]
pub struct AppSettings {
    /// Address to bind.
    #[ortho_config(default = "0.0.0.0".to_owned())]
    pub host: String,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL. Falls back to `DATABASE_URL` when omitted.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Largest accepted image in bytes.
    #[ortho_config(default = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
    /// Comma-separated list of accepted file extensions.
    pub allowed_extensions: Option<String>,

    /// Supabase project URL.
    pub supabase_url: Option<String>,
    /// Supabase service key.
    pub supabase_key: Option<String>,
    /// Storage bucket for scan images.
    #[ortho_config(default = "scans".to_owned())]
    pub supabase_bucket: String,
    /// Upload timeout in seconds.
    #[ortho_config(default = 30)]
    pub storage_timeout_secs: u64,

    /// Groq API key.
    pub groq_api_key: Option<String>,
    /// Vision model used for classification.
    #[ortho_config(default = "meta-llama/llama-4-maverick-17b-128e-instruct".to_owned())]
    pub groq_model: String,
    /// Chat completions endpoint.
    #[ortho_config(default = "https://api.groq.com/openai/v1/chat/completions".to_owned())]
    pub groq_endpoint: String,
    /// Classification timeout in seconds.
    #[ortho_config(default = 60)]
    pub classifier_timeout_secs: u64,

    /// Firebase Web API key used for token lookups.
    pub firebase_api_key: Option<String>,
    /// Identity Toolkit lookup endpoint.
    #[ortho_config(
        default = "https://identitytoolkit.googleapis.com/v1/accounts:lookup".to_owned()
    )]
    pub firebase_endpoint: String,
    /// Verification timeout in seconds.
    #[ortho_config(default = 10)]
    pub identity_timeout_secs: u64,

    /// Gemini API key.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    #[ortho_config(default = "gemini-2.0-flash".to_owned())]
    pub gemini_model: String,
    /// Generative Language API base URL.
    #[ortho_config(default = "https://generativelanguage.googleapis.com/v1beta".to_owned())]
    pub gemini_endpoint: String,
    /// Chat timeout in seconds.
    #[ortho_config(default = 30)]
    pub chat_timeout_secs: u64,

    /// Google Maps API key.
    pub google_maps_api_key: Option<String>,
    /// Places API base URL.
    #[ortho_config(default = "https://maps.googleapis.com/maps/api/place".to_owned())]
    pub places_endpoint: String,
    /// Clinic lookup timeout in seconds.
    #[ortho_config(default = 10)]
    pub clinics_timeout_secs: u64,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl AppSettings {
    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip: IpAddr = self
            .host
            .trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::InvalidHost {
                host: self.host.clone(),
                message: err.to_string(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Database URL from settings or the conventional `DATABASE_URL`.
    pub fn database_url(&self) -> Option<String> {
        non_blank(self.database_url.as_ref())
            .map(str::to_owned)
            .or_else(|| {
                env::var(DATABASE_URL_ENV)
                    .ok()
                    .filter(|value| !value.trim().is_empty())
            })
    }

    /// Upload policy derived from the size and extension settings.
    pub fn image_policy(&self) -> ImagePolicy {
        let extensions: Vec<String> = match non_blank(self.allowed_extensions.as_ref()) {
            Some(list) => list.split(',').map(str::to_owned).collect(),
            None => DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
        };
        ImagePolicy::new(self.max_upload_bytes, extensions)
    }

    /// Supabase URL and key, when both are configured.
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        Some((
            non_blank(self.supabase_url.as_ref())?,
            non_blank(self.supabase_key.as_ref())?,
        ))
    }

    /// Groq key, when configured.
    pub fn groq_api_key(&self) -> Option<&str> {
        non_blank(self.groq_api_key.as_ref())
    }

    /// Firebase key, when configured.
    pub fn firebase_api_key(&self) -> Option<&str> {
        non_blank(self.firebase_api_key.as_ref())
    }

    /// Gemini key, when configured.
    pub fn gemini_api_key(&self) -> Option<&str> {
        non_blank(self.gemini_api_key.as_ref())
    }

    /// Google Maps key, when configured.
    pub fn google_maps_api_key(&self) -> Option<&str> {
        non_blank(self.google_maps_api_key.as_ref())
    }

    /// Storage timeout.
    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }

    /// Classifier timeout.
    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_secs(self.classifier_timeout_secs)
    }

    /// Identity verification timeout.
    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(self.identity_timeout_secs)
    }

    /// Chat timeout.
    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    /// Clinic lookup timeout.
    pub fn clinics_timeout(&self) -> Duration {
        Duration::from_secs(self.clinics_timeout_secs)
    }
}
