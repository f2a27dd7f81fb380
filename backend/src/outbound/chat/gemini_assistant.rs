//! Reqwest-backed Gemini health assistant.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::dto::{ContentDto, GenerateRequestDto, GenerateResponseDto, GenerationConfigDto, PartDto};
use crate::domain::ports::{ChatAssistant, ChatAssistantError, ChatPrompt};
use crate::outbound::http_failure::HttpFailure;

const SYSTEM_CONTEXT: &str = "You are a helpful AI health assistant. Provide accurate, helpful \
health information while always reminding users to consult healthcare professionals for serious \
concerns.\n\nBe empathetic, professional, and clear in your responses. If asked about serious \
symptoms, always recommend seeing a doctor. You can provide general health information, wellness \
tips, and answer common health questions.";

/// Reply used when the model returns no candidates.
pub(crate) const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response. Please try again.";

/// Assistant backed by a Gemini model.
pub struct GeminiChatAssistant {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiChatAssistant {
    /// Build an assistant for `model` under the Generative Language `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// endpoint URL is malformed.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GeminiSetupError> {
        let endpoint = generate_url(base_url, model)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
        })
    }
}

/// Failures constructing [`GeminiChatAssistant`].
#[derive(Debug, thiserror::Error)]
pub enum GeminiSetupError {
    /// The endpoint could not be built from the configured base URL.
    #[error("invalid Gemini endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be built.
    #[error("failed to build Gemini client: {0}")]
    Client(#[from] reqwest::Error),
}

fn generate_url(base_url: &str, model: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model.trim()
    ))
}

/// Full prompt text: system context, optional transcript, then the message.
pub(crate) fn render_prompt(prompt: &ChatPrompt) -> String {
    match prompt
        .history
        .as_deref()
        .map(str::trim)
        .filter(|history| !history.is_empty())
    {
        Some(history) => format!("{SYSTEM_CONTEXT}\n\n{history}\n\nUser: {}", prompt.message),
        None => format!("{SYSTEM_CONTEXT}\n\nUser question: {}", prompt.message),
    }
}

impl From<HttpFailure> for ChatAssistantError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Timeout(message) => Self::timeout(message),
            HttpFailure::Transport(message) => Self::transport(message),
            HttpFailure::Rejected { status, message } => Self::rejected(status, message),
        }
    }
}

#[async_trait]
impl ChatAssistant for GeminiChatAssistant {
    async fn reply(&self, prompt: &ChatPrompt) -> Result<String, ChatAssistantError> {
        let text = render_prompt(prompt);
        let request = GenerateRequestDto {
            contents: [ContentDto {
                parts: [PartDto { text: &text }],
            }],
            generation_config: GenerationConfigDto::default(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| HttpFailure::from_reqwest(&err))?;
        if !status.is_success() {
            return Err(HttpFailure::from_status(status, body.as_ref()).into());
        }

        let reply = decode_reply(body.as_ref())?;
        debug!(chars = reply.chars().count(), "assistant replied");
        Ok(reply)
    }
}

fn decode_reply(body: &[u8]) -> Result<String, ChatAssistantError> {
    let decoded: GenerateResponseDto = serde_json::from_slice(body).map_err(|error| {
        ChatAssistantError::decode(format!("invalid generateContent payload: {error}"))
    })?;
    Ok(decoded.first_text().unwrap_or_else(|| {
        warn!("assistant returned no candidates");
        EMPTY_REPLY.to_owned()
    }))
}
