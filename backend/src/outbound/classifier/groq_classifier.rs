//! Reqwest-backed Groq vision classifier.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use super::dto::{
    CompletionRequestDto, CompletionResponseDto, ContentPartDto, ImageUrlDto, MessageDto,
};
use super::{prompt, reply};
use crate::domain::ScanCategory;
use crate::domain::ports::{Classifier, ClassifierError, ClassifierVerdict};
use crate::outbound::http_failure::{HttpFailure, body_preview};

const TEMPERATURE: f32 = 0.7;
const MAX_COMPLETION_TOKENS: u32 = 1024;

/// Classifier calling a Groq-hosted vision model.
pub struct GroqClassifier {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GroqClassifier {
    /// Build a classifier using a reqwest client with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

impl From<HttpFailure> for ClassifierError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Timeout(message) => Self::timeout(message),
            HttpFailure::Transport(message) => Self::transport(message),
            HttpFailure::Rejected { status, message } => Self::rejected(status, message),
        }
    }
}

#[async_trait]
impl Classifier for GroqClassifier {
    async fn classify(
        &self,
        image_url: &str,
        category: ScanCategory,
    ) -> Result<ClassifierVerdict, ClassifierError> {
        let instructions = prompt::instructions(category);
        let request = CompletionRequestDto {
            model: &self.model,
            messages: [MessageDto {
                role: "user",
                content: [
                    ContentPartDto::Text {
                        text: &instructions,
                    },
                    ContentPartDto::ImageUrl {
                        image_url: ImageUrlDto { url: image_url },
                    },
                ],
            }],
            temperature: TEMPERATURE,
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            top_p: 1.0,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
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

        let content = completion_text(body.as_ref())?;
        debug!(%category, reply = %body_preview(content.as_bytes()), "classifier replied");
        Ok(reply::interpret(&content))
    }
}

fn completion_text(body: &[u8]) -> Result<String, ClassifierError> {
    let decoded: CompletionResponseDto = serde_json::from_slice(body)
        .map_err(|error| ClassifierError::decode(format!("invalid completion payload: {error}")))?;
    decoded
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| ClassifierError::decode("completion contained no message content"))
}
