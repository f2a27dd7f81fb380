//! DTOs for the chat completions request and the model's JSON verdict.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct CompletionRequestDto<'a> {
    pub(super) model: &'a str,
    pub(super) messages: [MessageDto<'a>; 1],
    pub(super) temperature: f32,
    pub(super) max_completion_tokens: u32,
    pub(super) top_p: f32,
    pub(super) stream: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageDto<'a> {
    pub(super) role: &'static str,
    pub(super) content: [ContentPartDto<'a>; 2],
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum ContentPartDto<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrlDto<'a> },
}

#[derive(Debug, Serialize)]
pub(super) struct ImageUrlDto<'a> {
    pub(super) url: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompletionResponseDto {
    #[serde(default)]
    pub(super) choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ChoiceDto {
    pub(super) message: AssistantMessageDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct AssistantMessageDto {
    pub(super) content: Option<String>,
}

/// Verdict shape the prompt asks the model to return.
#[derive(Debug, Deserialize)]
pub(super) struct VerdictDto {
    pub(super) disease_name: Option<String>,
    pub(super) confidence: Option<ConfidenceDto>,
    pub(super) severity: Option<String>,
    pub(super) recommendations: Option<Vec<String>>,
    pub(super) description: Option<String>,
}

/// Models occasionally quote numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ConfidenceDto {
    Number(f64),
    Text(String),
}

impl ConfidenceDto {
    pub(super) fn value(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Text(raw) => raw.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        }
    }
}
