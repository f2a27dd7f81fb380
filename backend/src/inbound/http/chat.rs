//! Health assistant chat handler.
//!
//! ```text
//! POST /api/chat {"message": "...", "history": "..." | [{"role": "...", "content": "..."}]}
//! ```

use actix_web::{post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{ChatAssistantError, ChatPrompt};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// One earlier turn of the conversation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatTurn {
    #[schema(example = "user")]
    pub role: String,
    pub content: String,
}

/// Conversation so far, either pre-rendered or as structured turns.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum ChatHistory {
    Text(String),
    Turns(Vec<ChatTurn>),
}

impl ChatHistory {
    fn render(self) -> Option<String> {
        let rendered = match self {
            Self::Text(text) => text,
            Self::Turns(turns) => turns
                .into_iter()
                .map(|turn| format!("{}: {}", turn.role, turn.content))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        (!rendered.trim().is_empty()).then_some(rendered)
    }
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[schema(example = "Is a red rash after hiking a concern?")]
    pub message: Option<String>,
    pub history: Option<ChatHistory>,
}

/// Assistant reply.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

fn assistant_error(err: &ChatAssistantError) -> Error {
    match err {
        ChatAssistantError::Disabled => {
            Error::service_unavailable("Chat assistant is not configured")
        }
        other => {
            warn!(error = %other, "chat assistant failed");
            Error::service_unavailable("Chat assistant is unavailable")
        }
    }
}

/// Ask the health assistant a question.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Message missing or empty", body = ErrorSchema),
        (status = 503, description = "Assistant unavailable", body = ErrorSchema)
    ),
    tags = ["assistant"],
    security([]),
    operation_id = "chat"
)]
#[post("/api/chat")]
pub async fn chat(
    state: web::Data<HttpState>,
    payload: web::Json<ChatRequest>,
) -> ApiResult<web::Json<ChatResponse>> {
    let ChatRequest { message, history } = payload.into_inner();
    let message = message
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| Error::invalid_request("Message is required"))?;

    let prompt = ChatPrompt {
        message,
        history: history.and_then(ChatHistory::render),
    };
    let response = state
        .chat
        .reply(&prompt)
        .await
        .map_err(|err| assistant_error(&err))?;

    Ok(web::Json(ChatResponse {
        response,
        timestamp: Utc::now(),
    }))
}
