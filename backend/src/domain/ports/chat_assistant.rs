//! Driven port for the health assistant language model.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised while asking the assistant.
    pub enum ChatAssistantError {
        /// The model did not answer within the deadline.
        Timeout { message: String } => "assistant timed out: {message}",
        /// The model could not be reached.
        Transport { message: String } => "assistant transport failed: {message}",
        /// The model refused the request.
        Rejected { status: u16, message: String } =>
            "assistant rejected request ({status}): {message}",
        /// The reply body could not be decoded.
        Decode { message: String } => "assistant reply could not be decoded: {message}",
        /// No assistant is configured for this deployment.
        Disabled => "assistant is not configured",
    }
}

/// One user message plus whatever conversation came before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    /// The new user message.
    pub message: String,
    /// Earlier turns, already rendered as plain text.
    pub history: Option<String>,
}

/// Port for asking the assistant a question.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatAssistant: Send + Sync {
    /// Return the assistant's reply text.
    async fn reply(&self, prompt: &ChatPrompt) -> Result<String, ChatAssistantError>;
}

/// Assistant used when no model key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChatAssistant;

#[async_trait]
impl ChatAssistant for FixtureChatAssistant {
    async fn reply(&self, _prompt: &ChatPrompt) -> Result<String, ChatAssistantError> {
        Err(ChatAssistantError::disabled())
    }
}
