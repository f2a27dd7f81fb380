//! Health assistant adapters backed by Gemini `generateContent`.

mod dto;
mod gemini_assistant;

pub use gemini_assistant::{GeminiChatAssistant, GeminiSetupError};
