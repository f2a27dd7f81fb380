//! Image classifier adapters.
//!
//! The production classifier is a vision model behind Groq's
//! OpenAI-compatible chat completions API. The model is asked for a JSON
//! verdict; replies that cannot be decoded degrade to a generic verdict
//! rather than an error.

mod dto;
mod groq_classifier;
mod prompt;
mod reply;

pub use groq_classifier::GroqClassifier;
