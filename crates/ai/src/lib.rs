//! Analysis client.
//!
//! Blocking reqwest client (no Tokio runtime required). One chat completion
//! per test case, wrapped in a retry loop that always yields an outcome.

pub mod analyzer;
pub mod client;
pub mod error;
pub mod template;

pub use analyzer::{Analyzer, RetryPolicy};
pub use client::{ChatMessage, ChatRequest, ChatResponse, ChatTransport, OpenAiClient};
pub use error::AiError;
pub use template::render_user_message;
