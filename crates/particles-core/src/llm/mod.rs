//! LLM integration - chat completion provider
//!
//! This module provides:
//! - `SummarizationProvider`, the capability the compression pipeline calls
//! - An OpenAI-compatible HTTP client implementing it
//! - Request/response wire types

mod client;
mod provider;
mod types;

pub use client::{LlmClient, LlmClientBuilder};
pub use provider::SummarizationProvider;
pub use types::{
    ChatRequest, ChatResponse, Choice, FinishReason, LlmResponse, Message, MessageRole, Usage,
};
