//! PARTicles Core Library
//!
//! This crate provides the core functionality for PARTicles, including:
//! - Compression planning (target length, token budget, prompts)
//! - Result reporting (word counts, achieved reduction)
//! - LLM integration (OpenAI-compatible chat completions)
//! - Configuration and credential handling

pub mod compression;
pub mod config;
pub mod error;
pub mod llm;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::compression::{CompressionLevel, CompressionOutcome, Compressor};
    pub use crate::config::{ApiKey, Config};
    pub use crate::error::{Error, Result};
    pub use crate::llm::{LlmClient, SummarizationProvider};
}

#[cfg(test)]
mod error_tests;
