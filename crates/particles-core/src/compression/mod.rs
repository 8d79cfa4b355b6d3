//! Article compression
//!
//! The flow is strictly linear: validate the article, build a
//! [`CompressionPlan`] (target length, token budget, prompts), ask a
//! [`crate::llm::SummarizationProvider`] for the rewrite, then measure it.

mod level;
mod report;
mod request;
mod service;
mod words;

pub use level::CompressionLevel;
pub use report::{CompressionResult, measure, reduction_pct, report};
pub use request::{
    CompressionPlan, CompressionRequest, PromptPair, SYSTEM_PROMPT, TargetSpec, build,
    token_budget,
};
pub use service::{CompressionOutcome, Compressor, DEFAULT_TEMPERATURE};
pub use words::{count_words, has_words};
