//! Compression pipeline: validate, plan, call the provider, report

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::level::CompressionLevel;
use super::report::{CompressionResult, measure};
use super::request::{CompressionPlan, CompressionRequest};
use crate::config::Config;
use crate::error::Result;
use crate::llm::SummarizationProvider;

/// Temperature used when no configuration overrides it
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// What the presentation layer renders after a successful run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionOutcome {
    pub model: String,
    pub level: CompressionLevel,
    pub kept_pct: u8,
    pub original_word_count: usize,
    pub target_word_count: usize,
    pub token_budget: usize,
    #[serde(flatten)]
    pub result: CompressionResult,
}

/// Runs one compression per call against a provider
#[derive(Debug, Clone)]
pub struct Compressor<P> {
    provider: P,
    temperature: f32,
    max_input_words: usize,
}

impl<P: SummarizationProvider> Compressor<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            temperature: DEFAULT_TEMPERATURE,
            max_input_words: 0,
        }
    }

    /// Take temperature and input limit from the loaded configuration
    pub fn from_config(provider: P, config: &Config) -> Self {
        Self::new(provider)
            .with_temperature(config.llm.temperature)
            .with_max_input_words(config.compression.max_input_words)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Reject articles above this many words before calling out (0 = unlimited)
    pub fn with_max_input_words(mut self, max_words: usize) -> Self {
        self.max_input_words = max_words;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Validate and plan without calling the provider
    pub fn plan(&self, article_text: &str, level: CompressionLevel) -> Result<CompressionPlan> {
        CompressionRequest::new(article_text, level)?.plan_within(self.max_input_words)
    }

    /// Compress `article_text` at `level`
    ///
    /// Validation failures return before the provider is called. Provider
    /// failures are returned unchanged.
    pub async fn compress(
        &self,
        article_text: &str,
        level: CompressionLevel,
    ) -> Result<CompressionOutcome> {
        let plan = self.plan(article_text, level)?;
        self.run(&plan).await
    }

    /// Issue the completion call for an already validated plan
    pub async fn run(&self, plan: &CompressionPlan) -> Result<CompressionOutcome> {
        let level = plan.level;

        debug!(
            original_words = plan.target.original_word_count,
            target_words = plan.target.target_word_count,
            token_budget = plan.token_budget(),
            level = level.pct(),
            "Built compression plan"
        );

        let compressed_text = self
            .provider
            .complete(
                &plan.prompt.system,
                &plan.prompt.user,
                self.temperature,
                plan.token_budget(),
            )
            .await?;

        let result = measure(plan.target.original_word_count, &compressed_text);

        info!(
            original_words = plan.target.original_word_count,
            compressed_words = result.compressed_word_count,
            reduction_pct = result.actual_reduction_pct,
            "Article compressed"
        );

        Ok(CompressionOutcome {
            model: self.provider.model().to_string(),
            level,
            kept_pct: level.kept_pct(),
            original_word_count: plan.target.original_word_count,
            target_word_count: plan.target.target_word_count,
            token_budget: plan.token_budget(),
            result,
        })
    }
}
