//! Compression request builder
//!
//! Turns raw article text and a [`CompressionLevel`] into a
//! [`CompressionPlan`]: the target length, the token budget handed to the
//! provider, and the system/user prompt pair.

use serde::{Deserialize, Serialize};

use super::level::CompressionLevel;
use super::words::{count_words, has_words};
use crate::error::{Error, Result};

/// Fixed system prompt framing the model as an editor
pub const SYSTEM_PROMPT: &str = "You are an expert editor who specializes in compressing articles while maintaining their essence and readability.";

/// Article text plus the requested reduction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub original_text: String,
    pub level: CompressionLevel,
}

impl CompressionRequest {
    /// Validate and create a request
    ///
    /// Fails with [`Error::EmptyInput`] unless the text has at least one word.
    pub fn new(original_text: impl Into<String>, level: CompressionLevel) -> Result<Self> {
        let original_text = original_text.into();
        if !has_words(&original_text) {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            original_text,
            level,
        })
    }

    /// Build the plan, rejecting articles longer than `max_words` (0 means unlimited)
    pub fn plan_within(&self, max_words: usize) -> Result<CompressionPlan> {
        let words = count_words(&self.original_text);
        if max_words > 0 && words > max_words {
            return Err(Error::InputTooLarge(words, max_words));
        }
        Ok(self.plan_for(words))
    }

    /// Build the plan for this request
    pub fn plan(&self) -> CompressionPlan {
        self.plan_for(count_words(&self.original_text))
    }

    fn plan_for(&self, original_word_count: usize) -> CompressionPlan {
        let target = TargetSpec::compute(original_word_count, self.level);
        let prompt = PromptPair::for_article(&self.original_text, target, self.level);
        CompressionPlan {
            level: self.level,
            target,
            prompt,
        }
    }
}

/// Length goals derived from the original article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub original_word_count: usize,
    pub target_word_count: usize,
    pub token_budget: usize,
}

impl TargetSpec {
    /// `target = floor(words * kept / 100)`, `budget = floor(target * 1.5)`
    pub fn compute(original_word_count: usize, level: CompressionLevel) -> Self {
        let target_word_count = original_word_count * level.kept_pct() as usize / 100;
        Self {
            original_word_count,
            target_word_count,
            token_budget: token_budget(target_word_count),
        }
    }
}

/// Heuristic output allowance for a target word count
pub fn token_budget(target_word_count: usize) -> usize {
    target_word_count * 3 / 2
}

/// System and user messages sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn for_article(article_text: &str, target: TargetSpec, level: CompressionLevel) -> Self {
        let user = format!(
            "Compress the following article to approximately {target} words (about {kept}% of the original length).\n\
             \n\
             Maintain the key points and main narrative while removing less essential details. \
             Keep the tone and style consistent with the original.\n\
             \n\
             Original article:\n\
             {article_text}\n\
             \n\
             Compressed version:",
            target = target.target_word_count,
            kept = level.kept_pct(),
        );

        Self {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

/// Everything needed to issue the completion call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionPlan {
    pub level: CompressionLevel,
    pub target: TargetSpec,
    pub prompt: PromptPair,
}

impl CompressionPlan {
    pub fn token_budget(&self) -> usize {
        self.target.token_budget
    }
}

/// Validate `article_text` and build its plan
pub fn build(article_text: &str, level: CompressionLevel) -> Result<CompressionPlan> {
    Ok(CompressionRequest::new(article_text, level)?.plan())
}
