//! Summarization capability consumed by the compression pipeline

use async_trait::async_trait;

use crate::error::Result;

/// A service that turns a system/user prompt pair into a single completion
///
/// Implementations make exactly one attempt. Any failure is reported as
/// [`crate::Error::Completion`].
#[async_trait]
pub trait SummarizationProvider: Send + Sync {
    /// Request one completion
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String>;

    /// Model identifier used for display
    fn model(&self) -> &str;
}

#[async_trait]
impl<P: SummarizationProvider + ?Sized> SummarizationProvider for std::sync::Arc<P> {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        (**self)
            .complete(system_prompt, user_prompt, temperature, max_tokens)
            .await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}
