use async_trait::async_trait;

use super::errors::SummaryError;

/// A generative-language endpoint producing free-text summaries.
#[async_trait]
pub trait SummaryGeneratorPort: Send + Sync {
    /// `Ok(None)` when the service answered without any text.
    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<Option<String>, SummaryError>;
}
