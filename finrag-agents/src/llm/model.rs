use async_trait::async_trait;
use finrag_core::GenerationError;

/// One completed generation with whatever metadata the backend reported.
///
/// Token counts are `None` when the backend does not report usage; the
/// pipeline falls back to its own approximation in that case.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub model: String,
    pub input_tokens: Option<u32>,
    pub output_tokens: Option<u32>,
}

/// Text-in, text-out language model boundary.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier of the underlying model.
    fn model_name(&self) -> &str;

    /// Generate a completion for the prompt, capped at `max_tokens`.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<Generation, GenerationError>;
}
