use finrag_core::{
    DebugTrace, EmbeddingError, EmbeddingInfo, PipelineError, StageTimings, TokenUsage,
};
use finrag_data_services::{EmbeddingProvider, VectorIndex};
use std::sync::Arc;
use std::time::Instant;

use crate::llm::LanguageModel;

/// Configuration for the retrieval pipeline
#[derive(Debug, Clone)]
pub struct RagEngineConfig {
    pub top_k: usize,
    pub max_tokens: u32,
}

impl Default for RagEngineConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_tokens: 200,
        }
    }
}

/// Retrieval-augmented question answering pipeline.
///
/// One query runs embed -> search -> context build -> generate, in that
/// order, with no caching and no retries of its own. Collaborators are
/// injected so tests can swap in deterministic fakes.
pub struct RagEngine {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn LanguageModel>,
    config: RagEngineConfig,
}

impl RagEngine {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn LanguageModel>,
        config: RagEngineConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            model,
            config,
        }
    }

    pub fn config(&self) -> &RagEngineConfig {
        &self.config
    }

    /// Answer a question, returning only the generated text.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<String, PipelineError> {
        let trace = self.answer_debug(question, top_k).await?;
        Ok(trace.answer)
    }

    /// Answer a question, returning the full per-stage trace.
    ///
    /// The trace records intermediate state even for an empty store: an
    /// empty retrieval yields an empty context and the model is still
    /// called with it.
    pub async fn answer_debug(
        &self,
        question: &str,
        top_k: usize,
    ) -> Result<DebugTrace, PipelineError> {
        if question.trim().is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }
        if top_k == 0 {
            return Err(PipelineError::InvalidTopK(top_k));
        }

        let total_start = Instant::now();

        // Stage 1: embed the question
        let embed_start = Instant::now();
        let query_vector = self.embedder.embed(question)?;
        validate_vector(&query_vector, self.embedder.dimensions())?;
        let embedding_ms = embed_start.elapsed().as_millis() as u64;

        // Stage 2: nearest-neighbor search
        let search_start = Instant::now();
        let retrieved = self.index.query(query_vector, top_k).await?;
        let search_ms = search_start.elapsed().as_millis() as u64;

        tracing::debug!("Retrieved {} chunks for question", retrieved.len());

        // Stage 3: build context and prompt
        let context_start = Instant::now();
        let documents: Vec<String> = retrieved.iter().map(|c| c.text.clone()).collect();
        let distances: Vec<f32> = retrieved.iter().map(|c| c.distance).collect();
        let context = documents.join("\n\n");
        let prompt = build_prompt(&context, question);
        let context_build_ms = context_start.elapsed().as_millis() as u64;

        // Stage 4: generate the answer
        let generation_start = Instant::now();
        let generation = self.model.generate(&prompt, self.config.max_tokens).await?;
        let generation_ms = generation_start.elapsed().as_millis() as u64;

        let total_ms = total_start.elapsed().as_millis() as u64;

        // Model-reported counts win; the whitespace split is the fallback.
        let input_tokens = generation
            .input_tokens
            .unwrap_or_else(|| approx_token_count(&prompt));
        let output_tokens = generation
            .output_tokens
            .unwrap_or_else(|| approx_token_count(&generation.text));
        let tokens = TokenUsage::from_counts(input_tokens, output_tokens, generation_ms);

        let num_docs_retrieved = documents.len();
        let context_length = context.chars().count();

        Ok(DebugTrace {
            question: question.to_string(),
            retrieved_documents: documents,
            similarity_distances: distances,
            context,
            prompt,
            answer: generation.text,
            num_docs_retrieved,
            context_length,
            timing: StageTimings {
                embedding_ms,
                search_ms,
                retrieval_ms: embedding_ms + search_ms,
                context_build_ms,
                generation_ms,
                total_ms,
            },
            tokens,
            embedding: EmbeddingInfo {
                model: self.embedder.model_name().to_string(),
                dimensions: self.embedder.dimensions(),
            },
        })
    }
}

/// Deterministic prompt assembly. Same context and question always yield
/// the same prompt string.
fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Context:\n{}\n\nQuestion: {}\nAnswer:",
        context, question
    )
}

/// Whitespace-split token approximation used when the model reports no
/// usage numbers.
fn approx_token_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

fn validate_vector(vector: &[f32], expected: usize) -> Result<(), EmbeddingError> {
    if vector.is_empty() {
        return Err(EmbeddingError::Empty);
    }
    if vector.len() != expected {
        return Err(EmbeddingError::WrongDimension {
            expected,
            actual: vector.len(),
        });
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(EmbeddingError::NonFinite);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_deterministic() {
        let prompt = build_prompt("AAPL closed at $150", "What did AAPL close at?");
        assert_eq!(
            prompt,
            "Context:\nAAPL closed at $150\n\nQuestion: What did AAPL close at?\nAnswer:"
        );
        assert_eq!(
            prompt,
            build_prompt("AAPL closed at $150", "What did AAPL close at?")
        );
    }

    #[test]
    fn test_approx_token_count() {
        assert_eq!(approx_token_count("one two three"), 3);
        assert_eq!(approx_token_count("  spaced   out  "), 2);
        assert_eq!(approx_token_count(""), 0);
    }

    #[test]
    fn test_validate_vector() {
        assert!(validate_vector(&[0.1, 0.2], 2).is_ok());
        assert!(matches!(
            validate_vector(&[], 2),
            Err(EmbeddingError::Empty)
        ));
        assert!(matches!(
            validate_vector(&[0.1], 2),
            Err(EmbeddingError::WrongDimension {
                expected: 2,
                actual: 1
            })
        ));
        assert!(matches!(
            validate_vector(&[0.1, f32::NAN], 2),
            Err(EmbeddingError::NonFinite)
        ));
    }
}
