use serde::Serialize;

/// Wall-clock timings for each pipeline stage, in milliseconds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageTimings {
    pub embedding_ms: u64,
    pub search_ms: u64,
    /// Embedding plus search
    pub retrieval_ms: u64,
    pub context_build_ms: u64,
    pub generation_ms: u64,
    pub total_ms: u64,
}

/// Token accounting for one generation call.
///
/// Counts are the model's own numbers when it reports them, otherwise a
/// whitespace-split approximation computed by the pipeline.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
    pub tokens_per_second: f64,
}

impl TokenUsage {
    /// Build usage from raw counts and the generation wall time.
    ///
    /// Tokens-per-second is defined as 0 when the generation time is not
    /// positive, so instant (mocked) responses never divide by zero.
    pub fn from_counts(input_tokens: u32, output_tokens: u32, generation_ms: u64) -> Self {
        let tokens_per_second = if generation_ms > 0 {
            output_tokens as f64 / (generation_ms as f64 / 1000.0)
        } else {
            0.0
        };

        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            tokens_per_second,
        }
    }
}

/// Embedding backend metadata recorded in every trace.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingInfo {
    pub model: String,
    pub dimensions: usize,
}

/// Full per-query record of intermediate pipeline state and timings.
///
/// Created fresh per query, immutable once returned, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DebugTrace {
    pub question: String,
    pub retrieved_documents: Vec<String>,
    pub similarity_distances: Vec<f32>,
    pub context: String,
    pub prompt: String,
    pub answer: String,
    pub num_docs_retrieved: usize,
    pub context_length: usize,
    pub timing: StageTimings,
    pub tokens: TokenUsage,
    pub embedding: EmbeddingInfo,
}
