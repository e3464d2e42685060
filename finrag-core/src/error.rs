use thiserror::Error;

/// Failures from the embedding provider, or malformed vectors it returned.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("embedding backend error: {0}")]
    Backend(String),

    #[error("embedding has wrong dimensionality: expected {expected}, got {actual}")]
    WrongDimension { expected: usize, actual: usize },

    #[error("embedding contains non-finite values")]
    NonFinite,

    #[error("embedding backend returned no vector for input")]
    Empty,
}

/// Failures from the vector store backend. An empty store is not an error;
/// queries against it return an empty result.
#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("vector store error: {0}")]
    Backend(String),
}

/// Failures from the language model backend. Surfaced, never swallowed:
/// an empty answer is indistinguishable from a real "I don't know".
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("language model error: {0}")]
    Backend(String),

    #[error("language model request timed out after {0}s")]
    Timeout(u64),

    #[error("language model returned an empty response")]
    EmptyResponse,
}

/// Errors surfaced by the retrieval pipeline. The pipeline does not retry;
/// retry policy belongs to the caller or the collaborator's own client.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("top_k must be at least 1 (got {0})")]
    InvalidTopK(usize),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Search(#[from] VectorStoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Why a model response could not be parsed into a trading decision.
///
/// Malformed model output is routine. This error never crosses the stock
/// agent boundary; it is converted into the `hold` fallback decision.
#[derive(Error, Debug)]
pub enum DecisionParseError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON in response: {0}")]
    InvalidJson(#[from] serde_json::Error),
}
