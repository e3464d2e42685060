use finrag_core::PipelineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Vector store error: {0}")]
    VectorStoreError(String),

    #[error("No market data for: {0}")]
    NoMarketData(String),
}

impl RpcError {
    /// Get the JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        use crate::protocol::*;
        match self {
            RpcError::ParseError(_) => PARSE_ERROR,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => INVALID_PARAMS,
            RpcError::InternalError(_) => INTERNAL_ERROR,
            RpcError::EmbeddingError(_) => EMBEDDING_ERROR,
            RpcError::GenerationError(_) => GENERATION_ERROR,
            RpcError::VectorStoreError(_) => VECTOR_STORE_ERROR,
            RpcError::NoMarketData(_) => NO_MARKET_DATA,
        }
    }

    /// Get additional error data (optional)
    pub fn data(&self) -> Option<serde_json::Value> {
        match self {
            RpcError::NoMarketData(market) => Some(serde_json::json!({
                "market": market,
                "suggestion": "Call market.data_info to list available markets"
            })),
            _ => None,
        }
    }
}

impl From<PipelineError> for RpcError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Embedding(e) => RpcError::EmbeddingError(e.to_string()),
            PipelineError::Search(e) => RpcError::VectorStoreError(e.to_string()),
            PipelineError::Generation(e) => RpcError::GenerationError(e.to_string()),
            e @ (PipelineError::EmptyQuestion | PipelineError::InvalidTopK(_)) => {
                RpcError::InvalidParams(e.to_string())
            }
        }
    }
}

// Convert anyhow errors to RpcError
impl From<anyhow::Error> for RpcError {
    fn from(err: anyhow::Error) -> Self {
        RpcError::InternalError(err.to_string())
    }
}
