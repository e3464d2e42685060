pub mod chunk;
pub mod decision;
pub mod error;
pub mod market;
pub mod trace;

// Re-export common types
pub use chunk::{DocumentChunk, RetrievedChunk};
pub use decision::{OrderResult, OrderStatus, TradeAction, TradingDecision};
pub use error::{
    DecisionParseError, EmbeddingError, GenerationError, PipelineError, VectorStoreError,
};
pub use market::{BrokerPick, BrokerRecommendation, MarketBar, MarketInfo};
pub use trace::{DebugTrace, EmbeddingInfo, StageTimings, TokenUsage};

/// Market ticker symbol (e.g., "AAPL", "MSFT")
pub type MarketSymbol = String;
