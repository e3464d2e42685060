pub mod agents;
pub mod llm;
pub mod rag;

// Re-export commonly used items
pub use agents::{BrokerAgent, BrokerConfig, FinancialRagAgent, StockAgent};
pub use llm::{Generation, LanguageModel, OpenAiChatModel, OpenAiConfig};
pub use rag::{RagEngine, RagEngineConfig};
