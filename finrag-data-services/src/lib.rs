pub mod documents;
pub mod embedding;
pub mod ingestion;
pub mod market_store;
pub mod vector_store;

// Re-export commonly used items
pub use documents::{load_text_documents, TextSplitter};
pub use embedding::{EmbeddingProvider, FastembedEmbedder};
pub use ingestion::{DocumentIngestionPipeline, IngestStats};
pub use market_store::MarketDataStore;
pub use vector_store::{QdrantVectorStore, VectorIndex};
