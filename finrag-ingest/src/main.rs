use anyhow::Result;
use clap::Parser;
use finrag_data_services::{
    DocumentIngestionPipeline, EmbeddingProvider, FastembedEmbedder, QdrantVectorStore,
    TextSplitter,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

/// Financial Document Ingestion CLI
///
/// Loads text documents, splits them into overlapping chunks, converts the
/// chunks to embeddings, and uploads them to the Qdrant vector database for
/// retrieval-augmented question answering.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of .txt documents to ingest
    #[arg(short, long, default_value = "data/example_docs")]
    docs_dir: PathBuf,

    /// Chunk size in characters
    #[arg(long, default_value = "500")]
    chunk_size: usize,

    /// Chunk overlap in characters
    #[arg(long, default_value = "50")]
    chunk_overlap: usize,

    /// Qdrant URL
    #[arg(short = 'q', long, default_value = "http://localhost:6333")]
    qdrant_url: String,

    /// Qdrant collection name
    #[arg(short = 'c', long, default_value = "financial_docs")]
    collection: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Parse log level from string
    fn parse_log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(args.parse_log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Financial Document Ingestion Tool");
    info!("=================================");
    info!("Configuration:");
    info!("  Documents: {}", args.docs_dir.display());
    info!("  Chunk size: {} chars (overlap {})", args.chunk_size, args.chunk_overlap);
    info!("  Qdrant URL: {}", args.qdrant_url);
    info!("  Collection: {}", args.collection);
    info!("");

    info!("Initializing embedding model...");
    let embedder = Arc::new(FastembedEmbedder::new()?);
    let dimensions = embedder.dimensions();

    info!("Connecting to vector store...");
    let store = QdrantVectorStore::new(&args.qdrant_url, args.collection.clone()).await?;
    store
        .create_collection_if_not_exists(dimensions as u64)
        .await?;

    let pipeline = DocumentIngestionPipeline::new(
        embedder,
        Arc::new(store),
        TextSplitter::new(args.chunk_size, args.chunk_overlap),
    );

    let stats = pipeline.ingest_directory(&args.docs_dir).await?;

    info!("");
    info!("Ingestion Complete!");
    info!("===================");
    info!(
        "  {} documents, {} chunks, {} embeddings, {} points uploaded",
        stats.documents_loaded,
        stats.chunks_created,
        stats.embeddings_generated,
        stats.points_uploaded
    );

    Ok(())
}
