mod config;
mod error;
mod handler;
mod protocol;
mod server;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServerConfig;
use server::RpcServer;

#[derive(Parser)]
#[command(name = "finrag-rpc-server")]
#[command(about = "JSON-RPC server for financial QA and broker recommendations")]
struct Cli {
    /// Server host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port to bind to
    #[arg(long, default_value = "7880")]
    port: u16,

    /// Qdrant vector database URL
    #[arg(long, default_value = "http://localhost:6333")]
    qdrant_url: String,

    /// Qdrant collection name
    #[arg(long, default_value = "financial_docs")]
    collection_name: String,

    /// Base directory of market data CSVs
    #[arg(long, default_value = "data")]
    data_dir: String,

    /// OpenAI chat model
    #[arg(long, default_value = "gpt-4-turbo")]
    openai_model: String,

    /// Number of chunks retrieved per question
    #[arg(long, default_value = "3")]
    top_k: usize,

    /// Maximum tokens per generated answer
    #[arg(long, default_value = "200")]
    max_tokens: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "finrag_rpc_server={},finrag_agents={},finrag_data_services={}",
                cli.log_level, cli.log_level, cli.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Financial QA JSON-RPC Server Starting");
    tracing::info!("Configuration:");
    tracing::info!("  Host: {}", cli.host);
    tracing::info!("  Port: {}", cli.port);
    tracing::info!("  Qdrant URL: {}", cli.qdrant_url);
    tracing::info!("  Collection: {}", cli.collection_name);
    tracing::info!("  Data dir: {}", cli.data_dir);
    tracing::info!("  Model: {}", cli.openai_model);
    tracing::info!("  Top K: {}", cli.top_k);

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        qdrant_url: cli.qdrant_url,
        collection_name: cli.collection_name,
        data_dir: cli.data_dir,
        openai_model: cli.openai_model,
        top_k: cli.top_k,
        max_tokens: cli.max_tokens,
    };

    let server = RpcServer::new(config).await?;
    server.run().await?;

    Ok(())
}
