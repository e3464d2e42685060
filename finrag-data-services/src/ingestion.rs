use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::documents::{load_text_documents, TextSplitter};
use crate::embedding::EmbeddingProvider;
use crate::vector_store::VectorIndex;

/// Embeddings are generated and uploaded in batches of this size to keep
/// memory bounded on large document sets.
const BATCH_SIZE: usize = 100;

/// Counters reported after an ingestion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestStats {
    pub documents_loaded: usize,
    pub chunks_created: usize,
    pub embeddings_generated: usize,
    pub points_uploaded: usize,
}

/// Loads documents, splits them into chunks, embeds each chunk, and uploads
/// the (chunk, vector) pairs to the vector index.
pub struct DocumentIngestionPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    splitter: TextSplitter,
}

impl DocumentIngestionPipeline {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        splitter: TextSplitter,
    ) -> Self {
        Self {
            embedder,
            index,
            splitter,
        }
    }

    /// Ingest every `.txt` document under `dir`.
    pub async fn ingest_directory(&self, dir: &Path) -> Result<IngestStats> {
        let docs = load_text_documents(dir)
            .with_context(|| format!("failed to load documents from {}", dir.display()))?;
        tracing::info!("Loaded {} documents from {}", docs.len(), dir.display());

        let chunks = self.splitter.split_documents(&docs);
        tracing::info!("Split into {} chunks", chunks.len());

        let mut stats = IngestStats {
            documents_loaded: docs.len(),
            chunks_created: chunks.len(),
            ..Default::default()
        };

        for batch in chunks.chunks(BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = self
                .embedder
                .embed_batch(&texts)
                .context("failed to embed chunk batch")?;
            stats.embeddings_generated += embeddings.len();

            let points: Vec<_> = batch.iter().cloned().zip(embeddings).collect();
            let count = points.len();
            self.index
                .upsert(points)
                .await
                .context("failed to upsert chunk batch")?;
            stats.points_uploaded += count;

            tracing::debug!("Uploaded batch, {} points so far", stats.points_uploaded);
        }

        tracing::info!(
            "Ingestion complete: {} documents, {} chunks, {} points",
            stats.documents_loaded,
            stats.chunks_created,
            stats.points_uploaded
        );

        Ok(stats)
    }
}
