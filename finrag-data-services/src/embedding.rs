use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use finrag_core::EmbeddingError;

/// Turns text into fixed-length numeric vectors.
///
/// Implementations own any global model handle and must be safe to share
/// across requests; the pipeline holds them behind an `Arc` and imposes no
/// locking of its own.
pub trait EmbeddingProvider: Send + Sync {
    /// Identifier of the underlying embedding model.
    fn model_name(&self) -> &str;

    /// Fixed output dimensionality of this model instance.
    fn dimensions(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed a batch of texts, preserving input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Local embedding provider backed by fastembed ONNX models.
pub struct FastembedEmbedder {
    model: TextEmbedding,
    model_name: String,
    dimensions: usize,
}

impl FastembedEmbedder {
    /// Load the default all-MiniLM-L6-v2 model (384 dimensions).
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::with_model(EmbeddingModel::AllMiniLML6V2, "all-MiniLM-L6-v2", 384)
    }

    fn with_model(
        model: EmbeddingModel,
        name: &str,
        dimensions: usize,
    ) -> Result<Self, EmbeddingError> {
        tracing::info!("Loading embedding model ({})...", name);

        let model = TextEmbedding::try_new(
            InitOptions::new(model).with_show_download_progress(true),
        )
        .map_err(|e| EmbeddingError::Backend(e.to_string()))?;

        tracing::info!("Embedding model loaded successfully");

        Ok(Self {
            model,
            model_name: name.to_string(),
            dimensions,
        })
    }
}

impl EmbeddingProvider for FastembedEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.model
            .embed(vec![text.to_string()], None)
            .map_err(|e| EmbeddingError::Backend(e.to_string()))?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::Empty)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Backend(e.to_string()))
    }
}
