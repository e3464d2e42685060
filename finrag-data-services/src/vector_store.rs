use async_trait::async_trait;
use finrag_core::{DocumentChunk, RetrievedChunk, VectorStoreError};
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use qdrant_client::Qdrant;

/// Persists (text, vector) pairs and returns nearest neighbors for a query
/// vector, ordered ascending by distance (best match first).
///
/// Querying an empty store yields an empty result, not an error.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace chunks together with their embeddings.
    async fn upsert(
        &self,
        chunks: Vec<(DocumentChunk, Vec<f32>)>,
    ) -> Result<(), VectorStoreError>;

    /// Return up to `k` nearest neighbors for the query vector.
    async fn query(
        &self,
        vector: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError>;
}

/// Qdrant vector store for document chunks
pub struct QdrantVectorStore {
    client: Qdrant,
    collection_name: String,
}

impl QdrantVectorStore {
    /// Initialize Qdrant client (embedded for dev, cloud for prod)
    pub async fn new(qdrant_url: &str, collection_name: String) -> Result<Self, VectorStoreError> {
        let client = Qdrant::from_url(qdrant_url)
            .build()
            .map_err(|e| VectorStoreError::Backend(e.to_string()))?;

        tracing::info!("Connecting to Qdrant at {}", qdrant_url);

        Ok(Self {
            client,
            collection_name,
        })
    }

    /// Create collection if it doesn't exist
    ///
    /// An existing collection is fine; an unreachable Qdrant is not, and
    /// surfaces here rather than on the first upsert.
    pub async fn create_collection_if_not_exists(
        &self,
        dimension: u64,
    ) -> Result<(), VectorStoreError> {
        let exists = self
            .client
            .collection_exists(&self.collection_name)
            .await
            .map_err(|e| VectorStoreError::Backend(e.to_string()))?;

        if exists {
            tracing::info!("Qdrant collection {} already exists", self.collection_name);
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection_name)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await
            .map_err(|e| VectorStoreError::Backend(e.to_string()))?;

        tracing::info!("Created Qdrant collection: {}", self.collection_name);
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorStore {
    async fn upsert(
        &self,
        chunks: Vec<(DocumentChunk, Vec<f32>)>,
    ) -> Result<(), VectorStoreError> {
        if chunks.is_empty() {
            return Ok(());
        }

        tracing::info!("Upserting {} chunks to Qdrant", chunks.len());

        let points: Vec<PointStruct> = chunks
            .into_iter()
            .map(|(chunk, vector)| chunk_to_point(&chunk, vector))
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection_name, points))
            .await
            .map_err(|e| VectorStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        let search_builder =
            SearchPointsBuilder::new(&self.collection_name, vector, k as u64).with_payload(true);

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| VectorStoreError::Backend(e.to_string()))?;

        // Qdrant scores cosine hits by similarity (higher is better); the
        // pipeline contract is cosine distance ascending.
        let chunks = search_result
            .result
            .into_iter()
            .map(|point| {
                let text = point
                    .payload
                    .get("text")
                    .and_then(|v| v.kind.as_ref())
                    .and_then(|kind| match kind {
                        qdrant_client::qdrant::value::Kind::StringValue(s) => Some(s.clone()),
                        _ => None,
                    })
                    .unwrap_or_default();

                RetrievedChunk {
                    text,
                    distance: 1.0 - point.score,
                }
            })
            .collect();

        Ok(chunks)
    }
}

/// Helper to create a Qdrant point from a chunk and its embedding
pub fn chunk_to_point(chunk: &DocumentChunk, embedding: Vec<f32>) -> PointStruct {
    let payload_json = serde_json::json!({
        "text": chunk.text,
        "chunk_id": chunk.id,
    });

    // Convert to Map for Qdrant Payload compatibility
    let payload = payload_json.as_object().unwrap().clone();

    PointStruct::new(chunk.id, embedding, payload)
}
