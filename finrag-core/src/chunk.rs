use serde::{Deserialize, Serialize};

/// A bounded span of source text stored as one retrievable unit.
///
/// Chunks are immutable once created. The ordinal id is assigned by the
/// splitter at ingestion time and doubles as the vector store point id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: u64,
    pub text: String,
}

impl DocumentChunk {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// One nearest-neighbor hit: the chunk text plus its distance to the query.
///
/// Distances are cosine distances, so lower is a better match. A retrieval
/// result is a `Vec<RetrievedChunk>` ordered ascending by distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_creation() {
        let chunk = DocumentChunk::new(7, "AAPL closed at $150");
        assert_eq!(chunk.id, 7);
        assert_eq!(chunk.text, "AAPL closed at $150");
    }
}
