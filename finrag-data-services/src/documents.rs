use anyhow::{Context, Result};
use finrag_core::DocumentChunk;
use std::fs;
use std::path::Path;

/// Load all `.txt` documents from a directory.
///
/// Files are read in filename order so chunk ids stay stable across runs.
pub fn load_text_documents(dir: &Path) -> Result<Vec<String>> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("failed to read document directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "txt"))
        .collect();
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        docs.push(text);
    }

    tracing::debug!("Loaded {} text documents from {}", docs.len(), dir.display());
    Ok(docs)
}

/// Character-window text splitter with overlap.
///
/// Produces chunks of at most `chunk_size` characters, each overlapping the
/// previous by `chunk_overlap` characters. Windows advance by whole chars,
/// never through the middle of a multi-byte codepoint.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split one document into chunk texts.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        // An overlap >= chunk_size would never advance; step at least one.
        let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }

    /// Split a set of documents, assigning ordinal chunk ids across the
    /// whole set.
    pub fn split_documents(&self, docs: &[String]) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();
        let mut id = 0u64;
        for doc in docs {
            for piece in self.split(doc) {
                chunks.push(DocumentChunk::new(id, piece));
                id += 1;
            }
        }
        chunks
    }
}
