//! End-to-end pipeline tests against deterministic in-memory collaborators.

use async_trait::async_trait;
use finrag_agents::llm::{Generation, LanguageModel};
use finrag_agents::rag::{RagEngine, RagEngineConfig};
use finrag_agents::{FinancialRagAgent, StockAgent};
use finrag_core::TradeAction;
use finrag_core::{
    DocumentChunk, EmbeddingError, GenerationError, PipelineError, RetrievedChunk,
    VectorStoreError,
};
use finrag_data_services::{EmbeddingProvider, VectorIndex};
use std::sync::Arc;
use std::sync::Mutex;

const DIMS: usize = 8;

/// Deterministic bag-of-bytes embedding over a fixed number of buckets.
fn vectorize(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIMS];
    for b in text.bytes() {
        v[(b as usize) % DIMS] += 1.0;
    }
    v
}

struct FakeEmbedder;

impl EmbeddingProvider for FakeEmbedder {
    fn model_name(&self) -> &str {
        "fake-bag-of-bytes"
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vectorize(text))
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| vectorize(t)).collect())
    }
}

/// Embedder that returns vectors of the wrong length.
struct WrongDimensionEmbedder;

impl EmbeddingProvider for WrongDimensionEmbedder {
    fn model_name(&self) -> &str {
        "wrong-dims"
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![0.5; DIMS + 1])
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| vec![0.5; DIMS + 1]).collect())
    }
}

/// Embedder that produces a NaN component.
struct NanEmbedder;

impl EmbeddingProvider for NanEmbedder {
    fn model_name(&self) -> &str {
        "nan"
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut v = vec![0.5; DIMS];
        v[0] = f32::NAN;
        Ok(v)
    }

    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        unimplemented!("not used in these tests")
    }
}

/// Exact cosine distance index over an in-memory list.
struct MemoryIndex {
    points: Mutex<Vec<(String, Vec<f32>)>>,
}

impl MemoryIndex {
    fn new() -> Self {
        Self {
            points: Mutex::new(Vec::new()),
        }
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    1.0 - dot / (na * nb)
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(
        &self,
        chunks: Vec<(DocumentChunk, Vec<f32>)>,
    ) -> Result<(), VectorStoreError> {
        let mut points = self.points.lock().unwrap();
        for (chunk, vector) in chunks {
            points.push((chunk.text, vector));
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: Vec<f32>,
        k: usize,
    ) -> Result<Vec<RetrievedChunk>, VectorStoreError> {
        let points = self.points.lock().unwrap();
        let mut hits: Vec<RetrievedChunk> = points
            .iter()
            .map(|(text, v)| RetrievedChunk {
                text: text.clone(),
                distance: cosine_distance(&vector, v),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
        hits.truncate(k);
        Ok(hits)
    }
}

/// Model that always answers the same text, optionally reporting usage.
struct ScriptedModel {
    answer: String,
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

impl ScriptedModel {
    fn answering(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            input_tokens: None,
            output_tokens: None,
        }
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _max_tokens: u32,
    ) -> Result<Generation, GenerationError> {
        Ok(Generation {
            text: self.answer.clone(),
            model: "scripted".to_string(),
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
        })
    }
}

struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    fn model_name(&self) -> &str {
        "failing"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _max_tokens: u32,
    ) -> Result<Generation, GenerationError> {
        Err(GenerationError::Backend("boom".to_string()))
    }
}

fn engine_with(
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn LanguageModel>,
) -> RagEngine {
    RagEngine::new(embedder, index, model, RagEngineConfig::default())
}

async fn seed(index: &MemoryIndex, texts: &[&str]) {
    let embedder = FakeEmbedder;
    let chunks: Vec<_> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let chunk = DocumentChunk::new(i as u64, *t);
            let vector = embedder.embed(t).unwrap();
            (chunk, vector)
        })
        .collect();
    index.upsert(chunks).await.unwrap();
}

#[tokio::test]
async fn test_single_chunk_end_to_end() {
    let index = Arc::new(MemoryIndex::new());
    seed(&index, &["AAPL closed at $150"]).await;

    let engine = engine_with(
        Arc::new(FakeEmbedder),
        index,
        Arc::new(ScriptedModel::answering("AAPL closed at $150.")),
    );

    let trace = engine
        .answer_debug("What did AAPL close at?", 1)
        .await
        .unwrap();

    assert_eq!(trace.num_docs_retrieved, 1);
    assert_eq!(trace.retrieved_documents, vec!["AAPL closed at $150"]);
    assert_eq!(trace.context, "AAPL closed at $150");
    assert_eq!(trace.answer, "AAPL closed at $150.");
    assert!(trace.prompt.starts_with("Context:\nAAPL closed at $150"));
    assert!(trace.prompt.ends_with("Question: What did AAPL close at?\nAnswer:"));
    assert_eq!(trace.embedding.model, "fake-bag-of-bytes");
    assert_eq!(trace.embedding.dimensions, DIMS);
}

#[tokio::test]
async fn test_retrieval_bounded_by_k_and_store_size() {
    let index = Arc::new(MemoryIndex::new());
    seed(&index, &["alpha doc", "beta doc", "gamma doc"]).await;

    let engine = engine_with(
        Arc::new(FakeEmbedder),
        index,
        Arc::new(ScriptedModel::answering("ok")),
    );

    let trace = engine.answer_debug("alpha", 2).await.unwrap();
    assert_eq!(trace.num_docs_retrieved, 2);

    // k larger than the store: all chunks, no padding
    let trace = engine.answer_debug("alpha", 10).await.unwrap();
    assert_eq!(trace.num_docs_retrieved, 3);
}

#[tokio::test]
async fn test_distances_ascending() {
    let index = Arc::new(MemoryIndex::new());
    seed(
        &index,
        &["aaaa aaaa aaaa", "zzzz zzzz", "aaab aaab", "mnop qrst"],
    )
    .await;

    let engine = engine_with(
        Arc::new(FakeEmbedder),
        index,
        Arc::new(ScriptedModel::answering("ok")),
    );

    let trace = engine.answer_debug("aaaa", 4).await.unwrap();
    let d = &trace.similarity_distances;
    assert_eq!(d.len(), 4);
    assert!(d.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_context_joined_with_blank_line() {
    let index = Arc::new(MemoryIndex::new());
    seed(&index, &["first chunk", "second chunk"]).await;

    let engine = engine_with(
        Arc::new(FakeEmbedder),
        index,
        Arc::new(ScriptedModel::answering("ok")),
    );

    let trace = engine.answer_debug("chunk", 2).await.unwrap();
    assert_eq!(
        trace.context,
        format!("{}\n\n{}", trace.retrieved_documents[0], trace.retrieved_documents[1])
    );
    assert_eq!(trace.context_length, trace.context.chars().count());
}

#[tokio::test]
async fn test_empty_store_yields_empty_context() {
    let index = Arc::new(MemoryIndex::new());

    let engine = engine_with(
        Arc::new(FakeEmbedder),
        index,
        Arc::new(ScriptedModel::answering("I don't know.")),
    );

    let trace = engine.answer_debug("anything", 3).await.unwrap();
    assert_eq!(trace.num_docs_retrieved, 0);
    assert_eq!(trace.context, "");
    assert!(trace.prompt.starts_with("Context:\n\n\nQuestion:"));
    // The model is still consulted with the empty context
    assert_eq!(trace.answer, "I don't know.");
}

#[tokio::test]
async fn test_empty_question_rejected() {
    let engine = engine_with(
        Arc::new(FakeEmbedder),
        Arc::new(MemoryIndex::new()),
        Arc::new(ScriptedModel::answering("ok")),
    );

    let err = engine.answer_debug("   ", 3).await.unwrap_err();
    assert!(matches!(err, PipelineError::EmptyQuestion));
}

#[tokio::test]
async fn test_zero_top_k_rejected() {
    let engine = engine_with(
        Arc::new(FakeEmbedder),
        Arc::new(MemoryIndex::new()),
        Arc::new(ScriptedModel::answering("ok")),
    );

    let err = engine.answer_debug("question", 0).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidTopK(0)));
}

#[tokio::test]
async fn test_generation_error_surfaced() {
    let index = Arc::new(MemoryIndex::new());
    seed(&index, &["some doc"]).await;

    let engine = engine_with(Arc::new(FakeEmbedder), index, Arc::new(FailingModel));

    let err = engine.answer_debug("question", 1).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Generation(GenerationError::Backend(_))
    ));
}

#[tokio::test]
async fn test_wrong_dimension_embedding_rejected() {
    let engine = engine_with(
        Arc::new(WrongDimensionEmbedder),
        Arc::new(MemoryIndex::new()),
        Arc::new(ScriptedModel::answering("ok")),
    );

    let err = engine.answer_debug("question", 1).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Embedding(EmbeddingError::WrongDimension { .. })
    ));
}

#[tokio::test]
async fn test_non_finite_embedding_rejected() {
    let engine = engine_with(
        Arc::new(NanEmbedder),
        Arc::new(MemoryIndex::new()),
        Arc::new(ScriptedModel::answering("ok")),
    );

    let err = engine.answer_debug("question", 1).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Embedding(EmbeddingError::NonFinite)
    ));
}

#[tokio::test]
async fn test_token_counts_approximated_by_whitespace() {
    let engine = engine_with(
        Arc::new(FakeEmbedder),
        Arc::new(MemoryIndex::new()),
        Arc::new(ScriptedModel::answering("one two three")),
    );

    let trace = engine.answer_debug("hello", 1).await.unwrap();
    assert_eq!(trace.tokens.output_tokens, 3);
    assert_eq!(
        trace.tokens.input_tokens,
        trace.prompt.split_whitespace().count() as u32
    );
    assert_eq!(
        trace.tokens.total_tokens,
        trace.tokens.input_tokens + trace.tokens.output_tokens
    );
}

#[tokio::test]
async fn test_model_reported_tokens_preferred() {
    let model = ScriptedModel {
        answer: "one two three".to_string(),
        input_tokens: Some(42),
        output_tokens: Some(7),
    };

    let engine = engine_with(
        Arc::new(FakeEmbedder),
        Arc::new(MemoryIndex::new()),
        Arc::new(model),
    );

    let trace = engine.answer_debug("hello", 1).await.unwrap();
    assert_eq!(trace.tokens.input_tokens, 42);
    assert_eq!(trace.tokens.output_tokens, 7);
    assert_eq!(trace.tokens.total_tokens, 49);
}

#[tokio::test]
async fn test_financial_agent_answers_through_engine() {
    let index = Arc::new(MemoryIndex::new());
    seed(&index, &["The P/E ratio divides price by earnings per share."]).await;

    let engine = Arc::new(engine_with(
        Arc::new(FakeEmbedder),
        index,
        Arc::new(ScriptedModel::answering("Price divided by earnings.")),
    ));

    let agent = FinancialRagAgent::new(Arc::clone(&engine));
    let answer = agent.answer("What is the P/E ratio?").await.unwrap();
    assert_eq!(answer, "Price divided by earnings.");

    let trace = agent.answer_debug("What is the P/E ratio?").await.unwrap();
    assert_eq!(trace.num_docs_retrieved, 1);
    assert!(!FinancialRagAgent::example_questions().is_empty());
}

#[tokio::test]
async fn test_stock_agent_decision_through_engine() {
    let engine = Arc::new(engine_with(
        Arc::new(FakeEmbedder),
        Arc::new(MemoryIndex::new()),
        Arc::new(ScriptedModel::answering(
            "{'action': 'buy', 'symbol': 'AAPL', 'amount': 10, 'reason': 'momentum'}",
        )),
    ));

    let agent = StockAgent::new(engine);
    let decision = agent
        .get_decision("Should I buy AAPL today?", "NASDAQ")
        .await
        .unwrap();

    assert_eq!(decision.action, TradeAction::Buy);
    assert_eq!(decision.symbol.as_deref(), Some("AAPL"));
    assert_eq!(decision.amount, Some(10.0));
}

#[tokio::test]
async fn test_answer_matches_debug_answer() {
    let index = Arc::new(MemoryIndex::new());
    seed(&index, &["AAPL closed at $150"]).await;

    let engine = engine_with(
        Arc::new(FakeEmbedder),
        index,
        Arc::new(ScriptedModel::answering("the answer")),
    );

    let answer = engine.answer("What did AAPL close at?", 1).await.unwrap();
    assert_eq!(answer, "the answer");
}
