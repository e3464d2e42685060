use finrag_core::{DebugTrace, PipelineError};
use std::sync::Arc;

use crate::rag::RagEngine;

/// Question-answering agent over the ingested financial documents.
///
/// A thin persona wrapper: all retrieval and generation behavior lives in
/// the engine.
pub struct FinancialRagAgent {
    engine: Arc<RagEngine>,
}

impl FinancialRagAgent {
    pub const NAME: &'static str = "Financial RAG Agent";

    pub const DESCRIPTION: &'static str = "An AI agent that can answer questions about S&P 500 \
        stocks, financial concepts, and investment strategies using a Retrieval-Augmented \
        Generation (RAG) system. It combines up-to-date market data, financial definitions, \
        and LLM reasoning.";

    pub fn new(engine: Arc<RagEngine>) -> Self {
        Self { engine }
    }

    pub fn example_questions() -> Vec<&'static str> {
        vec![
            "What is the P/E ratio?",
            "How did AAPL perform in June 2024?",
            "Explain the difference between value and growth investing.",
            "What is a stop-loss order?",
            "What does it mean if a stock is overbought according to RSI?",
            "Summarize the recent performance of MSFT.",
        ]
    }

    /// Answer a question, returning only the generated text.
    pub async fn answer(&self, question: &str) -> Result<String, PipelineError> {
        self.engine.answer(question, self.engine.config().top_k).await
    }

    /// Answer a question with the full pipeline trace.
    pub async fn answer_debug(&self, question: &str) -> Result<DebugTrace, PipelineError> {
        self.engine
            .answer_debug(question, self.engine.config().top_k)
            .await
    }
}
