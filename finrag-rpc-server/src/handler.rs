use finrag_agents::{BrokerAgent, RagEngine};
use finrag_core::DebugTrace;
use finrag_data_services::MarketDataStore;
use std::sync::Arc;
use std::time::Instant;

use crate::error::RpcError;
use crate::protocol::*;

/// Routes parsed method parameters to the agents.
pub struct QaHandler {
    engine: Arc<RagEngine>,
    broker: BrokerAgent,
    store: Arc<MarketDataStore>,
}

impl QaHandler {
    pub fn new(engine: Arc<RagEngine>, broker: BrokerAgent, store: Arc<MarketDataStore>) -> Self {
        Self {
            engine,
            broker,
            store,
        }
    }

    /// Handle a qa.answer request
    pub async fn handle_answer(&self, params: QaRequest) -> Result<QaAnswer, RpcError> {
        let start = Instant::now();

        let answer = self.engine.answer(&params.question, params.top_k).await?;

        tracing::info!(
            "QA query completed: top_k={}, duration={}ms",
            params.top_k,
            start.elapsed().as_millis()
        );

        Ok(QaAnswer { answer })
    }

    /// Handle a qa.answer_debug request
    pub async fn handle_answer_debug(&self, params: QaRequest) -> Result<DebugTrace, RpcError> {
        let trace = self
            .engine
            .answer_debug(&params.question, params.top_k)
            .await?;

        tracing::info!(
            "QA debug query completed: docs={}, total={}ms",
            trace.num_docs_retrieved,
            trace.timing.total_ms
        );

        Ok(trace)
    }

    /// Handle a broker.best_symbol request
    pub fn handle_best_symbol(&self, params: BrokerRequest) -> Result<BrokerAnswer, RpcError> {
        if !self.store.has_market(&params.market) {
            return Err(RpcError::NoMarketData(params.market));
        }

        let recommendation = self.broker.best_symbol(&params.market);
        let answer = self.broker.describe(&params.market, &recommendation);

        tracing::info!("Broker scan completed for {}", params.market);

        Ok(BrokerAnswer {
            agent: BrokerAgent::NAME.to_string(),
            answer,
            recommendation,
        })
    }

    /// Handle a market.data_info request
    pub fn handle_data_info(&self) -> DataInfoResponse {
        DataInfoResponse {
            markets: self.store.market_info(),
        }
    }
}
