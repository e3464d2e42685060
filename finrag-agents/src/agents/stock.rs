use finrag_core::{
    DecisionParseError, OrderResult, OrderStatus, PipelineError, TradeAction, TradingDecision,
};
use std::sync::Arc;

use crate::rag::RagEngine;

/// Prompt-engineering agent that asks the retrieval pipeline for a trading
/// decision in JSON form, parses it, and can place a mock order.
pub struct StockAgent {
    engine: Arc<RagEngine>,
}

impl StockAgent {
    pub const NAME: &'static str = "Stock Agent";

    pub fn new(engine: Arc<RagEngine>) -> Self {
        Self { engine }
    }

    /// Build the decision prompt for a user query and market.
    pub fn craft_prompt(user_query: &str, market: &str) -> String {
        format!(
            "You are a stock trading agent. Your job is to analyze the following user query \
             and market context, and recommend a trading action in JSON format.\n\
             User Query: {}\n\
             Market: {}\n\
             Respond ONLY with a JSON object like: \
             {{'action': 'buy'/'sell'/'hold', 'symbol': 'AAPL', 'amount': 10, 'reason': '...'}}.\n\
             If you don't have enough information, respond with: \
             {{'action': 'hold', 'reason': 'Insufficient data'}}.",
            user_query, market
        )
    }

    /// Ask the pipeline for a decision and parse it.
    ///
    /// Pipeline failures are surfaced; a response that merely fails to
    /// parse becomes the `hold` fallback instead.
    pub async fn get_decision(
        &self,
        user_query: &str,
        market: &str,
    ) -> Result<TradingDecision, PipelineError> {
        let prompt = Self::craft_prompt(user_query, market);
        let response = self
            .engine
            .answer(&prompt, self.engine.config().top_k)
            .await?;
        Ok(Self::parse_decision(&response))
    }

    /// Parse a model response into a decision, falling back to `hold`
    /// when the response carries no usable JSON.
    pub fn parse_decision(response: &str) -> TradingDecision {
        match Self::try_parse_decision(response) {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!("Could not parse trading decision, defaulting to hold: {}", e);
                TradingDecision::hold_fallback(e, response)
            }
        }
    }

    fn try_parse_decision(response: &str) -> Result<TradingDecision, DecisionParseError> {
        let start = response.find('{').ok_or(DecisionParseError::NoJsonObject)?;
        let end = response.rfind('}').ok_or(DecisionParseError::NoJsonObject)?;
        if end < start {
            return Err(DecisionParseError::NoJsonObject);
        }

        // Models often emit single-quoted pseudo-JSON.
        let json_str = response[start..=end].replace('\'', "\"");
        let decision: TradingDecision = serde_json::from_str(&json_str)?;
        Ok(decision)
    }

    /// Mock order boundary. Acknowledges actionable decisions; never
    /// submits anything anywhere.
    pub fn place_order(decision: &TradingDecision) -> OrderResult {
        let actionable = matches!(decision.action, TradeAction::Buy | TradeAction::Sell);

        match (actionable, &decision.symbol, decision.amount) {
            (true, Some(symbol), Some(amount)) => OrderResult {
                status: OrderStatus::Success,
                order: decision.clone(),
                message: format!(
                    "Order placed: {} {} shares of {}",
                    decision.action, amount, symbol
                ),
            },
            _ => OrderResult {
                status: OrderStatus::NoAction,
                order: decision.clone(),
                message: decision
                    .reason
                    .clone()
                    .unwrap_or_else(|| "No valid action taken.".to_string()),
            },
        }
    }
}
