use serde::{Deserialize, Serialize};
use std::fmt;

/// Trading action parsed from a model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
            TradeAction::Hold => write!(f, "hold"),
        }
    }
}

/// Structured decision parsed from a model's free-text response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingDecision {
    pub action: TradeAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Original model output, kept when parsing fell back to `hold`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl TradingDecision {
    /// The conservative fallback for unparseable model output.
    pub fn hold_fallback(cause: impl fmt::Display, raw_response: impl Into<String>) -> Self {
        Self {
            action: TradeAction::Hold,
            symbol: None,
            amount: None,
            reason: Some(format!("Failed to parse decision: {}", cause)),
            raw_response: Some(raw_response.into()),
        }
    }
}

/// Outcome of the mock order boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Success,
    NoAction,
}

/// Acknowledgment record from the mock order boundary. No real order is
/// ever submitted.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
    pub status: OrderStatus,
    pub order: TradingDecision,
    pub message: String,
}
