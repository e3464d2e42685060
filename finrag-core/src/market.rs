use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a per-symbol daily price series. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Best-performing symbol over a lookback window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerPick {
    pub symbol: String,
    pub return_pct: f64,
    pub start_price: f64,
    pub end_price: f64,
}

/// Result of the broker momentum scan. A market without enough history is
/// an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BrokerRecommendation {
    Pick(BrokerPick),
    NotFound { reason: String },
}

/// Coverage summary for one market's data directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInfo {
    pub market: String,
    pub num_symbols: usize,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}
