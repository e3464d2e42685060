use chrono::{Duration, NaiveDate, Utc};
use finrag_core::{BrokerPick, BrokerRecommendation};
use finrag_data_services::MarketDataStore;
use std::sync::Arc;

/// Configuration for the broker momentum scan
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    /// Window length in days; a return needs at least two daily bars, so
    /// anything below 2 is clamped up at construction.
    pub lookback_days: i64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self { lookback_days: 30 }
    }
}

/// Recommends the best-performing symbol in a market over a lookback
/// window, by simple close-to-close return.
pub struct BrokerAgent {
    store: Arc<MarketDataStore>,
    config: BrokerConfig,
}

impl BrokerAgent {
    pub const NAME: &'static str = "Broker Agent";

    pub const DESCRIPTION: &'static str = "An AI broker agent that analyzes market data and \
        recommends the best investment opportunities based on recent performance. It can answer \
        questions about which symbols to buy based on price momentum.";

    pub fn new(store: Arc<MarketDataStore>, mut config: BrokerConfig) -> Self {
        if config.lookback_days < 2 {
            tracing::warn!(
                "lookback_days {} is too short for a return, clamping to 2",
                config.lookback_days
            );
            config.lookback_days = 2;
        }
        Self { store, config }
    }

    /// Scan a market as of today.
    pub fn best_symbol(&self, market: &str) -> BrokerRecommendation {
        self.best_symbol_as_of(market, Utc::now().date_naive())
    }

    /// Scan a market as of a fixed date.
    ///
    /// Symbols are visited in sorted order, and only a strictly greater
    /// return replaces the current best, so ties go to the
    /// lexicographically first symbol.
    pub fn best_symbol_as_of(&self, market: &str, as_of: NaiveDate) -> BrokerRecommendation {
        if !self.store.has_market(market) {
            return BrokerRecommendation::NotFound {
                reason: format!("No data available for {}.", market),
            };
        }

        let symbols = match self.store.symbols(market) {
            Ok(symbols) => symbols,
            Err(e) => {
                tracing::warn!("Failed to list symbols for {}: {}", market, e);
                return BrokerRecommendation::NotFound {
                    reason: format!("No data available for {}.", market),
                };
            }
        };

        let window_start = as_of - Duration::days(self.config.lookback_days);
        let mut best: Option<BrokerPick> = None;

        for symbol in symbols {
            let bars = match self.store.load_bars(market, &symbol) {
                Ok(bars) => bars,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", symbol, e);
                    continue;
                }
            };

            let recent: Vec<_> = bars.iter().filter(|b| b.date >= window_start).collect();
            // A return needs at least two observations.
            if recent.len() < 2 {
                continue;
            }

            let start_price = recent.first().map(|b| b.close).unwrap_or_default();
            let end_price = recent.last().map(|b| b.close).unwrap_or_default();
            if start_price == 0.0 {
                continue;
            }

            let return_pct = (end_price - start_price) / start_price * 100.0;

            if best.as_ref().map_or(true, |b| return_pct > b.return_pct) {
                best = Some(BrokerPick {
                    symbol,
                    return_pct,
                    start_price,
                    end_price,
                });
            }
        }

        match best {
            Some(pick) => BrokerRecommendation::Pick(pick),
            None => BrokerRecommendation::NotFound {
                reason: format!(
                    "Could not determine the best symbol for {} due to insufficient data.",
                    market
                ),
            },
        }
    }

    /// Render a recommendation as the agent's answer sentence.
    pub fn describe(&self, market: &str, recommendation: &BrokerRecommendation) -> String {
        match recommendation {
            BrokerRecommendation::Pick(pick) => format!(
                "Based on the last {} days of {} data, the best symbol to invest in is {} \
                 with a return of {:.2}% (from ${:.2} to ${:.2}). This is based on recent \
                 price performance.",
                self.config.lookback_days,
                market,
                pick.symbol,
                pick.return_pct,
                pick.start_price,
                pick.end_price
            ),
            BrokerRecommendation::NotFound { reason } => reason.clone(),
        }
    }

    /// Scan and describe in one step.
    pub fn answer(&self, market: &str) -> String {
        let recommendation = self.best_symbol(market);
        self.describe(market, &recommendation)
    }
}
