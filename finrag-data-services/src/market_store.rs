use anyhow::{Context, Result};
use chrono::NaiveDate;
use finrag_core::{MarketBar, MarketInfo};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Display name -> data subdirectory, as laid out on disk.
const MARKET_DIRS: &[(&str, &str)] = &[
    ("S&P 500", "SP500_data"),
    ("NASDAQ", "NASDAQ_data"),
    ("S&P 600", "SP600_data"),
    ("Dow Jones", "DOWJONES_data"),
    ("NYSE", "NYSE_data"),
    ("Crypto", "CRYPTO_data"),
];

/// Raw CSV row; every field optional so one bad cell drops one row, not
/// the whole file.
#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Open")]
    open: Option<f64>,
    #[serde(rename = "High")]
    high: Option<f64>,
    #[serde(rename = "Low")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: Option<f64>,
}

/// Read-only access to per-symbol CSV price histories, keyed by market.
///
/// Layout: `<base_dir>/<market subdir>/<SYMBOL>.csv`, one daily bar per
/// row with `Date,Open,High,Low,Close,Volume` columns.
pub struct MarketDataStore {
    base_dir: PathBuf,
}

impl MarketDataStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Known market names, in declaration order.
    pub fn market_names() -> Vec<&'static str> {
        MARKET_DIRS.iter().map(|(name, _)| *name).collect()
    }

    /// Directory holding a market's CSVs, if the market name is known.
    fn market_dir(&self, market: &str) -> Option<PathBuf> {
        MARKET_DIRS
            .iter()
            .find(|(name, _)| *name == market)
            .map(|(_, subdir)| self.base_dir.join(subdir))
    }

    /// Whether any data directory exists for the named market.
    pub fn has_market(&self, market: &str) -> bool {
        self.market_dir(market).map_or(false, |dir| dir.is_dir())
    }

    /// Symbols available for a market, sorted lexicographically.
    ///
    /// Directory iteration order is filesystem-dependent; sorting makes
    /// the broker's first-wins tie-break deterministic.
    pub fn symbols(&self, market: &str) -> Result<Vec<String>> {
        let dir = self
            .market_dir(market)
            .with_context(|| format!("unknown market: {}", market))?;

        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read market directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }

    /// Load one symbol's bars, sorted ascending by date.
    ///
    /// Rows with an unparseable date or a missing close are dropped rather
    /// than treated as zero-return.
    pub fn load_bars(&self, market: &str, symbol: &str) -> Result<Vec<MarketBar>> {
        let dir = self
            .market_dir(market)
            .with_context(|| format!("unknown market: {}", market))?;
        let path = dir.join(format!("{}.csv", symbol));

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let mut bars = Vec::new();
        for record in reader.deserialize::<RawBar>() {
            let raw = match record {
                Ok(raw) => raw,
                Err(_) => continue, // malformed row
            };
            let (Some(date_str), Some(close)) = (raw.date, raw.close) else {
                continue;
            };
            let Ok(date) = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") else {
                continue;
            };

            bars.push(MarketBar {
                date,
                open: raw.open.unwrap_or_default(),
                high: raw.high.unwrap_or_default(),
                low: raw.low.unwrap_or_default(),
                close,
                volume: raw.volume.unwrap_or_default(),
            });
        }

        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }

    /// Coverage summary for every market with a data directory.
    pub fn market_info(&self) -> Vec<MarketInfo> {
        let mut infos = Vec::new();

        for (market, _) in MARKET_DIRS {
            if !self.has_market(market) {
                continue;
            }
            let symbols = match self.symbols(market) {
                Ok(symbols) => symbols,
                Err(e) => {
                    tracing::warn!("Failed to list symbols for {}: {}", market, e);
                    continue;
                }
            };

            let mut min_date: Option<NaiveDate> = None;
            let mut max_date: Option<NaiveDate> = None;
            for symbol in &symbols {
                let bars = match self.load_bars(market, symbol) {
                    Ok(bars) => bars,
                    Err(_) => continue,
                };
                if let Some(first) = bars.first() {
                    min_date = Some(min_date.map_or(first.date, |d| d.min(first.date)));
                }
                if let Some(last) = bars.last() {
                    max_date = Some(max_date.map_or(last.date, |d| d.max(last.date)));
                }
            }

            infos.push(MarketInfo {
                market: market.to_string(),
                num_symbols: symbols.len(),
                min_date,
                max_date,
            });
        }

        infos
    }

    /// Base directory holding the per-market subdirectories.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}
