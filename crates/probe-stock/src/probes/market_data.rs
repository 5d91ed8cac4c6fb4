//! Market-data probe: metadata, latest price, one-year history and valuation per symbol

use crate::api::{CompanyProfile, MarketDataSource, Valuation};
use crate::series::{Bar, missing_columns};
use async_trait::async_trait;
use probe_core::{CheckOutcome, Probe, ProbeReport};
use std::sync::Arc;
use tracing::{info, warn};

const HISTORY_DAYS: i64 = 365;

/// Probe for the market-data provider
pub struct MarketDataProbe {
    source: Arc<dyn MarketDataSource>,
    symbols: Vec<String>,
}

impl MarketDataProbe {
    pub fn new(source: Arc<dyn MarketDataSource>, symbols: Vec<String>) -> Self {
        Self { source, symbols }
    }

    async fn check_symbol(&self, symbol: &str) -> Vec<CheckOutcome> {
        info!(symbol, "Probing market data");

        let profile = match self.source.profile(symbol).await {
            Ok(profile) => classify_profile(&profile),
            Err(e) => CheckOutcome::failure("profile", e.to_string()),
        };

        let price = match self.source.recent_bars(symbol).await {
            Ok(bars) => classify_latest_price(&bars),
            Err(e) => CheckOutcome::failure("latest price", e.to_string()),
        };

        let history = match self.source.daily_history(symbol, HISTORY_DAYS).await {
            Ok(bars) => classify_history(&bars),
            Err(e) => CheckOutcome::failure("history", e.to_string()),
        };

        let valuation = match self.source.valuation(symbol).await {
            Ok(valuation) => classify_valuation(&valuation),
            Err(e) => CheckOutcome::failure("valuation", e.to_string()),
        };

        [profile, price, history, valuation]
            .into_iter()
            .map(|outcome| {
                if outcome.is_failure() {
                    warn!(symbol, check = %outcome.check, "{}", outcome.detail);
                }
                outcome.for_target(symbol)
            })
            .collect()
    }
}

#[async_trait]
impl Probe for MarketDataProbe {
    fn name(&self) -> &str {
        "market_data"
    }

    fn title(&self) -> &str {
        "Market Data (Yahoo Finance)"
    }

    async fn run(&self) -> ProbeReport {
        let mut report = ProbeReport::builder(self.name(), self.title());
        for symbol in &self.symbols {
            for outcome in self.check_symbol(symbol).await {
                report.record(outcome);
            }
        }
        report.finish()
    }
}

fn classify_profile(profile: &CompanyProfile) -> CheckOutcome {
    match profile.display_name() {
        Some(name) => CheckOutcome::success(
            "profile",
            format!(
                "{name} (sector: {})",
                profile.sector.as_deref().unwrap_or("N/A")
            ),
        ),
        None => CheckOutcome::warning("profile", "provider returned no company name"),
    }
}

fn classify_latest_price(bars: &[Bar]) -> CheckOutcome {
    match bars.last() {
        Some(bar) => CheckOutcome::success(
            "latest price",
            format!("₹{:.2} ({})", bar.close, bar.timestamp.format("%Y-%m-%d")),
        ),
        None => CheckOutcome::warning("latest price", "no recent price data"),
    }
}

fn classify_history(bars: &[Bar]) -> CheckOutcome {
    if bars.is_empty() {
        return CheckOutcome::warning("history", "no historical data returned");
    }

    let missing = missing_columns(bars);
    if missing.is_empty() {
        CheckOutcome::success(
            "history",
            format!("{} days with Open, High, Low, Close", bars.len()),
        )
    } else {
        let names: Vec<&str> = missing.iter().map(|c| c.name()).collect();
        CheckOutcome::warning(
            "history",
            format!("{} days but missing columns: {}", bars.len(), names.join(", ")),
        )
    }
}

fn classify_valuation(valuation: &Valuation) -> CheckOutcome {
    if valuation.is_empty() {
        return CheckOutcome::warning("valuation", "P/E, P/B and ROE all unavailable");
    }

    let fmt = |value: Option<f64>| value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"));
    let roe = valuation
        .return_on_equity
        .map_or_else(|| "N/A".to_string(), |v| format!("{:.2}%", v * 100.0));

    CheckOutcome::success(
        "valuation",
        format!(
            "P/E {}, P/B {}, ROE {roe}",
            fmt(valuation.trailing_pe),
            fmt(valuation.price_to_book)
        ),
    )
}
