//! Yahoo Finance market-data client

use crate::error::{ProbeError, Result, with_timeout};
use crate::series::Bar;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::OnceCell;
use yahoo_finance_api as yahoo;

const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const COOKIE_URL: &str = "https://fc.yahoo.com";

pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Descriptive company metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub exchange: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
}

impl CompanyProfile {
    /// Long name, falling back to the short name
    pub fn display_name(&self) -> Option<&str> {
        self.long_name.as_deref().or(self.short_name.as_deref())
    }
}

/// Valuation and profitability fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub return_on_equity: Option<f64>,
}

impl Valuation {
    pub fn is_empty(&self) -> bool {
        self.trailing_pe.is_none() && self.price_to_book.is_none() && self.return_on_equity.is_none()
    }
}

/// Source of market data for the market-data probe
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Descriptive metadata for a symbol
    async fn profile(&self, symbol: &str) -> Result<CompanyProfile>;

    /// Daily bars over the last few sessions
    async fn recent_bars(&self, symbol: &str) -> Result<Vec<Bar>>;

    /// Daily bars covering the last `days` calendar days
    async fn daily_history(&self, symbol: &str, days: i64) -> Result<Vec<Bar>>;

    /// P/E, P/B and return on equity
    async fn valuation(&self, symbol: &str) -> Result<Valuation>;
}

/// Yahoo Finance API client
///
/// Price series come from `yahoo_finance_api`; metadata and valuation
/// fields come from the quote-summary endpoint, which needs a session
/// cookie and crumb.
pub struct YahooMarketData {
    client: Client,
    timeout: Duration,
    crumb: OnceCell<String>,
}

impl YahooMarketData {
    /// Create a new Yahoo Finance client
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            timeout,
            crumb: OnceCell::new(),
        })
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| ProbeError::MarketData(e.to_string()))
    }

    async fn crumb(&self) -> Result<&str> {
        let crumb = self
            .crumb
            .get_or_try_init(|| async {
                // Only sets the session cookie; the status is usually 404.
                if let Err(e) = self.client.get(COOKIE_URL).send().await {
                    tracing::debug!("Cookie request failed: {e}");
                }

                let crumb = self
                    .client
                    .get(CRUMB_URL)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                let crumb = crumb.trim();

                if crumb.is_empty() || crumb.contains('<') {
                    return Err(ProbeError::MarketData(
                        "Yahoo did not issue a crumb".to_string(),
                    ));
                }

                Ok::<_, ProbeError>(crumb.to_string())
            })
            .await?;

        Ok(crumb.as_str())
    }

    async fn quote_summary(&self, symbol: &str, modules: &str) -> Result<SummaryModules> {
        let crumb = self.crumb().await?;
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");

        tracing::debug!(symbol, modules, "Requesting quote summary");

        let response = self
            .client
            .get(&url)
            .query(&[("modules", modules), ("crumb", crumb)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProbeError::MarketData(format!(
                "quote summary returned {status}: {}",
                crate::probes::truncate_chars(&body, 100)
            )));
        }

        let envelope: QuoteSummaryEnvelope = response.json().await?;
        envelope.into_modules(symbol)
    }
}

fn to_bar(quote: &yahoo::Quote) -> Bar {
    Bar {
        timestamp: DateTime::from_timestamp(quote.timestamp as i64, 0).unwrap_or_else(Utc::now),
        open: quote.open,
        high: quote.high,
        low: quote.low,
        close: quote.close,
        volume: quote.volume,
    }
}

#[async_trait]
impl MarketDataSource for YahooMarketData {
    async fn profile(&self, symbol: &str) -> Result<CompanyProfile> {
        with_timeout("company profile", self.timeout, async {
            let modules = self.quote_summary(symbol, "price,assetProfile").await?;
            Ok(modules.profile(symbol))
        })
        .await
    }

    async fn recent_bars(&self, symbol: &str) -> Result<Vec<Bar>> {
        let provider = Self::connector()?;

        with_timeout("latest price", self.timeout, async {
            let response = provider
                .get_quote_range(symbol, "1d", "5d")
                .await
                .map_err(|e| ProbeError::MarketData(e.to_string()))?;

            let quotes = response
                .quotes()
                .map_err(|e| ProbeError::MarketData(e.to_string()))?;

            Ok(quotes.iter().map(to_bar).collect())
        })
        .await
    }

    async fn daily_history(&self, symbol: &str, days: i64) -> Result<Vec<Bar>> {
        let provider = Self::connector()?;

        let end = Utc::now();
        let start = end - chrono::Duration::days(days);

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| ProbeError::MarketData(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ProbeError::MarketData(format!("Invalid end timestamp: {e}")))?;

        with_timeout("price history", self.timeout, async {
            let response = provider
                .get_quote_history(symbol, start_odt, end_odt)
                .await
                .map_err(|e| ProbeError::MarketData(e.to_string()))?;

            let quotes = response
                .quotes()
                .map_err(|e| ProbeError::MarketData(e.to_string()))?;

            Ok(quotes.iter().map(to_bar).collect())
        })
        .await
    }

    async fn valuation(&self, symbol: &str) -> Result<Valuation> {
        with_timeout("valuation fields", self.timeout, async {
            let modules = self
                .quote_summary(symbol, "summaryDetail,defaultKeyStatistics,financialData")
                .await?;
            Ok(modules.valuation())
        })
        .await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryEnvelope {
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<SummaryModules>>,
    error: Option<SummaryApiError>,
}

#[derive(Debug, Deserialize)]
struct SummaryApiError {
    code: Option<String>,
    description: Option<String>,
}

impl QuoteSummaryEnvelope {
    fn into_modules(self, symbol: &str) -> Result<SummaryModules> {
        if let Some(error) = self.quote_summary.error {
            return Err(ProbeError::MarketData(format!(
                "{}: {}",
                error.code.unwrap_or_else(|| "error".to_string()),
                error.description.unwrap_or_default()
            )));
        }

        self.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ProbeError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "empty quote summary".to_string(),
            })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    price: Option<PriceModule>,
    asset_profile: Option<AssetProfileModule>,
    summary_detail: Option<SummaryDetailModule>,
    default_key_statistics: Option<KeyStatisticsModule>,
    financial_data: Option<FinancialDataModule>,
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`, or `{}` when absent
#[derive(Debug, Default, Deserialize)]
struct RawNumber {
    raw: Option<f64>,
}

fn raw(value: Option<&RawNumber>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    exchange_name: Option<String>,
    currency: Option<String>,
    market_cap: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfileModule {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatisticsModule {
    price_to_book: Option<RawNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialDataModule {
    return_on_equity: Option<RawNumber>,
}

impl SummaryModules {
    fn profile(self, symbol: &str) -> CompanyProfile {
        let price = self.price.unwrap_or_default();
        let asset = self.asset_profile.unwrap_or_default();

        CompanyProfile {
            symbol: symbol.to_string(),
            long_name: price.long_name,
            short_name: price.short_name,
            sector: asset.sector,
            industry: asset.industry,
            exchange: price.exchange_name,
            currency: price.currency,
            market_cap: raw(price.market_cap.as_ref()),
        }
    }

    fn valuation(&self) -> Valuation {
        Valuation {
            trailing_pe: raw(
                self.summary_detail
                    .as_ref()
                    .and_then(|m| m.trailing_pe.as_ref()),
            ),
            price_to_book: raw(
                self.default_key_statistics
                    .as_ref()
                    .and_then(|m| m.price_to_book.as_ref()),
            ),
            return_on_equity: raw(
                self.financial_data
                    .as_ref()
                    .and_then(|m| m.return_on_equity.as_ref()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": {
                    "longName": "Reliance Industries Limited",
                    "shortName": "RELIANCE INDS",
                    "exchangeName": "NSE",
                    "currency": "INR",
                    "marketCap": {"raw": 19000000000000.0, "fmt": "19T"}
                },
                "assetProfile": {"sector": "Energy", "industry": "Oil & Gas Refining & Marketing"},
                "summaryDetail": {"trailingPE": {"raw": 24.5, "fmt": "24.50"}},
                "defaultKeyStatistics": {"priceToBook": {}},
                "financialData": {"returnOnEquity": {"raw": 0.089, "fmt": "8.90%"}}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_profile() {
        let envelope: QuoteSummaryEnvelope = serde_json::from_str(SUMMARY).unwrap();
        let profile = envelope.into_modules("RELIANCE.NS").unwrap().profile("RELIANCE.NS");

        assert_eq!(profile.display_name(), Some("Reliance Industries Limited"));
        assert_eq!(profile.sector.as_deref(), Some("Energy"));
        assert_eq!(profile.exchange.as_deref(), Some("NSE"));
        assert_eq!(profile.market_cap, Some(19_000_000_000_000.0));
    }

    #[test]
    fn test_parse_valuation_with_empty_field() {
        let envelope: QuoteSummaryEnvelope = serde_json::from_str(SUMMARY).unwrap();
        let valuation = envelope.into_modules("RELIANCE.NS").unwrap().valuation();

        assert_eq!(valuation.trailing_pe, Some(24.5));
        assert_eq!(valuation.price_to_book, None);
        assert_eq!(valuation.return_on_equity, Some(0.089));
        assert!(!valuation.is_empty());
    }

    #[test]
    fn test_summary_error() {
        let json = r#"{"quoteSummary": {"result": null, "error": {"code": "Not Found", "description": "Quote not found for symbol: NOPE.NS"}}}"#;
        let envelope: QuoteSummaryEnvelope = serde_json::from_str(json).unwrap();

        match envelope.into_modules("NOPE.NS") {
            Err(ProbeError::MarketData(msg)) => assert!(msg.contains("Quote not found")),
            other => panic!("expected market data error, got {other:?}"),
        }
    }

    #[test]
    fn test_display_name_falls_back_to_short_name() {
        let profile = CompanyProfile {
            short_name: Some("TCS".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), Some("TCS"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_recent_bars() {
        let client = YahooMarketData::new(Duration::from_secs(10)).unwrap();
        let bars = client.recent_bars("RELIANCE.NS").await.unwrap();
        assert!(!bars.is_empty());
        assert!(bars[bars.len() - 1].close > 0.0);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_profile() {
        let client = YahooMarketData::new(Duration::from_secs(10)).unwrap();
        let profile = client.profile("TCS.NS").await.unwrap();
        assert!(profile.display_name().is_some());
    }
}
