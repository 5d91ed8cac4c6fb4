//! Configuration for the probe battery

use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the NewsAPI key
pub const NEWSAPI_KEY_ENV: &str = "NEWSAPI_KEY";

/// Default NewsAPI search endpoint
pub const DEFAULT_NEWS_API_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// Seed used for the synthetic OHLCV series unless overridden
pub const DEFAULT_SYNTHETIC_SEED: u64 = 42;

/// A syndication feed to probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedTarget {
    /// Display name of the outlet
    pub name: String,
    /// Feed URL
    pub url: String,
}

impl FeedTarget {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// NewsAPI request parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsApiSettings {
    pub endpoint: String,
    pub query: String,
    pub page_size: u32,
    pub sort_by: String,
    pub language: String,
}

impl Default for NewsApiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_NEWS_API_ENDPOINT.to_string(),
            query: "stock market".to_string(),
            page_size: 5,
            sort_by: "publishedAt".to_string(),
            language: "en".to_string(),
        }
    }
}

/// Configuration for a health-check run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    /// NSE symbols to probe, already suffixed with `.NS`
    pub symbols: Vec<String>,

    /// Syndication feeds to probe
    pub feeds: Vec<FeedTarget>,

    /// NewsAPI request settings
    pub news_api: NewsApiSettings,

    /// NewsAPI key (optional)
    pub news_api_key: Option<String>,

    /// Timeout applied to every outbound call
    pub request_timeout: Duration,

    /// Feed fetches allowed per minute
    pub feed_rate_limit: u32,

    /// Seed for the synthetic series; `None` draws from OS entropy
    pub synthetic_seed: Option<u64>,

    /// Number of daily bars in the synthetic series
    pub synthetic_len: usize,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            symbols: vec![
                "RELIANCE.NS".to_string(),
                "TCS.NS".to_string(),
                "INFY.NS".to_string(),
            ],
            feeds: default_feeds(),
            news_api: NewsApiSettings::default(),
            news_api_key: None,
            request_timeout: Duration::from_secs(10),
            feed_rate_limit: 60,
            synthetic_seed: Some(DEFAULT_SYNTHETIC_SEED),
            synthetic_len: 100,
        }
    }
}

fn default_feeds() -> Vec<FeedTarget> {
    vec![
        FeedTarget::new(
            "Economic Times Markets",
            "https://economictimes.indiatimes.com/markets/rssfeeds/1977021501.cms",
        ),
        FeedTarget::new(
            "Moneycontrol Market Reports",
            "https://www.moneycontrol.com/rss/marketreports.xml",
        ),
        FeedTarget::new(
            "Business Standard Markets",
            "https://www.business-standard.com/rss/markets-106.rss",
        ),
    ]
}

/// Normalise an NSE ticker for Yahoo Finance
///
/// Trims, uppercases and appends `.NS` when the suffix is missing.
pub fn format_nse_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if symbol.ends_with(".NS") {
        symbol
    } else {
        format!("{symbol}.NS")
    }
}

impl HealthCheckConfig {
    /// Create a new configuration builder
    pub fn builder() -> HealthCheckConfigBuilder {
        HealthCheckConfigBuilder::default()
    }

    /// Load the NewsAPI key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Some(key) = env_api_key() {
            self.news_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(ProbeError::Config(
                "at least one symbol is required".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ProbeError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.feed_rate_limit == 0 {
            return Err(ProbeError::Config(
                "feed_rate_limit must be greater than 0".to_string(),
            ));
        }

        if !(1..=100).contains(&self.news_api.page_size) {
            return Err(ProbeError::Config(format!(
                "news_api.page_size must be between 1 and 100, got {}",
                self.news_api.page_size
            )));
        }

        url::Url::parse(&self.news_api.endpoint).map_err(|e| {
            ProbeError::Config(format!(
                "invalid NewsAPI endpoint '{}': {e}",
                self.news_api.endpoint
            ))
        })?;

        for feed in &self.feeds {
            url::Url::parse(&feed.url).map_err(|e| {
                ProbeError::Config(format!("invalid URL for feed '{}': {e}", feed.name))
            })?;
        }

        if self.synthetic_len < 2 {
            return Err(ProbeError::Config(
                "synthetic_len must be at least 2".to_string(),
            ));
        }

        Ok(())
    }
}

fn env_api_key() -> Option<String> {
    std::env::var(NEWSAPI_KEY_ENV)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// Builder for HealthCheckConfig
#[derive(Debug, Default)]
pub struct HealthCheckConfigBuilder {
    symbols: Option<Vec<String>>,
    feeds: Option<Vec<FeedTarget>>,
    news_api: Option<NewsApiSettings>,
    news_api_key: Option<String>,
    request_timeout: Option<Duration>,
    feed_rate_limit: Option<u32>,
    synthetic_seed: Option<Option<u64>>,
    synthetic_len: Option<usize>,
}

impl HealthCheckConfigBuilder {
    /// Set the symbols to probe; each is normalised with [`format_nse_symbol`]
    pub fn symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.symbols = Some(
            symbols
                .into_iter()
                .map(|s| format_nse_symbol(s.as_ref()))
                .collect(),
        );
        self
    }

    /// Set the feeds to probe
    pub fn feeds(mut self, feeds: Vec<FeedTarget>) -> Self {
        self.feeds = Some(feeds);
        self
    }

    /// Set NewsAPI request settings
    pub fn news_api(mut self, settings: NewsApiSettings) -> Self {
        self.news_api = Some(settings);
        self
    }

    /// Set the NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Load the NewsAPI key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Some(key) = env_api_key() {
            self.news_api_key = Some(key);
        }
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set feed fetches per minute
    pub fn feed_rate_limit(mut self, per_minute: u32) -> Self {
        self.feed_rate_limit = Some(per_minute);
        self
    }

    /// Set the synthetic data seed, `None` for a random seed
    pub fn synthetic_seed(mut self, seed: Option<u64>) -> Self {
        self.synthetic_seed = Some(seed);
        self
    }

    /// Set the synthetic series length
    pub fn synthetic_len(mut self, len: usize) -> Self {
        self.synthetic_len = Some(len);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<HealthCheckConfig> {
        let defaults = HealthCheckConfig::default();

        let config = HealthCheckConfig {
            symbols: self.symbols.unwrap_or(defaults.symbols),
            feeds: self.feeds.unwrap_or(defaults.feeds),
            news_api: self.news_api.unwrap_or(defaults.news_api),
            news_api_key: self.news_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            feed_rate_limit: self.feed_rate_limit.unwrap_or(defaults.feed_rate_limit),
            synthetic_seed: self.synthetic_seed.unwrap_or(defaults.synthetic_seed),
            synthetic_len: self.synthetic_len.unwrap_or(defaults.synthetic_len),
        };

        config.validate()?;
        Ok(config)
    }
}
