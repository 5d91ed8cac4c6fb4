//! Syndication feed client (RSS / Atom)

use crate::api::yahoo::BROWSER_USER_AGENT;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// One feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// Outcome of fetching and parsing a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedDocument {
    /// The document parsed as RSS or Atom
    Parsed {
        title: Option<String>,
        entries: Vec<FeedEntry>,
    },
    /// The server answered but the document is not a valid feed
    Malformed { reason: String },
}

/// Source of syndication feeds for the news-feed probe
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed at `url`
    ///
    /// Transport errors and HTTP error statuses are `Err`; a document that
    /// downloads but does not parse is `Ok(FeedDocument::Malformed)`.
    async fn fetch(&self, url: &str) -> Result<FeedDocument>;
}

/// Parse raw feed bytes
pub fn parse_feed(bytes: &[u8]) -> FeedDocument {
    match feed_rs::parser::parse(bytes) {
        Ok(feed) => FeedDocument::Parsed {
            title: feed.title.map(|t| t.content),
            entries: feed
                .entries
                .into_iter()
                .map(|entry| FeedEntry {
                    title: entry.title.map(|t| t.content.trim().to_string()),
                    published: entry.published.or(entry.updated),
                })
                .collect(),
        },
        Err(e) => FeedDocument::Malformed {
            reason: e.to_string(),
        },
    }
}

/// An error status means the feed is unreachable, whatever the body says
fn ensure_success(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ProbeError::Feed(format!("HTTP {status}")))
    }
}

/// HTTP feed client with a shared politeness limiter
pub struct HttpFeedSource {
    client: Client,
    rate_limiter: SharedRateLimiter,
}

impl HttpFeedSource {
    /// Create a new feed client
    ///
    /// # Arguments
    /// * `timeout` - Per-request timeout
    /// * `rate_limit` - Fetches per minute
    pub fn new(timeout: Duration, rate_limit: u32) -> Result<Self> {
        let per_minute = NonZeroU32::new(rate_limit)
            .ok_or_else(|| ProbeError::Config("feed rate limit must be non-zero".to_string()))?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            rate_limiter,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<FeedDocument> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(url, "Fetching feed");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::Feed(format!("request failed: {e}")))?;

        ensure_success(response.status())?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProbeError::Feed(format!("failed to read body: {e}")))?;

        Ok(parse_feed(&bytes))
    }
}
