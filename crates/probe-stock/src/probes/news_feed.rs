//! News-feed probe

use crate::api::{FeedDocument, FeedSource};
use crate::config::FeedTarget;
use crate::probes::truncate_chars;
use async_trait::async_trait;
use probe_core::{CheckOutcome, Probe, ProbeReport};
use std::sync::Arc;
use tracing::{info, warn};

const TITLE_CHARS: usize = 60;

/// Probe for the configured syndication feeds
pub struct NewsFeedProbe {
    source: Arc<dyn FeedSource>,
    feeds: Vec<FeedTarget>,
}

impl NewsFeedProbe {
    pub fn new(source: Arc<dyn FeedSource>, feeds: Vec<FeedTarget>) -> Self {
        Self { source, feeds }
    }
}

#[async_trait]
impl Probe for NewsFeedProbe {
    fn name(&self) -> &str {
        "news_feeds"
    }

    fn title(&self) -> &str {
        "News RSS Feeds"
    }

    async fn run(&self) -> ProbeReport {
        let mut report = ProbeReport::builder(self.name(), self.title());

        for feed in &self.feeds {
            info!(feed = %feed.name, url = %feed.url, "Probing feed");

            let outcome = match self.source.fetch(&feed.url).await {
                Ok(document) => classify_feed(&document),
                Err(e) => {
                    warn!(feed = %feed.name, "Feed fetch failed: {e}");
                    CheckOutcome::failure("feed", e.to_string())
                }
            };

            report.record(outcome.for_target(&feed.name));
        }

        report.finish()
    }
}

/// Classify a fetched feed document
pub fn classify_feed(document: &FeedDocument) -> CheckOutcome {
    match document {
        FeedDocument::Malformed { reason } => {
            CheckOutcome::warning("feed", format!("malformed feed: {reason}"))
        }
        FeedDocument::Parsed { entries, .. } => match entries.first() {
            None => CheckOutcome::warning("feed", "accessible but empty"),
            Some(first) => {
                let title = first.title.as_deref().unwrap_or("(untitled)");
                let published = first.published.map_or_else(
                    || "unknown date".to_string(),
                    |ts| ts.format("%Y-%m-%d %H:%M UTC").to_string(),
                );
                CheckOutcome::success(
                    "feed",
                    format!(
                        "{} entries; latest: \"{}\" ({published})",
                        entries.len(),
                        truncate_chars(title, TITLE_CHARS)
                    ),
                )
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FeedEntry;
    use crate::api::feeds::MockFeedSource;
    use crate::error::ProbeError;
    use chrono::{TimeZone, Utc};
    use probe_core::CheckStatus;

    fn feeds() -> Vec<FeedTarget> {
        vec![
            FeedTarget::new("Broken", "https://broken.example/rss"),
            FeedTarget::new("Malformed", "https://malformed.example/rss"),
            FeedTarget::new("Empty", "https://empty.example/rss"),
            FeedTarget::new("Healthy", "https://healthy.example/rss"),
        ]
    }

    fn entry(title: &str) -> FeedEntry {
        FeedEntry {
            title: Some(title.to_string()),
            published: Some(Utc.with_ymd_and_hms(2026, 10, 19, 4, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_each_feed_classified_independently() {
        let mut source = MockFeedSource::new();
        source.expect_fetch().times(4).returning(|url| match url {
            "https://broken.example/rss" => {
                Err(ProbeError::Feed("request failed: connection refused".to_string()))
            }
            "https://malformed.example/rss" => Ok(FeedDocument::Malformed {
                reason: "unable to parse feed: no root element".to_string(),
            }),
            "https://empty.example/rss" => Ok(FeedDocument::Parsed {
                title: Some("Empty".to_string()),
                entries: vec![],
            }),
            _ => Ok(FeedDocument::Parsed {
                title: Some("Healthy".to_string()),
                entries: vec![entry("Sensex up"), entry("Nifty flat")],
            }),
        });

        let probe = NewsFeedProbe::new(Arc::new(source), feeds());
        let report = probe.run().await;

        let statuses: Vec<_> = report.checks.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                CheckStatus::Failure,
                CheckStatus::Warning,
                CheckStatus::Warning,
                CheckStatus::Success,
            ]
        );
        assert_eq!(report.checks[0].target.as_deref(), Some("Broken"));
        assert!(report.checks[1].detail.contains("no root element"));
        assert_eq!(report.checks[2].detail, "accessible but empty");
        assert!(report.checks[3].detail.starts_with("2 entries"));
        assert!(report.checks[3].detail.contains("2026-10-19 04:00 UTC"));
    }

    #[tokio::test]
    async fn test_http_error_status_is_failure() {
        let mut source = MockFeedSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Err(ProbeError::Feed("HTTP 404 Not Found".to_string())));

        let probe = NewsFeedProbe::new(
            Arc::new(source),
            vec![FeedTarget::new("Gone", "https://gone.example/rss")],
        );
        let report = probe.run().await;

        assert_eq!(report.checks[0].status, CheckStatus::Failure);
        assert!(report.checks[0].detail.contains("HTTP 404"));
    }

    #[test]
    fn test_long_title_truncated() {
        let long = "A".repeat(120);
        let outcome = classify_feed(&FeedDocument::Parsed {
            title: None,
            entries: vec![entry(&long)],
        });

        assert!(outcome.detail.contains(&"A".repeat(60)));
        assert!(!outcome.detail.contains(&"A".repeat(61)));
    }

    #[test]
    fn test_entry_without_date() {
        let outcome = classify_feed(&FeedDocument::Parsed {
            title: None,
            entries: vec![FeedEntry {
                title: None,
                published: None,
            }],
        });
        assert_eq!(outcome.status, CheckStatus::Success);
        assert!(outcome.detail.contains("(untitled)"));
        assert!(outcome.detail.contains("unknown date"));
    }
}
