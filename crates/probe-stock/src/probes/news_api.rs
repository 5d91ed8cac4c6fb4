//! News-API probe

use crate::api::{HttpReply, NewsApiResponse, NewsSearch};
use crate::config::NewsApiSettings;
use crate::probes::truncate_chars;
use async_trait::async_trait;
use probe_core::{CheckOutcome, Probe, ProbeReport};
use std::sync::Arc;
use tracing::{info, warn};

const TITLE_CHARS: usize = 60;
const BODY_CHARS: usize = 100;

/// Probe for the NewsAPI search endpoint
///
/// The key is resolved before the battery starts; `None` skips the probe.
pub struct NewsApiProbe {
    client: Arc<dyn NewsSearch>,
    settings: NewsApiSettings,
    api_key: Option<String>,
}

impl NewsApiProbe {
    pub fn new(
        client: Arc<dyn NewsSearch>,
        settings: NewsApiSettings,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            settings,
            api_key,
        }
    }
}

#[async_trait]
impl Probe for NewsApiProbe {
    fn name(&self) -> &str {
        "news_api"
    }

    fn title(&self) -> &str {
        "NewsAPI"
    }

    async fn run(&self) -> ProbeReport {
        let report = ProbeReport::builder(self.name(), self.title());

        let Some(api_key) = self.api_key.as_deref() else {
            info!("No NewsAPI key, skipping");
            return report
                .push(CheckOutcome::skipped(
                    "search",
                    "no API key provided; skipped (non-blocking, RSS feeds remain available)",
                ))
                .finish();
        };

        let outcome = match self.client.search(api_key, &self.settings).await {
            Ok(reply) => classify_news_response(&reply),
            Err(e) => {
                warn!("NewsAPI request failed: {e}");
                CheckOutcome::failure("search", e.to_string())
            }
        };

        report.push(outcome).finish()
    }
}

/// Classify a NewsAPI reply by status code
pub fn classify_news_response(reply: &HttpReply) -> CheckOutcome {
    match reply.status {
        200 => match serde_json::from_str::<NewsApiResponse>(&reply.body) {
            Ok(parsed) => {
                let count = parsed.articles.len();
                let first = parsed
                    .articles
                    .first()
                    .and_then(|a| a.title.as_deref())
                    .map(|t| format!("; first: \"{}\"", truncate_chars(t, TITLE_CHARS)))
                    .unwrap_or_default();
                CheckOutcome::success("search", format!("{count} articles{first}"))
            }
            Err(e) => CheckOutcome::failure("search", format!("unexpected response body: {e}")),
        },
        401 => CheckOutcome::failure("search", "invalid API key (HTTP 401)"),
        429 => CheckOutcome::warning("search", "rate limit exceeded (HTTP 429)"),
        status => CheckOutcome::failure(
            "search",
            format!(
                "HTTP {status}: {}",
                truncate_chars(&reply.body, BODY_CHARS)
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::news_api::MockNewsSearch;
    use crate::error::ProbeError;
    use probe_core::{CheckStatus, OutcomeReason};

    fn ok_body(titles: &[&str]) -> String {
        let articles: Vec<_> = titles
            .iter()
            .map(|t| serde_json::json!({ "title": t }))
            .collect();
        serde_json::json!({ "status": "ok", "totalResults": 999, "articles": articles }).to_string()
    }

    #[test]
    fn test_200_reports_count_and_truncated_title() {
        let long_title = "Markets ".repeat(20);
        let reply = HttpReply::new(200, ok_body(&[&long_title, "b", "c"]));
        let outcome = classify_news_response(&reply);

        assert_eq!(outcome.status, CheckStatus::Success);
        assert!(outcome.detail.starts_with("3 articles"));
        let expected = truncate_chars(&long_title, 60);
        assert_eq!(expected.chars().count(), 60);
        assert!(outcome.detail.contains(&format!("\"{expected}\"")));
    }

    #[test]
    fn test_200_without_articles() {
        let outcome = classify_news_response(&HttpReply::new(200, ok_body(&[])));
        assert_eq!(outcome.status, CheckStatus::Success);
        assert_eq!(outcome.detail, "0 articles");
    }

    #[test]
    fn test_200_with_garbage_body_fails() {
        let outcome = classify_news_response(&HttpReply::new(200, "<html>"));
        assert_eq!(outcome.status, CheckStatus::Failure);
    }

    #[test]
    fn test_401_is_invalid_key() {
        let outcome = classify_news_response(&HttpReply::new(401, "{}"));
        assert_eq!(outcome.status, CheckStatus::Failure);
        assert!(outcome.detail.contains("invalid API key"));
    }

    #[test]
    fn test_429_is_rate_limit_warning() {
        let outcome = classify_news_response(&HttpReply::new(429, "{}"));
        assert_eq!(outcome.status, CheckStatus::Warning);
        assert!(outcome.detail.contains("rate limit"));
    }

    #[test]
    fn test_other_status_includes_code_and_body_prefix() {
        let body = "x".repeat(250);
        let outcome = classify_news_response(&HttpReply::new(503, body));

        assert_eq!(outcome.status, CheckStatus::Failure);
        assert!(outcome.detail.starts_with("HTTP 503: "));
        assert_eq!(outcome.detail.len(), "HTTP 503: ".len() + 100);
    }

    #[tokio::test]
    async fn test_missing_key_skips_without_request() {
        let mut client = MockNewsSearch::new();
        client.expect_search().never();

        let probe = NewsApiProbe::new(Arc::new(client), NewsApiSettings::default(), None);
        let report = probe.run().await;

        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].status, CheckStatus::Warning);
        assert_eq!(report.checks[0].reason, OutcomeReason::Skipped);
    }

    #[tokio::test]
    async fn test_request_uses_key_and_settings() {
        let mut client = MockNewsSearch::new();
        client
            .expect_search()
            .withf(|key, settings| {
                key == "secret"
                    && settings.query == "stock market"
                    && settings.page_size == 5
                    && settings.sort_by == "publishedAt"
                    && settings.language == "en"
            })
            .times(1)
            .returning(|_, _| Ok(HttpReply::new(429, "")));

        let probe = NewsApiProbe::new(
            Arc::new(client),
            NewsApiSettings::default(),
            Some("secret".to_string()),
        );
        let report = probe.run().await;
        assert_eq!(report.checks[0].status, CheckStatus::Warning);
    }

    #[tokio::test]
    async fn test_transport_error_is_failure() {
        let mut client = MockNewsSearch::new();
        client
            .expect_search()
            .returning(|_, _| Err(ProbeError::Other("connection timed out".to_string())));

        let probe = NewsApiProbe::new(
            Arc::new(client),
            NewsApiSettings::default(),
            Some("key".to_string()),
        );
        let report = probe.run().await;

        assert_eq!(report.checks[0].status, CheckStatus::Failure);
        assert!(report.checks[0].detail.contains("connection timed out"));
    }
}
