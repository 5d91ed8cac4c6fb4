//! NewsAPI search client

use crate::api::yahoo::BROWSER_USER_AGENT;
use crate::config::NewsApiSettings;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw HTTP reply; classification happens in the probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// NewsAPI article (only the fields the probe reads)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiArticle {
    pub title: Option<String>,
    pub published_at: Option<String>,
}

/// NewsAPI search response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    pub status: Option<String>,
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
}

/// A NewsAPI-compatible search endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// Issue one search request and return the reply whatever its status
    async fn search(&self, api_key: &str, settings: &NewsApiSettings) -> Result<HttpReply>;
}

/// NewsAPI HTTP client
pub struct NewsApiClient {
    client: Client,
}

impl NewsApiClient {
    /// Create a new client with a request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn search_request(&self, api_key: &str, settings: &NewsApiSettings) -> Result<Request> {
        let page_size = settings.page_size.to_string();
        let request = self
            .client
            .get(&settings.endpoint)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .query(&[
                ("q", settings.query.as_str()),
                ("apiKey", api_key),
                ("sortBy", settings.sort_by.as_str()),
                ("pageSize", page_size.as_str()),
                ("language", settings.language.as_str()),
            ])
            .build()?;

        Ok(request)
    }
}

#[async_trait]
impl NewsSearch for NewsApiClient {
    async fn search(&self, api_key: &str, settings: &NewsApiSettings) -> Result<HttpReply> {
        tracing::debug!(endpoint = %settings.endpoint, query = %settings.query, "Searching NewsAPI");

        let request = self.search_request(api_key, settings)?;
        let response = self.client.execute(request).await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "status": "ok",
            "totalResults": 1234,
            "articles": [
                {"title": "Stocks rally", "publishedAt": "2026-10-19T08:00:00Z"},
                {"title": null}
            ]
        }"#;
        let parsed: NewsApiResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.total_results, Some(1234));
        assert_eq!(parsed.articles.len(), 2);
        assert_eq!(parsed.articles[0].title.as_deref(), Some("Stocks rally"));
        assert!(parsed.articles[1].title.is_none());
    }

    #[test]
    fn test_missing_articles_defaults_to_empty() {
        let parsed: NewsApiResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(parsed.articles.is_empty());
    }

    #[test]
    fn test_client_creation() {
        assert!(NewsApiClient::new(Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_search_request_carries_user_agent_and_params() {
        let client = NewsApiClient::new(Duration::from_secs(10)).unwrap();
        let request = client
            .search_request("secret", &NewsApiSettings::default())
            .unwrap();

        assert_eq!(
            request.headers().get(USER_AGENT).unwrap(),
            BROWSER_USER_AGENT
        );

        let url = request.url();
        assert_eq!(url.path(), "/v2/everything");
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        for expected in [
            ("q", "stock market"),
            ("apiKey", "secret"),
            ("sortBy", "publishedAt"),
            ("pageSize", "5"),
            ("language", "en"),
        ] {
            assert!(
                params.contains(&(expected.0.to_string(), expected.1.to_string())),
                "missing {expected:?}"
            );
        }
    }
}
