//! Clients for the external services the probes exercise

pub mod feeds;
pub mod news_api;
pub mod yahoo;

pub use feeds::{FeedDocument, FeedEntry, FeedSource, HttpFeedSource, parse_feed};
pub use news_api::{HttpReply, NewsApiClient, NewsApiResponse, NewsSearch};
pub use yahoo::{CompanyProfile, MarketDataSource, Valuation, YahooMarketData};
