//! The five probes of the health-check battery

pub mod indicators;
pub mod market_data;
pub mod news_api;
pub mod news_feed;
pub mod sentiment;

pub use indicators::IndicatorProbe;
pub use market_data::MarketDataProbe;
pub use news_api::NewsApiProbe;
pub use news_feed::NewsFeedProbe;
pub use sentiment::SentimentProbe;

use std::any::Any;

/// Keep at most `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
