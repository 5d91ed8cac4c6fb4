//! Health-check driver: runs the probe battery in a fixed order

use crate::api::{HttpFeedSource, NewsApiClient, YahooMarketData};
use crate::config::HealthCheckConfig;
use crate::error::Result;
use crate::probes::{
    IndicatorProbe, MarketDataProbe, NewsApiProbe, NewsFeedProbe, SentimentProbe, panic_message,
};
use crate::render::Renderer;
use futures::FutureExt;
use probe_core::{CheckOutcome, Probe, ProbeReport, RunReport};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs probes one after another and collects their reports
pub struct HealthChecker {
    probes: Vec<Box<dyn Probe>>,
}

impl HealthChecker {
    /// Create a checker over an explicit, ordered list of probes
    pub fn new(probes: Vec<Box<dyn Probe>>) -> Self {
        Self { probes }
    }

    /// The standard battery: market data, news feeds, NewsAPI, indicators,
    /// sentiment
    pub fn standard(config: &HealthCheckConfig, news_api_key: Option<String>) -> Result<Self> {
        config.validate()?;

        let market = Arc::new(YahooMarketData::new(config.request_timeout)?);
        let feeds = Arc::new(HttpFeedSource::new(
            config.request_timeout,
            config.feed_rate_limit,
        )?);
        let news = Arc::new(NewsApiClient::new(config.request_timeout)?);

        Ok(Self::new(vec![
            Box::new(MarketDataProbe::new(market, config.symbols.clone())),
            Box::new(NewsFeedProbe::new(feeds, config.feeds.clone())),
            Box::new(NewsApiProbe::new(
                news,
                config.news_api.clone(),
                news_api_key,
            )),
            Box::new(IndicatorProbe::new(
                config.synthetic_len,
                config.synthetic_seed,
            )),
            Box::new(SentimentProbe::new()),
        ]))
    }

    /// Number of probes in the battery
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Names of the probes, in run order
    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    /// Section titles of the probes, in run order
    pub fn probe_titles(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.title()).collect()
    }

    /// Run every probe, calling `on_probe` as each one finishes
    ///
    /// A panicking probe is recorded as a single failure under its own name
    /// and the run continues with the next probe.
    pub async fn run<F>(&self, mut on_probe: F) -> RunReport
    where
        F: FnMut(usize, &ProbeReport),
    {
        let mut run = RunReport::start();
        info!(run_id = %run.run_id, probes = self.probes.len(), "Starting health check");

        for (index, probe) in self.probes.iter().enumerate() {
            info!(probe = probe.name(), "Running probe");

            let report = match AssertUnwindSafe(probe.run()).catch_unwind().await {
                Ok(report) => report,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(probe = probe.name(), "Probe panicked: {message}");
                    ProbeReport::builder(probe.name(), probe.title())
                        .push(CheckOutcome::failure(
                            "probe",
                            format!("probe panicked: {message}"),
                        ))
                        .finish()
                }
            };

            let totals = report.totals();
            info!(
                probe = probe.name(),
                success = totals.success,
                warning = totals.warning,
                failure = totals.failure,
                "Probe finished"
            );

            on_probe(index, &report);
            run.push(report);
        }

        run.finish()
    }

    /// Run every probe and render as it goes
    ///
    /// Rendering errors are logged and never stop the battery.
    pub async fn run_rendered(&self, renderer: &mut dyn Renderer) -> RunReport {
        if let Err(e) = renderer.render_header(&self.probe_titles()) {
            warn!("Failed to render header: {e}");
        }

        let run = self
            .run(|index, report| {
                if let Err(e) = renderer.render_probe(index, report) {
                    warn!(probe = %report.name, "Failed to render probe report: {e}");
                }
            })
            .await;

        if let Err(e) = renderer.render_summary(&run) {
            warn!("Failed to render summary: {e}");
        }

        run
    }
}
