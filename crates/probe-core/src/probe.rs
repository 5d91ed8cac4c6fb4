//! Core Probe trait definition

use crate::ProbeReport;
use async_trait::async_trait;

/// Core trait that all health probes must implement
///
/// A probe checks one external dependency. `run` has no error path: every
/// failure inside the probe must be converted into a
/// [`CheckOutcome`](crate::CheckOutcome) on the returned report so that one
/// broken dependency never stops the rest of the battery.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Stable machine-readable name, e.g. `market_data`
    fn name(&self) -> &str;

    /// Section title shown in the report banner
    fn title(&self) -> &str;

    /// Run every sub-check and collect the outcomes
    async fn run(&self) -> ProbeReport;
}
