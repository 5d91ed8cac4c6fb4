//! Probe and run reports

use crate::{CheckOutcome, CheckStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Counts of outcomes by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTotals {
    pub success: usize,
    pub warning: usize,
    pub failure: usize,
}

impl StatusTotals {
    fn add(&mut self, status: CheckStatus) {
        match status {
            CheckStatus::Success => self.success += 1,
            CheckStatus::Warning => self.warning += 1,
            CheckStatus::Failure => self.failure += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.warning + self.failure
    }
}

/// Everything one probe found
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    pub name: String,
    pub title: String,
    pub checks: Vec<CheckOutcome>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl ProbeReport {
    /// Start collecting outcomes for a probe
    pub fn builder(name: impl Into<String>, title: impl Into<String>) -> ProbeReportBuilder {
        ProbeReportBuilder {
            name: name.into(),
            title: title.into(),
            checks: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Number of checks with the given status
    pub fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn totals(&self) -> StatusTotals {
        let mut totals = StatusTotals::default();
        for check in &self.checks {
            totals.add(check.status);
        }
        totals
    }

    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(CheckOutcome::is_failure)
    }

    /// Most severe status in the report, `None` when no checks ran
    pub fn worst_status(&self) -> Option<CheckStatus> {
        self.checks.iter().map(|c| c.status).max()
    }

    /// Checks belonging to one target, in the order they ran
    pub fn checks_for<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a CheckOutcome> {
        self.checks
            .iter()
            .filter(move |c| c.target.as_deref() == Some(target))
    }
}

/// Incremental builder for [`ProbeReport`]
#[derive(Debug)]
pub struct ProbeReportBuilder {
    name: String,
    title: String,
    checks: Vec<CheckOutcome>,
    started: Instant,
}

impl ProbeReportBuilder {
    /// Append an outcome (chaining form)
    pub fn push(mut self, outcome: CheckOutcome) -> Self {
        self.checks.push(outcome);
        self
    }

    /// Append an outcome
    pub fn record(&mut self, outcome: CheckOutcome) {
        self.checks.push(outcome);
    }

    /// Stamp the elapsed time and produce the report
    pub fn finish(self) -> ProbeReport {
        ProbeReport {
            name: self.name,
            title: self.title,
            checks: self.checks,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Result of one full battery run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub probes: Vec<ProbeReport>,
}

impl RunReport {
    /// Start a new run report stamped with the current time
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            probes: Vec::new(),
        }
    }

    pub fn push(&mut self, report: ProbeReport) {
        self.probes.push(report);
    }

    /// Mark the run as finished
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Outcome counts across every probe
    pub fn totals(&self) -> StatusTotals {
        let mut totals = StatusTotals::default();
        for check in self.probes.iter().flat_map(|p| &p.checks) {
            totals.add(check.status);
        }
        totals
    }

    pub fn probe(&self, name: &str) -> Option<&ProbeReport> {
        self.probes.iter().find(|p| p.name == name)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
