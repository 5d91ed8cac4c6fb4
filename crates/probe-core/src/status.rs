//! Typed outcomes for individual sub-checks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a single sub-check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The dependency answered and the result looks sane
    Success,
    /// Reached but degraded, partial, or deliberately skipped
    Warning,
    /// The check could not be completed
    Failure,
}

impl CheckStatus {
    /// Emoji marker used by text renderers
    pub fn marker(self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Warning => "⚠️",
            Self::Failure => "❌",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Failure => "failure",
        };
        f.write_str(label)
    }
}

/// Why a check ended up with its status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// The check ran
    #[default]
    Checked,
    /// An optional dependency was not configured, so the check did not run
    Skipped,
    /// The library needed for the check is not compiled in
    DependencyMissing,
}

/// Result of one sub-check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Symbol, feed, or other target the check belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Short name of the check, e.g. `history` or `RSI(14)`
    pub check: String,
    pub status: CheckStatus,
    pub reason: OutcomeReason,
    /// Human readable detail
    pub detail: String,
    /// Remediation hint for missing dependencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CheckOutcome {
    fn new(check: impl Into<String>, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            target: None,
            check: check.into(),
            status,
            reason: OutcomeReason::Checked,
            detail: detail.into(),
            hint: None,
        }
    }

    pub fn success(check: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(check, CheckStatus::Success, detail)
    }

    pub fn warning(check: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(check, CheckStatus::Warning, detail)
    }

    pub fn failure(check: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(check, CheckStatus::Failure, detail)
    }

    /// An optional check that was not run; reported as a warning
    pub fn skipped(check: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            reason: OutcomeReason::Skipped,
            ..Self::new(check, CheckStatus::Warning, detail)
        }
    }

    /// A required library is not available in this build
    pub fn dependency_missing(
        check: impl Into<String>,
        detail: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            reason: OutcomeReason::DependencyMissing,
            hint: Some(hint.into()),
            ..Self::new(check, CheckStatus::Failure, detail)
        }
    }

    /// Attach the target this check ran against
    pub fn for_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == CheckStatus::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let ok = CheckOutcome::success("price", "₹2500.00");
        assert!(ok.is_success());
        assert_eq!(ok.reason, OutcomeReason::Checked);
        assert!(ok.target.is_none());

        let skipped = CheckOutcome::skipped("newsapi", "no key");
        assert_eq!(skipped.status, CheckStatus::Warning);
        assert_eq!(skipped.reason, OutcomeReason::Skipped);

        let missing = CheckOutcome::dependency_missing("VADER", "not built", "cargo build");
        assert!(missing.is_failure());
        assert_eq!(missing.reason, OutcomeReason::DependencyMissing);
        assert_eq!(missing.hint.as_deref(), Some("cargo build"));
    }

    #[test]
    fn test_for_target() {
        let outcome = CheckOutcome::failure("profile", "timed out").for_target("TCS.NS");
        assert_eq!(outcome.target.as_deref(), Some("TCS.NS"));
    }

    #[test]
    fn test_status_ordering() {
        assert!(CheckStatus::Success < CheckStatus::Warning);
        assert!(CheckStatus::Warning < CheckStatus::Failure);
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let json = serde_json::to_value(CheckOutcome::warning("feed", "empty")).unwrap();
        assert_eq!(json["status"], "warning");
        assert_eq!(json["reason"], "checked");
        assert!(json.get("target").is_none());
        assert!(json.get("hint").is_none());
    }
}
