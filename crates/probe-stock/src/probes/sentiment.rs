//! Sentiment-library probe
//!
//! Scores one fixed sentence with VADER and another with AFINN-165. Each
//! scorer sits behind its own cargo feature; a scorer that is compiled out
//! is reported as a missing dependency, not as a failure of the scorer.

use async_trait::async_trait;
use probe_core::{CheckOutcome, Probe, ProbeReport};

/// Sentence scored by the VADER lexicon
pub const VADER_SAMPLE: &str =
    "The stock market is showing strong growth and investors are very optimistic!";

/// Sentence scored by the AFINN lexicon
pub const AFINN_SAMPLE: &str =
    "Reliance Industries reported excellent quarterly results and impressive profit growth.";

/// Probe for the sentiment scorers
#[derive(Debug, Default)]
pub struct SentimentProbe;

impl SentimentProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Probe for SentimentProbe {
    fn name(&self) -> &str {
        "sentiment"
    }

    fn title(&self) -> &str {
        "Sentiment Analysis (VADER, AFINN)"
    }

    async fn run(&self) -> ProbeReport {
        ProbeReport::builder(self.name(), self.title())
            .push(vader_check())
            .push(afinn_check())
            .finish()
    }
}

#[cfg(any(feature = "vader", feature = "afinn"))]
fn ensure_unit_range(name: &str, score: f64) -> crate::Result<f64> {
    if score.is_finite() && (-1.0..=1.0).contains(&score) {
        Ok(score)
    } else {
        Err(crate::ProbeError::Other(format!(
            "{name} score {score} outside [-1, 1]"
        )))
    }
}

#[cfg(any(feature = "vader", feature = "afinn"))]
fn guarded<T>(name: &str, f: impl FnOnce() -> T + std::panic::UnwindSafe) -> crate::Result<T> {
    std::panic::catch_unwind(f).map_err(|payload| {
        crate::ProbeError::Other(format!(
            "{name} panicked: {}",
            crate::probes::panic_message(payload.as_ref())
        ))
    })
}

/// VADER compound score for `text`, in [-1, 1]
#[cfg(feature = "vader")]
pub fn vader_compound(text: &str) -> crate::Result<f64> {
    let compound = guarded("VADER", || {
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        scores.get("compound").copied()
    })?
    .ok_or_else(|| crate::ProbeError::Other("VADER returned no compound score".to_string()))?;

    ensure_unit_range("VADER", compound)
}

#[cfg(feature = "vader")]
fn vader_check() -> CheckOutcome {
    match vader_compound(VADER_SAMPLE) {
        Ok(score) => CheckOutcome::success("VADER", format!("compound score {score:.4}")),
        Err(e) => {
            tracing::warn!("VADER scoring failed: {e}");
            CheckOutcome::failure("VADER", e.to_string())
        }
    }
}

#[cfg(not(feature = "vader"))]
fn vader_check() -> CheckOutcome {
    CheckOutcome::dependency_missing(
        "VADER",
        "vader_sentiment is not compiled into this build",
        "cargo build -p probe-stock --features vader",
    )
}

/// AFINN-165 polarity for `text`
///
/// Returns the comparative score scaled from the lexicon's [-5, 5] range to
/// [-1, 1], and the raw summed score.
#[cfg(feature = "afinn")]
pub fn afinn_polarity(text: &str) -> crate::Result<(f64, f64)> {
    let owned = text.to_string();
    let analysis = guarded("AFINN", move || sentiment::analyze(owned))?;

    let polarity = (f64::from(analysis.comparative) / 5.0).clamp(-1.0, 1.0);
    let polarity = ensure_unit_range("AFINN", polarity)?;
    Ok((polarity, f64::from(analysis.score)))
}

#[cfg(feature = "afinn")]
fn afinn_check() -> CheckOutcome {
    match afinn_polarity(AFINN_SAMPLE) {
        Ok((polarity, raw)) => CheckOutcome::success(
            "AFINN",
            format!("polarity {polarity:.4} (raw score {raw})"),
        ),
        Err(e) => {
            tracing::warn!("AFINN scoring failed: {e}");
            CheckOutcome::failure("AFINN", e.to_string())
        }
    }
}

#[cfg(not(feature = "afinn"))]
fn afinn_check() -> CheckOutcome {
    CheckOutcome::dependency_missing(
        "AFINN",
        "sentiment (AFINN-165) is not compiled into this build",
        "cargo build -p probe-stock --features afinn",
    )
}
