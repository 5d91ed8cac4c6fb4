//! Indicator-library probe
//!
//! Runs RSI, MACD, SMA, Bollinger Bands and the Stochastic oscillator from
//! the `ta` crate over a synthetic series. Each indicator is isolated: a
//! construction error or a non-finite result fails that indicator only.

use crate::series::Bar;
use crate::synthetic::generate_ohlcv;
use async_trait::async_trait;
use probe_core::{CheckOutcome, Probe, ProbeReport};

/// Probe for the technical-indicator library
pub struct IndicatorProbe {
    len: usize,
    seed: Option<u64>,
}

impl IndicatorProbe {
    pub fn new(len: usize, seed: Option<u64>) -> Self {
        Self { len, seed }
    }

    fn seed_label(&self) -> String {
        self.seed
            .map_or_else(|| "random seed".to_string(), |s| format!("seed {s}"))
    }
}

#[async_trait]
impl Probe for IndicatorProbe {
    fn name(&self) -> &str {
        "indicators"
    }

    fn title(&self) -> &str {
        "Technical Indicators (ta)"
    }

    async fn run(&self) -> ProbeReport {
        let mut report = ProbeReport::builder(self.name(), self.title());
        let bars = generate_ohlcv(self.len, self.seed);
        for outcome in check_indicators(&bars, &self.seed_label()) {
            report.record(outcome);
        }
        report.finish()
    }
}

#[cfg(not(feature = "indicators"))]
fn check_indicators(_bars: &[Bar], _seed_label: &str) -> Vec<CheckOutcome> {
    vec![CheckOutcome::dependency_missing(
        "library",
        "technical indicator library (ta) is not compiled into this build",
        "cargo build -p probe-stock --features indicators",
    )]
}

#[cfg(feature = "indicators")]
type IndicatorFn = fn(&[Bar]) -> crate::Result<f64>;

#[cfg(feature = "indicators")]
fn check_indicators(bars: &[Bar], seed_label: &str) -> Vec<CheckOutcome> {
    let mut outcomes = vec![CheckOutcome::success(
        "library",
        format!("ta available; {} synthetic bars ({seed_label})", bars.len()),
    )];

    let indicators: [(&str, IndicatorFn); 5] = [
        ("RSI(14)", |b| calc::rsi(b, 14)),
        ("MACD(12,26,9)", |b| calc::macd(b, 12, 26, 9)),
        ("SMA(20)", |b| calc::sma(b, 20)),
        ("Bollinger(20) upper", |b| calc::bollinger_upper(b, 20, 2.0)),
        ("Stochastic(14) %K", |b| calc::stochastic_k(b, 14)),
    ];
    outcomes.extend(run_indicators(bars, &indicators));
    outcomes
}

/// One outcome per indicator, in table order
#[cfg(feature = "indicators")]
fn run_indicators(bars: &[Bar], indicators: &[(&str, IndicatorFn)]) -> Vec<CheckOutcome> {
    indicators
        .iter()
        .map(|&(name, compute)| match compute(bars) {
            Ok(value) => CheckOutcome::success(name, format!("{value:.2}")),
            Err(e) => {
                tracing::warn!(indicator = name, "Indicator failed: {e}");
                CheckOutcome::failure(name, e.to_string())
            }
        })
        .collect()
}

/// Indicator calculations returning the last value of each series
#[cfg(feature = "indicators")]
pub mod calc {
    use crate::error::{ProbeError, Result};
    use crate::series::Bar;
    use ta::Next;
    use ta::indicators::{
        BollingerBands, FastStochastic, MovingAverageConvergenceDivergence,
        RelativeStrengthIndex, SimpleMovingAverage,
    };

    fn indicator_err(e: impl std::fmt::Display) -> ProbeError {
        ProbeError::Indicator(e.to_string())
    }

    /// Last value of `values`, which must exist and be finite
    fn last_finite(values: impl Iterator<Item = f64>) -> Result<f64> {
        match values.last() {
            None => Err(ProbeError::Indicator("empty input series".to_string())),
            Some(v) if v.is_finite() => Ok(v),
            Some(v) => Err(ProbeError::Indicator(format!("non-finite result: {v}"))),
        }
    }

    pub fn rsi(bars: &[Bar], period: usize) -> Result<f64> {
        let mut rsi = RelativeStrengthIndex::new(period).map_err(indicator_err)?;
        last_finite(bars.iter().map(|b| rsi.next(b.close)))
    }

    /// MACD line (fast EMA minus slow EMA)
    pub fn macd(bars: &[Bar], fast: usize, slow: usize, signal: usize) -> Result<f64> {
        let mut macd =
            MovingAverageConvergenceDivergence::new(fast, slow, signal).map_err(indicator_err)?;
        last_finite(bars.iter().map(|b| macd.next(b.close).macd))
    }

    pub fn sma(bars: &[Bar], period: usize) -> Result<f64> {
        let mut sma = SimpleMovingAverage::new(period).map_err(indicator_err)?;
        last_finite(bars.iter().map(|b| sma.next(b.close)))
    }

    pub fn bollinger_upper(bars: &[Bar], period: usize, multiplier: f64) -> Result<f64> {
        let mut bb = BollingerBands::new(period, multiplier).map_err(indicator_err)?;
        last_finite(bars.iter().map(|b| bb.next(b.close).upper))
    }

    /// Fast stochastic %K over high/low/close
    pub fn stochastic_k(bars: &[Bar], period: usize) -> Result<f64> {
        let mut stoch = FastStochastic::new(period).map_err(indicator_err)?;
        last_finite(bars.iter().map(|b| stoch.next(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_core::CheckStatus;

    #[tokio::test]
    async fn test_probe_reports_library_and_every_indicator() {
        let report = IndicatorProbe::new(100, Some(42)).run().await;

        #[cfg(feature = "indicators")]
        {
            assert_eq!(report.checks.len(), 6);
            assert_eq!(report.checks[0].check, "library");
            assert_eq!(report.checks[0].status, CheckStatus::Success);
            assert!(report.checks[0].detail.contains("seed 42"));

            for check in &report.checks[1..] {
                match check.status {
                    CheckStatus::Success => {
                        let value: f64 = check.detail.parse().unwrap();
                        assert!(value.is_finite(), "{} produced {value}", check.check);
                    }
                    CheckStatus::Failure => assert!(!check.detail.is_empty()),
                    CheckStatus::Warning => panic!("indicators never warn"),
                }
            }
        }

        #[cfg(not(feature = "indicators"))]
        {
            assert_eq!(report.checks.len(), 1);
            assert_eq!(report.checks[0].reason, probe_core::OutcomeReason::DependencyMissing);
            assert!(report.checks[0].hint.is_some());
        }
    }

    #[cfg(feature = "indicators")]
    mod calc_tests {
        use super::super::calc;
        use crate::synthetic::generate_ohlcv;

        #[test]
        fn test_fixed_seed_gives_finite_values() {
            let bars = generate_ohlcv(100, Some(42));

            let rsi = calc::rsi(&bars, 14).unwrap();
            assert!((0.0..=100.0).contains(&rsi));

            let sma = calc::sma(&bars, 20).unwrap();
            let upper = calc::bollinger_upper(&bars, 20, 2.0).unwrap();
            assert!(upper >= sma);

            assert!(calc::macd(&bars, 12, 26, 9).unwrap().is_finite());
            assert!(calc::stochastic_k(&bars, 14).unwrap().is_finite());
        }

        #[test]
        fn test_sma_matches_manual_average() {
            let bars = generate_ohlcv(30, Some(9));
            let expected: f64 = bars[10..].iter().map(|b| b.close).sum::<f64>() / 20.0;
            let sma = calc::sma(&bars, 20).unwrap();
            assert!((sma - expected).abs() < 1e-9);
        }

        #[test]
        fn test_invalid_period_is_isolated_error() {
            let bars = generate_ohlcv(10, Some(1));
            assert!(calc::rsi(&bars, 0).is_err());
            assert!(calc::sma(&bars, 5).is_ok());
        }

        #[test]
        fn test_failing_indicator_does_not_stop_the_rest() {
            use super::super::{IndicatorFn, run_indicators};
            use crate::error::ProbeError;
            use probe_core::CheckStatus;

            let bars = generate_ohlcv(100, Some(42));
            let table: [(&str, IndicatorFn); 4] = [
                ("SMA(20)", |b| calc::sma(b, 20)),
                ("Stochastic(14) %K", |_| {
                    Err(ProbeError::Indicator("division by zero".to_string()))
                }),
                ("RSI(14)", |b| calc::rsi(b, 14)),
                ("Bollinger(20) upper", |b| calc::bollinger_upper(b, 20, 2.0)),
            ];

            let outcomes = run_indicators(&bars, &table);

            let statuses: Vec<_> = outcomes.iter().map(|o| o.status).collect();
            assert_eq!(
                statuses,
                vec![
                    CheckStatus::Success,
                    CheckStatus::Failure,
                    CheckStatus::Success,
                    CheckStatus::Success,
                ]
            );
            assert_eq!(outcomes[1].check, "Stochastic(14) %K");
            assert!(outcomes[1].detail.contains("division by zero"));
            assert_eq!(outcomes[3].check, "Bollinger(20) upper");
        }

        #[test]
        fn test_empty_series_is_error() {
            assert!(calc::sma(&[], 20).is_err());
        }
    }
}
