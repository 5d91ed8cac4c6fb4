//! Synthetic OHLCV series used to exercise the indicator library
//!
//! The series has a fixed shape but random values: open, high, low and
//! close are independent random walks starting near 100, 105, 95 and 100,
//! and volume is uniform. No real market data is involved, and nothing
//! forces `low <= open/close <= high`.

use crate::series::Bar;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

const OPEN_BASE: f64 = 100.0;
const HIGH_BASE: f64 = 105.0;
const LOW_BASE: f64 = 95.0;
const CLOSE_BASE: f64 = 100.0;
const VOLUME_RANGE: std::ops::Range<u64> = 1_000_000..5_000_000;

/// Generate `len` daily bars ending today
///
/// With `Some(seed)` the prices and volumes are reproducible; `None` seeds
/// from OS entropy.
pub fn generate_ohlcv(len: usize, seed: Option<u64>) -> Vec<Bar> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let open = random_walk(&mut rng, len, OPEN_BASE);
    let high = random_walk(&mut rng, len, HIGH_BASE);
    let low = random_walk(&mut rng, len, LOW_BASE);
    let close = random_walk(&mut rng, len, CLOSE_BASE);
    let volume: Vec<u64> = (0..len).map(|_| rng.gen_range(VOLUME_RANGE)).collect();

    let today = Utc::now();

    (0..len)
        .map(|i| Bar {
            timestamp: today - chrono::Duration::days((len - 1 - i) as i64),
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume[i],
        })
        .collect()
}

/// Cumulative sum of standard-normal steps, offset by `base`
fn random_walk(rng: &mut StdRng, len: usize, base: f64) -> Vec<f64> {
    let mut level = base;
    (0..len)
        .map(|_| {
            let step: f64 = rng.sample(StandardNormal);
            level += step;
            level
        })
        .collect()
}
