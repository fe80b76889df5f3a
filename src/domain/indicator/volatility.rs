//! Rolling volatility of close-to-close returns.
//!
//! R[i] = (C[i] - C[i-1]) / C[i-1]
//! VOL(n)[i] = 100 * stddev(R over the trailing min(n, i) returns)
//!
//! Population standard deviation, so a single return gives 0.
//! Warmup: undefined with fewer than 2 bars; the window expands until it
//! holds n returns. A zero previous close inside the window leaves the value
//! undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_volatility(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    let returns: Vec<Option<f64>> = bars
        .windows(2)
        .map(|w| w[1].pct_return(w[0].close))
        .collect();

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        // returns[j] is the return into bar j + 1, so bar i has i returns behind it
        let available = i.min(window);
        let value = if available >= 1 {
            population_stddev(&returns[i - available..i]).map(|sd| IndicatorValue::Simple(sd * 100.0))
        } else {
            None
        };
        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Volatility(window),
        values,
    }
}

fn population_stddev(window: &[Option<f64>]) -> Option<f64> {
    let xs: Vec<f64> = window.iter().copied().collect::<Option<_>>()?;
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let variance = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    Some(variance.sqrt())
}
