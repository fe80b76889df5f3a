//! Simple Moving Average over closes or volumes.
//!
//! SMA(n)[i] = sum(X[i-n+1..=i]) / n
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    rolling_mean(bars, period, |b| b.close, IndicatorType::Sma(period))
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    rolling_mean(bars, period, |b| b.volume, IndicatorType::VolumeSma(period))
}

fn rolling_mean(
    bars: &[OhlcvBar],
    period: usize,
    field: impl Fn(&OhlcvBar) -> f64,
    indicator_type: IndicatorType,
) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let value = if period > 0 && i + 1 >= period {
            let window = &bars[i + 1 - period..=i];
            let mean = window.iter().map(&field).sum::<f64>() / period as f64;
            Some(IndicatorValue::Simple(mean))
        } else {
            None
        };

        values.push(IndicatorPoint {
            timestamp: bars[i].timestamp,
            value,
        });
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
