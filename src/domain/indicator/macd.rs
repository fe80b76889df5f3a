//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line, seeded with the SMA of its first
//! `signal` defined values
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! Warmup: all three outputs become defined together at bar index
//! max(fast, slow) - 1 + signal - 1 (index 33, the 34th bar, for defaults).

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };
    let mut values: Vec<IndicatorPoint> = bars
        .iter()
        .map(|b| IndicatorPoint {
            timestamp: b.timestamp,
            value: None,
        })
        .collect();

    if fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, fast);
    let ema_slow = ema_values(&closes, slow);

    let line_start = fast.max(slow) - 1;
    if bars.len() <= line_start {
        return IndicatorSeries {
            indicator_type,
            values,
        };
    }

    let macd_line: Vec<f64> = ema_fast[line_start..]
        .iter()
        .zip(&ema_slow[line_start..])
        .filter_map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    for (offset, (&line, signal)) in macd_line.iter().zip(signal_line).enumerate() {
        if let Some(signal) = signal {
            values[line_start + offset].value = Some(IndicatorValue::Macd {
                line,
                signal,
                histogram: line - signal,
            });
        }
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}
