//! Indicator engine: turns a validated price series into snapshots.
//!
//! The engine owns only its window configuration. Every call recomputes from
//! the series it is given, so identical input always yields identical output.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::domain::indicator::{
    calculate_macd, calculate_rsi, calculate_sma, calculate_volatility, calculate_volume_sma,
    IndicatorSeries, IndicatorType, IndicatorValue,
};
use crate::domain::price_series::PriceSeries;

/// Lookback windows used by [`IndicatorEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub volatility_window: usize,
    pub volume_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: 50,
            sma_long: 200,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            volatility_window: 20,
            volume_window: 50,
        }
    }
}

/// Indicator values at one bar. `None` means the lookback is not yet filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub timestamp: Option<NaiveDateTime>,
    pub close: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    /// Percent standard deviation of returns.
    pub volatility: Option<f64>,
    pub avg_volume: Option<f64>,
}

impl IndicatorSnapshot {
    /// Percentage distance of the close above (positive) or below `level`.
    pub fn pct_from(&self, level: Option<f64>) -> Option<f64> {
        match (self.close, level) {
            (Some(close), Some(level)) if level != 0.0 => Some((close - level) / level * 100.0),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

struct ComputedSeries {
    sma_short: IndicatorSeries,
    sma_long: IndicatorSeries,
    rsi: IndicatorSeries,
    macd: IndicatorSeries,
    volatility: IndicatorSeries,
    avg_volume: IndicatorSeries,
}

impl ComputedSeries {
    /// Indicators whose value at the latest bar is still undefined.
    fn undefined_at_last(&self) -> Vec<&IndicatorType> {
        [
            &self.sma_short,
            &self.sma_long,
            &self.rsi,
            &self.macd,
            &self.volatility,
            &self.avg_volume,
        ]
        .into_iter()
        .filter(|s| s.values.last().is_some_and(|p| !p.is_defined()))
        .map(|s| &s.indicator_type)
        .collect()
    }
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    /// Snapshot for the most recent bar. An empty series gives an all-`None` snapshot.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSnapshot {
        if series.is_empty() {
            return IndicatorSnapshot::default();
        }
        let computed = self.compute_series(series);
        for warming in computed.undefined_at_last() {
            debug!(
                symbol = series.symbol(),
                indicator = %warming,
                bars = series.len(),
                "insufficient history, indicator undefined"
            );
        }
        let snapshot = snapshot_at(series, &computed, series.len() - 1);
        debug!(symbol = series.symbol(), bars = series.len(), ?snapshot, "computed indicators");
        snapshot
    }

    /// One snapshot per bar, parallel to `series.bars()`.
    pub fn compute_history(&self, series: &PriceSeries) -> Vec<IndicatorSnapshot> {
        let computed = self.compute_series(series);
        (0..series.len())
            .map(|i| snapshot_at(series, &computed, i))
            .collect()
    }

    fn compute_series(&self, series: &PriceSeries) -> ComputedSeries {
        let bars = series.bars();
        let c = &self.config;
        ComputedSeries {
            sma_short: calculate_sma(bars, c.sma_short),
            sma_long: calculate_sma(bars, c.sma_long),
            rsi: calculate_rsi(bars, c.rsi_period),
            macd: calculate_macd(bars, c.macd_fast, c.macd_slow, c.macd_signal),
            volatility: calculate_volatility(bars, c.volatility_window),
            avg_volume: calculate_volume_sma(bars, c.volume_window),
        }
    }
}

fn snapshot_at(series: &PriceSeries, computed: &ComputedSeries, i: usize) -> IndicatorSnapshot {
    let bar = &series.bars()[i];
    let (macd_line, macd_signal, macd_histogram) = match computed.macd.value_at(i) {
        Some(IndicatorValue::Macd {
            line,
            signal,
            histogram,
        }) => (Some(line), Some(signal), Some(histogram)),
        _ => (None, None, None),
    };

    IndicatorSnapshot {
        timestamp: Some(bar.timestamp),
        close: Some(bar.close),
        sma_short: computed.sma_short.simple_at(i),
        sma_long: computed.sma_long.simple_at(i),
        rsi: computed.rsi.simple_at(i),
        macd_line,
        macd_signal,
        macd_histogram,
        volatility: computed.volatility.simple_at(i),
        avg_volume: computed.avg_volume.simple_at(i),
    }
}

/// `computeIndicators` with the default windows.
pub fn compute_indicators(series: &PriceSeries) -> IndicatorSnapshot {
    IndicatorEngine::default().compute(series)
}
