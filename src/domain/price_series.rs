//! Validated, append-only price history for a single symbol.
//!
//! [`PriceSeriesStore`] is the only way to build a [`PriceSeries`]: every bar
//! is checked on the way in (strictly increasing timestamps, finite and
//! non-negative values), so indicator code can assume clean input.

use crate::domain::error::{BarError, CopilotError};
use crate::domain::ohlcv::OhlcvBar;

/// Read-only view of a symbol's validated bars, oldest first.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct PriceSeriesStore {
    series: PriceSeries,
}

impl PriceSeriesStore {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            series: PriceSeries {
                symbol: symbol.into(),
                bars: Vec::new(),
            },
        }
    }

    /// Ingest a batch of bars in order, stopping at the first invalid one.
    pub fn from_bars(
        symbol: impl Into<String>,
        bars: impl IntoIterator<Item = OhlcvBar>,
    ) -> Result<Self, CopilotError> {
        let mut store = Self::new(symbol);
        for bar in bars {
            store.append(bar)?;
        }
        Ok(store)
    }

    pub fn append(&mut self, bar: OhlcvBar) -> Result<(), CopilotError> {
        let index = self.series.bars.len();
        self.check(&bar).map_err(|reason| CopilotError::InvalidBar {
            symbol: self.series.symbol.clone(),
            index,
            reason,
        })?;
        self.series.bars.push(bar);
        Ok(())
    }

    fn check(&self, bar: &OhlcvBar) -> Result<(), BarError> {
        bar.check_values()?;
        if let Some(prev) = self.series.bars.last() {
            if bar.timestamp <= prev.timestamp {
                return Err(BarError::NonMonotonicTimestamp {
                    previous: prev.timestamp.to_string(),
                    got: bar.timestamp.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn into_series(self) -> PriceSeries {
        self.series
    }
}
