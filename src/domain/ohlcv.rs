//! OHLCV bar representation.

use chrono::NaiveDateTime;

use crate::domain::error::BarError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Checks that every price and the volume is finite and non-negative.
    pub fn check_values(&self) -> Result<(), BarError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(BarError::NonFinite { field });
            }
            if value < 0.0 {
                return Err(BarError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Percentage change of this close relative to `prev_close`.
    /// `None` when the previous close is zero.
    pub fn pct_return(&self, prev_close: f64) -> Option<f64> {
        if prev_close == 0.0 {
            None
        } else {
            Some((self.close - prev_close) / prev_close)
        }
    }
}
