#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use marketcopilot::domain::error::CopilotError;
pub use marketcopilot::domain::ohlcv::OhlcvBar;
use marketcopilot::domain::price_series::{PriceSeries, PriceSeriesStore};
use marketcopilot::domain::sentiment::SentimentScore;
use marketcopilot::ports::data_port::DataPort;
use marketcopilot::ports::sentiment_port::SentimentPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, CopilotError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CopilotError::DataSource {
                reason: reason.clone(),
            });
        }
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| CopilotError::NoData {
                symbol: symbol.to_string(),
            })
    }

    fn list_symbols(&self) -> Result<Vec<String>, CopilotError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub struct MockSentimentPort {
    pub scores: HashMap<String, f64>,
    pub failure: Option<String>,
}

impl MockSentimentPort {
    pub fn new() -> Self {
        Self {
            scores: HashMap::new(),
            failure: None,
        }
    }

    pub fn with_score(mut self, symbol: &str, score: f64) -> Self {
        self.scores.insert(symbol.to_string(), score);
        self
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            scores: HashMap::new(),
            failure: Some(reason.to_string()),
        }
    }
}

impl SentimentPort for MockSentimentPort {
    fn sentiment_for(&self, symbol: &str) -> Result<Option<SentimentScore>, CopilotError> {
        if let Some(reason) = &self.failure {
            return Err(CopilotError::SentimentSource {
                reason: reason.clone(),
            });
        }
        self.scores
            .get(symbol)
            .map(|&score| SentimentScore::new(score, "mock headline"))
            .transpose()
    }
}

pub fn day(i: usize) -> NaiveDateTime {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    start + Duration::days(i as i64)
}

pub fn make_bar(i: usize, close: f64) -> OhlcvBar {
    OhlcvBar {
        timestamp: day(i),
        open: close,
        high: close + 1.0,
        low: (close - 1.0).max(0.0),
        close,
        volume: 1_000.0,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c))
        .collect()
}

/// Closes rising by `step` per bar from `start`.
pub fn rising_bars(count: usize, start: f64, step: f64) -> Vec<OhlcvBar> {
    (0..count).map(|i| make_bar(i, start + step * i as f64)).collect()
}

pub fn falling_bars(count: usize, start: f64, step: f64) -> Vec<OhlcvBar> {
    (0..count).map(|i| make_bar(i, start - step * i as f64)).collect()
}

pub fn make_series(symbol: &str, bars: Vec<OhlcvBar>) -> PriceSeries {
    PriceSeriesStore::from_bars(symbol, bars).unwrap().into_series()
}

/// `date,open,high,low,close,volume` CSV text for `bars`.
pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.timestamp.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    out
}
