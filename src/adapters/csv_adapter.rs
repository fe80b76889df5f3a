//! CSV file data adapter.
//!
//! Reads `<SYMBOL>.csv` files with a `date,open,high,low,close,volume` header
//! from one directory, and writes per-bar indicator history.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use tracing::debug;

use crate::domain::engine::IndicatorSnapshot;
use crate::domain::error::CopilotError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_error(reason: String) -> CopilotError {
    CopilotError::DataSource { reason }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn number(record: &StringRecord, index: usize, name: &str, line: u64) -> Result<f64, CopilotError> {
    let raw = record
        .get(index)
        .ok_or_else(|| data_error(format!("line {line}: missing {name} column")))?;
    raw.trim()
        .parse()
        .map_err(|e| data_error(format!("line {line}: invalid {name} value {raw:?}: {e}")))
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, CopilotError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Err(CopilotError::NoData {
                symbol: symbol.to_string(),
            });
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            let line = record.position().map_or(0, |p| p.line());

            let date_str = record
                .get(0)
                .ok_or_else(|| data_error(format!("line {line}: missing date column")))?;
            let timestamp = parse_timestamp(date_str).ok_or_else(|| {
                data_error(format!("line {line}: invalid date format {date_str:?}"))
            })?;

            bars.push(OhlcvBar {
                timestamp,
                open: number(&record, 1, "open", line)?,
                high: number(&record, 2, "high", line)?,
                low: number(&record, 3, "low", line)?,
                close: number(&record, 4, "close", line)?,
                volume: number(&record, 5, "volume", line)?,
            });
        }

        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CopilotError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// Write one row per bar: timestamp, close and every indicator, blank when undefined.
pub fn write_history(
    path: &Path,
    series: &PriceSeries,
    history: &[IndicatorSnapshot],
) -> Result<(), CopilotError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| CopilotError::Report {
        reason: format!("failed to create {}: {}", path.display(), e),
    })?;
    let write_err = |e: csv::Error| CopilotError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    };

    wtr.write_record([
        "timestamp",
        "close",
        "sma_short",
        "sma_long",
        "rsi",
        "macd_line",
        "macd_signal",
        "macd_histogram",
        "volatility_pct",
        "avg_volume",
    ])
    .map_err(write_err)?;

    for (bar, snap) in series.bars().iter().zip(history) {
        wtr.write_record([
            bar.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("{:.6}", bar.close),
            cell(snap.sma_short),
            cell(snap.sma_long),
            cell(snap.rsi),
            cell(snap.macd_line),
            cell(snap.macd_signal),
            cell(snap.macd_histogram),
            cell(snap.volatility),
            cell(snap.avg_volume),
        ])
        .map_err(write_err)?;
    }

    wtr.flush()?;
    Ok(())
}
