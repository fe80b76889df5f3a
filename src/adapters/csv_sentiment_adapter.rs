//! Sentiment scores from a `symbol,score,rationale` CSV file.
//!
//! The file is read on every lookup so a refreshed file is picked up without
//! restarting.

use std::path::PathBuf;

use crate::domain::error::CopilotError;
use crate::domain::sentiment::SentimentScore;
use crate::ports::sentiment_port::SentimentPort;

pub struct CsvSentimentAdapter {
    path: PathBuf,
}

impl CsvSentimentAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn source_error(reason: String) -> CopilotError {
    CopilotError::SentimentSource { reason }
}

impl SentimentPort for CsvSentimentAdapter {
    fn sentiment_for(&self, symbol: &str) -> Result<Option<SentimentScore>, CopilotError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| source_error(format!("failed to open {}: {}", self.path.display(), e)))?;

        for result in rdr.records() {
            let record = result.map_err(|e| source_error(format!("CSV parse error: {}", e)))?;
            let Some(row_symbol) = record.get(0) else {
                continue;
            };
            if !row_symbol.trim().eq_ignore_ascii_case(symbol) {
                continue;
            }

            let raw = record.get(1).unwrap_or("").trim();
            let score: f64 = raw.parse().map_err(|e| {
                source_error(format!("invalid score {raw:?} for {symbol}: {e}"))
            })?;
            let rationale = record.get(2).unwrap_or("").trim();
            return SentimentScore::new(score, rationale).map(Some);
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn adapter_with(content: &str) -> (TempDir, CsvSentimentAdapter) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sentiment.csv");
        fs::write(&path, content).unwrap();
        (dir, CsvSentimentAdapter::new(path))
    }

    #[test]
    fn finds_symbol_case_insensitively() {
        let (_dir, adapter) = adapter_with(
            "symbol,score,rationale\nNVDA,0.6,\"Record revenue, raised guidance\"\nAAPL,-0.3,Weak China sales\n",
        );
        let s = adapter.sentiment_for("nvda").unwrap().unwrap();
        assert_eq!(s.score(), 0.6);
        assert_eq!(s.rationale(), "Record revenue, raised guidance");
    }

    #[test]
    fn unknown_symbol_is_none() {
        let (_dir, adapter) = adapter_with("symbol,score,rationale\nNVDA,0.6,ok\n");
        assert!(adapter.sentiment_for("MSFT").unwrap().is_none());
    }

    #[test]
    fn missing_rationale_column_is_allowed() {
        let (_dir, adapter) = adapter_with("symbol,score,rationale\nTSLA,-0.8\n");
        let s = adapter.sentiment_for("TSLA").unwrap().unwrap();
        assert_eq!(s.score(), -0.8);
        assert_eq!(s.rationale(), "");
    }

    #[test]
    fn out_of_range_score_is_error() {
        let (_dir, adapter) = adapter_with("symbol,score,rationale\nTSLA,2.0,hype\n");
        assert!(matches!(
            adapter.sentiment_for("TSLA"),
            Err(CopilotError::InvalidSentiment { .. })
        ));
    }

    #[test]
    fn unparsable_score_is_source_error() {
        let (_dir, adapter) = adapter_with("symbol,score,rationale\nTSLA,very good,hype\n");
        assert!(matches!(
            adapter.sentiment_for("TSLA"),
            Err(CopilotError::SentimentSource { .. })
        ));
    }

    #[test]
    fn missing_file_is_source_error() {
        let adapter = CsvSentimentAdapter::new(PathBuf::from("/nonexistent/sentiment.csv"));
        assert!(matches!(
            adapter.sentiment_for("NVDA"),
            Err(CopilotError::SentimentSource { .. })
        ));
    }
}
