//! Externally supplied news sentiment.

use crate::domain::error::CopilotError;

/// A sentiment reading in `[-1, 1]` with the text that justified it.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentScore {
    score: f64,
    rationale: String,
}

impl SentimentScore {
    pub fn new(score: f64, rationale: impl Into<String>) -> Result<Self, CopilotError> {
        if !score.is_finite() || !(-1.0..=1.0).contains(&score) {
            return Err(CopilotError::InvalidSentiment { value: score });
        }
        Ok(Self {
            score,
            rationale: rationale.into(),
        })
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(SentimentScore::new(-1.0, "").is_ok());
        assert!(SentimentScore::new(1.0, "").is_ok());
        let s = SentimentScore::new(0.35, "upbeat guidance").unwrap();
        assert_eq!(s.score(), 0.35);
        assert_eq!(s.rationale(), "upbeat guidance");
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            SentimentScore::new(1.5, "too hot"),
            Err(CopilotError::InvalidSentiment { .. })
        ));
        assert!(SentimentScore::new(-1.01, "").is_err());
    }

    #[test]
    fn rejects_nan() {
        assert!(SentimentScore::new(f64::NAN, "").is_err());
        assert!(SentimentScore::new(f64::INFINITY, "").is_err());
    }
}
