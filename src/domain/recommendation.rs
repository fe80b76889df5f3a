//! Recommendation verdicts and the report handed to presentation.

use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::analyst_reply::AnalystOpinion;
use crate::domain::engine::IndicatorSnapshot;
use crate::domain::sentiment::SentimentScore;
use crate::domain::signal::RationaleTrace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Buy,
    Hold,
    Sell,
}

impl Verdict {
    /// Lenient parse of free text such as "**Strong Buy**" or "sell".
    pub fn parse_loose(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("sell") {
            Some(Verdict::Sell)
        } else if lower.contains("buy") {
            Some(Verdict::Buy)
        } else if lower.contains("hold") {
            Some(Verdict::Hold)
        } else {
            None
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Buy => write!(f, "Buy"),
            Verdict::Hold => write!(f, "Hold"),
            Verdict::Sell => write!(f, "Sell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub verdict: Verdict,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub trace: RationaleTrace,
}

/// Everything that went into one evaluation of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationReport {
    symbol: String,
    snapshot: IndicatorSnapshot,
    sentiment: Option<SentimentScore>,
    recommendation: Recommendation,
    analyst: Option<AnalystOpinion>,
}

impl RecommendationReport {
    pub fn new(
        symbol: impl Into<String>,
        snapshot: IndicatorSnapshot,
        sentiment: Option<SentimentScore>,
        recommendation: Recommendation,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            snapshot,
            sentiment,
            recommendation,
            analyst: None,
        }
    }

    pub fn with_analyst(mut self, opinion: AnalystOpinion) -> Self {
        self.analyst = Some(opinion);
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn as_of(&self) -> Option<NaiveDateTime> {
        self.snapshot.timestamp
    }

    pub fn snapshot(&self) -> &IndicatorSnapshot {
        &self.snapshot
    }

    pub fn sentiment(&self) -> Option<&SentimentScore> {
        self.sentiment.as_ref()
    }

    pub fn recommendation(&self) -> &Recommendation {
        &self.recommendation
    }

    pub fn verdict(&self) -> Verdict {
        self.recommendation.verdict
    }

    pub fn analyst(&self) -> Option<&AnalystOpinion> {
        self.analyst.as_ref()
    }

    /// Whether the analyst's stated verdict matches ours. `None` without one.
    pub fn analyst_agrees(&self) -> Option<bool> {
        self.analyst
            .as_ref()
            .and_then(|a| a.verdict)
            .map(|v| v == self.recommendation.verdict)
    }
}
