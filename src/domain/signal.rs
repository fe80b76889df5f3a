//! Signals, votes and the rationale trace behind a recommendation.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bullish => write!(f, "bullish"),
            Direction::Bearish => write!(f, "bearish"),
            Direction::Neutral => write!(f, "neutral"),
        }
    }
}

/// Every input the aggregator considers. Each appears once per trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Trend,
    Rsi,
    Macd,
    Sentiment,
    Volatility,
}

impl Signal {
    pub const ALL: [Signal; 5] = [
        Signal::Trend,
        Signal::Rsi,
        Signal::Macd,
        Signal::Sentiment,
        Signal::Volatility,
    ];
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Trend => write!(f, "trend"),
            Signal::Rsi => write!(f, "rsi"),
            Signal::Macd => write!(f, "macd"),
            Signal::Sentiment => write!(f, "sentiment"),
            Signal::Volatility => write!(f, "volatility"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FactorStatus {
    Voted(Direction),
    /// Left out of the vote, e.g. undefined indicator or missing sentiment.
    Excluded { reason: String },
    /// Scales confidence without voting.
    ConfidenceModifier { multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RationaleEntry {
    pub signal: Signal,
    pub status: FactorStatus,
    pub weight: f64,
    pub detail: String,
}

impl RationaleEntry {
    /// Direction this factor pushed in. Modifiers are neutral; exclusions have none.
    pub fn direction(&self) -> Option<Direction> {
        match self.status {
            FactorStatus::Voted(d) => Some(d),
            FactorStatus::ConfidenceModifier { .. } => Some(Direction::Neutral),
            FactorStatus::Excluded { .. } => None,
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self.status, FactorStatus::Excluded { .. })
    }
}

/// Ordered record of how each signal was treated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RationaleTrace {
    entries: Vec<RationaleEntry>,
}

impl RationaleTrace {
    pub(crate) fn push(&mut self, entry: RationaleEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RationaleEntry] {
        &self.entries
    }

    pub fn get(&self, signal: Signal) -> Option<&RationaleEntry> {
        self.entries.iter().find(|e| e.signal == signal)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &RationaleEntry> {
        self.entries.iter().filter(|e| e.is_excluded())
    }

    /// Total weight voting in `direction`.
    pub fn weight_for(&self, direction: Direction) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.status == FactorStatus::Voted(direction))
            .map(|e| e.weight)
            .sum()
    }

    /// Total weight of all signals that cast a vote.
    pub fn participating_weight(&self) -> f64 {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, FactorStatus::Voted(_)))
            .map(|e| e.weight)
            .sum()
    }
}
