//! Weighted-vote aggregation of indicator and sentiment signals.
//!
//! Each defined signal votes bullish, bearish or neutral with a fixed weight.
//! The verdict follows the heavier side; equal weight (or a margin below
//! `min_margin`) is a Hold. Undefined indicators and missing sentiment are
//! excluded from the vote and recorded as such. Volatility never votes: above
//! its threshold it scales confidence down.

use tracing::debug;

use crate::domain::engine::IndicatorSnapshot;
use crate::domain::recommendation::{Recommendation, Verdict};
use crate::domain::sentiment::SentimentScore;
use crate::domain::signal::{Direction, FactorStatus, RationaleEntry, RationaleTrace, Signal};

/// Weighted sums closer than this are a tie.
const TIE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct SignalWeights {
    pub trend: f64,
    pub rsi: f64,
    pub macd: f64,
    pub sentiment: f64,
}

impl SignalWeights {
    pub fn total(&self) -> f64 {
        self.trend + self.rsi + self.macd + self.sentiment
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            trend: 2.0,
            rsi: 1.0,
            macd: 2.0,
            sentiment: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    pub weights: SignalWeights,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub sentiment_threshold: f64,
    /// Percent volatility above which confidence is dampened.
    pub volatility_threshold: f64,
    /// Confidence multiplier applied above the volatility threshold.
    pub volatility_dampening: f64,
    pub min_margin: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            sentiment_threshold: 0.2,
            volatility_threshold: 3.0,
            volatility_dampening: 0.5,
            min_margin: 1.0,
        }
    }
}

enum SentimentInput<'a> {
    Present(&'a SentimentScore),
    Missing,
    Unavailable(&'a str),
}

#[derive(Debug, Clone, Default)]
pub struct SignalAggregator {
    config: AggregatorConfig,
}

impl SignalAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn aggregate(
        &self,
        snapshot: &IndicatorSnapshot,
        sentiment: Option<&SentimentScore>,
    ) -> Recommendation {
        let input = match sentiment {
            Some(s) => SentimentInput::Present(s),
            None => SentimentInput::Missing,
        };
        self.evaluate(snapshot, input)
    }

    /// Aggregate when the sentiment source failed; `reason` lands in the trace.
    pub fn aggregate_with_unavailable_sentiment(
        &self,
        snapshot: &IndicatorSnapshot,
        reason: &str,
    ) -> Recommendation {
        self.evaluate(snapshot, SentimentInput::Unavailable(reason))
    }

    fn evaluate(
        &self,
        snapshot: &IndicatorSnapshot,
        sentiment: SentimentInput<'_>,
    ) -> Recommendation {
        let mut trace = RationaleTrace::default();
        trace.push(self.trend_vote(snapshot));
        trace.push(self.rsi_vote(snapshot));
        trace.push(self.macd_vote(snapshot));
        trace.push(self.sentiment_vote(sentiment));
        let volatility = self.volatility_factor(snapshot);
        let multiplier = match volatility.status {
            FactorStatus::ConfidenceModifier { multiplier } => multiplier,
            _ => 1.0,
        };
        trace.push(volatility);

        let bullish = trace.weight_for(Direction::Bullish);
        let bearish = trace.weight_for(Direction::Bearish);
        let participating = trace.participating_weight();
        let net = bullish - bearish;

        let verdict = if net.abs() < TIE_EPSILON || net.abs() < self.config.min_margin {
            Verdict::Hold
        } else if net > 0.0 {
            Verdict::Buy
        } else {
            Verdict::Sell
        };

        let base = if participating <= 0.0 {
            0.0
        } else {
            match verdict {
                Verdict::Hold => trace.weight_for(Direction::Neutral) / participating,
                Verdict::Buy | Verdict::Sell => net.abs() / participating,
            }
        };
        let confidence = (base * multiplier).clamp(0.0, 1.0);

        debug!(%verdict, bullish, bearish, participating, confidence, "aggregated signals");

        Recommendation {
            verdict,
            confidence,
            trace,
        }
    }

    fn trend_vote(&self, s: &IndicatorSnapshot) -> RationaleEntry {
        let weight = self.config.weights.trend;
        match (s.sma_short, s.sma_long) {
            (Some(short), Some(long)) => {
                let (direction, relation) = if short > long {
                    (Direction::Bullish, "above")
                } else if short < long {
                    (Direction::Bearish, "below")
                } else {
                    (Direction::Neutral, "equal to")
                };
                voted(
                    Signal::Trend,
                    direction,
                    weight,
                    format!("short SMA {short:.2} {relation} long SMA {long:.2}"),
                )
            }
            (None, _) => excluded(
                Signal::Trend,
                weight,
                "short SMA undefined (insufficient history)",
            ),
            (_, None) => excluded(
                Signal::Trend,
                weight,
                "long SMA undefined (insufficient history)",
            ),
        }
    }

    fn rsi_vote(&self, s: &IndicatorSnapshot) -> RationaleEntry {
        let weight = self.config.weights.rsi;
        let Some(rsi) = s.rsi else {
            return excluded(Signal::Rsi, weight, "RSI undefined (insufficient history)");
        };
        let (direction, label) = if rsi > self.config.rsi_overbought {
            (Direction::Bearish, "overbought")
        } else if rsi < self.config.rsi_oversold {
            (Direction::Bullish, "oversold")
        } else {
            (Direction::Neutral, "in range")
        };
        voted(Signal::Rsi, direction, weight, format!("RSI {rsi:.2} {label}"))
    }

    fn macd_vote(&self, s: &IndicatorSnapshot) -> RationaleEntry {
        let weight = self.config.weights.macd;
        let Some(histogram) = s.macd_histogram else {
            return excluded(Signal::Macd, weight, "MACD undefined (insufficient history)");
        };
        let direction = if histogram > 0.0 {
            Direction::Bullish
        } else if histogram < 0.0 {
            Direction::Bearish
        } else {
            Direction::Neutral
        };
        voted(
            Signal::Macd,
            direction,
            weight,
            format!("MACD histogram {histogram:.4}"),
        )
    }

    fn sentiment_vote(&self, input: SentimentInput<'_>) -> RationaleEntry {
        let weight = self.config.weights.sentiment;
        let score = match input {
            SentimentInput::Present(s) => s.score(),
            SentimentInput::Missing => {
                return excluded(Signal::Sentiment, weight, "sentiment not supplied");
            }
            SentimentInput::Unavailable(reason) => {
                return excluded(
                    Signal::Sentiment,
                    weight,
                    &format!("sentiment unavailable: {reason}"),
                );
            }
        };
        let threshold = self.config.sentiment_threshold;
        let direction = if score > threshold {
            Direction::Bullish
        } else if score < -threshold {
            Direction::Bearish
        } else {
            Direction::Neutral
        };
        voted(
            Signal::Sentiment,
            direction,
            weight,
            format!("sentiment score {score:+.2}"),
        )
    }

    fn volatility_factor(&self, s: &IndicatorSnapshot) -> RationaleEntry {
        let Some(vol) = s.volatility else {
            return excluded(
                Signal::Volatility,
                0.0,
                "volatility undefined (insufficient history)",
            );
        };
        let threshold = self.config.volatility_threshold;
        let (multiplier, detail) = if vol > threshold {
            (
                self.config.volatility_dampening,
                format!("volatility {vol:.2}% above {threshold:.2}%, confidence dampened"),
            )
        } else {
            (1.0, format!("volatility {vol:.2}% within {threshold:.2}%"))
        };
        RationaleEntry {
            signal: Signal::Volatility,
            status: FactorStatus::ConfidenceModifier { multiplier },
            weight: 0.0,
            detail,
        }
    }
}

fn voted(signal: Signal, direction: Direction, weight: f64, detail: String) -> RationaleEntry {
    RationaleEntry {
        signal,
        status: FactorStatus::Voted(direction),
        weight,
        detail,
    }
}

fn excluded(signal: Signal, weight: f64, reason: &str) -> RationaleEntry {
    RationaleEntry {
        signal,
        status: FactorStatus::Excluded {
            reason: reason.to_string(),
        },
        weight,
        detail: reason.to_string(),
    }
}

/// `aggregate` with the default weights and thresholds.
pub fn aggregate(
    snapshot: &IndicatorSnapshot,
    sentiment: Option<&SentimentScore>,
) -> Recommendation {
    SignalAggregator::default().aggregate(snapshot, sentiment)
}
