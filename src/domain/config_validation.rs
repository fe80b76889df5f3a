//! Configuration validation.
//!
//! Checks every `[data]`, `[indicators]` and `[signals]` value before any
//! series is loaded, so a bad INI file fails with a config exit code instead of
//! producing a silently skewed recommendation.

use crate::domain::aggregator::{AggregatorConfig, SignalWeights};
use crate::domain::engine::IndicatorConfig;
use crate::domain::error::CopilotError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use std::str::FromStr;

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> CopilotError {
    CopilotError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Parse `[section] key` when present. An unparsable value is an error, never
/// the default.
fn parse_key<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, CopilotError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| invalid(section, key, format!("{key} is not a valid number: {raw:?}"))),
    }
}

/// Signed read so a negative period is reported rather than a parse failure.
fn period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, CopilotError> {
    let value = parse_key::<i64>(config, "indicators", key, default as i64)?;
    if value <= 0 {
        return Err(invalid("indicators", key, format!("{key} must be a positive integer")));
    }
    usize::try_from(value).map_err(|_| invalid("indicators", key, "value out of range"))
}

fn signal_value(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, CopilotError> {
    parse_key(config, "signals", key, default)
}

pub fn build_indicator_config(config: &dyn ConfigPort) -> Result<IndicatorConfig, CopilotError> {
    let d = IndicatorConfig::default();
    let built = IndicatorConfig {
        sma_short: period(config, "sma_short", d.sma_short)?,
        sma_long: period(config, "sma_long", d.sma_long)?,
        rsi_period: period(config, "rsi_period", d.rsi_period)?,
        macd_fast: period(config, "macd_fast", d.macd_fast)?,
        macd_slow: period(config, "macd_slow", d.macd_slow)?,
        macd_signal: period(config, "macd_signal", d.macd_signal)?,
        volatility_window: period(config, "volatility_window", d.volatility_window)?,
        volume_window: period(config, "volume_window", d.volume_window)?,
    };
    validate_indicator_config(&built)?;
    Ok(built)
}

pub fn build_aggregator_config(config: &dyn ConfigPort) -> Result<AggregatorConfig, CopilotError> {
    let d = AggregatorConfig::default();
    let built = AggregatorConfig {
        weights: SignalWeights {
            trend: signal_value(config, "weight_trend", d.weights.trend)?,
            rsi: signal_value(config, "weight_rsi", d.weights.rsi)?,
            macd: signal_value(config, "weight_macd", d.weights.macd)?,
            sentiment: signal_value(config, "weight_sentiment", d.weights.sentiment)?,
        },
        rsi_overbought: signal_value(config, "rsi_overbought", d.rsi_overbought)?,
        rsi_oversold: signal_value(config, "rsi_oversold", d.rsi_oversold)?,
        sentiment_threshold: signal_value(config, "sentiment_threshold", d.sentiment_threshold)?,
        volatility_threshold: signal_value(
            config,
            "volatility_threshold",
            d.volatility_threshold,
        )?,
        volatility_dampening: signal_value(
            config,
            "volatility_dampening",
            d.volatility_dampening,
        )?,
        min_margin: signal_value(config, "min_margin", d.min_margin)?,
    };
    validate_signal_config(&built)?;
    Ok(built)
}

pub fn validate_indicator_config(c: &IndicatorConfig) -> Result<(), CopilotError> {
    let periods = [
        ("sma_short", c.sma_short),
        ("sma_long", c.sma_long),
        ("rsi_period", c.rsi_period),
        ("macd_fast", c.macd_fast),
        ("macd_slow", c.macd_slow),
        ("macd_signal", c.macd_signal),
        ("volatility_window", c.volatility_window),
        ("volume_window", c.volume_window),
    ];
    for (key, value) in periods {
        if value == 0 {
            return Err(invalid("indicators", key, format!("{key} must be positive")));
        }
    }
    if c.sma_short >= c.sma_long {
        return Err(invalid(
            "indicators",
            "sma_short",
            "sma_short must be less than sma_long",
        ));
    }
    if c.macd_fast >= c.macd_slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    Ok(())
}

pub fn validate_signal_config(c: &AggregatorConfig) -> Result<(), CopilotError> {
    let weights = [
        ("weight_trend", c.weights.trend),
        ("weight_rsi", c.weights.rsi),
        ("weight_macd", c.weights.macd),
        ("weight_sentiment", c.weights.sentiment),
    ];
    for (key, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid("signals", key, format!("{key} must be non-negative")));
        }
    }
    if c.weights.total() <= 0.0 {
        return Err(invalid(
            "signals",
            "weight_trend",
            "at least one signal weight must be positive",
        ));
    }

    if !(0.0..=100.0).contains(&c.rsi_oversold) || !(0.0..=100.0).contains(&c.rsi_overbought) {
        return Err(invalid(
            "signals",
            "rsi_overbought",
            "RSI thresholds must be between 0 and 100",
        ));
    }
    if c.rsi_oversold >= c.rsi_overbought {
        return Err(invalid(
            "signals",
            "rsi_oversold",
            "rsi_oversold must be less than rsi_overbought",
        ));
    }
    if !(0.0..1.0).contains(&c.sentiment_threshold) {
        return Err(invalid(
            "signals",
            "sentiment_threshold",
            "sentiment_threshold must be in [0, 1)",
        ));
    }
    if !c.volatility_threshold.is_finite() || c.volatility_threshold <= 0.0 {
        return Err(invalid(
            "signals",
            "volatility_threshold",
            "volatility_threshold must be positive",
        ));
    }
    if !(0.0..=1.0).contains(&c.volatility_dampening) {
        return Err(invalid(
            "signals",
            "volatility_dampening",
            "volatility_dampening must be between 0 and 1",
        ));
    }
    if !c.min_margin.is_finite() || c.min_margin < 0.0 {
        return Err(invalid(
            "signals",
            "min_margin",
            "min_margin must be non-negative",
        ));
    }
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), CopilotError> {
    let path = config
        .get_string("data", "path")
        .ok_or_else(|| CopilotError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        })?;
    if path.trim().is_empty() {
        return Err(invalid("data", "path", "path must not be empty"));
    }

    for key in ["symbols", "symbol"] {
        if let Some(list) = config.get_string("data", key) {
            parse_symbols(&list).map_err(|e| invalid("data", key, e.to_string()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn cfg(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid_key(result: Result<(), CopilotError>, expected: &str) {
        match result {
            Err(CopilotError::ConfigInvalid { key, .. }) => assert_eq!(key, expected),
            other => panic!("expected ConfigInvalid for {expected}, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_indicator_config(&IndicatorConfig::default()).is_ok());
        assert!(validate_signal_config(&AggregatorConfig::default()).is_ok());
    }

    #[test]
    fn empty_ini_builds_defaults() {
        let c = cfg("");
        assert_eq!(build_indicator_config(&c).unwrap(), IndicatorConfig::default());
        assert_eq!(build_aggregator_config(&c).unwrap(), AggregatorConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let c = cfg("[indicators]\nsma_short = 20\nsma_long = 100\n[signals]\nweight_rsi = 0.5\n");
        let ind = build_indicator_config(&c).unwrap();
        assert_eq!(ind.sma_short, 20);
        assert_eq!(ind.sma_long, 100);
        assert_eq!(ind.rsi_period, 14);
        assert_eq!(build_aggregator_config(&c).unwrap().weights.rsi, 0.5);
    }

    #[test]
    fn zero_period_rejected() {
        let config = IndicatorConfig {
            rsi_period: 0,
            ..IndicatorConfig::default()
        };
        assert_invalid_key(validate_indicator_config(&config), "rsi_period");
    }

    #[test]
    fn negative_period_in_ini_rejected() {
        let result = build_indicator_config(&cfg("[indicators]\nvolatility_window = -5\n"));
        assert!(matches!(
            result,
            Err(CopilotError::ConfigInvalid { key, .. }) if key == "volatility_window"
        ));
    }

    #[test]
    fn non_numeric_period_rejected() {
        let result = build_indicator_config(&cfg("[indicators]\nsma_short = fifty\n"));
        match result {
            Err(CopilotError::ConfigInvalid { section, key, reason }) => {
                assert_eq!(section, "indicators");
                assert_eq!(key, "sma_short");
                assert!(reason.contains("fifty"));
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn fractional_period_rejected() {
        let result = build_indicator_config(&cfg("[indicators]\nrsi_period = 14.5\n"));
        assert!(matches!(
            result,
            Err(CopilotError::ConfigInvalid { key, .. }) if key == "rsi_period"
        ));
    }

    #[test]
    fn non_numeric_weight_rejected() {
        let result = build_aggregator_config(&cfg("[signals]\nweight_trend = two\n"));
        assert!(matches!(
            result,
            Err(CopilotError::ConfigInvalid { section, key, .. })
                if section == "signals" && key == "weight_trend"
        ));
    }

    #[test]
    fn padded_numbers_parse() {
        let c = cfg("[signals]\nmin_margin =   0.5  \n");
        assert_eq!(build_aggregator_config(&c).unwrap().min_margin, 0.5);
    }

    #[test]
    fn sma_order_rejected() {
        let config = IndicatorConfig {
            sma_short: 200,
            sma_long: 50,
            ..IndicatorConfig::default()
        };
        assert_invalid_key(validate_indicator_config(&config), "sma_short");
    }

    #[test]
    fn macd_order_rejected() {
        let config = IndicatorConfig {
            macd_fast: 26,
            macd_slow: 26,
            ..IndicatorConfig::default()
        };
        assert_invalid_key(validate_indicator_config(&config), "macd_fast");
    }

    #[test]
    fn negative_weight_rejected() {
        let mut config = AggregatorConfig::default();
        config.weights.macd = -1.0;
        assert_invalid_key(validate_signal_config(&config), "weight_macd");
    }

    #[test]
    fn all_zero_weights_rejected() {
        let config = AggregatorConfig {
            weights: SignalWeights {
                trend: 0.0,
                rsi: 0.0,
                macd: 0.0,
                sentiment: 0.0,
            },
            ..AggregatorConfig::default()
        };
        assert!(validate_signal_config(&config).is_err());
    }

    #[test]
    fn inverted_rsi_thresholds_rejected() {
        let config = AggregatorConfig {
            rsi_oversold: 70.0,
            rsi_overbought: 30.0,
            ..AggregatorConfig::default()
        };
        assert_invalid_key(validate_signal_config(&config), "rsi_oversold");
    }

    #[test]
    fn sentiment_threshold_range() {
        let config = AggregatorConfig {
            sentiment_threshold: 1.0,
            ..AggregatorConfig::default()
        };
        assert_invalid_key(validate_signal_config(&config), "sentiment_threshold");
    }

    #[test]
    fn dampening_range() {
        let config = AggregatorConfig {
            volatility_dampening: 1.5,
            ..AggregatorConfig::default()
        };
        assert_invalid_key(validate_signal_config(&config), "volatility_dampening");

        let config = AggregatorConfig {
            volatility_dampening: 0.0,
            ..AggregatorConfig::default()
        };
        assert!(validate_signal_config(&config).is_ok());
    }

    #[test]
    fn data_path_required() {
        let result = validate_data_config(&cfg("[data]\nsymbols = NVDA\n"));
        assert!(matches!(
            result,
            Err(CopilotError::ConfigMissing { section, key }) if section == "data" && key == "path"
        ));
    }

    #[test]
    fn data_symbols_must_parse() {
        assert!(validate_data_config(&cfg("[data]\npath = quotes\nsymbols = NVDA, AAPL\n")).is_ok());
        assert_invalid_key(
            validate_data_config(&cfg("[data]\npath = quotes\nsymbols = NVDA,,AAPL\n")),
            "symbols",
        );
    }
}
