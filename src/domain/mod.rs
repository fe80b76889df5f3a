//! Core domain types and logic: price series, indicators, signal aggregation.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod engine;
pub mod sentiment;
pub mod signal;
pub mod aggregator;
pub mod recommendation;
pub mod analyst_reply;
pub mod config_validation;
pub mod universe;
pub mod error;
