//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use tracing::{info, warn};

use crate::adapters::csv_adapter::{self, CsvAdapter};
use crate::adapters::csv_sentiment_adapter::CsvSentimentAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::markdown_report_adapter::MarkdownReportAdapter;
use crate::domain::aggregator::SignalAggregator;
use crate::domain::analyst_reply::{parse_analyst_reply, AnalystOpinion};
use crate::domain::config_validation::{
    build_aggregator_config, build_indicator_config, validate_data_config,
};
use crate::domain::engine::{IndicatorEngine, IndicatorSnapshot};
use crate::domain::error::CopilotError;
use crate::domain::price_series::{PriceSeries, PriceSeriesStore};
use crate::domain::recommendation::{RecommendationReport, Verdict};
use crate::domain::sentiment::SentimentScore;
use crate::domain::signal::FactorStatus;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;
use crate::ports::sentiment_port::SentimentPort;

#[derive(Parser, Debug)]
#[command(
    name = "marketcopilot",
    about = "Stock indicators and Buy/Hold/Sell recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute indicators and a recommendation per symbol
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: Option<String>,
        /// Sentiment score in [-1, 1], overriding [sentiment] path
        #[arg(long, allow_hyphen_values = true)]
        sentiment: Option<f64>,
        #[arg(long, requires = "sentiment")]
        sentiment_note: Option<String>,
        /// Text reply from an analyst model to show as a second opinion
        #[arg(long)]
        analyst_reply: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the latest indicator snapshot for a symbol
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
    },
    /// Export per-bar indicator history as CSV
    History {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols with price data
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result: Result<u8, CopilotError> = match cli.command {
        Command::Analyze {
            config,
            symbol,
            sentiment,
            sentiment_note,
            analyst_reply,
            output_dir,
        } => run_analyze(&AnalyzeArgs {
            config,
            symbol,
            sentiment,
            sentiment_note,
            analyst_reply,
            output_dir,
        })
        .map(|outcome| outcome.exit_status()),
        Command::Indicators { config, symbol } => run_indicators(&config, &symbol).map(|()| 0),
        Command::History {
            config,
            symbol,
            output,
        } => run_history(&config, &symbol, &output).map(|()| 0),
        Command::Validate { config } => run_validate(&config).map(|()| 0),
        Command::ListSymbols { config } => run_list_symbols(&config).map(|()| 0),
    };

    match result {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CopilotError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| CopilotError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// `--symbol` wins over `[data] symbols`, which wins over `[data] symbol`.
pub fn resolve_symbols(
    symbol_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Vec<String>, CopilotError> {
    let (key, list) = match symbol_override {
        Some(s) => ("symbol", s.to_string()),
        None => match config
            .get_string("data", "symbols")
            .map(|s| ("symbols", s))
            .or_else(|| config.get_string("data", "symbol").map(|s| ("symbol", s)))
        {
            Some(found) => found,
            None => {
                return Err(CopilotError::ConfigMissing {
                    section: "data".into(),
                    key: "symbols".into(),
                });
            }
        },
    };
    parse_symbols(&list).map_err(|e| CopilotError::ConfigInvalid {
        section: "data".into(),
        key: key.into(),
        reason: e.to_string(),
    })
}

/// `--symbol` for commands that work on exactly one series.
pub fn resolve_single_symbol(symbol: &str) -> Result<String, CopilotError> {
    let mut symbols = parse_symbols(symbol).map_err(|e| CopilotError::InvalidArgument {
        arg: "symbol",
        reason: e.to_string(),
    })?;
    match symbols.pop() {
        Some(only) if symbols.is_empty() => Ok(only),
        _ => Err(CopilotError::InvalidArgument {
            arg: "symbol",
            reason: format!("expected a single symbol, got {symbol:?}"),
        }),
    }
}

pub fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, CopilotError> {
    let path = config
        .get_string("data", "path")
        .ok_or_else(|| CopilotError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

/// Fetch and validate a symbol's bars. An empty file is `NoData`.
pub fn load_series(data_port: &dyn DataPort, symbol: &str) -> Result<PriceSeries, CopilotError> {
    let bars = data_port.fetch_bars(symbol)?;
    if bars.is_empty() {
        return Err(CopilotError::NoData {
            symbol: symbol.to_string(),
        });
    }
    Ok(PriceSeriesStore::from_bars(symbol, bars)?.into_series())
}

/// Where per-symbol sentiment comes from for one run.
pub enum SentimentSource {
    /// Same score for every symbol, from the command line.
    Fixed(SentimentScore),
    File(CsvSentimentAdapter),
    Disabled,
}

impl SentimentPort for SentimentSource {
    fn sentiment_for(&self, symbol: &str) -> Result<Option<SentimentScore>, CopilotError> {
        match self {
            SentimentSource::Fixed(score) => Ok(Some(score.clone())),
            SentimentSource::File(adapter) => adapter.sentiment_for(symbol),
            SentimentSource::Disabled => Ok(None),
        }
    }
}

/// Full pipeline for one symbol: load, compute, fetch sentiment, aggregate.
///
/// A failing sentiment source does not fail the symbol; the vote proceeds on
/// indicators alone and the trace carries the failure reason.
pub fn analyze_symbol(
    data_port: &dyn DataPort,
    sentiment_port: &dyn SentimentPort,
    engine: &IndicatorEngine,
    aggregator: &SignalAggregator,
    symbol: &str,
) -> Result<RecommendationReport, CopilotError> {
    let series = load_series(data_port, symbol)?;
    let snapshot = engine.compute(&series);

    let (sentiment, recommendation) = match sentiment_port.sentiment_for(symbol) {
        Ok(sentiment) => {
            let rec = aggregator.aggregate(&snapshot, sentiment.as_ref());
            (sentiment, rec)
        }
        Err(e) => {
            warn!(symbol, error = %e, "sentiment unavailable, voting on indicators only");
            let rec = aggregator.aggregate_with_unavailable_sentiment(&snapshot, &e.to_string());
            (None, rec)
        }
    };

    info!(
        symbol,
        bars = series.len(),
        verdict = %recommendation.verdict,
        confidence = recommendation.confidence,
        "analyzed"
    );
    Ok(RecommendationReport::new(
        symbol,
        snapshot,
        sentiment,
        recommendation,
    ))
}

/// Analyze every symbol on its own scoped thread. Results keep input order.
pub fn analyze_symbols(
    data_port: &(dyn DataPort + Sync),
    sentiment_port: &(dyn SentimentPort + Sync),
    engine: &IndicatorEngine,
    aggregator: &SignalAggregator,
    symbols: &[String],
) -> Vec<(String, Result<RecommendationReport, CopilotError>)> {
    thread::scope(|scope| {
        let handles: Vec<_> = symbols
            .iter()
            .map(|symbol| {
                let handle = scope.spawn(move || {
                    analyze_symbol(data_port, sentiment_port, engine, aggregator, symbol)
                });
                (symbol, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(symbol, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(CopilotError::DataSource {
                        reason: format!("analysis of {symbol} panicked"),
                    })
                });
                (symbol.clone(), result)
            })
            .collect()
    })
}

pub struct AnalyzeArgs {
    pub config: PathBuf,
    pub symbol: Option<String>,
    pub sentiment: Option<f64>,
    pub sentiment_note: Option<String>,
    pub analyst_reply: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

fn sentiment_source(
    args: &AnalyzeArgs,
    config: &dyn ConfigPort,
) -> Result<SentimentSource, CopilotError> {
    if let Some(score) = args.sentiment {
        let note = args.sentiment_note.clone().unwrap_or_default();
        return Ok(SentimentSource::Fixed(SentimentScore::new(score, note)?));
    }
    Ok(match config.get_string("sentiment", "path") {
        Some(path) if !path.trim().is_empty() => {
            SentimentSource::File(CsvSentimentAdapter::new(PathBuf::from(path)))
        }
        _ => SentimentSource::Disabled,
    })
}

fn load_analyst_opinion(path: &Path) -> Result<AnalystOpinion, CopilotError> {
    let text = fs::read_to_string(path)?;
    let opinion = parse_analyst_reply(&text);
    if opinion.verdict.is_none() {
        warn!(path = %path.display(), "analyst reply has no recommendation line");
    }
    Ok(opinion)
}

/// Reports that were produced and the symbols that failed, in input order.
#[derive(Debug, Default)]
pub struct AnalyzeOutcome {
    pub reports: Vec<RecommendationReport>,
    pub failures: Vec<(String, CopilotError)>,
}

impl AnalyzeOutcome {
    /// Zero when every symbol succeeded, else the first failure's status.
    pub fn exit_status(&self) -> u8 {
        self.failures.first().map_or(0, |(_, e)| e.exit_status())
    }
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeOutcome, CopilotError> {
    let config = load_config(&args.config)?;
    validate_data_config(&config)?;
    let engine = IndicatorEngine::new(build_indicator_config(&config)?);
    let aggregator = SignalAggregator::new(build_aggregator_config(&config)?);

    let symbols = resolve_symbols(args.symbol.as_deref(), &config)?;
    if args.analyst_reply.is_some() && symbols.len() > 1 {
        return Err(CopilotError::InvalidArgument {
            arg: "analyst-reply",
            reason: format!(
                "a reply covers one symbol but {} were resolved; pass --symbol",
                symbols.len()
            ),
        });
    }
    let data_port = data_adapter(&config)?;
    let sentiment_port = sentiment_source(args, &config)?;
    let analyst = args
        .analyst_reply
        .as_deref()
        .map(load_analyst_opinion)
        .transpose()?;

    info!(symbols = symbols.len(), "analyzing");
    let results = analyze_symbols(&data_port, &sentiment_port, &engine, &aggregator, &symbols);

    let mut outcome = AnalyzeOutcome::default();
    for (symbol, result) in results {
        match result {
            Ok(report) => {
                let report = match &analyst {
                    Some(opinion) => report.with_analyst(opinion.clone()),
                    None => report,
                };
                print_report(&report);
                outcome.reports.push(report);
            }
            Err(e) => {
                eprintln!("error: {symbol}: {e}");
                outcome.failures.push((symbol, e));
            }
        }
    }

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.get_string("report", "output_dir").map(PathBuf::from));
    if let Some(dir) = output_dir {
        if !outcome.reports.is_empty() {
            fs::create_dir_all(&dir)?;
            MarkdownReportAdapter.write_all(&outcome.reports, &dir, "md")?;
            eprintln!("Reports written to: {}", dir.display());
        }
    }

    Ok(outcome)
}

pub fn buy_alert(report: &RecommendationReport) -> Option<String> {
    (report.verdict() == Verdict::Buy).then(|| {
        format!(
            "ALERT: {} is a BUY (confidence {:.0}%)",
            report.symbol(),
            report.recommendation().confidence * 100.0
        )
    })
}

fn print_report(report: &RecommendationReport) {
    let rec = report.recommendation();
    println!(
        "\n=== {}: {} (confidence {:.0}%) ===",
        report.symbol(),
        rec.verdict,
        rec.confidence * 100.0
    );
    for entry in rec.trace.entries() {
        let outcome = match &entry.status {
            FactorStatus::Voted(direction) => direction.to_string(),
            FactorStatus::Excluded { .. } => "excluded".to_string(),
            FactorStatus::ConfidenceModifier { multiplier } => format!("x{multiplier:.2}"),
        };
        println!(
            "  {:<10} {:<9} w={:.2}  {}",
            entry.signal.to_string(),
            outcome,
            entry.weight,
            entry.detail
        );
    }
    if let Some(agrees) = report.analyst_agrees() {
        println!(
            "  analyst {}",
            if agrees { "agrees" } else { "disagrees" }
        );
    }
    if let Some(alert) = buy_alert(report) {
        println!("{alert}");
    }
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

fn print_snapshot(symbol: &str, snapshot: &IndicatorSnapshot) {
    println!("{symbol}");
    if let Some(ts) = snapshot.timestamp {
        println!("  as of:          {ts}");
    }
    let rows = [
        ("close", snapshot.close),
        ("sma_short", snapshot.sma_short),
        ("sma_long", snapshot.sma_long),
        ("rsi", snapshot.rsi),
        ("macd_line", snapshot.macd_line),
        ("macd_signal", snapshot.macd_signal),
        ("macd_histogram", snapshot.macd_histogram),
        ("volatility_pct", snapshot.volatility),
        ("avg_volume", snapshot.avg_volume),
    ];
    for (name, value) in rows {
        println!("  {:<15} {}", format!("{name}:"), fmt_value(value));
    }
}

pub fn run_indicators(config_path: &Path, symbol: &str) -> Result<(), CopilotError> {
    let symbol = resolve_single_symbol(symbol)?;
    let config = load_config(config_path)?;
    let engine = IndicatorEngine::new(build_indicator_config(&config)?);
    let series = load_series(&data_adapter(&config)?, &symbol)?;
    print_snapshot(&symbol, &engine.compute(&series));
    Ok(())
}

pub fn run_history(config_path: &Path, symbol: &str, output: &Path) -> Result<(), CopilotError> {
    let symbol = resolve_single_symbol(symbol)?;
    let config = load_config(config_path)?;
    let engine = IndicatorEngine::new(build_indicator_config(&config)?);
    let series = load_series(&data_adapter(&config)?, &symbol)?;
    let history = engine.compute_history(&series);
    csv_adapter::write_history(output, &series, &history)?;
    eprintln!(
        "History for {} ({} bars) written to: {}",
        symbol,
        series.len(),
        output.display()
    );
    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), CopilotError> {
    let config = load_config(config_path)?;
    validate_data_config(&config)?;
    let indicators = build_indicator_config(&config)?;
    let signals = build_aggregator_config(&config)?;

    eprintln!("Indicators:");
    eprintln!(
        "  SMA {}/{}, RSI {}, MACD {}/{}/{}, volatility {}, volume {}",
        indicators.sma_short,
        indicators.sma_long,
        indicators.rsi_period,
        indicators.macd_fast,
        indicators.macd_slow,
        indicators.macd_signal,
        indicators.volatility_window,
        indicators.volume_window
    );
    eprintln!("Signals:");
    eprintln!(
        "  weights trend={} rsi={} macd={} sentiment={}",
        signals.weights.trend, signals.weights.rsi, signals.weights.macd, signals.weights.sentiment
    );
    eprintln!(
        "  RSI {}/{}, sentiment ±{}, volatility {}% (x{}), min margin {}",
        signals.rsi_oversold,
        signals.rsi_overbought,
        signals.sentiment_threshold,
        signals.volatility_threshold,
        signals.volatility_dampening,
        signals.min_margin
    );
    match resolve_symbols(None, &config) {
        Ok(symbols) => eprintln!("Symbols: {}", symbols.join(", ")),
        Err(_) => eprintln!("Symbols: none configured (use --symbol)"),
    }

    eprintln!("\nConfiguration is valid.");
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), CopilotError> {
    let config = load_config(config_path)?;
    let symbols = data_adapter(&config)?.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}
