//! Markdown report adapter implementing ReportPort.
//!
//! Renders the price overview, indicator table, rationale trace, sentiment and
//! any analyst second opinion for one symbol.

use std::fs;
use std::path::Path;

use crate::domain::analyst_reply::AnalystOpinion;
use crate::domain::engine::IndicatorSnapshot;
use crate::domain::error::CopilotError;
use crate::domain::recommendation::{Recommendation, RecommendationReport};
use crate::domain::sentiment::SentimentScore;
use crate::domain::signal::FactorStatus;
use crate::ports::report_port::ReportPort;

pub struct MarkdownReportAdapter;

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "n/a".to_string(),
    }
}

fn fmt_delta(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:+.1}%"),
        None => "n/a".to_string(),
    }
}

pub fn render(report: &RecommendationReport) -> String {
    let mut output = String::new();

    output.push_str(&render_header(report));
    output.push_str(&render_verdict(report.recommendation()));
    output.push_str(&render_price_overview(report.snapshot()));
    output.push_str(&render_indicators(report.snapshot()));
    output.push_str(&render_rationale(report.recommendation()));
    output.push_str(&render_sentiment(report.sentiment()));

    if let Some(analyst) = report.analyst() {
        output.push_str(&render_analyst(analyst, report.analyst_agrees()));
    }

    output
}

fn render_header(report: &RecommendationReport) -> String {
    let mut s = format!("# {} recommendation\n", report.symbol());
    if let Some(as_of) = report.as_of() {
        s.push_str(&format!("\n_As of {}_\n", as_of.format("%Y-%m-%d %H:%M")));
    }
    s
}

fn render_verdict(rec: &Recommendation) -> String {
    format!(
        "\n## Verdict\n\n**{}** (confidence {:.0}%)\n",
        rec.verdict,
        rec.confidence * 100.0
    )
}

fn render_price_overview(snap: &IndicatorSnapshot) -> String {
    let mut s = String::from("\n## Price overview\n\n");
    s.push_str("| Metric | Value | Close vs. level |\n");
    s.push_str("|---|---|---|\n");
    s.push_str(&format!("| Close | {} | |\n", fmt_opt(snap.close, 2)));
    s.push_str(&format!(
        "| Short SMA | {} | {} |\n",
        fmt_opt(snap.sma_short, 2),
        fmt_delta(snap.pct_from(snap.sma_short))
    ));
    s.push_str(&format!(
        "| Long SMA | {} | {} |\n",
        fmt_opt(snap.sma_long, 2),
        fmt_delta(snap.pct_from(snap.sma_long))
    ));
    s
}

fn render_indicators(snap: &IndicatorSnapshot) -> String {
    let rows = [
        ("RSI", fmt_opt(snap.rsi, 2)),
        ("MACD line", fmt_opt(snap.macd_line, 4)),
        ("MACD signal", fmt_opt(snap.macd_signal, 4)),
        ("MACD histogram", fmt_opt(snap.macd_histogram, 4)),
        ("Volatility (%)", fmt_opt(snap.volatility, 2)),
        ("Average volume", fmt_opt(snap.avg_volume, 0)),
    ];

    let mut s = String::from("\n## Indicators\n\n");
    s.push_str("| Indicator | Value |\n");
    s.push_str("|---|---|\n");
    for (name, value) in rows {
        s.push_str(&format!("| {name} | {value} |\n"));
    }
    s
}

fn render_rationale(rec: &Recommendation) -> String {
    let mut s = String::from("\n## Rationale\n\n");
    s.push_str("| Signal | Outcome | Weight | Detail |\n");
    s.push_str("|---|---|---|---|\n");
    for entry in rec.trace.entries() {
        let outcome = match &entry.status {
            FactorStatus::Voted(direction) => direction.to_string(),
            FactorStatus::Excluded { .. } => "excluded".to_string(),
            FactorStatus::ConfidenceModifier { multiplier } => format!("confidence x{multiplier:.2}"),
        };
        s.push_str(&format!(
            "| {} | {} | {:.2} | {} |\n",
            entry.signal, outcome, entry.weight, entry.detail
        ));
    }
    s
}

fn render_sentiment(sentiment: Option<&SentimentScore>) -> String {
    let mut s = String::from("\n## News sentiment\n\n");
    match sentiment {
        Some(score) => {
            s.push_str(&format!("Score {:+.2}\n", score.score()));
            if !score.rationale().is_empty() {
                s.push_str(&format!("\n> {}\n", score.rationale()));
            }
        }
        None => s.push_str("No sentiment available.\n"),
    }
    s
}

fn render_analyst(analyst: &AnalystOpinion, agrees: Option<bool>) -> String {
    let verdict = analyst
        .verdict
        .map_or_else(|| "not stated".to_string(), |v| v.to_string());
    let agreement = match agrees {
        Some(true) => " (agrees)",
        Some(false) => " (disagrees)",
        None => "",
    };

    let mut s = format!("\n## Analyst opinion\n\nVerdict: {verdict}{agreement}\n");
    for point in &analyst.key_points {
        s.push_str(&format!("- {point}\n"));
    }
    if let Some(t) = &analyst.conservative_target {
        s.push_str(&format!("\nConservative target: ${t}\n"));
    }
    if let Some(t) = &analyst.aggressive_target {
        s.push_str(&format!("\nAggressive target: ${t}\n"));
    }
    s
}

impl ReportPort for MarkdownReportAdapter {
    fn write(
        &self,
        report: &RecommendationReport,
        output_path: &Path,
    ) -> Result<(), CopilotError> {
        fs::write(output_path, render(report)).map_err(|e| CopilotError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })
    }
}
