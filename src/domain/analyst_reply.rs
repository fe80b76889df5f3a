//! Extraction of a structured opinion from a language-model analyst reply.
//!
//! Expected shape (lenient about case, markdown emphasis and blank lines):
//!
//! ```text
//! Recommendation: Buy
//! Reasons:
//! - Reason 1
//! - Reason 2
//! - Reason 3
//! Targets:
//! - Conservative: $X
//! - Aggressive: $Y
//! ```

use crate::domain::recommendation::Verdict;

pub const MAX_KEY_POINTS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalystOpinion {
    pub verdict: Option<Verdict>,
    pub key_points: Vec<String>,
    pub conservative_target: Option<String>,
    pub aggressive_target: Option<String>,
}

pub fn parse_analyst_reply(text: &str) -> AnalystOpinion {
    let mut opinion = AnalystOpinion::default();
    let mut in_reasons = false;

    for raw in text.lines() {
        let line = raw.trim();
        let lower = line.to_lowercase();

        if opinion.verdict.is_none() && lower.contains("recommendation:") {
            opinion.verdict = after_colon(line).and_then(Verdict::parse_loose);
            continue;
        }
        if lower.contains("reasons:") {
            in_reasons = true;
            continue;
        }
        if lower.contains("targets:") {
            in_reasons = false;
            continue;
        }
        if lower.contains("conservative:") {
            opinion.conservative_target = target_value(line);
            continue;
        }
        if lower.contains("aggressive:") {
            opinion.aggressive_target = target_value(line);
            continue;
        }
        if in_reasons && opinion.key_points.len() < MAX_KEY_POINTS {
            if let Some(point) = line.strip_prefix('-').map(str::trim) {
                if !point.is_empty() {
                    opinion.key_points.push(point.to_string());
                }
            }
        }
    }

    opinion
}

fn after_colon(line: &str) -> Option<&str> {
    line.rsplit_once(':').map(|(_, rest)| rest.trim())
}

/// Value after the last `$`, or after the colon when no currency sign is present.
fn target_value(line: &str) -> Option<String> {
    let value = match line.rsplit_once('$') {
        Some((_, rest)) => rest.trim(),
        None => after_colon(line)?,
    };
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
