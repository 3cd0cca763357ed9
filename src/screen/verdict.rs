// Verdict normalization — turns a raw execution attempt into exactly one
// FilterResult.
//
// The filter uses its exit code as control flow: 0 means "evaluated, safe",
// 1 means "evaluated, blocked" — both carry a JSON verdict on stdout and
// both are successes of the tool. Anything else, or unparseable stdout, is
// a failure of the tool itself and is never reinterpreted as an unsafe
// verdict.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::engine::RawOutcome;

/// The structured verdict printed by the filter on stdout.
///
/// `score` stays optional end to end: a filter that reports no score is not
/// the same as one that reports 0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub safe: bool,
    pub score: Option<f64>,
    pub reason: Option<String>,
    #[serde(default)]
    pub matched_rules: Vec<String>,
    pub filtered_content: Option<String>,
}

/// The normalized, caller-facing outcome of one check.
#[derive(Debug, Clone)]
pub enum FilterResult {
    /// The filter ran and evaluated the content (safe or blocked).
    Evaluated(Verdict),
    /// The filter itself failed: spawn error, timeout, unexpected exit
    /// status, or unparseable output.
    ToolFailure { message: String },
}

impl FilterResult {
    /// Interpret one execution attempt. Spawn/timeout errors take precedence
    /// over everything; exit codes 0 and 1 both mean stdout carries a
    /// verdict; any other status is a tool failure with stderr attached for
    /// diagnosis.
    pub fn normalize(attempt: Result<RawOutcome>) -> Self {
        let outcome = match attempt {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "filter execution failed");
                return FilterResult::ToolFailure {
                    message: format!("{e:#}"),
                };
            }
        };

        match outcome.status {
            Some(0) | Some(1) => match serde_json::from_str::<Verdict>(&outcome.stdout) {
                Ok(verdict) => FilterResult::Evaluated(verdict),
                Err(e) => {
                    warn!(error = %e, "filter produced unparseable output");
                    FilterResult::ToolFailure {
                        message: format!("failed to parse filter output: {e}"),
                    }
                }
            },
            status => {
                let status_desc = match status {
                    Some(code) => format!("exit status {code}"),
                    None => "termination by signal".to_string(),
                };
                let stderr = outcome.stderr.trim();
                let message = if stderr.is_empty() {
                    format!("filter failed with {status_desc}")
                } else {
                    format!("filter failed with {status_desc}: {stderr}")
                };
                warn!(message = %message, "unexpected filter exit");
                FilterResult::ToolFailure { message }
            }
        }
    }

    /// Resolve to displayable text.
    ///
    /// Safe content passes through unchanged; blocked content becomes the
    /// filter's sanitized rendition when it offered one, else `fallback`.
    /// Policy: `ToolFailure` also resolves to `fallback` — when the filter
    /// could not run we never show the unscreened original.
    pub fn resolve_text<'a>(&'a self, original: &'a str, fallback: &'a str) -> &'a str {
        match self {
            FilterResult::Evaluated(v) if v.safe => original,
            FilterResult::Evaluated(v) => v.filtered_content.as_deref().unwrap_or(fallback),
            FilterResult::ToolFailure { .. } => fallback,
        }
    }

    /// True when the filter evaluated the content and judged it safe.
    /// Tool failures are not safe.
    pub fn is_safe(&self) -> bool {
        matches!(self, FilterResult::Evaluated(v) if v.safe)
    }
}
