//! Log projections served by the backend.
//!
//! Live log lines are opaque text classified by keyword. The analysis log is
//! a CSV export with one row per AI decision; [`parse_analysis_csv`] turns it
//! into [`CsvLogEntry`] records keyed by header name.

use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// File name used when saving the analysis export.
pub const ANALYSIS_LOG_FILENAME: &str = "ai_analysis_log.csv";

/// Number of live lines requested by default.
pub const DEFAULT_LOG_LIMIT: usize = 100;

// ── LogLevel ──────────────────────────────────────────────────────────────────

/// Severity inferred from a live log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Error,
    Success,
    Warning,
    Info,
    Default,
}

impl LogLevel {
    /// Classify a line by the first matching keyword:
    /// `ERROR`, `SUCCESS`, `WARNING`, `INFO`.
    pub fn classify(line: &str) -> Self {
        if line.contains("ERROR") {
            LogLevel::Error
        } else if line.contains("SUCCESS") {
            LogLevel::Success
        } else if line.contains("WARNING") {
            LogLevel::Warning
        } else if line.contains("INFO") {
            LogLevel::Info
        } else {
            LogLevel::Default
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Success => "success",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Default => "default",
        }
    }
}

// ── CsvLogEntry ───────────────────────────────────────────────────────────────

/// One row of the AI analysis export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvLogEntry {
    pub timestamp: String,
    /// `LIVE_MODE` or `TEST_MODE`.
    pub mode: String,
    /// Content type, e.g. `post` or `comment`.
    #[serde(rename = "type")]
    pub kind: String,
    pub content_id: String,
    pub reddit_permalink: String,
    pub ai_decision: String,
    pub reason: String,
    pub original_content: String,
    pub generated_reply: String,
}

impl CsvLogEntry {
    pub fn is_live_mode(&self) -> bool {
        self.mode == "LIVE_MODE"
    }

    pub fn decision_is_yes(&self) -> bool {
        self.ai_decision.contains("YES")
    }

    /// The generated reply, or `None` when absent or `N/A`.
    pub fn generated_reply(&self) -> Option<&str> {
        let reply = self.generated_reply.trim();
        if reply.is_empty() || reply == "N/A" {
            None
        } else {
            Some(reply)
        }
    }
}

// ── CSV parsing ───────────────────────────────────────────────────────────────

/// Parse the analysis export.
///
/// The first record is the header; columns are matched by name so ordering
/// and extra columns do not matter, and missing columns stay empty. Quoted
/// fields may contain commas, doubled quotes and newlines. Blank lines are
/// skipped; a record whose length differs from the header is an error.
pub fn parse_analysis_csv(input: &str) -> Result<Vec<CsvLogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(input.trim_start_matches('\u{feff}').as_bytes());

    let header: csv::StringRecord = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_lowercase)
        .collect();
    reader.set_headers(header);

    let entries = reader
        .deserialize::<CsvLogEntry>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(csv_error)?;

    tracing::debug!(rows = entries.len(), "parsed analysis csv");
    Ok(entries)
}

fn csv_error(err: csv::Error) -> DashboardError {
    let line = err.position().map_or(0, |pos| pos.line() as usize);
    DashboardError::CsvParse {
        line,
        message: err.to_string(),
    }
}
