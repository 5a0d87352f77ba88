//! Shared domain types for log entries and the chat transcript (used by UI, state and API modules).

use chrono::{Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Log entries
// ---------------------------------------------------------------------------

/// Severity as reported by the backend. Matching is case-sensitive; anything
/// outside the four known values is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Other(String),
}

impl Level {
    pub fn as_str(&self) -> &str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Other(s) => s.as_str(),
        }
    }

    pub fn style(&self) -> LevelStyle {
        match self {
            Level::Error => LevelStyle {
                icon: Some("❗"),
                card_class: "log-card level-error",
                text_class: "level-text-error",
            },
            Level::Warn => LevelStyle {
                icon: Some("⚠️"),
                card_class: "log-card level-warn",
                text_class: "level-text-warn",
            },
            Level::Info => LevelStyle {
                icon: Some("ℹ️"),
                card_class: "log-card level-info",
                text_class: "level-text-info",
            },
            Level::Debug => LevelStyle {
                icon: Some("🐞"),
                card_class: "log-card level-debug",
                text_class: "level-text-debug",
            },
            Level::Other(_) => LevelStyle::UNSTYLED,
        }
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ERROR" => Level::Error,
            "WARN" => Level::Warn,
            "INFO" => Level::Info,
            "DEBUG" => Level::Debug,
            _ => Level::Other(s),
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        match level {
            Level::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual treatment of a log card. Every level has one; unknown levels get
/// [`LevelStyle::UNSTYLED`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyle {
    pub icon: Option<&'static str>,
    pub card_class: &'static str,
    pub text_class: &'static str,
}

impl LevelStyle {
    pub const UNSTYLED: LevelStyle = LevelStyle {
        icon: None,
        card_class: "log-card",
        text_class: "",
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix seconds. The backend sends fractional seconds; they are truncated.
    #[serde(deserialize_with = "unix_seconds")]
    pub timestamp: i64,
    pub level: Level,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl LogEntry {
    pub fn local_time(&self) -> String {
        format_timestamp(self.timestamp)
    }

    pub fn reason_text(&self) -> &str {
        self.reason.as_deref().unwrap_or("N/A")
    }

    pub fn suggestion_text(&self) -> &str {
        self.suggestion.as_deref().unwrap_or("N/A")
    }

    /// One-line form used in query summaries: `[LEVEL] <local time>: <message>`.
    pub fn summary_line(&self) -> String {
        format!("[{}] {}: {}", self.level, self.local_time(), self.message)
    }
}

fn unix_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    Ok(secs.trunc() as i64)
}

/// Render Unix seconds as local date and time; falls back to the raw number
/// when the value is outside chrono's range.
pub fn format_timestamp(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
        None => secs.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Level filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    All,
    Error,
    Warn,
    Info,
    Debug,
}

impl LevelFilter {
    pub const ALL_FILTERS: [LevelFilter; 5] = [
        LevelFilter::All,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LevelFilter::All => "ALL",
            LevelFilter::Error => "ERROR",
            LevelFilter::Warn => "WARN",
            LevelFilter::Info => "INFO",
            LevelFilter::Debug => "DEBUG",
        }
    }

    pub fn matches(&self, level: &Level) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Error => *level == Level::Error,
            LevelFilter::Warn => *level == Level::Warn,
            LevelFilter::Info => *level == Level::Info,
            LevelFilter::Debug => *level == Level::Debug,
        }
    }
}

/// Entries of `logs` whose level passes `filter`, in original order.
pub fn filter_logs(logs: &[LogEntry], filter: LevelFilter) -> Vec<LogEntry> {
    logs.iter()
        .filter(|log| filter.matches(&log.level))
        .cloned()
        .collect()
}

/// Per-level tallies for the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelCounts {
    pub error: usize,
    pub warn: usize,
    pub info: usize,
    pub debug: usize,
    pub other: usize,
}

impl LevelCounts {
    pub fn tally(logs: &[LogEntry]) -> Self {
        logs.iter().fold(Self::default(), |mut counts, log| {
            match log.level {
                Level::Error => counts.error += 1,
                Level::Warn => counts.warn += 1,
                Level::Info => counts.info += 1,
                Level::Debug => counts.debug += 1,
                Level::Other(_) => counts.other += 1,
            }
            counts
        })
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { from: Sender::User, text: text.into() }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self { from: Sender::Agent, text: text.into() }
    }
}

/// How free-text input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Inject,
    Query,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Inject => "Inject Logs",
            Mode::Query => "Query Logs",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Mode::Inject => "Describe a log to inject, e.g. 'disk full on db-01'",
            Mode::Query => "Ask about logs, e.g. 'errors in the last hour'",
        }
    }
}
