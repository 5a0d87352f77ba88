//! Diagnostic channel: an in-app buffer shown in the Diagnostics panel, mirrored to tracing.

use dioxus::logger::tracing;
use std::sync::Mutex;

const MAX_LOGS: usize = 2000;

static LOG_BUF: std::sync::OnceLock<Mutex<Vec<DiagnosticEntry>>> = std::sync::OnceLock::new();

#[derive(Clone, Debug)]
pub struct DiagnosticEntry {
    pub time: String,
    pub level: String,
    pub message: String,
}

fn buf() -> &'static Mutex<Vec<DiagnosticEntry>> {
    LOG_BUF.get_or_init(|| Mutex::new(Vec::new()))
}

/// Append a diagnostic line. Safe to call from any task.
pub fn app_log(level: &str, message: impl Into<String>) {
    let message = message.into();
    match level {
        "ERROR" => tracing::error!("{message}"),
        "WARN" => tracing::warn!("{message}"),
        "DEBUG" => tracing::debug!("{message}"),
        _ => tracing::info!("{message}"),
    }
    let entry = DiagnosticEntry {
        time: chrono::Local::now().format("%H:%M:%S%.3f").to_string(),
        level: level.to_string(),
        message,
    };
    if let Ok(mut v) = buf().lock() {
        v.push(entry);
        let n = v.len();
        if n > MAX_LOGS {
            v.drain(0..n - MAX_LOGS);
        }
    }
}

/// Snapshot of the buffer for display.
pub fn app_logs_snapshot() -> Vec<DiagnosticEntry> {
    buf().lock().map(|v| v.clone()).unwrap_or_default()
}
