//! Recurring `/logs` fetch while the dashboard is in inject mode.

use std::ops::ControlFlow;
use std::time::Duration;

use crate::api::{ApiError, LogBackend};
use crate::log;
use crate::model::LogEntry;

/// Fetch immediately, then on a fixed `interval` cadence measured from the
/// first tick, so request latency does not stretch the period. `keep_going`
/// is asked before every fetch; once it says no, no further request is made.
/// Each result goes to `apply`, and the loop also ends when `apply` returns
/// `Break`. Failures are reported to the diagnostic channel before being
/// handed on.
pub async fn run<B, K, F>(backend: &B, interval: Duration, mut keep_going: K, mut apply: F)
where
    B: LogBackend,
    K: FnMut() -> bool,
    F: FnMut(Result<Vec<LogEntry>, ApiError>) -> ControlFlow<()>,
{
    let mut ticker = Ticker::new(interval);
    loop {
        ticker.tick().await;
        if !keep_going() {
            log::app_log("DEBUG", "Log polling stopped before next fetch");
            return;
        }
        let outcome = backend.fetch_logs().await;
        if let Err(e) = &outcome {
            log::app_log("ERROR", format!("Failed to fetch logs: {}", e));
        }
        if apply(outcome).is_break() {
            log::app_log("DEBUG", "Log polling stopped");
            return;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
struct Ticker(tokio::time::Interval);

#[cfg(not(target_arch = "wasm32"))]
impl Ticker {
    fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        // A slow response pushes the schedule back instead of bursting.
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        Self(interval)
    }

    async fn tick(&mut self) {
        self.0.tick().await;
    }
}

#[cfg(target_arch = "wasm32")]
struct Ticker {
    stream: gloo_timers::future::IntervalStream,
    started: bool,
}

#[cfg(target_arch = "wasm32")]
impl Ticker {
    fn new(period: Duration) -> Self {
        Self {
            stream: gloo_timers::future::IntervalStream::new(period.as_millis() as u32),
            started: false,
        }
    }

    /// First tick resolves at once; later ones follow the browser interval.
    async fn tick(&mut self) {
        use futures_util::StreamExt;

        if !std::mem::replace(&mut self.started, true) {
            return;
        }
        self.stream.next().await;
    }
}
