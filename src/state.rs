//! Application state: the Log Store, transcript, mode, filter and loading flag,
//! with one method per state transition. The UI holds a single `Signal<AppState>`.

use crate::api::ApiError;
use crate::log;
use crate::model::{ChatMessage, LevelCounts, LevelFilter, LogEntry, Mode, filter_logs};

pub const INJECT_FALLBACK_REPLY: &str = "Log injected successfully";
pub const NO_MATCHES_REPLY: &str = "No logs found matching your query.";
pub const SUBMISSION_ERROR_REPLY: &str = "Error: Could not process your request.";

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub logs: Vec<LogEntry>,
    pub filter: LevelFilter,
    pub chat: Vec<ChatMessage>,
    pub mode: Mode,
    pub input: String,
    pub loading: bool,
    poll_generation: u64,
}

/// What happened to a poll response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDisposition {
    /// Log Store replaced.
    Applied,
    /// Fetch failed; previous Log Store kept.
    Retained,
    /// Response belongs to a poll loop that was superseded; dropped.
    Stale,
}

/// A submission that has been accepted and is waiting on the backend.
/// `mode` is the mode active when the user pressed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub mode: Mode,
    pub text: String,
}

/// Successful backend answer to a [`Submission`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionReply {
    Injected(Option<String>),
    Queried(Vec<LogEntry>),
}

impl AppState {
    pub fn new() -> Self {
        Self {
            logs: Vec::new(),
            filter: LevelFilter::All,
            chat: Vec::new(),
            mode: Mode::Inject,
            input: String::new(),
            loading: false,
            poll_generation: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Mode and polling
    // -----------------------------------------------------------------------

    /// Switch mode. Returns false when `mode` is already active. Transcript
    /// and Log Store are untouched.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.poll_generation += 1;
        true
    }

    /// Tag for a poll loop started now. Responses carrying an older tag are
    /// discarded by [`AppState::apply_poll`].
    pub fn poll_generation(&self) -> u64 {
        self.poll_generation
    }

    pub fn polling_active(&self) -> bool {
        self.mode == Mode::Inject
    }

    /// Whether a poll loop started under `generation` may still fetch.
    pub fn poll_is_current(&self, generation: u64) -> bool {
        generation == self.poll_generation && self.polling_active()
    }

    pub fn apply_poll(
        &mut self,
        generation: u64,
        outcome: Result<Vec<LogEntry>, ApiError>,
    ) -> PollDisposition {
        if !self.poll_is_current(generation) {
            return PollDisposition::Stale;
        }
        match outcome {
            Ok(logs) => {
                self.logs = logs;
                PollDisposition::Applied
            }
            Err(_) => PollDisposition::Retained,
        }
    }

    // -----------------------------------------------------------------------
    // Filter / view
    // -----------------------------------------------------------------------

    pub fn set_filter(&mut self, filter: LevelFilter) {
        self.filter = filter;
    }

    /// Log cards to display. The filter only applies in inject mode.
    pub fn visible_logs(&self) -> Vec<LogEntry> {
        match self.mode {
            Mode::Inject => filter_logs(&self.logs, self.filter),
            Mode::Query => self.logs.clone(),
        }
    }

    pub fn level_counts(&self) -> LevelCounts {
        LevelCounts::tally(&self.logs)
    }

    // -----------------------------------------------------------------------
    // Submissions
    // -----------------------------------------------------------------------

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    /// Accept the current input: append the user turn and mark loading.
    /// `None` (and no state change) when input is blank or a request is in flight.
    pub fn begin_submission(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        let text = self.input.clone();
        self.chat.push(ChatMessage::user(text.clone()));
        self.loading = true;
        Some(Submission { mode: self.mode, text })
    }

    /// Record the backend's answer (or failure) for `submission`, then clear
    /// the input and loading flag.
    pub fn finish_submission(
        &mut self,
        submission: Submission,
        outcome: Result<SubmissionReply, ApiError>,
    ) {
        match outcome {
            Ok(SubmissionReply::Injected(reply)) => {
                let text = reply.unwrap_or_else(|| INJECT_FALLBACK_REPLY.to_string());
                self.chat.push(ChatMessage::agent(text));
            }
            Ok(SubmissionReply::Queried(logs)) => {
                self.chat.push(ChatMessage::agent(query_summary(&logs)));
                if self.mode == Mode::Query {
                    self.logs = logs;
                    self.filter = LevelFilter::All;
                } else {
                    log::app_log(
                        "WARN",
                        format!(
                            "Query {:?} answered after leaving query mode; log list left to the poller",
                            submission.text
                        ),
                    );
                }
            }
            Err(e) => {
                log::app_log("ERROR", format!("{:?} request failed: {}", submission.mode, e));
                self.chat.push(ChatMessage::agent(SUBMISSION_ERROR_REPLY));
            }
        }
        self.input.clear();
        self.loading = false;
    }
}

/// Agent text for a query result.
pub fn query_summary(logs: &[LogEntry]) -> String {
    if logs.is_empty() {
        return NO_MATCHES_REPLY.to_string();
    }
    let lines: Vec<String> = logs.iter().map(LogEntry::summary_line).collect();
    format!("Found {} logs:\n{}", logs.len(), lines.join("\n"))
}
