//! Sends an accepted chat submission to the endpoint its mode selects.

use crate::api::{ApiError, LogBackend};
use crate::log;
use crate::model::Mode;
use crate::state::{Submission, SubmissionReply};

/// Inject mode posts to `/chat`, query mode to `/chat-query`. The input is
/// sent as typed.
pub async fn dispatch<B: LogBackend>(
    backend: &B,
    submission: &Submission,
) -> Result<SubmissionReply, ApiError> {
    match submission.mode {
        Mode::Inject => {
            log::app_log("INFO", format!("Injecting log: {}", submission.text));
            let reply = backend.inject(&submission.text).await?;
            Ok(SubmissionReply::Injected(reply.reply))
        }
        Mode::Query => {
            log::app_log("INFO", format!("Querying logs: {}", submission.text));
            let logs = backend.query(&submission.text).await?;
            log::app_log("INFO", format!("Query matched {} logs", logs.len()));
            Ok(SubmissionReply::Queried(logs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::InjectReply;
    use crate::api::testing::{ScriptedBackend, decode_error};
    use crate::model::{ChatMessage, Level, LevelFilter, LogEntry};
    use crate::state::{AppState, INJECT_FALLBACK_REPLY, NO_MATCHES_REPLY, SUBMISSION_ERROR_REPLY};

    async fn send(state: &mut AppState, backend: &ScriptedBackend, input: &str) {
        state.set_input(input);
        let Some(submission) = state.begin_submission() else {
            return;
        };
        let outcome = dispatch(backend, &submission).await;
        state.finish_submission(submission, outcome);
    }

    fn entry(level: Level, message: &str, timestamp: i64) -> LogEntry {
        LogEntry {
            timestamp,
            level,
            message: message.to_string(),
            reason: Some("Anomalous log pattern detected".into()),
            suggestion: None,
        }
    }

    #[tokio::test]
    async fn inject_round_trip() {
        let backend = ScriptedBackend::default();
        backend.injects.borrow_mut().push_back(Ok(InjectReply { reply: Some("Logged.".into()) }));
        let mut state = AppState::new();

        send(&mut state, &backend, "disk full").await;

        assert_eq!(*backend.sent.borrow(), ["chat:disk full"]);
        assert_eq!(
            state.chat,
            [ChatMessage::user("disk full"), ChatMessage::agent("Logged.")]
        );
        assert!(!state.loading);
        assert!(state.input.is_empty());
    }

    #[tokio::test]
    async fn inject_without_reply_uses_fallback() {
        let backend = ScriptedBackend::default();
        backend.injects.borrow_mut().push_back(Ok(InjectReply::default()));
        let mut state = AppState::new();

        send(&mut state, &backend, "x").await;

        assert_eq!(state.chat.last(), Some(&ChatMessage::agent(INJECT_FALLBACK_REPLY)));
    }

    #[tokio::test]
    async fn blank_input_never_reaches_backend() {
        let backend = ScriptedBackend::default();
        let mut state = AppState::new();

        send(&mut state, &backend, "   ").await;

        assert!(backend.sent.borrow().is_empty());
        assert!(state.chat.is_empty());
    }

    #[tokio::test]
    async fn query_with_no_matches() {
        let backend = ScriptedBackend::default();
        backend.queries.borrow_mut().push_back(Ok(Vec::new()));
        let mut state = AppState::new();
        state.logs = vec![entry(Level::Debug, "Cache miss", 1)];
        state.set_filter(LevelFilter::Debug);
        state.set_mode(Mode::Query);

        send(&mut state, &backend, "errors last hour").await;

        assert_eq!(*backend.sent.borrow(), ["chat-query:errors last hour"]);
        assert_eq!(state.chat.last(), Some(&ChatMessage::agent(NO_MATCHES_REPLY)));
        assert!(state.logs.is_empty());
        assert_eq!(state.filter, LevelFilter::All);
    }

    #[tokio::test]
    async fn query_with_two_matches() {
        let hits = vec![
            entry(Level::Error, "Failed to connect to DB", 1_718_000_000),
            entry(Level::Warn, "Memory usage high", 1_718_000_050),
        ];
        let backend = ScriptedBackend::default();
        backend.queries.borrow_mut().push_back(Ok(hits.clone()));
        let mut state = AppState::new();
        state.set_mode(Mode::Query);

        send(&mut state, &backend, "what broke?").await;

        let reply = &state.chat.last().unwrap().text;
        let expected = format!(
            "Found 2 logs:\n{}\n{}",
            hits[0].summary_line(),
            hits[1].summary_line()
        );
        assert_eq!(*reply, expected);
        assert_eq!(state.logs, hits);
        assert_eq!(state.visible_logs(), hits);
    }

    #[tokio::test]
    async fn backend_failure_in_either_mode_becomes_error_turn() {
        let backend = ScriptedBackend::default();
        backend.injects.borrow_mut().push_back(Err(decode_error()));
        backend.queries.borrow_mut().push_back(Err(decode_error()));
        let mut state = AppState::new();
        state.logs = vec![entry(Level::Info, "Service started", 1)];

        send(&mut state, &backend, "first").await;
        state.set_mode(Mode::Query);
        send(&mut state, &backend, "second").await;

        assert_eq!(
            state.chat,
            [
                ChatMessage::user("first"),
                ChatMessage::agent(SUBMISSION_ERROR_REPLY),
                ChatMessage::user("second"),
                ChatMessage::agent(SUBMISSION_ERROR_REPLY),
            ]
        );
        assert_eq!(state.logs.len(), 1);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn input_is_sent_untrimmed() {
        let backend = ScriptedBackend::default();
        backend.injects.borrow_mut().push_back(Ok(InjectReply::default()));
        let mut state = AppState::new();

        send(&mut state, &backend, "  padded  ").await;

        assert_eq!(*backend.sent.borrow(), ["chat:  padded  "]);
        assert_eq!(state.chat[0], ChatMessage::user("  padded  "));
    }
}
