#![allow(non_snake_case)]

mod api;
mod config;
mod log;
mod model;
mod poller;
mod state;
mod submit;

use std::ops::ControlFlow;

use dioxus::core::Task;
use dioxus::prelude::*;
use log::{app_logs_snapshot, DiagnosticEntry};

use api::HttpBackend;
use config::ClientConfig;
use model::{ChatMessage, LevelFilter, LogEntry, Mode, Sender};
use state::{AppState, PollDisposition};

// ============================================================================
// Entry & root component
// ============================================================================

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let backend = use_hook(|| HttpBackend::new(ClientConfig::from_build_env()));
    let mut state = use_signal(AppState::new);
    let mut poll_task = use_signal(|| None::<Task>);
    let mut diagnostics_open = use_signal(|| false);
    let mut diagnostics = use_signal(Vec::<DiagnosticEntry>::new);

    let mode = use_memo(move || state.read().mode);

    // (Re)start the poller whenever the mode changes: cancel the old loop,
    // and start a new one only in inject mode.
    {
        let backend = backend.clone();
        use_effect(move || {
            let current = mode();
            if let Some(task) = poll_task.write().take() {
                task.cancel();
            }
            if current != Mode::Inject {
                log::app_log("INFO", "Query mode: log polling paused");
                return;
            }
            let generation = state.peek().poll_generation();
            let backend = backend.clone();
            log::app_log(
                "INFO",
                format!(
                    "Polling {} every {:?}",
                    backend.config().endpoint("logs"),
                    backend.config().poll_interval
                ),
            );
            let task = spawn(async move {
                let interval = backend.config().poll_interval;
                poller::run(
                    &backend,
                    interval,
                    move || state.peek().poll_is_current(generation),
                    move |outcome| match state.write().apply_poll(generation, outcome) {
                        PollDisposition::Stale => ControlFlow::Break(()),
                        PollDisposition::Applied | PollDisposition::Retained => ControlFlow::Continue(()),
                    },
                )
                .await;
            });
            poll_task.set(Some(task));
        });
    }

    let visible_logs = use_memo(move || state.read().visible_logs());
    let counts = use_memo(move || state.read().level_counts());

    let snapshot = state.read();
    let current_mode = snapshot.mode;
    let current_filter = snapshot.filter;
    let loading = snapshot.loading;
    let can_submit = snapshot.can_submit();
    let input_value = snapshot.input.clone();
    let chat = snapshot.chat.clone();
    drop(snapshot);

    let key_backend = backend.clone();
    let click_backend = backend.clone();

    rsx! {
        document::Stylesheet { href: asset!("/assets/main.css") }

        div { class: "app",
            nav { class: "nav px-6 py-4",
                div { class: "container flex items-center justify-between flex-wrap gap-3",
                    div { class: "flex items-center gap-4",
                        h1 { class: "title", "AI Log Monitor Dashboard" }
                        if current_mode == Mode::Inject {
                            div { class: "live-indicator",
                                span { class: "live-dot" }
                                span { class: "text-muted text-sm", "Live" }
                            }
                        }
                        div { class: "nav-stats text-muted text-sm flex items-center gap-4 flex-wrap",
                            span { "❗ {counts.read().error} errors" }
                            span { "⚠️ {counts.read().warn} warnings" }
                            span { "ℹ️ {counts.read().info} info" }
                            span { "🐞 {counts.read().debug} debug" }
                            if counts.read().other > 0 {
                                span { "❔ {counts.read().other} other" }
                            }
                        }
                    }
                    button {
                        class: "btn",
                        onclick: move |_| {
                            diagnostics.set(app_logs_snapshot());
                            diagnostics_open.set(true);
                        },
                        "📋 Diagnostics"
                    }
                }
            }

            {if *diagnostics_open.read() {
                rsx! {
                    div {
                        class: "overlay",
                        onclick: move |_| diagnostics_open.set(false),
                        div {
                            class: "card overlay-card",
                            onclick: move |evt| { evt.stop_propagation(); },
                            h2 { class: "panel-title", "📋 Diagnostics" }
                            p { class: "text-muted text-sm", "Client-side activity. Refresh to update." }
                            div { class: "diagnostics",
                                for entry in diagnostics.read().iter() {
                                    div { class: "diagnostic-line",
                                        span { class: "text-muted mr-2", "{entry.time}" }
                                        span { class: if entry.level == "ERROR" { "level-text-error" } else { "level-text-info" }, "{entry.level}" }
                                        span { class: "ml-2", "{entry.message}" }
                                    }
                                }
                            }
                            div { class: "flex gap-2 mt-4",
                                button {
                                    class: "btn",
                                    onclick: move |_| diagnostics.set(app_logs_snapshot()),
                                    "Refresh"
                                }
                                button {
                                    class: "btn",
                                    onclick: move |_| diagnostics_open.set(false),
                                    "Close"
                                }
                            }
                        }
                    }
                }
            } else {
                rsx! { }
            }}

            div { class: "container px-6 py-6",
                div { class: "card p-6 mb-6",
                    div { class: "flex gap-2 mb-4",
                        for m in [Mode::Inject, Mode::Query] {
                            ToggleButton {
                                label: m.label().to_string(),
                                active: current_mode == m,
                                onclick: move |_| {
                                    if state.write().set_mode(m) {
                                        log::app_log("INFO", format!("Switched to {:?} mode", m));
                                    }
                                }
                            }
                        }
                    }

                    ChatTranscript { messages: chat }

                    div { class: "flex gap-2 mt-4",
                        input {
                            r#type: "text",
                            class: "chat-input flex-1",
                            placeholder: current_mode.placeholder(),
                            value: "{input_value}",
                            disabled: loading,
                            oninput: move |evt| state.write().set_input(evt.value()),
                            onkeydown: move |evt| {
                                if evt.key() == Key::Enter {
                                    start_submission(state, key_backend.clone());
                                }
                            }
                        }
                        button {
                            class: "btn-primary",
                            disabled: !can_submit,
                            onclick: move |_| start_submission(state, click_backend.clone()),
                            if loading { "Sending..." } else { "Send" }
                        }
                    }
                }

                if current_mode == Mode::Inject {
                    div { class: "flex justify-center gap-2 mb-6",
                        for f in LevelFilter::ALL_FILTERS {
                            ToggleButton {
                                label: f.label().to_string(),
                                active: current_filter == f,
                                onclick: move |_| state.write().set_filter(f)
                            }
                        }
                    }
                }

                if visible_logs.read().is_empty() {
                    div { class: "card p-8 text-center",
                        span { class: "text-4xl", "📭" }
                        p { class: "text-muted mt-4", "No logs to show" }
                    }
                } else {
                    div { class: "log-grid",
                        for (index, entry) in visible_logs.read().iter().enumerate() {
                            LogCard { key: "{index}", log: entry.clone() }
                        }
                    }
                }
            }
        }
    }
}

/// Accept the current input and hand it to the backend. Does nothing when the
/// input is blank or a request is already in flight.
fn start_submission(mut state: Signal<AppState>, backend: HttpBackend) {
    let Some(submission) = state.write().begin_submission() else {
        return;
    };
    spawn(async move {
        let outcome = submit::dispatch(&backend, &submission).await;
        state.write().finish_submission(submission, outcome);
    });
}

// ============================================================================
// Components
// ============================================================================

#[component]
fn ToggleButton(label: String, active: bool, onclick: EventHandler<MouseEvent>) -> Element {
    let class = if active { "btn-primary" } else { "btn" };
    rsx! {
        button {
            class: "{class}",
            onclick: move |evt| onclick.call(evt),
            "{label}"
        }
    }
}

#[component]
fn ChatTranscript(messages: Vec<ChatMessage>) -> Element {
    rsx! {
        div { class: "chat-transcript",
            if messages.is_empty() {
                p { class: "text-muted text-sm", "No messages yet." }
            }
            for (index, message) in messages.iter().enumerate() {
                div {
                    key: "{index}",
                    class: match message.from {
                        Sender::User => "chat-row chat-row-user",
                        Sender::Agent => "chat-row chat-row-agent",
                    },
                    div { class: "chat-bubble", "{message.text}" }
                }
            }
        }
    }
}

#[component]
fn LogCard(log: LogEntry) -> Element {
    let style = log.level.style();
    let time = log.local_time();
    rsx! {
        div { class: "{style.card_class}",
            div { class: "log-icon",
                {match style.icon {
                    Some(icon) => rsx! { span { "{icon}" } },
                    None => rsx! { },
                }}
            }
            div { class: "flex-1",
                div { class: "text-xs text-muted mb-1", "{time}" }
                div { class: "log-level {style.text_class}", "{log.level}" }
                div { class: "log-message", "{log.message}" }
                div { class: "text-sm mb-1",
                    strong { "Reason: " }
                    "{log.reason_text()}"
                }
                div { class: "text-sm",
                    strong { "Suggestion: " }
                    "{log.suggestion_text()}"
                }
            }
        }
    }
}
