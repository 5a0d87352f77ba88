//! HTTP client for the log-monitoring backend (`/logs`, `/chat`, `/chat-query`).
//! Works in the browser (WASM fetch) and on desktop.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::model::LogEntry;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct InjectRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// Body of a `/chat` response. `reply` may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InjectReply {
    #[serde(default)]
    pub reply: Option<String>,
}

/// The three backend calls the dashboard makes. [`HttpBackend`] is the real
/// one; tests script their own.
#[allow(async_fn_in_trait)]
pub trait LogBackend {
    async fn fetch_logs(&self) -> Result<Vec<LogEntry>, ApiError>;
    async fn inject(&self, message: &str) -> Result<InjectReply, ApiError>;
    async fn query(&self, query: &str) -> Result<Vec<LogEntry>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Status check first, then parse the body ourselves so a non-JSON body
    /// surfaces as [`ApiError::Decode`] rather than a transport error.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl LogBackend for HttpBackend {
    async fn fetch_logs(&self) -> Result<Vec<LogEntry>, ApiError> {
        let response = self.client.get(self.config.endpoint("logs")).send().await?;
        Self::decode(response).await
    }

    async fn inject(&self, message: &str) -> Result<InjectReply, ApiError> {
        let response = self
            .client
            .post(self.config.endpoint("chat"))
            .json(&InjectRequest { message })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn query(&self, query: &str) -> Result<Vec<LogEntry>, ApiError> {
        let response = self
            .client
            .post(self.config.endpoint("chat-query"))
            .json(&QueryRequest { query })
            .send()
            .await?;
        Self::decode(response).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn serve(app: Router) -> HttpBackend {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        HttpBackend::new(ClientConfig::with_api_url(&format!("http://{addr}")))
    }

    fn fake_backend() -> Router {
        Router::new()
            .route(
                "/logs",
                get(|| async {
                    Json(json!([
                        {"timestamp": 1718000000.5, "level": "WARN", "message": "Memory usage high"},
                        {"timestamp": 1718000001, "level": "ERROR", "message": "Failed to connect to DB",
                         "reason": "Anomalous log pattern detected", "suggestion": "Restart the pool"}
                    ]))
                }),
            )
            .route(
                "/chat",
                post(|Json(body): Json<Value>| async move {
                    match body["message"].as_str() {
                        Some("silent") => Json(json!({})),
                        Some(msg) => Json(json!({ "reply": format!("Logged: {msg}") })),
                        None => Json(json!({ "reply": "missing message field" })),
                    }
                }),
            )
            .route(
                "/chat-query",
                post(|Json(body): Json<Value>| async move {
                    if body["query"] == "errors" {
                        Json(json!([{"timestamp": 7, "level": "ERROR", "message": "Timeout occurred while calling API"}]))
                    } else {
                        Json(json!([]))
                    }
                }),
            )
    }

    #[tokio::test]
    async fn fetches_logs_in_order() {
        let backend = serve(fake_backend()).await;
        let logs = backend.fetch_logs().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].level, Level::Warn);
        assert_eq!(logs[0].timestamp, 1_718_000_000);
        assert_eq!(logs[1].suggestion.as_deref(), Some("Restart the pool"));
    }

    #[tokio::test]
    async fn inject_sends_message_field() {
        let backend = serve(fake_backend()).await;
        let reply = backend.inject("disk full").await.unwrap();
        assert_eq!(reply.reply.as_deref(), Some("Logged: disk full"));

        let reply = backend.inject("silent").await.unwrap();
        assert_eq!(reply, InjectReply { reply: None });
    }

    #[tokio::test]
    async fn query_sends_query_field() {
        let backend = serve(fake_backend()).await;
        let hits = backend.query("errors").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].message, "Timeout occurred while calling API");
        assert!(backend.query("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let backend = serve(Router::new().route("/logs", get(|| async { "<html>oops</html>" }))).await;
        let err = backend.fetch_logs().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn server_error_status_is_reported() {
        let backend = serve(Router::new().route(
            "/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let err = backend.inject("x").await.unwrap_err();
        assert!(matches!(err, ApiError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let backend = HttpBackend::new(ClientConfig::with_api_url(&format!("http://{addr}")));
        let err = backend.fetch_logs().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    }
}
