//! Client configuration, fixed at build time (see build.rs for `.env` handling).

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Backend address from `LOG_MONITOR_API_URL` as seen by the compiler.
    pub fn from_build_env() -> Self {
        Self::with_api_url(option_env!("LOG_MONITOR_API_URL").unwrap_or_default())
    }

    /// Blank input selects [`DEFAULT_API_URL`]; trailing slashes are dropped.
    pub fn with_api_url(url: &str) -> Self {
        let url = url.trim();
        let url = if url.is_empty() { DEFAULT_API_URL } else { url };
        Self {
            api_url: url.trim_end_matches('/').to_string(),
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_api_url(DEFAULT_API_URL)
    }
}
