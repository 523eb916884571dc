//! HTTP client for the AKIS runtime API.
//!
//! Wraps the backend REST endpoints this console polls:
//!
//! - `GET /api/runtime/line/state`
//! - `GET /api/runtime/plc/health`
//! - `GET /api/runtime/events`
//! - `POST /api/runtime/line/command`
//!
//! Every request carries `site_id`/`line_id` query parameters and, when
//! configured, an `x-debug-token` header.
//!
//! ## Example
//!
//! ```rust,no_run
//! use akis_console::client::RuntimeClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RuntimeClient::builder()
//!         .endpoint("http://localhost:8080")
//!         .site("plant-a")
//!         .line("line-1")
//!         .build();
//!
//!     let line = client.line_state().await?;
//!     println!("line is {}", line.state);
//!     Ok(())
//! }
//! ```

mod error;

pub use error::ClientError;

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use crate::source::{EventKind, LineAction, LineState, PlcHealth, RuntimeEvent};

const DEBUG_TOKEN_HEADER: &str = "x-debug-token";

/// Client for the runtime endpoints of one site/line pair.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    client: Client,
    endpoint: String,
    site_id: String,
    line_id: String,
    debug_token: Option<String>,
}

/// Body of `POST /api/runtime/line/command`.
#[derive(Debug, Serialize)]
struct LineCommand<'a> {
    site_id: &'a str,
    line_id: &'a str,
    action: LineAction,
}

impl RuntimeClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> RuntimeClientBuilder {
        RuntimeClientBuilder::default()
    }

    /// Short "endpoint site/line" string for status bars.
    pub fn describe_target(&self) -> String {
        format!("{} {}/{}", self.endpoint, self.site_id, self.line_id)
    }

    /// Spawn live pollers backed by this client.
    ///
    /// Must be called within a tokio runtime.
    pub fn into_source(
        self,
        intervals: crate::source::PollIntervals,
        events_window: Duration,
    ) -> crate::source::HttpSource {
        crate::source::HttpSource::spawn(self, intervals, events_window)
    }

    /// Fetch the current line state.
    pub async fn line_state(&self) -> Result<LineState, ClientError> {
        self.get_json("/api/runtime/line/state", &[]).await
    }

    /// Fetch the current PLC connector health.
    pub async fn plc_health(&self) -> Result<PlcHealth, ClientError> {
        self.get_json("/api/runtime/plc/health", &[]).await
    }

    /// Fetch runtime events from the last `window`, optionally restricted
    /// to a single kind.
    pub async fn recent_events(
        &self,
        window: Duration,
        kind: Option<EventKind>,
    ) -> Result<Vec<RuntimeEvent>, ClientError> {
        let since = window.as_millis().to_string();
        let mut params: Vec<(&str, String)> = vec![("since_ms_ago", since)];
        if let Some(kind) = kind {
            params.push(("kind", kind.label().to_string()));
        }
        self.get_json("/api/runtime/events", &params).await
    }

    /// Issue a line command (pause / resume / stop).
    ///
    /// The backend acknowledges with 2xx; the next line-state poll reflects
    /// the new mode.
    pub async fn send_command(&self, action: LineAction) -> Result<(), ClientError> {
        let url = format!("{}/api/runtime/line/command", self.endpoint);
        let body = LineCommand {
            site_id: &self.site_id,
            line_id: &self.line_id,
            action,
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref token) = self.debug_token {
            request = request.header(DEBUG_TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        self.check_status(response.status())?;
        Ok(())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        extra_params: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.endpoint, path);

        let mut request = self.client.get(&url).query(&[
            ("site_id", self.site_id.as_str()),
            ("line_id", self.line_id.as_str()),
        ]);
        for (key, value) in extra_params {
            request = request.query(&[(*key, value.as_str())]);
        }
        if let Some(ref token) = self.debug_token {
            request = request.header(DEBUG_TOKEN_HEADER, token);
        }

        let response = request.send().await?;
        self.check_status(response.status())?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    fn check_status(&self, status: reqwest::StatusCode) -> Result<(), ClientError> {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ClientError::Auth(format!(
                "Backend rejected the debug token ({})",
                status
            )));
        }
        if !status.is_success() {
            return Err(ClientError::Http(format!(
                "API returned status {}",
                status
            )));
        }
        Ok(())
    }
}

/// Builder for [`RuntimeClient`].
#[derive(Debug, Default)]
pub struct RuntimeClientBuilder {
    endpoint: Option<String>,
    site_id: Option<String>,
    line_id: Option<String>,
    debug_token: Option<String>,
    timeout: Option<Duration>,
}

impl RuntimeClientBuilder {
    /// Set the backend base URL (e.g., "http://localhost:8080").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        self
    }

    /// Set the site identifier.
    pub fn site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    /// Set the line identifier.
    pub fn line(mut self, line_id: impl Into<String>) -> Self {
        self.line_id = Some(line_id.into());
        self
    }

    /// Set the optional debug token sent as `x-debug-token`.
    pub fn debug_token(mut self, token: Option<String>) -> Self {
        self.debug_token = token.filter(|t| !t.is_empty());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> RuntimeClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        RuntimeClient {
            client,
            endpoint: self
                .endpoint
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            site_id: self.site_id.unwrap_or_else(|| "default".to_string()),
            line_id: self.line_id.unwrap_or_else(|| "line-1".to_string()),
            debug_token: self.debug_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = RuntimeClient::builder().build();
        assert_eq!(client.endpoint, "http://localhost:8080");
        assert_eq!(client.site_id, "default");
        assert_eq!(client.line_id, "line-1");
        assert!(client.debug_token.is_none());
    }

    #[test]
    fn test_builder_custom() {
        let client = RuntimeClient::builder()
            .endpoint("http://akis.local:9000/")
            .site("plant-a")
            .line("sorter-2")
            .debug_token(Some("secret".to_string()))
            .build();

        // Trailing slash is stripped so path joins stay clean.
        assert_eq!(client.endpoint, "http://akis.local:9000");
        assert_eq!(client.site_id, "plant-a");
        assert_eq!(client.line_id, "sorter-2");
        assert_eq!(client.debug_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_empty_debug_token_is_dropped() {
        let client = RuntimeClient::builder()
            .debug_token(Some(String::new()))
            .build();
        assert!(client.debug_token.is_none());
    }

    #[test]
    fn test_command_body_shape() {
        let body = LineCommand {
            site_id: "plant-a",
            line_id: "line-1",
            action: LineAction::Pause,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["site_id"], "plant-a");
        assert_eq!(json["line_id"], "line-1");
        assert_eq!(json["action"], "pause");
    }
}
