//! HTTP client for the hosted `ai-study` function.
//!
//! The function is reached at `{base_url}/functions/v1/{function}` with a
//! JSON body `{"type": ..., "prompt": ...}` and the project's public
//! (anon) key in both the `Authorization` and `apikey` headers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::traits::{AiBackend, payload_error};
use crate::types::AiRequest;
use crate::{Result, ScholarGateError};

/// Default function name.
pub const DEFAULT_FUNCTION: &str = "ai-study";

/// Default HTTP timeout; matches the function's own upstream timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the hosted AI function.
#[derive(Clone)]
pub struct EdgeFunctionClient {
    http: Client,
    base_url: String,
    function: String,
    anon_key: Option<String>,
    timeout: Duration,
}

impl EdgeFunctionClient {
    /// Create a client for the project at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client with a custom HTTP timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ScholarGateError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            function: DEFAULT_FUNCTION.to_string(),
            anon_key: None,
            timeout,
        })
    }

    /// Set the project's public key sent with every request.
    pub fn anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    /// Call a differently named function.
    pub fn function(mut self, name: impl Into<String>) -> Self {
        self.function = name.into();
        self
    }

    pub fn url(&self) -> String {
        format!("{}/functions/v1/{}", self.base_url, self.function)
    }

    /// Invoke the function and return its JSON payload.
    pub async fn invoke(&self, request: &AiRequest) -> Result<Value> {
        let mut builder = self.http.post(self.url()).json(request);
        if let Some(ref key) = self.anon_key {
            builder = builder.bearer_auth(key).header("apikey", key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ScholarGateError::Timeout(self.timeout)
            } else {
                ScholarGateError::Remote {
                    status: None,
                    message: format!("AI request failed: {e}"),
                }
            }
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ScholarGateError::Timeout(self.timeout)
            } else {
                ScholarGateError::Remote {
                    status: Some(status.as_u16()),
                    message: format!("AI request failed: {e}"),
                }
            }
        })?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ScholarGateError::MalformedResponse(format!("response body is not JSON: {e}"))
        })
    }
}

/// Map a non-2xx response to an error, preferring the body's `error` message.
fn status_error(status: u16, body: &str) -> ScholarGateError {
    let from_body = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(payload_error);

    let message = from_body.unwrap_or_else(|| {
        match status {
            429 => "Rate limit exceeded. Please try again later.",
            402 => "AI credits exhausted. Please try again later.",
            _ => "AI request failed",
        }
        .to_string()
    });

    ScholarGateError::Remote {
        status: Some(status),
        message,
    }
}

#[async_trait]
impl AiBackend for EdgeFunctionClient {
    fn name(&self) -> &str {
        &self.function
    }

    async fn invoke(&self, request: &AiRequest) -> Result<Value> {
        EdgeFunctionClient::invoke(self, request).await
    }
}
