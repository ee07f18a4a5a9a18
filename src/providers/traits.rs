//! Backend trait for remote AI invocation.
//!
//! The gateway depends on exactly one external call: send `{type, prompt}`,
//! get a JSON payload back. [`AiBackend`] is that seam. The shipped
//! implementation is [`EdgeFunctionClient`](super::EdgeFunctionClient);
//! tests substitute in-process fakes.
//!
//! # Error contract
//!
//! Implementations map transport and HTTP failures to
//! [`ScholarGateError::Remote`](crate::ScholarGateError::Remote), passing the
//! backend's own message through when it sent one. They return the payload
//! untouched otherwise; shape validation and the `{error}`-in-a-2xx check
//! happen in the gateway so that every backend gets them.

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::types::AiRequest;

#[async_trait]
pub trait AiBackend: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Invoke the remote endpoint and return its raw JSON payload.
    async fn invoke(&self, request: &AiRequest) -> Result<Value>;
}

/// Extract a logical error from a successful payload (`{"error": "..."}`).
pub fn payload_error(payload: &Value) -> Option<String> {
    match payload.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_error_detection() {
        assert_eq!(
            payload_error(&json!({"error": "Invalid type"})).as_deref(),
            Some("Invalid type")
        );
        assert_eq!(payload_error(&json!({"text": "fine"})), None);
        assert_eq!(payload_error(&json!({"error": null, "text": "x"})), None);
        assert_eq!(payload_error(&json!([1, 2])), None);
    }
}
