//! Minimal JSON-RPC 2.0 client over HTTP.
//!
//! NEAR, Solana, Lotus and Substrate nodes all accept the same envelope:
//!
//! ```text
//! {"jsonrpc": "2.0", "id": <u64>, "method": "...", "params": [...] | {...}}
//! ```

use super::retry::{retry_with_backoff, RetryPolicy};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Longest response body kept in an `Http` error.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Remote {
        code: i64,
        message: String,
        /// The complete `error` object as sent by the node.
        raw: Value,
    },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RpcError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Remote { .. } | Self::Malformed(_) => false,
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    retry: RetryPolicy,
    next_id: Arc<AtomicU64>,
}

impl JsonRpcClient {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            timeout,
            retry,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `method` and deserialize its `result` as `T`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let result = retry_with_backoff(
            &self.retry,
            || self.call_once(method, &params),
            RpcError::is_transient,
        )
        .await?;

        serde_json::from_value(result)
            .map_err(|e| RpcError::Malformed(format!("unexpected result for {}: {}", method, e)))
    }

    async fn call_once(&self, method: &str, params: &Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(endpoint = %self.endpoint, method, id, "json-rpc call");

        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        if !status.is_success() {
            return Err(RpcError::Http {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let envelope: RpcResponse = serde_json::from_str(&body)
            .map_err(|e| RpcError::Malformed(format!("{}: {}", e, truncate(&body))))?;

        match envelope.error {
            Some(raw) => Err(remote_error(raw)),
            None => Ok(envelope.result),
        }
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> RpcError {
        if err.is_timeout() {
            RpcError::Timeout(self.timeout)
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

fn remote_error(raw: Value) -> RpcError {
    let code = raw.get("code").and_then(Value::as_i64).unwrap_or_default();
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    RpcError::Remote { code, message, raw }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(RpcError::Transport("refused".into()).is_transient());
        assert!(RpcError::Timeout(Duration::from_secs(1)).is_transient());
        assert!(RpcError::Http { status: 503, body: String::new() }.is_transient());
        assert!(RpcError::Http { status: 429, body: String::new() }.is_transient());
        assert!(!RpcError::Http { status: 400, body: String::new() }.is_transient());
        assert!(!RpcError::Malformed("x".into()).is_transient());
        assert!(!remote_error(serde_json::json!({"code": -32000})).is_transient());
    }

    #[test]
    fn test_remote_error_keeps_raw_object() {
        let raw = serde_json::json!({
            "code": -32000,
            "message": "Server error",
            "cause": {"name": "UNKNOWN_ACCOUNT"}
        });
        match remote_error(raw) {
            RpcError::Remote { code, message, raw } => {
                assert_eq!(code, -32000);
                assert_eq!(message, "Server error");
                assert_eq!(raw["cause"]["name"], "UNKNOWN_ACCOUNT");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_request_envelope() {
        let params = serde_json::json!(["abc"]);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "getAccountInfo",
            params: &params,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "getAccountInfo");
        assert_eq!(json["params"][0], "abc");
    }

    #[test]
    fn test_null_result_is_accepted() {
        let envelope: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(envelope.error.is_none());
        assert!(envelope.result.is_null());
    }

    #[test]
    fn test_truncate_long_bodies() {
        let body = "x".repeat(MAX_ERROR_BODY * 2);
        assert!(truncate(&body).len() < body.len());
        assert_eq!(truncate("short"), "short");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to speak HTTP.
        let client = JsonRpcClient::new(
            "http://127.0.0.1:9",
            Duration::from_secs(2),
            RetryPolicy::none(),
        )
        .unwrap();

        let result: Result<Value, _> = client.call("status", serde_json::json!([])).await;
        assert!(matches!(
            result,
            Err(RpcError::Transport(_)) | Err(RpcError::Timeout(_))
        ));
    }
}
