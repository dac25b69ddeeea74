//! JSON-RPC transport for the Zabbix API.
//!
//! One HTTP POST per call, no retries, no pooling beyond what reqwest
//! provides by default. API-level errors (non-null `error` in the response
//! envelope) surface as [`MonitorError::Api`] and are never swallowed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::error::MonitorError;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    #[serde(skip_serializing_if = "str::is_empty")]
    auth: &'a str,
    id: u64,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Client bound to one Zabbix endpoint and token.
///
/// Request ids increment per instance; the token rides in the `auth`
/// field of every envelope and is omitted when empty.
#[derive(Debug)]
pub struct RpcClient {
    endpoint: String,
    token: String,
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Builds a client, failing with `Config` before any network activity
    /// when the endpoint or token is missing.
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, MonitorError> {
        if endpoint.trim().is_empty() || token.trim().is_empty() {
            return Err(MonitorError::Config("server URL or API token not set"));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    /// Issues a single `method` call and decodes `result` into `T`.
    pub async fn call<T>(&self, method: &str, params: Value) -> Result<T, MonitorError>
    where
        T: serde::de::DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            auth: &self.token,
            id,
        };

        debug!(method, id, "issuing api call");
        let response = self
            .http
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let envelope: RpcResponse = serde_json::from_str(&body)?;
        if let Some(error) = envelope.error {
            return Err(MonitorError::Api {
                code: error.code,
                message: error.message,
            });
        }
        let result = envelope.result.unwrap_or(Value::Null);
        Ok(serde_json::from_value(result)?)
    }
}
