//! Outbound gateway client.

use std::time::Duration;

use async_trait::async_trait;
use herald_core::{Gateway, GatewayError, GatewayResult};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{TransportError, TransportResult};

/// Default bound on every gateway call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Calls a OneBot v11 HTTP API at `http://{socket}/{action}`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Creates a gateway for `socket` (`host:port`, or a full base URL)
    /// with the default timeout.
    pub fn new(socket: &str) -> TransportResult<Self> {
        Self::with_timeout(socket, DEFAULT_TIMEOUT)
    }

    /// Creates a gateway with a custom timeout.
    pub fn with_timeout(socket: &str, timeout: Duration) -> TransportResult<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url(socket),
            timeout,
        })
    }

    /// Returns the base URL calls are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout.as_millis() as u64)
        } else {
            GatewayError::http(err)
        }
    }
}

fn base_url(socket: &str) -> String {
    let socket = socket.trim().trim_end_matches('/');
    if socket.starts_with("http://") || socket.starts_with("https://") {
        socket.to_string()
    } else {
        format!("http://{socket}")
    }
}

/// Extracts `data` from a OneBot response envelope.
///
/// Bodies without a `retcode` are passed through unchanged.
fn unwrap_envelope(body: Value) -> GatewayResult<Value> {
    let Some(retcode) = body.get("retcode").and_then(Value::as_i64) else {
        return Ok(body);
    };
    if retcode != 0 {
        let message = ["message", "wording", "msg"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();
        return Err(GatewayError::Api { retcode, message });
    }
    Ok(body.get("data").cloned().unwrap_or(Value::Null))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn call_api(&self, action: &str, params: Value) -> GatewayResult<Value> {
        let url = format!("{}/{action}", self.base_url);
        trace!(url = %url, "Calling gateway");

        let resp = self
            .client
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await.map_err(|e| self.map_send_error(e))?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;

        debug!(action, "Gateway call succeeded");
        unwrap_envelope(value)
    }
}
