//! HTTP collaborator
//!
//! [`HttpTransport`] is the seam the editor talks through. [`ReqwestTransport`]
//! is the production implementation: it resolves relative backend paths
//! against a base URL and maps every non-2xx outcome into an [`HttpError`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::HttpError;

/// Minimal JSON-over-HTTP contract used by the editor.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// GET a relative path such as `backend/config/gauges?server-id=1`.
    async fn get(&self, path: &str) -> Result<Value, HttpError>;

    /// POST a JSON body to a relative path.
    async fn post(&self, path: &str, body: Value) -> Result<Value, HttpError>;
}

/// [`HttpTransport`] backed by `reqwest`.
pub struct ReqwestTransport {
    base_url: String,
    client: Client,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read(response: Response) -> Result<Value, HttpError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::network(e.to_string()))?;

        if !status.is_success() {
            // Backend errors carry a JSON body with a `message` discriminator.
            let message = serde_json::from_slice::<Value>(&body).ok().and_then(|v| {
                v.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            return Err(HttpError::status(status.as_u16(), message));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| {
            HttpError::status(status.as_u16(), Some(format!("Invalid JSON response: {e}")))
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> Result<Value, HttpError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HttpError::network(e.to_string()))?;
        Self::read(response).await
    }

    #[instrument(skip(self, body))]
    async fn post(&self, path: &str, body: Value) -> Result<Value, HttpError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| HttpError::network(e.to_string()))?;
        Self::read(response).await
    }
}
