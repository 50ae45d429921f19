//! reqwest-backed transport.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response, Url};
use serde_json::Value;

use super::Transport;
use crate::types::{BackendConfig, TransportError};

/// Longest slice of an error body carried into a `Status` error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// HTTP transport joining adapter targets onto a fixed base URL.
///
/// Cloning is cheap: the underlying client is reference counted.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &BackendConfig) -> Result<Self, TransportError> {
        let parsed = Url::parse(&config.base_url).map_err(|e| TransportError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(TransportError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "not a base url".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an adapter target. Targets always start with `/`.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn read(response: Response) -> Result<Bytes, TransportError> {
        let status = response.status();
        if status.is_success() {
            return response
                .bytes()
                .await
                .map_err(|e| TransportError::Request(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<Bytes, TransportError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Self::read(response).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Bytes, TransportError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let mut request = self.client.post(&url);
        if let Some(body) = body.as_ref() {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Self::read(response).await
    }
}
