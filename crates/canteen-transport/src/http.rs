//! # HTTP Transport
//!
//! Production [`Transport`] backed by a shared `reqwest::Client`.

use crate::error::TransportError;
use crate::message::{ApiRequest, ApiResponse, Method, RequestBody};
use crate::transport::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Sends [`ApiRequest`]s to `base_url` over HTTP.
///
/// The underlying `reqwest::Client` pools connections, so one `HttpTransport`
/// should be shared (behind an `Arc`) by every client in the process.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(request = %request.label()))]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Request failed");
            TransportError::from(e)
        })?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        // Error pages and empty bodies are not JSON; keep the status, drop the body.
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        debug!(status, "Response received");
        Ok(ApiResponse { status, body })
    }
}
