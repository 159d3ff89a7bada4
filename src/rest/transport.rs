use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::error::HarnessError;
use crate::rest::request::{PreparedRequest, RequestBuilder};
use crate::rest::response::ApiResponse;

pub const DEFAULT_HOST: &str = "https://qa-scooter.praktikum-services.ru";
pub const API_PREFIX: &str = "/api/v1";
pub const JSON: &str = "application/json";

/// Base endpoint and default content negotiation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    base_url: String,
    content_type: String,
}

impl TransportConfig {
    /// Targets `host` (scheme and authority) under the versioned API prefix.
    pub fn for_host(host: &str) -> Self {
        Self {
            base_url: format!("{}{API_PREFIX}", host.trim_end_matches('/')),
            content_type: JSON.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::for_host(DEFAULT_HOST)
    }
}

/// Executes prepared requests. Cloning shares the connection pool.
///
/// Each call is a single blocking attempt: no retries and no client timeout.
#[derive(Debug, Clone)]
pub struct Transport {
    config: Arc<TransportConfig>,
    client: Client,
}

impl Transport {
    pub fn new(config: TransportConfig) -> Result<Self, HarnessError> {
        let client = Client::builder().timeout(None::<Duration>).build()?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn send(&self, request: RequestBuilder) -> Result<ApiResponse, HarnessError> {
        let prepared = request.build(&self.config)?;
        self.execute(prepared)
    }

    pub fn execute(&self, request: PreparedRequest) -> Result<ApiResponse, HarnessError> {
        debug!(
            method = %request.method,
            url = %request.url,
            body = request.body_text().as_deref().unwrap_or(""),
            "sending request"
        );

        let mut outbound = self
            .client
            .request(request.method.clone(), request.url.clone())
            .header(ACCEPT, self.config.content_type());
        if let Some(body) = request.body {
            outbound = outbound
                .header(CONTENT_TYPE, request.content_type)
                .body(body);
        }

        let response = outbound.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        let response = ApiResponse::new(status, headers, body);

        debug!(
            status = status.as_u16(),
            body = %response.text(),
            "received response"
        );

        Ok(response)
    }
}
