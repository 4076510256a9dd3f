use std::time::Duration;

use shared::{RouteRequest, RouteResponse};

use crate::error::GatewayError;

const MAX_DETAIL_CHARS: usize = 200;

/// HTTP client for the routing service. Route finding and GPX generation
/// both happen there; this side only relays.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, request: &RouteRequest) -> Result<reqwest::Response, GatewayError> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!("forwarding to {url}");
        let response = self.http.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::UpstreamStatus {
                status: status.as_u16(),
                detail: body.trim().chars().take(MAX_DETAIL_CHARS).collect(),
            });
        }
        Ok(response)
    }

    /// Read failures count as a bad body.
    async fn post_for_body(&self, path: &str, request: &RouteRequest) -> Result<Vec<u8>, GatewayError> {
        let response = self.post(path, request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::UpstreamBody(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    pub async fn route(&self, request: &RouteRequest) -> Result<RouteResponse, GatewayError> {
        let bytes = self.post_for_body("/api/route", request).await?;
        serde_json::from_slice(&bytes).map_err(|err| GatewayError::UpstreamBody(err.to_string()))
    }

    pub async fn gpx(&self, request: &RouteRequest) -> Result<Vec<u8>, GatewayError> {
        self.post_for_body("/download_gpx", request).await
    }
}
