use std::future::Future;

use seed::fetch::{self, FetchError, Method, Request};
use shared::{RouteRequest, RouteResponse};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("could not read response: {0}")]
    Decode(String),
}

impl From<FetchError> for TransportError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::StatusError(status) => TransportError::Status(status.code),
            FetchError::JsonError(err) => TransportError::Decode(format!("{err:?}")),
            other => TransportError::Network(format!("{other:?}")),
        }
    }
}

/// The two calls the client makes to the routing service.
pub trait RouteApi {
    fn fetch_route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<RouteResponse, TransportError>>;

    fn fetch_gpx(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>>;
}

fn api_root() -> String {
    if let Some(url) = option_env!("FRONTEND_API_ROOT") {
        return url.trim_end_matches('/').to_string();
    }
    String::new()
}

#[derive(Debug, Clone)]
pub struct HttpRouteApi {
    root: String,
}

impl Default for HttpRouteApi {
    fn default() -> Self {
        Self { root: api_root() }
    }
}

impl HttpRouteApi {
    async fn post(&self, path: &str, request: &RouteRequest) -> fetch::Result<fetch::Response> {
        Request::new(format!("{}{path}", self.root))
            .method(Method::Post)
            .json(request)?
            .fetch()
            .await?
            .check_status()
    }
}

impl RouteApi for HttpRouteApi {
    async fn fetch_route(&self, request: &RouteRequest) -> Result<RouteResponse, TransportError> {
        let response = self.post("/api/route", request).await?;
        Ok(response.json::<RouteResponse>().await?)
    }

    async fn fetch_gpx(&self, request: &RouteRequest) -> Result<Vec<u8>, TransportError> {
        let response = self.post("/download_gpx", request).await?;
        Ok(response.bytes().await?)
    }
}
