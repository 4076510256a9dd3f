use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("routing service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("routing service answered {status}: {detail}")]
    UpstreamStatus { status: u16, detail: String },
    #[error("routing service sent an unreadable body: {0}")]
    UpstreamBody(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Unreachable(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!("upstream failure ({status}): {self}");
        (
            status,
            Json(ApiError {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
