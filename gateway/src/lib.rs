pub mod config;
pub mod error;
pub mod upstream;

use std::{path::Path, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::{RouteRequest, RouteResponse};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::error::GatewayError;
use crate::upstream::UpstreamClient;

pub const GPX_MIME: &str = "application/gpx+xml";
pub const GPX_DISPOSITION: &str = "attachment; filename=route.gpx";

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let client = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/route", post(route_handler))
        .route("/download_gpx", post(gpx_handler))
        .fallback_service(client)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "upstream": state.upstream.base_url(),
    }))
}

/// Relays a route request. A `success: false` answer is a normal response
/// for the client to show, not a gateway error.
async fn route_handler(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, GatewayError> {
    tracing::info!("route request: {:?} -> {:?}", req.start, req.end);
    let response = state.upstream.route(&req).await?;
    if response.success {
        tracing::info!(
            "route found: {} points, {:.0} m",
            response.path.len(),
            response.distance_m
        );
    } else {
        tracing::info!(
            "no route: {}",
            response.error.as_deref().unwrap_or("no reason given")
        );
    }
    Ok(Json(response))
}

async fn gpx_handler(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    tracing::info!("gpx request: {:?} -> {:?}", req.start, req.end);
    let body = state.upstream.gpx(&req).await?;
    tracing::debug!("relaying {} byte GPX file", body.len());
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(GPX_MIME)),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static(GPX_DISPOSITION),
            ),
        ],
        body,
    ))
}
