use crate::app::feed_window::FeedWindow;
use crate::app::neo_use_case::NeoClient;
use crate::constants::{
    MSG_ID_REQUIRED, MSG_LOOKUP_FAILED, MSG_METHOD_NOT_ALLOWED, SKIPPED_RECORDS_HEADER,
};
use crate::error::NeoError;
use crate::observability;
use crate::types::NormalizeStrategy;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::Server;
use serde::Deserialize;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub neo: NeoClient,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub strategy: NormalizeStrategy,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub id: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

fn upstream_status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "neo-tracker",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus exposition
async fn metrics_handler() -> Response {
    match observability::render() {
        Some(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        None => error_response(StatusCode::SERVICE_UNAVAILABLE, "metrics not initialized"),
    }
}

/// Normalized asteroid list for the dashboard
async fn asteroids(
    State(state): State<AppState>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let window = match FeedWindow::parse(q.start_date.as_deref(), q.end_date.as_deref()) {
        Ok(window) => window,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.neo.fetch_normalized(window, q.strategy).await {
        Ok(outcome) => {
            let skipped = outcome.errors.len();
            let mut resp = Json(outcome.asteroids).into_response();
            if q.strategy == NormalizeStrategy::Lenient {
                resp.headers_mut()
                    .insert(SKIPPED_RECORDS_HEADER, HeaderValue::from(skipped));
            }
            resp
        }
        Err(e) => {
            error!("Asteroid feed failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Raw upstream record passthrough for a single asteroid
async fn fetch_asteroid(
    State(state): State<AppState>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Response {
    let Query(q) = match query {
        Ok(q) => q,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };
    let id = q.id.unwrap_or_default();

    match state.neo.lookup(&id).await {
        Ok(body) => Json(body).into_response(),
        Err(NeoError::Validation(_)) => error_response(StatusCode::BAD_REQUEST, MSG_ID_REQUIRED),
        Err(e @ (NeoError::NotFound(_) | NeoError::Fetch { status: Some(_), .. })) => {
            info!("Asteroid lookup for '{}' rejected upstream: {}", id, e);
            error_response(upstream_status(e.status_code()), MSG_LOOKUP_FAILED)
        }
        Err(e) => {
            error!("Asteroid lookup for '{}' failed: {}", id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, MSG_METHOD_NOT_ALLOWED)
}

/// Create the HTTP router with all routes
pub fn create_server(neo: NeoClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/asteroids", get(asteroids))
        .route(
            "/api/fetch-asteroid",
            get(fetch_asteroid).fallback(method_not_allowed),
        )
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(AppState { neo })
}

/// Start the HTTP server on the specified port
pub async fn start_server(neo: NeoClient, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server(neo);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://localhost:{port}");
    info!("Asteroid feed: http://localhost:{port}/asteroids");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
