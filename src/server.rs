//! HTTP API for Page-Lens
//!
//! Exposes the analyzer over HTTP:
//! - `GET /api/fetch?url=<page>` downloads the page and returns its analysis
//! - `GET /health` reports liveness
//!
//! Requests are traced, tagged with an `x-request-id` and filtered through a
//! CORS layer built from [`ServerConfig`].

use crate::analysis::Analyzer;
use crate::config::{Config, ServerConfig};
use crate::fetch::{build_http_client, fetch_document};
use crate::Result;
use axum::extract::{Query, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    client: Client,
    analyzer: Arc<Analyzer>,
}

impl AppState {
    /// Builds the page client and the analyzer from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.fetcher)?;
        let analyzer = Analyzer::new(config)?;
        Ok(Self::from_parts(client, analyzer))
    }

    pub fn from_parts(client: Client, analyzer: Analyzer) -> Self {
        Self {
            client,
            analyzer: Arc::new(analyzer),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FetchQuery {
    #[serde(default)]
    url: String,
}

/// Build the axum Router with all endpoints and middleware
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/fetch", get(handle_fetch))
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Start the HTTP API and run until Ctrl-C
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::new(&config)?;
    let app = router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Page analysis server started on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .allow_credentials(true)
        .max_age(Duration::from_secs(300))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/fetch?url=
async fn handle_fetch(State(state): State<AppState>, Query(query): Query<FetchQuery>) -> Response {
    let url = query.url.trim();
    if url.is_empty() {
        tracing::error!("Missing URL parameter");
        return (StatusCode::BAD_REQUEST, "url parameter required").into_response();
    }

    let page = match fetch_document(&state.client, url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Fetch failed for {}: {}", url, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let result = state
        .analyzer
        .analyze_bytes(&page.body, page.charset.as_deref(), url)
        .await;
    (StatusCode::OK, Json(result)).into_response()
}
