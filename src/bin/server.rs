//! HTTP front door (SPEC_FULL.md §10.5): `POST /v1/screen`, feature-gated
//! behind `server` since the spec treats the transport as out of scope —
//! this binary exists to expose the pipeline, not to define its contract.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use sanctions_gate::config::PipelineConfig;
use sanctions_gate::pipeline::{self, Pipeline, ScreenRequest};
use sanctions_gate::search::InMemoryIndex;
use sanctions_gate::signals::sanctioned_cache::SanctionedIdCache;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<Pipeline>,
    metrics: Arc<sanctions_gate::metrics::MetricsCollector>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Arc::new(PipelineConfig::default());
    let sanctioned_ids = Arc::new(SanctionedIdCache::new());
    let ac_index = Arc::new(InMemoryIndex::new());
    let pipeline = Arc::new(Pipeline::new(config, sanctioned_ids, ac_index, None, None));
    let metrics = Arc::new(sanctions_gate::metrics::MetricsCollector::new());

    let state = AppState { pipeline, metrics };

    let app = Router::new()
        .route("/v1/screen", post(screen_handler))
        .route("/healthz", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    info!(%addr, "sanctions-gate-server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    StatusCode::OK
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

async fn screen_handler(
    State(state): State<AppState>,
    Json(request): Json<ScreenRequest>,
) -> impl IntoResponse {
    state.metrics.record_request();
    match state.pipeline.screen(request).await {
        Ok(response) => {
            if !response.success {
                state.metrics.record_failure();
            }
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => {
            error!(%err, "screen request failed validation");
            state.metrics.record_failure();
            (StatusCode::BAD_REQUEST, Json(pipeline::error_response(&err))).into_response()
        }
    }
}
