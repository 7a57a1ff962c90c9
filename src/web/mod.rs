use axum::{response::Json, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{AppConfig, ValuationPipeline};

pub mod handlers;
pub mod responses;

pub use handlers::{index_page, valuations_api};
pub use responses::*;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ValuationPipeline>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> crate::Result<Self> {
        let pipeline = Arc::new(ValuationPipeline::new(&config)?);
        Ok(Self { pipeline, config })
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(index_page))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new().route("/valuations", get(valuations_api))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "car-valuator"
    }))
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server starting on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
