// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::annotate::{annotate_file_handler, annotate_handler};
use crate::service::AnnotationPipeline;
use crate::version;

/// Room for multipart framing on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AnnotationPipeline>,
}

impl AppState {
    pub fn new(pipeline: AnnotationPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub table_rows: usize,
    pub match_strategy: String,
}

pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .pipeline
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/api/image/annotate", post(annotate_handler))
        .route("/api/image/annotate/file", post(annotate_file_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("X-ray annotation API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler() -> &'static str {
    "X-ray Annotation API is running"
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let resolver = state.pipeline.resolver();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION.to_string(),
        table_rows: resolver.table().len(),
        match_strategy: resolver.strategy().to_string(),
    })
}
