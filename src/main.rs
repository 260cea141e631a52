// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use std::{env, sync::Arc};
use xray_annotator::{
    api::{start_server, AppState},
    config::AnnotatorConfig,
    detection::DetectionTable,
    service::AnnotationPipeline,
    version,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    tracing::info!(
        "Starting X-ray annotation service {} (built {})",
        version::VERSION,
        version::BUILD_DATE
    );

    let config = AnnotatorConfig::from_env().context("invalid configuration")?;
    let addr = config.bind_address()?;

    // The table is loaded once and shared read-only for the process lifetime
    let table = DetectionTable::load(&config.table_path).with_context(|| {
        format!(
            "failed to load detection table {}",
            config.table_path.display()
        )
    })?;
    tracing::info!(
        "Detection table ready: {} rows, match strategy {}",
        table.len(),
        config.match_strategy
    );

    let pipeline = AnnotationPipeline::from_config(&config, Arc::new(table));
    let state = AppState::new(pipeline);

    tokio::select! {
        result = start_server(state, addr) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping");
        }
    }

    Ok(())
}
