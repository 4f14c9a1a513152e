//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::rendering::ChartRenderer;
use crate::services::{TemplateService, UploadStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<UploadStore>,
    pub charts: Arc<ChartRenderer>,
    pub templates: Arc<TemplateService>,
}

/// Create application state from configuration and an asset loader.
///
/// Opens the upload directory and makes sure the default image exists, so
/// the first page render works on a fresh deployment.
pub fn create_app_state(
    config: Arc<AppConfig>,
    asset_loader: Arc<AssetLoader>,
) -> anyhow::Result<AppState> {
    let store = Arc::new(UploadStore::new(&config.upload_dir)?);
    store.ensure_default()?;

    let charts = Arc::new(ChartRenderer::new());
    let templates = Arc::new(TemplateService::new(asset_loader));

    Ok(AppState {
        config,
        store,
        charts,
        templates,
    })
}

/// Build the router with all endpoints and middleware.
///
/// This is the core router used by both production and tests. Stored
/// images are served statically from the configured upload directory.
pub fn build_router(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();
    let max_upload = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(api::handle_index).post(api::handle_process))
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Stored originals and processed images
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
