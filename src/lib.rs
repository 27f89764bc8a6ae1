pub mod api_client;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use api_client::ApiClient;
pub use error::SeatingError;

// Shared state для всего сервиса: текущий план в памяти и каталог проектов
pub struct AppState {
    pub plan: RwLock<models::SeatingPlan>,
    pub storage: storage::ProjectStorage,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Arc<Self> {
        let storage = storage::ProjectStorage::new(config.storage.projects_dir.clone());
        Arc::new(Self {
            plan: RwLock::new(models::SeatingPlan::default()),
            storage,
            config,
        })
    }
}

/// Полный роутер сервиса: служебные маршруты и API под `/api`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(|| async { Json(json!({ "status": "ok", "message": "Seating Plan API" })) }),
        )
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
