use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::error::SeatingError;
use crate::models::requests::{ProjectList, ProjectRequest, ProjectStatus};
use crate::models::SeatingPlan;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/projects/list", get(list_projects))
        .route("/projects/seatingplan/{name}", get(show_project))
        .route("/projects/new/{name}", post(new_project))
        .route("/projects/save", post(save_project))
        .route("/projects/load", post(load_project))
        .route("/projects/{name}", delete(delete_project))
}

fn status(status: &str, name: &str) -> Json<ProjectStatus> {
    Json(ProjectStatus {
        status: status.to_string(),
        name: name.to_string(),
    })
}

// GET /api/projects/list
async fn list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, SeatingError> {
    let projects = state.storage.list().await?;
    Ok(Json(ProjectList { projects }))
}

// GET /api/projects/seatingplan/{name}
async fn show_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, SeatingError> {
    Ok(Json(state.storage.read(&name).await?))
}

// POST /api/projects/new/{name} - очищает текущий план
async fn new_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    *state.plan.write().await = SeatingPlan::new(name.clone());
    info!("Started new project {}", name);
    status("new", &name)
}

// POST /api/projects/save
async fn save_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProjectRequest>,
) -> Result<impl IntoResponse, SeatingError> {
    // Снимок плана, чтобы не держать блокировку во время записи файла
    let plan = {
        let mut plan = state.plan.write().await;
        plan.name = req.name.clone();
        plan.clone()
    };
    state.storage.save(&req.name, &plan).await?;
    Ok(status("saved", &req.name))
}

// POST /api/projects/load - заменяет текущий план
async fn load_project(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProjectRequest>,
) -> Result<impl IntoResponse, SeatingError> {
    let plan = state.storage.load(&req.name).await?;
    *state.plan.write().await = plan;
    Ok(status("loaded", &req.name))
}

// DELETE /api/projects/{name}
async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, SeatingError> {
    state.storage.delete(&name).await?;
    Ok(status("deleted", &name))
}
