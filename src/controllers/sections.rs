use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::error::SeatingError;
use crate::models::requests::{
    BulkSeatsRequest, BulkSeatsResponse, CloneQuery, CloneResponse, CreateSectionRequest,
    RenameSectionRequest,
};
use crate::models::RangeSpec;
use crate::services::range;
use crate::AppState;

/// Максимум копий за один запрос на клонирование.
const MAX_CLONES: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sections", get(list_sections).post(create_section))
        .route(
            "/sections/{name}",
            get(get_section).delete(delete_section).patch(rename_section),
        )
        .route("/sections/{name}/clone", post(clone_section))
        .route("/sections/{name}/rows/range", post(apply_range))
        .route("/sections/{name}/rows/{row}/bulk", post(add_bulk_seats))
        .route("/sections/{name}/rows/{row}", delete(delete_row))
}

/* ---------- SECTIONS ---------- */

// GET /api/sections
async fn list_sections(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let plan = state.plan.read().await;
    Json(plan.summaries())
}

// POST /api/sections
async fn create_section(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSectionRequest>,
) -> Result<impl IntoResponse, SeatingError> {
    let mut plan = state.plan.write().await;
    let section = plan.add_section(&req.name, req.is_ga)?.clone();
    info!("Section {} created", section.name);
    Ok((StatusCode::CREATED, Json(section)))
}

// GET /api/sections/{name}
async fn get_section(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, SeatingError> {
    let plan = state.plan.read().await;
    Ok(Json(plan.section(&name)?.clone()))
}

// DELETE /api/sections/{name}
async fn delete_section(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> StatusCode {
    if state.plan.write().await.delete_section(&name) {
        info!("Section {} deleted", name);
    }
    StatusCode::NO_CONTENT
}

// PATCH /api/sections/{name}
async fn rename_section(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<RenameSectionRequest>,
) -> Result<impl IntoResponse, SeatingError> {
    let mut plan = state.plan.write().await;
    let section = plan.rename_section(&name, &req.new_name)?.clone();
    info!("Section {} renamed to {}", name, req.new_name);
    Ok(Json(section))
}

// POST /api/sections/{name}/clone?count=N
async fn clone_section(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(query): Query<CloneQuery>,
) -> Result<impl IntoResponse, SeatingError> {
    if query.count == 0 || query.count > MAX_CLONES {
        return Err(SeatingError::InvalidRange(format!(
            "clone count must be between 1 and {}",
            MAX_CLONES
        )));
    }
    let created = state.plan.write().await.clone_section(&name, query.count)?;
    info!("Section {} cloned as {:?}", name, created);
    Ok((StatusCode::CREATED, Json(CloneResponse { created })))
}

/* ---------- ROWS ---------- */

// POST /api/sections/{name}/rows/{row}/bulk
async fn add_bulk_seats(
    State(state): State<Arc<AppState>>,
    Path((name, row)): Path<(String, String)>,
    Json(req): Json<BulkSeatsRequest>,
) -> Result<impl IntoResponse, SeatingError> {
    let mut plan = state.plan.write().await;
    let section = plan.get_mut(&name)?;
    section.add_seats(&row, &req.seat_numbers)?;
    Ok((
        StatusCode::CREATED,
        Json(BulkSeatsResponse {
            status: "ok".to_string(),
            count: req.seat_numbers.len(),
        }),
    ))
}

// POST /api/sections/{name}/rows/range
//
// Тот же генератор, что и у клиента; возвращается обновленная секция.
async fn apply_range(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(spec): Json<RangeSpec>,
) -> Result<impl IntoResponse, SeatingError> {
    let mut plan = state.plan.write().await;
    let section = plan.get_mut(&name)?;
    let placements = range::generate(&spec, &section.row_labels())?;
    let added = section.apply_range_result(&placements);
    info!("Range applied to section {}: {} new seats", name, added);
    Ok((StatusCode::CREATED, Json(section.clone())))
}

// DELETE /api/sections/{name}/rows/{row}
async fn delete_row(
    State(state): State<Arc<AppState>>,
    Path((name, row)): Path<(String, String)>,
) -> Result<StatusCode, SeatingError> {
    let mut plan = state.plan.write().await;
    plan.get_mut(&name)?.delete_row(&row);
    Ok(StatusCode::NO_CONTENT)
}
