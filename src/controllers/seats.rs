use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::SeatingError;
use crate::models::requests::SeatRequest;
use crate::models::SeatAddress;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/seats/{section}", get(list_seats))
        .route("/seats/{section}/{row}", post(add_seat))
        .route("/seats/{section}/{row}/{seat}", delete(delete_seat))
}

// GET /api/seats/{section}
async fn list_seats(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
) -> Result<impl IntoResponse, SeatingError> {
    let plan = state.plan.read().await;
    Ok(Json(plan.section(&section)?.clone()))
}

// POST /api/seats/{section}/{row}
async fn add_seat(
    State(state): State<Arc<AppState>>,
    Path((section, row)): Path<(String, String)>,
    Json(req): Json<SeatRequest>,
) -> Result<impl IntoResponse, SeatingError> {
    let address = SeatAddress::new(row, req.seat_number)?;
    let mut plan = state.plan.write().await;
    plan.get_mut(&section)?.add_seat(&address);
    Ok((StatusCode::CREATED, Json(json!({ "status": "ok" }))))
}

// DELETE /api/seats/{section}/{row}/{seat}
async fn delete_seat(
    State(state): State<Arc<AppState>>,
    Path((section, row, seat)): Path<(String, String, String)>,
) -> Result<StatusCode, SeatingError> {
    let address = SeatAddress::new(row, seat)?;
    let mut plan = state.plan.write().await;
    plan.get_mut(&section)?.delete_seat(&address);
    Ok(StatusCode::NO_CONTENT)
}
