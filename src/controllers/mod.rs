pub mod projects;
pub mod seats;
pub mod sections;

use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(sections::routes())
        .merge(seats::routes())
        .merge(projects::routes())
}
