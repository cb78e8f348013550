use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/summary", get(handlers::get_summary))
        .route(
            "/api/entries",
            get(handlers::list_entries).post(handlers::add_entry),
        )
        .route("/api/entries/:id", delete(handlers::remove_entry))
        .route("/api/weight", post(handlers::set_weight))
        .route("/api/goal", post(handlers::set_goal))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/export", get(handlers::export_csv))
        .route("/api/import", post(handlers::import_csv))
        .with_state(state)
}
