use crate::task::TaskState;
use axum::Router;
use axum::routing::get;

pub mod v1;

/// Creates the JSON API routes, all mounted under `/api`.
pub fn create_api_router(task_state: TaskState) -> Router {
    let tasks_router = crate::task::api::v1::create_api_router(task_state);
    let api_routes = Router::new()
        .route("/health", get(v1::health_check_handler))
        .merge(tasks_router);
    Router::new().nest("/api", api_routes)
}
