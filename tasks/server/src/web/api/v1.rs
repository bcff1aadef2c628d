use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::task::api::v1::{TaskJson, TasksResponse};
use crate::task::{CreateTaskRequest, UpdateTaskRequest};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Success envelope without a payload.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusResponse {
    /// HTTP status code, always 200
    pub status: u16,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
        }
    }
}

/// Error body returned for every 4xx and 5xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorResponse {
    /// HTTP status code
    pub code: u16,
    /// Human readable message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: StatusCode, message: String) -> Self {
        Self {
            code: code.as_u16(),
            message,
        }
    }
}

/// Handler for GET /api/health.
#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    ),
    tag = "Health"
)]
pub async fn health_check_handler() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_handler,
        crate::task::api::v1::create_task_handler,
        crate::task::api::v1::get_tasks_handler,
        crate::task::api::v1::update_task_handler,
    ),
    components(schemas(
        StatusResponse,
        ErrorResponse,
        TaskJson,
        TasksResponse,
        TaskStatus,
        CreateTaskRequest,
        UpdateTaskRequest,
    )),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Tasks", description = "Create, list and update tasks")
    )
)]
pub struct ApiDoc;
