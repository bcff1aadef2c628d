use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::task::{
    CreateTaskRequest, Task, TaskListQuery, TaskServiceError, TaskState, UpdateTaskRequest,
    ValidationError,
};
use crate::web::api::v1::{ErrorResponse, StatusResponse};
use axum::{
    Router,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TaskJson {
    /// Unique identifier assigned by the store
    pub id: i32,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Reference to the task image
    pub image: String,
    pub status: TaskStatus,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            created_at: task.created_at,
            updated_at: task.updated_at,
            image: task.image,
            status: task.status,
        }
    }
}

/// API response for listing tasks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TasksResponse {
    /// HTTP status code, always 200
    pub status: u16,
    pub data: Vec<TaskJson>,
}

/// Failure of a task endpoint, rendered as an [`ErrorResponse`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be parsed.
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Service(#[from] TaskServiceError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Service(err) => {
                tracing::error!("Task service failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
                )
            }
        };
        (status, Json(ErrorResponse::new(status, message))).into_response()
    }
}

/// Handler for POST /api/tasks - Creates a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Task created", body = StatusResponse),
        (status = 400, description = "Malformed or invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<TaskState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = payload?;
    let new_task = request.validate()?;

    let task = state.service.create_task(new_task).await?;
    tracing::info!("Created task {}", task.id);
    Ok(Json(StatusResponse::ok()))
}

/// Handler for GET /api/tasks - Lists tasks, optionally filtered and sorted.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = TasksResponse),
        (status = 400, description = "Malformed or invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<TaskState>,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> Result<Json<TasksResponse>, ApiError> {
    let Query(query) = query?;
    let filter = query.validate()?;

    let tasks = state.service.get_tasks(filter).await?;
    Ok(Json(TasksResponse {
        status: StatusCode::OK.as_u16(),
        data: tasks.into_iter().map(TaskJson::from).collect(),
    }))
}

/// Handler for PUT /api/tasks/{id} - Applies a partial update.
///
/// The body is checked before the id, so a bad body wins over a bad id.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(
        ("id" = i64, Path, description = "Identifier of the task to update")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Update applied, including to no rows", body = StatusResponse),
        (status = 400, description = "Malformed or invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<TaskState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(request) = payload?;
    let changes = request.validate()?;
    let Path(id) = id?;

    let rows_affected = state.service.update_task(id, changes).await?;
    tracing::info!("Updated task {}, {} row(s) affected", id, rows_affected);
    Ok(Json(StatusResponse::ok()))
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: TaskState) -> Router {
    Router::new()
        .route("/tasks", get(get_tasks_handler).post(create_task_handler))
        .route("/tasks/{id}", put(update_task_handler))
        .with_state(state)
}
