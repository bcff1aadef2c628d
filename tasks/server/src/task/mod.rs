use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::entities::tasks;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub mod api;
pub mod request;
pub mod service;

pub use request::{CreateTaskRequest, TaskListQuery, UpdateTaskRequest, ValidationError};
pub use service::{DbTaskService, TaskService, TaskServiceError};

/// Longest title accepted, in characters. Matches the `varchar` size of the column.
pub const TITLE_MAX_CHARS: usize = 100;

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<tasks::Model> for Task {
    fn from(model: tasks::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            image: model.image,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A validated task ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub image: String,
    pub status: TaskStatus,
}

/// A validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Columns a task list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Title,
    CreatedAt,
    UpdatedAt,
    Status,
}

impl SortBy {
    pub fn column(self) -> tasks::Column {
        match self {
            SortBy::Title => tasks::Column::Title,
            SortBy::CreatedAt => tasks::Column::CreatedAt,
            SortBy::UpdatedAt => tasks::Column::UpdatedAt,
            SortBy::Status => tasks::Column::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for sea_orm::Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => sea_orm::Order::Asc,
            SortOrder::Desc => sea_orm::Order::Desc,
        }
    }
}

/// A validated task list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Prefix the title must start with.
    pub title: Option<String>,
    /// Prefix the description must start with.
    pub description: Option<String>,
    /// Applied only when both a column and a direction were supplied.
    pub sort: Option<(SortBy, SortOrder)>,
}

#[derive(Clone)]
pub struct TaskState {
    pub service: Arc<dyn TaskService>,
}

impl TaskState {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self { service }
    }
}
