//! Request payloads and their validation.
//!
//! Payload fields are plain strings so that an empty value can mean "not
//! supplied". Validation turns them into the typed values the service accepts;
//! nothing downstream re-checks them.

use super::{NewTask, SortBy, SortOrder, TITLE_MAX_CHARS, TaskChanges, TaskFilter};
use crate::entities::sea_orm_active_enums::TaskStatus;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// Client input that failed validation. The message is returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is exceeded more than 100")]
    TitleTooLong,
    #[error("status is invalid")]
    InvalidStatus,
    #[error("sort by is invalid")]
    InvalidSortBy,
    #[error("sort order is invalid")]
    InvalidSortOrder,
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            _ => Err(ValidationError::InvalidStatus),
        }
    }
}

impl FromStr for SortBy {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "title" => Ok(SortBy::Title),
            "created_at" => Ok(SortBy::CreatedAt),
            "updated_at" => Ok(SortBy::UpdatedAt),
            "status" => Ok(SortBy::Status),
            _ => Err(ValidationError::InvalidSortBy),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ValidationError::InvalidSortOrder),
        }
    }
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Parses `value` unless it is empty, which means "not supplied".
fn parse_non_empty<T: FromStr>(value: &str) -> Result<Option<T>, T::Err> {
    if value.is_empty() {
        Ok(None)
    } else {
        value.parse().map(Some)
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Reads a JSON `null` as an empty string, i.e. "not supplied".
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateTaskRequest {
    /// At most 100 characters
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub image: String,
    /// `IN_PROGRESS` or `COMPLETED`
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        check_title(&self.title)?;
        let status = self.status.parse()?;

        Ok(NewTask {
            title: self.title,
            description: self.description,
            image: self.image,
            status,
        })
    }
}

/// Body of `PUT /api/tasks/{id}`. Empty, null or missing fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct UpdateTaskRequest {
    /// At most 100 characters
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub image: String,
    /// `IN_PROGRESS` or `COMPLETED`
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
}

impl UpdateTaskRequest {
    // Empty strings mean "unchanged", so a field can never be cleared through
    // this request. Kept as is until product decides otherwise.
    pub fn validate(self) -> Result<TaskChanges, ValidationError> {
        check_title(&self.title)?;
        let status = parse_non_empty(&self.status)?;

        Ok(TaskChanges {
            title: non_empty(self.title),
            description: non_empty(self.description),
            image: non_empty(self.image),
            status,
        })
    }
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Only tasks whose title starts with this value
    pub title: String,
    /// Only tasks whose description starts with this value
    pub description: String,
    /// One of `title`, `created_at`, `updated_at`, `status`
    pub sort_by: String,
    /// `asc` or `desc`
    pub sort_order: String,
}

impl TaskListQuery {
    pub fn validate(self) -> Result<TaskFilter, ValidationError> {
        let sort_by: Option<SortBy> = parse_non_empty(&self.sort_by)?;
        let sort_order: Option<SortOrder> = parse_non_empty(&self.sort_order)?;

        Ok(TaskFilter {
            title: non_empty(self.title),
            description: non_empty(self.description),
            sort: sort_by.zip(sort_order),
        })
    }
}
