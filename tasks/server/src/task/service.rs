use super::{NewTask, Task, TaskChanges, TaskFilter};
use crate::entities::tasks;
use crate::repository::Repository;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{ActiveEnum, ActiveValue, ColumnTrait, DatabaseConnection};
use std::sync::Arc;

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Any failure reported by the store.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Task use cases, as seen by the HTTP handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Stores a new task stamped with the current time.
    async fn create_task(&self, task: NewTask) -> Result<Task, TaskServiceError>;

    /// Lists tasks matching `filter`.
    async fn get_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskServiceError>;

    /// Applies `changes` to the task with `id` and returns the number of rows
    /// affected. An unknown id, including one outside the key range, affects
    /// zero rows and is not an error.
    async fn update_task(&self, id: i64, changes: TaskChanges) -> Result<u64, TaskServiceError>;
}

/// [`TaskService`] backed by the relational store.
#[derive(Clone, Debug)]
pub struct DbTaskService {
    db: Arc<DatabaseConnection>,
}

impl DbTaskService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn tasks(&self) -> Repository<'_, tasks::Entity> {
        Repository::new(&self.db)
    }
}

#[async_trait]
impl TaskService for DbTaskService {
    #[tracing::instrument(skip(self))]
    async fn create_task(&self, task: NewTask) -> Result<Task, TaskServiceError> {
        let now = Utc::now();
        let model = tasks::ActiveModel {
            title: ActiveValue::Set(task.title),
            description: ActiveValue::Set(task.description),
            image: ActiveValue::Set(task.image),
            status: ActiveValue::Set(task.status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        let created = self.tasks().create(model).await?;
        Ok(Task::from(created))
    }

    #[tracing::instrument(skip(self))]
    async fn get_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>, TaskServiceError> {
        let mut query = self.tasks();
        if let Some(title) = filter.title {
            query = query.filter(tasks::Column::Title.starts_with(title));
        }
        if let Some(description) = filter.description {
            query = query.filter(tasks::Column::Description.starts_with(description));
        }
        if let Some((sort_by, sort_order)) = filter.sort {
            query = query.order_by(sort_by.column(), sort_order.into());
        }

        let tasks = query.find().await?.into_iter().map(Task::from).collect();
        Ok(tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn update_task(&self, id: i64, changes: TaskChanges) -> Result<u64, TaskServiceError> {
        let Ok(id) = i32::try_from(id) else {
            tracing::debug!("Task ID {} is outside the key range", id);
            return Ok(0);
        };

        let mut values: Vec<(tasks::Column, SimpleExpr)> = Vec::new();
        if let Some(title) = changes.title {
            values.push((tasks::Column::Title, Expr::value(title)));
        }
        if let Some(description) = changes.description {
            values.push((tasks::Column::Description, Expr::value(description)));
        }
        if let Some(image) = changes.image {
            values.push((tasks::Column::Image, Expr::value(image)));
        }
        if let Some(status) = changes.status {
            values.push((tasks::Column::Status, Expr::value(status.to_value())));
        }
        values.push((tasks::Column::UpdatedAt, Expr::value(Utc::now())));

        let rows_affected = self
            .tasks()
            .filter(tasks::Column::Id.eq(id))
            .updates(values)
            .await?;
        if rows_affected == 0 {
            tracing::debug!("No task with ID {} to update", id);
        }
        Ok(rows_affected)
    }
}
