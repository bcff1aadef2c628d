use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, Order, TransactionTrait};
use std::sync::Arc;
use tasks_server::entities::sea_orm_active_enums::TaskStatus;
use tasks_server::entities::tasks;
use tasks_server::repository::Repository;
use tasks_server::task::{
    DbTaskService, NewTask, SortBy, SortOrder, TaskChanges, TaskFilter, TaskService,
};
use testcontainers_modules::{postgres, testcontainers};

mod common;

pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: Arc<DatabaseConnection>,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    Ok(TestContext {
        db: Arc::new(db),
        container,
    })
}

fn new_task(title: &str, description: &str, status: TaskStatus) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: description.to_string(),
        image: "foo".to_string(),
        status,
    }
}

#[tokio::test]
async fn can_create_and_list_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));

    service
        .create_task(new_task("foo", "foo", TaskStatus::Completed))
        .await
        .expect("Failed to create task");

    let tasks = service
        .get_tasks(TaskFilter::default())
        .await
        .expect("Failed to list tasks");

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "foo");
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert_eq!(tasks[0].created_at, tasks[0].updated_at);
}

#[tokio::test]
async fn can_update_only_the_image() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));
    let created = service
        .create_task(new_task("foo", "bar", TaskStatus::InProgress))
        .await
        .expect("Failed to create task");
    let before = service
        .get_tasks(TaskFilter::default())
        .await
        .expect("Failed to list tasks")
        .remove(0);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let rows_affected = service
        .update_task(
            created.id.into(),
            TaskChanges {
                image: Some("new.png".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update task");

    let after = service
        .get_tasks(TaskFilter::default())
        .await
        .expect("Failed to list tasks")
        .remove(0);
    assert_eq!(rows_affected, 1);
    assert_eq!(after.image, "new.png");
    assert_eq!(after.title, before.title);
    assert_eq!(after.description, before.description);
    assert_eq!(after.status, before.status);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test]
async fn update_of_missing_task_affects_no_rows() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));

    let rows_affected = service
        .update_task(
            4242,
            TaskChanges {
                title: Some("ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Update of a missing task should not fail");

    assert_eq!(rows_affected, 0);
}

#[tokio::test]
async fn filters_by_case_sensitive_prefix() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));
    for title in ["foo bar", "Foo", "barfoo"] {
        service
            .create_task(new_task(title, "desc", TaskStatus::InProgress))
            .await
            .expect("Failed to create task");
    }

    let tasks = service
        .get_tasks(TaskFilter {
            title: Some("foo".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to list tasks");

    let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["foo bar"]);
}

#[tokio::test]
async fn filters_by_description_prefix() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));
    for (title, description) in [("one", "bar baz"), ("two", "foobar"), ("three", "Bar")] {
        service
            .create_task(new_task(title, description, TaskStatus::InProgress))
            .await
            .expect("Failed to create task");
    }

    let tasks = service
        .get_tasks(TaskFilter {
            description: Some("bar".to_string()),
            ..Default::default()
        })
        .await
        .expect("Failed to list tasks");

    let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["one"]);
}

#[tokio::test]
async fn can_sort_by_title_descending() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));
    for title in ["b", "c", "a"] {
        service
            .create_task(new_task(title, "desc", TaskStatus::Completed))
            .await
            .expect("Failed to create task");
    }

    let tasks = service
        .get_tasks(TaskFilter {
            sort: Some((SortBy::Title, SortOrder::Desc)),
            ..Default::default()
        })
        .await
        .expect("Failed to list tasks");

    let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "b", "a"]);
}

#[tokio::test]
async fn repository_can_count_page_and_delete() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));
    for title in ["one", "two", "three"] {
        service
            .create_task(new_task(title, "desc", TaskStatus::InProgress))
            .await
            .expect("Failed to create task");
    }

    let total = Repository::<tasks::Entity>::new(state.db.as_ref())
        .count()
        .await
        .expect("Failed to count");
    assert_eq!(total, 3);

    let second = Repository::<tasks::Entity>::new(state.db.as_ref())
        .order_by(tasks::Column::Id, Order::Asc)
        .offset(1)
        .first()
        .await
        .expect("Failed to fetch")
        .expect("Second task should exist");
    assert_eq!(second.title, "two");

    let deleted = Repository::<tasks::Entity>::new(state.db.as_ref())
        .filter(tasks::Column::Title.eq("two"))
        .delete()
        .await
        .expect("Failed to delete");
    assert_eq!(deleted, 1);

    let remaining = Repository::<tasks::Entity>::new(state.db.as_ref())
        .count()
        .await
        .expect("Failed to count");
    assert_eq!(remaining, 2);
}

#[tokio::test]
async fn rolls_back_failed_transaction() {
    let state = setup().await.expect("Failed to setup test context");
    let service = DbTaskService::new(Arc::clone(&state.db));
    let created = service
        .create_task(new_task("keep", "desc", TaskStatus::InProgress))
        .await
        .expect("Failed to create task");

    let txn = state.db.begin().await.expect("Failed to begin");
    let deleted = Repository::<tasks::Entity, _>::new(&txn)
        .filter(tasks::Column::Id.eq(created.id))
        .delete()
        .await
        .expect("Failed to delete");
    assert_eq!(deleted, 1);
    txn.rollback().await.expect("Failed to roll back");

    let still_there = Repository::<tasks::Entity>::new(state.db.as_ref())
        .filter(tasks::Column::Id.eq(created.id))
        .first()
        .await
        .expect("Failed to fetch");
    assert!(still_there.is_some());

    let result: Result<u64, DbErr> = Repository::<tasks::Entity>::new(state.db.as_ref()).delete().await;
    assert!(result.is_err(), "unfiltered delete must be refused");
}
