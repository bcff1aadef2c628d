//! A chainable, table-agnostic data access facade over the SeaORM query builder.
//!
//! Every chaining call consumes the builder and hands back a new one with the
//! operation applied, so a base builder can be cloned and specialised per
//! request without mutating shared state. Terminal calls execute against the
//! bound connection (a pool or an open transaction) and surface store failures
//! as plain [`DbErr`]s.

use sea_orm::sea_query::{IntoCondition, SimpleExpr};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, Iterable, Order, PaginatorTrait,
    PrimaryKeyToColumn, QueryFilter, QueryOrder, QuerySelect, Select, TransactionError,
    TransactionTrait, TryIntoModel,
};
use std::future::Future;
use std::pin::Pin;

const MISSING_FILTER: &str = "refusing to modify rows without a filter";
const MISSING_VALUES: &str = "no columns to update";

/// Query builder for entity `E` bound to the store handle `C`.
pub struct Repository<'c, E, C = DatabaseConnection>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    conn: &'c C,
    filters: Vec<Condition>,
    orders: Vec<(E::Column, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl<E, C> Clone for Repository<'_, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            filters: self.filters.clone(),
            orders: self.orders.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl<'c, E, C> Repository<'c, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    /// Creates an unfiltered builder over every row of `E`.
    pub fn new(conn: &'c C) -> Self {
        Self {
            conn,
            filters: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Adds a predicate; predicates are joined with `AND`.
    pub fn filter<F: IntoCondition>(mut self, filter: F) -> Self {
        self.filters.push(filter.into_condition());
        self
    }

    /// Appends an `ORDER BY` term.
    ///
    /// Only typed entity columns are accepted, so arbitrary text can never
    /// reach the clause.
    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.orders.push((column, order));
        self
    }

    pub fn limit(self, limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..self
        }
    }

    pub fn offset(self, offset: u64) -> Self {
        Self {
            offset: Some(offset),
            ..self
        }
    }

    /// Builds the `SELECT` this builder currently describes.
    pub fn select(&self) -> Select<E> {
        let mut select = self
            .filters
            .iter()
            .cloned()
            .fold(E::find(), |select, condition| select.filter(condition));
        for (column, order) in &self.orders {
            select = select.order_by(*column, order.clone());
        }
        if let Some(limit) = self.limit {
            select = select.limit(limit);
        }
        if let Some(offset) = self.offset {
            select = select.offset(offset);
        }
        select
    }

    /// Fetches every matching row.
    pub async fn find(self) -> Result<Vec<E::Model>, DbErr> {
        self.select().all(self.conn).await
    }

    /// Fetches the first matching row, if any.
    pub async fn first(self) -> Result<Option<E::Model>, DbErr> {
        self.select().one(self.conn).await
    }

    /// Fetches the matching row with the highest primary key, after any
    /// explicit ordering.
    pub async fn last(self) -> Result<Option<E::Model>, DbErr> {
        let select = E::PrimaryKey::iter().fold(self.select(), |select, key| {
            select.order_by_desc(key.into_column())
        });
        select.one(self.conn).await
    }

    /// Counts matching rows. Ordering, limit and offset still apply to the
    /// counted sub-query.
    pub async fn count(self) -> Result<u64, DbErr>
    where
        E::Model: Sync,
    {
        self.select().count(self.conn).await
    }

    /// Inserts `model` and returns the stored row.
    pub async fn create<A>(self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'c,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(self.conn).await
    }

    /// Returns the first matching row, inserting `model` when nothing matches.
    /// The lookup and the insert are separate statements.
    pub async fn first_or_create<A>(self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'c,
        E::Model: IntoActiveModel<A>,
    {
        if let Some(found) = self.clone().first().await? {
            return Ok(found);
        }
        self.create(model).await
    }

    /// Inserts `model` when its primary key is unset, otherwise updates the
    /// row it identifies. Returns the stored row.
    pub async fn save<A>(self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + TryIntoModel<E::Model> + Send + 'c,
        E::Model: IntoActiveModel<A>,
    {
        model.save(self.conn).await?.try_into_model()
    }

    /// Sets a single column on every matching row and returns the number of
    /// rows affected.
    pub async fn update(self, column: E::Column, value: SimpleExpr) -> Result<u64, DbErr> {
        self.updates([(column, value)]).await
    }

    /// Sets several columns on every matching row and returns the number of
    /// rows affected. Zero rows affected is not an error.
    pub async fn updates<I>(self, values: I) -> Result<u64, DbErr>
    where
        I: IntoIterator<Item = (E::Column, SimpleExpr)>,
    {
        if self.filters.is_empty() {
            return Err(DbErr::Custom(MISSING_FILTER.to_owned()));
        }

        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return Err(DbErr::Custom(MISSING_VALUES.to_owned()));
        }

        let update = values.fold(E::update_many(), |update, (column, value)| {
            update.col_expr(column, value)
        });
        let update = self
            .filters
            .into_iter()
            .fold(update, |update, condition| update.filter(condition));

        let result = update.exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    /// Deletes every matching row and returns the number of rows affected.
    pub async fn delete(self) -> Result<u64, DbErr> {
        if self.filters.is_empty() {
            return Err(DbErr::Custom(MISSING_FILTER.to_owned()));
        }

        let delete = self
            .filters
            .into_iter()
            .fold(E::delete_many(), |delete, condition| delete.filter(condition));

        let result = delete.exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}

impl<E, C> Repository<'_, E, C>
where
    E: EntityTrait,
    C: ConnectionTrait + TransactionTrait,
{
    /// Runs `callback` inside a transaction on the bound handle, committing
    /// when it returns `Ok` and rolling back otherwise.
    pub async fn transaction<F, T, Err>(&self, callback: F) -> Result<T, TransactionError<Err>>
    where
        F: for<'t> FnOnce(
                &'t DatabaseTransaction,
            ) -> Pin<Box<dyn Future<Output = Result<T, Err>> + Send + 't>>
            + Send,
        T: Send,
        Err: std::fmt::Display + std::fmt::Debug + Send,
    {
        self.conn.transaction(callback).await
    }
}
