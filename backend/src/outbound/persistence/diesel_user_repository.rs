//! PostgreSQL-backed [`UserRepository`] implementation using Diesel.
//!
//! Translates the normalised query specification into SQL: inclusive id
//! ranges, zero-value equality filters, offset/limit paging, and
//! ascending-by-id ordering. Driver detail stays in the logs; callers only
//! see the port's error variants.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{IdRange, User, UserQuery};

use super::models::{NewUserRow, NewUserRowWithId, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Open { message } => message,
    };
    UserPersistenceError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

type BoxedCondition = Box<dyn BoxableExpression<users::table, Pg, SqlType = Bool>>;

fn and_condition(current: Option<BoxedCondition>, next: BoxedCondition) -> Option<BoxedCondition> {
    Some(match current {
        Some(condition) => Box::new(condition.and(next)),
        None => next,
    })
}

/// Equality conditions for the non-empty attributes of `user`.
fn attribute_condition(user: &User) -> Option<BoxedCondition> {
    let mut condition: Option<BoxedCondition> = None;
    if !user.name.is_empty() {
        condition = and_condition(condition, Box::new(users::name.eq(user.name.clone())));
    }
    if !user.gender.is_empty() {
        condition = and_condition(condition, Box::new(users::gender.eq(user.gender.clone())));
    }
    if !user.birthday.is_empty() {
        condition = and_condition(condition, Box::new(users::birthday.eq(user.birthday.clone())));
    }
    condition
}

/// Resolve the row scope for update and delete.
///
/// An active range wins outright; a nonzero id comes next; non-empty
/// attribute equality last. A request with no scope at all is refused so a
/// bare `PUT /user` or `DELETE /user` can never touch the whole table.
fn scope_condition(
    user: &User,
    range: Option<IdRange>,
) -> Result<BoxedCondition, UserPersistenceError> {
    if let Some(range) = range {
        return Ok(Box::new(
            users::id.ge(range.low).and(users::id.le(range.high)),
        ));
    }
    if !user.has_unset_id() {
        return Ok(Box::new(users::id.eq(user.id)));
    }
    attribute_condition(user)
        .ok_or_else(|| UserPersistenceError::query("refusing an unscoped update or delete"))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = if user.has_unset_id() {
            diesel::insert_into(users::table)
                .values(NewUserRow::from_user(user))
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
        } else {
            diesel::insert_into(users::table)
                .values(NewUserRowWithId::from_user(user))
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
        }
        .map_err(map_diesel_error)?;

        Ok(User::from(row))
    }

    async fn update(
        &self,
        user: &User,
        range: Option<IdRange>,
    ) -> Result<(), UserPersistenceError> {
        let changeset = UserChangeset::from_user(user);
        if changeset.is_empty() {
            // Nothing to write; match the zero-value convention and succeed.
            return Ok(());
        }
        let condition = scope_condition(user, range)?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.filter(condition))
            .set(changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn delete(
        &self,
        user: &User,
        range: Option<IdRange>,
    ) -> Result<(), UserPersistenceError> {
        let condition = scope_condition(user, range)?;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(users::table.filter(condition))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, query: &UserQuery) -> Result<Vec<User>, UserPersistenceError> {
        let mut stmt = users::table
            .select(UserRow::as_select())
            .into_boxed::<Pg>();

        if let Some(range) = query.range.active() {
            stmt = stmt.filter(users::id.ge(range.low).and(users::id.le(range.high)));
        } else if !query.user.has_unset_id() {
            stmt = stmt.filter(users::id.eq(query.user.id));
        }
        if let Some(condition) = attribute_condition(&query.user) {
            stmt = stmt.filter(condition);
        }
        if query.offset != UserQuery::UNSET {
            stmt = stmt.offset(i64::from(query.offset));
        }
        if query.limit != UserQuery::UNSET {
            stmt = stmt.limit(i64::from(query.limit));
        }
        if query.wants_ordering() {
            stmt = stmt.order(users::id.asc());
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = stmt.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
