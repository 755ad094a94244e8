//! In-memory repository double for handler and integration tests.
//!
//! Mirrors the persistence adapter's semantics without a database: zero-value
//! fields are unconstrained in filters, updates set only non-empty fields,
//! and an entirely unscoped update or delete is refused.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{IdRange, User, UserQuery};

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: Vec<User>,
    failure: Option<UserPersistenceError>,
}

/// Thread-safe in-memory [`UserRepository`].
#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: Mutex<Inner>,
}

fn matches_attributes(filter: &User, row: &User) -> bool {
    (filter.name.is_empty() || filter.name == row.name)
        && (filter.gender.is_empty() || filter.gender == row.gender)
        && (filter.birthday.is_empty() || filter.birthday == row.birthday)
}

fn in_scope(user: &User, range: Option<IdRange>, row: &User) -> Result<bool, UserPersistenceError> {
    if let Some(range) = range {
        return Ok(row.id >= range.low && row.id <= range.high);
    }
    if !user.has_unset_id() {
        return Ok(row.id == user.id);
    }
    let filter = User {
        id: User::UNSET_ID,
        ..user.clone()
    };
    if filter.name.is_empty() && filter.gender.is_empty() && filter.birthday.is_empty() {
        return Err(UserPersistenceError::query(
            "refusing an unscoped update or delete",
        ));
    }
    Ok(matches_attributes(&filter, row))
}

impl InMemoryUserRepository {
    /// Empty repository; storage-assigned ids start at 1.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Repository pre-seeded with the given rows.
    pub fn with_users(rows: Vec<User>) -> Self {
        let next_id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner {
                next_id,
                rows,
                failure: None,
            }),
        }
    }

    /// Make every subsequent operation fail with the given error.
    pub fn set_failure(&self, failure: UserPersistenceError) {
        self.lock().failure = Some(failure);
    }

    /// Current rows in insertion order.
    pub fn snapshot(&self) -> Vec<User> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_failure(inner: &Inner) -> Result<(), UserPersistenceError> {
        match &inner.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut inner = self.lock();
        Self::check_failure(&inner)?;

        let mut stored = user.clone();
        if stored.has_unset_id() {
            stored.id = inner.next_id;
        }
        inner.next_id = inner.next_id.max(stored.id + 1);
        inner.rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        user: &User,
        range: Option<IdRange>,
    ) -> Result<(), UserPersistenceError> {
        let mut inner = self.lock();
        Self::check_failure(&inner)?;

        if user.name.is_empty() && user.gender.is_empty() && user.birthday.is_empty() {
            return Ok(());
        }
        let scoped: Vec<bool> = inner
            .rows
            .iter()
            .map(|row| in_scope(user, range, row))
            .collect::<Result<_, _>>()?;
        for (row, hit) in inner.rows.iter_mut().zip(scoped) {
            if !hit {
                continue;
            }
            if !user.name.is_empty() {
                row.name = user.name.clone();
            }
            if !user.gender.is_empty() {
                row.gender = user.gender.clone();
            }
            if !user.birthday.is_empty() {
                row.birthday = user.birthday.clone();
            }
        }
        Ok(())
    }

    async fn delete(
        &self,
        user: &User,
        range: Option<IdRange>,
    ) -> Result<(), UserPersistenceError> {
        let mut inner = self.lock();
        Self::check_failure(&inner)?;

        let scoped: Vec<bool> = inner
            .rows
            .iter()
            .map(|row| in_scope(user, range, row))
            .collect::<Result<_, _>>()?;
        let mut hits = scoped.into_iter();
        inner.rows.retain(|_| !hits.next().unwrap_or(false));
        Ok(())
    }

    async fn find(&self, query: &UserQuery) -> Result<Vec<User>, UserPersistenceError> {
        let inner = self.lock();
        Self::check_failure(&inner)?;

        let mut matched: Vec<User> = inner
            .rows
            .iter()
            .filter(|row| {
                if let Some(range) = query.range.active() {
                    if row.id < range.low || row.id > range.high {
                        return false;
                    }
                } else if !query.user.has_unset_id() && row.id != query.user.id {
                    return false;
                }
                matches_attributes(&query.user, row)
            })
            .cloned()
            .collect();

        if query.wants_ordering() {
            matched.sort_by_key(|row| row.id);
        }
        if query.offset != UserQuery::UNSET {
            let skip = usize::try_from(query.offset).unwrap_or(0);
            matched = matched.into_iter().skip(skip).collect();
        }
        if query.limit != UserQuery::UNSET {
            let take = usize::try_from(query.limit).unwrap_or(0);
            matched.truncate(take);
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user(id: i32, name: &str) -> User {
        User {
            id,
            name: name.into(),
            gender: String::new(),
            birthday: String::new(),
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_after_the_highest_seeded_one() {
        let repo = InMemoryUserRepository::with_users(vec![user(4, "ada")]);
        let stored = repo.create(&User::default()).await.expect("create");
        assert_eq!(stored.id, 5);
    }

    #[tokio::test]
    async fn create_honours_an_explicit_id() {
        let repo = InMemoryUserRepository::new();
        let stored = repo.create(&user(9, "grace")).await.expect("create");
        assert_eq!(stored.id, 9);
        assert_eq!(repo.snapshot(), vec![user(9, "grace")]);
    }

    #[tokio::test]
    async fn update_without_any_scope_is_refused() {
        let repo = InMemoryUserRepository::with_users(vec![user(1, "ada")]);
        let err = repo
            .update(&User::default(), None)
            .await
            .expect_err("must refuse");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
        assert_eq!(repo.snapshot(), vec![user(1, "ada")]);
    }

    #[tokio::test]
    async fn update_by_range_sets_only_supplied_fields() {
        let repo =
            InMemoryUserRepository::with_users(vec![user(1, "ada"), user(2, "bob"), user(5, "eve")]);
        let patch = User {
            gender: "f".into(),
            ..User::default()
        };
        repo.update(&patch, Some(IdRange::new(1, 2)))
            .await
            .expect("update");
        let rows = repo.snapshot();
        assert_eq!(rows[0].gender, "f");
        assert_eq!(rows[0].name, "ada");
        assert_eq!(rows[1].gender, "f");
        assert_eq!(rows[2].gender, "");
    }

    #[tokio::test]
    async fn delete_by_attribute_removes_matches_only() {
        let repo = InMemoryUserRepository::with_users(vec![user(1, "ada"), user(2, "ada")]);
        repo.delete(&user(0, "ada"), None).await.expect("delete");
        assert!(repo.snapshot().is_empty());
    }

    #[rstest]
    #[case(-1, -1, vec![3, 1, 2])]
    #[case(1, -1, vec![1, 2])]
    #[case(-1, 2, vec![3, 1])]
    fn find_applies_offset_and_limit(
        #[case] offset: i32,
        #[case] limit: i32,
        #[case] expected: Vec<i32>,
    ) {
        let repo =
            InMemoryUserRepository::with_users(vec![user(3, "c"), user(1, "a"), user(2, "b")]);
        let query = UserQuery::new(User::default(), IdRange::default(), offset, limit, 0);
        let rows = futures::executor::block_on(repo.find(&query)).expect("find");
        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn find_orders_ascending_when_requested() {
        let repo =
            InMemoryUserRepository::with_users(vec![user(3, "c"), user(1, "a"), user(2, "b")]);
        let query = UserQuery::new(User::default(), IdRange::default(), -1, -1, 1);
        let rows = repo.find(&query).await.expect("find");
        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn injected_failures_surface_unchanged() {
        let repo = InMemoryUserRepository::new();
        repo.set_failure(UserPersistenceError::connection("pool exhausted"));
        let err = repo.create(&User::default()).await.expect_err("must fail");
        assert_eq!(err, UserPersistenceError::connection("pool exhausted"));
    }
}
