//! Shutdown drain behaviour across the HTTP layer: the in-flight request
//! finishes, a late request is refused, and the drain loop returns only once
//! the counter is back to zero.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use async_trait::async_trait;

use backend::domain::ports::{UserPersistenceError, UserRepository};
use backend::domain::{IdRange, User, UserQuery};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::server::{DrainCoordinator, build_app};
use backend::test_support::InMemoryUserRepository;

/// Delegating repository that stalls each operation long enough for the test
/// to observe an in-flight request.
struct SlowRepository {
    inner: InMemoryUserRepository,
    delay: Duration,
}

#[async_trait]
impl UserRepository for SlowRepository {
    async fn create(&self, user: &User) -> Result<User, UserPersistenceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(user).await
    }

    async fn update(
        &self,
        user: &User,
        range: Option<IdRange>,
    ) -> Result<(), UserPersistenceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(user, range).await
    }

    async fn delete(
        &self,
        user: &User,
        range: Option<IdRange>,
    ) -> Result<(), UserPersistenceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(user, range).await
    }

    async fn find(&self, query: &UserQuery) -> Result<Vec<User>, UserPersistenceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.find(query).await
    }
}

#[actix_web::test]
async fn drain_waits_for_in_flight_requests_and_refuses_late_ones() {
    let drain = Arc::new(DrainCoordinator::new());
    let users: Arc<dyn UserRepository> = Arc::new(SlowRepository {
        inner: InMemoryUserRepository::with_users(vec![User {
            id: 1,
            name: "ada".into(),
            gender: String::new(),
            birthday: String::new(),
        }]),
        delay: Duration::from_millis(100),
    });
    let state = HttpState::new(users, Arc::clone(&drain));
    let app = actix_test::init_service(build_app(
        web::Data::new(state),
        web::Data::new(HealthState::new()),
    ))
    .await;

    let slow_request = async {
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/user").to_request(),
        )
        .await;
        // Admitted before the stop, so it must complete normally.
        assert_eq!(response.status(), StatusCode::OK);
    };

    let shutdown = async {
        // Let the slow request get admitted first.
        tokio::time::sleep(Duration::from_millis(20)).await;
        drain.stop_accepting();
        assert_eq!(drain.in_flight(), 1);

        let refused = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/user").to_request(),
        )
        .await;
        assert_eq!(refused.status(), StatusCode::NOT_ACCEPTABLE);

        drain.drain(Duration::from_millis(1)).await;
        assert_eq!(drain.in_flight(), 0);
    };

    tokio::join!(slow_request, shutdown);
    assert!(!drain.is_accepting());
}
