//! End-to-end tests for the user CRUD endpoints over an in-memory
//! repository, exercising the full app assembly: routing, middleware,
//! admission, parsing, hooks, and the response envelopes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web};
use serde_json::Value;

use backend::domain::User;
use backend::domain::ports::{UserPersistenceError, UserRepository};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::hooks::{HookPair, OperationHooks};
use backend::inbound::http::state::HttpState;
use backend::server::{DrainCoordinator, build_app};
use backend::test_support::InMemoryUserRepository;

struct Fixture {
    repo: Arc<InMemoryUserRepository>,
    drain: Arc<DrainCoordinator>,
    hooks: Arc<OperationHooks>,
}

impl Fixture {
    fn new(repo: InMemoryUserRepository) -> Self {
        Self {
            repo: Arc::new(repo),
            drain: Arc::new(DrainCoordinator::new()),
            hooks: Arc::new(OperationHooks::default()),
        }
    }

    fn with_hooks(mut self, hooks: OperationHooks) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// Run one request through a freshly assembled app. Repository, drain,
    /// and hook state live in the fixture, so they persist across calls.
    async fn request(&self, req: actix_test::TestRequest) -> (StatusCode, Value) {
        let users: Arc<dyn UserRepository> = self.repo.clone();
        let state =
            HttpState::new(users, Arc::clone(&self.drain)).with_hooks(Arc::clone(&self.hooks));
        let app = actix_test::init_service(build_app(
            web::Data::new(state),
            web::Data::new(HealthState::new()),
        ))
        .await;

        let response = actix_test::call_service(&app, req.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }
}

fn seeded(ids: &[i32]) -> InMemoryUserRepository {
    InMemoryUserRepository::with_users(
        ids.iter()
            .map(|&id| User {
                id,
                name: format!("user-{id}"),
                gender: "x".into(),
                birthday: "2000-01-01".into(),
            })
            .collect(),
    )
}

fn object_ids(body: &Value) -> Vec<i64> {
    body["object"]
        .as_array()
        .expect("object array")
        .iter()
        .map(|user| user["id"].as_i64().expect("id"))
        .collect()
}

#[actix_web::test]
async fn post_creates_with_a_storage_assigned_id() {
    let fixture = Fixture::new(InMemoryUserRepository::new());

    let (status, body) = fixture
        .request(actix_test::TestRequest::post().uri("/user?name=alice&gender=f&birthday=1990-05-01"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"]["id"], 1);
    assert_eq!(body["object"]["name"], "alice");
    assert_eq!(fixture.repo.snapshot().len(), 1);
}

#[actix_web::test]
async fn post_honours_an_explicit_path_id() {
    let fixture = Fixture::new(InMemoryUserRepository::new());

    let (status, body) = fixture
        .request(actix_test::TestRequest::post().uri("/user/7?name=bob"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"]["id"], 7);
    assert_eq!(fixture.repo.snapshot()[0].id, 7);
}

#[actix_web::test]
async fn query_range_supersedes_a_specific_id_and_orders_ascending() {
    let fixture = Fixture::new(seeded(&[5, 2, 8, 3]));

    let (status, body) = fixture
        .request(actix_test::TestRequest::get().uri("/user?low=2&high=5&order=1&id=8"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(object_ids(&body), vec![2, 3, 5]);
}

#[actix_web::test]
async fn query_applies_offset_then_limit() {
    let fixture = Fixture::new(seeded(&[4, 1, 3, 2]));

    let (status, body) = fixture
        .request(actix_test::TestRequest::get().uri("/user?order=1&offset=1&limit=2"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(object_ids(&body), vec![2, 3]);
}

#[actix_web::test]
async fn malformed_integer_parameters_are_rejected_without_side_effects() {
    let fixture = Fixture::new(seeded(&[1]));

    let (status, body) = fixture
        .request(actix_test::TestRequest::put().uri("/user/abc?name=mallory"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(fixture.repo.snapshot()[0].name, "user-1");
}

#[actix_web::test]
async fn update_by_range_echoes_a_cleared_id_and_patches_in_range_rows() {
    let fixture = Fixture::new(seeded(&[1, 2, 5]));

    let (status, body) = fixture
        .request(actix_test::TestRequest::put().uri("/user?low=1&high=2&gender=f&id=9"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"]["id"], 0);
    let rows = fixture.repo.snapshot();
    assert_eq!(rows[0].gender, "f");
    assert_eq!(rows[1].gender, "f");
    assert_eq!(rows[2].gender, "x");
}

#[actix_web::test]
async fn delete_by_attribute_removes_matching_rows() {
    let fixture = Fixture::new(seeded(&[1, 2]));

    let (status, _body) = fixture
        .request(actix_test::TestRequest::delete().uri("/user?name=user-1"))
        .await;

    assert_eq!(status, StatusCode::OK);
    let rows = fixture.repo.snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 2);
}

#[actix_web::test]
async fn unscoped_delete_is_refused_by_the_repository() {
    let fixture = Fixture::new(seeded(&[1, 2]));

    let (status, body) = fixture
        .request(actix_test::TestRequest::delete().uri("/user"))
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["error"].is_string());
    assert_eq!(fixture.repo.snapshot().len(), 2);
}

#[actix_web::test]
async fn draining_service_refuses_new_work_with_a_status_envelope() {
    let fixture = Fixture::new(seeded(&[1]));
    fixture.drain.stop_accepting();

    let (status, body) = fixture
        .request(actix_test::TestRequest::get().uri("/user"))
        .await;

    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert!(body["status"].is_string());
    assert_eq!(fixture.drain.in_flight(), 0);
}

#[actix_web::test]
async fn repository_failures_map_to_method_not_allowed() {
    let fixture = Fixture::new(InMemoryUserRepository::new());
    fixture
        .repo
        .set_failure(UserPersistenceError::connection("pool exhausted"));

    let (status, body) = fixture
        .request(actix_test::TestRequest::post().uri("/user?name=carol"))
        .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "database operation failed");
}

#[actix_web::test]
async fn filtered_requests_return_an_empty_envelope() {
    let hooks = OperationHooks {
        add: HookPair {
            before: Some(Arc::new(|user: &User| user.name != "blocked")),
            after: None,
        },
        ..OperationHooks::default()
    };
    let fixture = Fixture::new(InMemoryUserRepository::new()).with_hooks(hooks);

    let (status, body) = fixture
        .request(actix_test::TestRequest::post().uri("/user?name=blocked"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["object"].is_null());
    assert!(fixture.repo.snapshot().is_empty());
}

#[actix_web::test]
async fn post_hooks_observe_the_operation_outcome() {
    let succeeded = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&succeeded);
    let hooks = OperationHooks {
        add: HookPair {
            before: None,
            after: Some(Arc::new(move |_user, ok| {
                flag.store(ok, Ordering::SeqCst);
            })),
        },
        ..OperationHooks::default()
    };
    let fixture = Fixture::new(InMemoryUserRepository::new()).with_hooks(hooks);

    let (status, _body) = fixture
        .request(actix_test::TestRequest::post().uri("/user?name=dave"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(succeeded.load(Ordering::SeqCst));
}

#[actix_web::test]
async fn probes_report_ready_and_live() {
    let fixture = Fixture::new(InMemoryUserRepository::new());

    let (live, _body) = fixture
        .request(actix_test::TestRequest::get().uri("/health/live"))
        .await;
    assert_eq!(live, StatusCode::OK);

    // Each test app gets a fresh HealthState that has not been marked ready.
    let (ready, _body) = fixture
        .request(actix_test::TestRequest::get().uri("/health/ready"))
        .await;
    assert_eq!(ready, StatusCode::SERVICE_UNAVAILABLE);
}
