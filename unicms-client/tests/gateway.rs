//! Gateway behaviour against a local stub of the CMS backend.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use client::{
    ApiClient, ClientError, KeyValueStorage, MemoryStorage, ResponseDecision, ResponsePolicy,
    SessionStore,
};
use serde_json::{Value, json};
use shared::{
    config::ClientConfig,
    models::{SESSION_STORAGE_NAME, TOKEN_KEY, USER_ID_KEY, UserRole},
};
use tokio::net::TcpListener;
use url::Url;

#[derive(Clone, Default)]
struct Recorded {
    headers: Arc<Mutex<Vec<HeaderMap>>>,
    hits: Arc<AtomicU32>,
}

impl Recorded {
    fn last(&self) -> HeaderMap {
        self.headers.lock().unwrap().last().cloned().unwrap()
    }
}

async fn echo(State(recorded): State<Recorded>, headers: HeaderMap) -> Json<Value> {
    recorded.hits.fetch_add(1, Ordering::SeqCst);
    recorded.headers.lock().unwrap().push(headers);
    Json(json!({ "items": [1, 2, 3] }))
}

async fn expired(State(recorded): State<Recorded>) -> (StatusCode, Json<Value>) {
    recorded.hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Token expired" })),
    )
}

async fn missing() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "University not found" })),
    )
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn forbidden() -> (StatusCode, Json<Value>) {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "message": "Account suspended" })),
    )
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    Json(json!({ "items": [] }))
}

async fn login(Json(body): Json<Value>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if body["password"] == "password" {
        Ok(Json(json!({
            "token": "jwt-from-login",
            "refreshToken": "refresh",
            "userId": 42,
            "email": body["email"],
            "name": "Admin",
            "role": "ADMIN",
        })))
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        ))
    }
}

async fn spawn_backend() -> (Url, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/universities", get(echo).post(echo))
        .route("/api/expired", get(expired))
        .route("/api/missing", get(missing))
        .route("/api/broken", get(broken))
        .route("/api/forbidden", get(forbidden))
        .route("/api/slow", get(slow))
        .route("/api/auth/login", post(login))
        .with_state(recorded.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (Url::parse(&format!("http://{addr}")).unwrap(), recorded)
}

fn gateway(base: &Url) -> (ApiClient, Arc<SessionStore>, MemoryStorage) {
    gateway_with_timeout(base, 2_000)
}

fn gateway_with_timeout(
    base: &Url,
    timeout_ms: u64,
) -> (ApiClient, Arc<SessionStore>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let session = Arc::new(SessionStore::open(Arc::new(storage.clone())));
    let config = ClientConfig {
        api_base_url: base.clone(),
        timeout_ms,
        ..ClientConfig::default()
    };
    let api = ApiClient::new(&config, session.clone()).unwrap();
    (api, session, storage)
}

#[tokio::test]
async fn attaches_identity_headers_from_storage() {
    let (base, recorded) = spawn_backend().await;
    let (api, session, _) = gateway(&base);
    session
        .set_auth("t1", 42, "staff@example.com", "Staff", UserRole::Staff)
        .unwrap();

    let body: Value = api.get_json("/api/universities").await.unwrap();

    assert_eq!(body["items"], json!([1, 2, 3]));
    let headers = recorded.last();
    assert_eq!(headers["authorization"], "Bearer t1");
    assert_eq!(headers["x-user-id"], "42");
}

#[tokio::test]
async fn omits_identity_headers_when_signed_out() {
    let (base, recorded) = spawn_backend().await;
    let (api, _, _) = gateway(&base);

    let _: Value = api.get_json("api/universities").await.unwrap();

    let headers = recorded.last();
    assert!(!headers.contains_key("authorization"));
    assert!(!headers.contains_key("x-user-id"));
}

#[tokio::test]
async fn sends_json_content_type() {
    let (base, recorded) = spawn_backend().await;
    let (api, _, _) = gateway(&base);

    let _: Value = api
        .post_json("/api/universities", &json!({ "name": "Tokyo" }))
        .await
        .unwrap();

    assert_eq!(recorded.last()["content-type"], "application/json");
}

#[tokio::test]
async fn reads_durable_keys_on_every_request() {
    let (base, recorded) = spawn_backend().await;
    let (api, _, storage) = gateway(&base);
    storage.set_item(TOKEN_KEY, "written-elsewhere").unwrap();
    storage.set_item(USER_ID_KEY, "7").unwrap();

    let _: Value = api.get_json("/api/universities").await.unwrap();

    let headers = recorded.last();
    assert_eq!(headers["authorization"], "Bearer written-elsewhere");
    assert_eq!(headers["x-user-id"], "7");
}

#[tokio::test]
async fn unauthorized_clears_session_and_storage() {
    let (base, _) = spawn_backend().await;
    let (api, session, storage) = gateway(&base);
    session
        .set_auth("stale", 42, "a@example.com", "A", UserRole::Admin)
        .unwrap();

    let err = api.get_json::<Value>("/api/expired").await.unwrap_err();

    match err {
        ClientError::Unauthorized { status, error } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(error.unwrap().message, "Token expired");
        }
        other => panic!("expected unauthorized, got {other:?}"),
    }
    assert!(!session.is_authenticated());
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get_item(USER_ID_KEY).unwrap(), None);

    let reopened = SessionStore::open(Arc::new(storage.clone()));
    assert!(!reopened.is_authenticated());
    assert!(storage.get_item(SESSION_STORAGE_NAME).unwrap().is_some());
}

#[tokio::test]
async fn other_failures_leave_session_alone() {
    let (base, _) = spawn_backend().await;
    let (api, session, _) = gateway(&base);
    session
        .set_auth("t1", 1, "a@example.com", "A", UserRole::Editor)
        .unwrap();

    let not_found = api.get_json::<Value>("/api/missing").await.unwrap_err();
    assert_eq!(not_found.status(), Some(StatusCode::NOT_FOUND));
    assert!(not_found.to_string().contains("University not found"));

    let server_error = api.get_json::<Value>("/api/broken").await.unwrap_err();
    match server_error {
        ClientError::Status { status, error, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(error.is_none());
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }

    assert_eq!(session.token().as_deref(), Some("t1"));
}

#[derive(Debug)]
struct RetryOnceThenClear;

impl ResponsePolicy for RetryOnceThenClear {
    fn decide(&self, status: StatusCode, attempt: u32) -> ResponseDecision {
        if status != StatusCode::UNAUTHORIZED {
            ResponseDecision::PassThrough
        } else if attempt == 1 {
            ResponseDecision::Retry
        } else {
            ResponseDecision::ClearSession
        }
    }
}

#[tokio::test]
async fn custom_policy_can_retry() {
    let (base, recorded) = spawn_backend().await;
    let (api, session, _) = gateway(&base);
    let api = api.with_policy(RetryOnceThenClear);
    session
        .set_auth("t1", 1, "a@example.com", "A", UserRole::User)
        .unwrap();

    let err = api.get_json::<Value>("/api/expired").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(recorded.hits.load(Ordering::SeqCst), 2);
    assert!(!session.is_authenticated());
}

#[derive(Debug)]
struct ClearOnForbidden;

impl ResponsePolicy for ClearOnForbidden {
    fn decide(&self, status: StatusCode, _attempt: u32) -> ResponseDecision {
        if status == StatusCode::FORBIDDEN {
            ResponseDecision::ClearSession
        } else {
            ResponseDecision::PassThrough
        }
    }
}

#[tokio::test]
async fn cleared_session_error_keeps_the_real_status() {
    let (base, _) = spawn_backend().await;
    let (api, session, _) = gateway(&base);
    let api = api.with_policy(ClearOnForbidden);
    session
        .set_auth("t1", 1, "a@example.com", "A", UserRole::Student)
        .unwrap();

    let err = api.get_json::<Value>("/api/forbidden").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert!(err.to_string().contains("Account suspended"));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn login_populates_session() {
    let (base, recorded) = spawn_backend().await;
    let (api, session, storage) = gateway(&base);

    let auth = api.login("admin@example.com", "password").await.unwrap();

    assert_eq!(auth.role, UserRole::Admin);
    assert_eq!(session.token().as_deref(), Some("jwt-from-login"));
    assert_eq!(session.user_id(), Some(42));
    assert_eq!(storage.get_item(USER_ID_KEY).unwrap().as_deref(), Some("42"));

    let _: Value = api.get_json("/api/universities").await.unwrap();
    assert_eq!(recorded.last()["authorization"], "Bearer jwt-from-login");

    api.logout().unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn rejected_login_leaves_session_empty() {
    let (base, _) = spawn_backend().await;
    let (api, session, _) = gateway(&base);

    let err = api.login("admin@example.com", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let (api, session, _) = gateway(&base);
    session
        .set_auth("t1", 1, "a@example.com", "A", UserRole::Parent)
        .unwrap();

    let err = api.get_json::<Value>("/api/universities").await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn slow_backend_times_out_as_transport_error() {
    let (base, _) = spawn_backend().await;
    let (api, session, storage) = gateway_with_timeout(&base, 200);
    session
        .set_auth("t1", 1, "a@example.com", "A", UserRole::Faculty)
        .unwrap();

    let err = api.get_json::<Value>("/api/slow").await.unwrap_err();

    match &err {
        ClientError::Transport(source) => assert!(source.is_timeout()),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(err.status(), None);
    assert!(session.is_authenticated());
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let (base, _) = spawn_backend().await;
    let (api, _, _) = gateway(&base.join("/api/").unwrap());

    let body: Value = api.get_json("/universities").await.unwrap();

    assert_eq!(body["items"], json!([1, 2, 3]));
}
