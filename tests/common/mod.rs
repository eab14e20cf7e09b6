//! Common test utilities and fixtures
#![allow(dead_code)]
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::sync::Notify;
use tower::util::ServiceExt;
use user_service::{
    model::{NewUser, User},
    repository::{InMemoryUserRepository, UserRepository},
    server, RepositoryError,
};

/// Router backed by a fresh in-memory repository.
pub fn create_test_app() -> Router {
    create_app_with(Arc::new(InMemoryUserRepository::new()))
}

pub fn create_app_with(repo: Arc<dyn UserRepository>) -> Router {
    server::build_router(server::user_service(repo), Duration::from_secs(5))
}

/// Repository whose every call fails like a lost connection.
pub struct FailingUserRepository;

#[async_trait]
impl UserRepository for FailingUserRepository {
    async fn create(&self, _user: NewUser) -> Result<User, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<User>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// In-memory repository whose `find_all` signals `started` and then sleeps
/// for `delay` before answering.
pub struct SlowUserRepository {
    inner: InMemoryUserRepository,
    delay: Duration,
    pub started: Arc<Notify>,
}

impl SlowUserRepository {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryUserRepository::new(),
            delay,
            started: Arc::new(Notify::new()),
        }
    }
}

#[async_trait]
impl UserRepository for SlowUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.inner.create(user).await
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        self.started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        self.inner.find_by_id(id).await
    }
}

/// Send one request and decode the JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn create_user(app: &Router, name: &str, email: &str) -> Value {
    let body = serde_json::json!({ "name": name, "email": email }).to_string();
    let (status, body) = send(app, post_json("/api/v1/users", &body)).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body["data"].clone()
}

pub fn error_code(body: &Value) -> &str {
    body["errors"][0]["code"].as_str().unwrap_or_default()
}
