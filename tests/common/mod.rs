#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use feedline::application::ports::{ContentEvent, EventPublisher};
use feedline::infrastructure::database::{ConnectionPool, SqliteRepository};
use feedline::infrastructure::gateways::{HttpNotifier, UserServiceClient};
use feedline::presentation::build_router;
use feedline::shared::{AppConfig, AppError};
use feedline::{build_state, Collaborators};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// In-process stand-in for the user and notification services.
#[derive(Default)]
pub struct Upstream {
    /// token -> (user_id, is_admin)
    tokens: HashMap<String, (String, bool)>,
    following: HashMap<String, Vec<String>>,
    interests: HashMap<String, Vec<String>>,
    notifications: Mutex<Vec<Value>>,
}

impl Upstream {
    pub fn user(mut self, id: &str) -> Self {
        self.tokens.insert(token_for(id), (id.to_string(), false));
        self
    }

    pub fn admin(mut self, id: &str) -> Self {
        self.tokens.insert(token_for(id), (id.to_string(), true));
        self
    }

    pub fn follows(mut self, follower: &str, followees: &[&str]) -> Self {
        self.following.insert(
            follower.to_string(),
            followees.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    pub fn interests(mut self, user: &str, tags: &[&str]) -> Self {
        self.interests.insert(
            user.to_string(),
            tags.iter().map(|tag| tag.to_string()).collect(),
        );
        self
    }

    pub fn notifications(&self) -> Vec<Value> {
        self.notifications.lock().unwrap().clone()
    }
}

pub fn token_for(user_id: &str) -> String {
    format!("token-{user_id}")
}

#[derive(Deserialize)]
struct VerifyBody {
    token: String,
}

#[derive(Deserialize)]
struct PageParams {
    offset: usize,
    limit: usize,
}

async fn verify(State(upstream): State<Arc<Upstream>>, Json(body): Json<VerifyBody>) -> impl IntoResponse {
    match upstream.tokens.get(&body.token) {
        Some((user_id, is_admin)) => (
            StatusCode::OK,
            Json(json!({ "user_id": user_id, "is_admin": is_admin })),
        ),
        None => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid" }))),
    }
}

async fn following(
    State(upstream): State<Arc<Upstream>>,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Json<Value> {
    let all = upstream.following.get(&user_id).cloned().unwrap_or_default();
    let ids: Vec<String> = all.iter().skip(params.offset).take(params.limit).cloned().collect();
    let next = params.offset + ids.len();
    let next_offset = (next < all.len()).then_some(next);
    Json(json!({ "ids": ids, "next_offset": next_offset }))
}

async fn profile(Path(user_id): Path<String>) -> impl IntoResponse {
    if user_id == "ghost" {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "no such user" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": user_id,
            "username": user_id,
            "display_name": user_id.to_uppercase(),
            "photo_url": null,
        })),
    )
}

async fn interests(State(upstream): State<Arc<Upstream>>, Path(user_id): Path<String>) -> Json<Value> {
    let tags = upstream.interests.get(&user_id).cloned().unwrap_or_default();
    Json(json!({ "tags": tags }))
}

async fn notify(State(upstream): State<Arc<Upstream>>, Json(body): Json<Value>) -> StatusCode {
    upstream.notifications.lock().unwrap().push(body);
    StatusCode::ACCEPTED
}

async fn spawn_upstream(upstream: Arc<Upstream>) -> String {
    let router = Router::new()
        .route("/v1/auth/verify", post(verify))
        .route("/v1/users/:id/following", get(following))
        .route("/v1/users/:id", get(profile))
        .route("/v1/users/:id/interests", get(interests))
        .route("/v1/notifications", post(notify))
        .with_state(upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ContentEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ContentEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &ContentEvent) -> Result<(), AppError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub upstream: Arc<Upstream>,
    pub publisher: Arc<RecordingPublisher>,
    pub repository: Arc<SqliteRepository>,
}

impl TestApp {
    pub async fn spawn(upstream: Upstream) -> Self {
        let upstream = Arc::new(upstream);
        let base_url = spawn_upstream(upstream.clone()).await;
        let timeout = std::time::Duration::from_secs(5);

        let pool = ConnectionPool::from_memory().await.unwrap();
        let repository = Arc::new(SqliteRepository::new(pool));
        repository.initialize().await.unwrap();

        let publisher = Arc::new(RecordingPublisher::default());
        let config = AppConfig::default();
        let state = build_state(
            &config,
            Collaborators {
                repository: repository.clone(),
                users: Arc::new(UserServiceClient::new(&base_url, timeout).unwrap()),
                notifier: Arc::new(HttpNotifier::new(&base_url, timeout).unwrap()),
                publisher: publisher.clone(),
            },
        );

        Self {
            router: build_router(state, "feedline-test"),
            upstream,
            publisher,
            repository,
        }
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("authorization", format!("Bearer {}", token_for(user)));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        (status, value)
    }

    pub async fn create_post(&self, user: &str, body: Value) -> String {
        let (status, value) = self.request("POST", "/v1/posts", Some(user), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {value}");
        value["id"].as_str().unwrap().to_string()
    }

    pub async fn feed(&self, user: &str, query: &str) -> (StatusCode, Value) {
        let uri = format!("/v1/feed?from_time={}&{query}", cursor());
        self.request("GET", &uri, Some(user), None).await
    }
}

/// A cursor comfortably after every post created by a test.
pub fn cursor() -> String {
    (Utc::now() + Duration::minutes(5))
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

pub fn ids(page: &Value) -> Vec<String> {
    page["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}
