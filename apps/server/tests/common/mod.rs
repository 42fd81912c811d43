#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use scrollkeeper_core::utils::time_utils::DEFAULT_REFERENCE_TZ;
use scrollkeeper_github::GitHubConfig;
use scrollkeeper_server::{
    api::app_router,
    build_state,
    config::{Config, SessionBackend, TelegramSettings},
};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const API_KEY: &str = "adge-key";
pub const USER_NAME: &str = "Adge";
pub const EPOCH: &str = "2024-03-21";
pub const CHAT_ID: i64 = 1001;
pub const BOT_TOKEN: &str = "TEST";

pub struct TestApp {
    pub router: Router,
    pub github: MockServer,
    pub telegram: MockServer,
    pub data_dir: TempDir,
}

pub fn test_config(data_dir: &TempDir, github: &MockServer, telegram: &MockServer) -> Config {
    let users_file = data_dir.path().join("users.json");
    std::fs::write(
        &users_file,
        serde_json::json!({
            "users": [
                { "name": USER_NAME, "apiKey": API_KEY, "epochDate": EPOCH, "chatIds": [CHAT_ID] }
            ]
        })
        .to_string(),
    )
    .unwrap();

    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        data_dir: data_dir.path().join("scrolls"),
        session_backend: SessionBackend::File(data_dir.path().join("scrolls/.sessions.json")),
        users_file: Some(users_file),
        timezone: DEFAULT_REFERENCE_TZ,
        journal_unit: "scrollkeeper-test".into(),
        cors_allow: vec!["*".into()],
        request_timeout: Duration::from_secs(10),
        telegram: TelegramSettings {
            api_url: telegram.uri(),
            bot_token: BOT_TOKEN.into(),
            webhook_secret: None,
        },
        github: GitHubConfig {
            api_url: github.uri(),
            token: "gh-token".into(),
            owner: "adge".into(),
            repo: "scrolls".into(),
            branch: "main".into(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let github = MockServer::start().await;
    let telegram = MockServer::start().await;
    let data_dir = tempfile::tempdir().unwrap();

    let mut config = test_config(&data_dir, &github, &telegram);
    customize(&mut config);
    let state = build_state(&config).await.unwrap();
    let router = app_router(state, &config);

    TestApp {
        router,
        github,
        telegram,
        data_dir,
    }
}

impl TestApp {
    pub fn scroll_path(&self, relative: &str) -> std::path::PathBuf {
        self.data_dir.path().join("scrolls").join(relative)
    }

    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn call_json(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.call(request).await;
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    pub async fn github_requests(&self) -> Vec<wiremock::Request> {
        self.github.received_requests().await.unwrap_or_default()
    }

    pub async fn telegram_requests(&self) -> Vec<wiremock::Request> {
        self.telegram.received_requests().await.unwrap_or_default()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_key(uri: &str, key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-api-key", key)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn text_update(update_id: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "chat": { "id": CHAT_ID, "type": "private" },
            "from": { "id": CHAT_ID, "is_bot": false, "first_name": USER_NAME },
            "date": 1760400000,
            "text": text
        }
    })
}
