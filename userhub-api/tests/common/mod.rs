//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Router wired to an in-memory repository and a throwaway upload root
//! - Multipart body builder
//! - Request helpers returning status and parsed JSON

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::Service as _;
use userhub_api::app::{build_router, AppState};
use userhub_api::config::Config;
use userhub_shared::repository::InMemoryUserRepository;
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub repo: Arc<InMemoryUserRepository>,
    pub app: Router,

    /// Upload root, removed when the context is dropped
    pub upload_root: TempDir,
}

impl TestContext {
    /// Creates a new test context with an empty repository and upload root
    pub fn new() -> Self {
        let upload_root = tempfile::tempdir().expect("temporary upload root");
        let root = upload_root.path().to_string_lossy().to_string();

        let config = Config::from_lookup(|name| {
            let value = match name {
                "DB_HOST" => Some("localhost"),
                "DB_USER" => Some("test"),
                "DB_NAME" => Some("userhub_test"),
                "UPLOAD_ROOT" => Some(root.as_str()),
                _ => None,
            };
            value.map(str::to_string)
        })
        .expect("test configuration");

        let repo = Arc::new(InMemoryUserRepository::new());
        let state = AppState::new(repo.clone(), config);
        let app = build_router(state);

        TestContext {
            repo,
            app,
            upload_root,
        }
    }

    /// Sends a request and returns status and raw body
    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    /// Sends a request and returns status and JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send_raw(request).await;
        let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!(
                "Expected JSON body, got {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )
        });
        (status, json)
    }

    /// `GET /users`
    pub async fn list_users(&self) -> Value {
        let (status, body) = self.send(get("/users")).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    /// `POST /users` with text fields only, returning the new id
    pub async fn create_user(&self, username: &str) -> i64 {
        let form = MultipartForm::new()
            .text("username", username)
            .text("email", &format!("{}@example.com", username))
            .text("comment", "hello");
        let (status, body) = self.send(form.into_request("/users")).await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Absolute path of a stored file
    pub fn stored(&self, relative: &str) -> PathBuf {
        self.upload_root.path().join(relative)
    }

    /// Number of entries in a directory under the upload root (0 if absent)
    pub fn entries(&self, dir: &str) -> usize {
        std::fs::read_dir(self.upload_root.path().join(dir))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Puts a regular file where the `dir` directory would be created, so
    /// every write below it fails
    pub fn block_dir(&self, dir: &str) {
        std::fs::write(self.stored(dir), b"not a directory").unwrap();
    }
}

/// Builds a bodyless request
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a `GET` request
pub fn get(uri: &str) -> Request<Body> {
    request("GET", uri)
}

/// Hand-rolled `multipart/form-data` body
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        MultipartForm {
            boundary: format!("userhub-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    /// Adds a text field
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    /// Adds a file field
    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Finishes the body and wraps it in a `POST` request
    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
