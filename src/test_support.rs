//! Shared fixtures for unit tests: multipart bodies, an in-memory database
//! and a fully wired service rooted in a temporary directory.

use crate::services::{article_repository::ArticleRepository, article_service::ArticleService};
use axum::{
    body::Body,
    http::{Request, header},
};
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::TempDir;

const BOUNDARY: &str = "----article-service-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

pub fn multipart_request(uri: &str, body: MultipartBody) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body.finish()))
        .unwrap()
}

/// A single-connection in-memory database with the schema applied.
pub async fn memory_repository() -> ArticleRepository {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let repo = ArticleRepository::new(pool);
    repo.migrate().await.unwrap();
    repo
}

pub const TEST_BASE_URL: &str = "http://media.test:3000";

/// Service over an in-memory database and a fresh uploads directory.
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn test_service() -> (ArticleService, TempDir) {
    let dir = TempDir::new().unwrap();
    let service = ArticleService::new(
        memory_repository().await,
        dir.path().join("public"),
        TEST_BASE_URL,
    );
    (service, dir)
}
