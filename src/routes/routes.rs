//! Defines routes for the article resource and its uploaded images.
//!
//! ## Structure
//! - `POST   /articles`            — multipart create (fields + one file)
//! - `GET    /articles`            — list, image rewritten to a URL
//! - `GET    /articles/{id}`       — fetch one
//! - `DELETE /articles/{id}`       — delete row and image
//! - `POST   /upload`              — store a file, return its URL
//! - `GET    /public/{filename}`   — download a stored file
//! - `GET    /healthz`, `/readyz`  — probes

use crate::{
    handlers::{
        article_handlers::{
            create_article, delete_article, get_article, list_articles, serve_public,
            upload_image,
        },
        health_handlers::{healthz, readyz},
    },
    services::article_service::ArticleService,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

/// Build the router. State is supplied by the caller via `with_state`.
pub fn routes() -> Router<ArticleService> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/articles", post(create_article).get(list_articles))
        .route("/articles/{id}", get(get_article).delete(delete_article))
        .route("/upload", post(upload_image))
        .route("/public/{filename}", get(serve_public))
        .layer(CorsLayer::permissive())
}
