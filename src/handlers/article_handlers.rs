//! HTTP handlers for the article resource and the stored uploads.
//! Each handler is a thin shell around `ArticleService`.

use crate::{
    errors::AppError,
    models::article::{Article, ArticleResponse},
    services::article_service::ArticleService,
};
use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use serde::Serialize;
use tokio_util::io::ReaderStream;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

/// `POST /articles` — multipart with `title`, `content`, `author` and a file.
pub async fn create_article(
    State(service): State<ArticleService>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Article>), AppError> {
    let article = service.create_from_multipart(&mut multipart).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// `POST /upload` — store a file without creating an article.
pub async fn upload_image(
    State(service): State<ArticleService>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let image = service.upload_image(&mut multipart).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { image })))
}

/// `GET /articles`
pub async fn list_articles(
    State(service): State<ArticleService>,
) -> Result<Json<Vec<ArticleResponse>>, AppError> {
    Ok(Json(service.list().await?))
}

/// `GET /articles/{id}`
pub async fn get_article(
    State(service): State<ArticleService>,
    Path(id): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    Ok(Json(service.get(&id).await?))
}

/// `DELETE /articles/{id}` — removes the row and, if present, its image.
pub async fn delete_article(
    State(service): State<ArticleService>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    service.delete(&id).await?;
    Ok(Json(DeleteResponse {
        message: "article deleted successfully",
    }))
}

/// `GET /public/{filename}` — stream a stored upload.
pub async fn serve_public(
    State(service): State<ArticleService>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let (file, path) = service.open_public(&filename).await?;
    let len = file.metadata().await.map(|m| m.len()).ok();

    let mut response = Response::new(Body::from_stream(ReaderStream::new(file)));
    let headers = response.headers_mut();
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type.essence_str())
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    if let Some(len) = len {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }
    Ok(response)
}
