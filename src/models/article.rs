//! Represents an article and the shapes it takes on its way in and out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted article row.
///
/// `image` is the stored filename inside the uploads directory, never a path
/// or a URL. Use [`ArticleResponse::with_base_url`] for the public shape.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Article {
    /// Server-assigned UUID v4, stored as text.
    pub id: String,

    pub title: String,

    pub content: String,

    pub author: String,

    /// Stored filename of the associated upload.
    pub image: String,

    /// Set once at creation.
    pub created_at: DateTime<Utc>,

    /// Maintained by the database.
    pub updated_at: DateTime<Utc>,
}

/// Values required to insert a new article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub author: String,
    pub image: String,
}

/// An article as served on read paths, with `image` rewritten into a
/// download URL under `/public/`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ArticleResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleResponse {
    pub fn with_base_url(article: Article, base_url: &str) -> Self {
        Self {
            image: public_url(base_url, &article.image),
            id: article.id,
            title: article.title,
            content: article.content,
            author: article.author,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// Build `{base_url}/public/{filename}`.
pub fn public_url(base_url: &str, filename: &str) -> String {
    format!("{}/public/{}", base_url.trim_end_matches('/'), filename)
}
