//! ArticleService — the ordered pipelines behind every route.
//!
//! Writes always go multipart → stored files → database row, so a row never
//! references a file that was not written first. If the row cannot be created
//! (bad fields or a database failure) the files written by that request are
//! removed again, best-effort.
//!
//! Reads rewrite the stored filename into `{base_url}/public/{filename}`.

use crate::{
    models::{
        article::{Article, ArticleResponse, NewArticle, public_url},
        upload::IngestedForm,
    },
    services::{
        article_repository::ArticleRepository,
        ingest::{IngestError, ingest},
    },
};
use axum::extract::Multipart;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::fs::{self, File};
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("article `{0}` not found")]
    NotFound(String),
    #[error("file `{0}` not found")]
    FileNotFound(String),
    #[error(transparent)]
    Validation(#[from] IngestError),
    #[error(transparent)]
    Storage(#[from] io::Error),
    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

pub type ArticleResult<T> = Result<T, ArticleError>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct ArticleService {
    repo: ArticleRepository,

    /// Directory holding uploaded files, served under `/public/`.
    uploads_dir: PathBuf,

    /// Externally visible origin used to build image URLs.
    base_url: Arc<str>,
}

impl ArticleService {
    pub fn new(
        repo: ArticleRepository,
        uploads_dir: impl Into<PathBuf>,
        base_url: impl AsRef<str>,
    ) -> Self {
        Self {
            repo,
            uploads_dir: uploads_dir.into(),
            base_url: Arc::from(base_url.as_ref()),
        }
    }

    pub fn repository(&self) -> &ArticleRepository {
        &self.repo
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// `POST /articles`: ingest the form, then create the row.
    ///
    /// The returned article carries the raw stored filename, not a URL.
    pub async fn create_from_multipart(&self, multipart: &mut Multipart) -> ArticleResult<Article> {
        let form = ingest(multipart, &self.uploads_dir).await?;

        let new = match new_article_from(&form) {
            Ok(new) => new,
            Err(err) => {
                form.discard().await;
                return Err(err.into());
            }
        };

        match self.repo.create(new).await {
            Ok(article) => {
                info!("Created article {} with image {}", article.id, article.image);
                Ok(article)
            }
            Err(err) => {
                form.discard().await;
                Err(err.into())
            }
        }
    }

    /// `POST /upload`: store the files and return the URL of the first one.
    /// Text fields are ignored.
    pub async fn upload_image(&self, multipart: &mut Multipart) -> ArticleResult<String> {
        let form = ingest(multipart, &self.uploads_dir).await?;
        let file = form.first_file()?;
        info!(
            "Uploaded standalone image {} from field `{}` ({})",
            file.filename,
            file.field_name,
            file.mime_type.as_deref().unwrap_or("no content type")
        );
        Ok(public_url(&self.base_url, &file.filename))
    }

    pub async fn list(&self) -> ArticleResult<Vec<ArticleResponse>> {
        let articles = self.repo.list().await?;
        Ok(articles
            .into_iter()
            .map(|article| ArticleResponse::with_base_url(article, &self.base_url))
            .collect())
    }

    pub async fn get(&self, id: &str) -> ArticleResult<ArticleResponse> {
        let article = self.fetch(id).await?;
        Ok(ArticleResponse::with_base_url(article, &self.base_url))
    }

    /// Delete the row, then its image. A missing image is not an error, and
    /// any other failure to remove it is only logged since the row is gone.
    pub async fn delete(&self, id: &str) -> ArticleResult<Article> {
        let article = self.fetch(id).await?;
        self.repo
            .delete_by_id(id)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => ArticleError::NotFound(id.to_string()),
                other => ArticleError::Persistence(other),
            })?;

        let path = self.uploads_dir.join(&article.image);
        match fs::remove_file(&path).await {
            Ok(_) => debug!("removed image {}", path.display()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("image {} already missing", path.display());
            }
            Err(err) => warn!("could not remove image {}: {}", path.display(), err),
        }

        info!("Deleted article {}", id);
        Ok(article)
    }

    /// Open a stored upload for `GET /public/{filename}`.
    ///
    /// Only bare filenames are accepted; anything that could address a path
    /// outside the uploads directory is reported as not found.
    pub async fn open_public(&self, filename: &str) -> ArticleResult<(File, PathBuf)> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\', '\0'])
        {
            return Err(ArticleError::FileNotFound(filename.to_string()));
        }

        let path = self.uploads_dir.join(filename);
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ArticleError::FileNotFound(filename.to_string()));
            }
            Err(err) => return Err(ArticleError::Storage(err)),
        };

        if !file.metadata().await?.is_file() {
            return Err(ArticleError::FileNotFound(filename.to_string()));
        }
        Ok((file, path))
    }

    async fn fetch(&self, id: &str) -> ArticleResult<Article> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| ArticleError::NotFound(id.to_string()))
    }
}

/// Pick the article fields out of an ingested form.
fn new_article_from(form: &IngestedForm) -> Result<NewArticle, IngestError> {
    Ok(NewArticle {
        title: form.require_text("title")?.to_string(),
        content: form.require_text("content")?.to_string(),
        author: form.require_text("author")?.to_string(),
        image: form.first_file()?.filename.clone(),
    })
}
