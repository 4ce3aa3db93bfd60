//! ArticleRepository — a thin persistence facade over the `article` table.
//!
//! The repository owns its pool explicitly: [`ArticleRepository::connect`]
//! opens it at startup and [`ArticleRepository::close`] drains it at
//! shutdown. Nothing here touches the filesystem beyond the database file.

use crate::models::article::{Article, NewArticle};
use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

/// Schema applied on connect and by `--migrate`. Idempotent.
const SCHEMA: &str = include_str!("../../migrations/0001_init.sql");

#[derive(Clone, Debug)]
pub struct ArticleRepository {
    pool: SqlitePool,
}

impl ArticleRepository {
    /// Wrap an already-open pool. The schema is not applied.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url`, creating the database file and its
    /// parent directory when missing, and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let db_path = options.get_filename();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !fs::try_exists(parent).await? {
                fs::create_dir_all(parent).await?;
                info!("Created database directory {}", parent.display());
            }
        }
        debug!("Opening SQLite database at {}", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let repo = Self::new(pool);
        repo.migrate().await?;
        Ok(repo)
    }

    /// Apply the embedded schema.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection. Further queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Cheap connectivity probe.
    pub async fn ping(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a new article with a fresh id and `created_at`.
    ///
    /// `updated_at` is left to the column default.
    pub async fn create(&self, new: NewArticle) -> Result<Article, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            "INSERT INTO article (id, title, content, author, image, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id, title, content, author, image, created_at, updated_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(new.title)
        .bind(new.content)
        .bind(new.author)
        .bind(new.image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list(&self) -> Result<Vec<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            "SELECT id, title, content, author, image, created_at, updated_at
             FROM article ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// `Ok(None)` when no row has this id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            "SELECT id, title, content, author, image, created_at, updated_at
             FROM article WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete the row with this id. Assumes it exists; a missing row
    /// surfaces as `sqlx::Error::RowNotFound`.
    pub async fn delete_by_id(&self, id: &str) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM article WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
