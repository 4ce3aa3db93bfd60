//! Core data models for the article service.
//!
//! `Article` maps onto the `article` table via `sqlx::FromRow`; the upload
//! types only live for the duration of a request.

pub mod article;
pub mod upload;
