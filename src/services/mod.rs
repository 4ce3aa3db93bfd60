//! Domain services: filename resolution, multipart ingestion, persistence
//! and the pipelines that tie them together.

pub mod article_repository;
pub mod article_service;
pub mod filename_resolver;
pub mod ingest;
