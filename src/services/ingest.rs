//! Multipart ingestion: split a request into text fields and stored files.
//!
//! Parts are processed strictly in arrival order. A part with a non-empty
//! filename is a file part; its body is buffered and written to the uploads
//! directory before the next part is read. Everything else is a text part
//! whose value is kept verbatim.

use crate::{
    models::upload::{IngestedForm, TextField, UploadedFile},
    services::filename_resolver::{normalize_filename, write_unique},
};
use axum::extract::{Multipart, multipart::MultipartError};
use std::{io, path::Path};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing required field `{0}`")]
    MissingField(String),
    #[error("no file was uploaded")]
    MissingFile,
    #[error("filename `{0}` is not usable")]
    InvalidFilename(String),
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl IngestError {
    /// True when the client sent something unusable, as opposed to a
    /// server-side filesystem failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, IngestError::Io(_))
    }
}

/// Consume every part of `multipart`, writing file parts beneath `uploads_dir`.
///
/// The directory (and its parents) is created up front if missing. If any
/// part fails, files already written by this call are removed before the
/// error is returned.
pub async fn ingest(
    multipart: &mut Multipart,
    uploads_dir: &Path,
) -> Result<IngestedForm, IngestError> {
    fs::create_dir_all(uploads_dir).await?;

    let mut form = IngestedForm::default();
    if let Err(err) = read_parts(multipart, uploads_dir, &mut form).await {
        form.discard().await;
        return Err(err);
    }
    Ok(form)
}

async fn read_parts(
    multipart: &mut Multipart,
    uploads_dir: &Path,
    form: &mut IngestedForm,
) -> Result<(), IngestError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let requested = field
            .file_name()
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        let Some(requested) = requested else {
            let value = field.text().await?;
            form.text_fields.push(TextField { name, value });
            continue;
        };

        let normalized =
            normalize_filename(&requested).ok_or(IngestError::InvalidFilename(requested))?;
        let mime_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        let (filename, path) = write_unique(uploads_dir, &normalized, &data).await?;
        debug!(
            "stored field `{}` as {} ({} bytes)",
            name,
            path.display(),
            data.len()
        );

        form.files.push(UploadedFile {
            field_name: name,
            filename,
            path,
            mime_type,
        });
    }

    Ok(())
}

impl IngestedForm {
    /// Value of the first text field called `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.text_fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Like [`IngestedForm::text`], but an absent or empty value is an error.
    pub fn require_text(&self, name: &str) -> Result<&str, IngestError> {
        self.text(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| IngestError::MissingField(name.to_string()))
    }

    pub fn first_file(&self) -> Result<&UploadedFile, IngestError> {
        self.files.first().ok_or(IngestError::MissingFile)
    }

    /// Remove every stored file, best-effort.
    pub async fn discard(&self) {
        for file in &self.files {
            if let Err(err) = fs::remove_file(&file.path).await {
                debug!("failed to discard {}: {}", file.path.display(), err);
            }
        }
    }
}
