//! Results of ingesting a multipart request.

use std::path::PathBuf;

/// A plain value part, kept verbatim.
#[derive(Clone, Debug, PartialEq)]
pub struct TextField {
    pub name: String,
    pub value: String,
}

/// A file part after it has been written to the uploads directory.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadedFile {
    /// Name of the form field the file arrived under.
    pub field_name: String,

    /// Final, collision-free filename inside the uploads directory.
    pub filename: String,

    /// Absolute or configured-relative location of the stored bytes.
    pub path: PathBuf,

    /// MIME type declared by the client, if any.
    pub mime_type: Option<String>,
}

/// Every part of a multipart request, split by kind, in arrival order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IngestedForm {
    pub text_fields: Vec<TextField>,
    pub files: Vec<UploadedFile>,
}
