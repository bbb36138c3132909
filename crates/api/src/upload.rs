//! Multipart form handling.
//!
//! File parts are streamed chunk by chunk into temporary files so large
//! videos never sit in memory. The temporary files are removed when the
//! form is dropped, whether the upload that follows succeeded or not.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use axum::extract::multipart::Field;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use vidhub_common::{AppError, AppResult};

/// A file part spooled to disk.
#[derive(Debug)]
pub struct SpooledFile {
    file: NamedTempFile,
    size: u64,
}

impl SpooledFile {
    /// Location of the spooled data.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes written.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }
}

/// Text fields and spooled files of one multipart request.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, SpooledFile>,
}

impl MultipartForm {
    /// Read every part. Parts named in `file_fields` are spooled to disk,
    /// everything else is read as text. Empty file parts are skipped.
    pub async fn read(mut multipart: Multipart, file_fields: &[&str]) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if file_fields.contains(&name.as_str()) {
                let spooled = spool(field).await?;
                if spooled.size > 0 {
                    form.files.insert(name, spooled);
                }
            } else {
                let text = field.text().await.map_err(malformed)?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// Text value of a field, if present and not blank.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Spooled file of a field, if one was sent.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&SpooledFile> {
        self.files.get(name)
    }
}

fn malformed(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
}

fn spool_failed(err: std::io::Error) -> AppError {
    tracing::error!(error = %err, "Failed to spool upload");
    AppError::Internal("Error while receiving upload".to_string())
}

async fn spool(mut field: Field<'_>) -> AppResult<SpooledFile> {
    // Keep the extension so the media host can sniff the type
    let suffix = field
        .file_name()
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let file = tempfile::Builder::new()
        .prefix("vidhub-")
        .suffix(&suffix)
        .tempfile()
        .map_err(spool_failed)?;

    let mut out = tokio::fs::File::from_std(file.reopen().map_err(spool_failed)?);
    let mut size = 0u64;

    while let Some(chunk) = field.chunk().await.map_err(malformed)? {
        out.write_all(&chunk).await.map_err(spool_failed)?;
        size += chunk.len() as u64;
    }
    out.flush().await.map_err(spool_failed)?;

    Ok(SpooledFile { file, size })
}
