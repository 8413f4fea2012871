use anyhow::{Context, Result};
use bytes::Bytes;
use std::path::{Component, Path};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A local file selected for upload, with the content type it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl FileBlob {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, inferring its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
        }

        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        Ok(Self {
            file_name,
            content_type: content_type_for_extension(&extension).to_string(),
            data: Bytes::from(data),
        })
    }

    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    pub fn is_pdf(&self) -> bool {
        self.essence() == PDF_CONTENT_TYPE
    }

    pub fn is_image(&self) -> bool {
        self.essence().starts_with("image/")
    }
}

/// Content type a browser would declare for a file with this extension.
pub fn content_type_for_extension(extension: &str) -> &'static str {
    match extension {
        "pdf" => PDF_CONTENT_TYPE,
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
