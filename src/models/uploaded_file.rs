use std::path::Path;

use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// A file picked by the user, only alive until the form is submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Size in MiB, the unit shown in the selection panel.
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }

    /// Inspects a file on disk. The MIME type is sniffed from the content
    /// and falls back to the extension when the content is not a known
    /// image format.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let unreadable = |reason: String| UploadError::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let metadata = std::fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_file() {
            return Err(unreadable("not a regular file".to_string()));
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let sniffed = match ImageReader::open(path).and_then(|r| r.with_guessed_format()) {
            Ok(reader) => reader.format().map(|format| format.to_mime_type()),
            Err(e) => {
                log::warn!("Failed to sniff {}: {}", path.display(), e);
                None
            }
        };

        let mime_type = match sniffed {
            Some(mime_type) => mime_type.to_string(),
            None => {
                log::debug!("Guessing MIME type of {} from its extension", name);
                mime_guess::from_path(path)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            }
        };

        log::info!(
            "Inspected {} ({} bytes, {})",
            name,
            metadata.len(),
            mime_type
        );

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            mime_type,
        })
    }
}
