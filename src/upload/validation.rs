use mime::Mime;

use crate::{config, error::UploadError, models::UploadedFile};

/// Accepted MIME types and size limit for uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRules {
    pub allowed_types: Vec<Mime>,
    pub max_size_bytes: u64,
}

impl UploadRules {
    pub fn from_config(upload: &config::Upload) -> Self {
        let allowed_types = upload
            .allowed_types
            .iter()
            .filter_map(|raw| match raw.parse::<Mime>() {
                Ok(mime) => Some(mime),
                Err(e) => {
                    log::error!("Ignoring invalid MIME type {} in config: {}", raw, e);
                    None
                }
            })
            .collect();

        Self {
            allowed_types,
            max_size_bytes: upload.max_size_bytes,
        }
    }

    fn allows(&self, mime_type: &str) -> bool {
        match mime_type.trim().parse::<Mime>() {
            Ok(mime) => self
                .allowed_types
                .iter()
                .any(|allowed| allowed.essence_str() == mime.essence_str()),
            Err(_) => false,
        }
    }
}

impl Default for UploadRules {
    fn default() -> Self {
        Self::from_config(&config::Upload::default())
    }
}

/// The type is checked before the size, so a wrong type is reported even
/// for oversized files.
pub fn validate_file(file: &UploadedFile, rules: &UploadRules) -> Result<(), UploadError> {
    if !rules.allows(&file.mime_type) {
        log::info!("Rejected {}: invalid type {}", file.name, file.mime_type);
        return Err(UploadError::InvalidType(file.mime_type.clone()));
    }

    if file.size_bytes > rules.max_size_bytes {
        log::info!("Rejected {}: {} bytes", file.name, file.size_bytes);
        return Err(UploadError::TooLarge {
            size: file.size_bytes,
            max: rules.max_size_bytes,
        });
    }

    Ok(())
}
