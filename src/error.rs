use thiserror::Error;

/// Rejection of a user supplied file before it is submitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// MIME type outside of the allowed image types
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// File exceeds the configured upload limit
    #[error("too large: {size} bytes exceeds {max} bytes")]
    TooLarge { size: u64, max: u64 },

    /// The file could not be inspected on disk
    #[error("unreadable file {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Byte count in MiB, rounded up to two decimals with trailing zeros cut.
fn mebibytes(bytes: u64) -> String {
    let mib = (bytes as f64 / (1024.0 * 1024.0) * 100.0).ceil() / 100.0;
    let text = format!("{:.2}", mib);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl UploadError {
    /// Localized text shown to the user in a notice.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::InvalidType(_) => t!("upload.invalid_type").to_string(),
            UploadError::TooLarge { max, .. } => {
                t!("upload.too_large", max_mb = mebibytes(*max)).to_string()
            }
            UploadError::Unreadable { .. } => t!("upload.unreadable").to_string(),
        }
    }
}

/// Failure reported by the geolocation capability.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("geolocation unsupported")]
    Unsupported,
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timeout")]
    Timeout,
    #[error("unknown")]
    Unknown,
}

impl LocationError {
    /// Maps the platform error codes (1, 2, 3) onto the known failures.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocationError::PermissionDenied,
            2 => LocationError::PositionUnavailable,
            3 => LocationError::Timeout,
            _ => LocationError::Unknown,
        }
    }

    pub fn user_message(&self) -> String {
        let reason = match self {
            LocationError::Unsupported => return t!("location.unsupported").to_string(),
            LocationError::PermissionDenied => t!("location.permission_denied"),
            LocationError::PositionUnavailable => t!("location.position_unavailable"),
            LocationError::Timeout => t!("location.timeout"),
            LocationError::Unknown => t!("location.unknown"),
        };

        t!("location.error", reason = reason).to_string()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("map container '{0}' is missing")]
    MissingContainer(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The surface refused an operation
    #[error("surface error: {0}")]
    Surface(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::MalformedPayload(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortsError {
    #[error("host markup is missing required elements: {}", .0.join(", "))]
    Missing(Vec<String>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot identify config file type of {0}. Must be .toml, .json or .yaml")]
    UnknownFormat(String),

    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("invalid config: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_codes() {
        assert_eq!(LocationError::from_code(1), LocationError::PermissionDenied);
        assert_eq!(
            LocationError::from_code(2),
            LocationError::PositionUnavailable
        );
        assert_eq!(LocationError::from_code(3), LocationError::Timeout);
        assert_eq!(LocationError::from_code(0), LocationError::Unknown);
        assert_eq!(LocationError::from_code(42), LocationError::Unknown);
    }

    #[test]
    fn test_location_messages() {
        assert_eq!(
            LocationError::Timeout.user_message(),
            "Error getting location: Location request timed out."
        );
        assert_eq!(
            LocationError::Unsupported.user_message(),
            "Geolocation is not supported by this browser."
        );
    }

    #[test]
    fn test_upload_messages() {
        let err = UploadError::TooLarge {
            size: 60 * 1024 * 1024,
            max: 50 * 1024 * 1024,
        };
        assert_eq!(err.user_message(), "File too large. Maximum size is 50MB.");
        assert_eq!(err.to_string(), "too large: 62914560 bytes exceeds 52428800 bytes");
    }

    #[test]
    fn test_small_upload_limit_message() {
        let err = UploadError::TooLarge {
            size: 1024 * 1024,
            max: 512 * 1024,
        };
        assert_eq!(err.user_message(), "File too large. Maximum size is 0.5MB.");

        let err = UploadError::TooLarge { size: 2, max: 1 };
        assert_eq!(err.user_message(), "File too large. Maximum size is 0.01MB.");

        assert_eq!(mebibytes(3 * 1024 * 1024 / 2), "1.5");
    }
}
