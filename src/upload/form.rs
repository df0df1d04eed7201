use serde::Serialize;
use thiserror::Error;

use crate::{
    error::UploadError,
    models::{UploadedFile, UserLocation},
    upload::{
        location::CoordinateFields,
        validation::{UploadRules, validate_file},
    },
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("no file selected")]
    MissingFile,
    #[error("file rejected: {0}")]
    RejectedFile(UploadError),
    #[error("invalid latitude: {0}")]
    InvalidLatitude(String),
    #[error("invalid longitude: {0}")]
    InvalidLongitude(String),
    #[error("only one coordinate given")]
    IncompleteLocation,
}

impl FieldError {
    pub fn user_message(&self) -> String {
        match self {
            FieldError::MissingFile => t!("form.missing_file").to_string(),
            FieldError::RejectedFile(err) => err.user_message(),
            FieldError::InvalidLatitude(_) => t!("form.invalid_latitude").to_string(),
            FieldError::InvalidLongitude(_) => t!("form.invalid_longitude").to_string(),
            FieldError::IncompleteLocation => t!("form.incomplete_location").to_string(),
        }
    }
}

/// What gets posted once the form passes validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSubmission {
    pub file: UploadedFile,
    pub user_location: Option<UserLocation>,
}

/// The `needs-validation` upload form.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub coordinates: CoordinateFields,
    was_validated: bool,
}

fn parse_coordinate(raw: &str, limit: f64) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.abs() <= limit)
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set after the first submit attempt so the page shows field feedback.
    pub fn was_validated(&self) -> bool {
        self.was_validated
    }

    pub fn css_class(&self) -> &'static str {
        if self.was_validated {
            "needs-validation was-validated"
        } else {
            "needs-validation"
        }
    }

    fn check_location(&self) -> Result<Option<UserLocation>, Vec<FieldError>> {
        let lat = self.coordinates.lat.trim();
        let lon = self.coordinates.lon.trim();

        match (lat.is_empty(), lon.is_empty()) {
            (true, true) => return Ok(None),
            (true, false) | (false, true) => return Err(vec![FieldError::IncompleteLocation]),
            (false, false) => (),
        }

        let mut errors = vec![];
        let lat_value = parse_coordinate(lat, 90.0);
        let lon_value = parse_coordinate(lon, 180.0);
        if lat_value.is_none() {
            errors.push(FieldError::InvalidLatitude(lat.to_string()));
        }
        if lon_value.is_none() {
            errors.push(FieldError::InvalidLongitude(lon.to_string()));
        }

        match (lat_value, lon_value) {
            (Some(lat), Some(lon)) => Ok(Some(UserLocation::new(lat, lon))),
            _ => Err(errors),
        }
    }

    /// Validates every field and either blocks the submit with all field
    /// errors or hands back the submission.
    pub fn submit(&mut self, rules: &UploadRules) -> Result<UploadSubmission, Vec<FieldError>> {
        self.was_validated = true;
        let mut errors = vec![];

        let file = match &self.file {
            None => {
                errors.push(FieldError::MissingFile);
                None
            }
            Some(file) => match validate_file(file, rules) {
                Ok(()) => Some(file.clone()),
                Err(err) => {
                    errors.push(FieldError::RejectedFile(err));
                    None
                }
            },
        };

        let user_location = match self.check_location() {
            Ok(location) => location,
            Err(location_errors) => {
                errors.extend(location_errors);
                None
            }
        };

        match file {
            Some(file) if errors.is_empty() => {
                log::info!("Submitting {}", file.name);
                Ok(UploadSubmission {
                    file,
                    user_location,
                })
            }
            _ => {
                log::info!("Submit blocked by {} field errors", errors.len());
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(file: Option<UploadedFile>, lat: &str, lon: &str) -> UploadForm {
        UploadForm {
            file,
            coordinates: CoordinateFields {
                lat: lat.to_string(),
                lon: lon.to_string(),
            },
            was_validated: false,
        }
    }

    fn jpeg() -> UploadedFile {
        UploadedFile::new("street.jpg", 2048, "image/jpeg")
    }

    #[test]
    fn test_submit_without_location() {
        let mut form = form_with(Some(jpeg()), "", " ");
        assert_eq!(form.css_class(), "needs-validation");

        let submission = form.submit(&UploadRules::default()).unwrap();
        assert_eq!(submission.file, jpeg());
        assert_eq!(submission.user_location, None);
        assert_eq!(form.css_class(), "needs-validation was-validated");
    }

    #[test]
    fn test_submit_with_location() {
        let mut form = form_with(Some(jpeg()), "-33.868820", "151.209290");
        let submission = form.submit(&UploadRules::default()).unwrap();

        assert_eq!(
            submission.user_location,
            Some(UserLocation::new(-33.86882, 151.20929))
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut form = form_with(None, "95", "abc");
        let errors = form.submit(&UploadRules::default()).unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError::MissingFile,
                FieldError::InvalidLatitude("95".to_string()),
                FieldError::InvalidLongitude("abc".to_string()),
            ]
        );
        assert!(form.was_validated());
    }

    #[test]
    fn test_incomplete_location() {
        let mut form = form_with(Some(jpeg()), "12.5", "");
        let errors = form.submit(&UploadRules::default()).unwrap_err();

        assert_eq!(errors, vec![FieldError::IncompleteLocation]);
        assert_eq!(
            errors[0].user_message(),
            "Please provide both latitude and longitude, or neither."
        );
    }

    #[test]
    fn test_rejected_file() {
        let mut form = form_with(Some(UploadedFile::new("doc.pdf", 1, "application/pdf")), "", "");
        let errors = form.submit(&UploadRules::default()).unwrap_err();

        assert_eq!(
            errors,
            vec![FieldError::RejectedFile(UploadError::InvalidType(
                "application/pdf".to_string()
            ))]
        );
        assert_eq!(
            errors[0].user_message(),
            "Invalid file type. Please select a JPEG, PNG, or TIFF image."
        );
    }
}
