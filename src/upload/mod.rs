//! Upload page interactions: file checks, the selection panel, drag and
//! drop, submit validation and the browser location request.

pub mod drop_zone;
pub mod form;
pub mod location;
pub mod page;
pub mod panel;
pub mod validation;

pub use drop_zone::{DragEvent, DragState, DropZone};
pub use form::{FieldError, UploadForm, UploadSubmission};
pub use location::{
    CoordinateFields, LocationProvider, Position, PositionOptions, PrefilledLocation, TriggerControl,
    request_location,
};
pub use page::UploadPage;
pub use panel::SelectionPanel;
pub use validation::{UploadRules, validate_file};
