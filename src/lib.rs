#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod map;
pub mod models;
pub mod notice;
pub mod ports;
pub mod upload;
pub(crate) mod utils;

pub use error::{ConfigError, LocationError, PortsError, RenderError, UploadError};
pub use models::{MapPayload, SearchResult, UploadedFile, UserLocation};
