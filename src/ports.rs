use scraper::{Html, Selector};
use serde::Serialize;

use crate::error::PortsError;

pub const FILE_INPUT: &str = "imageFile";
pub const DROP_ZONE: &str = "dropZone";
pub const USER_LAT: &str = "userLat";
pub const USER_LON: &str = "userLon";
/// Region notices are inserted into
pub const CONTENT_REGION: &str = "container";
pub const VALIDATED_FORM: &str = "needs-validation";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    Upload,
    Results,
}

/// The named slots a host template provides for the components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ports {
    pub page: PageKind,
    /// Number of forms opting into submit validation
    pub validated_forms: usize,
}

fn selector(css: &str) -> Result<Selector, PortsError> {
    Selector::parse(css).map_err(|_| PortsError::Missing(vec![css.to_string()]))
}

impl Ports {
    /// Parses the host markup and fails with every missing slot at once.
    pub fn check(markup: &str, page: PageKind, map_container: &str) -> Result<Self, PortsError> {
        let document = Html::parse_document(markup);

        let mut required: Vec<String> = vec![format!(".{CONTENT_REGION}")];
        match page {
            PageKind::Upload => {
                for id in [FILE_INPUT, DROP_ZONE, USER_LAT, USER_LON] {
                    required.push(format!("#{id}"));
                }
            }
            PageKind::Results => required.push(format!("#{map_container}")),
        }

        let mut missing = vec![];
        for css in required {
            if document.select(&selector(&css)?).next().is_none() {
                missing.push(css);
            }
        }

        if !missing.is_empty() {
            log::error!("Host markup for {:?} page is missing {:?}", page, missing);
            return Err(PortsError::Missing(missing));
        }

        let validated_forms = document
            .select(&selector(&format!("form.{VALIDATED_FORM}"))?)
            .count();
        log::debug!("{} forms with submit validation", validated_forms);

        Ok(Self {
            page,
            validated_forms,
        })
    }
}
