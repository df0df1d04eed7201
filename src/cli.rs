use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::ports::PageKind;

#[derive(Parser, Debug)]
#[command(
    name = "geovision",
    version,
    about = "Upload checks and result maps for the GeoVision lookup page"
)]
pub struct CliArgs {
    /// Config file path (default: "config.toml")
    #[arg(short, long, env = "GV_CONFIG")]
    pub config: Option<String>,

    /// Language of user facing messages (default: "en")
    #[arg(short, long, env = "GV_LANGUAGE")]
    pub language: Option<String>,

    /// Output directory for rendered pages (default: "output")
    #[arg(long, env = "GV_OUTPUT_DIR")]
    pub output_dir: Option<String>,

    /// Upload limit in MiB (default: 50)
    #[arg(long, env = "GV_MAX_UPLOAD_MB")]
    pub max_upload_mb: Option<u64>,

    /// Seconds until a notice dismisses itself (default: 5)
    #[arg(long, env = "GV_NOTICE_SECS")]
    pub notice_secs: Option<u64>,

    /// Geolocation timeout in sec (default: 10)
    #[arg(long, env = "GV_GEOLOCATION_TIMEOUT")]
    pub geolocation_timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check an image against the upload rules
    Validate { path: PathBuf },

    /// Render a results payload into a standalone map page
    Render {
        /// JSON file with `{"results": [...]}`
        payload: PathBuf,
        #[arg(long, allow_negative_numbers = true, requires = "user_lon")]
        user_lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "user_lat")]
        user_lon: Option<f64>,
        /// Output file (default: "<output-dir>/map.html")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print formatted values
    Format {
        #[command(subcommand)]
        what: FormatCommand,
    },

    /// Fill the coordinate fields from a pre-filled position
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        lon: Option<String>,
        /// Simulate a platform failure code (1 denied, 2 unavailable, 3 timeout)
        #[arg(long)]
        error_code: Option<u16>,
    },

    /// Verify a host template provides the required elements
    CheckTemplate {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = PageKind::Upload)]
        page: PageKind,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FormatCommand {
    Coordinate {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },
    Distance {
        km: f64,
    },
    Bearing {
        degrees: f64,
    },
    Confidence {
        value: f64,
    },
}

#[derive(Serialize, Debug, Default)]
pub(crate) struct GeneralOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dir: Option<PathBuf>,
}

#[derive(Serialize, Debug, Default)]
pub(crate) struct UploadOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_size_bytes: Option<u64>,
}

#[derive(Serialize, Debug, Default)]
pub(crate) struct NoticesOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    auto_dismiss_secs: Option<u64>,
}

#[derive(Serialize, Debug, Default)]
pub(crate) struct GeolocationOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_secs: Option<u64>,
}

/// The subset of the config that can be set from the command line.
#[derive(Serialize, Debug, Default)]
pub(crate) struct Overrides {
    general: GeneralOverrides,
    upload: UploadOverrides,
    notices: NoticesOverrides,
    geolocation: GeolocationOverrides,
}

impl CliArgs {
    pub(crate) fn as_overrides(&self) -> Overrides {
        Overrides {
            general: GeneralOverrides {
                language: self.language.clone(),
                output_dir: self.output_dir.as_ref().map(PathBuf::from),
            },
            upload: UploadOverrides {
                max_size_bytes: self.max_upload_mb.map(|mb| mb.saturating_mul(1024 * 1024)),
            },
            notices: NoticesOverrides {
                auto_dismiss_secs: self.notice_secs,
            },
            geolocation: GeolocationOverrides {
                timeout_secs: self.geolocation_timeout,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_skip_unset() {
        let args = CliArgs::parse_from(["geovision", "format", "bearing", "90"]);
        let value = serde_json::to_value(args.as_overrides()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "general": {},
                "upload": {},
                "notices": {},
                "geolocation": {}
            })
        );
    }

    #[test]
    fn test_overrides_set() {
        let args = CliArgs::parse_from([
            "geovision",
            "--language",
            "de",
            "--max-upload-mb",
            "10",
            "--geolocation-timeout",
            "3",
            "format",
            "bearing",
            "90",
        ]);
        let value = serde_json::to_value(args.as_overrides()).unwrap();

        assert_eq!(value["general"]["language"], "de");
        assert_eq!(value["upload"]["max_size_bytes"], 10 * 1024 * 1024);
        assert_eq!(value["geolocation"]["timeout_secs"], 3);
    }

    #[test]
    fn test_huge_upload_limit_saturates() {
        let args = CliArgs::parse_from([
            "geovision",
            "--max-upload-mb",
            "18446744073709551615",
            "format",
            "bearing",
            "90",
        ]);
        let overrides = args.as_overrides();

        assert_eq!(overrides.upload.max_size_bytes, Some(u64::MAX));
    }

    #[test]
    fn test_render_with_negative_coordinates() {
        let args = CliArgs::parse_from([
            "geovision",
            "render",
            "payload.json",
            "--user-lat",
            "-33.5",
            "--user-lon",
            "-70.25",
        ]);

        match args.command {
            Command::Render {
                user_lat, user_lon, ..
            } => {
                assert_eq!(user_lat, Some(-33.5));
                assert_eq!(user_lon, Some(-70.25));
            }
            other => panic!("Unexpected command {:?}", other),
        }
    }
}
