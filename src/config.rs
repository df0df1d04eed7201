use std::{path::PathBuf, time::Duration};

use figment::{
    Figment,
    providers::{Format, Json, Serialized, Toml, Yaml},
};
use normalize_path::NormalizePath;
use once_cell::sync::OnceCell;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};

use crate::{cli::CliArgs, error::ConfigError, map::TileLayer};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct General {
    /// Locale used for user facing messages
    pub language: String,
    /// Where rendered pages are written
    pub output_dir: PathBuf,
}

impl Default for General {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            output_dir: PathBuf::from("./output"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Upload {
    pub max_size_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for Upload {
    fn default() -> Self {
        Self {
            max_size_bytes: 50 * 1024 * 1024,
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/png".to_string(),
                "image/tiff".to_string(),
            ],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Notices {
    pub auto_dismiss_secs: u64,
}

impl Notices {
    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_secs(self.auto_dismiss_secs)
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self {
            auto_dismiss_secs: 5,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Geolocation {
    pub high_accuracy: bool,
    pub timeout_secs: u64,
    /// Oldest cached position that is still accepted
    pub maximum_age_secs: u64,
}

impl Default for Geolocation {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_secs: 10,
            maximum_age_secs: 300,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Map {
    /// Element id of the map container
    pub container: String,
    /// `[lat, lng]` shown when there are no results
    pub default_center: [f64; 2],
    pub default_zoom: u8,
    /// Fraction of the marker bounds added on every side
    pub fit_padding: f64,
    pub street: TileLayer,
    pub satellite: TileLayer,
}

impl Default for Map {
    fn default() -> Self {
        Self {
            container: "map".to_string(),
            default_center: [20.0, 0.0],
            default_zoom: 3,
            fit_padding: 0.1,
            street: TileLayer::street(),
            satellite: TileLayer::satellite(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub upload: Upload,
    pub notices: Notices,
    pub geolocation: Geolocation,
    pub map: Map,
}

/// The process wide config, loaded once by the binary.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        log::debug!("Config not initialized, using defaults");
        Config::default()
    })
}

pub fn init_config(config: Config) {
    if CONFIG.set(config).is_err() {
        log::warn!("Config already initialized, ignoring reload");
    }
}

fn merge_file(figment: Figment, path: &std::path::Path) -> Result<Figment, ConfigError> {
    let ext = path.extension().and_then(|ext| ext.to_str());
    let figment = match ext {
        Some("toml") => figment.merge(Toml::file(path)),
        Some("json") => figment.merge(Json::file(path)),
        Some("yaml") | Some("yml") => figment.merge(Yaml::file(path)),
        _ => return Err(ConfigError::UnknownFormat(path.display().to_string())),
    };

    Ok(figment)
}

/// Layers defaults, the optional config file and the CLI/env overrides.
pub fn load_config(args: &CliArgs) -> Result<Config, ConfigError> {
    let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

    let config_path = PathBuf::from(
        args.config
            .clone()
            .unwrap_or(DEFAULT_CONFIG_PATH.to_string()),
    );

    if config_path.exists() {
        log::info!("Config file found: {}", config_path.display());
        figment = merge_file(figment, &config_path)?;
    } else if config_path.to_str() != Some(DEFAULT_CONFIG_PATH) {
        return Err(ConfigError::NotFound(config_path.display().to_string()));
    }

    let mut config: Config = figment
        .merge(Serialized::defaults(args.as_overrides()))
        .extract()
        .map_err(Box::new)?;

    config.general.output_dir = config.general.output_dir.resolve().normalize();

    log::debug!("Loaded config: {:#?}", config);

    Ok(config)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("geovision-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.upload.max_size_bytes, 52_428_800);
        assert_eq!(config.upload.allowed_types.len(), 4);
        assert_eq!(config.notices.auto_dismiss(), Duration::from_secs(5));
        assert_eq!(config.geolocation.timeout_secs, 10);
        assert_eq!(config.geolocation.maximum_age_secs, 300);
        assert_eq!(config.map.default_center, [20.0, 0.0]);
        assert_eq!(config.map.default_zoom, 3);
    }

    #[test]
    fn test_file_and_cli_layers() {
        let path = write_config(
            "layers.toml",
            r#"
            [upload]
            max_size_bytes = 1024

            [map]
            default_zoom = 5
            "#,
        );

        let args = CliArgs::parse_from([
            "geovision",
            "--config",
            path.to_str().unwrap(),
            "--notice-secs",
            "9",
            "format",
            "distance",
            "1",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.upload.max_size_bytes, 1024);
        assert_eq!(config.map.default_zoom, 5);
        assert_eq!(config.notices.auto_dismiss_secs, 9);
        assert_eq!(config.geolocation.timeout_secs, 10);
        assert!(config.general.output_dir.is_absolute());
    }

    #[test]
    fn test_cli_overrides_file() {
        let path = write_config(
            "override.yaml",
            "upload:\n  max_size_bytes: 1024\n",
        );

        let args = CliArgs::parse_from([
            "geovision",
            "--config",
            path.to_str().unwrap(),
            "--max-upload-mb",
            "2",
            "format",
            "distance",
            "1",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.upload.max_size_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_unknown_format() {
        let path = write_config("config.ini", "x = 1");
        let args = CliArgs::parse_from([
            "geovision",
            "--config",
            path.to_str().unwrap(),
            "format",
            "distance",
            "1",
        ]);

        assert!(matches!(
            load_config(&args),
            Err(ConfigError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let args = CliArgs::parse_from([
            "geovision",
            "--config",
            "/nonexistent/geovision.toml",
            "format",
            "distance",
            "1",
        ]);

        assert!(matches!(load_config(&args), Err(ConfigError::NotFound(_))));
    }
}
