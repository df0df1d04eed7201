use std::{path::Path, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;

use geovision::{
    UserLocation,
    cli::{CliArgs, Command, FormatCommand},
    config::{Config, get_config, init_config, load_config},
    format,
    map::{LeafletSurface, render_payload_json},
    models::UploadedFile,
    notice::{NoticeBoard, Notifier},
    ports::Ports,
    upload::{
        CoordinateFields, PositionOptions, PrefilledLocation, TriggerControl, UploadRules,
        SelectionPanel, request_location, validate_file,
    },
};

fn validate(path: &Path, config: &Config) -> Result<bool> {
    let rules = UploadRules::from_config(&config.upload);
    let file = UploadedFile::from_path(path)?;

    match validate_file(&file, &rules) {
        Ok(()) => {
            let mut panel = SelectionPanel::new();
            panel.display(&file);
            println!("{}", panel.to_html().unwrap_or_default());
            Ok(true)
        }
        Err(err) => {
            println!("{}", err.user_message());
            Ok(false)
        }
    }
}

async fn render(
    payload: &Path,
    user_location: Option<UserLocation>,
    output: Option<&Path>,
    config: &Config,
) -> Result<bool> {
    let json = tokio::fs::read_to_string(payload)
        .await
        .with_context(|| format!("Failed to read payload {}", payload.display()))?;

    let mut surface = LeafletSurface::new();
    let state = render_payload_json(&mut surface, &json, user_location.as_ref(), &config.map);

    let output = match output {
        Some(output) => output.to_path_buf(),
        None => {
            tokio::fs::create_dir_all(&config.general.output_dir)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create output directory {}",
                        config.general.output_dir.display()
                    )
                })?;
            config.general.output_dir.join("map.html")
        }
    };

    tokio::fs::write(&output, surface.to_html("GeoVision Results"))
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("Map written to {}", output.display());
    println!("{}", output.display());

    Ok(state.is_ready())
}

async fn locate(
    lat: Option<String>,
    lon: Option<String>,
    error_code: Option<u16>,
    config: &Config,
) -> bool {
    let provider = match error_code {
        Some(code) => PrefilledLocation::failing(code),
        None => PrefilledLocation::new(UserLocation::from_fields(
            lat.as_deref().unwrap_or_default(),
            lon.as_deref().unwrap_or_default(),
        )),
    };

    let board = Arc::new(NoticeBoard::new());
    let notifier = Notifier::new(board.clone(), config.notices.auto_dismiss());
    let mut fields = CoordinateFields::default();
    let mut control = TriggerControl::new("Use Current Location");

    let result = request_location(
        &provider,
        &PositionOptions::from_config(&config.geolocation),
        &mut fields,
        &mut control,
        &notifier,
    )
    .await;

    for notice in board.notices() {
        println!("[{}] {}", notice.severity, notice.message);
    }
    if result.is_ok() {
        println!("userLat={}\nuserLon={}", fields.lat, fields.lon);
    }

    result.is_ok()
}

fn print_format(what: FormatCommand) {
    let text = match what {
        FormatCommand::Coordinate { lat, lon } => format::format_coordinate(lat, lon),
        FormatCommand::Distance { km } => format::format_distance(km),
        FormatCommand::Bearing { degrees } => format::format_bearing(degrees),
        FormatCommand::Confidence { value } => {
            let class = format::confidence_class(value);
            format!(
                "{} ({})",
                format::format_confidence(value),
                class.css_class()
            )
        }
    };

    println!("{}", text);
}

async fn run(command: Command, config: &Config) -> Result<bool> {
    match command {
        Command::Validate { path } => validate(&path, config),
        Command::Render {
            payload,
            user_lat,
            user_lon,
            output,
        } => {
            let user_location = user_lat
                .zip(user_lon)
                .map(|(lat, lng)| UserLocation::new(lat, lng));
            render(&payload, user_location, output.as_deref(), config).await
        }
        Command::Format { what } => {
            print_format(what);
            Ok(true)
        }
        Command::Locate {
            lat,
            lon,
            error_code,
        } => Ok(locate(lat, lon, error_code, config).await),
        Command::CheckTemplate { path, page } => {
            let markup = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read template {}", path.display()))?;

            match Ports::check(&markup, page, &config.map.container) {
                Ok(ports) => {
                    println!(
                        "{} provides all {:?} page elements ({} validated forms)",
                        path.display(),
                        ports.page,
                        ports.validated_forms
                    );
                    Ok(true)
                }
                Err(err) => {
                    println!("{}", err);
                    Ok(false)
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = CliArgs::parse();
    match load_config(&args) {
        Ok(config) => init_config(config),
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    }

    let config = get_config();
    rust_i18n::set_locale(&config.general.language);
    log::debug!("Using locale {}", config.general.language);

    match run(args.command, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
