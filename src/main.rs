//! Barber - hairstyle transfer CLI.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod dispatch;
mod error;
mod intake;
mod mode;
mod model;
mod output;
mod params;
mod ports;
mod prompt;

use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::TransferError;
use crate::intake::load_image;
use crate::mode::PrecisionMode;
use crate::model::{resolve_model, validate_model};
use crate::output::{resolve_output, save_image, OutputTarget};
use crate::params::validate_format;
use crate::ports::ImageRole;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // A missing .env is normal.
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,barber=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<(), TransferError> {
    if cli.list_modes {
        for mode in PrecisionMode::ALL {
            println!("{:<10} {}", mode.as_str(), mode.description());
        }
        return Ok(());
    }

    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(TransferError::Config)?;

    let model = resolve_model(cli.model.as_deref().unwrap_or(&config.defaults.model));
    validate_model(&model).map_err(TransferError::InvalidArgument)?;

    let format = cli.format.clone().unwrap_or_else(|| config.defaults.format.clone());
    validate_format(&format).map_err(TransferError::InvalidArgument)?;

    let mode = PrecisionMode::parse_lenient(cli.mode.as_deref().unwrap_or(&config.defaults.mode));
    tracing::debug!(%model, %mode, %format, config = %config_path.display(), "resolved settings");

    let (base_path, style_path) = cli.image_paths().map_err(TransferError::InvalidInput)?;
    let base = load_image(&base_path, ImageRole::Base)?;
    let style = load_image(&style_path, ImageRole::Style)?;

    // Live, recording or replaying
    let replay_path = std::env::var("BARBER_REPLAY").ok();
    let is_recording = std::env::var("BARBER_REC").is_ok_and(|v| v == "true" || v == "1");

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!(cassette = %cassette_path, "replaying");
        (ServiceContext::replaying(Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&config)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config)?, None)
    };

    let result = dispatch::dispatch(ctx.generator.as_ref(), &model, base, style, mode).await;

    // Release the recorder before finishing; failed calls are recorded too.
    drop(ctx);
    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    let image = result?;
    match resolve_output(cli.output.as_deref(), &base_path, mode, &format) {
        OutputTarget::DataUrl => println!("{}", image.to_data_url()),
        OutputTarget::File(path) => {
            save_image(&image, &format, &path)?;
            eprintln!("Saved: {}", path.display());
        }
    }

    Ok(())
}
