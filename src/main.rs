//! Command-line entry point.
//!
//! Analyses each image argument in turn with the simulated engine, printing
//! notifications as they are raised and the result panel once the analysis
//! settles.
//!
//! # Flow per image
//!
//! ```text
//! load file -> Event::SelectImage -> Event::AnalyzeRequested -> settle -> render
//! ```
//!
//! A file that fails validation is reported and skipped; the run goes on with
//! the next one. Only configuration errors end the process with a non-zero
//! exit code.
//!
//! # Examples
//!
//! ```text
//! deepfake-detector portrait.jpg
//! deepfake-detector --latency-ms 200 --theme daylight a.png b.webp
//! deepfake-detector --config ./detector.toml --trace-export face.png
//! ```

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use deepfake_detector::app::{Controller, Event, Notification, Notifier};
use deepfake_detector::infrastructure::default_config_path;
use deepfake_detector::observability::{init_tracing, trace_file};
use deepfake_detector::source::load_upload;
use deepfake_detector::ui::{render, render_notification, Theme};
use deepfake_detector::{initialize, Config, DetectorError, Result, SimulatedEngine};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::Instrument;

#[derive(Parser, Debug)]
#[command(name = "deepfake-detector")]
#[command(about = "Analyse images for signs of AI manipulation")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML); defaults to the platform config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated engine latency in milliseconds
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Built-in theme (midnight, daylight)
    #[arg(long)]
    theme: Option<String>,

    /// Output width in columns
    #[arg(long, default_value_t = 80)]
    width: usize,

    /// Export spans to a JSON lines file in the data directory
    #[arg(long)]
    trace_export: bool,

    /// Image files to analyse
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

/// Prints notifications to stdout, one styled line each.
struct ConsoleNotifier {
    theme: Theme,
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: &Notification) {
        println!("{}", render_notification(notification, &self.theme));
    }
}

/// Merges the configuration file with command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                Config::load(&path)?
            } else {
                Config::default()
            }
        }
    };

    if let Some(latency_ms) = cli.latency_ms {
        config.simulated_latency_ms = latency_ms;
    }
    if let Some(theme) = &cli.theme {
        config.theme_name = Some(theme.clone());
        config.theme_file = None;
    }
    config.trace_export |= cli.trace_export;

    config.validate()?;
    Ok(config)
}

/// Loads, selects, analyses and renders one image file.
async fn analyze_path(
    controller: &mut Controller<ConsoleNotifier>,
    path: &Path,
    max_bytes: u64,
    width: usize,
) {
    let upload = match load_upload(path, max_bytes) {
        Ok(upload) => upload,
        Err(DetectorError::InvalidImage(reason)) => {
            controller
                .notifier_mut()
                .notify(&Notification::invalid_image(&reason));
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "cannot read image");
            eprintln!("deepfake-detector: {}: {e}", path.display());
            return;
        }
    };

    if !controller.dispatch(Event::SelectImage(upload)) {
        return;
    }

    println!("Analyzing {}...", path.display());
    controller.dispatch(Event::AnalyzeRequested);
    controller.settle().await;
    render(controller.session(), width);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("deepfake-detector: {e}");
            return ExitCode::from(2);
        }
    };

    init_tracing(&config);
    tracing::debug!(?config, "starting");

    let session = initialize(&config);
    let notifier = ConsoleNotifier {
        theme: session.theme.clone(),
    };
    let engine = Arc::new(SimulatedEngine::from_config(&config));
    let mut controller = Controller::new(session, engine, notifier);

    for path in &cli.images {
        let span = tracing::info_span!("image", path = %path.display());
        analyze_path(&mut controller, path, config.max_bytes, cli.width)
            .instrument(span)
            .await;
    }

    if config.trace_export {
        tracing::info!(path = %trace_file().display(), "spans exported");
    }

    ExitCode::SUCCESS
}
