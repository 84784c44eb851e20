//! Data Sweeper - CSV & Excel Cleaning, Conversion and Chart Viewer
//!
//! A Rust application for uploading tabular files, cleaning them, charting
//! numeric columns and converting between CSV and Excel.

mod charts;
mod config;
mod data;
mod export;
mod gui;

use config::{SweeperConfig, CONFIG_FILE};
use eframe::egui;
use gui::SweeperApp;
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> eframe::Result<()> {
    let (config, config_error) = match SweeperConfig::load(Path::new(CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => (SweeperConfig::default(), Some(e)),
    };

    init_logging(&config.log_level);
    if let Some(e) = config_error {
        warn!(error = %e, "Using default configuration");
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Data Sweeper"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Data Sweeper",
        options,
        Box::new(move |cc| Ok(Box::new(SweeperApp::new(cc, config)))),
    )
}
