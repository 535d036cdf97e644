mod app;
mod color;
mod config;
mod data;
mod state;
mod surface;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::SurfacePlotApp;
use config::PlotConfig;
use eframe::egui;
use state::AppState;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

/// With a config file argument the grid is built before any window opens,
/// so bad input never shows an empty viewer.
fn run() -> Result<()> {
    let state = match std::env::args_os().nth(1) {
        Some(arg) => AppState::from_config(&PlotConfig::load(&PathBuf::from(arg))?)?,
        None => AppState::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Surface – 3D CSV Plotter",
        options,
        Box::new(|_cc| Ok(Box::new(SurfacePlotApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
