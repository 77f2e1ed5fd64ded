mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use std::path::PathBuf;

use app::StudentAnalyzerApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional first argument: the data file to analyse.
    let config = AppConfig::from_env(std::env::args_os().nth(1).map(PathBuf::from));
    log::info!("Using data file {}", config.data_file.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_maximized(true),
        ..Default::default()
    };

    eframe::run_native(
        "Student Performance Analyzer",
        options,
        Box::new(|cc| Ok(Box::new(StudentAnalyzerApp::new(cc, config)))),
    )
}
