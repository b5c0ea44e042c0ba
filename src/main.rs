mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::TallerReportApp;
use eframe::egui;

/// Read from the working directory when no path is given.
const DEFAULT_DATA_FILE: &str = "datos_taller.csv";

fn main() -> eframe::Result {
    env_logger::init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Análisis de taller exponenciales y logaritmos",
        options,
        Box::new(move |_cc| Ok(Box::new(TallerReportApp::new(&path)))),
    )
}
