mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::CordExplorerApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(&DashboardConfig::resolve_path());
    log::info!("Reading articles from {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CORD-19 Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(CordExplorerApp::new(config)))),
    )
}
