mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::RetailDashApp;
use config::DashboardConfig;
use eframe::egui;

const TITLE: &str = "Retail Sales Analysis Dashboard";

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Starting with {config:?}");

    let dataset = match data::source::load(&config.data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("{:#}", anyhow::Error::from(e));
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(RetailDashApp::new(dataset, &config)))),
    )
}
