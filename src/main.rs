mod ui;

use eframe::egui;
use indigram::AppConfig;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match AppConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{:#}; falling back to default settings", e);
            AppConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 950.0])
            .with_title("Indigram - Indian Social Network Visualization"),
        ..Default::default()
    };

    eframe::run_native(
        "Indigram",
        options,
        Box::new(move |cc| Ok(Box::new(ui::IndigramApp::new(cc, config)))),
    )
}
