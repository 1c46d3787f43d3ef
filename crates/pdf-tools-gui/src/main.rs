#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

mod app;
mod logger;
mod views;

fn main() -> anyhow::Result<()> {
    let logger = logger::AppLogger::new(500);
    logger.clone().init()?;

    // The worker and export tasks run here; the UI stays on the main thread
    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_title("PDF Composer")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Composer",
        options,
        Box::new(move |cc| Ok(Box::new(app::ComposerApp::new(cc, handle, logger)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
