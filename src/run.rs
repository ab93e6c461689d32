//! Top-level entry point for running the dashboard as a native window.
//!
//! [`run_dashboard`] generates the dataset pool on a tokio runtime, waits for
//! every generation to finish, and only then opens the window and starts
//! streaming. The call blocks until the window is closed.

use eframe::egui;
use tracing::{error, info};

use crate::app::DashboardApp;
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::dataset::Dataset;
use crate::error::RunError;
use crate::waveform::generate_pool;

/// Generate the dataset pool, blocking until all generations are done.
pub fn prepare_datasets(cfg: &DashboardConfig) -> Result<Vec<Dataset>, RunError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(RunError::Runtime)?;
    info!(
        pool = cfg.dataset_pool_size,
        samples = cfg.history_duration_ms,
        "generating datasets"
    );
    runtime.block_on(generate_pool(cfg)).map_err(|e| {
        error!(error = %e, "dataset generation failed, not starting");
        RunError::from(e)
    })
}

/// Launch the dashboard in a native window.
pub fn run_dashboard(cfg: DashboardConfig) -> Result<(), RunError> {
    cfg.validate()?;
    let datasets = prepare_datasets(&cfg)?;
    let dashboard = Dashboard::new(cfg.clone(), datasets)?;
    let app = DashboardApp::new(dashboard);

    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1400.0, 900.0)),
        ..Default::default()
    };

    eframe::run_native(
        &cfg.title,
        opts,
        Box::new(|cc| {
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| RunError::Ui(e.to_string()))
}
