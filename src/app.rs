//! The eframe application: header row plus the chart grid, driven once per frame.

use eframe::egui;
use tracing::{error, info};

use crate::config::GridSize;
use crate::dashboard::{Dashboard, StreamClock};

pub struct DashboardApp {
    dashboard: Dashboard,
    clock: StreamClock,
}

impl DashboardApp {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            clock: StreamClock::default(),
        }
    }

    fn switch_to_full_grid(&mut self) {
        let cfg = self.dashboard.config().clone().with_grid(GridSize::Full);
        match self.dashboard.rebuild(cfg) {
            Ok(next) => {
                info!(channels = next.config().channel_count(), "switched to full grid");
                self.dashboard = next;
                // the new scheduler back-fills from scratch
                self.clock = StreamClock::default();
            }
            Err(e) => error!(error = %e, "cannot rebuild dashboard"),
        }
    }

    fn header_ui(&mut self, ui: &mut egui::Ui) -> bool {
        let mut go_full = false;
        ui.vertical_centered(|ui| {
            ui.label(self.dashboard.config().headline());
            if self.dashboard.config().is_compact() {
                let text = format!(
                    "{} Click here to show full 10x10 dashboard",
                    egui_phosphor::regular::GRID_NINE
                );
                go_full = ui.button(text).clicked();
            }
        });
        go_full
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.dashboard.stop();
        }

        let now = self.clock.now_ms();
        self.dashboard.step(now);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if self.header_ui(ui) {
                self.switch_to_full_grid();
            }
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(0.0))
            .show(ctx, |ui| {
                self.dashboard.render_grid(ui, now);
            });

        // Stream on every display frame.
        if !self.dashboard.is_stopped() {
            ctx.request_repaint();
        }
    }
}

impl Drop for DashboardApp {
    fn drop(&mut self) {
        self.dashboard.stop();
    }
}
