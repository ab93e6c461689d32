//! Wiring of the streaming pipeline to a grid of chart panels.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::analytics::AnalyticsSampler;
use crate::chart::{auto_color, ChartPanel};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::error::FanoutError;
use crate::fanout::assign_groups;
use crate::scheduler::{AppendMode, StreamScheduler, TickReport};
use crate::sink::{channel_plot, SeriesHandle};

/// Wall clock expressed in virtual time units (milliseconds since start).
#[derive(Debug, Clone, Copy)]
pub struct StreamClock {
    start: Instant,
}

impl Default for StreamClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl StreamClock {
    pub fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// All chart panels plus the scheduler and analytics feeding them.
pub struct Dashboard {
    cfg: DashboardConfig,
    datasets: Vec<Dataset>,
    panels: Vec<ChartPanel>,
    scheduler: StreamScheduler<SeriesHandle>,
    analytics: Option<AnalyticsSampler>,
}

impl Dashboard {
    /// Create one chart per grid cell and fan the dataset pool out to them.
    pub fn new(cfg: DashboardConfig, datasets: Vec<Dataset>) -> Result<Self, FanoutError> {
        let mut rng = match cfg.seed {
            // distinct stream from the one used for generation
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(cfg, datasets, &mut rng)
    }

    pub fn with_rng(
        cfg: DashboardConfig,
        datasets: Vec<Dataset>,
        rng: &mut StdRng,
    ) -> Result<Self, FanoutError> {
        let total = cfg.channel_count();
        let history = cfg.history_duration_ms;
        let start_x = -cfg.initial_visible_count as f64;

        let mut panels = Vec::with_capacity(total);
        let mut handles = Vec::with_capacity(total);
        for i in 0..total {
            let (sink, rx) = channel_plot();
            handles.push(SeriesHandle::new(sink, format!("Channel {}", i + 1)));
            let mut panel = ChartPanel::new(rx, history, start_x, auto_color(i, total));
            // pick up the trace registration right away
            panel.drain();
            panels.push(panel);
        }

        let groups = assign_groups(handles, &datasets, rng)?;
        let group_count = groups.len();
        let mode = if cfg.analytics {
            AppendMode::Points
        } else {
            AppendMode::Values
        };
        let scheduler = StreamScheduler::new(groups, cfg.initial_visible_count, mode);
        let analytics = cfg
            .analytics
            .then(|| AnalyticsSampler::new(group_count, history, cfg.analytics_interval_ms));

        info!(
            channels = total,
            groups = group_count,
            datasets = datasets.len(),
            analytics = cfg.analytics,
            "dashboard ready"
        );

        Ok(Self {
            cfg,
            datasets,
            panels,
            scheduler,
            analytics,
        })
    }

    /// Build a new dashboard for `cfg` on the same dataset pool. The current one is stopped.
    pub fn rebuild(&mut self, cfg: DashboardConfig) -> Result<Self, FanoutError> {
        self.stop();
        Self::new(cfg, self.datasets.clone())
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.cfg
    }

    /// The generated pool this dashboard streams from.
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn panels(&self) -> &[ChartPanel] {
        &self.panels
    }

    pub fn scheduler(&self) -> &StreamScheduler<SeriesHandle> {
        &self.scheduler
    }

    pub fn analytics(&self) -> Option<&AnalyticsSampler> {
        self.analytics.as_ref()
    }

    /// One frame: stream due samples, sample analytics if due, then let every
    /// panel pick up what was sent to it.
    pub fn step(&mut self, now_ms: f64) -> TickReport {
        let report = self.scheduler.tick(now_ms);
        if let Some(analytics) = self.analytics.as_mut() {
            analytics.record(&report);
            if analytics.poll(now_ms) {
                analytics.publish(&self.scheduler);
            }
        }
        for panel in &mut self.panels {
            panel.drain();
        }
        report
    }

    /// Stop both the scheduler and the analytics timer.
    pub fn stop(&mut self) {
        if self.scheduler.is_stopped() {
            return;
        }
        self.scheduler.stop();
        if let Some(analytics) = self.analytics.as_mut() {
            analytics.stop();
        }
        info!(last_x = self.scheduler.last_x(), "streaming stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.scheduler.is_stopped()
    }

    /// Lay the panels out in a `rows × columns` grid filling `ui`.
    pub fn render_grid(&mut self, ui: &mut egui::Ui, now_x: f64) {
        let rows = self.cfg.rows;
        let cols = self.cfg.columns;

        // Claim the entire remaining area so the grid fills and resizes with the window.
        let avail = ui.available_size();
        let (grid_rect, _) = ui.allocate_exact_size(avail, egui::Sense::hover());

        let cell_w = (grid_rect.width() / cols as f32).floor().max(1.0);
        let cell_h = (grid_rect.height() / rows as f32).floor().max(1.0);

        for row in 0..rows {
            for col in 0..cols {
                let idx = row * cols + col;
                let Some(panel) = self.panels.get_mut(idx) else {
                    continue;
                };
                let x = (grid_rect.left() + col as f32 * cell_w).round();
                let y = (grid_rect.top() + row as f32 * cell_h).round();
                let cell_rect =
                    egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(cell_w, cell_h));
                let mut child_ui =
                    ui.new_child(egui::UiBuilder::new().id_salt(idx).max_rect(cell_rect));
                panel.ui(&mut child_ui, idx, now_x);
            }
        }
    }
}
