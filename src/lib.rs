//! LiveGrid crate root: re-exports and module wiring.
//!
//! A grid of realtime line charts fed with synthetic, trading-like data at a
//! 1 ms virtual resolution. The pipeline is split into cohesive modules:
//! - `waveform`: random-walk traces rescaled into a price band, async pool generation
//! - `dataset`: immutable cyclic datasets and loop extension
//! - `fanout`: random assignment of series to datasets, grouped by dataset
//! - `scheduler`: per-frame streaming of due samples into every group
//! - `analytics`: rolling windows and percent-change labels
//! - `sink`, `chart`: command channel and the egui chart panel it feeds
//! - `dashboard`, `app`, `run`: the grid, the eframe app and its entry point

pub mod analytics;
pub mod app;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod fanout;
pub mod format;
pub mod run;
pub mod scheduler;
pub mod sink;
pub mod waveform;

// Public re-exports for a compact external API
pub use analytics::{AnalyticsSampler, ChangeSummary, RollingWindow, WindowPoint};
pub use config::{DashboardConfig, GridSize};
pub use dashboard::{Dashboard, StreamClock};
pub use dataset::{loop_extend, wrap_index, Dataset, DatasetId};
pub use error::{ConfigError, FanoutError, GenerationError, RunError, SinkError};
pub use fanout::{assign_groups, group_by_dataset, ConsumerGroup};
pub use run::run_dashboard;
pub use scheduler::{plan_tick, AppendMode, StreamScheduler, TickPlan, TickReport};
pub use sink::{
    channel_plot, LabelStyle, PlotCommand, PlotPoint, PlotSink, SeriesConsumer, SeriesHandle,
    Trace, TraceId,
};
pub use waveform::{generate_pool, TraceGenerator};
