//! Startup configuration for the dashboard and its streaming pipeline.
//!
//! Values are resolved in three layers: built-in defaults, an optional JSON or
//! YAML file, and finally command-line overrides applied by the binary.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ─────────────────────────────────────────────────────────────────────────────
// GridSize – the two grid presets
// ─────────────────────────────────────────────────────────────────────────────

/// Preset grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSize {
    /// 3 × 3, fits on any screen.
    #[default]
    Compact,
    /// 10 × 10, needs a large monitor.
    Full,
}

impl GridSize {
    /// `(rows, columns)` for this preset.
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            GridSize::Compact => (3, 3),
            GridSize::Full => (10, 10),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DashboardConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration, read once at startup.
///
/// | Field                   | Purpose |
/// |-------------------------|---------|
/// | `rows`, `columns`       | Grid dimensions; one series per cell |
/// | `history_duration_ms`   | Visible history per chart, in 1 ms virtual units |
/// | `dataset_pool_size`     | Number of distinct generated waveforms |
/// | `initial_visible_count` | Samples back-filled on the first tick |
/// | `analytics_interval_ms` | Cadence of the percent-change labels |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub rows: usize,
    pub columns: usize,
    /// Length of the generated waveform and of every chart's history, in samples.
    pub history_duration_ms: usize,
    pub dataset_pool_size: usize,
    /// The virtual time cursor starts at minus this value.
    pub initial_visible_count: i64,
    pub analytics_interval_ms: u64,
    /// Maintain rolling windows and show percent-change labels.
    pub analytics: bool,
    /// Fixed seed for dataset generation and fan-out. `None` uses OS entropy.
    pub seed: Option<u64>,
    /// Native window title.
    pub title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let (rows, columns) = GridSize::Compact.dimensions();
        Self {
            rows,
            columns,
            history_duration_ms: 60 * 1000,
            dataset_pool_size: 10,
            initial_visible_count: 30 * 1000,
            analytics_interval_ms: 2000,
            analytics: true,
            seed: None,
            title: "LiveGrid".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Number of chart series in the grid.
    pub fn channel_count(&self) -> usize {
        self.rows * self.columns
    }

    pub fn with_grid(mut self, size: GridSize) -> Self {
        let (rows, columns) = size.dimensions();
        self.rows = rows;
        self.columns = columns;
        self
    }

    /// `true` when the grid has fewer channels than the full preset, so
    /// switching to it would show more.
    pub fn is_compact(&self) -> bool {
        let (rows, columns) = GridSize::Full.dimensions();
        self.channel_count() < rows * columns
    }

    /// Header text shown above the grid.
    pub fn headline(&self) -> String {
        let history = if self.history_duration_ms == 60 * 1000 {
            "1 minute".to_string()
        } else {
            format!("{:.1} s", self.history_duration_ms as f64 / 1000.0)
        };
        format!(
            "{} live channels (1 ms resolution) {} history",
            self.channel_count(),
            history
        )
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell (rows={}, columns={})",
                self.rows, self.columns
            )));
        }
        if self.history_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "history_duration_ms must be positive".to_string(),
            ));
        }
        if self.dataset_pool_size == 0 {
            return Err(ConfigError::Invalid(
                "dataset_pool_size must be at least 1".to_string(),
            ));
        }
        if self.initial_visible_count < 0 {
            return Err(ConfigError::Invalid(
                "initial_visible_count must not be negative".to_string(),
            ));
        }
        if self.analytics && self.analytics_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "analytics_interval_ms must be positive when analytics are enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON document. Missing fields keep their defaults.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a YAML document. Missing fields keep their defaults.
    pub fn from_yaml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load and validate a config file; the format is chosen by extension.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text, path)?,
            Some("yaml") | Some("yml") => Self::from_yaml(&text, path)?,
            _ => return Err(ConfigError::UnknownFormat(path.to_path_buf())),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
