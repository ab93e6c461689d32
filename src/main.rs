#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use livegrid::{run_dashboard, DashboardConfig, GridSize};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "livegrid")]
#[command(version = "0.1")]
#[command(about = "Many realtime charts streaming synthetic trading data at 1 ms resolution", long_about = None)]
struct Cli {
    /// Show the full 10x10 grid (needs a large monitor).
    #[arg(long)]
    full: bool,

    /// JSON or YAML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    rows: Option<usize>,

    #[arg(long)]
    columns: Option<usize>,

    /// Seed for dataset generation and series assignment.
    #[arg(long)]
    seed: Option<u64>,

    /// Disable rolling percent-change labels.
    #[arg(long)]
    no_analytics: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut cfg = match &self.config {
            Some(path) => DashboardConfig::load_from_path(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => DashboardConfig::default(),
        };
        if self.full {
            cfg = cfg.with_grid(GridSize::Full);
        }
        if let Some(rows) = self.rows {
            cfg.rows = rows;
        }
        if let Some(columns) = self.columns {
            cfg.columns = columns;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.no_analytics {
            cfg.analytics = false;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("livegrid=info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;
    run_dashboard(cfg)?;
    Ok(())
}
