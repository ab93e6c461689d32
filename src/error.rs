//! Error types shared across the streaming pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::sink::TraceId;

/// Failure while building the dataset pool. Any one of these aborts startup.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("dataset pool size must be at least 1")]
    EmptyPool,
    #[error("cannot generate a trace with zero samples")]
    EmptyTrace,
    #[error("generated trace {index} contains a non-finite value at sample {sample}")]
    NonFinite { index: usize, sample: usize },
    #[error("generator task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FanoutError {
    #[error("cannot assign consumers to an empty dataset pool")]
    NoDatasets,
}

/// Delivery to a single series failed, typically because its chart was torn down.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("series {trace_id} is disconnected")]
    Disconnected { trace_id: TraceId },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse YAML config {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported config file extension for {0:?} (expected .json, .yaml or .yml)")]
    UnknownFormat(PathBuf),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Anything that stops the dashboard from starting or running.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("dataset generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Fanout(#[from] FanoutError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("UI error: {0}")]
    Ui(String),
}
