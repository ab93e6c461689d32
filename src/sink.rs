//! Data source types and channels for feeding samples into chart panels.
//!
//! - First create a `Trace` on a `PlotSink`. The library assigns a numeric ID.
//! - Send batches of values (implicit, progressive X) or explicit `PlotPoint`s.
//! - Send a label to annotate the trace (used for the percent-change readout).
//!
//! The streaming pipeline does not talk to a sink directly; it goes through the
//! [`SeriesConsumer`] trait so that tests can record deliveries.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{Receiver, Sender};

use crate::error::SinkError;

/// Numeric identifier for a trace, assigned by the library when creating a `Trace`.
pub type TraceId = u32;

/// A single point on a plot: x is the virtual time index (ms), y is the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Declaration of a trace; returned to the caller after registration.
#[derive(Debug, Clone)]
pub struct Trace {
    pub id: TraceId,
    pub name: String,
}

/// Visual style selector for a trace label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    Positive,
    Negative,
}

/// Messages sent over the channel to drive a chart panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotCommand {
    /// Register a new trace with a numeric ID.
    RegisterTrace { id: TraceId, name: String },
    /// Append Y values; the panel continues X from its last sample in steps of 1.
    Samples { trace_id: TraceId, y_values: Vec<f64> },
    /// Append a chunk of points with explicit X.
    Points {
        trace_id: TraceId,
        points: Vec<PlotPoint>,
    },
    /// Replace the label text shown for the trace.
    SetLabel {
        trace_id: TraceId,
        text: String,
        style: Option<LabelStyle>,
    },
}

/// Convenience sender for feeding a chart panel.
#[derive(Clone)]
pub struct PlotSink {
    tx: Sender<PlotCommand>,
}

impl PlotSink {
    /// Create and register a new `Trace` with a unique numeric ID.
    pub fn create_trace<S: Into<String>>(&self, name: S) -> Trace {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let name = name.into();
        // Inform the panel about the new trace
        let _ = self.tx.send(PlotCommand::RegisterTrace {
            id,
            name: name.clone(),
        });
        Trace { id, name }
    }

    /// Send a batch of Y values for a given `Trace` (more efficient than point-by-point).
    pub fn send_values<I>(&self, trace: &Trace, y_values: I) -> Result<(), SinkError>
    where
        I: Into<Vec<f64>>,
    {
        self.send(
            trace.id,
            PlotCommand::Samples {
                trace_id: trace.id,
                y_values: y_values.into(),
            },
        )
    }

    /// Send a chunk of points for a given `Trace`.
    pub fn send_points<I>(&self, trace: &Trace, points: I) -> Result<(), SinkError>
    where
        I: Into<Vec<PlotPoint>>,
    {
        self.send(
            trace.id,
            PlotCommand::Points {
                trace_id: trace.id,
                points: points.into(),
            },
        )
    }

    /// Set the label text for a given `Trace`.
    pub fn set_label<S: Into<String>>(
        &self,
        trace: &Trace,
        text: S,
        style: Option<LabelStyle>,
    ) -> Result<(), SinkError> {
        self.send(
            trace.id,
            PlotCommand::SetLabel {
                trace_id: trace.id,
                text: text.into(),
                style,
            },
        )
    }

    fn send(&self, trace_id: TraceId, cmd: PlotCommand) -> Result<(), SinkError> {
        self.tx
            .send(cmd)
            .map_err(|_| SinkError::Disconnected { trace_id })
    }
}

/// Create a new channel pair for plotting: `(PlotSink, Receiver<PlotCommand>)`.
pub fn channel_plot() -> (PlotSink, Receiver<PlotCommand>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (PlotSink { tx }, rx)
}

// ─────────────────────────────────────────────────────────────────────────────
// SeriesConsumer – what the streaming pipeline needs from a display target
// ─────────────────────────────────────────────────────────────────────────────

/// A display target that receives appended samples and an optional label.
pub trait SeriesConsumer {
    fn id(&self) -> TraceId;

    /// Append a batch of values with implicit, progressive X.
    fn append_values(&self, values: &[f64]) -> Result<(), SinkError>;

    /// Append a batch of points with explicit X.
    fn append_points(&self, points: &[PlotPoint]) -> Result<(), SinkError>;

    fn set_label(&self, text: &str, style: Option<LabelStyle>) -> Result<(), SinkError>;
}

/// A registered trace together with the sink it was registered on.
#[derive(Clone)]
pub struct SeriesHandle {
    sink: PlotSink,
    trace: Trace,
}

impl SeriesHandle {
    pub fn new<S: Into<String>>(sink: PlotSink, name: S) -> Self {
        let trace = sink.create_trace(name);
        Self { sink, trace }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }
}

impl SeriesConsumer for SeriesHandle {
    fn id(&self) -> TraceId {
        self.trace.id
    }

    fn append_values(&self, values: &[f64]) -> Result<(), SinkError> {
        self.sink.send_values(&self.trace, values)
    }

    fn append_points(&self, points: &[PlotPoint]) -> Result<(), SinkError> {
        self.sink.send_points(&self.trace, points)
    }

    fn set_label(&self, text: &str, style: Option<LabelStyle>) -> Result<(), SinkError> {
        self.sink.set_label(&self.trace, text, style)
    }
}
