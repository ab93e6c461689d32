//! Frame-driven streaming of dataset samples into consumer groups.
//!
//! [`plan_tick`] is the pure step: given the virtual time cursor and the
//! current time it works out which indices are due and reads them from every
//! dataset. [`StreamScheduler`] owns the cursor and the groups, applies a plan
//! and delivers one batch per group member. The caller drives it once per
//! display frame.

use std::collections::HashSet;

use tracing::warn;

use crate::dataset::Dataset;
use crate::fanout::ConsumerGroup;
use crate::sink::{PlotPoint, SeriesConsumer, TraceId};

#[cfg(feature = "tick_debug")]
macro_rules! tick_debug { ($($arg:tt)*) => { tracing::trace!($($arg)*); } }
#[cfg(not(feature = "tick_debug"))]
macro_rules! tick_debug { ($($arg:tt)*) => {}; }

// ─────────────────────────────────────────────────────────────────────────────
// Pure tick planning
// ─────────────────────────────────────────────────────────────────────────────

/// Result of planning one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickPlan {
    /// First emitted index, or `None` when nothing was due.
    pub first_x: Option<i64>,
    /// Cursor for the next tick (one past the last emitted index).
    pub next_x: i64,
    /// One batch per dataset, in input order. All batches have the same length.
    pub batches: Vec<Vec<f64>>,
}

impl TickPlan {
    /// Number of samples emitted per dataset.
    pub fn emitted(&self) -> usize {
        self.batches.first().map(Vec::len).unwrap_or(0)
    }

    /// Largest emitted index so far.
    pub fn last_x(&self) -> i64 {
        self.next_x - 1
    }
}

/// Plan the samples due at `t_now`.
///
/// Every integer index `x` with `cursor <= x < t_now` is emitted, read from each
/// dataset with wraparound. A large gap since the previous tick is back-filled
/// completely. A non-finite `t_now` emits nothing.
pub fn plan_tick<'a>(
    cursor: i64,
    t_now: f64,
    datasets: impl IntoIterator<Item = &'a Dataset>,
) -> TickPlan {
    let end = if t_now.is_finite() {
        (t_now.ceil() as i64).max(cursor)
    } else {
        cursor
    };
    let batches: Vec<Vec<f64>> = datasets
        .into_iter()
        .map(|ds| (cursor..end).map(|x| ds.sample_at(x)).collect())
        .collect();
    TickPlan {
        first_x: (end > cursor).then_some(cursor),
        next_x: end,
        batches,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StreamScheduler
// ─────────────────────────────────────────────────────────────────────────────

/// Shape of the batches delivered to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppendMode {
    /// Y values only; the consumer continues X on its own.
    #[default]
    Values,
    /// Explicit `(x, y)` points.
    Points,
}

/// What one call to [`StreamScheduler::tick`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub first_x: Option<i64>,
    pub last_x: i64,
    /// Samples emitted per group.
    pub emitted: usize,
    /// Successful batch deliveries across all members.
    pub delivered: usize,
    /// Consumers that failed this tick and are now detached.
    pub failed: Vec<TraceId>,
    /// The emitted batches, one per group.
    pub batches: Vec<Vec<f64>>,
}

/// Owns the virtual time cursor and the consumer groups.
pub struct StreamScheduler<C> {
    next_x: i64,
    groups: Vec<ConsumerGroup<C>>,
    mode: AppendMode,
    detached: HashSet<TraceId>,
    stopped: bool,
}

impl<C: SeriesConsumer> StreamScheduler<C> {
    /// The first tick back-fills from `-initial_visible_count`.
    pub fn new(groups: Vec<ConsumerGroup<C>>, initial_visible_count: i64, mode: AppendMode) -> Self {
        Self {
            next_x: -initial_visible_count,
            groups,
            mode,
            detached: HashSet::new(),
            stopped: false,
        }
    }

    pub fn groups(&self) -> &[ConsumerGroup<C>] {
        &self.groups
    }

    /// Largest index emitted so far.
    pub fn last_x(&self) -> i64 {
        self.next_x - 1
    }

    pub fn is_detached(&self, id: TraceId) -> bool {
        self.detached.contains(&id)
    }

    /// Stop streaming; later ticks do nothing.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Emit every index due before `t_now` and deliver one batch per member.
    ///
    /// A member whose delivery fails is detached: it is logged once and
    /// skipped from then on, while the other members keep streaming.
    pub fn tick(&mut self, t_now: f64) -> TickReport {
        if self.stopped {
            return TickReport {
                last_x: self.last_x(),
                ..Default::default()
            };
        }

        let plan = plan_tick(self.next_x, t_now, self.groups.iter().map(|g| &g.dataset));
        self.next_x = plan.next_x;

        let mut report = TickReport {
            first_x: plan.first_x,
            last_x: plan.last_x(),
            emitted: plan.emitted(),
            ..Default::default()
        };

        if let Some(first_x) = plan.first_x {
            tick_debug!(first_x, last_x = report.last_x, emitted = report.emitted, "tick");
            for (group, batch) in self.groups.iter().zip(&plan.batches) {
                let points: Vec<PlotPoint> = match self.mode {
                    AppendMode::Values => Vec::new(),
                    AppendMode::Points => batch
                        .iter()
                        .enumerate()
                        .map(|(i, &y)| PlotPoint {
                            x: (first_x + i as i64) as f64,
                            y,
                        })
                        .collect(),
                };
                for member in &group.members {
                    let id = member.id();
                    if self.detached.contains(&id) {
                        continue;
                    }
                    let res = match self.mode {
                        AppendMode::Values => member.append_values(batch),
                        AppendMode::Points => member.append_points(&points),
                    };
                    match res {
                        Ok(()) => report.delivered += 1,
                        Err(e) => {
                            warn!(trace_id = id, error = %e, "series detached, skipping it from now on");
                            self.detached.insert(id);
                            report.failed.push(id);
                        }
                    }
                }
            }
        }

        report.batches = plan.batches;
        report
    }
}
