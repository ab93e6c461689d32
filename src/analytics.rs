//! Rolling visible-window analytics: percent change between the oldest and
//! newest sample each group has streamed within its history.

use std::collections::VecDeque;

use tracing::debug;

use crate::format::format_change;
use crate::scheduler::{StreamScheduler, TickReport};
use crate::sink::{LabelStyle, SeriesConsumer};

// ─────────────────────────────────────────────────────────────────────────────
// RollingWindow
// ─────────────────────────────────────────────────────────────────────────────

/// One streamed sample as seen by the analytics window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowPoint {
    pub x: i64,
    pub y: f64,
}

/// Bounded, chronological buffer of recently streamed samples.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    cap: usize,
    points: VecDeque<WindowPoint>,
}

impl RollingWindow {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            points: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: WindowPoint) {
        self.points.push_back(point);
        self.trim();
    }

    /// Append a contiguous batch whose first sample sits at index `first_x`.
    pub fn extend_batch(&mut self, first_x: i64, values: &[f64]) {
        // Only the newest `cap` values can survive; skip the rest up front.
        let skip = values.len().saturating_sub(self.cap);
        for (i, &y) in values.iter().enumerate().skip(skip) {
            self.points.push_back(WindowPoint {
                x: first_x + i as i64,
                y,
            });
        }
        self.trim();
    }

    /// Evict oldest entries until `len <= cap`.
    pub fn trim(&mut self) {
        while self.points.len() > self.cap {
            self.points.pop_front();
        }
    }

    pub fn first(&self) -> Option<&WindowPoint> {
        self.points.front()
    }

    pub fn last(&self) -> Option<&WindowPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowPoint> {
        self.points.iter()
    }

    /// Percent change from the first to the last point, or `None` if the
    /// window is empty or starts at zero.
    pub fn change(&self) -> Option<ChangeSummary> {
        let first = self.first()?.y;
        let last = self.last()?.y;
        ChangeSummary::between(first, last)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ChangeSummary
// ─────────────────────────────────────────────────────────────────────────────

/// Derived percent-change label for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSummary {
    pub change: f64,
    pub text: String,
    pub positive: bool,
}

impl ChangeSummary {
    pub fn between(first: f64, last: f64) -> Option<Self> {
        if first == 0.0 {
            return None;
        }
        let change = (last / first - 1.0) * 100.0;
        if !change.is_finite() {
            return None;
        }
        Some(Self {
            change,
            text: format_change(change),
            positive: last > first,
        })
    }

    pub fn style(&self) -> LabelStyle {
        if self.positive {
            LabelStyle::Positive
        } else {
            LabelStyle::Negative
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AnalyticsSampler
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-interval sampler holding one rolling window per consumer group.
pub struct AnalyticsSampler {
    interval_ms: f64,
    next_due_ms: Option<f64>,
    windows: Vec<RollingWindow>,
    stopped: bool,
}

impl AnalyticsSampler {
    pub fn new(group_count: usize, history_len: usize, interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms as f64,
            next_due_ms: None,
            windows: (0..group_count).map(|_| RollingWindow::new(history_len)).collect(),
            stopped: false,
        }
    }

    pub fn windows(&self) -> &[RollingWindow] {
        &self.windows
    }

    /// Feed the batches of one scheduler tick into the per-group windows.
    pub fn record(&mut self, report: &TickReport) {
        let Some(first_x) = report.first_x else {
            return;
        };
        for (window, batch) in self.windows.iter_mut().zip(&report.batches) {
            window.extend_batch(first_x, batch);
        }
    }

    /// `true` when a sample is due at `now_ms`. The first call only arms the timer.
    ///
    /// After a long stall the next deadline is re-anchored to `now_ms` rather
    /// than firing once per missed interval.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        if self.stopped {
            return false;
        }
        match self.next_due_ms {
            None => {
                self.next_due_ms = Some(now_ms + self.interval_ms);
                false
            }
            Some(due) if now_ms >= due => {
                let next = due + self.interval_ms;
                self.next_due_ms = Some(if next <= now_ms {
                    now_ms + self.interval_ms
                } else {
                    next
                });
                true
            }
            Some(_) => false,
        }
    }

    /// Trim every window and compute its summary. Empty windows yield `None`.
    pub fn summarize(&mut self) -> Vec<Option<ChangeSummary>> {
        self.windows
            .iter_mut()
            .map(|w| {
                w.trim();
                w.change()
            })
            .collect()
    }

    /// Compute summaries and push them as labels to every attached member.
    ///
    /// Returns the number of labels delivered.
    pub fn publish<C: SeriesConsumer>(&mut self, scheduler: &StreamScheduler<C>) -> usize {
        let mut delivered = 0;
        for (group, summary) in scheduler.groups().iter().zip(self.summarize()) {
            let Some(summary) = summary else {
                continue;
            };
            for member in &group.members {
                if scheduler.is_detached(member.id()) {
                    continue;
                }
                match member.set_label(&summary.text, Some(summary.style())) {
                    Ok(()) => delivered += 1,
                    Err(e) => debug!(error = %e, "label update skipped"),
                }
            }
        }
        delivered
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
