//! One chart cell: drains its command channel into a bounded trace buffer and
//! renders it with `egui_plot`.

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use egui::Color32;
use egui_plot::{Line, Plot};

use crate::format::format_readout;
use crate::sink::{LabelStyle, PlotCommand, PlotPoint, TraceId};

const POSITIVE_COLOR: Color32 = Color32::from_rgb(80, 200, 120);
const NEGATIVE_COLOR: Color32 = Color32::from_rgb(230, 90, 80);

// ─────────────────────────────────────────────────────────────────────────────
// TraceBuffer
// ─────────────────────────────────────────────────────────────────────────────

/// Rolling `[x, y]` storage for one trace, X strictly increasing.
#[derive(Debug, Default)]
pub struct TraceBuffer {
    pub live: VecDeque<[f64; 2]>,
    /// X assigned to the next value-only sample.
    next_x: f64,
}

impl TraceBuffer {
    pub fn new(start_x: f64) -> Self {
        Self {
            live: VecDeque::new(),
            next_x: start_x,
        }
    }

    /// Append values at consecutive X positions.
    pub fn push_values(&mut self, values: &[f64]) {
        for &y in values {
            self.live.push_back([self.next_x, y]);
            self.next_x += 1.0;
        }
    }

    /// Append points with explicit X. Points not after the latest X are dropped.
    pub fn push_points(&mut self, points: &[PlotPoint]) {
        for p in points {
            if self.latest_x().is_some_and(|last| p.x <= last) {
                continue;
            }
            self.live.push_back([p.x, p.y]);
            self.next_x = p.x + 1.0;
        }
    }

    pub fn prune_by_points(&mut self, max_points: usize) {
        while self.live.len() > max_points {
            self.live.pop_front();
        }
    }

    pub fn latest_x(&self) -> Option<f64> {
        self.live.back().map(|p| p[0])
    }

    /// Sample closest to `x`, by binary search over the sorted X values.
    pub fn nearest(&self, x: f64) -> Option<[f64; 2]> {
        if self.live.is_empty() {
            return None;
        }
        let idx = self.live.partition_point(|p| p[0] < x);
        let candidates = [idx.checked_sub(1), Some(idx)];
        candidates
            .into_iter()
            .flatten()
            .filter_map(|i| self.live.get(i).copied())
            .min_by(|a, b| (a[0] - x).abs().total_cmp(&(b[0] - x).abs()))
    }
}

/// Reduce `points` to at most about `max_out` points, keeping the min and max of each bucket.
pub fn decimate_minmax(points: &VecDeque<[f64; 2]>, max_out: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_out || max_out < 2 {
        return points.iter().copied().collect();
    }
    let buckets = max_out / 2;
    let bucket_len = points.len().div_ceil(buckets);
    let mut out = Vec::with_capacity(buckets * 2);
    let mut start = 0;
    while start < points.len() {
        let end = (start + bucket_len).min(points.len());
        let (mut lo, mut hi) = (start, start);
        for i in start..end {
            if points[i][1] < points[lo][1] {
                lo = i;
            }
            if points[i][1] > points[hi][1] {
                hi = i;
            }
        }
        let (a, b) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        out.push(points[a]);
        if b != a {
            out.push(points[b]);
        }
        start = end;
    }
    out
}

/// Evenly spaced hue for series `index` out of `total`, as RGB.
pub fn auto_color(index: usize, total: usize) -> Color32 {
    let h = index as f64 / total.max(1) as f64;
    let [r, g, b] = hsv_to_rgb(h, 0.75, 0.95);
    Color32::from_rgb(r, g, b)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    // h in [0,1), s,v in [0,1]
    let h6 = (h.fract() * 6.0).max(0.0);
    let i = h6.floor() as i32;
    let f = h6 - (i as f64);
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    let (r, g, b) = match i.rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [
        (r.clamp(0.0, 1.0) * 255.0) as u8,
        (g.clamp(0.0, 1.0) * 255.0) as u8,
        (b.clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// ChartPanel
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLabel {
    pub text: String,
    pub style: Option<LabelStyle>,
}

/// A single-trace chart fed over a `PlotCommand` channel.
pub struct ChartPanel {
    rx: Receiver<PlotCommand>,
    trace_id: Option<TraceId>,
    name: String,
    pub buffer: TraceBuffer,
    pub label: Option<ChartLabel>,
    /// Maximum number of samples kept.
    pub max_points: usize,
    /// Visible X span, in virtual time units.
    pub time_window: f64,
    /// Maximum number of points handed to the line renderer.
    pub max_draw_points: usize,
    pub color: Color32,
}

impl ChartPanel {
    pub fn new(rx: Receiver<PlotCommand>, history: usize, start_x: f64, color: Color32) -> Self {
        Self {
            rx,
            trace_id: None,
            name: String::new(),
            buffer: TraceBuffer::new(start_x),
            label: None,
            max_points: history,
            time_window: history as f64,
            max_draw_points: 2_000,
            color,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    /// Apply every pending command. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut n = 0;
        while let Ok(cmd) = self.rx.try_recv() {
            self.apply(cmd);
            n += 1;
        }
        if n > 0 {
            self.buffer.prune_by_points(self.max_points);
        }
        n
    }

    fn apply(&mut self, cmd: PlotCommand) {
        match cmd {
            PlotCommand::RegisterTrace { id, name } => {
                self.trace_id = Some(id);
                self.name = name;
            }
            PlotCommand::Samples { trace_id, y_values } if self.owns(trace_id) => {
                self.buffer.push_values(&y_values);
            }
            PlotCommand::Points { trace_id, points } if self.owns(trace_id) => {
                self.buffer.push_points(&points);
            }
            PlotCommand::SetLabel {
                trace_id,
                text,
                style,
            } if self.owns(trace_id) => {
                self.label = Some(ChartLabel { text, style });
            }
            _ => {}
        }
    }

    fn owns(&self, trace_id: TraceId) -> bool {
        self.trace_id == Some(trace_id)
    }

    /// Render the label row and the plot into `ui`. `now_x` is the current virtual time.
    pub fn ui(&mut self, ui: &mut egui::Ui, plot_id: usize, now_x: f64) {
        ui.horizontal(|ui| {
            ui.small(&self.name);
            if let Some(label) = &self.label {
                let color = match label.style {
                    Some(LabelStyle::Positive) => POSITIVE_COLOR,
                    Some(LabelStyle::Negative) => NEGATIVE_COLOR,
                    None => ui.visuals().text_color(),
                };
                ui.colored_label(color, egui::RichText::new(&label.text).small().strong());
            }
        });

        let latest = self.buffer.latest_x().unwrap_or(now_x);
        let x_min = latest - self.time_window;
        let drawn = decimate_minmax(&self.buffer.live, self.max_draw_points);
        let (y_min, y_max) = drawn
            .iter()
            .filter(|p| p[0] >= x_min)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[1]), hi.max(p[1]))
            });

        let plot = Plot::new(("chart", plot_id))
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_boxed_zoom(false)
            .show_axes([false, false]);

        let name = self.name.clone();
        let color = self.color;
        let buffer = &self.buffer;
        let plot_resp = plot.show(ui, |plot_ui| {
            plot_ui.set_plot_bounds_x(x_min..=latest);
            if y_min.is_finite() && y_max.is_finite() {
                let space = ((y_max - y_min) * 0.05).max(1e-6);
                plot_ui.set_plot_bounds_y(y_min - space..=y_max + space);
            }
            plot_ui.line(Line::new(name.as_str(), drawn).color(color).width(1.0));

            plot_ui
                .pointer_coordinate()
                .and_then(|p| buffer.nearest(p.x))
                .map(|[x, y]| format_readout(&name, x, y, now_x))
        });

        if let Some(text) = plot_resp.inner {
            plot_resp.response.on_hover_text(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_continue_from_start_x() {
        let mut b = TraceBuffer::new(-3.0);
        b.push_values(&[1.0, 2.0]);
        b.push_values(&[3.0]);
        let xs: Vec<f64> = b.live.iter().map(|p| p[0]).collect();
        assert_eq!(xs, vec![-3.0, -2.0, -1.0]);
    }

    #[test]
    fn points_must_advance() {
        let mut b = TraceBuffer::new(0.0);
        b.push_points(&[PlotPoint { x: 5.0, y: 1.0 }, PlotPoint { x: 5.0, y: 2.0 }]);
        b.push_points(&[PlotPoint { x: 4.0, y: 3.0 }, PlotPoint { x: 6.0, y: 4.0 }]);
        assert_eq!(b.live, VecDeque::from(vec![[5.0, 1.0], [6.0, 4.0]]));
        b.push_values(&[9.0]);
        assert_eq!(b.latest_x(), Some(7.0));
    }

    #[test]
    fn nearest_picks_closest_sample() {
        let mut b = TraceBuffer::new(0.0);
        b.push_values(&[10.0, 11.0, 12.0]);
        assert_eq!(b.nearest(1.4), Some([1.0, 11.0]));
        assert_eq!(b.nearest(1.6), Some([2.0, 12.0]));
        assert_eq!(b.nearest(-50.0), Some([0.0, 10.0]));
        assert_eq!(b.nearest(50.0), Some([2.0, 12.0]));
        assert_eq!(TraceBuffer::default().nearest(0.0), None);
    }

    #[test]
    fn decimation_keeps_extremes() {
        let pts: VecDeque<[f64; 2]> = (0..1000)
            .map(|i| [i as f64, if i == 333 { 50.0 } else if i == 777 { -50.0 } else { 0.0 }])
            .collect();
        let out = decimate_minmax(&pts, 100);
        assert!(out.len() <= 100);
        assert!(out.contains(&[333.0, 50.0]));
        assert!(out.contains(&[777.0, -50.0]));
        assert!(out.windows(2).all(|w| w[0][0] < w[1][0]));
    }

    #[test]
    fn small_input_is_not_decimated() {
        let pts: VecDeque<[f64; 2]> = (0..10).map(|i| [i as f64, 1.0]).collect();
        assert_eq!(decimate_minmax(&pts, 100).len(), 10);
    }

    #[test]
    fn colors_differ_across_series() {
        assert_ne!(auto_color(0, 9), auto_color(4, 9));
    }
}
