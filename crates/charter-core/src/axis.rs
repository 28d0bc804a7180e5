// File: crates/charter-core/src/axis.rs
// Summary: Axis ranges (linear, time, category), tick generation and axis decoration primitives.

use crate::figure::{estimate_text_width, Primitive, TextAlign};
use crate::geometry::RectF;
use crate::scale::PlotScale;
use crate::series::XValue;
use crate::theme::{with_alpha, Theme};

/// Fraction of the data span added on each side of a fitted axis.
pub const DATA_MARGIN: f64 = 0.05;

#[derive(Clone, Debug, PartialEq)]
pub enum AxisKind {
    Linear,
    /// Values are epoch seconds; labels use a chrono strftime pattern.
    Time { format: String },
    /// Value `i` is the i-th label.
    Category(Vec<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub kind: AxisKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

impl Axis {
    pub fn linear(min: f64, max: f64) -> Self {
        Self { min, max, kind: AxisKind::Linear }
    }

    /// Linear axis covering every finite value plus [`DATA_MARGIN`].
    pub fn fit<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let (min, max) = extent(values);
        Self::linear(min, max)
    }

    pub fn fit_time<I: IntoIterator<Item = f64>>(values: I, format: &str) -> Self {
        let (min, max) = extent(values);
        Self { min, max, kind: AxisKind::Time { format: format.to_string() } }
    }

    pub fn category(labels: Vec<String>) -> Self {
        let n = labels.len().max(1) as f64;
        Self { min: -0.5, max: n - 0.5, kind: AxisKind::Category(labels) }
    }

    /// Extend the range so `v` is visible without a margin past it (bar baselines).
    pub fn with_baseline(mut self, v: f64) -> Self {
        if v < self.min { self.min = v; }
        if v > self.max { self.max = v; }
        self
    }

    pub fn span(&self) -> f64 { self.max - self.min }

    /// At most `max_ticks` (roughly) ticks inside the range.
    pub fn ticks(&self, max_ticks: usize) -> Vec<Tick> {
        let max_ticks = max_ticks.max(2);
        match &self.kind {
            AxisKind::Linear => {
                let step = nice_step(self.span(), max_ticks);
                let decimals = decimals_for(step);
                tick_values(self.min, self.max, step)
                    .into_iter()
                    .map(|v| Tick { value: v, label: format!("{v:.decimals$}") })
                    .collect()
            }
            AxisKind::Time { format } => {
                let step = time_step(self.span(), max_ticks);
                tick_values(self.min, self.max, step)
                    .into_iter()
                    .filter_map(|v| match XValue::from_epoch_seconds(v)? {
                        XValue::Time(t) => Some(Tick { value: v, label: t.format(format).to_string() }),
                        XValue::Num(_) => None,
                    })
                    .collect()
            }
            AxisKind::Category(labels) => {
                let stride = labels.len().div_ceil(max_ticks).max(1);
                labels
                    .iter()
                    .enumerate()
                    .step_by(stride)
                    .map(|(i, l)| Tick { value: i as f64, label: l.clone() })
                    .collect()
            }
        }
    }
}

fn extent<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() { return (0.0, 1.0); }
    if (hi - lo).abs() < 1e-9 {
        let half = if lo.abs() > 1e-9 { lo.abs() * DATA_MARGIN } else { 0.5 };
        return (lo - half, hi + half);
    }
    let m = (hi - lo) * DATA_MARGIN;
    (lo - m, hi + m)
}

/// 1, 2, 2.5 or 5 times a power of ten.
pub fn nice_step(span: f64, max_ticks: usize) -> f64 {
    let raw = (span.abs() / max_ticks.max(1) as f64).max(1e-12);
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 { 1.0 } else if norm <= 2.0 { 2.0 } else if norm <= 2.5 { 2.5 } else if norm <= 5.0 { 5.0 } else { 10.0 };
    nice * mag
}

fn decimals_for(step: f64) -> usize {
    let mut d = (-step.log10().floor()).max(0.0) as usize;
    // 2.5 x 10^k needs one more digit than its magnitude suggests.
    let scaled = step * 10f64.powi(d as i32);
    if (scaled - scaled.round()).abs() > 1e-9 { d += 1; }
    d.min(12)
}

fn tick_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !min.is_finite() || !max.is_finite() { return Vec::new(); }
    let first = (min / step).ceil();
    let mut out = Vec::new();
    let mut k = first;
    while k * step <= max + step * 1e-9 && out.len() < 1000 {
        let v = k * step;
        out.push(if v.abs() < step * 1e-9 { 0.0 } else { v });
        k += 1.0;
    }
    out
}

const TIME_STEPS: [f64; 24] = [
    1.0, 2.0, 5.0, 10.0, 15.0, 30.0,
    60.0, 120.0, 300.0, 600.0, 900.0, 1800.0,
    3600.0, 7200.0, 10_800.0, 21_600.0, 43_200.0,
    86_400.0, 172_800.0, 604_800.0, 1_209_600.0,
    2_592_000.0, 7_776_000.0, 15_552_000.0,
];
const YEAR: f64 = 31_536_000.0;

fn time_step(span: f64, max_ticks: usize) -> f64 {
    TIME_STEPS
        .iter()
        .copied()
        .find(|s| span / s <= max_ticks as f64)
        .unwrap_or_else(|| nice_step(span / YEAR, max_ticks).max(1.0) * YEAR)
}

/// Widest tick label in pixels.
pub fn widest_label(ticks: &[Tick], font_px: f32) -> f32 {
    ticks.iter().map(|t| estimate_text_width(&t.label, font_px)).fold(0.0, f32::max)
}

/// Grid, spines and tick labels for one plot rectangle.
pub fn draw_axes(
    plot: &RectF,
    scale: &PlotScale,
    x_ticks: &[Tick],
    y_ticks: &[Tick],
    theme: &Theme,
    px_per_pt: f32,
    show_grid: bool,
) -> Vec<Primitive> {
    let mut out = Vec::new();
    let tick_px = theme.tick_font_size * px_per_pt;
    if show_grid {
        let color = with_alpha(theme.grid, theme.grid_alpha);
        let width = 0.8 * px_per_pt;
        let dash = theme.grid_dashed.then(|| vec![4.0 * px_per_pt, 3.0 * px_per_pt]);
        for t in x_ticks {
            let x = scale.x.to_px(t.value);
            out.push(Primitive::Line { from: (x, plot.top), to: (x, plot.bottom), color, width, dash: dash.clone() });
        }
        for t in y_ticks {
            let y = scale.y.to_px(t.value);
            out.push(Primitive::Line { from: (plot.left, y), to: (plot.right, y), color, width, dash: dash.clone() });
        }
    }

    let spine = 1.0 * px_per_pt;
    let (l, t, r, b) = (plot.left, plot.top, plot.right, plot.bottom);
    out.push(Primitive::Line { from: (l, b), to: (r, b), color: theme.axis_line, width: spine, dash: None });
    out.push(Primitive::Line { from: (l, t), to: (l, b), color: theme.axis_line, width: spine, dash: None });
    if theme.spine_visible {
        out.push(Primitive::Line { from: (l, t), to: (r, t), color: theme.axis_line, width: spine, dash: None });
        out.push(Primitive::Line { from: (r, t), to: (r, b), color: theme.axis_line, width: spine, dash: None });
    }

    let tick_len = 3.5 * px_per_pt;
    for tk in x_ticks {
        let x = scale.x.to_px(tk.value);
        out.push(Primitive::Line { from: (x, b), to: (x, b + tick_len), color: theme.axis_line, width: spine, dash: None });
        out.push(Primitive::Text {
            text: tk.label.clone(),
            x,
            y: b + tick_len + tick_px * 1.1,
            size: tick_px,
            color: theme.text,
            align: TextAlign::Center,
            rotated: false,
        });
    }
    for tk in y_ticks {
        let y = scale.y.to_px(tk.value);
        out.push(Primitive::Line { from: (l - tick_len, y), to: (l, y), color: theme.axis_line, width: spine, dash: None });
        out.push(Primitive::Text {
            text: tk.label.clone(),
            x: l - tick_len - tick_px * 0.4,
            y: y + tick_px * 0.35,
            size: tick_px,
            color: theme.text,
            align: TextAlign::Right,
            rotated: false,
        });
    }
    out
}
