// File: crates/charter-core/src/style.rs
// Summary: Chart kinds, per-kind style records and the read-only style registry.

use std::fmt;
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use indexmap::IndexMap;
use skia_safe as skia;

use crate::error::{ChartError, Result};
use crate::reduction::{ReductionMethod, ReductionOptions};
use crate::theme::rgb;

/// Chart kinds a panel can render. Closed set; parsing anything else is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    TimeSeries,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::TimeSeries];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::TimeSeries => "timeseries",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        ChartKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| ChartError::UnknownChartKind(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl LineDash {
    /// On/off intervals in pixels, scaled by line width; `None` for solid.
    pub fn intervals(&self, width: f32) -> Option<Vec<f32>> {
        let w = width.max(1.0);
        match self {
            LineDash::Solid => None,
            LineDash::Dashed => Some(vec![3.7 * w, 1.6 * w]),
            LineDash::Dotted => Some(vec![w, 1.65 * w]),
            LineDash::DashDot => Some(vec![6.4 * w, 1.6 * w, w, 1.6 * w]),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarStyle {
    pub name: String,
    pub orientation: Orientation,
    /// Several named series stack on one bar per category instead of sitting side by side.
    pub stacked: bool,
    /// Relative bar width in 0..=1 of a category slot.
    pub bar_width: f32,
    pub edge_color: Option<skia::Color>,
    pub edge_width: f32,
    pub show_values: bool,
    pub alpha: f32,
}

impl BarStyle {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            orientation: Orientation::Vertical,
            stacked: false,
            bar_width: 0.8,
            edge_color: None,
            edge_width: 0.5,
            show_values: false,
            alpha: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub name: String,
    pub smooth: bool,
    pub stepped: bool,
    pub fill_area: bool,
    pub fill_alpha: f32,
    pub show_points: bool,
    pub marker_size: f32,
    pub dash: LineDash,
    pub reduction: ReductionOptions,
}

impl LineStyle {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            smooth: false,
            stepped: false,
            fill_area: false,
            fill_alpha: 0.3,
            show_points: false,
            marker_size: 6.0,
            dash: LineDash::Solid,
            reduction: ReductionOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesStyle {
    pub name: String,
    /// chrono strftime pattern for tick labels.
    pub date_format: String,
    pub show_grid: bool,
    pub fill_area: bool,
    pub fill_alpha: f32,
    pub show_trend: bool,
    pub trend_color: skia::Color,
    pub range_bands: bool,
    pub band_alpha: f32,
    pub show_points: bool,
    pub dash: LineDash,
    pub reduction: ReductionOptions,
}

impl TimeSeriesStyle {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            date_format: "%Y-%m-%d".to_string(),
            show_grid: true,
            fill_area: false,
            fill_alpha: 0.2,
            show_trend: false,
            trend_color: rgb(0xFF6B6B),
            range_bands: false,
            band_alpha: 0.15,
            show_points: false,
            dash: LineDash::Solid,
            reduction: ReductionOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Style {
    Bar(BarStyle),
    Line(LineStyle),
    TimeSeries(TimeSeriesStyle),
}

impl Style {
    pub fn kind(&self) -> ChartKind {
        match self {
            Style::Bar(_) => ChartKind::Bar,
            Style::Line(_) => ChartKind::Line,
            Style::TimeSeries(_) => ChartKind::TimeSeries,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Style::Bar(s) => &s.name,
            Style::Line(s) => &s.name,
            Style::TimeSeries(s) => &s.name,
        }
    }

    pub fn reduction(&self) -> Option<&ReductionOptions> {
        match self {
            Style::Bar(_) => None,
            Style::Line(s) => Some(&s.reduction),
            Style::TimeSeries(s) => Some(&s.reduction),
        }
    }
}

fn bar_presets() -> Vec<BarStyle> {
    vec![
        BarStyle::named("default"),
        BarStyle { bar_width: 0.35, ..BarStyle::named("grouped") },
        BarStyle { stacked: true, ..BarStyle::named("stacked") },
        BarStyle { orientation: Orientation::Horizontal, ..BarStyle::named("horizontal") },
        BarStyle { edge_color: Some(rgb(0x333333)), edge_width: 1.0, ..BarStyle::named("outlined") },
        BarStyle { show_values: true, ..BarStyle::named("labeled") },
    ]
}

fn line_presets() -> Vec<LineStyle> {
    vec![
        LineStyle::named("default"),
        LineStyle { smooth: true, ..LineStyle::named("smooth") },
        LineStyle { stepped: true, ..LineStyle::named("stepped") },
        LineStyle { fill_area: true, ..LineStyle::named("area") },
        LineStyle { dash: LineDash::Dotted, show_points: true, ..LineStyle::named("dotted") },
        LineStyle { dash: LineDash::Dashed, ..LineStyle::named("dashed") },
        LineStyle { show_points: true, marker_size: 8.0, ..LineStyle::named("markers") },
    ]
}

fn timeseries_presets() -> Vec<TimeSeriesStyle> {
    vec![
        TimeSeriesStyle::named("default"),
        TimeSeriesStyle { fill_area: true, ..TimeSeriesStyle::named("area") },
        TimeSeriesStyle { show_trend: true, ..TimeSeriesStyle::named("trend") },
        TimeSeriesStyle { range_bands: true, ..TimeSeriesStyle::named("range") },
        TimeSeriesStyle { show_grid: false, ..TimeSeriesStyle::named("minimal") },
        TimeSeriesStyle {
            date_format: "%Y-%m-%d %H:%M".to_string(),
            reduction: ReductionOptions {
                auto_reduce: true,
                auto_rasterize: true,
                method: ReductionMethod::Lttb,
                ..ReductionOptions::default()
            },
            ..TimeSeriesStyle::named("large_dataset")
        },
    ]
}

/// Style lookup by `(kind, name)`. Built once, then shared read-only between renders.
#[derive(Clone, Debug)]
pub struct StyleRegistry {
    styles: IndexMap<ChartKind, IndexMap<String, Style>>,
}

impl Default for StyleRegistry {
    fn default() -> Self { Self::builtin() }
}

impl StyleRegistry {
    pub fn empty() -> Self {
        Self { styles: ChartKind::ALL.into_iter().map(|k| (k, IndexMap::new())).collect() }
    }

    /// Registry holding every built-in preset.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        let all = bar_presets().into_iter().map(Style::Bar)
            .chain(line_presets().into_iter().map(Style::Line))
            .chain(timeseries_presets().into_iter().map(Style::TimeSeries));
        for style in all {
            reg.insert(style);
        }
        reg
    }

    fn insert(&mut self, style: Style) {
        self.styles.entry(style.kind()).or_default().insert(style.name().to_ascii_lowercase(), style);
    }

    /// Add or replace a style. Rejects invalid reduction settings.
    pub fn register(&mut self, style: Style) -> Result<()> {
        if let Some(r) = style.reduction() {
            r.validate()?;
        }
        if let Style::TimeSeries(ts) = &style {
            // Tick labels are formatted with this pattern at render time.
            if StrftimeItems::new(&ts.date_format).any(|i| matches!(i, Item::Error)) {
                return Err(ChartError::InvalidStyle {
                    style: ts.name.clone(),
                    reason: format!("bad date format '{}'", ts.date_format),
                });
            }
        }
        self.insert(style);
        Ok(())
    }

    pub fn get(&self, kind: ChartKind, name: &str) -> Result<&Style> {
        let styles = self.styles.get(&kind);
        styles
            .and_then(|m| m.get(&name.trim().to_ascii_lowercase()))
            .ok_or_else(|| ChartError::UnknownStyle {
                kind: kind.to_string(),
                style: name.to_string(),
                available: styles.map(|m| m.keys().cloned().collect::<Vec<_>>().join(", ")).unwrap_or_default(),
            })
    }

    /// Style names registered for `kind`, in registration order.
    pub fn list(&self, kind: ChartKind) -> Vec<&str> {
        self.styles.get(&kind).map(|m| m.values().map(Style::name).collect()).unwrap_or_default()
    }
}
