// File: crates/charter-core/src/lib.rs
// Summary: Core library entry point; point reduction, dashboard composition and figure rendering.

pub mod error;
pub mod series;
pub mod downsample;
pub mod reduction;
pub mod trend;
pub mod settings;
pub mod theme;
pub mod style;
pub mod geometry;
pub mod grid;
pub mod axis;
pub mod scale;
pub mod figure;
pub mod legend;
pub mod layout;
pub mod panel;
pub mod charts;
pub mod dashboard;
pub mod chart;

pub use chart::Chart;
pub use dashboard::Composer;
pub use downsample::{lttb, lttb_indices, minmax_indices, stride_indices};
pub use error::{ChartError, Result};
pub use figure::{Primitive, RenderedFigure};
pub use layout::{LayoutSpec, LegendPosition};
pub use legend::{LegendEntry, LegendGlyph};
pub use panel::{BarData, Bands, LineData, LineX, NamedValues, PanelConfig, PanelData, PanelSpec, TimeSeriesData};
pub use reduction::{reduce, ReductionConfig, ReductionMethod, ReductionOptions, ReductionResult};
pub use series::{Series, XValue};
pub use settings::Settings;
pub use style::{ChartKind, Style, StyleRegistry};
pub use theme::Theme;
