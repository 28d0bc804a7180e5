// File: crates/charter-core/src/charts/line.rs
// Summary: Line panels over numeric or categorical x, with reduction applied per series.

use crate::axis::Axis;
use crate::error::Result;
use crate::figure::SeriesSummary;
use crate::legend::LegendGlyph;
use crate::panel::{LineData, LineX};
use crate::reduction::{markers_visible, reduce_and_report};
use crate::style::LineStyle;

use super::{stroke_series, PanelRenderContext, StrokeOptions};

pub fn render(ctx: &mut PanelRenderContext<'_>, style: &LineStyle, data: &LineData) -> Result<()> {
    let series = data.to_series()?;
    let config = ctx.reduction_config(&style.reduction);
    config.validate()?;

    let x_axis = match &data.x {
        LineX::Labels(labels) => Axis::category(labels.clone()),
        LineX::Numeric(x) => Axis::fit(x.iter().copied()),
    };
    let ys = series.iter().flat_map(|s| s.y().iter().copied());
    let mut y_axis = Axis::fit(ys);
    if style.fill_area { y_axis = y_axis.with_baseline(0.0); }
    let scale = ctx.axes(&x_axis, &y_axis, true);

    let width = ctx.line_width();
    for (i, s) in series.iter().enumerate() {
        let result = reduce_and_report(s, &config);
        let color = ctx.theme.color(i);
        let rendered = result.series.len();
        let markers = style.show_points && markers_visible(rendered, ctx.settings.marker_limit);
        let opts = StrokeOptions {
            width,
            dash: style.dash.intervals(width),
            smooth: style.smooth && rendered > 3,
            stepped: style.stepped,
            fill_alpha: style.fill_area.then_some(style.fill_alpha),
            marker_radius: markers.then(|| ctx.pt(style.marker_size) * 0.5),
        };
        let points: Vec<(f64, f64)> = result.series.points().collect();
        ctx.draw(stroke_series(&points, &scale, color, &opts), result.rasterized);

        if let Some(label) = &s.label {
            ctx.legend_entry(label.clone(), LegendGlyph::line(color, width, opts.dash.clone()));
        }
        ctx.record(SeriesSummary {
            label: s.label.clone(),
            original_len: result.original_len,
            rendered_len: rendered,
            rasterized: result.rasterized,
            markers,
        });
    }
    Ok(())
}
