// File: crates/charter-core/src/charts/timeseries.rs
// Summary: Time series panels: date axis, optional range band and linear trend.
// Notes:
// - The band is projected through the main series' reduction so all three stay aligned.
// - The trend is fitted on the unreduced values and evaluated at the plotted dates.

use crate::axis::Axis;
use crate::error::Result;
use crate::figure::{Primitive, SeriesSummary};
use crate::legend::LegendGlyph;
use crate::panel::TimeSeriesData;
use crate::reduction::{markers_visible, reduce_and_report};
use crate::style::{LineDash, TimeSeriesStyle};
use crate::theme::with_alpha;
use crate::trend::{project_bands, Indicator, LinearTrend};

use super::{stroke_series, PanelRenderContext, StrokeOptions};

pub fn render(ctx: &mut PanelRenderContext<'_>, style: &TimeSeriesStyle, data: &TimeSeriesData) -> Result<()> {
    let series = data.to_series()?;
    let config = ctx.reduction_config(&style.reduction);
    config.validate()?;

    // Bands and trend belong to a single-series panel.
    let single = series.len() == 1;
    let bands = data.bands.as_ref().filter(|_| single && style.range_bands);

    let x_axis = Axis::fit_time(series.iter().flat_map(|s| s.numeric_x()), &style.date_format);
    let mut ys: Vec<f64> = series.iter().flat_map(|s| s.y().iter().copied()).collect();
    if let Some(b) = bands {
        ys.extend(b.upper.iter().chain(&b.lower).copied());
    }
    let mut y_axis = Axis::fit(ys);
    if style.fill_area { y_axis = y_axis.with_baseline(0.0); }
    let scale = ctx.axes(&x_axis, &y_axis, style.show_grid);

    let width = ctx.line_width();
    for (i, s) in series.iter().enumerate() {
        let result = reduce_and_report(s, &config);
        let color = ctx.theme.color(i);
        let rendered = result.series.len();
        let mut items = Vec::new();

        if let Some((upper, lower)) = bands.and_then(|b| project_bands(&result, &b.upper, &b.lower)) {
            let up: Vec<(f64, f64)> = upper.points().collect();
            let lo: Vec<(f64, f64)> = lower.points().collect();
            for (u, l) in band_runs(&up, &lo) {
                let mut poly: Vec<(f32, f32)> = u.iter().map(|&(x, y)| scale.map(x, y)).collect();
                poly.extend(l.iter().rev().map(|&(x, y)| scale.map(x, y)));
                items.push(Primitive::Polygon { points: poly, fill: with_alpha(color, style.band_alpha) });
            }
        }

        let markers = style.show_points && markers_visible(rendered, ctx.settings.marker_limit);
        let opts = StrokeOptions {
            width,
            dash: style.dash.intervals(width),
            fill_alpha: style.fill_area.then_some(style.fill_alpha),
            marker_radius: markers.then(|| ctx.pt(3.0)),
            ..StrokeOptions::default()
        };
        let points: Vec<(f64, f64)> = result.series.points().collect();
        items.extend(stroke_series(&points, &scale, color, &opts));

        let trend = if single && style.show_trend { LinearTrend.compute(s, &result.series) } else { None };
        let trend_glyph = trend.map(|t| {
            let tw = width * 0.75;
            let dash = LineDash::Dashed.intervals(tw);
            let tc = with_alpha(style.trend_color, 0.8);
            let pts: Vec<(f64, f64)> = t.points().collect();
            let trend_opts = StrokeOptions { width: tw, dash: dash.clone(), ..StrokeOptions::default() };
            items.extend(stroke_series(&pts, &scale, tc, &trend_opts));
            LegendGlyph::line(tc, tw, dash)
        });

        ctx.draw(items, result.rasterized);
        if let Some(label) = &s.label {
            ctx.legend_entry(label.clone(), LegendGlyph::line(color, width, opts.dash.clone()));
        }
        if let Some(glyph) = trend_glyph {
            ctx.legend_entry(LinearTrend.label(), glyph);
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

type Run = Vec<(f64, f64)>;

/// Runs of positions where both band edges are finite, as (upper, lower) pairs.
fn band_runs(upper: &[(f64, f64)], lower: &[(f64, f64)]) -> Vec<(Run, Run)> {
    let finite = |&(x, y): &(f64, f64)| x.is_finite() && y.is_finite();
    let mut runs = Vec::new();
    let (mut u, mut l) = (Vec::new(), Vec::new());
    for (a, b) in upper.iter().zip(lower) {
        if finite(a) && finite(b) {
            u.push(*a);
            l.push(*b);
        } else if !u.is_empty() {
            runs.push((std::mem::take(&mut u), std::mem::take(&mut l)));
        }
    }
    if !u.is_empty() { runs.push((u, l)); }
    runs
}
