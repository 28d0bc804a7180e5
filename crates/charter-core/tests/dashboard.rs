// File: crates/charter-core/tests/dashboard.rs
// Purpose: Dashboard composition: shared legend merge, margins, validation errors, large panels.

use charter_core::figure::Primitive;
use charter_core::legend::GlyphShape;
use charter_core::panel::{BarData, LineData, LineX, NamedValues, PanelData, PanelSpec, TimeSeriesData};
use charter_core::style::{ChartKind, StyleRegistry};
use charter_core::{ChartError, Composer, LayoutSpec, LegendPosition, Settings, Theme};
use chrono::{Duration, TimeZone, Utc};

fn line(names: &[&str]) -> PanelSpec {
    let x = LineX::Numeric((0..20).map(|i| i as f64).collect());
    let series = names
        .iter()
        .enumerate()
        .map(|(k, n)| NamedValues::new(*n, (0..20).map(|i| (i as f64 * 0.3 + k as f64).sin()).collect()))
        .collect();
    PanelSpec::new(PanelData::Line(LineData { x, series }))
}

fn bar(names: &[&str]) -> PanelSpec {
    let labels = vec!["north".to_string(), "south".to_string(), "east".to_string()];
    let series = names.iter().map(|n| NamedValues::new(*n, vec![3.0, 5.0, 2.0])).collect();
    PanelSpec::new(PanelData::Bar(BarData { labels, series })).style("grouped")
}

fn layout(rows: usize, cols: usize) -> LayoutSpec {
    LayoutSpec { dpi: Some(72), ..LayoutSpec::grid_of(rows, cols) }
}

fn labels(fig: &charter_core::RenderedFigure) -> Vec<&str> {
    fig.legend.iter().map(|e| e.label.as_str()).collect()
}

#[test]
fn legend_entries_merge_first_glyph_wins() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let panels = vec![line(&["A"]).at(0, 0), line(&["B"]).at(0, 1), bar(&["A"]).at(0, 2)];
    let fig = Composer::new(&styles, &settings)
        .compose(&panels, &layout(1, 3), &Theme::default(), None)
        .unwrap();
    assert_eq!(labels(&fig), vec!["A", "B"]);
    assert!(matches!(fig.legend[0].glyph.shape, GlyphShape::Line { .. }));
    assert_eq!(fig.panels.len(), 3);
}

#[test]
fn legend_keeps_insertion_order_across_a_grid() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let panels = vec![
        line(&["latency"]).at(0, 0),
        bar(&["requests"]).at(0, 1),
        line(&["errors", "latency"]).at(1, 0),
        bar(&["saturation"]).at(1, 1),
    ];
    let spec = LayoutSpec { dpi: Some(72), ..LayoutSpec::preset("grid_2x2").unwrap() };
    let fig = Composer::new(&styles, &settings).compose(&panels, &spec, &Theme::default(), None).unwrap();
    assert_eq!(labels(&fig), vec!["latency", "requests", "errors", "saturation"]);
}

#[test]
fn validation_errors_stop_composition() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let composer = Composer::new(&styles, &settings);
    let theme = Theme::default();
    let spec = layout(1, 2);

    let err = composer.compose(&[line(&["a"]).style("nope")], &spec, &theme, None).unwrap_err();
    assert!(matches!(err, ChartError::UnknownStyle { .. }));
    assert!(err.to_string().contains("smooth"));

    let err = composer.compose(&[bar(&["a"]).style("default").kind(ChartKind::Line)], &spec, &theme, None).unwrap_err();
    assert!(matches!(err, ChartError::KindMismatch { index: 0, .. }));

    let err = composer.compose(&[line(&["a"]), line(&["b"]).at(0, 2)], &spec, &theme, None).unwrap_err();
    assert!(matches!(err, ChartError::PanelOutOfGrid { index: 1, col_end: 3, cols: 2, .. }));

    let short = PanelSpec::new(PanelData::Bar(BarData {
        labels: vec!["a".into(), "b".into()],
        series: vec![NamedValues::unnamed(vec![1.0])],
    }));
    let err = composer.compose(&[short], &spec, &theme, None).unwrap_err();
    assert!(matches!(err, ChartError::InvalidData(ref m) if m.starts_with("panel 0")));
}

#[test]
fn oversized_legend_falls_back_to_fixed_margins() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let long = "x".repeat(300);
    let spec = layout(1, 2).with_legend(LegendPosition::Right);
    let fig = Composer::new(&styles, &settings)
        .compose(&[line(&[long.as_str()])], &spec, &Theme::default(), None)
        .unwrap();
    assert!(fig.margin_fallback);
    let expected = 0.85 * fig.width as f32;
    assert!((fig.content_rect.right - expected).abs() < 1.0);
}

#[test]
fn automatic_margins_put_the_legend_above_the_panels() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let fig = Composer::new(&styles, &settings)
        .compose(&[line(&["a"]), line(&["b"]).at(0, 1)], &layout(1, 2), &Theme::default(), Some("Overview"))
        .unwrap();
    assert!(!fig.margin_fallback);
    let legend = fig.legend_rect.expect("legend drawn");
    assert!(legend.bottom <= fig.content_rect.top);
    assert!(fig.texts().contains(&"Overview"));
}

#[test]
fn legend_can_be_switched_off() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let fig = Composer::new(&styles, &settings)
        .compose(&[line(&["a"])], &layout(1, 2).without_legend(), &Theme::default(), None)
        .unwrap();
    assert!(fig.legend.is_empty());
    assert!(fig.legend_rect.is_none());
}

#[test]
fn overlapping_panels_are_allowed() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let panels = vec![line(&["a"]).span(1, 2), line(&["b"]).at(0, 1)];
    let fig = Composer::new(&styles, &settings).compose(&panels, &layout(1, 2), &Theme::default(), None);
    assert!(fig.is_ok());
}

#[test]
fn large_time_series_is_reduced_and_rasterized() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let dates: Vec<_> = (0..20_000).map(|i| start + Duration::minutes(i)).collect();
    let values: Vec<f64> = (0..20_000).map(|i| (i as f64 * 0.01).sin() * 40.0 + 100.0).collect();
    let panel = PanelSpec::new(PanelData::TimeSeries(TimeSeriesData {
        dates,
        series: vec![NamedValues::new("load", values)],
        bands: None,
    }))
    .style("large_dataset");
    let fig = Composer::new(&styles, &settings)
        .compose(&[panel], &layout(1, 1), &Theme::dark(), None)
        .unwrap();
    let s = &fig.panels[0].series[0];
    assert_eq!(s.original_len, 20_000);
    assert_eq!(s.rendered_len, 5_000);
    assert!(s.rasterized);
    assert!(fig.primitives.iter().any(|p| matches!(p, Primitive::Raster { .. })));
}

#[test]
fn concurrent_composition_is_deterministic() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let composer = Composer::new(&styles, &settings);
    let panels = vec![line(&["a", "b"]), bar(&["c"]).at(0, 1)];
    let spec = layout(1, 2);
    let expected = composer.compose(&panels, &spec, &Theme::default(), Some("T")).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| composer.compose(&panels, &spec, &Theme::default(), Some("T")).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn bottom_legend_sits_below_the_panels() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let spec = layout(1, 2).with_legend(LegendPosition::Bottom);
    let fig = Composer::new(&styles, &settings)
        .compose(&[line(&["a"]), line(&["b"]).at(0, 1)], &spec, &Theme::default(), Some("Overview"))
        .unwrap();
    assert!(!fig.margin_fallback);
    let legend = fig.legend_rect.expect("legend drawn");
    assert!(legend.top >= fig.content_rect.bottom);
    assert!(legend.bottom <= fig.height as f32);
}

#[test]
fn right_legend_sits_beside_the_panels() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let spec = layout(1, 2).with_legend(LegendPosition::Right);
    let fig = Composer::new(&styles, &settings)
        .compose(&[line(&["a"]), line(&["b"]).at(0, 1)], &spec, &Theme::default(), None)
        .unwrap();
    assert!(!fig.margin_fallback);
    let legend = fig.legend_rect.expect("legend drawn");
    assert!(legend.left >= fig.content_rect.right);
    assert!(legend.right <= fig.width as f32);
}

#[test]
fn named_bar_series_sit_side_by_side_unless_stacked() {
    fn bar_lefts(fig: &charter_core::RenderedFigure) -> Vec<f32> {
        fig.primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Clip { items, .. } => Some(items),
                _ => None,
            })
            .flatten()
            .filter_map(|p| match p {
                Primitive::Rect { rect, .. } => Some(rect.left),
                _ => None,
            })
            .collect()
    }
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let composer = Composer::new(&styles, &settings);

    let side = composer
        .compose(&[bar(&["a", "b"]).style("default")], &layout(1, 1), &Theme::default(), None)
        .unwrap();
    let mut lefts = bar_lefts(&side);
    assert_eq!(lefts.len(), 6);
    lefts.sort_by(f32::total_cmp);
    assert!(lefts.windows(2).all(|w| w[1] - w[0] > 1.0), "{lefts:?}");

    let stacked = composer
        .compose(&[bar(&["a", "b"]).style("stacked")], &layout(1, 1), &Theme::default(), None)
        .unwrap();
    let lefts = bar_lefts(&stacked);
    assert_eq!(lefts.len(), 6);
    assert!((lefts[0] - lefts[3]).abs() < 1e-3);
}

#[test]
fn trend_line_gets_its_own_legend_entry() {
    use charter_core::trend::{Indicator, LinearTrend};
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let panel = PanelSpec::new(PanelData::TimeSeries(TimeSeriesData {
        dates: (0..48).map(|i| start + Duration::hours(i)).collect(),
        series: vec![NamedValues::new("load", (0..48).map(|i| i as f64 * 0.5).collect())],
        bands: None,
    }))
    .style("trend");
    let fig = Composer::new(&styles, &settings)
        .compose(&[panel], &layout(1, 1), &Theme::default(), None)
        .unwrap();
    assert_eq!(labels(&fig), vec!["load", LinearTrend.label()]);
}
