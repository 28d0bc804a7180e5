// File: crates/charter-core/tests/grid.rs
// Purpose: Grid allocation with ratios, spacing and spans; layout presets.

use charter_core::geometry::RectF;
use charter_core::grid::GridSpec;
use charter_core::layout::{LayoutSpec, LegendPosition, LAYOUT_PRESETS};

fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-3 }

#[test]
fn ratios_split_the_width() {
    let g = GridSpec::new(1, 2).unwrap().with_width_ratios(&[2.0, 1.0]).unwrap();
    let bounds = RectF::from_ltwh(0.0, 0.0, 300.0, 100.0);
    let cols = g.column_edges(&bounds);
    assert!(close(cols[0].1 - cols[0].0, 200.0));
    assert!(close(cols[1].1 - cols[1].0, 100.0));
    assert!(close(cols[1].1, 300.0));
}

#[test]
fn spacing_is_a_fraction_of_the_average_cell() {
    let g = GridSpec::new(1, 2).unwrap().with_spacing(0.5, 0.0);
    let bounds = RectF::from_ltwh(0.0, 0.0, 250.0, 100.0);
    let cols = g.column_edges(&bounds);
    // 250 = 2 * cell + 0.5 * cell
    assert!(close(cols[0].1, 100.0));
    assert!(close(cols[1].0, 150.0));
    assert!(close(cols[1].1, 250.0));
}

#[test]
fn spans_cover_several_cells() {
    let g = GridSpec::new(2, 3).unwrap();
    let bounds = RectF::from_ltwh(0.0, 0.0, 300.0, 200.0);
    let r = g.span(&bounds, 0, 1, 2, 2);
    assert!(close(r.left, 100.0) && close(r.right, 300.0));
    assert!(close(r.top, 0.0) && close(r.bottom, 200.0));
}

#[test]
fn invalid_grids_are_rejected() {
    assert!(GridSpec::new(0, 2).is_err());
    assert!(GridSpec::new(1, 2).unwrap().with_width_ratios(&[1.0]).is_err());
    assert!(GridSpec::new(2, 1).unwrap().with_height_ratios(&[1.0, -1.0]).is_err());
}

#[test]
fn every_preset_builds_a_grid() {
    for name in LAYOUT_PRESETS {
        let spec = LayoutSpec::preset(name).unwrap();
        spec.validate().unwrap();
    }
    let tl = LayoutSpec::preset("traffic_latency").unwrap();
    assert_eq!(tl.width_ratios, Some(vec![2.5, 1.0]));
    assert_eq!(tl.legend_position, LegendPosition::Top);
    assert_eq!(LayoutSpec::preset("grid_2x2").unwrap().rows, 2);
}

#[test]
fn layout_reads_from_json() {
    let spec: LayoutSpec = serde_json::from_str(
        r#"{ "rows": 2, "cols": 1, "figsize": [12, 10], "legend_position": "right", "height_ratios": [1, 2] }"#,
    )
    .unwrap();
    assert_eq!(spec.rows, 2);
    assert_eq!(spec.figure_size, (12.0, 10.0));
    assert_eq!(spec.legend_position, LegendPosition::Right);
    assert!(spec.shared_legend);
    assert!(spec.grid().is_ok());
}
