// File: crates/charter-core/tests/reduction.rs
// Purpose: Reduction policy: trigger rules, hard cap, rasterize independence, markers.

use charter_core::reduction::{markers_visible, reduce, ReductionConfig, ReductionMethod, ReductionOptions};
use charter_core::series::{Series, XValue};
use charter_core::settings::Settings;
use chrono::{TimeZone, Utc};

fn series(n: usize) -> Series {
    let pts: Vec<(f64, f64)> = (0..n).map(|i| (i as f64, (i as f64 * 0.01).sin() * 5.0 + i as f64 * 1e-4)).collect();
    Series::from_xy(&pts).with_label("s")
}

fn config(threshold: usize, hard_cap: usize) -> ReductionConfig {
    ReductionConfig { threshold: Some(threshold), hard_cap, ..ReductionConfig::default() }
}

#[test]
fn fifty_thousand_points_reduce_to_threshold() {
    let s = series(50_000);
    let r = reduce(&s, &config(1_000, 5_000));
    assert_eq!(r.series.len(), 1_000);
    assert_eq!(r.series.x()[0], s.x()[0]);
    assert_eq!(r.series.y()[0], s.y()[0]);
    assert_eq!(r.series.x()[999], s.x()[49_999]);
    assert_eq!(r.series.y()[999], s.y()[49_999]);
    assert_eq!(r.original_len, 50_000);
    assert!(r.reduced());
    assert_eq!(r.series.label.as_deref(), Some("s"));
}

#[test]
fn short_series_is_returned_unchanged() {
    let s = series(500);
    let r = reduce(&s, &config(1_000, 5_000));
    assert_eq!(r.series, s);
    assert!(!r.reduced());
}

#[test]
fn hard_cap_bounds_the_target() {
    let r = reduce(&series(20_000), &config(8_000, 5_000));
    assert_eq!(r.series.len(), 5_000);
}

#[test]
fn reduction_needs_auto_reduce_and_a_threshold() {
    let s = series(20_000);
    let off = ReductionConfig { auto_reduce: false, ..config(1_000, 5_000) };
    assert_eq!(reduce(&s, &off).series.len(), 20_000);
    let unset = ReductionConfig { threshold: None, ..config(1_000, 5_000) };
    assert_eq!(reduce(&s, &unset).series.len(), 20_000);
    let zero = ReductionConfig { threshold: Some(0), ..config(1_000, 5_000) };
    assert_eq!(reduce(&s, &zero).series.len(), 20_000);
}

#[test]
fn tiny_series_are_never_reduced() {
    let cfg = config(1, 1);
    assert_eq!(reduce(&series(0), &cfg).series.len(), 0);
    assert_eq!(reduce(&series(1), &cfg).series.len(), 1);
}

#[test]
fn rasterize_uses_original_length_independently() {
    let s = series(20_000);
    let both = ReductionConfig { rasterize_trigger: 10_000, ..config(1_000, 5_000) };
    let r = reduce(&s, &both);
    assert!(r.reduced() && r.rasterized);

    let raster_only = ReductionConfig { auto_reduce: false, ..both.clone() };
    let r = reduce(&s, &raster_only);
    assert!(!r.reduced() && r.rasterized);

    let reduce_only = ReductionConfig { auto_rasterize: false, ..both.clone() };
    let r = reduce(&s, &reduce_only);
    assert!(r.reduced() && !r.rasterized);

    let forced = ReductionConfig { force_rasterize: true, auto_rasterize: false, ..both };
    let r = reduce(&series(10), &forced);
    assert!(!r.reduced() && r.rasterized);
}

#[test]
fn large_dataset_is_flagged() {
    let cfg = ReductionConfig { large_dataset_warning: 1_000, ..config(100, 5_000) };
    assert!(reduce(&series(2_000), &cfg).large_dataset);
    assert!(!reduce(&series(900), &cfg).large_dataset);
}

#[test]
fn methods_select_by_config() {
    let s = series(10_000);
    let minmax = ReductionConfig { method: ReductionMethod::MinMax, ..config(101, 5_000) };
    assert_eq!(reduce(&s, &minmax).series.len(), 100);
    let stride = ReductionConfig { method: ReductionMethod::Stride, ..config(100, 5_000) };
    let n = reduce(&s, &stride).series.len();
    assert!(n == 100 || n == 101);
}

#[test]
fn reduction_is_deterministic() {
    let s = series(30_000);
    let cfg = config(777, 5_000);
    assert_eq!(reduce(&s, &cfg), reduce(&s, &cfg));
}

#[test]
fn time_x_keeps_its_representation() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let times: Vec<_> = (0..5_000).map(|i| start + chrono::Duration::minutes(i)).collect();
    let y: Vec<f64> = (0..5_000).map(|i| (i as f64 * 0.1).cos()).collect();
    let s = Series::from_times(times.clone(), y).unwrap();
    let r = reduce(&s, &config(200, 5_000));
    assert_eq!(r.series.len(), 200);
    assert!(r.series.x().iter().all(XValue::is_time));
    assert_eq!(r.series.x()[0], XValue::Time(times[0]));
    assert_eq!(r.series.x()[199], XValue::Time(times[4_999]));
}

#[test]
fn options_resolve_against_settings() {
    let settings = Settings { downsample_threshold: 1_234, max_points: 4_321, rasterize_threshold: 99, ..Settings::default() };
    let cfg = ReductionOptions::default().resolve(&settings);
    assert_eq!(cfg.threshold, Some(1_234));
    assert_eq!(cfg.hard_cap, 4_321);
    assert_eq!(cfg.rasterize_trigger, 99);

    let own = ReductionOptions { threshold: Some(50), ..ReductionOptions::default() }.resolve(&settings);
    assert_eq!(own.threshold, Some(50));
}

#[test]
fn explicit_zero_threshold_is_a_config_error() {
    let opts = ReductionOptions { threshold: Some(0), ..ReductionOptions::default() };
    assert!(opts.validate().is_err());
    assert!(ReductionOptions { auto_reduce: false, ..opts }.validate().is_ok());
    assert!(ReductionConfig { hard_cap: 0, ..ReductionConfig::default() }.validate().is_err());
    assert!(ReductionConfig::default().validate().is_ok());
}

#[test]
fn markers_drop_at_the_limit() {
    assert!(markers_visible(9_999, 10_000));
    assert!(!markers_visible(10_000, 10_000));
    assert!(markers_visible(1_000_000, 0));
}
