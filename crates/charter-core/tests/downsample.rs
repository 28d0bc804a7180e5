// File: crates/charter-core/tests/downsample.rs
// Purpose: Point-selection algorithms: identity, anchors, exact sizes and extrema.

use charter_core::downsample::{lttb, lttb_indices, minmax_indices, stride_indices};

fn wave(n: usize) -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<f64> = (0..n).map(|i| (i as f64 * 0.05).sin() * 10.0 + (i % 7) as f64).collect();
    (x, y)
}

#[test]
fn short_inputs_are_returned_unchanged() {
    let (x, y) = wave(500);
    let all: Vec<usize> = (0..500).collect();
    assert_eq!(lttb_indices(&x, &y, 1000), all);
    assert_eq!(minmax_indices(&y, 1000), all);
    assert_eq!(stride_indices(500, 1000), all);
    assert_eq!(lttb_indices(&x, &y, 500), all);
}

#[test]
fn empty_and_zero_target_mean_no_reduction() {
    assert!(lttb_indices(&[], &[], 10).is_empty());
    assert!(minmax_indices(&[], 10).is_empty());
    assert!(stride_indices(0, 10).is_empty());

    let (x, y) = wave(50);
    assert_eq!(lttb_indices(&x, &y, 0).len(), 50);
    assert_eq!(minmax_indices(&y, 0).len(), 50);
    assert_eq!(stride_indices(50, 0).len(), 50);
}

#[test]
fn lttb_has_exact_length_and_anchors() {
    for &(n, t) in &[(10usize, 3usize), (101, 10), (1_000, 37), (5_000, 1_000), (12_345, 999)] {
        let (x, y) = wave(n);
        let idx = lttb_indices(&x, &y, t);
        assert_eq!(idx.len(), t, "n={n} t={t}");
        assert_eq!(idx[0], 0);
        assert_eq!(idx[t - 1], n - 1);
        assert!(idx.windows(2).all(|w| w[0] < w[1]), "indices must be increasing");
    }
}

#[test]
fn lttb_target_below_two_keeps_endpoints() {
    let (x, y) = wave(100);
    assert_eq!(lttb_indices(&x, &y, 1), vec![0, 99]);
    assert_eq!(lttb_indices(&x, &y, 2), vec![0, 99]);
}

#[test]
fn lttb_keeps_a_lone_spike() {
    let mut pts: Vec<(f64, f64)> = (0..1_000).map(|i| (i as f64, 0.0)).collect();
    pts[500].1 = 100.0;
    let out = lttb(&pts, 50);
    assert_eq!(out.len(), 50);
    assert!(out.contains(&(500.0, 100.0)));
}

#[test]
fn minmax_pairs_match_bucket_extrema() {
    let (_, y) = wave(100);
    let idx = minmax_indices(&y, 10);
    assert_eq!(idx.len(), 10);
    for (b, pair) in idx.chunks(2).enumerate() {
        let window = &y[b * 20..(b + 1) * 20];
        let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let got: Vec<f64> = pair.iter().map(|&i| y[i]).collect();
        assert!(got.contains(&lo) && got.contains(&hi), "bucket {b}: {got:?} vs ({lo}, {hi})");
        assert!(pair[0] <= pair[1], "earlier index first");
        assert!(pair.iter().all(|&i| i >= b * 20 && i < (b + 1) * 20));
    }
}

#[test]
fn minmax_length_is_twice_the_bucket_count() {
    let (_, y) = wave(10_000);
    for t in [2usize, 3, 10, 11, 500, 999] {
        assert_eq!(minmax_indices(&y, t).len(), 2 * (t / 2), "t={t}");
    }
}

#[test]
fn minmax_keeps_endpoints_of_monotonic_data() {
    let y: Vec<f64> = (0..1_000).map(|i| i as f64).collect();
    let idx = minmax_indices(&y, 20);
    assert_eq!(idx.first(), Some(&0));
    assert_eq!(idx.last(), Some(&999));
}

#[test]
fn stride_length_and_anchors() {
    for &(n, t) in &[(1_000usize, 7usize), (1_000, 10), (50_000, 1_000), (10_001, 5_000), (3, 2)] {
        let idx = stride_indices(n, t);
        assert!(idx.len() == t || idx.len() == t + 1, "n={n} t={t} got {}", idx.len());
        assert_eq!(idx[0], 0);
        assert_eq!(*idx.last().unwrap(), n - 1);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn selection_is_deterministic() {
    let (x, y) = wave(20_000);
    assert_eq!(lttb_indices(&x, &y, 700), lttb_indices(&x, &y, 700));
    assert_eq!(minmax_indices(&y, 700), minmax_indices(&y, 700));
    assert_eq!(stride_indices(20_000, 700), stride_indices(20_000, 700));
}

#[test]
fn minmax_skips_gaps_inside_a_bucket() {
    let mut y = vec![0.0f64; 200];
    y[0] = f64::NAN;
    y[5] = 100.0;
    y[7] = -50.0;
    let idx = minmax_indices(&y, 20);
    assert_eq!(idx.len(), 20);
    assert_eq!(&idx[0..2], &[5, 7]);
    assert!(idx.iter().all(|&i| y[i].is_finite()));
}

#[test]
fn minmax_drops_buckets_that_are_all_gap() {
    let mut y: Vec<f64> = (0..200).map(|i| i as f64).collect();
    for v in &mut y[20..40] {
        *v = f64::NAN;
    }
    let idx = minmax_indices(&y, 20);
    assert_eq!(idx.len(), 18);
    assert!(idx.iter().all(|&i| !(20..40).contains(&i)));
}

#[test]
fn lttb_ignores_gaps_when_picking_points() {
    let mut y = vec![0.0f64; 100];
    y[0] = f64::NAN;
    y[5] = 100.0;
    for k in (20..90).step_by(2) {
        y[k] = f64::NAN;
    }
    let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
    let idx = lttb_indices(&x, &y, 12);
    assert_eq!(idx.len(), 12);
    assert_eq!(idx[1], 5);
    assert!(idx[1..11].iter().all(|&i| y[i].is_finite()), "{idx:?}");
}
