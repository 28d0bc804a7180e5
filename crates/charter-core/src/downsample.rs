// File: crates/charter-core/src/downsample.rs
// Summary: Point-selection algorithms (Stride, MinMax, LTTB) returning the kept indices.
// Notes:
// - Every function returns indices into the input rather than copied points, so the
//   caller can apply one selection to several aligned sequences (e.g. bands).
// - A target of 0, or an input no longer than the target, selects everything.

/// Evenly spaced indices using a fractional stride of `len / threshold`.
/// First and last index are always kept; the result has `threshold` or
/// `threshold + 1` entries. Targets below 2 select everything.
pub fn stride_indices(len: usize, threshold: usize) -> Vec<usize> {
    if threshold < 2 || len <= threshold { return (0..len).collect(); }

    let step = len as f64 / threshold as f64;
    let mut out: Vec<usize> = (0..threshold).map(|i| (i as f64 * step) as usize).collect();
    if out.last() != Some(&(len - 1)) {
        out.push(len - 1);
    }
    out
}

/// Min/max bucketing: `threshold / 2` contiguous buckets, each contributing the
/// index of its minimum and its maximum y, earlier index first.
/// Output length is exactly `2 * (threshold / 2)` for finite data. Flat buckets emit
/// the same index twice. Non-finite samples are never selected, and a bucket holding
/// only gaps contributes nothing.
pub fn minmax_indices(y: &[f64], threshold: usize) -> Vec<usize> {
    let n = y.len();
    let n_buckets = threshold / 2;
    if n_buckets == 0 || n <= threshold { return (0..n).collect(); }

    let bucket_size = n as f64 / n_buckets as f64;
    let mut out = Vec::with_capacity(n_buckets * 2);
    for i in 0..n_buckets {
        let start = (i as f64 * bucket_size) as usize;
        // The last bucket always closes at n so float rounding never drops the tail.
        let end = if i + 1 == n_buckets { n } else { (((i + 1) as f64 * bucket_size) as usize).min(n) };
        if start >= end { continue; }

        let Some(first) = (start..end).find(|&k| y[k].is_finite()) else { continue };
        let (mut lo, mut hi) = (first, first);
        for k in (first + 1)..end {
            if !y[k].is_finite() { continue; }
            if y[k] < y[lo] { lo = k; }
            if y[k] > y[hi] { hi = k; }
        }
        if lo <= hi {
            out.push(lo);
            out.push(hi);
        } else {
            out.push(hi);
            out.push(lo);
        }
    }
    out
}

/// Largest-Triangle-Three-Buckets over numeric x (`x` is the linear projection of the
/// caller's coordinates). Returns exactly `max(threshold, 2)` indices when the input is
/// longer than `threshold`; first and last index are always present. Non-finite points
/// are skipped as candidates and as anchors, so gaps never win a bucket over real data.
pub fn lttb_indices(x: &[f64], y: &[f64], threshold: usize) -> Vec<usize> {
    let n = x.len().min(y.len());
    if threshold == 0 || n <= threshold { return (0..n).collect(); }
    let threshold = threshold.max(2);
    if threshold == 2 { return vec![0, n - 1]; }

    let bucket_size = (n - 2) as f64 / (threshold - 2) as f64;
    let mut sampled = Vec::with_capacity(threshold);
    sampled.push(0);

    // Last selected point with finite coordinates.
    let mut anchor = finite(x, y, 0).then(|| (x[0], y[0]));
    for i in 0..(threshold - 2) {
        let start = ((i as f64 * bucket_size) as usize + 1).min(n - 2);
        let end = ((i + 1) as f64 * bucket_size) as usize + 1;

        // Mean of the next bucket, inclusive of its end (clamped to the last point).
        let next_start = end.min(n - 1);
        let next_end = (((i + 2) as f64 * bucket_size) as usize + 1).min(n - 1).max(next_start);
        let mut avg_x = 0.0f64;
        let mut avg_y = 0.0f64;
        let mut count = 0.0f64;
        for k in next_start..=next_end {
            if !finite(x, y, k) { continue; }
            avg_x += x[k];
            avg_y += y[k];
            count += 1.0;
        }
        if count > 0.0 {
            avg_x /= count;
            avg_y /= count;
        }

        let mut max_area = -1.0f64;
        let mut max_idx = start;
        for k in start..end.min(n - 1) {
            if !finite(x, y, k) { continue; }
            let area = match (anchor, count > 0.0) {
                // Twice the triangle area, via the cross product.
                (Some((a_x, a_y)), true) => ((a_x - avg_x) * (y[k] - a_y) - (a_x - x[k]) * (avg_y - a_y)).abs(),
                (Some((_, a_y)), false) => (y[k] - a_y).abs(),
                (None, true) => (y[k] - avg_y).abs(),
                (None, false) => 0.0,
            };
            if area > max_area {
                max_area = area;
                max_idx = k;
            }
        }
        sampled.push(max_idx);
        if finite(x, y, max_idx) {
            anchor = Some((x[max_idx], y[max_idx]));
        }
    }

    sampled.push(n - 1);
    sampled
}

fn finite(x: &[f64], y: &[f64], k: usize) -> bool {
    x[k].is_finite() && y[k].is_finite()
}

/// LTTB over plain XY pairs; returns up to `threshold` points preserving overall shape.
pub fn lttb(points: &[(f64, f64)], threshold: usize) -> Vec<(f64, f64)> {
    let (x, y): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
    lttb_indices(&x, &y, threshold).into_iter().map(|i| points[i]).collect()
}
