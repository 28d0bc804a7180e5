// File: crates/charter-core/src/trend.rs
// Summary: Auxiliary series derived from the unreduced data (trend fit, band projection).

use crate::reduction::ReductionResult;
use crate::series::Series;

/// Indicator fits on the full input and evaluates at the x positions actually plotted.
pub trait Indicator {
    /// Label of the computed series and of its legend entry.
    fn label(&self) -> &'static str;
    fn compute(&self, original: &Series, plotted: &Series) -> Option<Series>;
}

/// Least-squares line `y = slope * x + intercept` over numeric x.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 { self.slope * x + self.intercept }
}

/// Fit over finite pairs only. Needs two distinct x values.
pub fn fit_linear(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    let pairs = x.iter().zip(y).filter(|(a, b)| a.is_finite() && b.is_finite());
    let (mut n, mut sx, mut sy) = (0.0f64, 0.0f64, 0.0f64);
    for (&a, &b) in pairs.clone() {
        n += 1.0;
        sx += a;
        sy += b;
    }
    if n < 2.0 { return None; }
    let (mx, my) = (sx / n, sy / n);
    let (mut sxx, mut sxy) = (0.0f64, 0.0f64);
    for (&a, &b) in pairs {
        sxx += (a - mx) * (a - mx);
        sxy += (a - mx) * (b - my);
    }
    if sxx.abs() < f64::EPSILON { return None; }
    let slope = sxy / sxx;
    Some(LinearFit { slope, intercept: my - slope * mx })
}

/// Least-squares trend line.
pub struct LinearTrend;

impl Indicator for LinearTrend {
    fn label(&self) -> &'static str { "Trend" }

    fn compute(&self, original: &Series, plotted: &Series) -> Option<Series> {
        // Centre x before fitting: epoch seconds squared lose precision otherwise.
        let x = original.numeric_x();
        let origin = x.first().copied().unwrap_or(0.0);
        let centred: Vec<f64> = x.iter().map(|v| v - origin).collect();
        let fit = fit_linear(&centred, original.y())?;
        let y = plotted.numeric_x().iter().map(|&v| fit.at(v - origin)).collect();
        plotted.with_y(y).ok().map(|s| s.with_label(self.label()))
    }
}

/// Upper/lower band reduced with the main series' selection so all three stay aligned.
pub fn project_bands(result: &ReductionResult, upper: &[f64], lower: &[f64]) -> Option<(Series, Series)> {
    let up = result.series.with_y(result.project(upper)).ok()?;
    let lo = result.series.with_y(result.project(lower)).ok()?;
    Some((up, lo))
}
