// File: crates/demo/src/main.rs
// Summary: Demo renders sample dashboards, a CSV time series or a JSON dashboard description to PNGs.

use anyhow::{Context, Result};
use charter_core::panel::{parse_date_str, Bands, BarData, LineData, LineX, NamedValues, PanelConfig, PanelData, PanelSpec, TimeSeriesData};
use charter_core::style::StyleRegistry;
use charter_core::theme::find_or_default;
use charter_core::{Chart, Composer, LayoutSpec, RenderedFigure, Settings};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// JSON dashboard description: a layout (inline or preset name) and its panels.
#[derive(Debug, Deserialize)]
struct DashboardFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    layout: Option<LayoutSpec>,
    panels: Vec<PanelConfig>,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env().context("reading CHARTER_* settings")?;
    let styles = StyleRegistry::builtin();

    match std::env::args().nth(1) {
        Some(raw) => {
            let (path, used_alt) = resolve_path(&raw)?;
            info!(input = %path.display(), "using input file");
            if used_alt {
                info!("extension swapped between .csv/.cvs");
            }
            let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
            if ext == "json" {
                render_dashboard_file(&path, &styles, &settings)
            } else {
                render_csv(&path, &styles, &settings)
            }
        }
        None => render_samples(&styles, &settings),
    }
}

fn render_dashboard_file(path: &Path, styles: &StyleRegistry, settings: &Settings) -> Result<()> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: DashboardFile = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let layout = match (file.layout, file.preset.as_deref()) {
        (Some(l), _) => l,
        (None, Some(name)) => LayoutSpec::preset(name)?,
        (None, None) => LayoutSpec::default(),
    };
    let panels = file
        .panels
        .into_iter()
        .enumerate()
        .map(|(i, p)| PanelSpec::try_from(p).with_context(|| format!("panel {i}")))
        .collect::<Result<Vec<_>>>()?;
    let theme = find_or_default(file.theme.as_deref().unwrap_or(&settings.default_theme));

    let fig = Composer::new(styles, settings).compose(&panels, &layout, &theme, file.title.as_deref())?;
    write_png(&fig, &out_name_with(settings, path, "dashboard")?)
}

fn render_csv(path: &Path, styles: &StyleRegistry, settings: &Settings) -> Result<()> {
    let data = load_timeseries_csv(path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    let n = data.dates.len();
    if n == 0 {
        anyhow::bail!("no rows loaded; check headers/delimiter.");
    }
    info!(rows = n, series = data.series.len(), "loaded time series");

    let style = if n > settings.downsample_threshold { "large_dataset" } else { settings.default_style.as_str() };
    let title = path.file_stem().and_then(|s| s.to_str()).unwrap_or("series").to_string();
    let chart = Chart::from_spec(PanelSpec::new(PanelData::TimeSeries(data)).style(style).title(title).y_label("Value"))
        .with_theme(find_or_default(&settings.default_theme));
    let fig = chart.render(styles, settings)?;
    write_png(&fig, &out_name_with(settings, path, "timeseries")?)
}

fn render_samples(styles: &StyleRegistry, settings: &Settings) -> Result<()> {
    let composer = Composer::new(styles, settings);
    let theme = find_or_default(&settings.default_theme);
    let stem = Path::new("sample");

    // 1) Traffic vs latency, shared legend on top
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().context("sample start date")?;
    let hours: Vec<DateTime<Utc>> = (0..24 * 14).map(|h| start + Duration::hours(h)).collect();
    let requests: Vec<f64> = (0..hours.len()).map(|h| 1200.0 + 400.0 * (h as f64 * std::f64::consts::TAU / 24.0).sin()).collect();
    let errors: Vec<f64> = requests.iter().enumerate().map(|(h, r)| r * 0.02 + (h % 17) as f64).collect();
    let traffic = PanelSpec::new(PanelData::TimeSeries(TimeSeriesData {
        dates: hours.clone(),
        series: vec![NamedValues::new("requests", requests.clone()), NamedValues::new("errors", errors)],
        bands: None,
    }))
    .style("area")
    .title("Traffic")
    .y_label("req/h");
    let regions = ["us-east", "us-west", "eu", "apac"].map(String::from).to_vec();
    let latency = PanelSpec::new(PanelData::Bar(BarData {
        labels: regions.clone(),
        series: vec![NamedValues::new("p50", vec![42.0, 48.0, 61.0, 88.0]), NamedValues::new("p95", vec![120.0, 131.0, 160.0, 240.0])],
    }))
    .style("grouped")
    .at(0, 1)
    .title("Latency")
    .y_label("ms");
    let fig = composer.compose(&[traffic, latency], &LayoutSpec::preset("traffic_latency")?, &theme, Some("Service overview"))?;
    write_png(&fig, &out_name_with(settings, stem, "traffic_latency")?)?;

    // 2) Style showcase on a 2x2 grid
    let days: Vec<DateTime<Utc>> = hours.iter().copied().step_by(24).collect();
    let daily: Vec<f64> = requests.iter().step_by(24).enumerate().map(|(d, r)| r + d as f64 * 15.0).collect();
    let trend = PanelSpec::new(PanelData::TimeSeries(TimeSeriesData {
        dates: days.clone(),
        series: vec![NamedValues::new("daily", daily.clone())],
        bands: None,
    }))
    .style("trend")
    .title("Daily requests");
    let range = PanelSpec::new(PanelData::TimeSeries(TimeSeriesData {
        dates: days,
        bands: Some(Bands {
            upper: daily.iter().map(|v| v * 1.1).collect(),
            lower: daily.iter().map(|v| v * 0.9).collect(),
        }),
        series: vec![NamedValues::new("forecast", daily)],
    }))
    .style("range")
    .at(0, 1)
    .title("Forecast band");
    let smooth = PanelSpec::new(PanelData::Line(LineData {
        x: LineX::Labels(["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].map(String::from).to_vec()),
        series: vec![NamedValues::new("cpu", vec![31.0, 45.0, 52.0, 49.0, 61.0, 28.0, 22.0])],
    }))
    .style("smooth")
    .at(1, 0)
    .title("CPU");
    let stacked = PanelSpec::new(PanelData::Bar(BarData {
        labels: regions,
        series: vec![NamedValues::new("cache hit", vec![70.0, 64.0, 58.0, 51.0]), NamedValues::new("cache miss", vec![30.0, 36.0, 42.0, 49.0])],
    }))
    .style("stacked")
    .at(1, 1)
    .title("Cache");
    let fig = composer.compose(&[trend, range, smooth, stacked], &LayoutSpec::preset("grid_2x2")?, &theme, Some("Styles"))?;
    write_png(&fig, &out_name_with(settings, stem, "styles")?)?;

    // 3) 50k points through reduction and rasterization
    let minutes: Vec<DateTime<Utc>> = (0..50_000).map(|m| start + Duration::minutes(m)).collect();
    let signal: Vec<f64> = (0..50_000)
        .map(|i| {
            let t = i as f64;
            (t * 0.002).sin() * 10.0 + (t * 0.05).sin() * 2.0 + if i % 9_973 == 0 { 25.0 } else { 0.0 }
        })
        .collect();
    let sensor = PanelSpec::new(PanelData::TimeSeries(TimeSeriesData {
        dates: minutes,
        series: vec![NamedValues::new("sensor", signal)],
        bands: None,
    }))
    .style("large_dataset")
    .title("Sensor (50k points)");
    let chart = Chart::from_spec(sensor).with_theme(theme);
    let fig = chart.render(styles, settings)?;
    for s in fig.panels.iter().flat_map(|p| &p.series) {
        info!(original = s.original_len, rendered = s.rendered_len, rasterized = s.rasterized, "large dataset panel");
    }
    write_png(&fig, &out_name_with(settings, stem, "large_dataset")?)
}

fn write_png(fig: &RenderedFigure, out: &Path) -> Result<()> {
    fig.render_to_png(out).with_context(|| format!("writing {}", out.display()))?;
    info!(path = %out.display(), width = fig.width, height = fig.height, "wrote chart");
    Ok(())
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

/// Produce output file name like <output_dir>/chart_<stem>_<suffix>.png
fn out_name_with(settings: &Settings, input: &Path, suffix: &str) -> Result<PathBuf> {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    let short = stem.split('_').take(3).collect::<Vec<_>>().join("_");
    let mut out = settings.output_dir.clone();
    std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
    if short.is_empty() {
        out.push(format!("chart_{suffix}.png"));
    } else {
        out.push(format!("chart_{short}_{suffix}.png"));
    }
    Ok(out)
}

/// Load a CSV with one time column and any number of numeric value columns.
fn load_timeseries_csv(path: &Path) -> Result<TimeSeriesData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    info!(?headers, "csv headers");

    let i_time = headers
        .iter()
        .position(|h| ["time", "timestamp", "open_time", "date", "datetime"].contains(&h.as_str()))
        .context("no time/timestamp/date column")?;
    let value_cols: Vec<usize> = (0..headers.len()).filter(|&i| i != i_time).collect();

    let mut dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); value_cols.len()];
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let Some(t) = rec.get(i_time).and_then(parse_time) else {
            skipped += 1;
            continue;
        };
        dates.push(t);
        for (col, &i) in columns.iter_mut().zip(&value_cols) {
            // unparseable cells become gaps
            col.push(rec.get(i).and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN));
        }
    }
    if skipped > 0 {
        warn!(skipped, "rows without a readable time were skipped");
    }

    // Keep only columns holding at least one number.
    let series = value_cols
        .iter()
        .zip(columns)
        .filter(|(_, values)| values.iter().any(|v| v.is_finite()))
        .map(|(&i, values)| NamedValues::new(headers[i].clone(), values))
        .collect::<Vec<_>>();
    if series.is_empty() {
        anyhow::bail!("no numeric value columns found");
    }
    Ok(TimeSeriesData { dates, series, bands: None })
}

fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms vs epoch sec
        return if n > 10_i64.pow(12) { DateTime::from_timestamp_millis(n) } else { DateTime::from_timestamp(n, 0) };
    }
    parse_date_str(s).ok()
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}
