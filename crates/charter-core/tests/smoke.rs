// File: crates/charter-core/tests/smoke.rs
// Purpose: End-to-end rasterization: PNG bytes decode, have the figure size and the theme background.

use charter_core::panel::{Bands, LineData, LineX, NamedValues, PanelData, PanelSpec, TimeSeriesData};
use charter_core::style::StyleRegistry;
use charter_core::{Chart, Composer, LayoutSpec, Settings, Theme};
use chrono::{Duration, TimeZone, Utc};

fn line_data() -> PanelData {
    PanelData::Line(LineData {
        x: LineX::Numeric(vec![0.0, 1.0, 2.0, 3.0, 4.0]),
        series: vec![NamedValues::new("demo", vec![0.0, 2.0, 1.0, 3.5, 2.5])],
    })
}

#[test]
fn single_chart_png() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let chart = Chart::new(line_data()).with_size(4.0, 3.0).with_dpi(50);
    let fig = chart.render(&styles, &settings).expect("render should succeed");
    assert_eq!((fig.width, fig.height), (200, 150));

    let bytes = fig.render_to_png_bytes().expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
    let img = image::load_from_memory(&bytes).expect("decodes").to_rgba8();
    assert_eq!(img.dimensions(), (200, 150));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);

    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    chart.render_to_png(&styles, &settings, &out).expect("write png");
    assert!(std::fs::metadata(&out).expect("output exists").len() > 0);
}

#[test]
fn dark_dashboard_png() {
    let styles = StyleRegistry::builtin();
    let settings = Settings::default();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let dates: Vec<_> = (0..60).map(|i| start + Duration::hours(i)).collect();
    let values: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.2).sin() * 10.0).collect();
    let ts = PanelSpec::new(PanelData::TimeSeries(TimeSeriesData {
        dates,
        bands: Some(Bands {
            upper: values.iter().map(|v| v + 5.0).collect(),
            lower: values.iter().map(|v| v - 5.0).collect(),
        }),
        series: vec![NamedValues::new("p50", values)],
    }))
    .style("range")
    .title("Latency");
    let panels = vec![ts, PanelSpec::new(line_data()).style("smooth").at(0, 1)];
    let spec = LayoutSpec { dpi: Some(40), ..LayoutSpec::preset("traffic_latency").unwrap() };
    let fig = Composer::new(&styles, &settings).compose(&panels, &spec, &Theme::dark(), Some("Service")).unwrap();
    assert_eq!((fig.width, fig.height), (720, 240));
    assert!(fig.primitive_count() > fig.primitives.len());

    let (pixels, w, h, stride) = fig.render_to_rgba8().unwrap();
    assert_eq!((w, h, stride), (720, 240, 720 * 4));
    assert_eq!(&pixels[0..4], &[0x1E, 0x1E, 0x1E, 0xFF]);
    let last = pixels.len() - 4;
    assert_eq!(&pixels[last..], &[0x1E, 0x1E, 0x1E, 0xFF]);
}
