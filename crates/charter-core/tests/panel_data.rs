// File: crates/charter-core/tests/panel_data.rs
// Purpose: JSON panel descriptions: kind parsing, data shapes and date formats.

use charter_core::panel::{parse_date_str, LineX, PanelConfig, PanelData, PanelSpec};
use charter_core::style::ChartKind;
use charter_core::ChartError;
use chrono::{TimeZone, Utc};

fn spec(json: &str) -> Result<PanelSpec, ChartError> {
    let cfg: PanelConfig = serde_json::from_str(json).expect("panel json");
    PanelSpec::try_from(cfg)
}

#[test]
fn bar_series_keep_document_order() {
    let p = spec(
        r#"{ "chart_type": "bar", "style": "grouped", "row": 1, "colspan": 2,
             "data": { "labels": ["a", "b"], "series": { "Zeta": [1, 2], "Alpha": [3, 4] } } }"#,
    )
    .unwrap();
    assert_eq!(p.kind, ChartKind::Bar);
    assert_eq!(p.style, "grouped");
    assert_eq!((p.grid_row, p.grid_col, p.row_span, p.col_span), (1, 0, 1, 2));
    let PanelData::Bar(d) = &p.data else { panic!("expected bar data") };
    let names: Vec<_> = d.series.iter().map(|s| s.name.as_deref()).collect();
    assert_eq!(names, vec![Some("Zeta"), Some("Alpha")]);
}

#[test]
fn line_accepts_labels_or_numeric_x() {
    let p = spec(r#"{ "chart_type": "LINE", "data": { "labels": ["Mon", "Tue"], "y": [1, 2] } }"#).unwrap();
    let PanelData::Line(d) = &p.data else { panic!("expected line data") };
    assert!(matches!(d.x, LineX::Labels(_)));
    assert_eq!(p.style, "default");

    let p = spec(r#"{ "chart_type": "line", "data": { "x": [0.5, 1.5, 2.5], "y": [1, null, 3] } }"#).unwrap();
    let PanelData::Line(d) = &p.data else { panic!("expected line data") };
    assert_eq!(d.x, LineX::Numeric(vec![0.5, 1.5, 2.5]));
    assert!(d.series[0].values[1].is_nan());
}

#[test]
fn timeseries_dates_in_several_formats() {
    let p = spec(
        r#"{ "chart_type": "timeseries",
             "data": { "dates": ["2024-01-01", "2024/01/02", "03/01/2024", "2024-01-04T06:30:00", 1704412800],
                       "values": [1, 2, 3, 4, 5], "upper": [2, 3, 4, 5, 6], "lower": [0, 1, 2, 3, 4] } }"#,
    )
    .unwrap();
    let PanelData::TimeSeries(d) = &p.data else { panic!("expected time series data") };
    assert_eq!(d.dates[0], Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(d.dates[2], Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
    assert_eq!(d.dates[3], Utc.with_ymd_and_hms(2024, 1, 4, 6, 30, 0).unwrap());
    assert_eq!(d.dates[4], Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
    assert!(d.bands.is_some());
}

#[test]
fn unknown_kind_is_reported() {
    let err = spec(r#"{ "chart_type": "pie", "data": { "labels": ["a"], "values": [1] } }"#).unwrap_err();
    assert!(matches!(err, ChartError::UnknownChartKind(ref k) if k == "pie"));
}

#[test]
fn malformed_shapes_are_rejected() {
    let cases = [
        r#"{ "chart_type": "bar", "data": { "values": [1, 2] } }"#,
        r#"{ "chart_type": "bar", "data": { "labels": [], "values": [] } }"#,
        r#"{ "chart_type": "bar", "data": { "labels": ["a", "b"], "values": [1] } }"#,
        r#"{ "chart_type": "bar", "data": { "labels": ["a"], "series": [1] } }"#,
        r#"{ "chart_type": "bar", "data": { "labels": ["a"], "values": ["x"] } }"#,
        r#"{ "chart_type": "line", "data": { "y": [1, 2] } }"#,
        r#"{ "chart_type": "line", "data": { "x": [1, 2] } }"#,
        r#"{ "chart_type": "timeseries", "data": { "dates": ["2024-01-01"], "values": [1], "upper": [2] } }"#,
        r#"{ "chart_type": "timeseries", "data": { "dates": ["someday"], "values": [1] } }"#,
        r#"{ "chart_type": "timeseries", "data": [1, 2] }"#,
    ];
    for json in cases {
        let err = spec(json).unwrap_err();
        assert!(matches!(err, ChartError::InvalidData(_)), "{json}: {err}");
    }
}

#[test]
fn declared_kind_must_match_data() {
    let p = spec(r#"{ "chart_type": "bar", "data": { "labels": ["a"], "values": [1] } }"#).unwrap();
    let p = p.kind(ChartKind::Line);
    assert!(matches!(p.validate(3), Err(ChartError::KindMismatch { index: 3, .. })));
}

#[test]
fn date_strings() {
    assert_eq!(parse_date_str("2024-02-29 12:00").unwrap(), Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());
    assert_eq!(parse_date_str("2024-02-29T12:00:00+02:00").unwrap(), Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap());
    assert!(parse_date_str("29.02.2024").is_err());
}
