//! Unit tests for the growing output table and the report sinks

use crate::common::TestFixture;
use keydiff::json_sink::JsonSink;
use keydiff::sink::{column_letter, open_sink, OutputSheet, OutputTable, ReportFormat, TabularSink};
use keydiff::CellValue;

#[test]
fn test_reference_tracks_bounds() {
    let mut table = OutputTable::new("T", ["a", "b"]).unwrap();
    assert_eq!(table.reference(), "A1:B1");

    for i in 0..4 {
        table.append_row();
        table.set_last("a", CellValue::Integer(i)).unwrap();
    }
    assert_eq!(table.reference(), "A1:B5");

    for i in 0..25 {
        table.append_column(format!("extra_{}", i)).unwrap();
    }
    assert_eq!(table.column_count(), 27);
    assert_eq!(table.reference(), "A1:AA5");
}

#[test]
fn test_column_letters_past_z() {
    assert_eq!(column_letter(28), "AB");
    assert_eq!(column_letter(702), "ZZ");
    assert_eq!(column_letter(16384), "XFD");
}

#[test]
fn test_growing_columns_keep_earlier_rows_unset() {
    let mut table = OutputTable::new("T", ["id"]).unwrap();
    table.append_row();
    table.set_last("id", CellValue::Integer(1)).unwrap();
    table.append_column("x * 1").unwrap();
    table.append_column("x * 2").unwrap();
    table.append_row();
    table.set_last("id", CellValue::Integer(2)).unwrap();
    table.set_last("x * 1", CellValue::from("a")).unwrap();

    assert_eq!(table.rows()[0], vec![Some(CellValue::Integer(1)), None, None]);
    assert_eq!(
        table.rows()[1],
        vec![Some(CellValue::Integer(2)), Some(CellValue::from("a")), None]
    );
}

#[test]
fn test_open_sink_picks_format_from_extension() {
    let fixture = TestFixture::new().unwrap();
    let json_path = fixture.path("report.json");
    let xlsx_path = fixture.path("report.xlsx");

    let table = OutputTable::new("T", ["id"]).unwrap();

    let mut sink = open_sink(&json_path, ReportFormat::Auto);
    sink.add_sheet(OutputSheet::new("Sheet", table.clone())).unwrap();
    sink.commit().unwrap();
    let report = fixture.read_json(&json_path).unwrap();
    assert_eq!(report["sheets"][0]["table"]["columns"][0], "id");

    let mut sink = open_sink(&xlsx_path, ReportFormat::Auto);
    sink.add_sheet(OutputSheet::new("Sheet", table)).unwrap();
    sink.commit().unwrap();
    crate::common::assertions::assert_is_workbook(&xlsx_path);
}

#[test]
fn test_json_sink_empty_report() {
    let fixture = TestFixture::new().unwrap();
    let path = fixture.path("empty.json");

    let mut sink = JsonSink::new(&path);
    sink.commit().unwrap();

    let report = fixture.read_json(&path).unwrap();
    assert_eq!(report["sheets"], serde_json::json!([]));
    assert!(report["generated_at"].as_str().unwrap().contains('T'));
}
