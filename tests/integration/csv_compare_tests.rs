//! Integration tests comparing CSV files end to end

use crate::common::assertions::{assert_is_workbook, sheet, sheet_names};
use crate::common::{sample_data, CliTestRunner, TestFixture};
use keydiff::data::DuckDbSource;
use keydiff::{CompareOptions, ComparisonRequest, TableLocator};
use keydiff::sink::ReportFormat;
use serde_json::json;

fn customer_files(fixture: &TestFixture) -> (String, String) {
    fixture
        .create_csv("old.csv", &sample_data::customers_old())
        .unwrap();
    fixture
        .create_csv("new.csv", &sample_data::customers_new())
        .unwrap();
    (fixture.path_str("old.csv"), fixture.path_str("new.csv"))
}

#[test]
fn test_compare_csv_to_json_report() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let (old, new) = customer_files(fixture);
    let output = fixture.path_str("report.json");

    runner.expect_success(&["compare", &old, &new, "--key", "id", "--output", &output, "--quiet"]);

    let report = fixture.read_json(&fixture.path("report.json")).unwrap();
    assert_eq!(
        sheet_names(&report),
        vec![
            "Differences",
            "Rows unique to first",
            "Rows unique to second",
            "Columns unique to first",
            "Columns unique to second",
        ]
    );

    let differences = &sheet(&report, "Differences")["table"];
    assert_eq!(differences["name"], "DiffTable");
    assert_eq!(differences["columns"], json!(["id", "city * 1", "city * 2"]));
    assert_eq!(differences["rows"], json!([["3", "Paris", "Lyon"]]));

    let only_first = &sheet(&report, "Rows unique to first")["table"];
    assert_eq!(only_first["name"], "RowsUniqueToFirst");
    assert_eq!(only_first["columns"], json!(["id", "name", "city", "score"]));
    assert_eq!(only_first["rows"], json!([["2", "Bob", "Rome", "20"]]));

    let only_second = &sheet(&report, "Rows unique to second")["table"];
    assert_eq!(only_second["name"], "RowsUniqueToSecond");
    assert_eq!(only_second["rows"], json!([["4", "Dan", "Bern", "dan@example.org"]]));

    let columns_first = &sheet(&report, "Columns unique to first")["table"];
    assert_eq!(columns_first["name"], "ColumnsUniqueToFirst");
    assert_eq!(columns_first["columns"], json!(["id", "score"]));
    assert_eq!(columns_first["rows"], json!([["1", "10"], ["2", "20"], ["3", "30"]]));

    let columns_second = &sheet(&report, "Columns unique to second")["table"];
    assert_eq!(columns_second["name"], "ColumnsUniqueToSecond");
    assert_eq!(columns_second["columns"], json!(["id", "email"]));
    assert_eq!(
        columns_second["rows"],
        json!([
            ["3", "carol@example.org"],
            ["1", "alice@example.org"],
            ["4", "dan@example.org"]
        ])
    );
}

#[test]
fn test_compare_csv_to_workbook() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let (old, new) = customer_files(fixture);
    let output = fixture.path_str("reports/diff.xlsx");

    runner.expect_success(&["compare", &old, &new, "-k", "id", "-o", &output]);

    assert_is_workbook(&fixture.path("reports/diff.xlsx"));
}

#[test]
fn test_json_flag_prints_without_changing_report() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let (old, new) = customer_files(fixture);
    let output = fixture.path_str("out.json");

    runner.expect_success(&[
        "compare", &old, &new, "-k", "id", "-o", &output, "--json", "--format", "json",
    ]);
    assert!(fixture.path("out.json").exists());
}

#[test]
fn test_request_api_with_duckdb_source() {
    let fixture = TestFixture::new().unwrap();
    let (old, new) = customer_files(&fixture);

    let request = ComparisonRequest {
        first: TableLocator::parse(&old).unwrap(),
        second: TableLocator::parse(&new).unwrap(),
        output: fixture.path("api.json"),
        key_columns: vec!["id".to_string()],
        format: ReportFormat::Json,
    };

    let source = DuckDbSource::new().unwrap();
    let result = request.execute(&source, CompareOptions::default()).unwrap();
    let summary = result.summary();

    assert_eq!(summary.first_table, "old.csv");
    assert_eq!(summary.second_table, "new.csv");
    assert_eq!(summary.matched_rows, 2);
    assert_eq!(summary.rows_with_differences, 1);
    assert_eq!(summary.cell_differences, 1);
    assert_eq!(summary.rows_only_in_first, 1);
    assert_eq!(summary.rows_only_in_second, 1);
    assert_eq!(summary.columns_only_in_first, vec!["score"]);
    assert_eq!(summary.columns_only_in_second, vec!["email"]);
    assert!(summary.has_differences());
    assert!(!summary.has_duplicate_keys());
}

#[test]
fn test_identical_files_produce_empty_report() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv("a.csv", &sample_data::customers_old())
        .unwrap();
    fixture
        .create_csv("b.csv", &sample_data::customers_old())
        .unwrap();
    let (a, b) = (fixture.path_str("a.csv"), fixture.path_str("b.csv"));

    let json_out = fixture.path_str("same.json");
    runner.expect_success(&["compare", &a, &b, "-k", "id", "-o", &json_out]);
    let report = fixture.read_json(&fixture.path("same.json")).unwrap();
    assert!(sheet_names(&report).is_empty());

    let xlsx_out = fixture.path_str("same.xlsx");
    runner.expect_success(&["compare", &a, &b, "-k", "id", "-o", &xlsx_out]);
    assert_is_workbook(&fixture.path("same.xlsx"));
}

#[test]
fn test_compound_key_on_csv() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv(
            "a.csv",
            &[
                vec!["region", "id", "amount"],
                vec!["EU", "1", "5"],
                vec!["US", "1", "7"],
            ],
        )
        .unwrap();
    fixture
        .create_csv(
            "b.csv",
            &[
                vec!["id", "region", "amount"],
                vec!["1", "US", "8"],
                vec!["1", "EU", "5"],
            ],
        )
        .unwrap();
    let output = fixture.path_str("out.json");

    runner.expect_success(&[
        "compare",
        &fixture.path_str("a.csv"),
        &fixture.path_str("b.csv"),
        "-k",
        "region",
        "-k",
        "id",
        "-o",
        &output,
    ]);

    let report = fixture.read_json(&fixture.path("out.json")).unwrap();
    assert_eq!(sheet_names(&report), vec!["Differences"]);
    let table = &sheet(&report, "Differences")["table"];
    assert_eq!(
        table["columns"],
        json!(["region", "id", "amount * 1", "amount * 2"])
    );
    assert_eq!(table["rows"], json!([["US", "1", "7", "8"]]));
}

#[test]
fn test_csv_numbers_compare_as_written() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv_raw("a.csv", "sku,price,qty\nA,1.50,007\nB,2,3\n")
        .unwrap();
    fixture
        .create_csv_raw("b.csv", "sku,price,qty\nA,1.5,7\nB,2,3\n")
        .unwrap();
    let output = fixture.path_str("prices.json");

    runner.expect_success(&[
        "compare",
        &fixture.path_str("a.csv"),
        &fixture.path_str("b.csv"),
        "-k",
        "sku",
        "-o",
        &output,
    ]);

    let report = fixture.read_json(&fixture.path("prices.json")).unwrap();
    assert_eq!(sheet_names(&report), vec!["Differences"]);
    let table = &sheet(&report, "Differences")["table"];
    assert_eq!(
        table["columns"],
        json!(["sku", "price * 1", "price * 2", "qty * 1", "qty * 2"])
    );
    assert_eq!(table["rows"], json!([["A", "1.50", "1.5", "007", "7"]]));
}
