//! Integration tests reading named tables out of Excel workbooks

use crate::common::assertions::{sheet, sheet_names};
use crate::common::{sample_data, CliTestRunner, TestFixture};
use keydiff::{CellValue, FileSource, KeydiffError, TableLocator, TabularSource};
use serde_json::json;

/// `prices.xlsx` with sheet `Jan` holding table `JanPrices` and sheet
/// `Feb.Final` holding table `FebPrices`
fn price_book(fixture: &TestFixture) -> String {
    fixture
        .create_workbook(
            "prices.xlsx",
            &[
                (
                    "Jan",
                    "JanPrices",
                    vec![
                        vec!["sku", "price", "label"],
                        vec!["A", "1.5", "apple"],
                        vec!["B", "2", "bread"],
                        vec!["C", "3", "cheese"],
                    ],
                ),
                (
                    "Feb.Final",
                    "FebPrices",
                    vec![
                        vec!["sku", "price", "label"],
                        vec!["A", "1.75", "apple"],
                        vec!["B", "2", "bread"],
                        vec!["D", "4", "dates"],
                    ],
                ),
            ],
        )
        .unwrap();
    fixture.path_str("prices.xlsx")
}

#[test]
fn test_compare_named_tables_in_one_workbook() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let book = price_book(fixture);
    let output = fixture.path_str("prices.json");

    runner.expect_success(&[
        "compare",
        &format!("{}#Jan.JanPrices", book),
        &format!("{}#Feb.Final.FebPrices", book),
        "-k",
        "sku",
        "-o",
        &output,
        "--quiet",
    ]);

    let report = fixture.read_json(&fixture.path("prices.json")).unwrap();
    assert_eq!(
        sheet_names(&report),
        vec!["Differences", "Rows unique to first", "Rows unique to second"]
    );
    // Workbook numbers keep their type in unique rows, differences hold text
    assert_eq!(
        sheet(&report, "Differences")["table"]["rows"],
        json!([["A", "1.5", "1.75"]])
    );
    assert_eq!(
        sheet(&report, "Rows unique to first")["table"]["rows"],
        json!([["C", 3.0, "cheese"]])
    );
    assert_eq!(
        sheet(&report, "Rows unique to second")["table"]["rows"],
        json!([["D", 4.0, "dates"]])
    );
}

#[test]
fn test_workbook_against_csv() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv("old.csv", &sample_data::customers_old())
        .unwrap();
    fixture
        .create_workbook("new.xlsx", &[("Customers", "People", sample_data::customers_old())])
        .unwrap();
    let output = fixture.path_str("same.json");

    // Workbook numbers read as 10 and CSV text reads as "10"; both render alike
    runner.expect_success(&[
        "compare",
        &fixture.path_str("old.csv"),
        &format!("{}#People", fixture.path_str("new.xlsx")),
        "-k",
        "id",
        "-o",
        &output,
        "--quiet",
    ]);

    let report = fixture.read_json(&fixture.path("same.json")).unwrap();
    assert!(sheet_names(&report).is_empty());
}

#[test]
fn test_xlsx_report_can_be_compared_again() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let book = price_book(fixture);
    let first_report = fixture.path_str("first.xlsx");

    runner.expect_success(&[
        "compare",
        &format!("{}#JanPrices", book),
        &format!("{}#FebPrices", book),
        "-k",
        "sku",
        "-o",
        &first_report,
        "--quiet",
    ]);

    let source = FileSource::new().unwrap();
    let differences = source
        .open_table(&TableLocator::parse(&format!("{}#Differences.DiffTable", first_report)).unwrap())
        .unwrap();
    assert_eq!(differences.column_names(), &["sku", "price * 1", "price * 2"]);
    assert_eq!(differences.row_count(), 1);
    let row = differences.row(0).unwrap();
    assert_eq!(row.get("sku"), Some(&CellValue::from("A")));
    assert_eq!(row.get("price * 2").unwrap().normalized(), "1.75");
}

#[test]
fn test_list_workbook_tables() {
    let fixture = TestFixture::new().unwrap();
    let book = price_book(&fixture);

    let tables = FileSource::new()
        .unwrap()
        .list_tables(std::path::Path::new(&book))
        .unwrap();
    let names: Vec<String> = tables.iter().map(|t| t.to_string()).collect();
    assert_eq!(
        names,
        vec![
            format!("{}#Jan.JanPrices", book),
            format!("{}#Feb.Final.FebPrices", book),
        ]
    );

    // The listed locators open as they are
    for locator in &tables {
        let reparsed = TableLocator::parse(&locator.to_string()).unwrap();
        assert_eq!(source_rows(&reparsed), 3);
    }

    let runner = CliTestRunner::new().unwrap();
    runner.expect_success(&["tables", &book, "--format", "json"]);
}

fn source_rows(locator: &TableLocator) -> usize {
    FileSource::new().unwrap().open_table(locator).unwrap().row_count()
}

#[test]
fn test_workbook_needs_a_table_selector() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let book = price_book(fixture);
    let output = fixture.path_str("report.json");

    let err = runner.expect_failure(&["compare", &book, &book, "-k", "sku", "-o", &output]);
    assert!(matches!(err, KeydiffError::SourceUnavailable { .. }), "{:?}", err);

    let err = runner.expect_failure(&[
        "compare",
        &format!("{}#Jan.FebPrices", book),
        &format!("{}#FebPrices", book),
        "-k",
        "sku",
        "-o",
        &output,
    ]);
    assert!(matches!(err, KeydiffError::SourceUnavailable { .. }), "{:?}", err);
    assert!(!fixture.path("report.json").exists());
}
