//! Error handling: every failure surfaces as a typed error and writes nothing

use crate::common::{sample_data, CliTestRunner};
use keydiff::{KeySpec, KeydiffError, TableLocator};

fn customer_files(runner: &CliTestRunner) -> (String, String) {
    let fixture = runner.fixture();
    fixture
        .create_csv("old.csv", &sample_data::customers_old())
        .unwrap();
    fixture
        .create_csv("new.csv", &sample_data::customers_new())
        .unwrap();
    (fixture.path_str("old.csv"), fixture.path_str("new.csv"))
}

#[test]
fn test_missing_key_column_writes_nothing() {
    let runner = CliTestRunner::new().unwrap();
    let (old, new) = customer_files(&runner);
    let output = runner.fixture().path_str("report.xlsx");

    let err = runner.expect_failure(&["compare", &old, &new, "-k", "email", "-o", &output]);
    match err {
        KeydiffError::MissingKeyColumn { column, table } => {
            assert_eq!(column, "email");
            assert_eq!(table, "old.csv");
        }
        other => panic!("Expected MissingKeyColumn, got {:?}", other),
    }
    assert!(!runner.fixture().path("report.xlsx").exists());
}

#[test]
fn test_missing_input_file() {
    let runner = CliTestRunner::new().unwrap();
    let (old, _) = customer_files(&runner);
    let missing = runner.fixture().path_str("nowhere.csv");
    let output = runner.fixture().path_str("report.json");

    let err = runner.expect_failure(&["compare", &old, &missing, "-k", "id", "-o", &output]);
    assert!(matches!(err, KeydiffError::SourceUnavailable { .. }), "{:?}", err);
    assert!(!runner.fixture().path("report.json").exists());
}

#[test]
fn test_unsupported_input_format() {
    let runner = CliTestRunner::new().unwrap();
    let (old, _) = customer_files(&runner);
    let text = runner
        .fixture()
        .create_csv_raw("notes.txt", "id,name\n1,x\n")
        .unwrap();
    let output = runner.fixture().path_str("report.json");

    let err = runner.expect_failure(&[
        "compare",
        &old,
        &text.display().to_string(),
        "-k",
        "id",
        "-o",
        &output,
    ]);
    assert!(matches!(err, KeydiffError::SourceUnavailable { .. }), "{:?}", err);
}

#[test]
fn test_table_selector_on_flat_file() {
    let runner = CliTestRunner::new().unwrap();
    let (old, new) = customer_files(&runner);
    let output = runner.fixture().path_str("report.json");

    let err = runner.expect_failure(&[
        "compare",
        &format!("{}#sheet1", old),
        &new,
        "-k",
        "id",
        "-o",
        &output,
    ]);
    assert!(matches!(err, KeydiffError::SourceUnavailable { .. }), "{:?}", err);
}

#[test]
fn test_duplicate_keys_rejected_on_request() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_csv("dups.csv", &[vec!["id", "v"], vec!["1", "a"], vec!["1", "b"]])
        .unwrap();
    fixture
        .create_csv("single.csv", &[vec!["id", "v"], vec!["1", "b"]])
        .unwrap();
    let output = fixture.path_str("report.json");
    let single = fixture.path_str("single.csv");
    let dups = fixture.path_str("dups.csv");

    let args: [&str; 7] = [
        "compare",
        &single,
        &dups,
        "-k",
        "id",
        "-o",
        &output,
    ];

    let mut strict = args.to_vec();
    strict.extend(["--duplicate-keys", "reject"]);
    let err = runner.expect_failure(&strict);
    match err {
        KeydiffError::DuplicateKey { table, .. } => assert_eq!(table, "dups.csv"),
        other => panic!("Expected DuplicateKey, got {:?}", other),
    }
    assert!(!fixture.path("report.json").exists());

    // The default policy keeps the last row and still writes the report
    runner.expect_success(&args);
    assert!(fixture.path("report.json").exists());
}

#[test]
fn test_invalid_option_values() {
    let runner = CliTestRunner::new().unwrap();
    let (old, new) = customer_files(&runner);
    let output = runner.fixture().path_str("report.out");

    let err = runner.expect_failure(&[
        "compare", &old, &new, "-k", "id", "-o", &output, "--format", "csv",
    ]);
    assert!(matches!(err, KeydiffError::InvalidInput { .. }), "{:?}", err);

    let err = runner.expect_failure(&[
        "compare",
        &old,
        &new,
        "-k",
        "id",
        "-o",
        &output,
        "--duplicate-keys",
        "first-wins",
    ]);
    assert!(matches!(err, KeydiffError::InvalidInput { .. }), "{:?}", err);
    assert!(!runner.fixture().path("report.out").exists());
}

#[test]
fn test_compare_requires_a_key() {
    let runner = CliTestRunner::new().unwrap();
    let (old, new) = customer_files(&runner);
    let output = runner.fixture().path_str("report.json");

    let err = runner.expect_failure(&["compare", &old, &new, "-o", &output]);
    assert!(matches!(err, KeydiffError::InvalidInput { .. }), "{:?}", err);
}

#[test]
fn test_key_spec_rejects_empty_and_repeated_columns() {
    assert!(matches!(
        KeySpec::new(Vec::<String>::new()),
        Err(KeydiffError::InvalidInput { .. })
    ));
    assert!(matches!(
        KeySpec::new(["id", "id"]),
        Err(KeydiffError::InvalidInput { .. })
    ));
}

#[test]
fn test_malformed_locators() {
    for bad in ["", "#table", "shop.duckdb#", "shop.duckdb#.orders", "shop.duckdb#main."] {
        assert!(
            matches!(TableLocator::parse(bad), Err(KeydiffError::InvalidInput { .. })),
            "locator '{}' should be rejected",
            bad
        );
    }
}

#[test]
fn test_missing_database_table() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    fixture
        .create_duckdb("shop.duckdb", sample_data::orders_database_sql())
        .unwrap();
    let db = fixture.path_str("shop.duckdb");
    let output = fixture.path_str("report.json");

    let err = runner.expect_failure(&[
        "compare",
        &format!("{}#old_orders", db),
        &format!("{}#returns", db),
        "-k",
        "order_id",
        "-o",
        &output,
    ]);
    assert!(matches!(err, KeydiffError::SourceUnavailable { .. }), "{:?}", err);

    let err = runner.expect_failure(&["compare", &db, &db, "-k", "order_id", "-o", &output]);
    assert!(matches!(err, KeydiffError::SourceUnavailable { .. }), "{:?}", err);
}
