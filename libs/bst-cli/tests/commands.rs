use bst_cli::commands::{self, LimitOverrides};
use std::path::PathBuf;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

#[test]
fn parse_prints_tree_without_errors() {
    let json = commands::parse(&testdata("sample.bst")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["root"].is_object());
    assert_eq!(value["errors"].as_array().map(Vec::len), Some(0));
}

#[test]
fn lower_reports_files_in_argument_order() {
    let files = vec![testdata("booleans.bst"), testdata("sample.bst")];
    let out = commands::lower(&files).unwrap();
    let booleans = out.find("booleans.bst").unwrap();
    let sample = out.find("sample.bst").unwrap();
    assert!(booleans < sample);
    assert!(out.contains("not(1 args) -> 1-tuple {"));
    assert!(out.contains("init(0 args) -> 0-tuple {"));
}

#[test]
fn lower_fails_on_any_bad_file() {
    let files = vec![testdata("sample.bst"), testdata("missing.bst")];
    let err = commands::lower(&files).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.bst"));
}

#[test]
fn run_uses_json_database() {
    let database = testdata("sample.json");
    let report = commands::run(
        &testdata("sample.bst"),
        Some(database.as_path()),
        LimitOverrides::default(),
    )
    .unwrap();
    assert!(report.output.starts_with("anon, Anonymous, Untitled work.\n"));
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn run_without_database_iterates_nothing() {
    let report = commands::run(&testdata("sample.bst"), None, LimitOverrides::default()).unwrap();
    assert!(report.output.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn run_honours_limit_overrides() {
    let limits = LimitOverrides {
        max_stack_size: Some(1),
        ..Default::default()
    };
    let database = testdata("sample.json");
    let err = commands::run(&testdata("sample.bst"), Some(database.as_path()), limits)
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Operand stack limit of 1 exceeded"));
}
