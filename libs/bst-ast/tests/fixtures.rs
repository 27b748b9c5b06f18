use bst_ast::{Command, Module, ModuleError};
use std::path::PathBuf;

fn testdata(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../testdata")
        .join(name)
}

#[test]
fn loads_sample_from_path() {
    let module = Module::from_path(testdata("sample.bst")).unwrap();
    assert_eq!(module.list_functions(), vec!["init", "article", "presort"]);
    assert_eq!(module.commands().first(), Some(&Command::Read));
}

#[test]
fn every_sample_function_reduces() {
    let module = Module::from_path(testdata("sample.bst")).unwrap();
    let reductions = module.reductions();
    assert_eq!(reductions.len(), 3);
    for reduction in &reductions {
        assert_eq!(reduction.inputs, 0, "{}", reduction);
        assert_eq!(reduction.outputs, 0, "{}", reduction);
    }
}

#[test]
fn lowering_from_a_parsed_tree_matches_from_text() {
    let source = std::fs::read_to_string(testdata("booleans.bst")).unwrap();
    let cst = bst_parser::parse(&source);
    let from_cst = Module::from_cst(&cst).unwrap();
    let from_text = Module::from_text(&source).unwrap();
    assert_eq!(from_cst.list_functions(), from_text.list_functions());
    assert_eq!(from_cst.functions(), from_text.functions());
}

#[test]
fn syntax_error_carries_every_parse_error() {
    let err = Module::from_text("FUNCTION {a} { #x }\nFUNCTION {b} { \"open\n}").unwrap_err();
    match err {
        ModuleError::Syntax(errors) => assert_eq!(errors.len(), 2),
        other => panic!("expected syntax error, got {:?}", other),
    }
}
