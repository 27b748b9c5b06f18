use bst_parser::{parse, Field, NodeKind};

const SAMPLE: &str = include_str!("../../../testdata/sample.bst");
const BOOLEANS: &str = include_str!("../../../testdata/booleans.bst");

#[test]
fn parses_sample_style_without_errors() {
    let cst = parse(SAMPLE);
    assert!(cst.is_ok(), "Errors: {:?}", cst.errors);
    assert!(!cst.root.has_error());

    let commands: Vec<_> = cst
        .root
        .children
        .iter()
        .filter(|n| n.kind.is_command())
        .map(|n| n.kind)
        .collect();
    assert_eq!(
        commands,
        vec![
            NodeKind::Entry,
            NodeKind::Integers,
            NodeKind::Strings,
            NodeKind::Macro,
            NodeKind::Function,
            NodeKind::Function,
            NodeKind::Function,
            NodeKind::Read,
            NodeKind::Execute,
            NodeKind::Iterate,
            NodeKind::Sort,
            NodeKind::Iterate,
        ]
    );
}

#[test]
fn boolean_functions_are_named_in_order() {
    let cst = parse(BOOLEANS);
    assert!(cst.is_ok(), "Errors: {:?}", cst.errors);
    let names: Vec<_> = cst
        .root
        .find_children(NodeKind::Function)
        .into_iter()
        .filter_map(|f| f.child_by_field(Field::Name))
        .map(|n| n.text_or_empty())
        .collect();
    assert_eq!(names, vec!["not", "and", "or"]);
}

#[test]
fn root_span_covers_whole_source() {
    let cst = parse(SAMPLE);
    assert_eq!(cst.root.span.start.byte, 0);
    assert_eq!(cst.root.span.end.byte, SAMPLE.len());
}

#[test]
fn node_spans_slice_back_to_their_text() {
    let cst = parse(SAMPLE);
    fn check(node: &bst_parser::CstNode, source: &str) {
        if let Some(text) = &node.text {
            if node.kind != NodeKind::Error {
                assert_eq!(node.span.slice(source), Some(text.as_str()), "{:?}", node.kind);
            }
        }
        for child in &node.children {
            check(child, source);
        }
    }
    check(&cst.root, SAMPLE);
}

#[test]
fn cst_serializes_to_json() {
    let cst = parse("READ");
    let json = serde_json::to_value(&cst.root).expect("serialize");
    assert_eq!(json["kind"], "source_file");
    assert_eq!(json["children"][0]["kind"], "read");
    assert_eq!(json["children"][0]["children"][0]["kind"]["keyword"], "read");
}
