use super::*;
use crate::database::Entry;
use rstest::rstest;

fn apply(primitive: Primitive, init: Vec<Value>) -> EvalResult<Vec<Value>> {
    let module = Module::default();
    let block = Block {
        instrs: vec![Instr::Apply(primitive)],
        ..Default::default()
    };
    Machine::new(&module).evaluate(&block, init)
}

/// Lowers `FUNCTION {f} { body }` after `decls` and calls `f`.
fn call_body(decls: &str, body: &str, init: Vec<Value>) -> EvalResult<Vec<Value>> {
    let source = format!("{} FUNCTION {{f}} {{ {} }}", decls, body);
    let module = Module::from_text(&source)?;
    Machine::new(&module).call("f", init)
}

fn int(value: i64) -> Value {
    Value::Integer(value)
}

fn string(value: &str) -> Value {
    Value::string(value)
}

// =============================================================================
// CONTROL FLOW
// =============================================================================

/// Test `not` from the boolean helpers on both inputs.
#[rstest]
#[case(0, 1)]
#[case(1, 0)]
fn test_cond(#[case] input: i64, #[case] expected: i64) {
    let module = Module::from_text("FUNCTION {not} {   { #0 } { #1 } if$ }").unwrap();
    let stack = Machine::new(&module).call("not", vec![int(input)]).unwrap();
    assert_eq!(stack, vec![int(expected)]);
}

#[test]
fn test_if_accepts_quoted_functions() {
    let stack = call_body("", "#1 'skip$ { \"no\" } if$", vec![]).unwrap();
    assert!(stack.is_empty());
    let stack = call_body("", "#0 'skip$ { \"no\" } if$", vec![]).unwrap();
    assert_eq!(stack, vec![string("no")]);
}

#[test]
fn test_while_counts() {
    let stack = call_body(
        "INTEGERS { i }",
        "#0 'i := { i #3 < } { i #1 + 'i := } while$ i",
        vec![],
    )
    .unwrap();
    assert_eq!(stack, vec![int(3)]);
}

#[test]
fn test_while_iteration_limit() {
    let module = Module::from_text("FUNCTION {f} { { #1 } { skip$ } while$ }").unwrap();
    let config = EvalConfig::default().with_max_while_iterations(10);
    let err = Machine::new(&module)
        .with_config(config)
        .call("f", vec![])
        .unwrap_err();
    assert!(matches!(err, EvalError::IterationLimit(10)));
}

#[test]
fn test_recursion_limit() {
    let module = Module::from_text("FUNCTION {f} { f }").unwrap();
    let config = EvalConfig::default().with_max_call_depth(50);
    let err = Machine::new(&module)
        .with_config(config)
        .call("f", vec![])
        .unwrap_err();
    assert!(matches!(err, EvalError::RecursionLimit(50)));
}

#[test]
fn test_user_functions_call_each_other() {
    let source = "FUNCTION {not} { { #0 } { #1 } if$ } \
                  FUNCTION {and} { 'skip$ { pop$ #0 } if$ } \
                  FUNCTION {f} { #1 #0 and not }";
    let module = Module::from_text(source).unwrap();
    assert_eq!(Machine::new(&module).call("F", vec![]).unwrap(), vec![int(1)]);
}

// =============================================================================
// OPERATORS
// =============================================================================

#[rstest]
#[case(int(0), int(0), 1)]
#[case(int(0), int(1), 0)]
#[case(int(1), int(1), 1)]
#[case(int(-1), int(1), 0)]
#[case(int(-1), int(-1), 1)]
#[case(string(""), string(""), 1)]
#[case(string(""), string("lorem ipsum"), 0)]
#[case(string("lorem"), string("ipsum"), 0)]
fn test_equal(#[case] lhs: Value, #[case] rhs: Value, #[case] expected: i64) {
    assert_eq!(apply(Primitive::Equal, vec![lhs, rhs]).unwrap(), vec![int(expected)]);
}

#[rstest]
#[case(0, 0)]
#[case(0, 1)]
#[case(1, 0)]
#[case(1, 1)]
#[case(-1, 1)]
#[case(-1, -1)]
fn test_less(#[case] lhs: i64, #[case] rhs: i64) {
    let expected = i64::from(lhs < rhs);
    assert_eq!(apply(Primitive::Less, vec![int(lhs), int(rhs)]).unwrap(), vec![int(expected)]);
}

#[rstest]
#[case(0, 0)]
#[case(-1, 1)]
#[case(1, -1)]
#[case(1, 1)]
fn test_greater(#[case] lhs: i64, #[case] rhs: i64) {
    let expected = i64::from(lhs > rhs);
    assert_eq!(
        apply(Primitive::Greater, vec![int(lhs), int(rhs)]).unwrap(),
        vec![int(expected)]
    );
}

#[rstest]
#[case(0, 0)]
#[case(-54, -20)]
#[case(-4076, 6340)]
#[case(433921, -197378)]
fn test_add_and_sub(#[case] lhs: i64, #[case] rhs: i64) {
    assert_eq!(apply(Primitive::Add, vec![int(lhs), int(rhs)]).unwrap(), vec![int(lhs + rhs)]);
    assert_eq!(
        apply(Primitive::Subtract, vec![int(lhs), int(rhs)]).unwrap(),
        vec![int(lhs - rhs)]
    );
}

#[rstest]
#[case("", "")]
#[case("lorem", "ipsum")]
fn test_concat(#[case] lhs: &str, #[case] rhs: &str) {
    let stack = apply(Primitive::Concat, vec![string(lhs), string(rhs)]).unwrap();
    assert_eq!(stack, vec![Value::String(format!("{}{}", lhs, rhs))]);
}

#[test]
fn test_operand_type_errors() {
    let err = apply(Primitive::Equal, vec![int(1), string("1")]).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
    let err = apply(Primitive::Add, vec![int(1), string("1")]).unwrap_err();
    assert_eq!(err.to_string(), "Type error in +: expected integer, found string");
    let err = apply(Primitive::Add, vec![int(i64::MAX), int(1)]).unwrap_err();
    assert!(matches!(err, EvalError::InvalidArgument(_)));
}

#[test]
fn test_stack_underflow() {
    let err = apply(Primitive::Pop, vec![]).unwrap_err();
    assert!(matches!(err, EvalError::StackUnderflow(ref name) if name == "pop$"));
}

#[test]
fn test_stack_overflow() {
    let module = Module::from_text("FUNCTION {f} { #1 #2 #3 #4 }").unwrap();
    let config = EvalConfig::default().with_max_stack_size(3);
    let err = Machine::new(&module)
        .with_config(config)
        .call("f", vec![])
        .unwrap_err();
    assert!(matches!(err, EvalError::StackOverflow(3)));
}

#[test]
fn test_swap_and_duplicate() {
    assert_eq!(
        apply(Primitive::Swap, vec![int(1), int(2)]).unwrap(),
        vec![int(2), int(1)]
    );
    assert_eq!(
        apply(Primitive::Duplicate, vec![string("x")]).unwrap(),
        vec![string("x"), string("x")]
    );
}

// =============================================================================
// VARIABLES
// =============================================================================

#[test]
fn test_assign_global() {
    let module =
        Module::from_text("INTEGERS { n } STRINGS { s } FUNCTION {f} { #5 'n := \"v\" 's := }")
            .unwrap();
    let mut machine = Machine::new(&module);
    assert_eq!(machine.global("n"), Some(&int(0)));
    machine.call("f", vec![]).unwrap();
    assert_eq!(machine.global("n"), Some(&int(5)));
    assert_eq!(machine.global("s"), Some(&string("v")));
}

#[test]
fn test_assign_checks_target() {
    let err = call_body("", "#1 'skip$ :=", vec![]).unwrap_err();
    assert!(matches!(err, EvalError::NotAssignable(ref name) if name == "skip$"));

    let err = call_body("INTEGERS { n }", "\"text\" 'n :=", vec![]).unwrap_err();
    assert!(matches!(err, EvalError::TypeMismatch { .. }));
}

#[test]
fn test_global_strings_are_truncated() {
    let module = Module::from_text("STRINGS { s } FUNCTION {f} { \"abcdef\" 's := }").unwrap();
    let config = EvalConfig {
        global_max: 3,
        ..EvalConfig::default()
    };
    let mut machine = Machine::new(&module).with_config(config);
    machine.call("f", vec![]).unwrap();
    assert_eq!(machine.global("s"), Some(&string("abc")));
    assert_eq!(machine.warnings().len(), 1);
}

#[test]
fn test_builtin_integers() {
    let stack = call_body("", "entry.max$ global.max$", vec![]).unwrap();
    assert_eq!(stack, vec![int(250), int(20_000)]);
}

#[test]
fn test_unknown_identifier() {
    let err = call_body("", "nothing", vec![]).unwrap_err();
    assert!(matches!(err, EvalError::UnknownIdentifier(ref name) if name == "nothing"));
    let module = Module::from_text("FUNCTION {g} { }").unwrap();
    assert!(Machine::new(&module).call("missing", vec![]).is_err());
}

#[test]
fn test_entry_access_needs_current_entry() {
    let err = call_body("ENTRY { title } { } { }", "title", vec![]).unwrap_err();
    assert!(matches!(err, EvalError::NoCurrentEntry(ref name) if name == "title"));
    let err = call_body("", "cite$", vec![]).unwrap_err();
    assert!(matches!(err, EvalError::NoCurrentEntry(_)));
}

#[test]
fn test_entry_fields_and_variables() {
    let module = Module::from_text(
        "ENTRY { title year } { n } { label } \
         FUNCTION {f} { #7 'n := title 'label := cite$ type$ year missing$ }",
    )
    .unwrap();
    let database = Database {
        preambles: Vec::new(),
        entries: vec![Entry::new("key1", "Article").with_field("Title", "T")],
    };
    let mut machine = Machine::new(&module).with_database(database);
    machine.read();
    machine.select_entry(Some(0)).unwrap();
    let stack = machine.call("f", vec![]).unwrap();
    assert_eq!(stack, vec![string("key1"), string("article"), int(1)]);
    assert_eq!(machine.entry_value(0, "n"), Some(&int(7)));
    assert_eq!(machine.entry_value(0, "label"), Some(&string("T")));
    assert!(machine.select_entry(Some(1)).is_err());
}

// =============================================================================
// STRINGS AND OUTPUT
// =============================================================================

#[rstest]
#[case("\"hello World\" \"u\" change.case$", string("HELLO WORLD"))]
#[case("\"January\" #1 #3 substring$", string("Jan"))]
#[case("\"{\\'e}t{\\'e}\" text.length$", int(3))]
#[case("\"abc\" #2 text.prefix$", string("ab"))]
#[case("#65 int.to.chr$", string("A"))]
#[case("\"A\" chr.to.int$", int(65))]
#[case("#42 int.to.str$", string("42"))]
#[case("\"Knuth and Lamport\" num.names$", int(2))]
#[case("\"Donald E. Knuth\" #1 \"{vv~}{ll}\" format.name$", string("Knuth"))]
#[case("\"A title\" add.period$", string("A title."))]
#[case("\"a-b\" purify$", string("a b"))]
#[case("\"  \" empty$", int(1))]
#[case("quote$", string("\""))]
fn test_string_builtins(#[case] body: &str, #[case] expected: Value) {
    assert_eq!(call_body("", body, vec![]).unwrap(), vec![expected]);
}

#[rstest]
#[case("\"Jan\" chr.to.int$")]
#[case("#-1 int.to.chr$")]
#[case("\"A\" #2 \"{ll}\" format.name$")]
#[case("#9223372036854775807 #1 +")]
#[case("#-9223372036854775808 #1 -")]
fn test_invalid_arguments(#[case] body: &str) {
    let err = call_body("", body, vec![]).unwrap_err();
    assert!(matches!(err, EvalError::InvalidArgument(_)), "{err}");
}

#[test]
fn test_illegal_case_spec_warns() {
    let module = Module::from_text("FUNCTION {f} { \"Ab\" \"x\" change.case$ }").unwrap();
    let mut machine = Machine::new(&module);
    assert_eq!(machine.call("f", vec![]).unwrap(), vec![string("Ab")]);
    assert_eq!(machine.warnings().len(), 1);
}

#[test]
fn test_write_and_newline() {
    let module = Module::from_text("FUNCTION {f} { \"a\" write$ \"b\" write$ newline$ \"c\" write$ }")
        .unwrap();
    let mut machine = Machine::new(&module);
    machine.call("f", vec![]).unwrap();
    assert_eq!(machine.output(), "ab\n");
}
