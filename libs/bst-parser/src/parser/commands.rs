//! # Command Parsing
//!
//! Top-level commands:
//!
//! ```text
//! entry     = ENTRY id_list@fields id_list@integers id_list@strings
//! integers  = INTEGERS id_list@names
//! strings   = STRINGS id_list@names
//! macro     = MACRO "{" id@name "}" "{" string@value "}"
//! function  = FUNCTION "{" id@name "}" block@body
//! execute   = EXECUTE "{" (id | builtin)@function "}"   (same for ITERATE, REVERSE)
//! read      = READ
//! sort      = SORT
//! ```

use super::Parser;
use crate::cst::{CstNode, Field, NodeKind};
use crate::error::ParseError;
use crate::lexer::TokenKind;
use tree_sitter_bst::Command;

impl<'a> Parser<'a> {
    /// Parse a top-level command or comment.
    pub(super) fn parse_command(&mut self) -> Result<CstNode, ParseError> {
        let command = match self.peek_kind() {
            TokenKind::Comment => return Ok(self.leaf(NodeKind::Comment)),
            TokenKind::Keyword(command) => command,
            _ => return Err(self.error_here("command")),
        };

        let start = self.current_position();
        let mut children = vec![self.leaf(NodeKind::Keyword(command))];

        match command {
            Command::Entry => {
                for field in [Field::Fields, Field::Integers, Field::Strings] {
                    self.comments(&mut children);
                    children.push(self.parse_id_list()?.in_field(field));
                }
            }
            Command::Integers | Command::Strings => {
                self.comments(&mut children);
                children.push(self.parse_id_list()?.in_field(Field::Names));
            }
            Command::Macro => {
                self.parse_braced_id(Field::Name, &mut children)?;
                self.parse_braced_string(&mut children)?;
            }
            Command::Function => {
                self.parse_braced_id(Field::Name, &mut children)?;
                self.comments(&mut children);
                children.push(self.parse_block()?.in_field(Field::Body));
            }
            Command::Execute | Command::Iterate | Command::Reverse => {
                self.parse_braced_target(&mut children)?;
            }
            Command::Read | Command::Sort => {}
        }

        Ok(CstNode::with_children(
            NodeKind::for_command(command),
            self.span_from(start),
            children,
        ))
    }

    /// Parse `"{" id "}"`, placing the id in `field`.
    fn parse_braced_id(&mut self, field: Field, children: &mut Vec<CstNode>) -> Result<(), ParseError> {
        self.comments(children);
        children.push(self.expect_leaf(TokenKind::LBrace, NodeKind::LBrace)?);
        self.comments(children);
        children.push(self.expect_id()?.in_field(field));
        self.comments(children);
        children.push(self.expect_leaf(TokenKind::RBrace, NodeKind::RBrace)?);
        Ok(())
    }

    /// Parse `"{" (id | builtin) "}"` naming the function a command runs.
    fn parse_braced_target(&mut self, children: &mut Vec<CstNode>) -> Result<(), ParseError> {
        self.comments(children);
        children.push(self.expect_leaf(TokenKind::LBrace, NodeKind::LBrace)?);
        self.comments(children);
        let target = match self.peek_kind() {
            kind if kind.is_identifier() => self.leaf(NodeKind::Id),
            TokenKind::Builtin => self.leaf(NodeKind::Builtin),
            _ => return Err(self.error_here("function name")),
        };
        children.push(target.in_field(Field::Function));
        self.comments(children);
        children.push(self.expect_leaf(TokenKind::RBrace, NodeKind::RBrace)?);
        Ok(())
    }

    /// Parse `"{" string "}"` of a macro definition.
    fn parse_braced_string(&mut self, children: &mut Vec<CstNode>) -> Result<(), ParseError> {
        self.comments(children);
        children.push(self.expect_leaf(TokenKind::LBrace, NodeKind::LBrace)?);
        self.comments(children);
        if !self.check(TokenKind::String) {
            return Err(self.error_here("string"));
        }
        children.push(self.parse_string().in_field(Field::Value));
        self.comments(children);
        children.push(self.expect_leaf(TokenKind::RBrace, NodeKind::RBrace)?);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::cst::{Field, NodeKind};
    use crate::error::ParseErrorKind;
    use crate::parse;
    use rstest::rstest;

    #[rstest]
    #[case("READ", "(source_file (read))")]
    #[case("sort", "(source_file (sort))")]
    #[case("EXECUTE {begin.bib}", "(source_file (execute function: (id)))")]
    #[case("ITERATE {call.type$}", "(source_file (iterate function: (builtin)))")]
    #[case("EXECUTE {#1}", "(source_file (ERROR))")]
    #[case("REVERSE {reverse.pass}", "(source_file (reverse function: (id)))")]
    #[case("INTEGERS { output.state before.all }", "(source_file (integers names: (id_list (id) (id))))")]
    #[case("STRINGS { s t }", "(source_file (strings names: (id_list (id) (id))))")]
    #[case(
        "MACRO {jan} {\"January\"}",
        "(source_file (macro name: (id) value: (string value: (string_content))))"
    )]
    #[case(
        "FUNCTION {not} { { #0 } { #1 } if$ }",
        "(source_file (function name: (id) body: (block term: (block term: (integer value: (number))) term: (block term: (integer value: (number))) term: (builtin))))"
    )]
    fn test_parse_commands(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(crate::parse(source).root.to_sexp(), expected);
    }

    #[test]
    fn test_parse_entry_fields() {
        let cst = parse("ENTRY { address author } { } { label }");
        assert!(cst.is_ok(), "Errors: {:?}", cst.errors);
        let entry = &cst.root.children[0];
        assert_eq!(entry.kind, NodeKind::Entry);

        let fields = entry.child_by_field(Field::Fields).expect("fields");
        let names: Vec<_> = fields.named_children().map(|n| n.text_or_empty()).collect();
        assert_eq!(names, vec!["address", "author"]);

        let integers = entry.child_by_field(Field::Integers).expect("integers");
        assert_eq!(integers.named_children().count(), 0);

        let strings = entry.child_by_field(Field::Strings).expect("strings");
        assert_eq!(strings.named_children().next().map(|n| n.text_or_empty()), Some("label"));
    }

    #[test]
    fn test_parse_function_name_and_span() {
        let source = "FUNCTION {new.block}\n{ 'output.nonnull 'output := }";
        let cst = parse(source);
        assert!(cst.is_ok(), "Errors: {:?}", cst.errors);
        let function = &cst.root.children[0];
        let name = function.child_by_field(Field::Name).expect("name");
        assert_eq!(name.text_or_empty(), "new.block");
        assert_eq!(function.span.start.byte, 0);
        assert_eq!(function.span.end.byte, source.len());
        assert_eq!(function.span.end.line, 1);
    }

    #[test]
    fn test_parse_keywords_are_case_insensitive() {
        let cst = parse("Function {f} { } execute {f}");
        assert!(cst.is_ok(), "Errors: {:?}", cst.errors);
        assert_eq!(cst.root.children.len(), 2);
        assert_eq!(cst.root.children[0].children[0].text_or_empty(), "Function");
    }

    #[test]
    fn test_parse_comments_between_commands_and_inside() {
        let cst = parse("% header\nFUNCTION % name follows\n{f} { }\n% trailer");
        assert!(cst.is_ok(), "Errors: {:?}", cst.errors);
        assert_eq!(
            cst.root.to_sexp(),
            "(source_file (comment) (function (comment) name: (id) body: (block)) (comment))"
        );
    }

    #[test]
    fn test_parse_keywords_as_names() {
        let cst = parse("FUNCTION {sort} { read } EXECUTE {sort} INTEGERS { entry }");
        assert!(cst.is_ok(), "Errors: {:?}", cst.errors);
        assert_eq!(
            cst.root.to_sexp(),
            "(source_file (function name: (id) body: (block term: (id))) \
             (execute function: (id)) (integers names: (id_list (id))))"
        );
        let name = cst.root.children[0].child_by_field(Field::Name).expect("name");
        assert_eq!(name.text_or_empty(), "sort");
    }

    #[test]
    fn test_parse_macro_requires_string() {
        let cst = parse("MACRO {jan} {January}");
        assert_eq!(cst.errors.len(), 1);
        assert_eq!(
            cst.errors[0].kind,
            ParseErrorKind::UnexpectedToken {
                found: "January".to_string(),
                expected: "string".to_string(),
            }
        );
    }
}
