//! # BST Lexer
//!
//! Tokenizes BibTeX style source into tokens. Words are classified with the
//! grammar descriptor from [`tree_sitter_bst::language`].
//!
//! ## Example
//!
//! ```rust
//! use bst_parser::lexer::{Lexer, TokenKind};
//!
//! let tokens = Lexer::new("FUNCTION {f} { #1 }").tokenize();
//! assert!(tokens[0].kind.is_keyword());
//! assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
//! ```

mod cursor;
mod token;

pub use cursor::Cursor;
pub use token::{LexErrorKind, Token, TokenKind};

use crate::span::{Position, Span};
use tree_sitter_bst::Grammar;

/// Characters that end a word besides whitespace.
const DELIMITERS: &[char] = &['{', '}', '%', '"', '#', '\''];

/// Whether `c` can appear in a word.
pub fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !DELIMITERS.contains(&c)
}

// =============================================================================
// LEXER
// =============================================================================

/// BST lexer.
///
/// Converts source text into a stream of tokens ending with [`TokenKind::Eof`].
/// Comments are kept as tokens so the parser can place them in the tree.
pub struct Lexer<'a> {
    /// Character cursor.
    cursor: Cursor<'a>,
    /// Descriptor used to classify words.
    grammar: &'static Grammar,
    /// Collected tokens.
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            grammar: tree_sitter_bst::language(),
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// ## Returns
    ///
    /// Vector of tokens, always ending with an EOF token.
    pub fn tokenize(mut self) -> Vec<Token> {
        loop {
            self.cursor.advance_while(char::is_whitespace);
            if self.cursor.is_eof() {
                break;
            }
            self.scan_token();
        }

        let eof = self.cursor.position();
        self.tokens
            .push(Token::new(TokenKind::Eof, Span::new(eof, eof), String::new()));
        self.tokens
    }

    /// Scan a single token.
    fn scan_token(&mut self) {
        let start = self.cursor.position();
        let Some(c) = self.cursor.advance() else {
            return;
        };

        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '\'' => TokenKind::Quote,
            '%' => {
                self.cursor.advance_while(|c| c != '\n');
                TokenKind::Comment
            }
            '"' => self.scan_string(),
            '#' => self.scan_integer(start),
            c if c.is_ascii_digit() => {
                self.cursor.advance_while(is_word_char);
                TokenKind::Error(LexErrorKind::InvalidCharacter)
            }
            _ => {
                self.cursor.advance_while(is_word_char);
                self.classify_word(self.cursor.slice_from(start))
            }
        };

        self.add_token(kind, start);
    }

    /// Scan the rest of a string literal after the opening quote.
    ///
    /// Strings have no escapes and end at the next `"` on the same line.
    fn scan_string(&mut self) -> TokenKind {
        self.cursor.advance_while(|c| c != '"' && c != '\n');
        if self.cursor.peek() == Some('"') {
            self.cursor.advance();
            TokenKind::String
        } else {
            TokenKind::Error(LexErrorKind::UnterminatedString)
        }
    }

    /// Scan the rest of an integer literal after the `#`.
    fn scan_integer(&mut self, start: Position) -> TokenKind {
        if matches!(self.cursor.peek(), Some('+' | '-')) {
            self.cursor.advance();
        }
        self.cursor.advance_while(|c| c.is_ascii_digit());

        // `#12abc` is one malformed token, not an integer followed by a word.
        if self.cursor.peek().is_some_and(is_word_char) {
            self.cursor.advance_while(is_word_char);
            return TokenKind::Error(LexErrorKind::InvalidInteger);
        }

        match self.cursor.slice_from(start)[1..].parse::<i64>() {
            Ok(_) => TokenKind::Integer,
            Err(_) => TokenKind::Error(LexErrorKind::InvalidInteger),
        }
    }

    /// Classify a word as keyword, operator, built-in or identifier.
    fn classify_word(&self, word: &str) -> TokenKind {
        if let Some(command) = self.grammar.command(word) {
            TokenKind::Keyword(command)
        } else if self.grammar.is_operator(word) {
            TokenKind::Operator
        } else if word.ends_with('$') {
            TokenKind::Builtin
        } else {
            TokenKind::Identifier
        }
    }

    /// Add token from `start` to the current position.
    fn add_token(&mut self, kind: TokenKind, start: Position) {
        let text = self.cursor.slice_from(start).to_string();
        let span = Span::new(start, self.cursor.position());
        self.tokens.push(Token::new(kind, span, text));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tree_sitter_bst::Command;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).tokenize().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_empty() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \n\t "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_lex_function() {
        let tokens = Lexer::new("FUNCTION {not} { { #0 } { #1 } if$ }").tokenize();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Command::Function),
                TokenKind::LBrace,
                TokenKind::Identifier,
                TokenKind::RBrace,
                TokenKind::LBrace,
                TokenKind::LBrace,
                TokenKind::Integer,
                TokenKind::RBrace,
                TokenKind::LBrace,
                TokenKind::Integer,
                TokenKind::RBrace,
                TokenKind::Builtin,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[2].text, "not");
        assert_eq!(tokens[6].text, "#0");
    }

    #[rstest]
    #[case("=", TokenKind::Operator)]
    #[case(":=", TokenKind::Operator)]
    #[case("*", TokenKind::Operator)]
    #[case("write$", TokenKind::Builtin)]
    #[case("sort.key$", TokenKind::Builtin)]
    #[case("format.names", TokenKind::Identifier)]
    #[case("iterate", TokenKind::Keyword(Command::Iterate))]
    #[case("Macro", TokenKind::Keyword(Command::Macro))]
    fn test_lex_word_classes(#[case] source: &str, #[case] expected: TokenKind) {
        assert_eq!(kinds(source), vec![expected, TokenKind::Eof]);
    }

    #[rstest]
    #[case("#0")]
    #[case("#-1")]
    #[case("#+42")]
    #[case("#9223372036854775807")]
    fn test_lex_integers(#[case] source: &str) {
        assert_eq!(kinds(source), vec![TokenKind::Integer, TokenKind::Eof]);
    }

    #[rstest]
    #[case("#")]
    #[case("#-")]
    #[case("#12abc")]
    #[case("#9223372036854775808")]
    fn test_lex_invalid_integers(#[case] source: &str) {
        assert_eq!(
            kinds(source),
            vec![TokenKind::Error(LexErrorKind::InvalidInteger), TokenKind::Eof]
        );
    }

    #[test]
    fn test_lex_string() {
        let tokens = Lexer::new("\"{\\em et~al.}\" write$").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "\"{\\em et~al.}\"");
        assert_eq!(tokens[1].kind, TokenKind::Builtin);
    }

    #[test]
    fn test_lex_unterminated_string_stops_at_newline() {
        let tokens = Lexer::new("\"abc\nREAD").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error(LexErrorKind::UnterminatedString));
        assert_eq!(tokens[0].text, "\"abc");
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Command::Read));
    }

    #[test]
    fn test_lex_comment_runs_to_end_of_line() {
        let tokens = Lexer::new("% a comment { }\nSORT").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text, "% a comment { }");
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Command::Sort));
        assert_eq!(tokens[1].span.start.line, 1);
    }

    #[test]
    fn test_lex_quote_splits_from_name() {
        assert_eq!(
            kinds("'skip$ 'x"),
            vec![
                TokenKind::Quote,
                TokenKind::Builtin,
                TokenKind::Quote,
                TokenKind::Identifier,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_lex_word_starting_with_digit_is_error() {
        assert_eq!(
            kinds("2nd"),
            vec![TokenKind::Error(LexErrorKind::InvalidCharacter), TokenKind::Eof]
        );
    }

    #[test]
    fn test_lex_delimiters_end_words() {
        let tokens = Lexer::new("{author}").tokenize();
        assert_eq!(tokens[1].text, "author");
        assert_eq!(tokens[1].span, Span::from_bytes(1, 7));
    }
}
