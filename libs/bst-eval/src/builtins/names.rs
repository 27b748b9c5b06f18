//! # Name Built-ins
//!
//! Splitting of `and`-separated name lists and `format.name$`.
//!
//! A name is split into four parts, First, von, Last and Jr, according to
//! the number of top-level commas:
//!
//! | Form                  | Example                       |
//! |-----------------------|-------------------------------|
//! | `First von Last`      | `Ludwig van Beethoven`        |
//! | `von Last, First`     | `van Beethoven, Ludwig`       |
//! | `von Last, Jr, First` | `Ford, Jr., Henry`            |

use super::text::text_length;
use crate::error::{EvalError, EvalResult};

/// Formatted parts shorter than this are joined with a tie.
const LONG_TOKEN: usize = 3;

/// Split a name list at top-level `and` words.
pub fn split_names(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut name_start = 0;
    for (start, end) in top_level_words(text) {
        if text[start..end].eq_ignore_ascii_case("and") {
            push_name(&mut names, &text[name_start..start]);
            name_start = end;
        }
    }
    push_name(&mut names, &text[name_start..]);
    names
}

fn push_name<'a>(names: &mut Vec<&'a str>, name: &'a str) {
    let name = name.trim();
    if !name.is_empty() {
        names.push(name);
    }
}

/// Byte ranges of the whitespace-separated words at brace depth zero.
fn top_level_words(text: &str) -> Vec<(usize, usize)> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut word_start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match c {
            '{' => {
                depth += 1;
                word_start.get_or_insert(i);
            }
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && c.is_whitespace() => {
                if let Some(start) = word_start.take() {
                    words.push((start, i));
                }
            }
            _ => {
                word_start.get_or_insert(i);
            }
        }
    }
    if let Some(start) = word_start {
        words.push((start, text.len()));
    }
    words
}

/// `num.names$`
pub fn num_names(text: &str) -> usize {
    split_names(text).len()
}

// =============================================================================
// NAME PARTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Word {
    text: String,
    /// The word was joined to the previous one with a hyphen.
    hyphenated: bool,
}

/// A name split into its four parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct NameParts {
    first: Vec<Word>,
    von: Vec<Word>,
    last: Vec<Word>,
    jr: Vec<Word>,
}

fn split_commas(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in name.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(name[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(name[start..].trim());
    parts
}

fn split_words(segment: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    let mut hyphenated = false;

    for c in segment.chars() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            _ if depth == 0 && (c.is_whitespace() || c == '~' || c == '-') => {
                if !current.is_empty() {
                    words.push(Word {
                        text: std::mem::take(&mut current),
                        hyphenated,
                    });
                    hyphenated = false;
                }
                if c == '-' {
                    hyphenated = true;
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        words.push(Word {
            text: current,
            hyphenated,
        });
    }
    words
}

/// Whether a word starts with a lower-case letter, which marks a von part.
///
/// A special character decides by its first letter after the control
/// sequence; any other brace group counts as upper case.
fn is_von(word: &str) -> bool {
    let mut depth = 0usize;
    let mut chars = word.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if depth == 0 && chars.peek() == Some(&'\\') => {
                chars.next();
                let mut name_done = false;
                for c in chars.by_ref() {
                    if !name_done && c.is_ascii_alphabetic() {
                        continue;
                    }
                    name_done = true;
                    if c.is_alphabetic() {
                        return c.is_lowercase();
                    }
                    if c == '}' {
                        break;
                    }
                }
                return false;
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth > 0 => {}
            _ if c.is_alphabetic() => return c.is_lowercase(),
            _ => {}
        }
    }
    false
}

/// Split `von Last` words: von ends at the last lower-case word before the
/// final word.
fn split_von_last(words: Vec<Word>) -> (Vec<Word>, Vec<Word>) {
    let split = words
        .iter()
        .take(words.len().saturating_sub(1))
        .rposition(|w| is_von(&w.text))
        .map_or(0, |i| i + 1);
    let mut von = words;
    let last = von.split_off(split);
    (von, last)
}

fn parse_name(name: &str) -> EvalResult<NameParts> {
    let segments = split_commas(name);
    let parts = match segments.as_slice() {
        [whole] => {
            let words = split_words(whole);
            let count = words.len();
            let von_start = words
                .iter()
                .take(count.saturating_sub(1))
                .position(|w| is_von(&w.text));
            match von_start {
                Some(start) => {
                    let mut first = words;
                    let rest = first.split_off(start);
                    let (von, last) = split_von_last(rest);
                    NameParts { first, von, last, jr: Vec::new() }
                }
                None => {
                    let mut first = words;
                    let last = first.split_off(count.saturating_sub(1));
                    NameParts { first, last, ..Default::default() }
                }
            }
        }
        [von_last, first] => {
            let (von, last) = split_von_last(split_words(von_last));
            NameParts { first: split_words(first), von, last, jr: Vec::new() }
        }
        [von_last, jr, first] => {
            let (von, last) = split_von_last(split_words(von_last));
            NameParts {
                first: split_words(first),
                von,
                last,
                jr: split_words(jr),
            }
        }
        _ => {
            return Err(EvalError::InvalidArgument(format!(
                "too many commas in name \"{}\"",
                name
            )))
        }
    };
    Ok(parts)
}

// =============================================================================
// FORMATTING
// =============================================================================

/// `format.name$`: format the `index`-th (1-based) name of `names`.
pub fn format_name(names: &str, index: i64, pattern: &str) -> EvalResult<String> {
    let list = split_names(names);
    let name = usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| list.get(i))
        .ok_or_else(|| {
            EvalError::InvalidArgument(format!(
                "there is no name {} in \"{}\"",
                index, names
            ))
        })?;
    let parts = parse_name(name)?;
    format_parts(&parts, pattern)
}

fn format_parts(parts: &NameParts, pattern: &str) -> EvalResult<String> {
    let mut out = String::new();
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '{' {
            let end = matching_brace(rest);
            format_group(parts, &rest[1..end.saturating_sub(1).max(1)], &mut out)?;
            rest = &rest[end..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    Ok(out)
}

/// Byte index just past the brace matching the one at the start of `text`.
fn matching_brace(text: &str) -> usize {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    text.len()
}

fn format_group(parts: &NameParts, group: &str, out: &mut String) -> EvalResult<()> {
    // Find the part letter at the group's own brace level.
    let mut depth = 0usize;
    let mut letter_at = None;
    for (i, c) in group.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && c.is_ascii_alphabetic() => {
                letter_at = Some(i);
                break;
            }
            _ => {}
        }
    }
    let Some(at) = letter_at else {
        return Err(EvalError::InvalidArgument(format!(
            "no name part in format group \"{{{}}}\"",
            group
        )));
    };

    let prefix = &group[..at];
    let letter = group[at..].chars().next().map(|c| c.to_ascii_lowercase());
    let words = match letter {
        Some('f') => &parts.first,
        Some('v') => &parts.von,
        Some('l') => &parts.last,
        Some('j') => &parts.jr,
        _ => {
            return Err(EvalError::InvalidArgument(format!(
                "unknown name part in format group \"{{{}}}\"",
                group
            )))
        }
    };

    let mut after = &group[at + 1..];
    let full = after
        .chars()
        .next()
        .is_some_and(|c| Some(c.to_ascii_lowercase()) == letter);
    if full {
        after = &after[1..];
    }
    let separator = if after.starts_with('{') {
        let end = matching_brace(after);
        let sep = &after[1..end.saturating_sub(1).max(1)];
        after = &after[end..];
        Some(sep)
    } else {
        None
    };

    if words.is_empty() {
        return Ok(());
    }

    let mut part = String::new();
    for (i, word) in words.iter().enumerate() {
        if full {
            part.push_str(&word.text);
        } else {
            part.push_str(&abbreviate(&word.text));
        }
        let Some(next) = words.get(i + 1) else { break };
        match separator {
            Some(sep) => part.push_str(sep),
            None => {
                if !full {
                    part.push('.');
                }
                if next.hyphenated {
                    part.push('-');
                } else if i + 2 == words.len() || text_length(&part) < LONG_TOKEN {
                    part.push('~');
                } else {
                    part.push(' ');
                }
            }
        }
    }

    out.push_str(prefix);
    out.push_str(&part);
    match after.strip_suffix('~') {
        Some(head) => {
            out.push_str(head);
            out.push(if text_length(&part) < LONG_TOKEN { '~' } else { ' ' });
        }
        None => out.push_str(after),
    }
    Ok(())
}

/// First letter of a word; a leading brace group is kept whole.
fn abbreviate(word: &str) -> String {
    if word.starts_with('{') {
        return word[..matching_brace(word)].to_string();
    }
    word.chars()
        .find(|c| c.is_alphanumeric())
        .map(String::from)
        .unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("Donald E. Knuth", 1)]
    #[case("Knuth and Lamport", 2)]
    #[case("A AND B and C", 3)]
    #[case("{Barnes and Noble}", 1)]
    #[case("Sandy Anderson", 1)]
    fn test_num_names(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(num_names(input), expected);
    }

    #[test]
    fn test_split_names_keeps_text() {
        assert_eq!(
            split_names("Donald E. Knuth and Leslie Lamport"),
            vec!["Donald E. Knuth", "Leslie Lamport"]
        );
    }

    #[rstest]
    #[case("Donald E. Knuth", "{ff~}{vv~}{ll}{, jj}", "Donald~E. Knuth")]
    #[case("Donald E. Knuth", "{f.~}{vv~}{ll}{, jj}", "D.~E. Knuth")]
    #[case("Ludwig van Beethoven", "{vv~}{ll}", "van Beethoven")]
    #[case("van Beethoven, Ludwig", "{ll}, {ff}", "Beethoven, Ludwig")]
    #[case("Ford, Jr., Henry", "{ff~}{ll}{, jj}", "Henry Ford, Jr.")]
    #[case("Jean-Paul Sartre", "{f.~}{ll}", "J.-P. Sartre")]
    #[case("Knuth", "{ff~}{ll}", "Knuth")]
    #[case("D. Knuth", "{f.~}{ll}", "D.~Knuth")]
    #[case("Donald E. Knuth", "{ll}{ f{}}", "Knuth DE")]
    fn test_format_name(#[case] name: &str, #[case] pattern: &str, #[case] expected: &str) {
        assert_eq!(format_name(name, 1, pattern).unwrap(), expected);
    }

    #[test]
    fn test_format_name_selects_index() {
        let names = "Donald E. Knuth and Leslie Lamport";
        assert_eq!(format_name(names, 2, "{ll}").unwrap(), "Lamport");
        assert!(matches!(
            format_name(names, 3, "{ll}"),
            Err(EvalError::InvalidArgument(_))
        ));
        assert!(format_name(names, 0, "{ll}").is_err());
    }

    #[test]
    fn test_format_name_rejects_bad_patterns() {
        assert!(format_name("A B", 1, "{x}").is_err());
        assert!(format_name("A B", 1, "{, }").is_err());
        assert!(format_name("a, b, c, d", 1, "{ll}").is_err());
    }

    #[rstest]
    #[case("van", true)]
    #[case("Van", false)]
    #[case("{von}", false)]
    #[case("{\\'e}cole", true)]
    #[case("{\\'E}cole", false)]
    fn test_is_von(#[case] word: &str, #[case] expected: bool) {
        assert_eq!(is_von(word), expected);
    }
}
