//! # Text Built-ins
//!
//! Brace-aware string functions. Text inside braces is protected from case
//! changes; a group that opens with `{\` at brace depth zero is a "special
//! character" and counts as a single character.

/// Case conversion selected by the `change.case$` specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    /// `t`: lower-case all but the first character and characters after `: `.
    Title,
    /// `l`
    Lower,
    /// `u`
    Upper,
}

impl CaseMode {
    /// Parse the specifier string; only its first character matters.
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.chars().next()?.to_ascii_lowercase() {
            't' => Some(Self::Title),
            'l' => Some(Self::Lower),
            'u' => Some(Self::Upper),
            _ => None,
        }
    }

    fn convert(&self, c: char, out: &mut String) {
        match self {
            Self::Upper => out.extend(c.to_uppercase()),
            Self::Title | Self::Lower => out.extend(c.to_lowercase()),
        }
    }
}

/// Byte index just past the `}` closing the group that opens at `start`,
/// or the end of the string if it never closes.
fn group_end(text: &str, start: usize) -> usize {
    let mut depth = 0usize;
    for (i, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return start + i + 1;
                }
            }
            _ => {}
        }
    }
    text.len()
}

fn is_special_at(text: &str, i: usize) -> bool {
    text[i..].starts_with("{\\")
}

/// `add.period$`: append a period unless the text already ends in `.?!`.
///
/// Closing braces at the end are skipped when looking for the last character.
pub fn add_period(text: &str) -> String {
    match text.trim_end_matches('}').chars().last() {
        None => text.to_string(),
        Some('.' | '?' | '!') => text.to_string(),
        Some(_) => format!("{}.", text),
    }
}

/// `change.case$`.
pub fn change_case(text: &str, mode: CaseMode) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut keep_next = true;
    let mut after_colon = false;
    let mut i = 0;

    while i < text.len() {
        if depth == 0 && is_special_at(text, i) {
            let end = group_end(text, i);
            convert_special(&text[i..end], mode, keep_next, &mut out);
            keep_next = false;
            after_colon = false;
            i = end;
            continue;
        }

        let Some(c) = text[i..].chars().next() else { break };
        i += c.len_utf8();
        match c {
            '{' => {
                depth += 1;
                keep_next = false;
                out.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                out.push(c);
            }
            _ if depth > 0 => out.push(c),
            _ => {
                if c == ':' {
                    after_colon = true;
                } else if c.is_whitespace() {
                    if after_colon {
                        keep_next = true;
                    }
                } else {
                    after_colon = false;
                }

                if mode == CaseMode::Title && keep_next && !c.is_whitespace() && c != ':' {
                    out.push(c);
                    keep_next = false;
                } else if c.is_whitespace() || c == ':' {
                    out.push(c);
                } else {
                    mode.convert(c, &mut out);
                    keep_next = false;
                }
            }
        }
    }
    out
}

/// Converts the letters of a special character group, leaving control
/// sequence names alone.
fn convert_special(group: &str, mode: CaseMode, keep: bool, out: &mut String) {
    if mode == CaseMode::Title && keep {
        out.push_str(group);
        return;
    }
    let mut in_command = false;
    for c in group.chars() {
        if c == '\\' {
            in_command = true;
            out.push(c);
        } else if in_command && c.is_ascii_alphabetic() {
            out.push(c);
        } else {
            in_command = false;
            if c.is_alphabetic() {
                mode.convert(c, out);
            } else {
                out.push(c);
            }
        }
    }
}

/// Control sequences whose names `purify$` keeps as letters.
const LETTER_COMMANDS: &[&str] = &["aa", "AA", "ae", "AE", "i", "j", "l", "L", "o", "O", "oe", "OE", "ss"];

/// `purify$`: keep alphanumerics, turn whitespace, `-` and `~` into spaces,
/// drop everything else. Special characters keep their letters.
pub fn purify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut i = 0;

    while i < text.len() {
        if depth == 0 && is_special_at(text, i) {
            let end = group_end(text, i);
            purify_special(&text[i..end], &mut out);
            i = end;
            continue;
        }
        let Some(c) = text[i..].chars().next() else { break };
        i += c.len_utf8();
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '-' | '~' => out.push(' '),
            _ if c.is_whitespace() => out.push(' '),
            _ if c.is_alphanumeric() => out.push(c),
            _ => {}
        }
    }
    out
}

fn purify_special(group: &str, out: &mut String) {
    let mut chars = group.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            let rest = &group[i + 1..];
            let name_len = rest
                .char_indices()
                .find(|(_, c)| !c.is_ascii_alphabetic())
                .map_or(rest.len(), |(j, _)| j);
            let name = &rest[..name_len];
            if LETTER_COMMANDS.contains(&name) {
                out.push_str(name);
            }
            for _ in 0..name.chars().count() {
                chars.next();
            }
        } else if c.is_alphanumeric() {
            out.push(c);
        }
    }
}

/// Splits text into its BibTeX characters: a special character group is one
/// item; other braces are separate items flagged as not counting.
fn text_chars(text: &str) -> Vec<(&str, bool)> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < text.len() {
        if depth == 0 && is_special_at(text, i) {
            let end = group_end(text, i);
            items.push((&text[i..end], true));
            i = end;
            continue;
        }
        let Some(c) = text[i..].chars().next() else { break };
        let next = i + c.len_utf8();
        match c {
            '{' => {
                depth += 1;
                items.push((&text[i..next], false));
            }
            '}' => {
                depth = depth.saturating_sub(1);
                items.push((&text[i..next], false));
            }
            _ => items.push((&text[i..next], true)),
        }
        i = next;
    }
    items
}

/// `text.length$`: characters excluding braces, special characters count once.
pub fn text_length(text: &str) -> usize {
    text_chars(text).iter().filter(|(_, counts)| *counts).count()
}

/// `text.prefix$`: the first `count` characters, with braces balanced.
pub fn text_prefix(text: &str, count: usize) -> String {
    let mut out = String::new();
    let mut taken = 0;
    let mut depth = 0usize;
    for (item, counts) in text_chars(text) {
        if counts {
            if taken == count {
                break;
            }
            taken += 1;
        } else if item == "{" {
            if taken == count {
                break;
            }
            depth += 1;
        } else {
            depth = depth.saturating_sub(1);
        }
        out.push_str(item);
    }
    out.extend(std::iter::repeat('}').take(depth));
    out
}

/// `substring$`: `len` characters starting at the 1-based position `start`.
///
/// A negative `start` counts from the end of the string and the substring
/// ends at that position.
pub fn substring(text: &str, start: i64, len: i64) -> String {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len() as i64;
    if start == 0 || len <= 0 || start.unsigned_abs() > total as u64 {
        return String::new();
    }
    let (begin, end) = if start > 0 {
        let begin = start - 1;
        (begin, begin.saturating_add(len).min(total))
    } else {
        let end = total + start + 1;
        (end.saturating_sub(len).max(0), end)
    };
    chars[begin as usize..end as usize].iter().collect()
}

/// `width$`: width of the text in hundredths of a point in cmr10.
pub fn width(text: &str) -> i64 {
    let mut total = 0;
    for (item, _) in text_chars(text) {
        if item.len() > 1 && item.starts_with("{\\") {
            total += special_width(item);
        } else {
            total += item.chars().map(char_width).sum::<i64>();
        }
    }
    total
}

fn special_width(group: &str) -> i64 {
    let inner = group.trim_start_matches('{').trim_end_matches('}');
    let name: String = inner
        .trim_start_matches('\\')
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    match name.as_str() {
        "ss" => 500,
        "ae" => 722,
        "oe" => 778,
        "AE" => 903,
        "OE" => 1014,
        _ => inner
            .chars()
            .skip(1 + name.len())
            .filter(|c| c.is_alphanumeric())
            .map(char_width)
            .sum::<i64>()
            .max(name.chars().map(char_width).sum::<i64>().min(500)),
    }
}

/// Width of one character in cmr10; unknown characters are zero.
fn char_width(c: char) -> i64 {
    match c {
        ' ' | '!' | '\'' | ',' | '.' | ':' | ';' | '[' | ']' | '`' => 278,
        '"' | '$' | '/' | '*' | '\\' | '^' | '{' | '}' | '~' => 500,
        '0'..='9' => 500,
        '#' | '%' => 833,
        '&' | '+' | '=' | '@' => 778,
        '(' | ')' => 389,
        '-' => 333,
        '<' => 278,
        '>' | '?' => 472,
        '|' => 1000,
        '_' => 500,
        'A' | 'H' | 'N' | 'U' | 'V' | 'X' | 'Y' => 750,
        'B' => 708,
        'C' | 'T' => 722,
        'D' => 764,
        'E' | 'P' => 681,
        'F' => 653,
        'G' => 785,
        'I' => 361,
        'J' => 514,
        'K' | 'O' | 'Q' => 778,
        'L' => 625,
        'M' => 917,
        'R' => 736,
        'S' => 556,
        'W' => 1028,
        'Z' => 611,
        'a' | 'g' | 'o' => 500,
        'b' | 'd' | 'h' | 'n' | 'p' | 'u' => 556,
        'c' | 'e' | 'z' => 444,
        'f' | 'j' => 306,
        'i' | 'l' => 278,
        'k' | 'q' | 'v' | 'x' | 'y' => 528,
        'm' => 833,
        'r' => 392,
        's' => 394,
        't' => 389,
        'w' => 722,
        _ => 0,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("Title", "Title.")]
    #[case("Done.", "Done.")]
    #[case("Really?", "Really?")]
    #[case("{Wow!}", "{Wow!}")]
    #[case("{Text}", "{Text}.")]
    fn test_add_period(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(add_period(input), expected);
    }

    #[rstest]
    #[case("The {TeX}book: A Guide", CaseMode::Title, "The {TeX}book: A guide")]
    #[case("HELLO World", CaseMode::Title, "Hello world")]
    #[case("Hello {World}", CaseMode::Upper, "HELLO {World}")]
    #[case("Hello {World}", CaseMode::Lower, "hello {World}")]
    #[case("{\\AE}sop", CaseMode::Upper, "{\\AE}SOP")]
    #[case("X {\\'E}cole", CaseMode::Lower, "x {\\'e}cole")]
    fn test_change_case(#[case] input: &str, #[case] mode: CaseMode, #[case] expected: &str) {
        assert_eq!(change_case(input, mode), expected);
    }

    #[rstest]
    #[case("t", Some(CaseMode::Title))]
    #[case("U", Some(CaseMode::Upper))]
    #[case("lower", Some(CaseMode::Lower))]
    #[case("x", None)]
    #[case("", None)]
    fn test_case_mode_parse(#[case] spec: &str, #[case] expected: Option<CaseMode>) {
        assert_eq!(CaseMode::parse(spec), expected);
    }

    #[rstest]
    #[case("Knuth, Donald E.", "Knuth Donald E")]
    #[case("Jean-Paul~Sartre", "Jean Paul Sartre")]
    #[case("{\\ss}uper", "ssuper")]
    #[case("{\\'E}cole", "Ecole")]
    #[case("{The} $x$", "The x")]
    fn test_purify(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(purify(input), expected);
    }

    #[rstest]
    #[case("abc", 3)]
    #[case("{abc}", 3)]
    #[case("{\\'e}t{\\'e}", 3)]
    #[case("", 0)]
    fn test_text_length(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(text_length(input), expected);
    }

    #[rstest]
    #[case("abcdef", 3, "abc")]
    #[case("{abc}def", 2, "{ab}")]
    #[case("{\\'e}cole", 1, "{\\'e}")]
    #[case("ab", 5, "ab")]
    #[case("abc", 0, "")]
    fn test_text_prefix(#[case] input: &str, #[case] count: usize, #[case] expected: &str) {
        assert_eq!(text_prefix(input, count), expected);
    }

    #[rstest]
    #[case("January", 1, 3, "Jan")]
    #[case("January", 4, 100, "uary")]
    #[case("January", -1, 3, "ary")]
    #[case("January", -3, 2, "ua")]
    #[case("January", -7, 10, "J")]
    #[case("January", 0, 3, "")]
    #[case("January", 8, 1, "")]
    #[case("January", 2, 0, "")]
    #[case("abc", 2, i64::MAX, "bc")]
    #[case("abc", -1, i64::MAX, "abc")]
    #[case("abc", i64::MIN, 1, "")]
    #[case("abc", i64::MAX, 1, "")]
    fn test_substring(
        #[case] input: &str,
        #[case] start: i64,
        #[case] len: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(substring(input, start, len), expected);
    }

    #[test]
    fn test_width() {
        assert_eq!(width(""), 0);
        assert_eq!(width("a"), 500);
        assert_eq!(width("ab"), 1056);
        assert_eq!(width("{\\ss}"), 500);
        assert!(width("WWW") > width("iii"));
    }
}
