//! Character references, escapes and label normalization.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

const REPLACEMENT: char = '\u{FFFD}';

/// Decode the name of a named character reference (`amp` for `&amp;`).
///
/// Returns `None` when the name is not a known HTML entity.
pub fn decode_named(name: &str) -> Option<String> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let reference = format!("&{name};");
    match html_escape::decode_html_entities(&reference) {
        Cow::Owned(decoded) if decoded != reference => Some(decoded),
        _ => None,
    }
}

/// Decode the digits of a numeric character reference in base `radix`.
///
/// Code points HTML does not allow in documents (controls, surrogates,
/// noncharacters, anything above `U+10FFFF`) decode to `U+FFFD`. Returns
/// `None` when `value` is not a number in that base.
pub fn decode_numeric(value: &str, radix: u32) -> Option<char> {
    if value.is_empty() {
        return None;
    }
    let Ok(code) = u32::from_str_radix(value, radix) else {
        // Digits that overflow are still a number, just not a code point.
        return value
            .chars()
            .all(|c| c.is_digit(radix))
            .then_some(REPLACEMENT);
    };

    if is_disallowed(code) {
        return Some(REPLACEMENT);
    }
    Some(char::from_u32(code).unwrap_or(REPLACEMENT))
}

fn is_disallowed(code: u32) -> bool {
    code < 9
        || code == 11
        || (code > 13 && code < 32)
        || (code > 126 && code < 160)
        || (0xD800..=0xDFFF).contains(&code)
        || (0xFDD0..=0xFDEF).contains(&code)
        || code & 0xFFFF == 0xFFFF
        || code & 0xFFFF == 0xFFFE
        || code > 0x10FFFF
}

fn reference_regex() -> &'static Regex {
    static REFERENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    REFERENCE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\\([!-/:-@\[-`{-~])|&(#(?:[0-9]{1,7}|x[0-9a-f]{1,6})|[0-9a-z]{1,31});")
            .expect("Invalid reference regex")
    })
}

/// Resolve backslash escapes and character references in a string such as
/// a link label or destination.
///
/// Unknown named references are kept as written.
pub fn decode_string(value: &str) -> String {
    if !value.contains(['\\', '&']) {
        return value.to_string();
    }

    reference_regex()
        .replace_all(value, |caps: &Captures<'_>| {
            if let Some(escaped) = caps.get(1) {
                return escaped.as_str().to_string();
            }

            let whole = &caps[0];
            let body = &caps[2];
            match body.strip_prefix('#') {
                Some(digits) => {
                    let (digits, radix) = match digits.strip_prefix(['x', 'X']) {
                        Some(hex) => (hex, 16),
                        None => (digits, 10),
                    };
                    decode_numeric(digits, radix)
                        .unwrap_or(REPLACEMENT)
                        .to_string()
                }
                None => decode_named(body).unwrap_or_else(|| whole.to_string()),
            }
        })
        .into_owned()
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"[\t\n\r ]+").expect("Invalid whitespace regex"))
}

/// Normalize a label into the identifier used to match references with
/// their definitions.
///
/// Whitespace runs collapse to one space, outer spaces are dropped and the
/// result is case-folded (`ẞ` and `SS` both fold to `ss`).
pub fn normalize_identifier(value: &str) -> String {
    let collapsed = whitespace_regex().replace_all(value, " ");
    collapsed
        .trim_matches(' ')
        .to_lowercase()
        .to_uppercase()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("amp", Some("&"))]
    #[case("copy", Some("©"))]
    #[case("nope", None)]
    #[case("", None)]
    fn named_references(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(decode_named(name).as_deref(), expected);
    }

    #[rstest]
    #[case("35", 10, Some('#'))]
    #[case("23", 16, Some('#'))]
    #[case("1234", 10, Some('Ӓ'))]
    #[case("0", 10, Some(REPLACEMENT))]
    #[case("D800", 16, Some(REPLACEMENT))]
    #[case("FFFF", 16, Some(REPLACEMENT))]
    #[case("110000", 16, Some(REPLACEMENT))]
    #[case("9999999", 10, Some(REPLACEMENT))]
    #[case("zz", 16, None)]
    #[case("", 10, None)]
    fn numeric_references(#[case] value: &str, #[case] radix: u32, #[case] expected: Option<char>) {
        assert_eq!(decode_numeric(value, radix), expected);
    }

    #[rstest]
    #[case("plain", "plain")]
    #[case(r"a\*b", "a*b")]
    #[case(r"a\b", r"a\b")]
    #[case("a&amp;b", "a&b")]
    #[case("&#35;&#X23;", "##")]
    #[case("&bogus;", "&bogus;")]
    fn decode_strings(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(decode_string(value), expected);
    }

    #[rstest]
    #[case("Foo", "foo")]
    #[case("  a \n\t b  ", "a b")]
    #[case("ẞ", "ss")]
    fn identifiers(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(normalize_identifier(value), expected);
    }
}
