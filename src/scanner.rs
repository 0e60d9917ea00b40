//! Low-level scanning routines
//!
//! Pure `(source, offset) -> new_offset` consumers implementing the
//! spec-defined micro-algorithms (escape, name, number, bad-url recovery)
//! plus a few allocation-free comparison helpers. All offsets are byte
//! offsets into the source and always land on UTF-8 character boundaries.

use crate::char_codes::{
    is_digit, is_hex_digit, is_newline, is_uppercase_letter, is_valid_escape, is_white_space,
};

const REVERSE_SOLIDUS: u32 = 0x5C;
const RIGHT_PARENTHESIS: u32 = 0x29;
const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Returns the code point starting at a byte offset, or 0 past the end of
/// input.
///
/// The offset must be a character boundary; every scanner in this crate
/// advances by whole code points, so the invariant holds by construction.
#[inline]
pub fn char_code_at(source: &str, offset: usize) -> u32 {
    match source.as_bytes().get(offset) {
        Some(&byte) if byte < 0x80 => byte as u32,
        Some(_) => source
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, |c| c as u32),
        None => 0,
    }
}

/// UTF-8 width of a code point in bytes
#[inline]
pub(crate) const fn char_width(code: u32) -> usize {
    if code < 0x80 {
        1
    } else if code < 0x800 {
        2
    } else if code < 0x10000 {
        3
    } else {
        4
    }
}

/// Returns the code points at an offset and the two following positions,
/// with 0 standing in past the end of input
#[inline]
pub(crate) fn lookahead3(source: &str, offset: usize) -> (u32, u32, u32) {
    let mut chars = source[offset.min(source.len())..].chars();
    let first = chars.next().map_or(0, |c| c as u32);
    let second = chars.next().map_or(0, |c| c as u32);
    let third = chars.next().map_or(0, |c| c as u32);
    (first, second, third)
}

/// Length of the newline starting at `offset` whose first code point is
/// `code`: 2 for a CRLF pair, otherwise 1
#[inline]
pub fn get_newline_length(source: &str, offset: usize, code: u32) -> usize {
    if code == 0x0D && char_code_at(source, offset + 1) == 0x0A {
        2
    } else {
        1
    }
}

/// Compares the code point at `offset` against a reference ASCII code,
/// ignoring case
#[inline]
pub fn cmp_char(source: &str, offset: usize, reference_code: u32) -> bool {
    if offset >= source.len() {
        return false;
    }
    let mut code = char_code_at(source, offset);
    if is_uppercase_letter(code) {
        code |= 32;
    }
    code == reference_code
}

/// Compares the `start..end` byte range of `source` against a reference
/// string, ignoring ASCII case. Never allocates.
pub fn cmp_str(source: &str, start: usize, end: usize, reference: &str) -> bool {
    if start > end || end > source.len() || end - start != reference.len() {
        return false;
    }
    source.as_bytes()[start..end]
        .iter()
        .zip(reference.as_bytes())
        .all(|(&a, &b)| a.to_ascii_lowercase() == b.to_ascii_lowercase())
}

/// Returns the offset of the first non-whitespace code point at or after
/// `offset`
pub fn find_white_space_end(source: &str, mut offset: usize) -> usize {
    while offset < source.len() && is_white_space(char_code_at(source, offset)) {
        offset += 1;
    }
    offset
}

/// Returns the offset of the first non-digit code point at or after `offset`
pub fn find_decimal_number_end(source: &str, mut offset: usize) -> usize {
    while offset < source.len() && is_digit(char_code_at(source, offset)) {
        offset += 1;
    }
    offset
}

/// § 4.3.7. Consume an escaped code point
///
/// `offset` points just *after* the U+005C REVERSE SOLIDUS, which the caller
/// has already verified begins a valid escape. Consumes either 1–6 hex digits
/// followed by at most one whitespace code point (a CRLF pair counts as one),
/// or a single arbitrary code point. Clamps at the end of input, so an escape
/// cut short by EOF consumes nothing past the backslash.
pub fn consume_escaped(source: &str, mut offset: usize) -> usize {
    if offset >= source.len() {
        return offset;
    }

    let first = char_code_at(source, offset);
    offset += char_width(first);

    if is_hex_digit(first) {
        let max_offset = source.len().min(offset + 5);
        while offset < max_offset && is_hex_digit(char_code_at(source, offset)) {
            offset += 1;
        }

        if offset < source.len() {
            let code = char_code_at(source, offset);
            if is_white_space(code) {
                offset += get_newline_length(source, offset, code);
            }
        }
    }

    offset
}

/// § 4.3.11. Consume a name
///
/// Consumes a maximal run of name code points and valid escapes. This
/// routine does not verify that the run begins validly as an identifier;
/// callers must have established identifier-start conditions first.
pub fn consume_name(source: &str, mut offset: usize) -> usize {
    while offset < source.len() {
        let code = char_code_at(source, offset);

        if crate::char_codes::is_name(code) {
            offset += char_width(code);
            continue;
        }

        // the backslash is one byte wide, so offset + 1 stays on a boundary
        if code == REVERSE_SOLIDUS && !is_newline(char_code_at(source, offset + 1)) {
            offset = consume_escaped(source, offset + 1);
            continue;
        }

        break;
    }
    offset
}

/// § 4.3.12. Consume a number
///
/// Consumes an optional sign, integer part, optional fraction and optional
/// exponent, returning the offset past the longest valid match. No numeric
/// value is computed; value interpretation is the caller's concern.
pub fn consume_number(source: &str, mut offset: usize) -> usize {
    let mut code = char_code_at(source, offset);

    if code == 0x2B || code == 0x2D {
        // U+002B PLUS SIGN, U+002D HYPHEN-MINUS
        offset += 1;
        code = char_code_at(source, offset);
    }

    if is_digit(code) {
        offset = find_decimal_number_end(source, offset + 1);
        code = char_code_at(source, offset);
    }

    if code == 0x2E && is_digit(char_code_at(source, offset + 1)) {
        // U+002E FULL STOP followed by a digit
        offset = find_decimal_number_end(source, offset + 2);
        code = char_code_at(source, offset);
    }

    if cmp_char(source, offset, 0x65) {
        // e or E
        let mut sign = 0;
        code = char_code_at(source, offset + 1);

        if code == 0x2D || code == 0x2B {
            sign = 1;
            code = char_code_at(source, offset + 2);
        }

        if is_digit(code) {
            offset = find_decimal_number_end(source, offset + 1 + sign + 1);
        }
    }

    offset
}

/// § 4.3.14. Consume the remnants of a bad url
///
/// Consumes enough of the input to reach a recovery point where normal
/// tokenizing can resume: through the first unescaped U+0029 RIGHT
/// PARENTHESIS inclusive, or to EOF. Well-formed escapes along the way are
/// skipped, so an escaped `\)` does not terminate the remnants; a trailing
/// unescaped backslash before EOF is consumed.
pub fn consume_bad_url_remnants(source: &str, mut offset: usize) -> usize {
    while offset < source.len() {
        let code = char_code_at(source, offset);

        if code == RIGHT_PARENTHESIS {
            offset += 1;
            break;
        }

        // the backslash is one byte wide, so offset + 1 stays on a boundary
        if code == REVERSE_SOLIDUS && is_valid_escape(code, char_code_at(source, offset + 1)) {
            offset = consume_escaped(source, offset + 1);
        } else {
            offset += char_width(code);
        }
    }
    offset
}

/// Decodes an escape body (without the leading backslash) to the code point
/// it represents.
///
/// Hex escape values of zero, surrogates, or values above U+10FFFF decode to
/// U+FFFD REPLACEMENT CHARACTER per § 4.3.7; an empty body (escape cut short
/// by EOF) decodes to U+FFFD as well. A single non-hex code point decodes to
/// itself.
pub fn decode_escaped(escaped: &str) -> char {
    let bytes = escaped.as_bytes();

    let leading_hex = match bytes.first() {
        Some(byte) => byte.is_ascii_hexdigit(),
        None => return REPLACEMENT_CHARACTER,
    };

    if !leading_hex {
        return escaped.chars().next().map_or(REPLACEMENT_CHARACTER, |c| c);
    }

    let mut code: u32 = 0;
    for &byte in bytes.iter().take(6) {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => break,
        };
        code = code * 16 + digit as u32;
    }

    if code == 0 {
        return REPLACEMENT_CHARACTER;
    }
    char::from_u32(code).unwrap_or(REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_code_at_basics() {
        assert_eq!(char_code_at("abc", 0), b'a' as u32);
        assert_eq!(char_code_at("abc", 2), b'c' as u32);
        assert_eq!(char_code_at("abc", 3), 0);
        assert_eq!(char_code_at("é", 0), 'é' as u32);
    }

    #[test]
    fn newline_length() {
        assert_eq!(get_newline_length("\r\n", 0, 0x0D), 2);
        assert_eq!(get_newline_length("\r", 0, 0x0D), 1);
        assert_eq!(get_newline_length("\n", 0, 0x0A), 1);
    }

    #[test]
    fn cmp_char_case_insensitive() {
        assert!(cmp_char("E", 0, b'e' as u32));
        assert!(cmp_char("e", 0, b'e' as u32));
        assert!(!cmp_char("f", 0, b'e' as u32));
        assert!(!cmp_char("", 0, b'e' as u32));
    }

    #[test]
    fn cmp_str_ranges() {
        let source = "div.URL(example)";
        assert!(cmp_str(source, 4, 7, "url"));
        assert!(cmp_str(source, 4, 7, "URL"));
        assert!(!cmp_str(source, 4, 7, "uri"));
        assert!(!cmp_str(source, 4, 8, "url"));
        assert!(!cmp_str(source, 4, 100, "url"));
    }

    #[test]
    fn whitespace_and_digit_runs() {
        assert_eq!(find_white_space_end("  \t\nx", 0), 4);
        assert_eq!(find_white_space_end("x", 0), 0);
        assert_eq!(find_decimal_number_end("123x", 0), 3);
        assert_eq!(find_decimal_number_end("x", 0), 0);
    }

    #[test]
    fn escapes() {
        // "\41 B" — offset just after the backslash
        assert_eq!(consume_escaped("41 B", 0), 3); // hex digits plus one whitespace
        assert_eq!(consume_escaped("n", 0), 1); // single code point
        assert_eq!(consume_escaped("abcdef0", 0), 6); // at most six hex digits
        assert_eq!(consume_escaped("", 0), 0); // escape cut short by EOF
        assert_eq!(consume_escaped("41\r\nx", 0), 4); // CRLF counts as one whitespace
    }

    #[test]
    fn names() {
        assert_eq!(consume_name("foo-bar{", 0), 7);
        assert_eq!(consume_name("foo\\2b bar ", 0), 10);
        assert_eq!(consume_name("héllo ", 0), 6);
        assert_eq!(consume_name("a\\\nb", 0), 1); // backslash-newline ends the name
    }

    #[test]
    fn numbers() {
        assert_eq!(consume_number("123", 0), 3);
        assert_eq!(consume_number("12.5px", 0), 4);
        assert_eq!(consume_number("-1e-3;", 0), 5);
        assert_eq!(consume_number("+.5e2", 0), 5);
        assert_eq!(consume_number("12.em", 0), 2); // dot not followed by digit
        assert_eq!(consume_number("1e", 0), 1); // bare exponent marker
        assert_eq!(consume_number("1e+", 0), 1);
    }

    #[test]
    fn bad_url_remnants() {
        // closing paren is consumed
        assert_eq!(consume_bad_url_remnants("a b)x", 0), 4);
        // escaped paren does not terminate
        assert_eq!(consume_bad_url_remnants("a\\))", 0), 4);
        // EOF terminates
        assert_eq!(consume_bad_url_remnants("abc", 0), 3);
        // trailing backslash before EOF is consumed
        assert_eq!(consume_bad_url_remnants("ab\\", 0), 3);
    }

    #[test]
    fn decode_escapes() {
        assert_eq!(decode_escaped("41"), 'A');
        assert_eq!(decode_escaped("31"), '1');
        assert_eq!(decode_escaped("n"), 'n');
        assert_eq!(decode_escaped("é"), 'é');
        assert_eq!(decode_escaped(""), '\u{FFFD}');
        assert_eq!(decode_escaped("0"), '\u{FFFD}');
        assert_eq!(decode_escaped("d800"), '\u{FFFD}'); // surrogate
        assert_eq!(decode_escaped("110000"), '\u{FFFD}'); // out of range
        assert_eq!(decode_escaped("10FFFF"), '\u{10FFFF}');
    }
}
