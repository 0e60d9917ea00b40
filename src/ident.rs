//! Identifier escape codec
//!
//! Decoding unescapes identifier text the way the tokenizer's scanners read
//! it; encoding follows the CSSOM "serialize an identifier" idiom, so any
//! string round-trips through a stylesheet as a structurally valid ident.

use crate::char_codes::{is_digit, is_name, is_newline};
use crate::scanner::{char_code_at, char_width, consume_escaped, decode_escaped};

/// Decodes an identifier, replacing escape sequences with the code points
/// they represent
pub fn decode(input: &str) -> String {
    let mut decoded = String::with_capacity(input.len());
    let mut offset = 0;

    while offset < input.len() {
        let code = char_code_at(input, offset);

        if code == 0x5C {
            // U+005C REVERSE SOLIDUS
            let next = char_code_at(input, offset + 1);
            if is_newline(next) {
                // invalid in an ident; drop the backslash, keep the newline
                offset += 1;
                continue;
            }
            let escape_end = consume_escaped(input, offset + 1);
            decoded.push(decode_escaped(&input[offset + 1..escape_end]));
            offset = escape_end;
            continue;
        }

        decoded.push(char_from(code));
        offset += char_width(code);
    }

    decoded
}

/// Encodes a string as an identifier, escaping code points that would break
/// its structure
pub fn encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    let char_count = input.chars().count();

    for (index, character) in input.chars().enumerate() {
        let code = character as u32;

        if code == 0 {
            encoded.push('\u{FFFD}');
        } else if (0x01..=0x1F).contains(&code) || code == 0x7F {
            push_hex_escape(&mut encoded, code);
        } else if is_digit(code) && (index == 0 || (index == 1 && input.starts_with('-'))) {
            // a leading digit (or digit after a leading dash) must be escaped
            push_hex_escape(&mut encoded, code);
        } else if character == '-' && index == 0 && char_count == 1 {
            encoded.push('\\');
            encoded.push('-');
        } else if is_name(code) {
            encoded.push(character);
        } else {
            encoded.push('\\');
            encoded.push(character);
        }
    }

    encoded
}

pub(crate) fn push_hex_escape(output: &mut String, code: u32) {
    output.push('\\');
    output.push_str(&format!("{code:x}"));
    output.push(' ');
}

#[inline]
pub(crate) fn char_from(code: u32) -> char {
    char::from_u32(code).unwrap_or('\u{FFFD}')
}
