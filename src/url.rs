//! Unquoted url escape codec
//!
//! Handles the body of `url(...)` tokens written without quotes: decoding
//! resolves escapes, encoding escapes everything that would end or break the
//! token (whitespace, quotes, parentheses, backslashes, non-printables).

use crate::char_codes::{is_newline, is_non_printable, is_white_space};
use crate::ident::{char_from, push_hex_escape};
use crate::scanner::{char_code_at, char_width, consume_escaped, decode_escaped};

/// Decodes an unquoted url body, resolving escape sequences
pub fn decode(input: &str) -> String {
    let mut decoded = String::with_capacity(input.len());
    let mut offset = 0;

    while offset < input.len() {
        let code = char_code_at(input, offset);

        if code == 0x5C {
            let next = char_code_at(input, offset + 1);
            if is_newline(next) || offset + 1 >= input.len() {
                // not a valid escape inside a url; drop the backslash
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

/// Encodes a url body so it survives as a single unquoted `url()` argument
pub fn encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());

    for character in input.chars() {
        let code = character as u32;
        if code == 0 {
            encoded.push('\u{FFFD}');
        } else if is_white_space(code) || is_non_printable(code) {
            push_hex_escape(&mut encoded, code);
        } else if matches!(character, '"' | '\'' | '(' | ')' | '\\') {
            encoded.push('\\');
            encoded.push(character);
        } else {
            encoded.push(character);
        }
    }

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes() {
        assert_eq!(decode("image.png"), "image.png");
        assert_eq!(decode("a\\)b"), "a)b");
        assert_eq!(decode("\\28 x"), "(x");
        assert_eq!(decode("trailing\\"), "trailing");
    }

    #[test]
    fn encodes() {
        assert_eq!(encode("image.png"), "image.png");
        assert_eq!(encode("a b"), "a\\20 b");
        assert_eq!(encode("a(b)"), "a\\(b\\)");
        assert_eq!(encode("q'\""), "q\\'\\\"");
    }

    #[test]
    fn round_trips() {
        for input in ["plain.png", "with space.png", "par(en).png", "quo\"te", "bäck\\slash"] {
            assert_eq!(decode(&encode(input)), input, "{input:?} must round-trip");
        }
    }
}
