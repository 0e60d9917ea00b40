//! Streaming CSS tokenizer
//!
//! A single forward pass over the source text, emitting `(type, start, end)`
//! spans through a callback. The tokenizer never fails: every byte of input
//! lands in exactly one token span, with malformed strings and urls degrading
//! to the `BadString`/`BadUrl` recovery types so that scanning always
//! resynchronizes. Downstream error reporting is the grammar parser's
//! responsibility, not the lexer's.
//!
//! On top of the standard token productions, the tokenizer understands the
//! raw-argument pseudo-classes of extended selector dialects
//! (`:contains()`, `:-abp-contains()`, `:has-text()`, `:xpath()`), whose
//! arguments are not CSS and are captured as single opaque
//! [`TokenType::RawParam`]/[`TokenType::XpathParam`] spans.

use crate::char_codes::{
    is_bom, is_digit, is_identifier_start, is_name, is_name_start, is_newline, is_non_printable,
    is_number_start, is_valid_escape, is_white_space,
};
use crate::scanner::{
    char_code_at, char_width, cmp_str, consume_bad_url_remnants, consume_escaped, consume_name,
    consume_number, find_white_space_end, get_newline_length, lookahead3,
};

const QUOTATION_MARK: u32 = 0x22; // "
const NUMBER_SIGN: u32 = 0x23; // #
const APOSTROPHE: u32 = 0x27; // '
const LEFT_PARENTHESIS: u32 = 0x28;
const RIGHT_PARENTHESIS: u32 = 0x29;
const ASTERISK: u32 = 0x2A;
const PLUS_SIGN: u32 = 0x2B;
const COMMA: u32 = 0x2C;
const HYPHEN_MINUS: u32 = 0x2D;
const FULL_STOP: u32 = 0x2E;
const SOLIDUS: u32 = 0x2F;
const COLON: u32 = 0x3A;
const SEMICOLON: u32 = 0x3B;
const LESS_THAN_SIGN: u32 = 0x3C;
const EXCLAMATION_MARK: u32 = 0x21;
const COMMERCIAL_AT: u32 = 0x40;
const GREATER_THAN_SIGN: u32 = 0x3E;
const LEFT_SQUARE_BRACKET: u32 = 0x5B;
const REVERSE_SOLIDUS: u32 = 0x5C;
const RIGHT_SQUARE_BRACKET: u32 = 0x5D;
const LEFT_CURLY_BRACKET: u32 = 0x7B;
const RIGHT_CURLY_BRACKET: u32 = 0x7D;

/// Token types produced by [`tokenize`]
///
/// A closed enumeration with stable in-process discriminants. `RawParam` and
/// `XpathParam` are the extended-selector additions; everything else follows
/// the CSS Syntax token set.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Eof = 0,
    Ident = 1,
    Function = 2,
    AtKeyword = 3,
    Hash = 4,
    String = 5,
    BadString = 6,
    Url = 7,
    BadUrl = 8,
    Delim = 9,
    Number = 10,
    Percentage = 11,
    Dimension = 12,
    WhiteSpace = 13,
    Cdo = 14,
    Cdc = 15,
    Colon = 16,
    Semicolon = 17,
    Comma = 18,
    LeftSquareBracket = 19,
    RightSquareBracket = 20,
    LeftParenthesis = 21,
    RightParenthesis = 22,
    LeftCurlyBracket = 23,
    RightCurlyBracket = 24,
    Comment = 25,
    /// Opaque argument of a raw-argument pseudo-class such as `:contains()`
    RawParam = 26,
    /// Opaque argument of `:xpath()`
    XpathParam = 27,
}

impl TokenType {
    /// Returns a human-readable name for the token type, used by debug dumps
    /// and error messages
    pub fn name(self) -> &'static str {
        match self {
            TokenType::Eof => "EOF-token",
            TokenType::Ident => "ident-token",
            TokenType::Function => "function-token",
            TokenType::AtKeyword => "at-keyword-token",
            TokenType::Hash => "hash-token",
            TokenType::String => "string-token",
            TokenType::BadString => "bad-string-token",
            TokenType::Url => "url-token",
            TokenType::BadUrl => "bad-url-token",
            TokenType::Delim => "delim-token",
            TokenType::Number => "number-token",
            TokenType::Percentage => "percentage-token",
            TokenType::Dimension => "dimension-token",
            TokenType::WhiteSpace => "whitespace-token",
            TokenType::Cdo => "CDO-token",
            TokenType::Cdc => "CDC-token",
            TokenType::Colon => "colon-token",
            TokenType::Semicolon => "semicolon-token",
            TokenType::Comma => "comma-token",
            TokenType::LeftSquareBracket => "[-token",
            TokenType::RightSquareBracket => "]-token",
            TokenType::LeftParenthesis => "(-token",
            TokenType::RightParenthesis => ")-token",
            TokenType::LeftCurlyBracket => "{-token",
            TokenType::RightCurlyBracket => "}-token",
            TokenType::Comment => "comment-token",
            TokenType::RawParam => "raw-param-token",
            TokenType::XpathParam => "xpath-param-token",
        }
    }

    /// Converts a stored discriminant back to a token type.
    ///
    /// Unknown values map to `Eof`; they cannot occur for buffers this crate
    /// built itself.
    pub(crate) const fn from_u8(value: u8) -> TokenType {
        match value {
            1 => TokenType::Ident,
            2 => TokenType::Function,
            3 => TokenType::AtKeyword,
            4 => TokenType::Hash,
            5 => TokenType::String,
            6 => TokenType::BadString,
            7 => TokenType::Url,
            8 => TokenType::BadUrl,
            9 => TokenType::Delim,
            10 => TokenType::Number,
            11 => TokenType::Percentage,
            12 => TokenType::Dimension,
            13 => TokenType::WhiteSpace,
            14 => TokenType::Cdo,
            15 => TokenType::Cdc,
            16 => TokenType::Colon,
            17 => TokenType::Semicolon,
            18 => TokenType::Comma,
            19 => TokenType::LeftSquareBracket,
            20 => TokenType::RightSquareBracket,
            21 => TokenType::LeftParenthesis,
            22 => TokenType::RightParenthesis,
            23 => TokenType::LeftCurlyBracket,
            24 => TokenType::RightCurlyBracket,
            25 => TokenType::Comment,
            26 => TokenType::RawParam,
            27 => TokenType::XpathParam,
            _ => TokenType::Eof,
        }
    }
}

/// Pseudo-classes whose argument is captured as one opaque `RawParam` span
const RAW_PSEUDO_NAMES: [&str; 3] = ["contains", "-abp-contains", "has-text"];

/// § 4.3.5. Consume a string token
///
/// `offset` points just after the opening quote. An unescaped newline before
/// the closing quote ends the token early as `BadString` without consuming
/// the newline; EOF ends the token as a regular (unterminated) string.
fn consume_string_token(source: &str, quote: u32, mut offset: usize) -> (TokenType, usize) {
    while offset < source.len() {
        let code = char_code_at(source, offset);

        if is_newline(code) {
            return (TokenType::BadString, offset);
        }

        if code == quote {
            return (TokenType::String, offset + 1);
        }

        if code == REVERSE_SOLIDUS {
            if offset + 1 >= source.len() {
                // escaped EOF: consume the backslash and stop
                return (TokenType::String, offset + 1);
            }
            let next = char_code_at(source, offset + 1);
            if is_newline(next) {
                // escaped newline, a line continuation
                offset += 1 + get_newline_length(source, offset + 1, next);
            } else {
                offset = consume_escaped(source, offset + 1);
            }
            continue;
        }

        offset += char_width(code);
    }

    (TokenType::String, offset)
}

/// § 4.3.6. Consume a url token
///
/// `offset` points just after the `url(` opener. Returns `Url` including the
/// closing parenthesis (or up to EOF for an unterminated url), or `BadUrl`
/// spanning through the recovery point.
fn consume_url_token(source: &str, mut offset: usize) -> (TokenType, usize) {
    offset = find_white_space_end(source, offset);

    while offset < source.len() {
        let code = char_code_at(source, offset);

        if code == RIGHT_PARENTHESIS {
            return (TokenType::Url, offset + 1);
        }

        if is_white_space(code) {
            let ws_end = find_white_space_end(source, offset);
            if ws_end >= source.len() {
                return (TokenType::Url, ws_end);
            }
            if char_code_at(source, ws_end) == RIGHT_PARENTHESIS {
                return (TokenType::Url, ws_end + 1);
            }
            return (TokenType::BadUrl, consume_bad_url_remnants(source, ws_end));
        }

        if code == QUOTATION_MARK
            || code == APOSTROPHE
            || code == LEFT_PARENTHESIS
            || is_non_printable(code)
        {
            return (TokenType::BadUrl, consume_bad_url_remnants(source, offset));
        }

        if code == REVERSE_SOLIDUS {
            if is_valid_escape(code, char_code_at(source, offset + 1)) {
                offset = consume_escaped(source, offset + 1);
                continue;
            }
            return (TokenType::BadUrl, consume_bad_url_remnants(source, offset));
        }

        offset += char_width(code);
    }

    (TokenType::Url, offset)
}

/// § 4.3.3. Consume a numeric token
fn consume_numeric_token(source: &str, mut offset: usize) -> (TokenType, usize) {
    offset = consume_number(source, offset);

    let (first, second, third) = lookahead3(source, offset);
    if is_identifier_start(first, second, third) {
        return (TokenType::Dimension, consume_name(source, offset));
    }
    if first == 0x25 {
        // U+0025 PERCENTAGE SIGN
        return (TokenType::Percentage, offset + 1);
    }
    (TokenType::Number, offset)
}

/// § 4.3.4. Consume an ident-like token
///
/// `start` is the first code point of the name. Distinguishes plain idents,
/// functions (name immediately followed by `(`) and unquoted urls; `url(`
/// followed by a quote stays a function token so the argument tokenizes as a
/// string.
fn consume_ident_like_token(source: &str, start: usize) -> (TokenType, usize) {
    let offset = consume_name(source, start);

    if cmp_str(source, start, offset, "url") && char_code_at(source, offset) == LEFT_PARENTHESIS {
        let ws_end = find_white_space_end(source, offset + 1);
        let next = char_code_at(source, ws_end);
        if next == QUOTATION_MARK || next == APOSTROPHE {
            return (TokenType::Function, offset + 1);
        }
        return consume_url_token(source, offset + 1);
    }

    if char_code_at(source, offset) == LEFT_PARENTHESIS {
        return (TokenType::Function, offset + 1);
    }

    (TokenType::Ident, offset)
}

/// Finds the end of a `RawParam` span starting just after the function's
/// opening parenthesis: the position of the `)` that balances the function,
/// tracking nested parentheses and honoring backslash escapes, or EOF.
fn find_raw_param_end(source: &str, mut offset: usize) -> usize {
    let mut depth = 1usize;

    while offset < source.len() {
        let code = char_code_at(source, offset);
        match code {
            REVERSE_SOLIDUS => {
                offset += 1;
                if offset < source.len() {
                    offset += char_width(char_code_at(source, offset));
                }
            }
            LEFT_PARENTHESIS => {
                depth += 1;
                offset += 1;
            }
            RIGHT_PARENTHESIS => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                offset += 1;
            }
            _ => offset += char_width(code),
        }
    }

    offset
}

/// Finds the end of an `XpathParam` span: the position of the *last* `)` in
/// the remaining source, or EOF if there is none. Xpath arguments may contain
/// unbalanced parentheses and the pseudo-class is terminal by the dialect's
/// convention, so the match is greedy.
fn find_xpath_param_end(source: &str, offset: usize) -> usize {
    match source[offset..].rfind(')') {
        Some(position) => offset + position,
        None => source.len(),
    }
}

/// Tokenizes a source string, invoking `on_token` with the type, start
/// offset and end offset of every token found.
///
/// Offsets are byte offsets forming half-open ranges; the concatenation of
/// all emitted spans exactly covers the input past any leading BOM, and a
/// terminal [`TokenType::Eof`] pseudo-token with `start == end ==
/// source.len()` is always emitted last. The tokenizer never fails.
pub fn tokenize(source: &str, mut on_token: impl FnMut(TokenType, usize, usize)) {
    let source_len = source.len();
    let first_code = char_code_at(source, 0);
    let mut offset = if is_bom(first_code) != 0 {
        char_width(first_code)
    } else {
        0
    };
    let mut prev_type = TokenType::Eof;

    while offset < source_len {
        let start = offset;
        let (code, second, third) = lookahead3(source, offset);
        let token_type;

        match code {
            _ if is_white_space(code) => {
                token_type = TokenType::WhiteSpace;
                offset = find_white_space_end(source, offset + 1);
            }

            QUOTATION_MARK | APOSTROPHE => {
                let (scanned_type, end) = consume_string_token(source, code, offset + 1);
                token_type = scanned_type;
                offset = end;
            }

            NUMBER_SIGN => {
                if is_name(second) || is_valid_escape(second, third) {
                    token_type = TokenType::Hash;
                    offset = consume_name(source, offset + 1);
                } else {
                    token_type = TokenType::Delim;
                    offset += 1;
                }
            }

            LEFT_PARENTHESIS => {
                token_type = TokenType::LeftParenthesis;
                offset += 1;
            }

            RIGHT_PARENTHESIS => {
                token_type = TokenType::RightParenthesis;
                offset += 1;
            }

            PLUS_SIGN | FULL_STOP => {
                if is_number_start(code, second, third) != 0 {
                    let (scanned_type, end) = consume_numeric_token(source, offset);
                    token_type = scanned_type;
                    offset = end;
                } else {
                    token_type = TokenType::Delim;
                    offset += 1;
                }
            }

            COMMA => {
                token_type = TokenType::Comma;
                offset += 1;
            }

            HYPHEN_MINUS => {
                if is_number_start(code, second, third) != 0 {
                    let (scanned_type, end) = consume_numeric_token(source, offset);
                    token_type = scanned_type;
                    offset = end;
                } else if second == HYPHEN_MINUS && third == GREATER_THAN_SIGN {
                    token_type = TokenType::Cdc;
                    offset += 3;
                } else if is_identifier_start(code, second, third) {
                    let (scanned_type, end) = consume_ident_like_token(source, offset);
                    token_type = scanned_type;
                    offset = end;
                } else {
                    token_type = TokenType::Delim;
                    offset += 1;
                }
            }

            SOLIDUS => {
                if second == ASTERISK {
                    token_type = TokenType::Comment;
                    offset = match source[offset + 2..].find("*/") {
                        Some(position) => offset + 2 + position + 2,
                        // unterminated comments are accepted, not errors
                        None => source_len,
                    };
                } else {
                    token_type = TokenType::Delim;
                    offset += 1;
                }
            }

            COLON => {
                token_type = TokenType::Colon;
                offset += 1;
            }

            SEMICOLON => {
                token_type = TokenType::Semicolon;
                offset += 1;
            }

            LESS_THAN_SIGN => {
                if second == EXCLAMATION_MARK
                    && third == HYPHEN_MINUS
                    && char_code_at(source, offset + 3) == HYPHEN_MINUS
                {
                    token_type = TokenType::Cdo;
                    offset += 4;
                } else {
                    token_type = TokenType::Delim;
                    offset += 1;
                }
            }

            COMMERCIAL_AT => {
                let (first, next, after) = lookahead3(source, offset + 1);
                if is_identifier_start(first, next, after) {
                    token_type = TokenType::AtKeyword;
                    offset = consume_name(source, offset + 1);
                } else {
                    token_type = TokenType::Delim;
                    offset += 1;
                }
            }

            LEFT_SQUARE_BRACKET => {
                token_type = TokenType::LeftSquareBracket;
                offset += 1;
            }

            REVERSE_SOLIDUS => {
                if is_valid_escape(code, second) {
                    let (scanned_type, end) = consume_ident_like_token(source, offset);
                    token_type = scanned_type;
                    offset = end;
                } else {
                    token_type = TokenType::Delim;
                    offset += 1;
                }
            }

            RIGHT_SQUARE_BRACKET => {
                token_type = TokenType::RightSquareBracket;
                offset += 1;
            }

            LEFT_CURLY_BRACKET => {
                token_type = TokenType::LeftCurlyBracket;
                offset += 1;
            }

            RIGHT_CURLY_BRACKET => {
                token_type = TokenType::RightCurlyBracket;
                offset += 1;
            }

            _ if is_digit(code) => {
                let (scanned_type, end) = consume_numeric_token(source, offset);
                token_type = scanned_type;
                offset = end;
            }

            _ if is_name_start(code) => {
                let (scanned_type, end) = consume_ident_like_token(source, offset);
                token_type = scanned_type;
                offset = end;
            }

            _ => {
                token_type = TokenType::Delim;
                offset += char_width(code);
            }
        }

        on_token(token_type, start, offset);

        // Raw-argument pseudo-classes: a function in pseudo-class position
        // whose argument is not CSS. The argument is captured as one opaque
        // span; the terminating `)` still tokenizes normally, so bracket
        // balance pairs it with the function opener.
        if token_type == TokenType::Function && prev_type == TokenType::Colon {
            let name_end = offset - 1;
            let is_raw = RAW_PSEUDO_NAMES
                .iter()
                .any(|name| cmp_str(source, start, name_end, name));

            if is_raw {
                let raw_end = find_raw_param_end(source, offset);
                if raw_end > offset {
                    on_token(TokenType::RawParam, offset, raw_end);
                    offset = raw_end;
                    prev_type = TokenType::RawParam;
                    continue;
                }
            } else if cmp_str(source, start, name_end, "xpath") {
                let raw_end = find_xpath_param_end(source, offset);
                if raw_end > offset {
                    on_token(TokenType::XpathParam, offset, raw_end);
                    offset = raw_end;
                    prev_type = TokenType::XpathParam;
                    continue;
                }
            }
        }

        prev_type = token_type;
    }

    on_token(TokenType::Eof, source_len, source_len);
}
