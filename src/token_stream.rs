//! Packed token-stream container
//!
//! [`TokenStream`] wraps the spans produced by [`tokenize`] in two parallel
//! numeric buffers so that a grammar-driven parser can look ahead, skip and
//! match balanced constructs without re-scanning or allocating:
//!
//! - `offset_and_type[i]` packs the token type tag and the token's end offset
//!   into one `u64` (type in the upper bits, a 32-bit end offset in the
//!   lower), giving O(1) random access to both. Sources are limited to
//!   `u32::MAX` bytes by the packing.
//! - `balance[i]` holds the index of the token structurally matching token
//!   `i`, or `i` itself when the token is unmatched — the self-referential
//!   sentinel keeps unmatched tokens distinguishable in O(1) while the
//!   matched-pair relation stays symmetric.
//!
//! The stream owns no text; it borrows the source for its lifetime and every
//! textual operation is a bounded slice of it.

use serde::Serialize;
use smallvec::SmallVec;

use crate::scanner::char_code_at;
use crate::tokenizer::{TokenType, tokenize};

const TYPE_SHIFT: u32 = 32;
const OFFSET_MASK: u64 = 0xFFFF_FFFF;

#[inline]
const fn pack(token_type: TokenType, end: usize) -> u64 {
    ((token_type as u64) << TYPE_SHIFT) | end as u64
}

#[inline]
const fn unpack_type(packed: u64) -> TokenType {
    TokenType::from_u8((packed >> TYPE_SHIFT) as u8)
}

#[inline]
const fn unpack_offset(packed: u64) -> usize {
    (packed & OFFSET_MASK) as usize
}

/// Returns the closing token type a bracket-like opener expects, if the
/// token opens a balanced pair. Function tokens include their opening
/// parenthesis and therefore count as openers.
const fn expected_closer(token_type: TokenType) -> Option<TokenType> {
    match token_type {
        TokenType::LeftParenthesis | TokenType::Function => Some(TokenType::RightParenthesis),
        TokenType::LeftSquareBracket => Some(TokenType::RightSquareBracket),
        TokenType::LeftCurlyBracket => Some(TokenType::RightCurlyBracket),
        _ => None,
    }
}

/// Caller decision for [`TokenStream::skip_until_balanced`], returned by the
/// `stop_consume` callback for each token's leading code point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    /// Keep scanning
    Continue,
    /// Stop before the current token
    StopBefore,
    /// Stop after consuming the current token
    StopAfter,
}

/// One record of [`TokenStream::dump`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenDump {
    pub idx: usize,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub chunk: String,
    pub balance: Option<usize>,
}

/// A stream of tokens over a borrowed source string
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    source: &'a str,
    first_char_offset: usize,
    /// `token_count + 1` entries; the last is the EOF pseudo-token
    offset_and_type: Vec<u64>,
    balance: Vec<u32>,
    token_count: usize,
    token_index: usize,
    token_type: TokenType,
    token_start: usize,
    token_end: usize,
    eof: bool,
}

impl<'a> TokenStream<'a> {
    /// Creates a stream by tokenizing `source`
    pub fn new(source: &'a str) -> Self {
        let mut stream = TokenStream {
            source: "",
            first_char_offset: 0,
            offset_and_type: Vec::new(),
            balance: Vec::new(),
            token_count: 0,
            token_index: 0,
            token_type: TokenType::Eof,
            token_start: 0,
            token_end: 0,
            eof: true,
        };
        stream.set_source(source);
        stream
    }

    /// Tokenizes a new source into this stream, reusing buffer capacity, and
    /// resets the cursor to the first token
    pub fn set_source(&mut self, source: &'a str) {
        debug_assert!(
            source.len() <= u32::MAX as usize,
            "source exceeds the packed-offset ceiling"
        );

        self.source = source;
        self.first_char_offset = match source.chars().next() {
            Some(first) if crate::char_codes::is_bom(first as u32) != 0 => first.len_utf8(),
            _ => 0,
        };

        let mut offset_and_type = std::mem::take(&mut self.offset_and_type);
        let mut balance = std::mem::take(&mut self.balance);
        offset_and_type.clear();
        balance.clear();

        // Open-bracket stack; drained before construction returns. A
        // mismatched closer leaves the stack untouched, so it cannot corrupt
        // the balance of enclosing, still-open brackets.
        let mut open_stack: SmallVec<[u32; 16]> = SmallVec::new();

        tokenize(source, |token_type, _start, end| {
            if token_type == TokenType::Eof {
                return;
            }
            let index = offset_and_type.len() as u32;
            offset_and_type.push(pack(token_type, end));
            balance.push(index);

            if expected_closer(token_type).is_some() {
                open_stack.push(index);
            } else if matches!(
                token_type,
                TokenType::RightParenthesis
                    | TokenType::RightSquareBracket
                    | TokenType::RightCurlyBracket
            ) {
                if let Some(&open_index) = open_stack.last() {
                    let open_type = unpack_type(offset_and_type[open_index as usize]);
                    if expected_closer(open_type) == Some(token_type) {
                        open_stack.pop();
                        balance[open_index as usize] = index;
                        balance[index as usize] = open_index;
                    }
                }
            }
        });

        // tokens still open at EOF stay self-referential
        drop(open_stack);

        let token_count = offset_and_type.len();
        offset_and_type.push(pack(TokenType::Eof, source.len()));
        balance.push(token_count as u32);

        self.offset_and_type = offset_and_type;
        self.balance = balance;
        self.token_count = token_count;
        self.reset();
    }

    /// Moves the cursor back to the first token
    pub fn reset(&mut self) {
        self.set_position(0);
    }

    /// The borrowed source text
    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Number of tokens, excluding the EOF pseudo-token
    #[inline]
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Offset of the first token (non-zero when the source begins with a BOM)
    #[inline]
    pub fn first_char_offset(&self) -> usize {
        self.first_char_offset
    }

    /// Index of the current token
    #[inline]
    pub fn token_index(&self) -> usize {
        self.token_index
    }

    /// Type of the current token
    #[inline]
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Start offset of the current token
    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// End offset of the current token
    #[inline]
    pub fn token_end(&self) -> usize {
        self.token_end
    }

    /// True once the cursor has reached the EOF pseudo-token
    #[inline]
    pub fn eof(&self) -> bool {
        self.eof
    }

    fn set_position(&mut self, index: usize) {
        let index = index.min(self.token_count);
        let packed = self.offset_and_type[index];
        self.token_index = index;
        self.eof = index >= self.token_count;
        self.token_type = unpack_type(packed);
        self.token_end = unpack_offset(packed);
        self.token_start = self.get_token_start(index);
    }

    /// Type of the token `offset` positions ahead of the cursor. Out-of-range
    /// lookahead resolves to [`TokenType::Eof`].
    pub fn lookup_type(&self, offset: usize) -> TokenType {
        let index = self.token_index.saturating_add(offset);
        if index < self.token_count {
            unpack_type(self.offset_and_type[index])
        } else {
            TokenType::Eof
        }
    }

    /// End offset of the token `offset` positions ahead of the cursor.
    /// Out-of-range lookahead resolves to the source length.
    pub fn lookup_offset(&self, offset: usize) -> usize {
        let index = self.token_index.saturating_add(offset);
        if index < self.token_count {
            unpack_offset(self.offset_and_type[index])
        } else {
            self.source.len()
        }
    }

    /// Compares the exact text of the token `offset` positions ahead of the
    /// cursor against a reference string, without materializing a substring
    pub fn lookup_value(&self, offset: usize, reference: &str) -> bool {
        let index = self.token_index.saturating_add(offset);
        if index < self.token_count {
            let start = self.get_token_start(index);
            let end = unpack_offset(self.offset_and_type[index]);
            &self.source[start..end] == reference
        } else {
            false
        }
    }

    /// Start offset of the token at an absolute index. Indexes at or past
    /// the token count resolve to the EOF pseudo-token's offset.
    pub fn get_token_start(&self, token_index: usize) -> usize {
        if token_index == 0 {
            return self.first_char_offset;
        }
        if token_index >= self.token_count {
            return self.source.len();
        }
        unpack_offset(self.offset_and_type[token_index - 1])
    }

    /// Slice of the source from `start` to the start of the current token
    pub fn substr_to_cursor(&self, start: usize) -> &'a str {
        &self.source[start..self.token_start]
    }

    /// True if the current token is the closing edge of a balanced pair
    /// opened before token index `pos`
    pub fn is_balance_edge(&self, pos: usize) -> bool {
        (self.balance[self.token_index] as usize) < pos
    }

    /// True if the current token is a delimiter with the given code point
    pub fn is_delim(&self, code: char) -> bool {
        self.token_type == TokenType::Delim
            && char_code_at(self.source, self.token_start) == code as u32
    }

    /// True if the token `offset` positions ahead of the cursor is a
    /// delimiter with the given code point
    pub fn is_delim_at(&self, code: char, offset: usize) -> bool {
        let index = self.token_index.saturating_add(offset);
        index < self.token_count
            && unpack_type(self.offset_and_type[index]) == TokenType::Delim
            && char_code_at(self.source, self.get_token_start(index)) == code as u32
    }

    /// Advances the cursor to the next token, saturating at EOF
    pub fn next(&mut self) {
        self.set_position(self.token_index + 1);
    }

    /// Advances the cursor by `token_count` tokens, saturating at EOF
    pub fn skip(&mut self, token_count: usize) {
        self.set_position(self.token_index.saturating_add(token_count));
    }

    /// Advances the cursor past any run of whitespace and comment tokens
    pub fn skip_sc(&mut self) {
        while matches!(self.token_type, TokenType::WhiteSpace | TokenType::Comment) {
            self.next();
        }
    }

    /// Walks forward from `start_token`, skipping whole balanced spans as
    /// units, until the callback stops the scan or the closing edge of an
    /// enclosing balanced pair is reached. The callback receives the leading
    /// code point of each candidate token.
    ///
    /// This is the primitive a grammar parser uses to step over an unparsed
    /// balanced construct in one bounded pass.
    pub fn skip_until_balanced(
        &mut self,
        start_token: usize,
        mut stop_consume: impl FnMut(u32) -> ScanAction,
    ) {
        let mut cursor = start_token;

        while cursor < self.token_count {
            let balance_end = self.balance[cursor] as usize;

            // the closer of a pair opened before the scan started: the
            // enclosing construct ends here
            if balance_end < start_token {
                break;
            }

            let offset = if cursor > 0 {
                unpack_offset(self.offset_and_type[cursor - 1])
            } else {
                self.first_char_offset
            };

            match stop_consume(char_code_at(self.source, offset)) {
                ScanAction::StopBefore => break,
                ScanAction::StopAfter => {
                    cursor += 1;
                    break;
                }
                ScanAction::Continue => {
                    // fast-forward across a whole balanced span
                    if self.balance[balance_end] as usize == cursor {
                        cursor = balance_end;
                    }
                }
            }

            cursor += 1;
        }

        self.set_position(cursor);
    }

    /// Calls `fn(type, start, end, index)` for every token in the stream,
    /// excluding the EOF pseudo-token
    pub fn for_each_token(&self, mut callback: impl FnMut(TokenType, usize, usize, usize)) {
        let mut start = self.first_char_offset;
        for index in 0..self.token_count {
            let packed = self.offset_and_type[index];
            let end = unpack_offset(packed);
            callback(unpack_type(packed), start, end, index);
            start = end;
        }
    }

    /// Materializes the buffers into human-readable records. Diagnostic only;
    /// allocates freely and sits on no hot path.
    pub fn dump(&self) -> Vec<TokenDump> {
        let mut records = Vec::with_capacity(self.token_count);
        self.for_each_token(|token_type, start, end, idx| {
            let balance = self.balance[idx] as usize;
            records.push(TokenDump {
                idx,
                token_type: token_type.name(),
                chunk: self.source[start..end].to_string(),
                balance: if balance == idx { None } else { Some(balance) },
            });
        });
        records
    }
}
