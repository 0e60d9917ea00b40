//! Offset to line/column mapping
//!
//! [`OffsetToLocation`] converts byte offsets in a source string to
//! line/column coordinates for diagnostics and node source ranges. The mapper
//! keeps a `(last_offset, last_line, last_column)` cache so that monotonically
//! non-decreasing queries — the overwhelmingly common pattern while a parser
//! walks forward — cost O(distance since the last query); arbitrary backward
//! queries stay correct by rescanning from the anchor.
//!
//! `\n`, `\r\n`, `\r` and form feed each advance the line count by exactly
//! one. Both bytes of a CRLF pair report the location of the `\r`. Lines and
//! columns are 1-based by convention; columns count bytes within the line,
//! consistent with the byte offsets used everywhere else in the crate.

use serde::Serialize;

use crate::char_codes::is_bom;

/// A resolved source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Source (file) name the location belongs to
    pub source: String,
    /// Absolute byte offset
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column number
    pub column: usize,
}

/// A coordinate triple without a source name, used inside ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// A start/end pair of locations within one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRange {
    pub source: String,
    pub start: Location,
    pub end: Location,
}

/// Maps byte offsets of a borrowed source fragment to line/column pairs
#[derive(Debug, Clone)]
pub struct OffsetToLocation<'a> {
    source: &'a str,
    /// Absolute offset of the fragment within a larger composed document
    start_offset: usize,
    start_line: usize,
    start_column: usize,
    /// Scan anchor: first counted byte (past any BOM)
    anchor: usize,
    last_offset: usize,
    last_line: usize,
    last_column: usize,
}

impl Default for OffsetToLocation<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> OffsetToLocation<'a> {
    /// Creates a mapper over an empty source
    pub fn new() -> Self {
        OffsetToLocation {
            source: "",
            start_offset: 0,
            start_line: 1,
            start_column: 1,
            anchor: 0,
            last_offset: 0,
            last_line: 1,
            last_column: 1,
        }
    }

    /// Anchors the mapper to a source fragment.
    ///
    /// `start_offset`, `start_line` and `start_column` describe where the
    /// fragment sits inside a larger composed document, so that embedded
    /// parsing reports absolute coordinates; pass `0, 1, 1` for standalone
    /// sources. A leading BOM is skipped before counting begins.
    pub fn set_source(
        &mut self,
        source: &'a str,
        start_offset: usize,
        start_line: usize,
        start_column: usize,
    ) {
        let anchor = match source.chars().next() {
            Some(first) if is_bom(first as u32) != 0 => first.len_utf8(),
            _ => 0,
        };

        self.source = source;
        self.start_offset = start_offset;
        self.start_line = start_line;
        self.start_column = start_column;
        self.anchor = anchor;
        self.last_offset = anchor;
        self.last_line = start_line;
        self.last_column = start_column;
    }

    /// Resolves the location of a fragment-relative byte offset.
    ///
    /// Offsets past the end of the source clamp to the end.
    pub fn get_location(&mut self, offset: usize, filename: &str) -> SourceLocation {
        let (line, column) = self.advance_to(offset.min(self.source.len()));
        SourceLocation {
            source: filename.to_string(),
            offset: self.start_offset + offset.min(self.source.len()),
            line,
            column,
        }
    }

    /// Resolves a start/end offset pair into a location range
    pub fn get_location_range(
        &mut self,
        start: usize,
        end: usize,
        filename: &str,
    ) -> LocationRange {
        let start_location = self.get_location(start, filename);
        let end_location = self.get_location(end, filename);
        LocationRange {
            source: filename.to_string(),
            start: Location {
                offset: start_location.offset,
                line: start_location.line,
                column: start_location.column,
            },
            end: Location {
                offset: end_location.offset,
                line: end_location.line,
                column: end_location.column,
            },
        }
    }

    /// Advances the cached scan state to `offset` (clamped by the caller)
    /// and returns the line/column there
    fn advance_to(&mut self, offset: usize) -> (usize, usize) {
        if offset < self.last_offset {
            // backward query: restart from the anchor
            self.last_offset = self.anchor;
            self.last_line = self.start_line;
            self.last_column = self.start_column;
        }

        let bytes = self.source.as_bytes();
        let mut index = self.last_offset;
        let mut line = self.last_line;
        let mut column = self.last_column;

        while index < offset {
            match bytes[index] {
                b'\r' => {
                    if index + 1 < bytes.len() && bytes[index + 1] == b'\n' {
                        if index + 1 < offset {
                            index += 2;
                            line += 1;
                            column = 1;
                        } else {
                            // the query lands on the \n of a CRLF pair: it
                            // reports the \r's location, and the cached state
                            // lets a later scan count the pair exactly once
                            break;
                        }
                    } else {
                        index += 1;
                        line += 1;
                        column = 1;
                    }
                }
                b'\n' | 0x0C => {
                    index += 1;
                    line += 1;
                    column = 1;
                }
                _ => {
                    index += 1;
                    column += 1;
                }
            }
        }

        self.last_offset = offset;
        self.last_line = line;
        self.last_column = column;
        (line, column)
    }
}
