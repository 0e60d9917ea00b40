//! # ECSS Lexer
//!
//! A streaming lexical analyzer and low-level parsing substrate for
//! CSS-family grammars, including the extended selector dialects used by
//! content-filtering rules (`:contains()`, `:xpath()` and friends).
//!
//! ## Overview
//!
//! The crate provides the performance- and correctness-critical layers a
//! grammar-driven AST builder sits on:
//!
//! - **Tokenizer** ([`tokenize`]): a spec-accurate single pass turning source
//!   text into typed `(type, start, end)` spans. It never fails — malformed
//!   strings and urls degrade to recovery tokens, unterminated comments are
//!   accepted, and every byte of input lands in exactly one span.
//! - **Token stream** ([`TokenStream`]): a packed-buffer container offering
//!   O(1) lookahead, allocation-free value comparison and balanced-bracket
//!   navigation, so a recursive-descent parser can skip an unknown balanced
//!   construct in one bounded pass.
//! - **Offset-to-location** ([`OffsetToLocation`]): amortized O(distance)
//!   mapping from byte offsets to line/column pairs for diagnostics and node
//!   source ranges, including anchored sub-fragment parsing.
//! - **Cursor-safe list** ([`List`]): a doubly linked list for AST node
//!   sequences that tolerates structural mutation *while* a traversal over it
//!   is in progress — the backbone of tree-rewriting passes.
//! - **Escape codecs** ([`ident`], [`string`], [`url`]): decode/encode
//!   helpers matching the serialization idioms of the token grammar.
//!
//! ## Tokenizing
//!
//! ```rust
//! use ecss_lexer::{tokenize, TokenType};
//!
//! let mut types = Vec::new();
//! tokenize("a { color: red }", |token_type, _start, _end| {
//!     types.push(token_type);
//! });
//!
//! assert_eq!(types.first(), Some(&TokenType::Ident));
//! assert_eq!(types.last(), Some(&TokenType::Eof));
//! ```
//!
//! ## Driving a token stream
//!
//! ```rust
//! use ecss_lexer::{TokenStream, TokenType};
//!
//! let mut stream = TokenStream::new("div:contains(a(b)c)");
//!
//! assert_eq!(stream.token_type(), TokenType::Ident);
//! assert!(stream.lookup_value(0, "div"));
//!
//! stream.next(); // colon
//! stream.next(); // function
//! assert_eq!(stream.token_type(), TokenType::Function);
//! stream.next();
//! assert_eq!(stream.token_type(), TokenType::RawParam);
//! ```
//!
//! ## Rewriting a list during traversal
//!
//! ```rust
//! use ecss_lexer::List;
//!
//! let mut list: List<&str> = ["a", "b", "c"].into_iter().collect();
//! list.for_each(|list, id| {
//!     if *list.data(id) == "b" {
//!         list.remove(id);
//!     }
//! });
//! assert_eq!(list.to_vec(), vec!["a", "c"]);
//! ```
//!
//! ## Locating offsets
//!
//! ```rust
//! use ecss_lexer::OffsetToLocation;
//!
//! let mut mapper = OffsetToLocation::new();
//! mapper.set_source("a\nbb", 0, 1, 1);
//! let location = mapper.get_location(2, "style.css");
//! assert_eq!((location.line, location.column), (2, 1));
//! ```

pub mod char_codes;
pub mod error;
pub mod ident;
pub mod list;
pub mod location;
pub mod scanner;
pub mod string;
pub mod token_stream;
pub mod tokenizer;
pub mod url;

// Re-export main types and functions
pub use error::SyntaxError;
pub use list::{ItemId, List};
pub use location::{Location, LocationRange, OffsetToLocation, SourceLocation};
pub use token_stream::{ScanAction, TokenDump, TokenStream};
pub use tokenizer::{TokenType, tokenize};
