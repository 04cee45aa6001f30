//! Input text primitives shared by every weft crate.
//!
//! Parsers in weft consume UTF-8 text one code point at a time. This crate
//! owns the pieces that only care about the text itself:
//!
//! - [`Span`]: a byte range into the input, used for matched subranges
//! - [`Cursor`]: the current-position cursor that parsers advance and roll back
//! - [`fold`]: case folding used by `no_case[...]`
//! - [`class`]: character classes (`digit`, `punct`, whitespace, line breaks)

pub mod class;
mod cursor;
pub mod fold;
mod span;

pub use class::CharClass;
pub use cursor::{Cursor, CursorSnapshot};
pub use span::Span;
