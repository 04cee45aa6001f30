//! Quoted strings.

use weft_attr::{Attribute, Shape};
use weft_text::Cursor;

use crate::parser::{Kind, Parser};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct QuotedSpec {
    pub(crate) quotes: Vec<char>,
    /// Escape sequences (without the backslash) and their values.
    pub(crate) escapes: Vec<(String, char)>,
}

impl QuotedSpec {
    pub(crate) fn parse(&self, cur: &mut Cursor<'_>) -> Option<Attribute> {
        let start = cur.snapshot();
        let value = self.scan(cur);
        if value.is_none() {
            cur.restore(start);
        }
        value.map(Attribute::String)
    }

    fn scan(&self, cur: &mut Cursor<'_>) -> Option<String> {
        let open = cur.bump_if(|c| self.quotes.contains(&c))?;
        let mut value = String::new();
        loop {
            match cur.bump()? {
                c if c == open => return Some(value),
                '\\' => value.push(self.escape(open, cur)?),
                c => value.push(c),
            }
        }
    }

    /// Decode the escape after a backslash.
    fn escape(&self, open: char, cur: &mut Cursor<'_>) -> Option<char> {
        if let Some(c) = cur.bump_if(|c| c == open || c == '\\') {
            return Some(c);
        }
        let rest = cur.rest();
        let (key, value) = self
            .escapes
            .iter()
            .filter(|(key, _)| !key.is_empty() && rest.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())?;
        cur.advance_bytes(key.len());
        Some(*value)
    }
}

/// A string between double quotes.
///
/// `\"` and `\\` stand for the quote and the backslash.
pub fn quoted_string() -> Parser {
    quoted_string_with("\"", &[])
}

/// A string between any one of `quotes`, closed by the same quote.
///
/// Besides `\<quote>` and `\\`, a backslash followed by one of the
/// `escapes` keys stands for its value; the longest key wins. Any other
/// escape fails the parse.
///
/// # Panics
///
/// Panics if `quotes` is empty.
#[track_caller]
pub fn quoted_string_with(quotes: &str, escapes: &[(&str, char)]) -> Parser {
    assert!(!quotes.is_empty(), "quoted_string needs at least one quote character");
    let spec = QuotedSpec {
        quotes: quotes.chars().collect(),
        escapes: escapes
            .iter()
            .map(|(key, value)| ((*key).to_owned(), *value))
            .collect(),
    };
    Parser::from_kind(Kind::Quoted(spec), Shape::String)
}
