//! Leaf parsers.
//!
//! A primitive either advances the cursor and succeeds, or fails and
//! leaves the cursor where it was. Under `no_case`, character and literal
//! comparisons fold both sides first.

use std::sync::Arc;

use weft_attr::{Attribute, Shape};
use weft_text::class::{is_blank, is_eol, is_ws};
use weft_text::fold::{eq_no_case, fold_str, in_range_no_case, match_folded};
use weft_text::{CharClass, Cursor};

use crate::context::{ContextView, Scope};
use crate::parser::{Kind, Parser};

mod numeric;
mod quoted;

pub use numeric::{bin, double_, hex, int_, oct, uint_, Numeric};
pub(crate) use numeric::{parse_float, NumericSpec};
pub use quoted::{quoted_string, quoted_string_with};
pub(crate) use quoted::QuotedSpec;

/// What a single-character parser accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CharMatch {
    Any,
    Eq(char),
    Range(char, char),
    Set(Vec<char>),
    Class(CharClass),
}

impl CharMatch {
    pub(crate) fn matches(&self, c: char, no_case: bool) -> bool {
        match self {
            CharMatch::Any => true,
            CharMatch::Eq(expected) => same_char(c, *expected, no_case),
            CharMatch::Range(lo, hi) if no_case => in_range_no_case(c, *lo, *hi),
            CharMatch::Range(lo, hi) => (*lo..=*hi).contains(&c),
            CharMatch::Set(set) => set.iter().any(|expected| same_char(c, *expected, no_case)),
            CharMatch::Class(CharClass::Lower | CharClass::Upper) if no_case => {
                CharClass::Lower.matches(c) || CharClass::Upper.matches(c)
            }
            CharMatch::Class(class) => class.matches(c),
        }
    }
}

fn same_char(c: char, expected: char, no_case: bool) -> bool {
    if no_case {
        eq_no_case(c, expected)
    } else {
        c == expected
    }
}

fn char_parser(matcher: CharMatch) -> Parser {
    Parser::from_kind(Kind::Char(matcher), Shape::Char)
}

/// Any single character.
pub fn char_() -> Parser {
    char_parser(CharMatch::Any)
}

/// Exactly the character `c`, producing it as the attribute.
pub fn char_eq(c: char) -> Parser {
    char_parser(CharMatch::Eq(c))
}

/// One character in `lo..=hi`.
///
/// # Panics
///
/// Panics if `lo > hi`.
#[track_caller]
pub fn char_range(lo: char, hi: char) -> Parser {
    assert!(lo <= hi, "char_('{lo}', '{hi}'): empty range");
    char_parser(CharMatch::Range(lo, hi))
}

/// One character out of `set`.
pub fn char_set(set: &str) -> Parser {
    char_parser(CharMatch::Set(set.chars().collect()))
}

pub fn digit() -> Parser {
    char_parser(CharMatch::Class(CharClass::Digit))
}

pub fn hex_digit() -> Parser {
    char_parser(CharMatch::Class(CharClass::HexDigit))
}

pub fn control() -> Parser {
    char_parser(CharMatch::Class(CharClass::Control))
}

pub fn punct() -> Parser {
    char_parser(CharMatch::Class(CharClass::Punct))
}

pub fn symb() -> Parser {
    char_parser(CharMatch::Class(CharClass::Symbol))
}

pub fn lower() -> Parser {
    char_parser(CharMatch::Class(CharClass::Lower))
}

pub fn upper() -> Parser {
    char_parser(CharMatch::Class(CharClass::Upper))
}

pub fn alpha() -> Parser {
    char_parser(CharMatch::Class(CharClass::Alpha))
}

pub fn alnum() -> Parser {
    char_parser(CharMatch::Class(CharClass::Alnum))
}

/// Literal text that produces no attribute.
///
/// `char` and `&str` operands of the combinator operators are turned into
/// literals with this function.
pub fn lit(text: impl Into<String>) -> Parser {
    let text = text.into();
    let folded = fold_str(&text);
    Parser::from_kind(Kind::Lit { text, folded }, Shape::None)
}

/// Literal text whose attribute is the matched input.
pub fn string(text: impl Into<String>) -> Parser {
    let text = text.into();
    let folded = fold_str(&text);
    Parser::from_kind(Kind::Str { text, folded }, Shape::String)
}

/// One whitespace character, or `\r\n`.
pub fn ws() -> Parser {
    Parser::from_kind(Kind::Ws, Shape::None)
}

/// One line break, or `\r\n`.
pub fn eol() -> Parser {
    Parser::from_kind(Kind::Eol, Shape::None)
}

/// One whitespace character that is not a line break.
pub fn blank() -> Parser {
    Parser::from_kind(Kind::Blank, Shape::None)
}

/// Always matches, consuming nothing.
pub fn eps() -> Parser {
    Parser::from_kind(Kind::Eps(None), Shape::None)
}

/// Matches without consuming when `pred` returns true.
pub fn eps_if(pred: impl Fn(&ContextView<'_>) -> bool + Send + Sync + 'static) -> Parser {
    Parser::from_kind(Kind::Eps(Some(Arc::new(pred))), Shape::None)
}

/// Matches only at the end of the input.
pub fn eoi() -> Parser {
    Parser::from_kind(Kind::Eoi, Shape::None)
}

/// Matches without consuming and produces `value`.
pub fn attr(value: impl Into<Attribute>) -> Parser {
    let value = value.into();
    let shape = value.shape_of();
    Parser::from_kind(Kind::Attr(value), shape)
}

/// `true` or `false`.
pub fn bool_() -> Parser {
    Parser::from_kind(Kind::Bool, Shape::Bool)
}

/// Match `text` (or its folded form) at the cursor, returning the input
/// bytes it covers.
fn match_text(text: &str, folded: &[char], scope: Scope<'_>, cur: &Cursor<'_>) -> Option<usize> {
    if scope.no_case() {
        match_folded(cur.rest(), folded)
    } else {
        cur.rest().starts_with(text).then_some(text.len())
    }
}

pub(crate) fn parse_char(matcher: &CharMatch, scope: Scope<'_>, cur: &mut Cursor<'_>) -> Option<Attribute> {
    let c = cur.bump_if(|c| matcher.matches(c, scope.no_case()))?;
    Some(scope.attr(|| Attribute::Char(c)))
}

pub(crate) fn parse_lit(text: &str, folded: &[char], scope: Scope<'_>, cur: &mut Cursor<'_>) -> Option<Attribute> {
    let len = match_text(text, folded, scope, cur)?;
    cur.advance_bytes(len);
    Some(Attribute::None)
}

pub(crate) fn parse_str(text: &str, folded: &[char], scope: Scope<'_>, cur: &mut Cursor<'_>) -> Option<Attribute> {
    let start = cur.position();
    let len = match_text(text, folded, scope, cur)?;
    cur.advance_bytes(len);
    Some(scope.attr(|| Attribute::String(cur.slice_from(start).to_owned())))
}

/// Match one character accepted by `pred`, treating `\r\n` as one.
pub(crate) fn parse_break(pred: fn(char) -> bool, cur: &mut Cursor<'_>) -> Option<Attribute> {
    if pred('\r') && cur.eat_str("\r\n") {
        return Some(Attribute::None);
    }
    cur.bump_if(pred)?;
    Some(Attribute::None)
}

pub(crate) fn parse_ws(cur: &mut Cursor<'_>) -> Option<Attribute> {
    parse_break(is_ws, cur)
}

pub(crate) fn parse_eol(cur: &mut Cursor<'_>) -> Option<Attribute> {
    parse_break(is_eol, cur)
}

pub(crate) fn parse_blank(cur: &mut Cursor<'_>) -> Option<Attribute> {
    cur.bump_if(is_blank)?;
    Some(Attribute::None)
}

pub(crate) fn parse_bool(scope: Scope<'_>, cur: &mut Cursor<'_>) -> Option<Attribute> {
    for (text, value) in [("true", true), ("false", false)] {
        if let Some(len) = match_text(text, &fold_str(text), scope, cur) {
            cur.advance_bytes(len);
            return Some(scope.attr(|| Attribute::Bool(value)));
        }
    }
    None
}

#[cfg(test)]
mod tests;
