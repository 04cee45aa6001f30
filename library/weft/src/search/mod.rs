//! Searching, splitting and replacing with a parser.
//!
//! A search finds the first position where a parser matches and returns
//! the matched span. It parses a prefix of the input with the grammar
//! `omit[*(char_ - p)] >> -raw[p]`: skip characters where `p` does not
//! match, then capture what `p` matches. Once the input runs out without
//! a match, the search fails.
//!
//! `search_all`, `split`, `replace` and `transform_replace` repeat the
//! search after each match. They skip empty matches and resume one
//! character further on.
//!
//! The free functions search without rule bodies. A grammar that calls
//! rules searches through the same methods on a configured [`Parse`],
//! which pass its rules, skip parser, tracing and error handler to every
//! parse they run. Globals and rule callbacks are not used.

use weft_attr::Attribute;
use weft_diagnostic::{DefaultErrorHandler, ErrorHandler};
use weft_text::Span;

use crate::directive::{omit, raw};
use crate::driver::{Parse, Trace};
use crate::parser::Parser;
use crate::primitive::char_;
use crate::rule::RuleSet;

/// The search grammar for `parser`.
fn finder(parser: &Parser) -> Parser {
    omit((char_() - parser).zero_or_more()) >> -raw(parser)
}

#[derive(Clone)]
struct Searcher<'a> {
    input: &'a str,
    parser: Parser,
    finder: Parser,
    skipper: Option<Parser>,
    rules: Option<&'a RuleSet>,
    trace: Trace,
    handler: &'a dyn ErrorHandler,
}

impl<'a> Searcher<'a> {
    fn new(input: &'a str, parser: &Parser, skipper: Option<&Parser>) -> Self {
        Searcher {
            input,
            parser: parser.clone(),
            finder: finder(parser),
            skipper: skipper.cloned(),
            rules: None,
            trace: Trace::Off,
            handler: &DefaultErrorHandler,
        }
    }

    /// A searcher running its parses with `parse`'s settings.
    fn configured<'p: 'a>(input: &'a str, parser: &Parser, parse: &Parse<'p>) -> Self {
        Searcher {
            rules: parse.rules,
            trace: parse.trace,
            handler: parse.handler,
            ..Searcher::new(input, parser, parse.skipper)
        }
    }

    fn parse(&self) -> Parse<'_> {
        let mut parse = Parse::new().trace(self.trace).error_handler(self.handler);
        if let Some(rules) = self.rules {
            parse = parse.rules(rules);
        }
        if let Some(skipper) = &self.skipper {
            parse = parse.skip(skipper);
        }
        parse
    }

    fn all(self) -> SearchAll<'a> {
        SearchAll {
            searcher: self,
            next_start: Some(0),
        }
    }

    /// The first match at or after `start`, empty or not.
    fn find_from(&self, start: usize) -> Option<Span> {
        let (attr, _) = self
            .parse()
            .run(self.input, start, &self.finder, false)
            .ok()
            .flatten()?;
        match attr {
            Attribute::Optional(Some(found)) => found.as_span(),
            _ => None,
        }
    }

    /// The first non-empty match at or after `start`.
    fn find_non_empty(&self, mut start: usize) -> Option<Span> {
        while start <= self.input.len() {
            let span = self.find_from(start)?;
            if !span.is_empty() {
                return Some(span);
            }
            let next = self.input[span.end..].chars().next()?;
            start = span.end + next.len_utf8();
        }
        None
    }

    /// The attribute `parser` produces for the match at `span`.
    fn attribute_at(&self, span: Span) -> Attribute {
        self.parse()
            .run(self.input, span.start, &self.parser, false)
            .ok()
            .flatten()
            .map_or(Attribute::None, |(attr, _)| attr)
    }
}

/// The first span of `input` matched by `parser`.
///
/// ```
/// use weft::{search, int_};
///
/// let span = search("abc 42 def", &int_()).unwrap();
/// assert_eq!(span.slice("abc 42 def"), "42");
/// ```
pub fn search(input: &str, parser: &Parser) -> Option<Span> {
    Searcher::new(input, parser, None).find_from(0)
}

pub fn search_with_skip(input: &str, parser: &Parser, skipper: &Parser) -> Option<Span> {
    Searcher::new(input, parser, Some(skipper)).find_from(0)
}

/// Iterator over the non-overlapping, non-empty matches of a parser.
pub struct SearchAll<'a> {
    searcher: Searcher<'a>,
    next_start: Option<usize>,
}

impl Iterator for SearchAll<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let start = self.next_start?;
        let span = self.searcher.find_non_empty(start);
        self.next_start = span.map(|span| span.end);
        span
    }
}

pub fn search_all<'a>(input: &'a str, parser: &Parser) -> SearchAll<'a> {
    Searcher::new(input, parser, None).all()
}

pub fn search_all_with_skip<'a>(input: &'a str, parser: &Parser, skipper: &Parser) -> SearchAll<'a> {
    Searcher::new(input, parser, Some(skipper)).all()
}

/// Iterator over the text between matches of a parser.
///
/// A match at the start of the input yields an empty first piece, and a
/// match at the end yields an empty last piece. Empty input yields
/// nothing.
pub struct Split<'a> {
    input: &'a str,
    matches: SearchAll<'a>,
    piece_start: Option<usize>,
}

impl<'a> Iterator for Split<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.piece_start?;
        match self.matches.next() {
            Some(span) => {
                self.piece_start = Some(span.end);
                Some(&self.input[start..span.start])
            }
            None => {
                self.piece_start = None;
                Some(&self.input[start..])
            }
        }
    }
}

fn split_matches<'a>(input: &'a str, matches: SearchAll<'a>) -> Split<'a> {
    Split {
        input,
        matches,
        piece_start: (!input.is_empty()).then_some(0),
    }
}

/// ```
/// use weft::{lit, split};
///
/// let pieces: Vec<&str> = split("a,b,,c", &lit(',')).collect();
/// assert_eq!(pieces, ["a", "b", "", "c"]);
/// ```
pub fn split<'a>(input: &'a str, parser: &Parser) -> Split<'a> {
    split_matches(input, search_all(input, parser))
}

pub fn split_with_skip<'a>(input: &'a str, parser: &Parser, skipper: &Parser) -> Split<'a> {
    split_matches(input, search_all_with_skip(input, parser, skipper))
}

fn replace_matches(
    input: &str,
    matches: SearchAll<'_>,
    mut replacement: impl FnMut(Span) -> String,
) -> String {
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    for span in matches {
        out.push_str(&input[copied..span.start]);
        out.push_str(&replacement(span));
        copied = span.end;
    }
    out.push_str(&input[copied..]);
    out
}

/// Replace every match of `parser` with `replacement`.
pub fn replace(input: &str, parser: &Parser, replacement: &str) -> String {
    replace_matches(input, search_all(input, parser), |_| replacement.to_owned())
}

pub fn replace_with_skip(input: &str, parser: &Parser, skipper: &Parser, replacement: &str) -> String {
    replace_matches(input, search_all_with_skip(input, parser, skipper), |_| {
        replacement.to_owned()
    })
}

/// Replace every match of `parser` with `f` applied to the match's
/// attribute.
pub fn transform_replace(input: &str, parser: &Parser, f: impl FnMut(Attribute) -> String) -> String {
    transform_matches(input, search_all(input, parser), f)
}

pub fn transform_replace_with_skip(
    input: &str,
    parser: &Parser,
    skipper: &Parser,
    f: impl FnMut(Attribute) -> String,
) -> String {
    transform_matches(input, search_all_with_skip(input, parser, skipper), f)
}

fn transform_matches(input: &str, matches: SearchAll<'_>, mut f: impl FnMut(Attribute) -> String) -> String {
    let searcher = matches.searcher.clone();
    replace_matches(input, matches, |span| f(searcher.attribute_at(span)))
}

impl<'p> Parse<'p> {
    /// Like [`search`], with this parse's settings.
    ///
    /// ```
    /// use weft::{uint_, Parse, Rule, RuleSet, Shape, Span};
    ///
    /// let number = Rule::new("number", Shape::UInt);
    /// let mut rules = RuleSet::new();
    /// rules.define(&number, uint_()).unwrap();
    ///
    /// let span = Parse::new().rules(&rules).search("ab 12", &number.call());
    /// assert_eq!(span, Some(Span::new(3, 5)));
    /// ```
    pub fn search(&self, input: &str, parser: &Parser) -> Option<Span> {
        Searcher::configured(input, parser, self).find_from(0)
    }

    /// Like [`search_all`], with this parse's settings.
    pub fn search_all<'a>(&self, input: &'a str, parser: &Parser) -> SearchAll<'a>
    where
        'p: 'a,
    {
        Searcher::configured(input, parser, self).all()
    }

    /// Like [`split`], with this parse's settings.
    pub fn split<'a>(&self, input: &'a str, parser: &Parser) -> Split<'a>
    where
        'p: 'a,
    {
        split_matches(input, self.search_all(input, parser))
    }

    /// Like [`replace`], with this parse's settings.
    pub fn replace(&self, input: &str, parser: &Parser, replacement: &str) -> String {
        replace_matches(input, self.search_all(input, parser), |_| replacement.to_owned())
    }

    /// Like [`transform_replace`], with this parse's settings.
    pub fn transform_replace(
        &self,
        input: &str,
        parser: &Parser,
        f: impl FnMut(Attribute) -> String,
    ) -> String {
        transform_matches(input, self.search_all(input, parser), f)
    }
}
