//! Directives: `omit[p]`, `raw[p]`, `string_view[p]`, `lexeme[p]`,
//! `no_case[p]`, `skip[p]`, `skip(s)[p]`, `merge[p]`, `separate[p]` and
//! `if_(pred)[p]`.
//!
//! Directives change how their child is parsed (attribute generation,
//! skipping, case sensitivity) or what it produces, and restore the
//! caller's settings when the child returns.

use std::sync::Arc;

use weft_attr::{Attribute, Grouping, Shape};
use weft_text::Cursor;

use crate::combinator::{optional_value, sequence};
use crate::context::{ContextView, ParseFlags, ParseState, PredicateFn, Scope};
use crate::parser::{Directive, Kind, PResult, Parser};

fn directive(directive: Directive, child: impl Into<Parser>, shape: Shape) -> Parser {
    Parser::from_kind(
        Kind::Directive {
            directive,
            child: child.into(),
        },
        shape,
    )
}

/// Parse `p` without producing an attribute.
pub fn omit(p: impl Into<Parser>) -> Parser {
    directive(Directive::Omit, p, Shape::None)
}

/// Parse `p` and produce the span of input it matched.
pub fn raw(p: impl Into<Parser>) -> Parser {
    directive(Directive::Raw, p, Shape::Raw)
}

/// Same as [`raw`]; the span views the input rather than copying it.
pub fn string_view(p: impl Into<Parser>) -> Parser {
    directive(Directive::StringView, p, Shape::Raw)
}

/// Parse `p` without skipping inside it.
pub fn lexeme(p: impl Into<Parser>) -> Parser {
    let p = p.into();
    let shape = p.shape().clone();
    directive(Directive::Lexeme, p, shape)
}

/// Parse `p` ignoring case.
pub fn no_case(p: impl Into<Parser>) -> Parser {
    let p = p.into();
    let shape = p.shape().clone();
    directive(Directive::NoCase, p, shape)
}

/// Parse `p` with skipping turned back on, using the ambient skip parser.
pub fn skip(p: impl Into<Parser>) -> Parser {
    skip_parser(p.into(), None)
}

/// Parse `p` skipping with `skipper`.
pub fn skip_with(skipper: impl Into<Parser>, p: impl Into<Parser>) -> Parser {
    skip_parser(p.into(), Some(skipper.into()))
}

fn skip_parser(child: Parser, skipper: Option<Parser>) -> Parser {
    let shape = child.shape().clone();
    Parser::from_kind(Kind::Skip { child, skipper }, shape)
}

/// `if_(pred)[p]`: parse `p` only when `pred` holds.
///
/// Same as `-(eps_if(pred) >> p)`: never fails, and produces `p`'s
/// attribute as an optional.
pub fn if_(
    pred: impl Fn(&ContextView<'_>) -> bool + Send + Sync + 'static,
    p: impl Into<Parser>,
) -> Parser {
    let child = p.into();
    let shape = child.shape().clone().optional();
    Parser::from_kind(
        Kind::If {
            pred: Arc::new(pred),
            child,
        },
        shape,
    )
}

/// Regroup a sequence so that all its children share one attribute slot.
///
/// # Panics
///
/// Panics if `p` is not a sequence, or if its children's attributes
/// cannot be combined into one.
#[track_caller]
pub fn merge(p: impl Into<Parser>) -> Parser {
    regroup(p.into(), Grouping::Merge, "merge")
}

/// Regroup a sequence so that every child gets its own attribute slot.
///
/// # Panics
///
/// Panics if `p` is not a sequence.
#[track_caller]
pub fn separate(p: impl Into<Parser>) -> Parser {
    regroup(p.into(), Grouping::Separate, "separate")
}

#[track_caller]
fn regroup(p: Parser, grouping: Grouping, name: &str) -> Parser {
    match p.kind() {
        Kind::Seq {
            children, committed, ..
        } => sequence(children.clone(), committed.clone(), grouping),
        _ => panic!("{name}[] only applies to a sequence, found {p}"),
    }
}

pub(crate) fn eval_directive<'p, 'i>(
    directive: Directive,
    child: &'p Parser,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    match directive {
        Directive::Omit => Ok(child
            .eval(st, scope.without(ParseFlags::GEN_ATTRS), cur)?
            .map(|_| Attribute::None)),
        Directive::Raw | Directive::StringView => {
            let start = cur.position();
            let matched = child.eval(st, scope.without(ParseFlags::GEN_ATTRS), cur)?;
            Ok(matched.map(|_| scope.attr(|| Attribute::Raw(cur.span_from(start)))))
        }
        Directive::Lexeme => child.eval(st, scope.without(ParseFlags::USE_SKIP), cur),
        Directive::NoCase => {
            let inner = Scope {
                no_case: scope.no_case.saturating_add(1),
                ..scope
            };
            child.eval(st, inner, cur)
        }
    }
}

pub(crate) fn eval_if<'p, 'i>(
    pred: &PredicateFn,
    child: &'p Parser,
    shape: &Shape,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    if !pred(&st.view(scope, cur.position())) {
        return Ok(Some(optional_value(None, shape, scope)));
    }
    let start = cur.snapshot();
    st.skip(scope, cur)?;
    let attr = child.eval(st, scope, cur)?;
    if attr.is_none() {
        cur.restore(start);
    }
    Ok(Some(optional_value(attr, shape, scope)))
}

pub(crate) fn eval_skip<'p, 'i>(
    child: &'p Parser,
    skipper: Option<&'p Parser>,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let inner = Scope {
        skipper: skipper.or(scope.skipper),
        ..scope.with(ParseFlags::USE_SKIP)
    };
    child.eval(st, inner, cur)
}
