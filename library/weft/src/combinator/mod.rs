//! Combinators: sequence, alternative, permutation, repetition, optional,
//! lookahead, difference and switch.
//!
//! # Operators
//!
//! | Notation   | Rust                        |
//! |------------|-----------------------------|
//! | `a >> b`   | `a >> b`                    |
//! | `a > b`    | `a.then_require(b)`         |
//! | `a \| b`   | `a \| b`                    |
//! | `a \|\| b` | `a.perm(b)`                 |
//! | `*p`, `+p` | `p.zero_or_more()`, `p.one_or_more()` |
//! | `-p`       | `-p`                        |
//! | `!p`, `&p` | `!p`, `p.and_pred()`        |
//! | `p % d`    | `p % d`                     |
//! | `a - b`    | `a - b`                     |
//! | `switch_(v)(v1, p1)` | `switch_(v).case(v1, p1)` |
//!
//! `char` and `&str` operands are literals. Sequences, alternatives and
//! permutations flatten: `a >> b >> c` is one three-element sequence.

use std::ops::{BitOr, Neg, Not, Rem, Shr, Sub};

use smallvec::{smallvec, SmallVec};
use weft_attr::{Attribute, Grouping, SeqLayout, Shape};
use weft_diagnostic::ParseError;
use weft_text::Cursor;

use crate::context::{ContextView, ParseFlags, ParseState, Scope};
use crate::parser::{Kind, PResult, Parser, RepeatStyle};
use crate::rule::Param;

/// Build a sequence node.
pub(crate) fn sequence(children: Vec<Parser>, committed: Vec<bool>, grouping: Grouping) -> Parser {
    let shapes: Vec<Shape> = children.iter().map(|child| child.shape().clone()).collect();
    let layout = SeqLayout::new(&shapes, grouping);
    let shape = layout.shape();
    Parser::from_kind(
        Kind::Seq {
            children,
            committed,
            grouping,
            layout,
        },
        shape,
    )
}

/// Append `parser` to a flattened sequence, `committed` marking the
/// operator that joins it. A committed sequence operand commits all of
/// its children.
fn push_seq_part(children: &mut Vec<Parser>, flags: &mut Vec<bool>, parser: Parser, committed: bool) {
    match parser.kind() {
        Kind::Seq {
            children: inner,
            committed: inner_flags,
            grouping: Grouping::Default,
            ..
        } => {
            for (index, (child, flag)) in inner.iter().zip(inner_flags).enumerate() {
                children.push(child.clone());
                flags.push(committed || (index > 0 && *flag));
            }
        }
        _ => {
            children.push(parser);
            flags.push(committed);
        }
    }
}

fn join_seq(lhs: Parser, rhs: Parser, committed: bool) -> Parser {
    let mut children = Vec::new();
    let mut flags = Vec::new();
    push_seq_part(&mut children, &mut flags, lhs, false);
    push_seq_part(&mut children, &mut flags, rhs, committed);
    sequence(children, flags, Grouping::Default)
}

#[track_caller]
fn alternative(children: Vec<Parser>) -> Parser {
    if let Some((_, init)) = children.split_last() {
        assert!(
            !init.iter().any(Parser::is_unconditional_eps),
            "eps can only be the last branch of an alternative; later branches would never run"
        );
    }
    let shapes: Vec<Shape> = children.iter().map(|child| child.shape().clone()).collect();
    let shape = Shape::alternative(&shapes);
    Parser::from_kind(Kind::Alt(children), shape)
}

#[track_caller]
fn join_alt(lhs: Parser, rhs: Parser) -> Parser {
    let mut children = Vec::new();
    for parser in [lhs, rhs] {
        match parser.kind() {
            Kind::Alt(inner) => children.extend(inner.iter().cloned()),
            _ => children.push(parser),
        }
    }
    alternative(children)
}

fn join_perm(lhs: Parser, rhs: Parser) -> Parser {
    let mut children = Vec::new();
    for parser in [lhs, rhs] {
        match parser.kind() {
            Kind::Perm { children: inner, .. } => children.extend(inner.iter().cloned()),
            _ => children.push(parser),
        }
    }
    let shapes: Vec<Shape> = children.iter().map(|child| child.shape().clone()).collect();
    let layout = SeqLayout::new(&shapes, Grouping::Default);
    let shape = layout.shape();
    Parser::from_kind(Kind::Perm { children, layout }, shape)
}

#[track_caller]
fn repetition(
    child: Parser,
    min: usize,
    max: Option<usize>,
    delimiter: Option<Parser>,
    style: RepeatStyle,
) -> Parser {
    assert!(
        !(child.is_unconditional_eps() && delimiter.is_none() && max.is_none()),
        "unbounded repetition of eps never terminates"
    );
    if let Some(max) = max {
        assert!(min <= max, "repeat({min}, {max}): minimum exceeds maximum");
    }
    let shape = child.shape().clone().repeated();
    Parser::from_kind(
        Kind::Repeat {
            child,
            min,
            max,
            delimiter,
            style,
        },
        shape,
    )
}

impl Parser {
    /// Committed sequence (`self > next`): once `self` has matched, a
    /// failure of `next` is a hard parse error that no enclosing
    /// alternative can recover from.
    pub fn then_require(&self, next: impl Into<Parser>) -> Parser {
        join_seq(self.clone(), next.into(), true)
    }

    /// Permutation (`self || other`): both, in either order.
    pub fn perm(&self, other: impl Into<Parser>) -> Parser {
        join_perm(self.clone(), other.into())
    }

    /// `*self`.
    #[track_caller]
    pub fn zero_or_more(&self) -> Parser {
        repetition(self.clone(), 0, None, None, RepeatStyle::ZeroOrMore)
    }

    /// `+self`.
    #[track_caller]
    pub fn one_or_more(&self) -> Parser {
        repetition(self.clone(), 1, None, None, RepeatStyle::OneOrMore)
    }

    /// Between `min` and `max` repetitions; `None` means no upper bound.
    #[track_caller]
    pub fn repeat(&self, min: usize, max: Option<usize>) -> Parser {
        repetition(self.clone(), min, max, None, RepeatStyle::Counted)
    }

    /// `self % delimiter`: one or more, separated by `delimiter`.
    pub fn separated_by(&self, delimiter: impl Into<Parser>) -> Parser {
        repetition(self.clone(), 1, None, Some(delimiter.into()), RepeatStyle::Delimited)
    }

    /// `-self`.
    pub fn optional(&self) -> Parser {
        let shape = self.shape().clone().optional();
        Parser::from_kind(Kind::Optional(self.clone()), shape)
    }

    /// `&self`: succeeds without consuming when `self` would match.
    pub fn and_pred(&self) -> Parser {
        self.lookahead(false)
    }

    /// Same as [`and_pred`](Self::and_pred).
    pub fn peek(&self) -> Parser {
        self.and_pred()
    }

    /// `!self`: succeeds without consuming when `self` would not match.
    pub fn not_pred(&self) -> Parser {
        self.lookahead(true)
    }

    fn lookahead(&self, negate: bool) -> Parser {
        Parser::from_kind(
            Kind::Lookahead {
                child: self.clone(),
                negate,
            },
            Shape::None,
        )
    }

    /// `self - excluded`: `self`, unless `excluded` matches here.
    pub fn except(&self, excluded: impl Into<Parser>) -> Parser {
        let shape = self.shape().clone();
        Parser::from_kind(
            Kind::Difference {
                child: self.clone(),
                excluded: excluded.into(),
            },
            shape,
        )
    }
}

/// `switch_(value)`: dispatch on `value`. Add branches with
/// [`Parser::case`]; a switch with no case equal to `value` fails.
pub fn switch_(value: impl Into<Attribute>) -> Parser {
    switch_node(Param::value(value), Vec::new())
}

/// Like [`switch_`], with the value computed from the context each time
/// the switch runs.
pub fn switch_with(f: impl Fn(&ContextView<'_>) -> Attribute + Send + Sync + 'static) -> Parser {
    switch_node(Param::from_fn(f), Vec::new())
}

fn switch_node(value: Param, cases: Vec<(Attribute, Parser)>) -> Parser {
    let shapes: Vec<Shape> = cases.iter().map(|(_, case)| case.shape().clone()).collect();
    let shape = Shape::alternative(&shapes);
    Parser::from_kind(Kind::Switch { value, cases }, shape)
}

impl Parser {
    /// Add a branch to a switch: `p` runs when the switch value equals
    /// `value`.
    ///
    /// # Panics
    ///
    /// Panics if `self` was not built by [`switch_`] or [`switch_with`].
    #[track_caller]
    pub fn case(&self, value: impl Into<Attribute>, p: impl Into<Parser>) -> Parser {
        let Kind::Switch { value: switch, cases } = self.kind() else {
            panic!("case() only applies to switch_, found {self}");
        };
        let mut cases = cases.clone();
        cases.push((value.into(), p.into()));
        switch_node(switch.clone(), cases)
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $build:expr) => {
        impl<T: Into<Parser>> $trait<T> for Parser {
            type Output = Parser;

            #[track_caller]
            fn $method(self, rhs: T) -> Parser {
                $build(self, rhs.into())
            }
        }

        impl<T: Into<Parser>> $trait<T> for &Parser {
            type Output = Parser;

            #[track_caller]
            fn $method(self, rhs: T) -> Parser {
                $build(self.clone(), rhs.into())
            }
        }

        impl $trait<Parser> for char {
            type Output = Parser;

            #[track_caller]
            fn $method(self, rhs: Parser) -> Parser {
                $build(Parser::from(self), rhs)
            }
        }

        impl $trait<Parser> for &str {
            type Output = Parser;

            #[track_caller]
            fn $method(self, rhs: Parser) -> Parser {
                $build(Parser::from(self), rhs)
            }
        }
    };
}

binary_operator!(Shr, shr, |lhs, rhs| join_seq(lhs, rhs, false));
binary_operator!(BitOr, bitor, join_alt);
binary_operator!(Rem, rem, |lhs: Parser, rhs| lhs.separated_by(rhs));
binary_operator!(Sub, sub, |lhs: Parser, rhs| lhs.except(rhs));

impl Neg for Parser {
    type Output = Parser;

    fn neg(self) -> Parser {
        self.optional()
    }
}

impl Neg for &Parser {
    type Output = Parser;

    fn neg(self) -> Parser {
        self.optional()
    }
}

impl Not for Parser {
    type Output = Parser;

    fn not(self) -> Parser {
        self.not_pred()
    }
}

impl Not for &Parser {
    type Output = Parser;

    fn not(self) -> Parser {
        self.not_pred()
    }
}

pub(crate) fn eval_seq<'p, 'i>(
    children: &'p [Parser],
    committed: &[bool],
    layout: &SeqLayout,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let start = cur.snapshot();
    let gen = scope.gen_attrs();
    let mut slots = if gen { layout.begin() } else { Vec::new() };
    let mut produced = false;

    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            st.skip(scope, cur)?;
        }
        match child.eval(st, scope, cur)? {
            Some(attr) => {
                if gen && !attr.is_none() {
                    produced = true;
                    layout.place(&mut slots, index, attr);
                }
            }
            None if committed.get(index).copied().unwrap_or(false) => {
                return Err(ParseError::new(cur.position(), child.to_string()));
            }
            None => {
                cur.restore(start);
                return Ok(None);
            }
        }
    }

    // Children that all came back empty (a directly recursive rule call,
    // say) leave nothing to assemble.
    Ok(Some(if gen && produced {
        layout.finish(slots)
    } else {
        Attribute::None
    }))
}

/// Wrap a branch's attribute for an alternative of shape `alt_shape`.
fn alt_value(attr: Attribute, branch: &Shape, alt_shape: &Shape) -> Attribute {
    if !matches!(alt_shape, Shape::Optional(_)) {
        return attr;
    }
    match (branch, attr) {
        (Shape::None, _) | (_, Attribute::None) => Attribute::Optional(None),
        (Shape::Optional(_), attr) => attr,
        (_, attr) => Attribute::some(attr),
    }
}

pub(crate) fn eval_alt<'p, 'i>(
    children: &'p [Parser],
    shape: &Shape,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let start = cur.snapshot();
    for child in children {
        cur.restore(start);
        st.skip(scope, cur)?;
        if let Some(attr) = child.eval(st, scope, cur)? {
            return Ok(Some(scope.attr(|| alt_value(attr, child.shape(), shape))));
        }
    }
    cur.restore(start);
    Ok(None)
}

pub(crate) fn eval_switch<'p, 'i>(
    value: &Param,
    cases: &'p [(Attribute, Parser)],
    shape: &Shape,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let value = value.resolve(&st.view(scope, cur.position()));
    let target = value.shape_of();
    let Some((_, child)) = cases
        .iter()
        .find(|(case, _)| case.clone().coerce_to(&target) == value)
    else {
        return Ok(None);
    };

    let start = cur.snapshot();
    st.skip(scope, cur)?;
    match child.eval(st, scope, cur)? {
        Some(attr) => Ok(Some(scope.attr(|| alt_value(attr, child.shape(), shape)))),
        None => {
            cur.restore(start);
            Ok(None)
        }
    }
}

pub(crate) fn eval_perm<'p, 'i>(
    children: &'p [Parser],
    layout: &SeqLayout,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let start = cur.snapshot();
    let mut found: SmallVec<[Option<Attribute>; 4]> = smallvec![None; children.len()];
    let mut remaining = children.len();

    while remaining > 0 {
        let mut progressed = false;
        for (index, child) in children.iter().enumerate() {
            if found[index].is_some() {
                continue;
            }
            let before = cur.snapshot();
            st.skip(scope, cur)?;
            if let Some(attr) = child.eval(st, scope, cur)? {
                found[index] = Some(attr);
                remaining -= 1;
                progressed = true;
                break;
            }
            cur.restore(before);
        }
        if !progressed {
            cur.restore(start);
            return Ok(None);
        }
    }

    if !scope.gen_attrs() {
        return Ok(Some(Attribute::None));
    }
    let mut slots = layout.begin();
    for (index, attr) in found.into_iter().enumerate() {
        if let Some(attr) = attr {
            layout.place(&mut slots, index, attr);
        }
    }
    Ok(Some(layout.finish(slots)))
}

/// Add one repetition's attribute to the container.
fn append(container: &mut Attribute, attr: Attribute) {
    match (container, attr) {
        (_, Attribute::None) => {}
        (Attribute::String(s), Attribute::Char(c)) => s.push(c),
        (Attribute::String(s), Attribute::String(t)) => s.push_str(&t),
        (Attribute::Seq(items), attr) => items.push(attr),
        _ => {}
    }
}

#[expect(clippy::too_many_arguments, reason = "one argument per repeat field plus the parse state")]
pub(crate) fn eval_repeat<'p, 'i>(
    child: &'p Parser,
    min: usize,
    max: Option<usize>,
    delimiter: Option<&'p Parser>,
    shape: &Shape,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let start = cur.snapshot();
    let mut out = scope.attr(|| shape.default_value());
    let mut count = 0;

    while max.map_or(true, |max| count < max) {
        let before = cur.snapshot();
        st.skip(scope, cur)?;
        if count > 0 {
            if let Some(delimiter) = delimiter {
                if delimiter
                    .eval(st, scope.without(ParseFlags::GEN_ATTRS), cur)?
                    .is_none()
                {
                    cur.restore(before);
                    break;
                }
                st.skip(scope, cur)?;
            }
        }
        let Some(attr) = child.eval(st, scope, cur)? else {
            cur.restore(before);
            break;
        };
        count += 1;
        append(&mut out, attr);
        if max.is_none() && cur.position() == before.position() {
            break;
        }
    }

    if count < min {
        cur.restore(start);
        return Ok(None);
    }
    Ok(Some(out))
}

pub(crate) fn eval_optional<'p, 'i>(
    child: &'p Parser,
    shape: &Shape,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let attr = child.eval(st, scope, cur)?;
    Ok(Some(optional_value(attr, shape, scope)))
}

/// The attribute of an optional parser of shape `shape` whose child
/// produced `attr`.
pub(crate) fn optional_value(attr: Option<Attribute>, shape: &Shape, scope: Scope<'_>) -> Attribute {
    if shape.is_none() || !scope.gen_attrs() {
        return Attribute::None;
    }
    match attr {
        None | Some(Attribute::None) => Attribute::Optional(None),
        Some(attr @ Attribute::Optional(_)) => attr,
        Some(attr) => Attribute::some(attr),
    }
}

pub(crate) fn eval_lookahead<'p, 'i>(
    child: &'p Parser,
    negate: bool,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let mut probe = *cur;
    let matched = child
        .eval(st, scope.without(ParseFlags::GEN_ATTRS), &mut probe)?
        .is_some();
    Ok((matched != negate).then_some(Attribute::None))
}

pub(crate) fn eval_difference<'p, 'i>(
    child: &'p Parser,
    excluded: &'p Parser,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let mut probe = *cur;
    if excluded
        .eval(st, scope.without(ParseFlags::GEN_ATTRS), &mut probe)?
        .is_some()
    {
        return Ok(None);
    }
    child.eval(st, scope, cur)
}

#[cfg(test)]
mod tests;
