//! Node dispatch.

use weft_attr::Attribute;
use weft_diagnostic::ParseError;
use weft_text::Cursor;

use super::{Kind, Parser};
use crate::action::{eval_action, eval_transform};
use crate::combinator::{
    eval_alt, eval_difference, eval_lookahead, eval_optional, eval_perm, eval_repeat, eval_seq,
    eval_switch,
};
use crate::context::{ParseFlags, ParseState, Scope};
use crate::directive::{eval_directive, eval_if, eval_skip};
use crate::primitive::{
    parse_blank, parse_bool, parse_char, parse_eol, parse_float, parse_lit, parse_str, parse_ws,
};
use crate::rule::eval_rule;
use crate::symbols::parse_symbols;
use crate::trace;

/// Outcome of running one parser.
///
/// - `Ok(Some(attr))`: matched; `attr` is `none` when attributes are off
/// - `Ok(None)`: no match; the cursor is back where the parser started
/// - `Err(_)`: a committed sequence step failed; unwinds to the driver
pub(crate) type PResult = Result<Option<Attribute>, ParseError>;

impl Parser {
    pub(crate) fn eval<'p, 'i>(
        &'p self,
        st: &mut ParseState<'p, 'i>,
        scope: Scope<'p>,
        cur: &mut Cursor<'i>,
    ) -> PResult {
        if scope.flags.has(ParseFlags::TRACE) {
            trace::traced(self, st, scope, cur)
        } else {
            self.eval_node(st, scope, cur)
        }
    }

    pub(crate) fn eval_node<'p, 'i>(
        &'p self,
        st: &mut ParseState<'p, 'i>,
        scope: Scope<'p>,
        cur: &mut Cursor<'i>,
    ) -> PResult {
        let produced = |attr: Attribute| scope.attr(|| attr);
        match self.kind() {
            Kind::Char(matcher) => Ok(parse_char(matcher, scope, cur)),
            Kind::Lit { text, folded } => Ok(parse_lit(text, folded, scope, cur)),
            Kind::Str { text, folded } => Ok(parse_str(text, folded, scope, cur)),
            Kind::Ws => Ok(parse_ws(cur)),
            Kind::Eol => Ok(parse_eol(cur)),
            Kind::Blank => Ok(parse_blank(cur)),
            Kind::Eps(None) => Ok(Some(Attribute::None)),
            Kind::Eps(Some(pred)) => {
                let pass = pred(&st.view(scope, cur.position()));
                Ok(pass.then_some(Attribute::None))
            }
            Kind::Eoi => Ok(cur.is_at_end().then_some(Attribute::None)),
            Kind::Attr(value) => Ok(Some(scope.attr(|| value.clone()))),
            Kind::Bool => Ok(parse_bool(scope, cur)),
            Kind::Numeric(spec) => Ok(spec.parse(cur).map(produced)),
            Kind::Float => Ok(parse_float(cur).map(produced)),
            Kind::Quoted(spec) => Ok(spec.parse(cur).map(produced)),
            Kind::Symbols(symbols) => Ok(parse_symbols(symbols, &mut st.symbols, scope, cur)),
            Kind::Seq {
                children,
                committed,
                layout,
                ..
            } => eval_seq(children, committed, layout, st, scope, cur),
            Kind::Alt(children) => eval_alt(children, self.shape(), st, scope, cur),
            Kind::Perm { children, layout } => eval_perm(children, layout, st, scope, cur),
            Kind::Repeat {
                child,
                min,
                max,
                delimiter,
                ..
            } => eval_repeat(
                child,
                *min,
                *max,
                delimiter.as_ref(),
                self.shape(),
                st,
                scope,
                cur,
            ),
            Kind::Optional(child) => eval_optional(child, self.shape(), st, scope, cur),
            Kind::Lookahead { child, negate } => eval_lookahead(child, *negate, st, scope, cur),
            Kind::Difference { child, excluded } => {
                eval_difference(child, excluded, st, scope, cur)
            }
            Kind::Switch { value, cases } => eval_switch(value, cases, self.shape(), st, scope, cur),
            Kind::If { pred, child } => eval_if(pred, child, self.shape(), st, scope, cur),
            Kind::Directive { directive, child } => {
                eval_directive(*directive, child, st, scope, cur)
            }
            Kind::Skip { child, skipper } => eval_skip(child, skipper.as_ref(), st, scope, cur),
            Kind::Action { child, action } => eval_action(child, action, st, scope, cur),
            Kind::Transform { child, transform } => {
                eval_transform(child, transform, st, scope, cur)
            }
            Kind::Rule(call) => eval_rule(call, st, scope, cur),
        }
    }
}
