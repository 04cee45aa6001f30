//! Semantic actions and attribute transforms.
//!
//! `p.action(f)` runs `p`, then calls `f` with an [`ActionContext`]: the
//! matched text, `p`'s attribute, the enclosing rule's value slot, locals
//! and parameters, user globals, and the symbol tables of the current
//! parse. The action's own attribute is `none`.
//!
//! An action that returns a value assigns it to the enclosing rule's value
//! slot when the rule's shape accepts it. An action can also make its
//! parser fail with [`ActionContext::reject`].
//!
//! Actions run as soon as their parser matches. Effects of an action on a
//! path that an enclosing alternative later abandons are not rolled back.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use weft_attr::{Attribute, Shape};
use weft_diagnostic::{DiagnosticKind, ErrorHandler};
use weft_text::{Cursor, Span};

use crate::context::{ParseFlags, ParseState, RuleFrame, Scope};
use crate::parser::{Kind, PResult, Parser};
use crate::symbols::{SymbolState, Symbols, SymbolsView};

pub(crate) type ActionFn = Arc<dyn Fn(&mut ActionContext<'_>) -> Option<Attribute> + Send + Sync>;

pub(crate) type TransformFn = Arc<dyn Fn(Attribute) -> Attribute + Send + Sync>;

/// Values an action may return.
pub trait ActionOutput {
    /// The value to assign to the enclosing rule, if any.
    fn into_rule_value(self) -> Option<Attribute>;
}

impl ActionOutput for () {
    fn into_rule_value(self) -> Option<Attribute> {
        None
    }
}

impl ActionOutput for Attribute {
    fn into_rule_value(self) -> Option<Attribute> {
        Some(self)
    }
}

impl ActionOutput for Option<Attribute> {
    fn into_rule_value(self) -> Option<Attribute> {
        self
    }
}

/// What a semantic action sees.
pub struct ActionContext<'a> {
    input: &'a str,
    span: Span,
    attr: Attribute,
    frame: Option<&'a mut RuleFrame>,
    globals: Option<&'a mut dyn Any>,
    symbols: &'a mut SymbolState,
    handler: &'a dyn ErrorHandler,
    pass: bool,
}

impl<'a> ActionContext<'a> {
    /// The attribute of the parser the action is attached to.
    pub fn attr(&self) -> &Attribute {
        &self.attr
    }

    /// Take the attribute, leaving `none` behind.
    pub fn take_attr(&mut self) -> Attribute {
        std::mem::take(&mut self.attr)
    }

    /// The matched input range.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The matched input text.
    pub fn matched(&self) -> &'a str {
        self.span.slice(self.input)
    }

    /// The whole input.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// The enclosing rule's value slot.
    pub fn val(&self) -> Option<&Attribute> {
        self.frame.as_deref().map(|frame| &frame.val)
    }

    /// Mutable access to the enclosing rule's value slot.
    ///
    /// A rule whose value was touched through this method produces that
    /// value instead of its body's attribute.
    pub fn val_mut(&mut self) -> Option<&mut Attribute> {
        self.frame.as_deref_mut().map(|frame| {
            frame.val_assigned = true;
            &mut frame.val
        })
    }

    /// Assign the enclosing rule's value slot, converting `value` to the
    /// rule's shape. Returns false outside a rule or when the rule's shape
    /// does not accept the value.
    pub fn set_val(&mut self, value: impl Into<Attribute>) -> bool {
        let Some(frame) = self.frame.as_deref_mut() else {
            return false;
        };
        assign(frame, value.into())
    }

    pub fn locals(&self) -> Option<&Attribute> {
        self.frame.as_deref().map(|frame| &frame.locals)
    }

    pub fn locals_mut(&mut self) -> Option<&mut Attribute> {
        self.frame.as_deref_mut().map(|frame| &mut frame.locals)
    }

    /// Resolved parameters of the enclosing rule.
    pub fn params(&self) -> &[Attribute] {
        self.frame.as_deref().map_or(&[], |frame| frame.params.as_slice())
    }

    /// User globals passed to the parse, if they have type `T`.
    pub fn globals<T: Any>(&mut self) -> Option<&mut T> {
        self.globals.as_deref_mut()?.downcast_mut::<T>()
    }

    /// This parse's view of `table`.
    pub fn symbols<'s>(&'s mut self, table: &'s Symbols) -> SymbolsView<'s> {
        SymbolsView::new(table, self.symbols)
    }

    /// Report `message` at the start of the match through the parse's
    /// error handler.
    pub fn report(&self, kind: DiagnosticKind, message: &str) {
        self.handler.diagnose(kind, message, self.input, self.span.start);
    }

    pub fn error(&self, message: &str) {
        self.report(DiagnosticKind::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.report(DiagnosticKind::Warning, message);
    }

    /// Make the action's parser fail without consuming input.
    pub fn reject(&mut self) {
        self.pass = false;
    }
}

impl fmt::Debug for ActionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("span", &self.span)
            .field("attr", &self.attr)
            .field("in_rule", &self.frame.is_some())
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

/// Coerce `value` to the frame's shape and store it if accepted.
fn assign(frame: &mut RuleFrame, value: Attribute) -> bool {
    let value = value.coerce_to(&frame.shape);
    if !frame.shape.accepts(&value) {
        return false;
    }
    frame.val = value;
    frame.val_assigned = true;
    true
}

impl Parser {
    /// Attach a semantic action.
    pub fn action<F, R>(&self, f: F) -> Parser
    where
        F: Fn(&mut ActionContext<'_>) -> R + Send + Sync + 'static,
        R: ActionOutput,
    {
        let action: ActionFn = Arc::new(move |ctx: &mut ActionContext<'_>| f(ctx).into_rule_value());
        Parser::from_kind(
            Kind::Action {
                child: self.clone(),
                action,
            },
            Shape::None,
        )
    }

    /// Replace this parser's attribute with `f(attribute)`, of shape
    /// `shape`.
    pub fn transform(
        &self,
        shape: Shape,
        f: impl Fn(Attribute) -> Attribute + Send + Sync + 'static,
    ) -> Parser {
        Parser::from_kind(
            Kind::Transform {
                child: self.clone(),
                transform: Arc::new(f),
            },
            shape,
        )
    }
}

pub(crate) fn eval_action<'p, 'i>(
    child: &'p Parser,
    action: &ActionFn,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let start = cur.snapshot();
    let Some(attr) = child.eval(st, scope.with(ParseFlags::GEN_ATTRS), cur)? else {
        return Ok(None);
    };

    let rule = scope.rule;
    let ParseState {
        input,
        handler,
        globals,
        symbols,
        frames,
        ..
    } = st;
    let mut ctx = ActionContext {
        input: *input,
        span: cur.span_from(start.position()),
        attr,
        frame: frames
            .last_mut()
            .filter(|frame| rule.is_some_and(|id| frame.id == id)),
        globals: globals.as_deref_mut(),
        symbols,
        handler: *handler,
        pass: true,
    };
    let returned = action(&mut ctx);
    let pass = ctx.pass;

    if !pass {
        cur.restore(start);
        return Ok(None);
    }
    if let (Some(value), Some(frame)) = (returned, ctx.frame.as_deref_mut()) {
        if !assign(frame, value) {
            tracing::trace!(target: "weft", shape = %frame.shape, "action result not assignable to rule value");
        }
    }
    Ok(Some(Attribute::None))
}

pub(crate) fn eval_transform<'p, 'i>(
    child: &'p Parser,
    transform: &TransformFn,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let Some(attr) = child.eval(st, scope.with(ParseFlags::GEN_ATTRS), cur)? else {
        return Ok(None);
    };
    Ok(Some(scope.attr(|| transform(attr))))
}
