//! Parse context: the state threaded through one top-level parse.
//!
//! The context is split in two:
//!
//! - [`Scope`] is a small `Copy` value passed by value down the tree. Rules,
//!   actions and directives hand their children a modified copy (flags,
//!   skip parser, case-insensitivity depth, current rule) and the caller's
//!   copy is untouched when the child returns.
//! - [`ParseState`] is owned by the driver and passed by `&mut`. It holds
//!   everything shared by the whole parse: the rule bodies, the error
//!   handler, user globals and callbacks, rule frames and the per-parse
//!   symbol tables.

use std::any::Any;
use std::sync::Arc;

use weft_attr::{Attribute, Shape};
use weft_diagnostic::{ErrorHandler, ParseError};
use weft_text::Cursor;

use crate::rule::{RuleId, RuleSet};
use crate::symbols::SymbolState;
use crate::{Parser, RuleCallbacks};

/// Flags controlling how a subtree is parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseFlags(u8);

impl ParseFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// Build attributes. Cleared inside `omit`, `raw`, lookaheads and
    /// directly recursive rule calls.
    pub const GEN_ATTRS: Self = Self(1 << 0);

    /// Run the skip parser between tokens. Cleared inside `lexeme`.
    pub const USE_SKIP: Self = Self(1 << 1);

    /// Emit trace events for every parser.
    pub const TRACE: Self = Self(1 << 2);

    /// Check if a flag is set.
    #[inline]
    pub const fn has(self, flag: Self) -> bool {
        (self.0 & flag.0) != 0
    }

    /// Add a flag.
    #[inline]
    #[must_use]
    pub const fn with(self, flag: Self) -> Self {
        Self(self.0 | flag.0)
    }

    /// Remove a flag.
    #[inline]
    #[must_use]
    pub const fn without(self, flag: Self) -> Self {
        Self(self.0 & !flag.0)
    }
}

/// Per-subtree settings, copied into every child call.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'p> {
    pub(crate) flags: ParseFlags,
    /// `no_case` nesting depth; folding is on when non-zero.
    pub(crate) no_case: u16,
    pub(crate) skipper: Option<&'p Parser>,
    /// The rule whose body is being parsed.
    pub(crate) rule: Option<RuleId>,
}

impl<'p> Scope<'p> {
    pub(crate) fn root(flags: ParseFlags, skipper: Option<&'p Parser>) -> Self {
        Scope {
            flags,
            no_case: 0,
            skipper,
            rule: None,
        }
    }

    #[inline]
    pub(crate) fn gen_attrs(self) -> bool {
        self.flags.has(ParseFlags::GEN_ATTRS)
    }

    #[inline]
    pub(crate) fn no_case(self) -> bool {
        self.no_case > 0
    }

    #[inline]
    pub(crate) fn with(self, flag: ParseFlags) -> Self {
        Scope {
            flags: self.flags.with(flag),
            ..self
        }
    }

    #[inline]
    pub(crate) fn without(self, flag: ParseFlags) -> Self {
        Scope {
            flags: self.flags.without(flag),
            ..self
        }
    }

    /// `value()` when attributes are generated, `none` otherwise.
    #[inline]
    pub(crate) fn attr(self, value: impl FnOnce() -> Attribute) -> Attribute {
        if self.gen_attrs() {
            value()
        } else {
            Attribute::None
        }
    }
}

/// One active rule invocation.
#[derive(Debug)]
pub(crate) struct RuleFrame {
    pub(crate) id: RuleId,
    pub(crate) shape: Shape,
    /// The rule's value slot (`val`).
    pub(crate) val: Attribute,
    /// Set once an action assigned `val`.
    pub(crate) val_assigned: bool,
    pub(crate) locals: Attribute,
    pub(crate) params: Vec<Attribute>,
}

/// State shared by every parser in one top-level parse.
pub(crate) struct ParseState<'p, 'i> {
    pub(crate) input: &'i str,
    pub(crate) rules: Option<&'p RuleSet>,
    pub(crate) handler: &'p dyn ErrorHandler,
    pub(crate) globals: Option<&'p mut dyn Any>,
    pub(crate) callbacks: Option<&'p mut dyn RuleCallbacks>,
    pub(crate) symbols: SymbolState,
    pub(crate) frames: Vec<RuleFrame>,
    pub(crate) trace_depth: usize,
}

impl<'p, 'i> ParseState<'p, 'i> {
    pub(crate) fn new(input: &'i str, handler: &'p dyn ErrorHandler) -> Self {
        ParseState {
            input,
            rules: None,
            handler,
            globals: None,
            callbacks: None,
            symbols: SymbolState::default(),
            frames: Vec::new(),
            trace_depth: 0,
        }
    }

    /// The frame of the rule `scope` is parsing, if any.
    pub(crate) fn frame(&self, scope: Scope<'_>) -> Option<&RuleFrame> {
        let id = scope.rule?;
        self.frames.last().filter(|frame| frame.id == id)
    }

    /// Read-only view for predicates and parameter functions.
    pub(crate) fn view(&self, scope: Scope<'_>, position: usize) -> ContextView<'_> {
        ContextView {
            input: self.input,
            position,
            frame: self.frame(scope),
            globals: self.globals.as_deref(),
        }
    }

    /// Run the skip parser until it fails or stops consuming.
    ///
    /// Does nothing when skipping is off or no skip parser is set.
    pub(crate) fn skip(&mut self, scope: Scope<'p>, cur: &mut Cursor<'i>) -> Result<(), ParseError> {
        if !scope.flags.has(ParseFlags::USE_SKIP) {
            return Ok(());
        }
        let Some(skipper) = scope.skipper else {
            return Ok(());
        };
        let inner = Scope {
            flags: scope
                .flags
                .without(ParseFlags::USE_SKIP)
                .without(ParseFlags::GEN_ATTRS)
                .without(ParseFlags::TRACE),
            ..scope
        };
        loop {
            let before = cur.position();
            match skipper.eval(self, inner, cur)? {
                Some(_) if cur.position() > before => {}
                _ => return Ok(()),
            }
        }
    }
}

/// Predicate for `eps_if`.
pub(crate) type PredicateFn = Arc<dyn Fn(&ContextView<'_>) -> bool + Send + Sync>;

/// Read-only view of the parse context, passed to `eps_if` predicates and
/// rule parameter functions.
pub struct ContextView<'a> {
    input: &'a str,
    position: usize,
    frame: Option<&'a RuleFrame>,
    globals: Option<&'a dyn Any>,
}

impl<'a> ContextView<'a> {
    /// The whole input being parsed.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Value slot of the enclosing rule.
    pub fn val(&self) -> Option<&'a Attribute> {
        self.frame.map(|frame| &frame.val)
    }

    /// Locals of the enclosing rule.
    pub fn locals(&self) -> Option<&'a Attribute> {
        self.frame.map(|frame| &frame.locals)
    }

    /// Resolved parameters of the enclosing rule.
    pub fn params(&self) -> &'a [Attribute] {
        self.frame.map_or(&[], |frame| frame.params.as_slice())
    }

    /// User globals, if they have type `T`.
    pub fn globals<T: Any>(&self) -> Option<&'a T> {
        self.globals.and_then(|globals| globals.downcast_ref::<T>())
    }
}

#[cfg(test)]
mod tests;
