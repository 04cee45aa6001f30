//! Top-level parse drivers.
//!
//! The free functions cover the common cases. [`Parse`] configures
//! everything else: rule bodies, a skip parser, tracing, the error
//! handler, user globals and rule callbacks.
//!
//! Every driver runs the root parser once on a fresh parse state. The
//! full-parse entry points then require the whole input to be consumed.
//! With a skip parser, skipping also runs before the first token and after
//! the last. Symbol table changes queued with `*_for_next_parse` are
//! committed when the parse state is dropped, whatever the outcome.

use std::any::Any;
use std::fmt;

use weft_attr::{Attribute, AttributeError};
use weft_diagnostic::{DefaultErrorHandler, ErrorHandler, ErrorHandlerResult, ParseError};
use weft_text::Cursor;

use crate::context::{ParseFlags, ParseState, Scope};
use crate::parser::{PResult, Parser};
use crate::rule::RuleSet;

/// Receives the results of callback rules.
///
/// See [`Rule::callback`](crate::Rule::callback).
pub trait RuleCallbacks {
    /// Called when callback rule `rule` matched, with its attribute unless
    /// it has none.
    fn on_rule(&mut self, rule: &str, attr: Option<Attribute>);
}

impl<F: FnMut(&str, Option<Attribute>)> RuleCallbacks for F {
    fn on_rule(&mut self, rule: &str, attr: Option<Attribute>) {
        self(rule, attr);
    }
}

/// Whether a parse logs trace events.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Trace {
    #[default]
    Off,
    On,
}

/// A configured parse.
///
/// ```
/// use weft::{int_, Parse, ws};
///
/// let list = int_() % ',';
/// let result = Parse::new().skip(&ws()).parse("1, 2 ,3", &list);
/// assert_eq!(result.unwrap().unwrap().to_string(), "[1, 2, 3]");
/// ```
#[must_use]
pub struct Parse<'p> {
    pub(crate) rules: Option<&'p RuleSet>,
    pub(crate) skipper: Option<&'p Parser>,
    pub(crate) trace: Trace,
    pub(crate) handler: &'p dyn ErrorHandler,
    globals: Option<&'p mut dyn Any>,
    callbacks: Option<&'p mut dyn RuleCallbacks>,
}

impl Default for Parse<'_> {
    fn default() -> Self {
        Parse::new()
    }
}

impl fmt::Debug for Parse<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parse")
            .field("rules", &self.rules)
            .field("skipper", &self.skipper)
            .field("trace", &self.trace)
            .field("globals", &self.globals.is_some())
            .field("callbacks", &self.callbacks.is_some())
            .finish_non_exhaustive()
    }
}

fn reborrow<'a>(callbacks: &'a mut (dyn RuleCallbacks + '_)) -> &'a mut (dyn RuleCallbacks + 'a) {
    callbacks
}

impl<'p> Parse<'p> {
    pub fn new() -> Self {
        Parse {
            rules: None,
            skipper: None,
            trace: Trace::Off,
            handler: &DefaultErrorHandler,
            globals: None,
            callbacks: None,
        }
    }

    /// Rule bodies for the rules the grammar calls.
    pub fn rules(mut self, rules: &'p RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Skip input matched by `skipper` between tokens.
    pub fn skip(mut self, skipper: &'p Parser) -> Self {
        self.skipper = Some(skipper);
        self
    }

    pub fn trace(mut self, trace: Trace) -> Self {
        self.trace = trace;
        self
    }

    /// Report hard errors and action diagnostics to `handler`.
    pub fn error_handler(mut self, handler: &'p dyn ErrorHandler) -> Self {
        self.handler = handler;
        self
    }

    /// Make `globals` available to actions and predicates.
    pub fn globals(mut self, globals: &'p mut dyn Any) -> Self {
        self.globals = Some(globals);
        self
    }

    /// Pass the results of callback rules to `callbacks`.
    pub fn callbacks(mut self, callbacks: &'p mut dyn RuleCallbacks) -> Self {
        self.callbacks = Some(callbacks);
        self
    }

    /// Parse all of `input`.
    ///
    /// Returns `Ok(None)` when the parse fails, and `Err` only when the
    /// error handler asks for a hard error to be passed on.
    pub fn parse(&mut self, input: &str, parser: &Parser) -> Result<Option<Attribute>, ParseError> {
        Ok(self.run(input, 0, parser, true)?.map(|(attr, _)| attr))
    }

    /// Parse a prefix of `input`, advancing it past the consumed text on
    /// success.
    pub fn prefix_parse(
        &mut self,
        input: &mut &str,
        parser: &Parser,
    ) -> Result<Option<Attribute>, ParseError> {
        let text = *input;
        let Some((attr, end)) = self.run(text, 0, parser, false)? else {
            return Ok(None);
        };
        *input = &text[end..];
        Ok(Some(attr))
    }

    /// Parse all of `input` into `out`.
    ///
    /// On failure, or when the attribute does not convert to `T`, `out` is
    /// reset to its default value and the result is `Ok(false)`.
    pub fn parse_into<T>(&mut self, input: &str, parser: &Parser, out: &mut T) -> Result<bool, ParseError>
    where
        T: TryFrom<Attribute, Error = AttributeError> + Default,
    {
        let converted = match self.parse(input, parser)? {
            Some(attr) => T::try_from(attr).map_err(|err| {
                tracing::debug!(target: "weft", %err, "attribute does not convert to the output type");
            }),
            None => Err(()),
        };
        match converted {
            Ok(value) => {
                *out = value;
                Ok(true)
            }
            Err(()) => {
                *out = T::default();
                Ok(false)
            }
        }
    }

    /// Run `parser` on `input` from byte offset `start`.
    ///
    /// Returns the attribute and the end position on success.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(parser = %parser, len = input.len(), start = start, full = full)
    )]
    pub(crate) fn run(
        &mut self,
        input: &str,
        start: usize,
        parser: &Parser,
        full: bool,
    ) -> Result<Option<(Attribute, usize)>, ParseError> {
        let mut flags = ParseFlags::GEN_ATTRS;
        if self.skipper.is_some() {
            flags = flags.with(ParseFlags::USE_SKIP);
        }
        if self.trace == Trace::On {
            flags = flags.with(ParseFlags::TRACE);
        }
        let scope = Scope::root(flags, self.skipper);

        let mut cur = Cursor::at(input, start);
        let outcome = {
            let mut st = ParseState::new(input, self.handler);
            st.rules = self.rules;
            st.globals = self.globals.as_deref_mut();
            st.callbacks = self.callbacks.as_deref_mut().map(reborrow);
            drive(parser, &mut st, scope, &mut cur, full)
            // Dropping `st` commits pending symbol table changes.
        };

        match outcome {
            Ok(Some(attr)) => {
                tracing::debug!(target: "weft", end = cur.position(), "parse matched");
                Ok(Some((attr, cur.position())))
            }
            Ok(None) => {
                tracing::debug!(target: "weft", "parse failed");
                Ok(None)
            }
            Err(error) => match self.handler.on_error(input, &error) {
                ErrorHandlerResult::Fail => Ok(None),
                ErrorHandlerResult::Rethrow => Err(error),
            },
        }
    }
}

fn drive<'p, 'i>(
    parser: &'p Parser,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
    full: bool,
) -> PResult {
    st.skip(scope, cur)?;
    let Some(attr) = parser.eval(st, scope, cur)? else {
        return Ok(None);
    };
    st.skip(scope, cur)?;
    if full && !cur.is_at_end() {
        return Ok(None);
    }
    Ok(Some(attr))
}

/// Parse all of `input`, returning the attribute on success.
pub fn parse(input: &str, parser: &Parser) -> Option<Attribute> {
    Parse::new().parse(input, parser).ok().flatten()
}

/// Parse all of `input`, skipping `skipper` between tokens.
pub fn parse_with_skip(input: &str, parser: &Parser, skipper: &Parser) -> Option<Attribute> {
    Parse::new().skip(skipper).parse(input, parser).ok().flatten()
}

/// Parse a prefix of `input`, advancing it past the consumed text.
pub fn prefix_parse(input: &mut &str, parser: &Parser) -> Option<Attribute> {
    Parse::new().prefix_parse(input, parser).ok().flatten()
}

pub fn prefix_parse_with_skip(input: &mut &str, parser: &Parser, skipper: &Parser) -> Option<Attribute> {
    Parse::new()
        .skip(skipper)
        .prefix_parse(input, parser)
        .ok()
        .flatten()
}

/// Parse all of `input` into `out`, resetting `out` to its default value
/// on failure.
pub fn parse_into<T>(input: &str, parser: &Parser, out: &mut T) -> bool
where
    T: TryFrom<Attribute, Error = AttributeError> + Default,
{
    Parse::new().parse_into(input, parser, out).unwrap_or(false)
}
