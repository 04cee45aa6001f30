//! Rules: named, possibly recursive parsers.
//!
//! A [`Rule`] is declared first and defined later. Declaring gives a handle
//! that other parsers can call; defining binds a body to the handle in a
//! [`RuleSet`]. Bodies are looked up by rule id when a rule is called, so
//! rules can refer to each other in any order, including recursively.
//!
//! A fresh rule call pushes a frame holding the rule's value slot
//! (`val`), its locals and its resolved parameters, runs the body, and pops
//! the frame. A rule calling itself directly shares the caller's frame and
//! produces no attribute of its own.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use weft_attr::{Attribute, Shape};
use weft_text::Cursor;

use crate::context::{ContextView, ParseFlags, ParseState, RuleFrame, Scope};
use crate::parser::{Kind, PResult, Parser};
use crate::stack::ensure_sufficient_stack;

/// Unique identity of a declared rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RuleId(u32);

impl RuleId {
    fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        RuleId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

type LocalsFn = Arc<dyn Fn(&[Attribute]) -> Attribute + Send + Sync>;

struct RuleInner {
    id: RuleId,
    name: String,
    shape: Shape,
    locals: Option<LocalsFn>,
    callback: bool,
}

/// A declared rule.
///
/// Cloning keeps the same identity.
#[derive(Clone)]
pub struct Rule {
    inner: Arc<RuleInner>,
}

impl Rule {
    /// Declare a rule producing attributes of shape `shape`.
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Rule {
            inner: Arc::new(RuleInner {
                id: RuleId::fresh(),
                name: name.into(),
                shape,
                locals: None,
                callback: false,
            }),
        }
    }

    /// Build fresh locals for every call from the call's resolved
    /// parameters.
    ///
    /// # Panics
    ///
    /// Panics if the rule has already been cloned.
    #[track_caller]
    #[must_use]
    pub fn with_locals(mut self, f: impl Fn(&[Attribute]) -> Attribute + Send + Sync + 'static) -> Self {
        self.inner_mut().locals = Some(Arc::new(f));
        self
    }

    /// Report this rule's results through the parse's
    /// [`RuleCallbacks`](crate::RuleCallbacks) instead of as attributes.
    ///
    /// # Panics
    ///
    /// Panics if the rule has already been cloned.
    #[track_caller]
    #[must_use]
    pub fn callback(mut self) -> Self {
        self.inner_mut().callback = true;
        self
    }

    #[track_caller]
    fn inner_mut(&mut self) -> &mut RuleInner {
        let name = self.inner.name.clone();
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner,
            None => panic!("rule `{name}` must be configured before it is cloned or called"),
        }
    }

    pub fn id(&self) -> RuleId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn shape(&self) -> &Shape {
        &self.inner.shape
    }

    pub fn is_callback(&self) -> bool {
        self.inner.callback
    }

    /// A parser calling this rule.
    pub fn call(&self) -> Parser {
        self.with(Vec::new())
    }

    /// A parser calling this rule with parameters.
    pub fn with(&self, params: Vec<Param>) -> Parser {
        Parser::from_kind(
            Kind::Rule(RuleCall {
                rule: self.clone(),
                params,
            }),
            self.inner.shape.clone(),
        )
    }

    fn make_locals(&self, params: &[Attribute]) -> Attribute {
        self.inner
            .locals
            .as_ref()
            .map_or(Attribute::None, |locals| locals(params))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.inner.name)
            .field("shape", &self.inner.shape)
            .field("callback", &self.inner.callback)
            .finish_non_exhaustive()
    }
}

impl From<&Rule> for Parser {
    fn from(rule: &Rule) -> Self {
        rule.call()
    }
}

impl From<Rule> for Parser {
    fn from(rule: Rule) -> Self {
        rule.call()
    }
}

type ParamFn = Arc<dyn Fn(&ContextView<'_>) -> Attribute + Send + Sync>;

/// A parameter passed to a rule call.
#[derive(Clone)]
pub enum Param {
    Value(Attribute),
    /// Computed from the caller's context when the rule is called.
    Computed(ParamFn),
}

impl Param {
    pub fn value(value: impl Into<Attribute>) -> Self {
        Param::Value(value.into())
    }

    pub fn from_fn(f: impl Fn(&ContextView<'_>) -> Attribute + Send + Sync + 'static) -> Self {
        Param::Computed(Arc::new(f))
    }

    pub(crate) fn resolve(&self, view: &ContextView<'_>) -> Attribute {
        match self {
            Param::Value(value) => value.clone(),
            Param::Computed(f) => f(view),
        }
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Value(value) => write!(f, "Param({value})"),
            Param::Computed(_) => f.write_str("Param(<<fn>>)"),
        }
    }
}

/// One call site of a rule.
pub(crate) struct RuleCall {
    pub(crate) rule: Rule,
    pub(crate) params: Vec<Param>,
}

/// Problems with a grammar that show up before any input is read.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("rule `{name}` is defined more than once")]
    DuplicateRule { name: String },

    #[error("rule `{name}` is used but never defined")]
    UndefinedRule { name: String },

    #[error("rule `{name}` produces {expected} but its body produces {found}")]
    ShapeMismatch {
        name: String,
        expected: Shape,
        found: Shape,
    },
}

/// Rule bodies, keyed by rule.
#[derive(Default)]
pub struct RuleSet {
    bodies: FxHashMap<RuleId, (Rule, Parser)>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Bind `body` to `rule`.
    ///
    /// The body's shape must convert to the rule's shape.
    pub fn define(&mut self, rule: &Rule, body: impl Into<Parser>) -> Result<(), GrammarError> {
        if self.bodies.contains_key(&rule.id()) {
            return Err(GrammarError::DuplicateRule {
                name: rule.name().to_owned(),
            });
        }
        let body = body.into();
        if !body.shape().converts_to(rule.shape()) {
            return Err(GrammarError::ShapeMismatch {
                name: rule.name().to_owned(),
                expected: rule.shape().clone(),
                found: body.shape().clone(),
            });
        }
        self.bodies.insert(rule.id(), (rule.clone(), body));
        Ok(())
    }

    /// The body bound to `id`.
    pub(crate) fn body(&self, id: RuleId) -> Option<&Parser> {
        self.bodies.get(&id).map(|(_, body)| body)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Check that every rule reachable from `root` has a body.
    pub fn validate(&self, root: &Parser) -> Result<(), GrammarError> {
        let mut pending: Vec<&Parser> = vec![root];
        let mut seen: FxHashSet<RuleId> = FxHashSet::default();
        let mut missing: Option<String> = None;
        while let Some(parser) = pending.pop() {
            let mut calls: Vec<(RuleId, String)> = Vec::new();
            parser.for_each_rule_call(&mut |call| {
                calls.push((call.rule.id(), call.rule.name().to_owned()));
            });
            for (id, name) in calls {
                if !seen.insert(id) {
                    continue;
                }
                match self.body(id) {
                    Some(body) => pending.push(body),
                    None => {
                        missing.get_or_insert(name);
                    }
                }
            }
        }
        match missing {
            Some(name) => Err(GrammarError::UndefinedRule { name }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bodies.values().map(|(rule, _)| rule.name()))
            .finish()
    }
}

#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(rule = %call.rule.name(), position = cur.position())
)]
pub(crate) fn eval_rule<'p, 'i>(
    call: &'p RuleCall,
    st: &mut ParseState<'p, 'i>,
    scope: Scope<'p>,
    cur: &mut Cursor<'i>,
) -> PResult {
    let rule = &call.rule;
    let Some(body) = st.rules.and_then(|rules| rules.body(rule.id())) else {
        tracing::error!(target: "weft", rule = %rule.name(), "rule called but never defined");
        return Ok(None);
    };

    if scope.rule == Some(rule.id()) {
        // Direct recursion writes into the caller's frame.
        tracing::trace!(target: "weft", recursion = true, "entering rule");
        let inner = scope.without(ParseFlags::GEN_ATTRS);
        let matched = ensure_sufficient_stack(|| body.eval(st, inner, cur))?;
        return Ok(matched.map(|_| Attribute::None));
    }

    let params: Vec<Attribute> = {
        let view = st.view(scope, cur.position());
        call.params.iter().map(|param| param.resolve(&view)).collect()
    };
    let locals = rule.make_locals(&params);
    st.frames.push(RuleFrame {
        id: rule.id(),
        shape: rule.shape().clone(),
        val: rule.shape().default_value(),
        val_assigned: false,
        locals,
        params,
    });

    let start = cur.snapshot();
    let inner = Scope {
        rule: Some(rule.id()),
        ..scope.with(ParseFlags::GEN_ATTRS)
    };
    let result = ensure_sufficient_stack(|| body.eval(st, inner, cur));
    let frame = st.frames.pop();
    let Some(attr) = result? else {
        cur.restore(start);
        return Ok(None);
    };

    let value = match frame {
        _ if rule.shape().is_none() => Attribute::None,
        Some(frame) if frame.val_assigned || body.shape().is_none() => frame.val,
        _ => attr.coerce_to(rule.shape()),
    };
    if !rule.shape().accepts(&value) {
        tracing::warn!(target: "weft", rule = %rule.name(), %value, "rule value does not fit the rule's shape");
        cur.restore(start);
        return Ok(None);
    }

    if rule.is_callback() {
        if let Some(callbacks) = st.callbacks.as_deref_mut() {
            let reported = (!value.is_none()).then_some(value);
            callbacks.on_rule(rule.name(), reported);
            return Ok(Some(Attribute::None));
        }
    }
    Ok(Some(scope.attr(|| value)))
}
