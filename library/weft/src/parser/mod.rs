//! The parser expression tree.
//!
//! A [`Parser`] is an immutable, reference-counted node. Combinators and
//! directives build new nodes around existing ones; nothing is mutated
//! after construction, so one grammar can serve any number of parses at
//! once, from any number of threads.
//!
//! Every node carries its attribute [`Shape`], computed when the node is
//! built. Recursion is nominal: a rule node refers to its rule by id and
//! the body is looked up in a [`RuleSet`](crate::RuleSet) at parse time,
//! so the tree itself is acyclic.

use std::fmt;
use std::sync::Arc;

use weft_attr::{Attribute, Grouping, SeqLayout, Shape};

use crate::action::{ActionFn, TransformFn};
use crate::context::PredicateFn;
use crate::primitive::{CharMatch, NumericSpec, QuotedSpec};
use crate::rule::{Param, RuleCall};
use crate::symbols::Symbols;

mod display;
mod eval;

pub(crate) use eval::PResult;

/// A parser: one node of a grammar.
///
/// Cloning is cheap (one reference count).
#[derive(Clone)]
pub struct Parser {
    node: Arc<Node>,
}

pub(crate) struct Node {
    pub(crate) kind: Kind,
    pub(crate) shape: Shape,
}

/// How a repetition was written, for printing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum RepeatStyle {
    ZeroOrMore,
    OneOrMore,
    Delimited,
    Counted,
}

/// Built-in directives that wrap a single child.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Directive {
    Omit,
    Raw,
    StringView,
    Lexeme,
    NoCase,
}

pub(crate) enum Kind {
    Char(CharMatch),
    /// Literal text that produces no attribute. `folded` is the case-folded
    /// form used under `no_case`.
    Lit {
        text: String,
        folded: Vec<char>,
    },
    /// Literal text whose attribute is the matched input.
    Str {
        text: String,
        folded: Vec<char>,
    },
    Ws,
    Eol,
    Blank,
    Eps(Option<PredicateFn>),
    Eoi,
    Attr(Attribute),
    Bool,
    Numeric(NumericSpec),
    Float,
    Quoted(QuotedSpec),
    Symbols(Symbols),
    Seq {
        children: Vec<Parser>,
        /// `committed[i]` is set when child `i` follows a `>`.
        committed: Vec<bool>,
        grouping: Grouping,
        layout: SeqLayout,
    },
    Alt(Vec<Parser>),
    Perm {
        children: Vec<Parser>,
        layout: SeqLayout,
    },
    Repeat {
        child: Parser,
        min: usize,
        max: Option<usize>,
        delimiter: Option<Parser>,
        style: RepeatStyle,
    },
    Optional(Parser),
    /// `&p` (`negate == false`) or `!p` (`negate == true`).
    Lookahead {
        child: Parser,
        negate: bool,
    },
    Difference {
        child: Parser,
        excluded: Parser,
    },
    /// `switch_(value)(v1, p1)(v2, p2)...`: runs the first case whose value
    /// equals the switch value.
    Switch {
        value: Param,
        cases: Vec<(Attribute, Parser)>,
    },
    /// `if_(pred)[p]`.
    If {
        pred: PredicateFn,
        child: Parser,
    },
    Directive {
        directive: Directive,
        child: Parser,
    },
    Skip {
        child: Parser,
        skipper: Option<Parser>,
    },
    Action {
        child: Parser,
        action: ActionFn,
    },
    Transform {
        child: Parser,
        transform: TransformFn,
    },
    Rule(RuleCall),
}

impl Parser {
    /// Build a node of the given kind and shape.
    pub(crate) fn from_kind(kind: Kind, shape: Shape) -> Parser {
        Parser {
            node: Arc::new(Node { kind, shape }),
        }
    }

    #[inline]
    pub(crate) fn kind(&self) -> &Kind {
        &self.node.kind
    }

    /// The shape of the attribute this parser produces.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.node.shape
    }

    /// Check if this parser is `eps` without a predicate, which always
    /// matches without consuming.
    pub(crate) fn is_unconditional_eps(&self) -> bool {
        matches!(self.kind(), Kind::Eps(None))
    }

    /// Check if two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Parser) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Direct children of this node, in order.
    pub(crate) fn children(&self) -> Vec<&Parser> {
        match self.kind() {
            Kind::Seq { children, .. } | Kind::Perm { children, .. } | Kind::Alt(children) => {
                children.iter().collect()
            }
            Kind::Repeat {
                child, delimiter, ..
            } => std::iter::once(child).chain(delimiter.as_ref()).collect(),
            Kind::Difference { child, excluded } => vec![child, excluded],
            Kind::Switch { cases, .. } => cases.iter().map(|(_, case)| case).collect(),
            Kind::Skip { child, skipper } => std::iter::once(child).chain(skipper.as_ref()).collect(),
            Kind::Optional(child)
            | Kind::Lookahead { child, .. }
            | Kind::If { child, .. }
            | Kind::Directive { child, .. }
            | Kind::Action { child, .. }
            | Kind::Transform { child, .. } => vec![child],
            Kind::Char(_)
            | Kind::Lit { .. }
            | Kind::Str { .. }
            | Kind::Ws
            | Kind::Eol
            | Kind::Blank
            | Kind::Eps(_)
            | Kind::Eoi
            | Kind::Attr(_)
            | Kind::Bool
            | Kind::Numeric(_)
            | Kind::Float
            | Kind::Quoted(_)
            | Kind::Symbols(_)
            | Kind::Rule(_) => Vec::new(),
        }
    }

    /// Visit every rule call reachable from this node without entering
    /// rule bodies.
    pub(crate) fn for_each_rule_call(&self, f: &mut dyn FnMut(&RuleCall)) {
        if let Kind::Rule(call) = self.kind() {
            f(call);
        }
        for child in self.children() {
            child.for_each_rule_call(f);
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parser({self}: {})", self.shape())
    }
}

impl From<char> for Parser {
    fn from(c: char) -> Self {
        crate::primitive::lit(c)
    }
}

impl From<&str> for Parser {
    fn from(s: &str) -> Self {
        crate::primitive::lit(s)
    }
}

impl From<&Parser> for Parser {
    fn from(p: &Parser) -> Self {
        p.clone()
    }
}

#[cfg(test)]
mod tests;
