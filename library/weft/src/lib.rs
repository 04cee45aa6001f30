//! Weft - parser combinators with an attribute algebra.
//!
//! Small parsers (characters, literals, numbers, quoted strings, symbol
//! tables) compose into larger ones with operators, directives, semantic
//! actions and rules. Every parser knows, when it is built, the shape of
//! the value it produces, and composition follows a fixed algebra:
//!
//! ```
//! use weft::{char_range, parse, uint_, Attribute};
//!
//! let p = uint_() >> char_range('a', 'z').one_or_more();
//! assert_eq!(
//!     parse("123abc", &p),
//!     Some(Attribute::Tuple(vec![Attribute::UInt(123), Attribute::from("abc")]))
//! );
//! ```
//!
//! # Architecture
//!
//! - [`Parser`]: an immutable, shareable grammar node
//! - `primitive`: leaf parsers
//! - `combinator`: `>>`, `|`, `*`, `%`, lookahead, `switch_` and friends
//! - `directive`: `omit`, `raw`, `lexeme`, `no_case`, `skip`, `merge`, `if_`
//! - `action`: semantic actions and attribute transforms
//! - `rule`: named, recursive parsers with locals and parameters
//! - `symbols`: symbol tables with per-parse copies
//! - `driver`: the parse entry points
//! - `search`: search, split and replace
//!
//! # Failure
//!
//! A parser that does not match fails quietly and the cursor rolls back.
//! A committed sequence step (`a.then_require(b)`, written `a > b` in
//! grammar notation) that does not match raises a [`ParseError`] that no
//! enclosing alternative recovers from. The driver hands it to an
//! [`ErrorHandler`], which decides whether the caller sees a failed parse or
//! the error itself.

mod action;
mod combinator;
mod context;
mod directive;
mod driver;
mod parser;
mod primitive;
mod rule;
mod search;
mod stack;
mod symbols;
mod trace;

pub use action::{ActionContext, ActionOutput};
pub use combinator::{switch_, switch_with};
pub use context::{ContextView, ParseFlags};
pub use directive::{
    if_, lexeme, merge, no_case, omit, raw, separate, skip, skip_with, string_view,
};
pub use driver::{
    parse, parse_into, parse_with_skip, prefix_parse, prefix_parse_with_skip, Parse,
    RuleCallbacks, Trace,
};
pub use parser::Parser;
pub use primitive::{
    alnum, alpha, attr, bin, blank, bool_, char_, char_eq, char_range, char_set, control, digit,
    double_, eoi, eol, eps, eps_if, hex, hex_digit, int_, lit, lower, oct, punct, quoted_string,
    quoted_string_with, string, symb, uint_, upper, ws, Numeric,
};
pub use rule::{GrammarError, Param, Rule, RuleId, RuleSet};
pub use search::{
    replace, replace_with_skip, search, search_all, search_all_with_skip, search_with_skip, split,
    split_with_skip, transform_replace, transform_replace_with_skip, SearchAll, Split,
};
pub use symbols::{Symbols, SymbolsView};

pub use weft_attr::{Attribute, AttributeError, Shape};
pub use weft_diagnostic::{
    CallbackErrorHandler, DefaultErrorHandler, DiagnosticKind, ErrorHandler, ErrorHandlerResult,
    ParseError, RethrowErrorHandler, StreamErrorHandler,
};
pub use weft_text::Span;
