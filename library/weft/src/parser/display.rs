//! Printing parsers in grammar notation.
//!
//! The printed form names the parser in hard parse errors (`expected ...`)
//! and in trace output.

use std::fmt;

use weft_attr::Grouping;

use super::{Directive, Kind, Parser, RepeatStyle};
use crate::primitive::CharMatch;
use crate::rule::Param;

/// A parser printed as an operand, parenthesized when it is itself an
/// infix expression.
struct Operand<'a>(&'a Parser);

impl Operand<'_> {
    fn needs_parens(&self) -> bool {
        match self.0.kind() {
            Kind::Seq { grouping, .. } => *grouping == Grouping::Default,
            Kind::Alt(_) | Kind::Perm { .. } | Kind::Difference { .. } => true,
            Kind::Repeat { style, .. } => *style == RepeatStyle::Delimited,
            _ => false,
        }
    }
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.needs_parens() {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Parser], separator: &str) -> fmt::Result {
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", Operand(child))?;
    }
    Ok(())
}

fn write_seq(f: &mut fmt::Formatter<'_>, children: &[Parser], committed: &[bool]) -> fmt::Result {
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            let op = if committed.get(index).copied().unwrap_or(false) {
                " > "
            } else {
                " >> "
            };
            f.write_str(op)?;
        }
        write!(f, "{}", Operand(child))?;
    }
    Ok(())
}

fn write_char_match(f: &mut fmt::Formatter<'_>, matcher: &CharMatch) -> fmt::Result {
    match matcher {
        CharMatch::Any => f.write_str("char_"),
        CharMatch::Eq(c) => write!(f, "char_({c:?})"),
        CharMatch::Range(lo, hi) => write!(f, "char_({lo:?}, {hi:?})"),
        CharMatch::Set(set) => write!(f, "char_({:?})", set.iter().collect::<String>()),
        CharMatch::Class(class) => f.write_str(class.name()),
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => write!(f, "{c:?}"),
        _ => write!(f, "{text:?}"),
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Kind::Char(matcher) => write_char_match(f, matcher),
            Kind::Lit { text, .. } => write_literal(f, text),
            Kind::Str { text, .. } => write!(f, "string({text:?})"),
            Kind::Ws => f.write_str("ws"),
            Kind::Eol => f.write_str("eol"),
            Kind::Blank => f.write_str("blank"),
            Kind::Eps(None) => f.write_str("eps"),
            Kind::Eps(Some(_)) => f.write_str("eps(<<pred>>)"),
            Kind::Eoi => f.write_str("eoi"),
            Kind::Attr(value) => write!(f, "attr({value})"),
            Kind::Bool => f.write_str("bool_"),
            Kind::Numeric(spec) => write!(f, "{spec}"),
            Kind::Float => f.write_str("double_"),
            Kind::Quoted(_) => f.write_str("quoted_string"),
            Kind::Symbols(symbols) => write!(f, "symbols<{}>", symbols.shape()),
            Kind::Seq {
                children,
                committed,
                grouping,
                ..
            } => match grouping {
                Grouping::Default => write_seq(f, children, committed),
                Grouping::Merge => {
                    f.write_str("merge[")?;
                    write_seq(f, children, committed)?;
                    f.write_str("]")
                }
                Grouping::Separate => {
                    f.write_str("separate[")?;
                    write_seq(f, children, committed)?;
                    f.write_str("]")
                }
            },
            Kind::Alt(children) => write_joined(f, children, " | "),
            Kind::Perm { children, .. } => write_joined(f, children, " || "),
            Kind::Repeat {
                child,
                min,
                max,
                delimiter,
                style,
            } => match (style, delimiter) {
                (RepeatStyle::ZeroOrMore, _) => write!(f, "*{}", Operand(child)),
                (RepeatStyle::OneOrMore, _) => write!(f, "+{}", Operand(child)),
                (RepeatStyle::Delimited, Some(delimiter)) => {
                    write!(f, "{} % {}", Operand(child), Operand(delimiter))
                }
                _ => match max {
                    Some(max) if max == min => write!(f, "repeat({min})[{child}]"),
                    Some(max) => write!(f, "repeat({min}, {max})[{child}]"),
                    None => write!(f, "repeat({min}, Inf)[{child}]"),
                },
            },
            Kind::Optional(child) => write!(f, "-{}", Operand(child)),
            Kind::Lookahead { child, negate } => {
                let op = if *negate { '!' } else { '&' };
                write!(f, "{op}{}", Operand(child))
            }
            Kind::Difference { child, excluded } => {
                write!(f, "{} - {}", Operand(child), Operand(excluded))
            }
            Kind::Switch { value, cases } => {
                match value {
                    Param::Value(value) => write!(f, "switch_({value})")?,
                    Param::Computed(_) => f.write_str("switch_(<<fn>>)")?,
                }
                for (value, case) in cases {
                    write!(f, "({value}, {case})")?;
                }
                Ok(())
            }
            Kind::If { child, .. } => write!(f, "if_(<<pred>>)[{child}]"),
            Kind::Directive { directive, child } => {
                let name = match directive {
                    Directive::Omit => "omit",
                    Directive::Raw => "raw",
                    Directive::StringView => "string_view",
                    Directive::Lexeme => "lexeme",
                    Directive::NoCase => "no_case",
                };
                write!(f, "{name}[{child}]")
            }
            Kind::Skip {
                child,
                skipper: None,
            } => write!(f, "skip[{child}]"),
            Kind::Skip {
                child,
                skipper: Some(skipper),
            } => write!(f, "skip({skipper})[{child}]"),
            Kind::Action { child, .. } => write!(f, "{}[<<action>>]", Operand(child)),
            Kind::Transform { child, .. } => write!(f, "transform(<<f>>)[{child}]"),
            Kind::Rule(call) => f.write_str(call.rule.name()),
        }
    }
}
