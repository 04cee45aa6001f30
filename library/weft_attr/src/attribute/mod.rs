//! Runtime attribute values.

use std::fmt;

use crate::Shape;
use weft_text::Span;

mod convert;

pub use convert::AttributeError;

/// The value a parser produced.
///
/// Alternatives with several branch shapes produce the matched branch's
/// value directly; there is no separate variant wrapper at runtime.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    /// No value.
    #[default]
    None,
    Char(char),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    /// A subrange of the parsed input.
    Raw(Span),
    Optional(Option<Box<Attribute>>),
    Seq(Vec<Attribute>),
    Tuple(Vec<Attribute>),
}

impl Attribute {
    /// Wrap a value as a present optional.
    pub fn some(value: Attribute) -> Attribute {
        Attribute::Optional(Some(Box::new(value)))
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Attribute::None)
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Attribute::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Attribute::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Signed view of an integer attribute, if it fits.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Attribute::Int(i) => Some(*i),
            Attribute::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Unsigned view of an integer attribute, if it fits.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Attribute::UInt(u) => Some(*u),
            Attribute::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Attribute::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attribute::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_span(&self) -> Option<Span> {
        match self {
            Attribute::Raw(span) => Some(*span),
            _ => None,
        }
    }

    /// Elements of a sequence or tuple.
    pub fn as_slice(&self) -> Option<&[Attribute]> {
        match self {
            Attribute::Seq(items) | Attribute::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// The shape this value has.
    ///
    /// Empty sequences and absent optionals report `any` for their element.
    pub fn shape_of(&self) -> Shape {
        match self {
            Attribute::None => Shape::None,
            Attribute::Char(_) => Shape::Char,
            Attribute::Bool(_) => Shape::Bool,
            Attribute::Int(_) => Shape::Int,
            Attribute::UInt(_) => Shape::UInt,
            Attribute::Float(_) => Shape::Float,
            Attribute::String(_) => Shape::String,
            Attribute::Raw(_) => Shape::Raw,
            Attribute::Optional(value) => {
                Shape::optional_of(value.as_deref().map_or(Shape::Any, Attribute::shape_of))
            }
            Attribute::Seq(items) => {
                Shape::seq_of(items.first().map_or(Shape::Any, Attribute::shape_of))
            }
            Attribute::Tuple(items) => Shape::Tuple(items.iter().map(Attribute::shape_of).collect()),
        }
    }

    /// Convert this value into `shape` where a lossless conversion exists.
    ///
    /// Values the shape already accepts, and values with no conversion,
    /// are returned unchanged.
    pub fn coerce_to(self, shape: &Shape) -> Attribute {
        if shape.accepts(&self) {
            return self;
        }
        match (shape, self) {
            (_, Attribute::None) => shape.default_value(),
            (Shape::Optional(inner), Attribute::Optional(Some(value))) => {
                Attribute::some((*value).coerce_to(inner))
            }
            (Shape::Optional(inner), value) => Attribute::some(value.coerce_to(inner)),
            (Shape::String, Attribute::Char(c)) => Attribute::String(c.to_string()),
            (Shape::String, Attribute::Seq(items)) if items.iter().all(|i| i.as_char().is_some()) => {
                Attribute::String(items.iter().filter_map(Attribute::as_char).collect())
            }
            (Shape::Int, Attribute::UInt(u)) => {
                i64::try_from(u).map_or(Attribute::UInt(u), Attribute::Int)
            }
            (Shape::UInt, Attribute::Int(i)) => {
                u64::try_from(i).map_or(Attribute::Int(i), Attribute::UInt)
            }
            (Shape::Float, value @ (Attribute::Int(_) | Attribute::UInt(_))) => widen_to_float(&value),
            (Shape::Seq(inner), Attribute::Seq(items)) => {
                Attribute::Seq(items.into_iter().map(|item| item.coerce_to(inner)).collect())
            }
            (Shape::Seq(inner), Attribute::String(s)) if **inner == Shape::Char => {
                Attribute::Seq(s.chars().map(Attribute::Char).collect())
            }
            (Shape::Tuple(slots), Attribute::Tuple(items)) if slots.len() == items.len() => {
                Attribute::Tuple(
                    items
                        .into_iter()
                        .zip(slots)
                        .map(|(item, slot)| item.coerce_to(slot))
                        .collect(),
                )
            }
            (container, Attribute::Tuple(items)) if container.is_container() => {
                let mut flat = container.default_value();
                for item in items {
                    flatten_into(&mut flat, container, item);
                }
                flat
            }
            (Shape::Variant(options), value) => {
                for option in options {
                    let coerced = value.clone().coerce_to(option);
                    if option.accepts(&coerced) {
                        return coerced;
                    }
                }
                value
            }
            (_, Attribute::Optional(value)) => {
                value.map_or_else(|| shape.default_value(), |value| (*value).coerce_to(shape))
            }
            (_, value) => value,
        }
    }
}

/// Append one tuple slot to a container being built from a tuple.
fn flatten_into(flat: &mut Attribute, container: &Shape, item: Attribute) {
    let item = match item {
        Attribute::None | Attribute::Optional(None) => return,
        Attribute::Optional(Some(value)) => *value,
        other => other,
    };
    let element = container.element().unwrap_or(Shape::Any);
    let as_element = item.clone().coerce_to(&element);
    match flat {
        Attribute::String(s) => match (as_element, item.coerce_to(container)) {
            (Attribute::Char(c), _) => s.push(c),
            (_, Attribute::String(more)) => s.push_str(&more),
            _ => {}
        },
        Attribute::Seq(items) => {
            if element.accepts(&as_element) {
                items.push(as_element);
            } else if let Attribute::Seq(more) = item.coerce_to(container) {
                items.extend(more);
            }
        }
        _ => {}
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integers above 2^53 round to the nearest representable float"
)]
fn widen_to_float(value: &Attribute) -> Attribute {
    match value {
        Attribute::Int(i) => Attribute::Float(*i as f64),
        Attribute::UInt(u) => Attribute::Float(*u as f64),
        other => other.clone(),
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::None => f.write_str("<<none>>"),
            Attribute::Char(c) => write!(f, "{c:?}"),
            Attribute::Bool(b) => write!(f, "{b}"),
            Attribute::Int(i) => write!(f, "{i}"),
            Attribute::UInt(u) => write!(f, "{u}"),
            Attribute::Float(v) => write!(f, "{v}"),
            Attribute::String(s) => write!(f, "{s:?}"),
            Attribute::Raw(span) => write!(f, "raw({span:?})"),
            Attribute::Optional(None) => f.write_str("nullopt"),
            Attribute::Optional(Some(value)) => write!(f, "{value}"),
            Attribute::Seq(items) => write_items(f, '[', ']', items),
            Attribute::Tuple(items) => write_items(f, '(', ')', items),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: char, close: char, items: &[Attribute]) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}

#[cfg(test)]
mod tests;
