//! Static attribute shapes and the pairwise composition rule.
//!
//! A [`Shape`] is a pure function of the grammar: it is computed when a
//! parser is constructed and never changes afterwards. The runtime
//! [`Attribute`] produced by a successful parse always has the parser's shape.

use std::fmt;

use crate::Attribute;
use weft_text::Span;

/// The static type of a parser's attribute.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Produces nothing.
    None,
    /// A single code point.
    Char,
    Bool,
    /// Signed integer (`i64`).
    Int,
    /// Unsigned integer (`u64`).
    UInt,
    /// Floating point (`f64`).
    Float,
    /// Growable string of code points.
    String,
    /// A matched subrange of the input.
    Raw,
    Optional(Box<Shape>),
    /// Homogeneous sequence.
    Seq(Box<Shape>),
    /// Heterogeneous fixed-size tuple (at least two slots).
    Tuple(Vec<Shape>),
    /// One of several distinct shapes (from an alternative).
    Variant(Vec<Shape>),
    /// Shape chosen by user code; accepts any attribute.
    Any,
}

/// Result of combining two adjacent shapes in a sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Combined {
    /// Both sides share one slot of this shape.
    Merge(Shape),
    /// The sides occupy distinct tuple slots.
    Separate,
}

impl Shape {
    /// `Optional(inner)`, built directly.
    pub fn optional_of(inner: Shape) -> Shape {
        Shape::Optional(Box::new(inner))
    }

    /// `Seq(inner)`, built directly.
    pub fn seq_of(inner: Shape) -> Shape {
        Shape::Seq(Box::new(inner))
    }

    /// Check if this shape produces nothing.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Shape::None)
    }

    /// Check if this shape is a container that can absorb elements.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Shape::String | Shape::Seq(_))
    }

    /// Element shape of a container.
    pub fn element(&self) -> Option<Shape> {
        match self {
            Shape::String => Some(Shape::Char),
            Shape::Seq(inner) => Some((**inner).clone()),
            _ => None,
        }
    }

    /// Shape of `-p` for a parser `p` of this shape.
    ///
    /// `none` stays `none`, and optionals do not nest.
    pub fn optional(self) -> Shape {
        match self {
            Shape::None => Shape::None,
            Shape::Optional(_) => self,
            other => Shape::optional_of(other),
        }
    }

    /// Shape of `*p` or `+p` for a parser `p` of this shape.
    pub fn repeated(self) -> Shape {
        match self {
            Shape::None => Shape::None,
            Shape::Char => Shape::String,
            other => Shape::seq_of(other),
        }
    }

    /// Shape of an alternative whose branches have the given shapes.
    ///
    /// Duplicates and `none` branches are removed; a single remaining shape
    /// stands for itself and several form a `Variant`. If any branch was
    /// `none`, the result is optional.
    pub fn alternative(branches: &[Shape]) -> Shape {
        let mut distinct: Vec<Shape> = Vec::new();
        let mut saw_none = false;
        for branch in branches {
            let (inner, was_optional) = match branch {
                Shape::None => {
                    saw_none = true;
                    continue;
                }
                Shape::Optional(inner) => ((**inner).clone(), true),
                other => (other.clone(), false),
            };
            saw_none |= was_optional;
            if !distinct.contains(&inner) {
                distinct.push(inner);
            }
        }
        let union = match distinct.len() {
            0 => return Shape::None,
            1 => distinct.pop().unwrap_or(Shape::None),
            _ => Shape::Variant(distinct),
        };
        if saw_none {
            union.optional()
        } else {
            union
        }
    }

    /// The default-constructed attribute of this shape.
    ///
    /// Failed parses reset caller-supplied attributes to this value.
    pub fn default_value(&self) -> Attribute {
        match self {
            Shape::None | Shape::Any => Attribute::None,
            Shape::Char => Attribute::Char('\0'),
            Shape::Bool => Attribute::Bool(false),
            Shape::Int => Attribute::Int(0),
            Shape::UInt => Attribute::UInt(0),
            Shape::Float => Attribute::Float(0.0),
            Shape::String => Attribute::String(String::new()),
            Shape::Raw => Attribute::Raw(Span::DUMMY),
            Shape::Optional(_) => Attribute::Optional(None),
            Shape::Seq(_) => Attribute::Seq(Vec::new()),
            Shape::Tuple(slots) => Attribute::Tuple(slots.iter().map(Shape::default_value).collect()),
            Shape::Variant(options) => options
                .first()
                .map_or(Attribute::None, Shape::default_value),
        }
    }

    /// Check if `attr` is a value of this shape.
    pub fn accepts(&self, attr: &Attribute) -> bool {
        match (self, attr) {
            (Shape::Any, _)
            | (Shape::None, Attribute::None)
            | (Shape::Char, Attribute::Char(_))
            | (Shape::Bool, Attribute::Bool(_))
            | (Shape::Int, Attribute::Int(_))
            | (Shape::UInt, Attribute::UInt(_))
            | (Shape::Float, Attribute::Float(_))
            | (Shape::String, Attribute::String(_))
            | (Shape::Raw, Attribute::Raw(_))
            | (Shape::Optional(_), Attribute::Optional(None)) => true,
            (Shape::Optional(inner), Attribute::Optional(Some(value))) => inner.accepts(value),
            (Shape::Seq(inner), Attribute::Seq(items)) => items.iter().all(|item| inner.accepts(item)),
            (Shape::Tuple(slots), Attribute::Tuple(values)) => {
                slots.len() == values.len()
                    && slots.iter().zip(values).all(|(slot, value)| slot.accepts(value))
            }
            (Shape::Variant(options), value) => options.iter().any(|option| option.accepts(value)),
            _ => false,
        }
    }
}

impl Shape {
    /// Check if values of this shape can be stored as `target` through
    /// [`Attribute::coerce_to`].
    ///
    /// `none` converts to anything (the target's default), and anything
    /// converts to `none` (the value is dropped). A tuple converts to a
    /// container when every slot is an element, a container of the same
    /// kind, or an optional of either.
    pub fn converts_to(&self, target: &Shape) -> bool {
        if self == target {
            return true;
        }
        match (self, target) {
            (Shape::None | Shape::Any, _) | (_, Shape::None | Shape::Any) => true,
            (Shape::Optional(inner), Shape::Optional(target_inner)) => inner.converts_to(target_inner),
            (_, Shape::Optional(target_inner)) => self.converts_to(target_inner),
            (Shape::Optional(inner), _) => inner.converts_to(target),
            (Shape::Variant(options), _) => options.iter().all(|option| option.converts_to(target)),
            (_, Shape::Variant(options)) => options.iter().any(|option| self.converts_to(option)),
            (Shape::Char, Shape::String)
            | (Shape::Int, Shape::UInt)
            | (Shape::UInt, Shape::Int)
            | (Shape::Int | Shape::UInt, Shape::Float) => true,
            (Shape::Seq(inner), Shape::String) | (Shape::String, Shape::Seq(inner)) => **inner == Shape::Char,
            (Shape::Seq(inner), Shape::Seq(target_inner)) => inner.converts_to(target_inner),
            (Shape::Tuple(slots), Shape::Tuple(targets)) => {
                slots.len() == targets.len()
                    && slots.iter().zip(targets).all(|(slot, target)| slot.converts_to(target))
            }
            (Shape::Tuple(slots), container) if container.is_container() => {
                slots.iter().all(|slot| slot.flattens_into(container))
            }
            _ => false,
        }
    }

    /// Check if a tuple slot of this shape can be appended to `container`.
    fn flattens_into(&self, container: &Shape) -> bool {
        match self {
            Shape::None => true,
            Shape::Optional(inner) => inner.flattens_into(container),
            slot => {
                container.element().is_some_and(|element| slot.converts_to(&element))
                    || (slot.is_container() && slot.converts_to(container))
            }
        }
    }
}

/// Combine the shapes of two adjacent sequence elements.
///
/// 1. `none` on either side leaves the other side unchanged.
/// 2. Two characters (or optional characters) become a string.
/// 3. A container next to its element type, or an optional element, is
///    the container; two equal containers stay that container.
/// 4. Anything else is kept apart.
pub fn combine(a: &Shape, b: &Shape) -> Combined {
    if a.is_none() {
        return Combined::Merge(b.clone());
    }
    if b.is_none() {
        return Combined::Merge(a.clone());
    }
    if is_char_like(a) && is_char_like(b) {
        return Combined::Merge(Shape::String);
    }
    if a.is_container() && (a == b || absorbs(a, b)) {
        return Combined::Merge(a.clone());
    }
    if b.is_container() && absorbs(b, a) {
        return Combined::Merge(b.clone());
    }
    Combined::Separate
}

fn is_char_like(shape: &Shape) -> bool {
    match shape {
        Shape::Char => true,
        Shape::Optional(inner) => **inner == Shape::Char,
        _ => false,
    }
}

/// Check if `container` can take `other` as an element or as an optional
/// element.
pub(crate) fn absorbs(container: &Shape, other: &Shape) -> bool {
    let Some(element) = container.element() else {
        return false;
    };
    if *other == element {
        return true;
    }
    match other {
        Shape::Optional(inner) => **inner == element || **inner == *container,
        _ => false,
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::None => f.write_str("none"),
            Shape::Char => f.write_str("char"),
            Shape::Bool => f.write_str("bool"),
            Shape::Int => f.write_str("i64"),
            Shape::UInt => f.write_str("u64"),
            Shape::Float => f.write_str("f64"),
            Shape::String => f.write_str("string"),
            Shape::Raw => f.write_str("raw"),
            Shape::Any => f.write_str("any"),
            Shape::Optional(inner) => write!(f, "optional<{inner}>"),
            Shape::Seq(inner) => write!(f, "vec<{inner}>"),
            Shape::Tuple(slots) => write_list(f, "tuple", slots),
            Shape::Variant(options) => write_list(f, "variant", options),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, shapes: &[Shape]) -> fmt::Result {
    write!(f, "{name}<")?;
    for (i, shape) in shapes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{shape}")?;
    }
    f.write_str(">")
}
