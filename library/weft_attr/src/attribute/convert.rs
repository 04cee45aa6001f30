//! Conversions between attributes and plain Rust values.

use super::Attribute;
use crate::Shape;
use weft_text::Span;

/// An attribute did not have the shape a conversion needed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} attribute, found {found}")]
pub struct AttributeError {
    /// What the conversion needed.
    pub expected: String,
    /// The shape of the attribute it was given.
    pub found: Shape,
}

impl AttributeError {
    pub fn new(expected: impl Into<String>, found: &Attribute) -> Self {
        AttributeError {
            expected: expected.into(),
            found: found.shape_of(),
        }
    }
}

impl From<char> for Attribute {
    fn from(c: char) -> Self {
        Attribute::Char(c)
    }
}

impl From<bool> for Attribute {
    fn from(b: bool) -> Self {
        Attribute::Bool(b)
    }
}

impl From<i64> for Attribute {
    fn from(i: i64) -> Self {
        Attribute::Int(i)
    }
}

impl From<i32> for Attribute {
    fn from(i: i32) -> Self {
        Attribute::Int(i64::from(i))
    }
}

impl From<u64> for Attribute {
    fn from(u: u64) -> Self {
        Attribute::UInt(u)
    }
}

impl From<u32> for Attribute {
    fn from(u: u32) -> Self {
        Attribute::UInt(u64::from(u))
    }
}

impl From<f64> for Attribute {
    fn from(v: f64) -> Self {
        Attribute::Float(v)
    }
}

impl From<String> for Attribute {
    fn from(s: String) -> Self {
        Attribute::String(s)
    }
}

impl From<&str> for Attribute {
    fn from(s: &str) -> Self {
        Attribute::String(s.to_owned())
    }
}

impl From<Span> for Attribute {
    fn from(span: Span) -> Self {
        Attribute::Raw(span)
    }
}

impl From<()> for Attribute {
    fn from((): ()) -> Self {
        Attribute::None
    }
}

impl<T: Into<Attribute>> From<Vec<T>> for Attribute {
    fn from(items: Vec<T>) -> Self {
        Attribute::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Attribute>> From<Option<T>> for Attribute {
    fn from(value: Option<T>) -> Self {
        Attribute::Optional(value.map(|v| Box::new(v.into())))
    }
}

impl<A: Into<Attribute>, B: Into<Attribute>> From<(A, B)> for Attribute {
    fn from((a, b): (A, B)) -> Self {
        Attribute::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Attribute>, B: Into<Attribute>, C: Into<Attribute>> From<(A, B, C)> for Attribute {
    fn from((a, b, c): (A, B, C)) -> Self {
        Attribute::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

macro_rules! try_from_scalar {
    ($ty:ty, $name:literal, $attr:ident => $convert:expr) => {
        impl TryFrom<Attribute> for $ty {
            type Error = AttributeError;

            fn try_from($attr: Attribute) -> Result<Self, Self::Error> {
                let converted: Option<$ty> = $convert;
                converted.ok_or_else(|| AttributeError::new($name, &$attr))
            }
        }
    };
}

try_from_scalar!(char, "char", attr => attr.as_char());
try_from_scalar!(bool, "bool", attr => attr.as_bool());
try_from_scalar!(i64, "i64", attr => attr.as_int());
try_from_scalar!(i32, "i32", attr => attr.as_int().and_then(|i| i32::try_from(i).ok()));
try_from_scalar!(u64, "u64", attr => attr.as_uint());
try_from_scalar!(u32, "u32", attr => attr.as_uint().and_then(|u| u32::try_from(u).ok()));
try_from_scalar!(f64, "f64", attr => attr.as_float());
try_from_scalar!(Span, "raw", attr => attr.as_span());

impl TryFrom<Attribute> for String {
    type Error = AttributeError;

    fn try_from(attr: Attribute) -> Result<Self, Self::Error> {
        match attr {
            Attribute::String(s) => Ok(s),
            Attribute::Char(c) => Ok(c.to_string()),
            other => Err(AttributeError::new("string", &other)),
        }
    }
}

impl<T: TryFrom<Attribute, Error = AttributeError>> TryFrom<Attribute> for Vec<T> {
    type Error = AttributeError;

    fn try_from(attr: Attribute) -> Result<Self, Self::Error> {
        match attr {
            Attribute::Seq(items) => items.into_iter().map(T::try_from).collect(),
            Attribute::String(s) => s.chars().map(|c| T::try_from(Attribute::Char(c))).collect(),
            other => Err(AttributeError::new("vec", &other)),
        }
    }
}

impl<A, B> TryFrom<Attribute> for (A, B)
where
    A: TryFrom<Attribute, Error = AttributeError>,
    B: TryFrom<Attribute, Error = AttributeError>,
{
    type Error = AttributeError;

    fn try_from(attr: Attribute) -> Result<Self, Self::Error> {
        match attr {
            Attribute::Tuple(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                let a = A::try_from(items.next().unwrap_or_default())?;
                let b = B::try_from(items.next().unwrap_or_default())?;
                Ok((a, b))
            }
            other => Err(AttributeError::new("tuple of 2", &other)),
        }
    }
}

impl<A, B, C> TryFrom<Attribute> for (A, B, C)
where
    A: TryFrom<Attribute, Error = AttributeError>,
    B: TryFrom<Attribute, Error = AttributeError>,
    C: TryFrom<Attribute, Error = AttributeError>,
{
    type Error = AttributeError;

    fn try_from(attr: Attribute) -> Result<Self, Self::Error> {
        match attr {
            Attribute::Tuple(items) if items.len() == 3 => {
                let mut items = items.into_iter();
                let a = A::try_from(items.next().unwrap_or_default())?;
                let b = B::try_from(items.next().unwrap_or_default())?;
                let c = C::try_from(items.next().unwrap_or_default())?;
                Ok((a, b, c))
            }
            other => Err(AttributeError::new("tuple of 3", &other)),
        }
    }
}

impl Attribute {
    /// Convert into an `Option<T>`.
    ///
    /// An absent optional and `none` both become `None`; a present optional
    /// or a bare value convert their contents.
    pub fn into_option<T>(self) -> Result<Option<T>, AttributeError>
    where
        T: TryFrom<Attribute, Error = AttributeError>,
    {
        match self {
            Attribute::None | Attribute::Optional(None) => Ok(None),
            Attribute::Optional(Some(value)) => T::try_from(*value).map(Some),
            other => T::try_from(other).map(Some),
        }
    }

    /// Convert into any type with a `TryFrom<Attribute>` conversion.
    pub fn extract<T>(self) -> Result<T, AttributeError>
    where
        T: TryFrom<Attribute, Error = AttributeError>,
    {
        T::try_from(self)
    }
}
