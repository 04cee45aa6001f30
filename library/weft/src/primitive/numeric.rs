//! Integer, float and boolean leaves.

use std::fmt;

use weft_attr::{Attribute, Shape};
use weft_text::Cursor;

use crate::parser::{Kind, Parser};

/// Settings of one integer parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NumericSpec {
    pub(crate) signed: bool,
    pub(crate) radix: u32,
    pub(crate) min_digits: usize,
    pub(crate) max_digits: Option<usize>,
    pub(crate) equals: Option<i128>,
}

impl NumericSpec {
    /// Scan a number, leaving the cursor untouched on failure.
    pub(crate) fn parse(&self, cur: &mut Cursor<'_>) -> Option<Attribute> {
        let start = cur.snapshot();
        let value = self.scan(cur);
        if value.is_none() {
            cur.restore(start);
        }
        value
    }

    fn scan(&self, cur: &mut Cursor<'_>) -> Option<Attribute> {
        let negative = self.signed && cur.bump_if(|c| c == '+' || c == '-') == Some('-');

        let radix = i128::from(self.radix);
        let mut value: i128 = 0;
        let mut digits = 0;
        while self.max_digits.map_or(true, |max| digits < max) {
            let Some(digit) = cur.peek().and_then(|c| c.to_digit(self.radix)) else {
                break;
            };
            value = value.checked_mul(radix)?.checked_add(i128::from(digit))?;
            cur.bump();
            digits += 1;
        }
        if digits < self.min_digits.max(1) {
            return None;
        }
        if negative {
            value = -value;
        }
        if self.equals.is_some_and(|expected| expected != value) {
            return None;
        }

        if self.signed {
            i64::try_from(value).ok().map(Attribute::Int)
        } else {
            u64::try_from(value).ok().map(Attribute::UInt)
        }
    }

    fn base_name(&self) -> &'static str {
        match (self.signed, self.radix) {
            (false, 2) => "bin",
            (false, 8) => "oct",
            (false, 16) => "hex",
            (false, _) => "uint_",
            (true, _) => "int_",
        }
    }

    fn is_default_width(&self) -> bool {
        self.min_digits == 1 && self.max_digits.is_none()
    }
}

impl fmt::Display for NumericSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let standard_radix = self.radix == 10 || (!self.signed && matches!(self.radix, 2 | 8 | 16));
        if standard_radix && self.is_default_width() {
            f.write_str(self.base_name())?;
        } else {
            let kind = if self.signed { "int" } else { "uint" };
            let max = self
                .max_digits
                .map_or_else(|| "-1".to_owned(), |max| max.to_string());
            write!(f, "{kind}<{}, {}, {max}>", self.radix, self.min_digits)?;
        }
        if let Some(expected) = self.equals {
            write!(f, "({expected})")?;
        }
        Ok(())
    }
}

/// Builder for integer parsers with a custom radix, digit count or
/// expected value.
///
/// ```
/// use weft::{parse, Numeric};
///
/// let two_hex = Numeric::unsigned().radix(16).min_digits(2).max_digits(2).parser();
/// assert_eq!(parse("ff", &two_hex).and_then(|a| a.as_uint()), Some(255));
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct Numeric {
    spec: NumericSpec,
}

impl Numeric {
    /// An unsigned decimal integer producing `u64`.
    pub fn unsigned() -> Self {
        Numeric {
            spec: NumericSpec {
                signed: false,
                radix: 10,
                min_digits: 1,
                max_digits: None,
                equals: None,
            },
        }
    }

    /// A decimal integer with an optional sign producing `i64`.
    pub fn signed() -> Self {
        let mut numeric = Numeric::unsigned();
        numeric.spec.signed = true;
        numeric
    }

    /// # Panics
    ///
    /// Panics unless `radix` is 2, 8, 10 or 16.
    #[track_caller]
    pub fn radix(mut self, radix: u32) -> Self {
        assert!(
            matches!(radix, 2 | 8 | 10 | 16),
            "unsupported radix {radix}: expected 2, 8, 10 or 16"
        );
        self.spec.radix = radix;
        self
    }

    pub fn min_digits(mut self, min: usize) -> Self {
        self.spec.min_digits = min;
        self
    }

    pub fn max_digits(mut self, max: usize) -> Self {
        self.spec.max_digits = Some(max);
        self
    }

    /// Only match when the parsed value equals `value`.
    pub fn equals(mut self, value: i64) -> Self {
        self.spec.equals = Some(i128::from(value));
        self
    }

    pub fn parser(self) -> Parser {
        let shape = if self.spec.signed {
            Shape::Int
        } else {
            Shape::UInt
        };
        Parser::from_kind(Kind::Numeric(self.spec), shape)
    }
}

impl From<Numeric> for Parser {
    fn from(numeric: Numeric) -> Self {
        numeric.parser()
    }
}

pub fn uint_() -> Parser {
    Numeric::unsigned().parser()
}

pub fn int_() -> Parser {
    Numeric::signed().parser()
}

pub fn bin() -> Parser {
    Numeric::unsigned().radix(2).parser()
}

pub fn oct() -> Parser {
    Numeric::unsigned().radix(8).parser()
}

pub fn hex() -> Parser {
    Numeric::unsigned().radix(16).parser()
}

/// A floating point number producing `f64`.
///
/// Accepts decimal notation with an optional exponent as well as `inf`,
/// `infinity`, `nan` and `nan(...)` in any case.
pub fn double_() -> Parser {
    Parser::from_kind(Kind::Float, Shape::Float)
}

pub(crate) fn parse_float(cur: &mut Cursor<'_>) -> Option<Attribute> {
    let start = cur.snapshot();
    let value = scan_float(cur);
    if value.is_none() {
        cur.restore(start);
    }
    value.map(Attribute::Float)
}

fn scan_float(cur: &mut Cursor<'_>) -> Option<f64> {
    let negative = cur.bump_if(|c| c == '+' || c == '-') == Some('-');
    let magnitude = scan_special(cur).or_else(|| scan_decimal(cur))?;
    Some(if negative { -magnitude } else { magnitude })
}

fn eat_no_case(cur: &mut Cursor<'_>, word: &str) -> bool {
    let rest = cur.rest();
    let matches = rest
        .get(..word.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(word));
    if matches {
        cur.advance_bytes(word.len());
    }
    matches
}

fn scan_special(cur: &mut Cursor<'_>) -> Option<f64> {
    if eat_no_case(cur, "infinity") || eat_no_case(cur, "inf") {
        return Some(f64::INFINITY);
    }
    if !eat_no_case(cur, "nan") {
        return None;
    }
    // nan(n-char-sequence)
    let after_nan = cur.snapshot();
    if cur.eat_str("(") {
        while cur.bump_if(|c| c.is_ascii_alphanumeric() || c == '_').is_some() {}
        if !cur.eat_str(")") {
            cur.restore(after_nan);
        }
    }
    Some(f64::NAN)
}

fn eat_digits(cur: &mut Cursor<'_>) -> usize {
    let mut count = 0;
    while cur.bump_if(|c| c.is_ascii_digit()).is_some() {
        count += 1;
    }
    count
}

fn scan_decimal(cur: &mut Cursor<'_>) -> Option<f64> {
    let start = cur.position();
    let mut digits = eat_digits(cur);
    let before_point = cur.snapshot();
    if cur.eat_str(".") {
        let fraction = eat_digits(cur);
        if digits == 0 && fraction == 0 {
            cur.restore(before_point);
        }
        digits += fraction;
    }
    if digits == 0 {
        return None;
    }

    let before_exponent = cur.snapshot();
    if cur.bump_if(|c| c == 'e' || c == 'E').is_some() {
        cur.bump_if(|c| c == '+' || c == '-');
        if eat_digits(cur) == 0 {
            cur.restore(before_exponent);
        }
    }

    cur.slice_from(start).parse::<f64>().ok()
}
