//! Character classes and whitespace predicates.

use std::fmt;

/// A named class of characters matched by a single-character parser.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharClass {
    /// Decimal digit `0-9`.
    Digit,
    /// Hexadecimal digit `0-9`, `a-f`, `A-F`.
    HexDigit,
    /// Control characters.
    Control,
    /// Punctuation.
    Punct,
    /// Symbols (math, currency, modifiers).
    Symbol,
    /// Lower-case letters.
    Lower,
    /// Upper-case letters.
    Upper,
    /// Letters.
    Alpha,
    /// Letters and digits.
    Alnum,
    /// Whitespace, including line breaks.
    Space,
}

impl CharClass {
    /// Check if `c` belongs to this class.
    pub fn matches(self, c: char) -> bool {
        match self {
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::HexDigit => c.is_ascii_hexdigit(),
            CharClass::Control => c.is_control(),
            CharClass::Punct => is_punct(c),
            CharClass::Symbol => is_symbol(c),
            CharClass::Lower => c.is_lowercase(),
            CharClass::Upper => c.is_uppercase(),
            CharClass::Alpha => c.is_alphabetic(),
            CharClass::Alnum => c.is_alphanumeric(),
            CharClass::Space => is_ws(c),
        }
    }

    /// The name used when printing a parser for this class.
    pub fn name(self) -> &'static str {
        match self {
            CharClass::Digit => "digit",
            CharClass::HexDigit => "hex_digit",
            CharClass::Control => "control",
            CharClass::Punct => "punct",
            CharClass::Symbol => "symb",
            CharClass::Lower => "lower",
            CharClass::Upper => "upper",
            CharClass::Alpha => "alpha",
            CharClass::Alnum => "alnum",
            CharClass::Space => "space",
        }
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hard line breaks from the Unicode line breaking algorithm.
pub fn is_eol(c: char) -> bool {
    matches!(
        c,
        '\u{000A}' | '\u{000B}' | '\u{000C}' | '\u{000D}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

/// Unicode whitespace, line breaks included.
pub fn is_ws(c: char) -> bool {
    c.is_whitespace()
}

/// Whitespace that is not a line break.
pub fn is_blank(c: char) -> bool {
    is_ws(c) && !is_eol(c)
}

fn is_punct(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation() && !is_symbol(c);
    }
    matches!(
        c,
        '\u{00A1}' | '\u{00A7}' | '\u{00AB}' | '\u{00B6}' | '\u{00B7}' | '\u{00BB}' | '\u{00BF}'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{205E}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
    )
}

fn is_symbol(c: char) -> bool {
    matches!(
        c,
        '$' | '+' | '<' | '=' | '>' | '^' | '`' | '|' | '~'
            | '\u{00A2}'..='\u{00A6}'
            | '\u{00A8}' | '\u{00A9}' | '\u{00AC}' | '\u{00AE}'..='\u{00B1}'
            | '\u{00B4}' | '\u{00D7}' | '\u{00F7}'
            | '\u{20A0}'..='\u{20C0}'
            | '\u{2100}'..='\u{214F}'
            | '\u{2190}'..='\u{23FF}'
    )
}
