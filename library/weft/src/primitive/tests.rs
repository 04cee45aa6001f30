#![allow(clippy::float_cmp, reason = "parsed floats are compared exactly")]

use super::*;
use crate::directive::no_case;
use crate::driver::{parse, prefix_parse};
use pretty_assertions::assert_eq;

fn parses(input: &str, p: &Parser) -> bool {
    parse(input, p).is_some()
}

/// Parse a prefix and return the attribute and the unconsumed rest.
fn prefix<'i>(input: &'i str, p: &Parser) -> Option<(Attribute, &'i str)> {
    let mut rest = input;
    let attr = prefix_parse(&mut rest, p)?;
    Some((attr, rest))
}

// Characters

#[test]
fn test_char_any_and_eq() {
    assert_eq!(parse("x", &char_()), Some(Attribute::Char('x')));
    assert_eq!(parse("é", &char_()), Some(Attribute::Char('é')));
    assert_eq!(parse("", &char_()), None);
    assert_eq!(parse("a", &char_eq('a')), Some(Attribute::Char('a')));
    assert_eq!(parse("b", &char_eq('a')), None);
}

#[test]
fn test_char_range_and_set() {
    let lower = char_range('a', 'f');
    assert!(parses("a", &lower));
    assert!(parses("f", &lower));
    assert!(!parses("g", &lower));

    let set = char_set("+-*");
    assert_eq!(parse("*", &set), Some(Attribute::Char('*')));
    assert!(!parses("/", &set));
}

#[test]
#[should_panic(expected = "empty range")]
fn test_char_range_rejects_inverted_bounds() {
    let _ = char_range('z', 'a');
}

#[test]
fn test_character_classes() {
    assert!(parses("7", &digit()));
    assert!(!parses("x", &digit()));
    assert!(parses("F", &hex_digit()));
    assert!(parses("\u{7}", &control()));
    assert!(parses("!", &punct()));
    assert!(parses("q", &lower()));
    assert!(!parses("Q", &lower()));
    assert!(parses("Q", &upper()));
    assert!(parses("z", &alpha()));
    assert!(parses("9", &alnum()));
    assert!(!parses("_", &alnum()));
}

#[test]
fn test_case_classes_under_no_case() {
    assert!(parses("Q", &no_case(lower())));
    assert!(parses("q", &no_case(upper())));
    assert!(parses("A", &no_case(char_range('a', 'c'))));
    assert!(parses("B", &no_case(char_set("xyb"))));
}

// Literals

#[test]
fn test_lit_produces_nothing() {
    assert_eq!(parse("abc", &lit("abc")), Some(Attribute::None));
    assert_eq!(parse("abd", &lit("abc")), None);
    assert_eq!(lit("abc").shape(), &Shape::None);
}

#[test]
fn test_string_produces_matched_text() {
    assert_eq!(parse("abc", &string("abc")), Some(Attribute::from("abc")));
    assert_eq!(string("abc").shape(), &Shape::String);
}

#[test]
fn test_string_under_no_case_keeps_input_text() {
    assert_eq!(parse("AbC", &no_case(string("abc"))), Some(Attribute::from("AbC")));
}

#[test]
fn test_lit_under_no_case_folds_multichar() {
    assert!(parses("STRASSE", &no_case(lit("straße"))));
    assert!(!parses("STRASSE", &lit("straße")));
}

#[test]
fn test_lit_failure_restores_cursor() {
    assert_eq!(prefix("abx", &lit("abc")), None);
    assert_eq!(prefix("abcx", &lit("abc")), Some((Attribute::None, "x")));
}

// Whitespace and line breaks

#[test]
fn test_ws_treats_crlf_as_one() {
    assert_eq!(prefix("\r\nx", &ws()), Some((Attribute::None, "x")));
    assert_eq!(prefix(" x", &ws()), Some((Attribute::None, "x")));
    assert_eq!(prefix("x", &ws()), None);
}

#[test]
fn test_eol_and_blank() {
    assert_eq!(prefix("\r\n\n", &eol()), Some((Attribute::None, "\n")));
    assert_eq!(prefix("\rx", &eol()), Some((Attribute::None, "x")));
    assert!(!parses(" ", &eol()));
    assert!(parses("\t", &blank()));
    assert!(!parses("\n", &blank()));
}

// Epsilon and friends

#[test]
fn test_eps_and_eoi() {
    assert_eq!(parse("", &eps()), Some(Attribute::None));
    assert_eq!(prefix("abc", &eps()), Some((Attribute::None, "abc")));
    assert!(parses("", &eoi()));
    assert_eq!(prefix("a", &eoi()), None);
}

#[test]
fn test_eps_if_sees_position() {
    let at_start = eps_if(|view| view.position() == 0);
    assert!(parses("", &at_start));
    assert!(parse("a", &(char_() >> &at_start)).is_none());
}

#[test]
fn test_attr_produces_value_without_consuming() {
    let p = attr(42_u64);
    assert_eq!(p.shape(), &Shape::UInt);
    assert_eq!(prefix("rest", &p), Some((Attribute::UInt(42), "rest")));
}

#[test]
fn test_bool() {
    assert_eq!(parse("true", &bool_()), Some(Attribute::Bool(true)));
    assert_eq!(parse("false", &bool_()), Some(Attribute::Bool(false)));
    assert_eq!(parse("TRUE", &bool_()), None);
    assert_eq!(parse("TRUE", &no_case(bool_())), Some(Attribute::Bool(true)));
}

// Integers

#[test]
fn test_uint() {
    assert_eq!(parse("0", &uint_()), Some(Attribute::UInt(0)));
    assert_eq!(parse("18446744073709551615", &uint_()), Some(Attribute::UInt(u64::MAX)));
    assert_eq!(parse("18446744073709551616", &uint_()), None, "overflow fails");
    assert_eq!(parse("+1", &uint_()), None, "no sign on unsigned");
    assert_eq!(parse("", &uint_()), None);
}

#[test]
fn test_int_sign() {
    assert_eq!(parse("-12", &int_()), Some(Attribute::Int(-12)));
    assert_eq!(parse("+12", &int_()), Some(Attribute::Int(12)));
    assert_eq!(parse("-9223372036854775808", &int_()), Some(Attribute::Int(i64::MIN)));
    assert_eq!(parse("9223372036854775808", &int_()), None);
    assert_eq!(prefix("-x", &int_()), None, "a lone sign does not match");
}

#[test]
fn test_radix_parsers() {
    assert_eq!(parse("1011", &bin()), Some(Attribute::UInt(11)));
    assert_eq!(parse("17", &oct()), Some(Attribute::UInt(15)));
    assert_eq!(parse("fF", &hex()), Some(Attribute::UInt(255)));
    assert_eq!(parse("2", &bin()), None);
}

#[test]
fn test_digit_bounds() {
    let two = Numeric::unsigned().min_digits(2).max_digits(2).parser();
    assert_eq!(prefix("1234", &two), Some((Attribute::UInt(12), "34")));
    assert_eq!(prefix("1", &two), None);

    let date = two.clone() >> '-' >> &two;
    assert_eq!(
        parse("12-31", &date),
        Some(Attribute::Tuple(vec![Attribute::UInt(12), Attribute::UInt(31)]))
    );
}

#[test]
fn test_equals() {
    let one = Numeric::signed().equals(-1).parser();
    assert!(parses("-1", &one));
    assert!(!parses("1", &one));
    assert_eq!(prefix("-12", &one), None, "value is checked after scanning");
}

#[test]
#[should_panic(expected = "unsupported radix")]
fn test_unsupported_radix_panics() {
    let _ = Numeric::unsigned().radix(7);
}

#[test]
fn test_numeric_display() {
    assert_eq!(uint_().to_string(), "uint_");
    assert_eq!(int_().to_string(), "int_");
    assert_eq!(hex().to_string(), "hex");
    assert_eq!(Numeric::signed().radix(16).parser().to_string(), "int<16, 1, -1>");
    assert_eq!(
        Numeric::unsigned().min_digits(2).max_digits(4).parser().to_string(),
        "uint<10, 2, 4>"
    );
    assert_eq!(Numeric::unsigned().equals(3).parser().to_string(), "uint_(3)");
}

// Floats

fn float(input: &str) -> Option<f64> {
    parse(input, &double_()).and_then(|attr| attr.as_float())
}

#[test]
fn test_double_decimal_forms() {
    assert_eq!(float("1"), Some(1.0));
    assert_eq!(float("-2.5"), Some(-2.5));
    assert_eq!(float(".5"), Some(0.5));
    assert_eq!(float("5."), Some(5.0));
    assert_eq!(float("1e3"), Some(1000.0));
    assert_eq!(float("+1.5E-1"), Some(0.15));
    assert_eq!(float("."), None);
    assert_eq!(float(""), None);
}

#[test]
fn test_double_exponent_needs_digits() {
    let (attr, rest) = prefix("2e+x", &double_()).unwrap_or((Attribute::None, ""));
    assert_eq!(attr, Attribute::Float(2.0));
    assert_eq!(rest, "e+x");
}

#[test]
fn test_double_special_values() {
    assert_eq!(float("inf"), Some(f64::INFINITY));
    assert_eq!(float("-Infinity"), Some(f64::NEG_INFINITY));
    assert!(float("NaN").is_some_and(f64::is_nan));
    assert!(float("nan(0x1f)").is_some_and(f64::is_nan));

    let negative_nan = float("-nan(snan)").unwrap_or(0.0);
    assert!(negative_nan.is_nan());
    assert!(negative_nan.is_sign_negative());
}

#[test]
fn test_double_unclosed_nan_payload() {
    assert_eq!(
        prefix("nan(abc", &double_()).map(|(_, rest)| rest),
        Some("(abc")
    );
}

// Quoted strings

#[test]
fn test_quoted_string() {
    assert_eq!(parse(r#""hello""#, &quoted_string()), Some(Attribute::from("hello")));
    assert_eq!(parse(r#""a\"b\\c""#, &quoted_string()), Some(Attribute::from("a\"b\\c")));
    assert_eq!(parse(r#""open"#, &quoted_string()), None);
    assert_eq!(parse(r#""bad\q""#, &quoted_string()), None);
}

#[test]
fn test_quoted_string_with_quotes_and_escapes() {
    let p = quoted_string_with("'\"", &[("n", '\n'), ("t", '\t'), ("nl", '\u{2028}')]);
    assert_eq!(parse("'it\"s'", &p), Some(Attribute::from("it\"s")));
    assert_eq!(parse(r"'a\nb'", &p), Some(Attribute::from("a\nb")));
    assert_eq!(parse(r"'a\nlb'", &p), Some(Attribute::from("a\u{2028}b")), "longest key wins");
    assert_eq!(parse(r"'\''", &p), Some(Attribute::from("'")));
    assert_eq!(parse("'mismatch\"", &p), None);
}

#[test]
#[should_panic(expected = "at least one quote")]
fn test_quoted_string_needs_quotes() {
    let _ = quoted_string_with("", &[]);
}
