use super::*;
use crate::driver::{parse, parse_with_skip, prefix_parse, Parse};
use crate::primitive::{alpha, char_, char_eq, eps, int_, lit, uint_, ws};
use crate::rule::{Param, Rule, RuleSet};
use pretty_assertions::assert_eq;
use weft_diagnostic::RethrowErrorHandler;

fn rest_after<'i>(input: &'i str, p: &Parser) -> Option<&'i str> {
    let mut rest = input;
    prefix_parse(&mut rest, p)?;
    Some(rest)
}

fn strict(input: &str, p: &Parser) -> Result<Option<Attribute>, ParseError> {
    Parse::new().error_handler(&RethrowErrorHandler).parse(input, p)
}

// Sequence

#[test]
fn test_sequence_slots() {
    let p = uint_() >> char_() >> char_();
    assert_eq!(p.shape(), &Shape::Tuple(vec![Shape::UInt, Shape::String]));
    assert_eq!(
        parse("7ab", &p),
        Some(Attribute::Tuple(vec![Attribute::UInt(7), Attribute::from("ab")]))
    );
}

#[test]
fn test_sequence_drops_none_children() {
    let p = '[' >> uint_() >> ']';
    assert_eq!(p.shape(), &Shape::UInt);
    assert_eq!(parse("[3]", &p), Some(Attribute::UInt(3)));
}

#[test]
fn test_sequence_flattens() {
    let p = (char_eq('a') >> 'b') >> (lit("c") >> 'd');
    let Kind::Seq { children, .. } = p.kind() else {
        panic!("expected a sequence, found {p}");
    };
    assert_eq!(children.len(), 4);
    assert_eq!(p.to_string(), "char_('a') >> 'b' >> 'c' >> 'd'");
}

#[test]
fn test_sequence_optional_char_joins_string() {
    let p = char_() >> -char_eq('!');
    assert_eq!(p.shape(), &Shape::String);
    assert_eq!(parse("a!", &p), Some(Attribute::from("a!")));
    assert_eq!(parse("a", &p), Some(Attribute::from("a")));
}

#[test]
fn test_sequence_failure_restores_cursor() {
    assert_eq!(rest_after("12x", &-(uint_() >> ';')), Some("12x"));
}

#[test]
fn test_sequence_skips_between_children() {
    let p = uint_() >> uint_();
    assert_eq!(
        parse_with_skip(" 1  2 ", &p, &ws()),
        Some(Attribute::Tuple(vec![Attribute::UInt(1), Attribute::UInt(2)]))
    );
    assert_eq!(parse("1 2", &p), None);
}

// Committed sequence

#[test]
fn test_committed_failure_is_hard() {
    let p = lit("a").then_require('b');
    assert_eq!(p.to_string(), "'a' > 'b'");
    assert_eq!(parse("ax", &p), None, "default handler turns it into a failure");
    assert_eq!(strict("ax", &p), Err(ParseError::new(1, "'b'")));
}

#[test]
fn test_committed_failure_escapes_alternative() {
    let p = lit("a").then_require('b') | lit("ac");
    assert_eq!(strict("ac", &p), Err(ParseError::new(1, "'b'")));

    // Before the committed point the alternative still backtracks.
    let q = lit("x").then_require('b') | lit("ac");
    assert_eq!(strict("ac", &q), Ok(Some(Attribute::None)));
}

#[test]
fn test_committed_failure_escapes_repeat_and_optional() {
    let item = lit("(").then_require(')');
    assert!(strict("()(", &item.zero_or_more()).is_err());
    assert!(strict("(", &-item).is_err());
}

#[test]
fn test_committed_sequence_operand_commits_every_child() {
    let p = lit('a').then_require(lit('b') >> lit('c'));
    assert_eq!(p.to_string(), "'a' > 'b' > 'c'");
    assert_eq!(strict("abx", &p), Err(ParseError::new(2, "'c'")));
    assert_eq!(strict("ax", &p), Err(ParseError::new(1, "'b'")));

    let soft = lit('a') >> (lit('b') >> lit('c'));
    assert_eq!(strict("abx", &soft), Ok(None));
}

// Alternative

#[test]
fn test_alternative_first_match_wins() {
    let p = lit("ab") | lit("a");
    assert_eq!(rest_after("abc", &p), Some("c"));
    assert_eq!(rest_after("ac", &p), Some("c"));
}

#[test]
fn test_alternative_backtracks_into_later_branch() {
    let p = (uint_() >> 'x') | (uint_() >> 'y');
    assert_eq!(parse("12y", &p), Some(Attribute::UInt(12)));
}

#[test]
fn test_alternative_shapes() {
    let variant = uint_() | alpha();
    assert_eq!(variant.shape(), &Shape::Variant(vec![Shape::UInt, Shape::Char]));
    assert_eq!(parse("q", &variant), Some(Attribute::Char('q')));

    let same = uint_() | uint_();
    assert_eq!(same.shape(), &Shape::UInt);

    let optional = uint_() | 'x';
    assert_eq!(optional.shape(), &Shape::optional_of(Shape::UInt));
    assert_eq!(parse("5", &optional), Some(Attribute::some(Attribute::UInt(5))));
    assert_eq!(parse("x", &optional), Some(Attribute::Optional(None)));
}

#[test]
fn test_alternative_flattens() {
    let p = (lit("a") | 'b') | (lit("c") | 'd');
    let Kind::Alt(children) = p.kind() else {
        panic!("expected an alternative, found {p}");
    };
    assert_eq!(children.len(), 4);
}

#[test]
fn test_eps_last_in_alternative() {
    let p = uint_() | eps();
    assert_eq!(parse("", &p), Some(Attribute::Optional(None)));
}

#[test]
#[should_panic(expected = "eps can only be the last branch")]
fn test_eps_before_other_branches_panics() {
    let _ = eps() | uint_();
}

// Permutation

#[test]
fn test_permutation_any_order() {
    let p = char_eq('a').perm(uint_());
    let expected = Some(Attribute::Tuple(vec![Attribute::Char('a'), Attribute::UInt(5)]));
    assert_eq!(parse("a5", &p), expected);
    assert_eq!(parse("5a", &p), expected);
    assert_eq!(parse("5", &p), None);
    assert_eq!(parse("a5a", &p), None, "each child matches once");
}

#[test]
fn test_permutation_of_three_in_every_order() {
    let p = char_eq('a').perm(uint_()).perm(char_eq('z'));
    let expected = Some(Attribute::Tuple(vec![
        Attribute::Char('a'),
        Attribute::UInt(1),
        Attribute::Char('z'),
    ]));
    for input in ["a1z", "az1", "1az", "1za", "za1", "z1a"] {
        assert_eq!(parse(input, &p), expected, "{input}");
    }
    for input in ["a1", "1z", "az", "", "a1za"] {
        assert_eq!(parse(input, &p), None, "{input}");
    }
    assert_eq!(rest_after("z1", &-p), Some("z1"), "nothing kept from a partial match");
}

#[test]
fn test_permutation_with_skipper() {
    let p = lit("x").perm(uint_()).perm(alpha());
    assert_eq!(p.to_string(), "'x' || uint_ || alpha");
    assert_eq!(
        parse_with_skip(" q 3 x", &p, &ws()),
        Some(Attribute::Tuple(vec![Attribute::UInt(3), Attribute::Char('q')]))
    );
}

// Switch

#[test]
fn test_switch_runs_matching_case() {
    let p = switch_(2).case(1, char_eq('a')).case(2, uint_());
    assert_eq!(p.shape(), &Shape::Variant(vec![Shape::Char, Shape::UInt]));
    assert_eq!(p.to_string(), "switch_(2)(1, char_('a'))(2, uint_)");
    assert_eq!(parse("7", &p), Some(Attribute::UInt(7)));
    assert_eq!(parse("a", &p), None, "only the matching case runs");
    assert_eq!(parse("7", &switch_(3).case(1, uint_())), None);
}

#[test]
fn test_switch_value_from_rule_params() {
    let field = Rule::new("field", Shape::Variant(vec![Shape::UInt, Shape::String]));
    let body = switch_with(|view| view.params().first().cloned().unwrap_or_default())
        .case("num", uint_())
        .case("word", alpha().one_or_more());
    let mut rules = RuleSet::new();
    assert_eq!(rules.define(&field, body), Ok(()));

    let row = field.with(vec![Param::value("num")]) >> ',' >> field.with(vec![Param::value("word")]);
    let run = |input: &str| Parse::new().rules(&rules).parse(input, &row);
    assert_eq!(
        run("12,ab"),
        Ok(Some(Attribute::Tuple(vec![Attribute::UInt(12), Attribute::from("ab")])))
    );
    assert_eq!(run("ab,12"), Ok(None));
}

#[test]
#[should_panic(expected = "case() only applies to switch_")]
fn test_case_on_other_parser_panics() {
    let _ = uint_().case(1, alpha());
}

// Repetition

#[test]
fn test_zero_or_more_chars_make_string() {
    let p = alpha().zero_or_more();
    assert_eq!(p.shape(), &Shape::String);
    assert_eq!(parse("abc", &p), Some(Attribute::from("abc")));
    assert_eq!(parse("", &p), Some(Attribute::from("")));
}

#[test]
fn test_one_or_more_needs_one() {
    let p = uint_().one_or_more();
    assert_eq!(p.shape(), &Shape::seq_of(Shape::UInt));
    assert_eq!(parse("", &p), None);
    assert_eq!(
        parse_with_skip("1 2", &p, &ws()),
        Some(Attribute::Seq(vec![Attribute::UInt(1), Attribute::UInt(2)]))
    );
}

#[test]
fn test_bounded_repeat() {
    let p = alpha().repeat(2, Some(3));
    assert_eq!(p.to_string(), "repeat(2, 3)[alpha]");
    assert_eq!(rest_after("a1", &p), None);
    assert_eq!(rest_after("ab1", &p), Some("1"));
    assert_eq!(rest_after("abcd", &p), Some("d"));

    let exact = alpha().repeat(2, Some(2));
    assert_eq!(exact.to_string(), "repeat(2)[alpha]");
    assert_eq!(alpha().repeat(1, None).to_string(), "repeat(1, Inf)[alpha]");
}

#[test]
fn test_delimited_list() {
    let p = int_() % ',';
    assert_eq!(p.to_string(), "int_ % ','");
    assert_eq!(
        parse("1,-2,3", &p),
        Some(Attribute::Seq(vec![
            Attribute::Int(1),
            Attribute::Int(-2),
            Attribute::Int(3)
        ]))
    );
    assert_eq!(rest_after("1,2,", &p), Some(","), "a trailing delimiter is left alone");
}

#[test]
fn test_repeat_of_empty_match_terminates() {
    let p = (-lit("a")).zero_or_more();
    assert_eq!(rest_after("aab", &p), Some("b"));
}

#[test]
#[should_panic(expected = "never terminates")]
fn test_unbounded_repeat_of_eps_panics() {
    let _ = eps().zero_or_more();
}

#[test]
#[should_panic(expected = "minimum exceeds maximum")]
fn test_repeat_bounds_checked() {
    let _ = alpha().repeat(3, Some(2));
}

// Optional, lookahead, difference

#[test]
fn test_optional() {
    let p = -uint_();
    assert_eq!(p.shape(), &Shape::optional_of(Shape::UInt));
    assert_eq!(parse("4", &p), Some(Attribute::some(Attribute::UInt(4))));
    assert_eq!(parse("", &p), Some(Attribute::Optional(None)));
    assert_eq!((-lit("x")).shape(), &Shape::None);
}

#[test]
fn test_lookahead_consumes_nothing() {
    let positive = lit("ab").and_pred();
    assert_eq!(rest_after("abc", &positive), Some("abc"));
    assert_eq!(rest_after("xbc", &positive), None);
    assert_eq!(positive.to_string(), "&\"ab\"");

    let negative = !lit("ab");
    assert_eq!(rest_after("xbc", &negative), Some("xbc"));
    assert_eq!(rest_after("abc", &negative), None);
    assert!(lit("a").peek().shape().is_none());
}

#[test]
fn test_difference() {
    let p = char_() - 'x';
    assert_eq!(p.shape(), &Shape::Char);
    assert_eq!(parse("a", &p), Some(Attribute::Char('a')));
    assert_eq!(parse("x", &p), None);

    let body = (char_() - lit("*/")).zero_or_more();
    assert_eq!(rest_after("ab*/", &body), Some("*/"));
}

#[test]
fn test_operators_on_references() {
    let digit_run = uint_();
    let p = &digit_run >> ',' >> &digit_run;
    assert_eq!(
        parse("1,2", &p),
        Some(Attribute::Tuple(vec![Attribute::UInt(1), Attribute::UInt(2)]))
    );
    let q = &digit_run | 'z';
    assert_eq!(parse("z", &q), Some(Attribute::Optional(None)));
    assert_eq!(parse("", &!&digit_run), Some(Attribute::None));
    assert_eq!(parse("9", &(-&digit_run)), Some(Attribute::some(Attribute::UInt(9))));
}
