use super::*;
use crate::directive::{omit, raw, skip, skip_with};
use crate::primitive::{
    attr, bool_, char_, char_eq, char_range, char_set, digit, double_, eoi, eol, eps, eps_if,
    int_, lit, quoted_string, string, uint_, ws,
};
use crate::rule::Rule;
use crate::symbols::Symbols;
use pretty_assertions::assert_eq;

#[test]
fn test_parser_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parser>();
}

#[test]
fn test_clone_shares_node() {
    let p = uint_();
    let q = p.clone();
    assert!(p.ptr_eq(&q));
    assert!(!p.ptr_eq(&uint_()));
}

#[test]
fn test_debug_shows_notation_and_shape() {
    assert_eq!(format!("{:?}", uint_() >> char_()), "Parser(uint_ >> char_: tuple<u64, char>)");
}

#[test]
fn test_leaf_display() {
    let cases: Vec<(Parser, &str)> = vec![
        (char_(), "char_"),
        (char_eq('a'), "char_('a')"),
        (char_range('a', 'z'), "char_('a', 'z')"),
        (char_set("xy"), "char_(\"xy\")"),
        (digit(), "digit"),
        (lit('c'), "'c'"),
        (lit("abc"), "\"abc\""),
        (string("abc"), "string(\"abc\")"),
        (ws(), "ws"),
        (eol(), "eol"),
        (eps(), "eps"),
        (eps_if(|_| true), "eps(<<pred>>)"),
        (eoi(), "eoi"),
        (attr(3_u64), "attr(3)"),
        (bool_(), "bool_"),
        (double_(), "double_"),
        (quoted_string(), "quoted_string"),
        (Symbols::new(Shape::UInt).parser(), "symbols<u64>"),
    ];
    for (parser, expected) in cases {
        assert_eq!(parser.to_string(), expected);
    }
}

#[test]
fn test_nested_display_parenthesizes_infix_operands() {
    let p = (uint_() >> ',').zero_or_more();
    assert_eq!(p.to_string(), "*(uint_ >> ',')");

    let q = -(lit("a") | 'b');
    assert_eq!(q.to_string(), "-('a' | 'b')");

    let r = (int_() % ',') >> ';';
    assert_eq!(r.to_string(), "(int_ % ',') >> ';'");

    let s = (char_() - 'x').one_or_more();
    assert_eq!(s.to_string(), "+(char_ - 'x')");
}

#[test]
fn test_directive_and_wrapper_display() {
    assert_eq!(omit(uint_() >> uint_()).to_string(), "omit[uint_ >> uint_]");
    assert_eq!(raw(char_()).to_string(), "raw[char_]");
    assert_eq!(skip(char_()).to_string(), "skip[char_]");
    assert_eq!(skip_with(ws(), char_()).to_string(), "skip(ws)[char_]");
    assert_eq!(uint_().action(|_| ()).to_string(), "uint_[<<action>>]");
    assert_eq!(
        uint_().transform(Shape::UInt, |a| a).to_string(),
        "transform(<<f>>)[uint_]"
    );
}

#[test]
fn test_shapes_follow_composition() {
    assert_eq!((char_() >> char_()).shape(), &Shape::String);
    assert_eq!((uint_() >> lit("x")).shape(), &Shape::UInt);
    assert_eq!(
        (uint_() >> double_()).shape(),
        &Shape::Tuple(vec![Shape::UInt, Shape::Float])
    );
    assert_eq!(
        (uint_() >> uint_().zero_or_more()).shape(),
        &Shape::seq_of(Shape::UInt)
    );
    assert_eq!(
        (string("a") >> char_()).shape(),
        &Shape::String
    );
    assert_eq!((-(-uint_())).shape(), &Shape::optional_of(Shape::UInt));
    assert_eq!(lit("x").zero_or_more().shape(), &Shape::None);
}

#[test]
fn test_children_and_rule_calls() {
    let a = Rule::new("a", Shape::None);
    let b = Rule::new("b", Shape::None);
    let p = a.call() >> (b.call() | 'x') % ',';

    assert_eq!(p.children().len(), 2);

    let mut names = Vec::new();
    p.for_each_rule_call(&mut |call| names.push(call.rule.name().to_owned()));
    assert_eq!(names, ["a", "b"]);
}
