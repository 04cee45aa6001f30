#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_scalar_round_trip_through_try_from() {
    assert_eq!(char::try_from(Attribute::from('x')).unwrap(), 'x');
    assert_eq!(u32::try_from(Attribute::from(7u32)).unwrap(), 7);
    assert_eq!(i32::try_from(Attribute::from(-3)).unwrap(), -3);
    assert_eq!(String::try_from(Attribute::from("hi")).unwrap(), "hi");
}

#[test]
fn test_integer_views_cross_signedness() {
    assert_eq!(Attribute::UInt(5).as_int(), Some(5));
    assert_eq!(Attribute::Int(-1).as_uint(), None);
    assert!(u32::try_from(Attribute::UInt(u64::MAX)).is_err());
}

#[test]
fn test_try_from_error_names_shapes() {
    let err = char::try_from(Attribute::UInt(1)).unwrap_err();
    assert_eq!(err.to_string(), "expected char attribute, found u64");
}

#[test]
fn test_tuple_conversion() {
    let attr = Attribute::from((123u64, "abc"));
    assert_eq!(
        attr,
        Attribute::Tuple(vec![Attribute::UInt(123), Attribute::String("abc".into())])
    );
    let (n, s): (u64, String) = attr.extract().unwrap();
    assert_eq!((n, s.as_str()), (123, "abc"));
    assert!(<(u64, u64)>::try_from(Attribute::UInt(1)).is_err());
}

#[test]
fn test_vec_conversion() {
    let attr = Attribute::from(vec![1i64, 2, 3]);
    let items: Vec<i64> = attr.extract().unwrap();
    assert_eq!(items, vec![1, 2, 3]);

    let chars: Vec<char> = Attribute::from("ab").extract().unwrap();
    assert_eq!(chars, vec!['a', 'b']);
}

#[test]
fn test_into_option() {
    assert_eq!(Attribute::Optional(None).into_option::<char>().unwrap(), None);
    assert_eq!(Attribute::some('q'.into()).into_option::<char>().unwrap(), Some('q'));
    assert_eq!(Attribute::Char('q').into_option::<char>().unwrap(), Some('q'));
}

#[test]
fn test_shape_of() {
    assert_eq!(
        Attribute::from((1u64, vec!['a'])).shape_of(),
        Shape::Tuple(vec![Shape::UInt, Shape::seq_of(Shape::Char)])
    );
    assert_eq!(Attribute::Seq(vec![]).shape_of(), Shape::seq_of(Shape::Any));
}

#[test]
fn test_coerce_to() {
    assert_eq!(
        Attribute::Char('a').coerce_to(&Shape::String),
        Attribute::String("a".into())
    );
    assert_eq!(
        Attribute::UInt(4).coerce_to(&Shape::optional_of(Shape::Int)),
        Attribute::some(Attribute::Int(4))
    );
    assert_eq!(Attribute::None.coerce_to(&Shape::UInt), Attribute::UInt(0));
    assert_eq!(Attribute::Int(2).coerce_to(&Shape::Float), Attribute::Float(2.0));
    assert_eq!(
        Attribute::String("xy".into()).coerce_to(&Shape::seq_of(Shape::Char)),
        Attribute::Seq(vec![Attribute::Char('x'), Attribute::Char('y')])
    );
    assert_eq!(Attribute::Bool(true).coerce_to(&Shape::Int), Attribute::Bool(true));
}

#[test]
fn test_display() {
    let attr = Attribute::from((1u64, "ab", vec!['c']));
    assert_eq!(attr.to_string(), r#"(1, "ab", ['c'])"#);
    assert_eq!(Attribute::Optional(None).to_string(), "nullopt");
    assert_eq!(Attribute::None.to_string(), "<<none>>");
}

#[test]
fn test_coerce_tuple_into_container() {
    let ints = Shape::seq_of(Shape::Int);
    let list = Attribute::Tuple(vec![
        Attribute::Int(1),
        Attribute::some(Attribute::Seq(vec![Attribute::Int(2), Attribute::Int(3)])),
    ]);
    assert_eq!(
        list.coerce_to(&ints),
        Attribute::Seq(vec![Attribute::Int(1), Attribute::Int(2), Attribute::Int(3)])
    );

    let tail_missing = Attribute::Tuple(vec![Attribute::Int(1), Attribute::Optional(None)]);
    assert_eq!(tail_missing.coerce_to(&ints), Attribute::Seq(vec![Attribute::Int(1)]));

    let word = Attribute::Tuple(vec![Attribute::Char('a'), Attribute::String("bc".into())]);
    assert_eq!(word.coerce_to(&Shape::String), Attribute::String("abc".into()));
}

#[test]
fn test_coerce_unwraps_optional() {
    assert_eq!(Attribute::some(Attribute::UInt(3)).coerce_to(&Shape::UInt), Attribute::UInt(3));
    assert_eq!(Attribute::Optional(None).coerce_to(&Shape::String), Attribute::String(String::new()));
}
