use super::*;

#[test]
fn test_span_basics() {
    let span = Span::new(2, 5);
    assert_eq!(span.len(), 3);
    assert!(!span.is_empty());
    assert!(span.contains(2));
    assert!(span.contains(4));
    assert!(!span.contains(5));
}

#[test]
fn test_point_is_empty() {
    let span = Span::point(7);
    assert!(span.is_empty());
    assert_eq!(span.to_range(), 7..7);
}

#[test]
fn test_merge() {
    let merged = Span::new(4, 6).merge(Span::new(1, 3));
    assert_eq!(merged, Span::new(1, 6));
}

#[test]
fn test_slice() {
    let input = "123abc";
    assert_eq!(Span::new(3, 6).slice(input), "abc");
    assert_eq!(Span::point(2).slice(input), "");
}

#[test]
fn test_slice_off_boundary_is_empty() {
    // 'é' is two bytes; 0..1 splits it.
    assert_eq!(Span::new(0, 1).slice("é"), "");
    assert_eq!(Span::new(0, 10).slice("short"), "");
}

#[test]
fn test_debug_format() {
    assert_eq!(format!("{:?}", Span::new(1, 4)), "1..4");
}
