use super::*;
use crate::primitive::{lit, ws};
use pretty_assertions::assert_eq;
use weft_diagnostic::DefaultErrorHandler;

#[test]
fn test_flags_with_and_without() {
    let flags = ParseFlags::NONE.with(ParseFlags::GEN_ATTRS).with(ParseFlags::TRACE);
    assert!(flags.has(ParseFlags::GEN_ATTRS));
    assert!(flags.has(ParseFlags::TRACE));
    assert!(!flags.has(ParseFlags::USE_SKIP));

    let flags = flags.without(ParseFlags::GEN_ATTRS);
    assert!(!flags.has(ParseFlags::GEN_ATTRS));
    assert!(flags.has(ParseFlags::TRACE));
    assert_eq!(ParseFlags::default(), ParseFlags::NONE);
}

#[test]
fn test_scope_attr_respects_gen_flag() {
    let on = Scope::root(ParseFlags::GEN_ATTRS, None);
    assert_eq!(on.attr(|| Attribute::UInt(1)), Attribute::UInt(1));

    let off = on.without(ParseFlags::GEN_ATTRS);
    assert_eq!(off.attr(|| Attribute::UInt(1)), Attribute::None);
    assert!(on.gen_attrs(), "the caller's copy is unchanged");
}

#[test]
fn test_skip_consumes_until_skipper_fails() {
    let skipper = ws();
    let scope = Scope::root(ParseFlags::USE_SKIP, Some(&skipper));
    let mut st = ParseState::new("  \t x", &DefaultErrorHandler);
    let mut cur = Cursor::new("  \t x");

    assert_eq!(st.skip(scope, &mut cur), Ok(()));
    assert_eq!(cur.position(), 4);
}

#[test]
fn test_skip_is_inert_without_flag() {
    let skipper = ws();
    let scope = Scope::root(ParseFlags::NONE, Some(&skipper));
    let mut st = ParseState::new("  x", &DefaultErrorHandler);
    let mut cur = Cursor::new("  x");

    assert_eq!(st.skip(scope, &mut cur), Ok(()));
    assert_eq!(cur.position(), 0);
}

#[test]
fn test_skip_stops_on_empty_match() {
    // A skipper that matches without consuming must not loop forever.
    let skipper = -lit("#");
    let scope = Scope::root(ParseFlags::USE_SKIP, Some(&skipper));
    let mut st = ParseState::new("##x", &DefaultErrorHandler);
    let mut cur = Cursor::new("##x");

    assert_eq!(st.skip(scope, &mut cur), Ok(()));
    assert_eq!(cur.position(), 2);
}

fn frame(id: RuleId) -> RuleFrame {
    RuleFrame {
        id,
        shape: Shape::UInt,
        val: Attribute::UInt(7),
        val_assigned: false,
        locals: Attribute::from("local"),
        params: vec![Attribute::Int(-1)],
    }
}

#[test]
fn test_frame_belongs_to_scope_rule() {
    let rule = crate::Rule::new("r", Shape::UInt);
    let other = crate::Rule::new("other", Shape::UInt);
    let mut st = ParseState::new("", &DefaultErrorHandler);
    st.frames.push(frame(rule.id()));

    let mut scope = Scope::root(ParseFlags::GEN_ATTRS, None);
    assert!(st.frame(scope).is_none(), "no rule in scope");

    scope.rule = Some(other.id());
    assert!(st.frame(scope).is_none(), "innermost frame is another rule's");

    scope.rule = Some(rule.id());
    let view = st.view(scope, 0);
    assert_eq!(view.val(), Some(&Attribute::UInt(7)));
    assert_eq!(view.locals(), Some(&Attribute::from("local")));
    assert_eq!(view.params(), &[Attribute::Int(-1)]);
}

#[test]
fn test_view_globals_downcast() {
    let mut counter: u32 = 41;
    let mut st = ParseState::new("abc", &DefaultErrorHandler);
    st.globals = Some(&mut counter);

    let view = st.view(Scope::root(ParseFlags::NONE, None), 2);
    assert_eq!(view.input(), "abc");
    assert_eq!(view.position(), 2);
    assert_eq!(view.globals::<u32>(), Some(&41));
    assert_eq!(view.globals::<String>(), None);
    assert!(view.params().is_empty());
}
