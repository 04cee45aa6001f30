use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::*;
use crate::directive::no_case;
use crate::driver::{parse, prefix_parse};
use crate::primitive::{alpha, char_, lit};
use pretty_assertions::assert_eq;

fn colors() -> Symbols {
    Symbols::from_pairs([("red", 1_u64), ("green", 2), ("greenish", 3)])
}

#[test]
fn test_from_pairs_takes_shape_of_first_value() {
    let table = colors();
    assert_eq!(table.shape(), &Shape::UInt);
    assert_eq!(table.len(), 3);
    assert_eq!(table.find("green"), Some(Attribute::UInt(2)));
    assert_eq!(table.find("blue"), None);

    let empty = Symbols::from_pairs(Vec::<(&str, u64)>::new());
    assert_eq!(empty.shape(), &Shape::Any);
    assert!(empty.is_empty());
}

#[test]
fn test_parser_matches_longest_key() {
    let table = colors();
    let mut input = "greenishblue";
    assert_eq!(prefix_parse(&mut input, &table.parser()), Some(Attribute::UInt(3)));
    assert_eq!(input, "blue");

    let mut input = "greenery";
    assert_eq!(prefix_parse(&mut input, &table.parser()), Some(Attribute::UInt(2)));
    assert_eq!(input, "ery");

    assert_eq!(parse("blue", &table.parser()), None);
}

#[test]
fn test_parser_under_no_case() {
    let table = colors();
    assert_eq!(parse("RED", &table.parser()), None);
    assert_eq!(parse("RED", &no_case(table.parser())), Some(Attribute::UInt(1)));
}

#[test]
fn test_shared_changes_outside_a_parse_apply_immediately() {
    let table = colors();
    table.insert_for_next_parse("blue", 4_u64);
    table.insert_for_next_parse("red", 10_u64);
    table.erase_for_next_parse("green");

    assert_eq!(table.find("blue"), Some(Attribute::UInt(4)));
    assert_eq!(table.find("red"), Some(Attribute::UInt(10)), "insert replaces");
    assert_eq!(table.find("green"), None);
    assert_eq!(parse("blue", &table.parser()), Some(Attribute::UInt(4)));

    table.clear_for_next_parse();
    assert!(table.is_empty());
}

#[test]
fn test_inserted_values_take_table_shape() {
    let table = Symbols::new(Shape::String);
    table.insert_for_next_parse("x", 'x');
    assert_eq!(table.find("x"), Some(Attribute::from("x")));
}

#[test]
fn test_action_inserts_into_this_parse_only() {
    let table = Symbols::new(Shape::UInt);
    let declared = table.clone();
    // `let NAME` declares NAME; later uses of NAME parse through the table.
    let declaration = (lit("let ") >> alpha().one_or_more()).action(move |ctx| {
        let name = ctx.matched().trim_start_matches("let ").to_owned();
        ctx.symbols(&declared).insert(name, 1_u64);
    });
    let grammar = declaration >> ';' >> table.parser();

    assert!(parse("let x;x", &grammar).is_some());
    assert!(table.is_empty(), "the shared table is untouched");
    assert!(parse("let x;y", &grammar).is_none());
}

#[test]
fn test_view_reads_and_erases_parse_copy() {
    let table = colors();
    let view_table = table.clone();
    let saw_red = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&saw_red);

    let p = char_().action(move |ctx| {
        let mut view = ctx.symbols(&view_table);
        flag.store(view.find("red").is_some(), Ordering::Relaxed);
        view.erase("red");
        view.clear();
        assert_eq!(view.find("green"), None);
    }) >> -table.parser();

    let attr = parse("!red", &p);
    assert!(attr.is_none(), "the parse copy no longer knows red");
    assert!(saw_red.load(Ordering::Relaxed));
    assert_eq!(table.find("red"), Some(Attribute::UInt(1)));
}

#[test]
fn test_for_next_parse_is_deferred_until_exit() {
    let table = colors();
    let view_table = table.clone();
    let p = char_().action(move |ctx| {
        ctx.symbols(&view_table).erase_for_next_parse("red");
        ctx.symbols(&view_table).insert_for_next_parse("blue", 5_u64);
    }) >> table.parser();

    // The queued erase does not affect the parse that queued it.
    assert_eq!(parse("!red", &p), Some(Attribute::UInt(1)));
    assert_eq!(table.find("red"), None);
    assert_eq!(table.find("blue"), Some(Attribute::UInt(5)));
    assert_eq!(parse("!red", &p), None);
}

#[test]
fn test_for_next_parse_commits_after_failed_parse() {
    let table = colors();
    let view_table = table.clone();
    let p = char_().action(move |ctx| {
        ctx.symbols(&view_table).clear_for_next_parse();
    }) >> 'z';

    assert_eq!(parse("!y", &p), None);
    assert!(table.is_empty());
}

#[test]
fn test_queued_changes_to_one_key_commit_in_order() {
    let table = colors();
    let view_table = table.clone();
    let p = char_().action(move |ctx| {
        let mut view = ctx.symbols(&view_table);
        view.erase_for_next_parse("red");
        view.insert_for_next_parse("red", 9_u64);
    });

    assert_eq!(parse("!", &p), Some(Attribute::None));
    assert_eq!(table.find("red"), Some(Attribute::UInt(9)));
    assert_eq!(table.len(), 3);
}

#[test]
fn test_readers_never_see_a_half_committed_parse() {
    let table = colors();
    let view_table = table.clone();
    let p = char_().action(move |ctx| {
        let mut view = ctx.symbols(&view_table);
        view.erase_for_next_parse("red");
        view.insert_for_next_parse("red", 1_u64);
    });
    let done = AtomicBool::new(false);

    std::thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let mut checks = 0_u32;
            while !done.load(Ordering::Relaxed) || checks == 0 {
                assert_eq!(table.find("red"), Some(Attribute::UInt(1)));
                checks += 1;
            }
        });
        let writers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    for _ in 0..200 {
                        assert!(parse("!", &p).is_some());
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Relaxed);
        reader.join().unwrap();
    });
}

#[test]
fn test_table_changes_inside_an_action_apply_immediately() {
    let table = colors();
    let shared = table.clone();
    let erased = Arc::new(AtomicBool::new(false));
    let seen = erased.clone();
    let p = table.parser()
        >> lit('!').action(move |_| {
            shared.erase_for_next_parse("red");
            seen.store(shared.find("red").is_none(), Ordering::Relaxed);
        });

    // Only changes made through the action's view are queued.
    assert_eq!(parse("red!", &p), Some(Attribute::UInt(1)));
    assert!(erased.load(Ordering::Relaxed));
}
