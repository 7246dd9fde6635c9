//! Query list tests
//!
//! The list parser is iterative over queries: very long inputs must not
//! grow the stack with the number of queries.

use typeql::parser::{parse_patterns, parse_queries};

#[test]
fn test_ten_thousand_queries() {
    let mut source = String::new();
    for i in 0..10_000 {
        source.push_str(&format!("insert $x{i} isa movie, has title \"m{i}\";\n"));
    }

    let mut count = 0usize;
    for query in parse_queries(&source) {
        let query = query.expect("every query in the list is well-formed");
        assert!(query.as_insert().is_ok());
        count += 1;
    }
    assert_eq!(count, 10_000);
}

#[test]
fn test_ten_thousand_mixed_queries() {
    let mut source = String::new();
    for _ in 0..5_000 {
        source.push_str("match $x isa movie; get; ");
        source.push_str("define person sub entity; ");
    }

    let count = parse_queries(&source)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
        .len();
    assert_eq!(count, 10_000);
}

#[test]
fn test_pattern_list() {
    let patterns: Vec<_> = parse_patterns(
        "$x isa movie; $x has title $t; { $t \"a\"; } or { $t \"b\"; }; not { $x has genre \"horror\"; };",
    )
    .collect::<Result<_, _>>()
    .unwrap();
    assert_eq!(patterns.len(), 4);
}

#[test]
fn test_list_parsing_is_lazy() {
    // the tail is malformed, but the first queries still come out
    let mut queries = parse_queries("insert $a isa movie; insert $b isa movie; nonsense");
    assert!(queries.next().unwrap().is_ok());
    assert!(queries.next().unwrap().is_ok());
    assert!(queries.next().unwrap().is_err());
    assert!(queries.next().is_none());
}
