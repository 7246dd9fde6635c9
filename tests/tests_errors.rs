//! Error reporting tests
//!
//! Syntax errors carry line/column and a caret-pointer snippet of the
//! offending line; structural errors carry their taxonomy kind.

use typeql::parser::{parse_pattern, parse_queries, parse_query};
use typeql::Error;

#[test]
fn test_empty_input() {
    assert_eq!(parse_query(""), Err(Error::EmptyInput));
    assert_eq!(parse_query("   \n\t"), Err(Error::EmptyInput));
    assert_eq!(parse_query("# only a comment\n"), Err(Error::EmptyInput));
}

#[test]
fn test_multiple_queries_rejected() {
    assert_eq!(
        parse_query("match $x isa movie; get; match $y isa person; get;"),
        Err(Error::MultipleQueries)
    );
}

#[test]
fn test_trailing_incomplete_input_points_past_the_end() {
    let err = parse_query("match $x isa ").unwrap_err();
    match err {
        Error::Syntax {
            line,
            column,
            snippet,
            ..
        } => {
            assert_eq!(line, 1);
            assert_eq!(column, 14);
            assert_eq!(snippet, "match $x isa \n             ^");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_caret_on_the_offending_line() {
    let err = parse_query("match\n$x isa movie\nget;").unwrap_err();
    match err {
        Error::Syntax { line, snippet, .. } => {
            // the missing ';' is noticed at 'get' on line 3
            assert_eq!(line, 3);
            assert!(snippet.starts_with("get;\n"), "snippet: {snippet}");
            assert!(snippet.ends_with('^'), "snippet: {snippet}");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_multi_line_snippet_preserves_whitespace() {
    let err = parse_query("match\n  $x isa \nget;").unwrap_err();
    match err {
        Error::Syntax { snippet, .. } => {
            assert!(snippet.contains("  $x isa ") || snippet.contains("get;"), "snippet: {snippet}");
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_illegal_character() {
    let err = parse_query("match $x isa @movie; get;").unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }));
}

#[test]
fn test_sub_millisecond_datetime_is_a_syntax_error() {
    let err = parse_query("match $x has release-date 1000-11-12T13:14:15.000123456; get;")
        .unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }), "got {err:?}");
}

#[test]
fn test_unrecognised_value_type() {
    assert_eq!(
        parse_query("define name sub attribute, value weird;"),
        Err(Error::UnrecognisedToken {
            token: "weird".to_owned(),
            context: "value type",
        })
    );
}

#[test]
fn test_filter_variable_out_of_scope() {
    assert_eq!(
        parse_query("match $x isa movie; get $y;"),
        Err(Error::VariableOutOfScope {
            variable: "$y".to_owned()
        })
    );
}

#[test]
fn test_sort_variable_must_be_selected() {
    assert_eq!(
        parse_query("match $x isa movie, has title $t; get $x; sort $t;"),
        Err(Error::VariableOutOfScope {
            variable: "$t".to_owned()
        })
    );
}

#[test]
fn test_aggregate_variable_out_of_scope() {
    assert_eq!(
        parse_query("match $x isa movie; get; mean $r;"),
        Err(Error::VariableOutOfScope {
            variable: "$r".to_owned()
        })
    );
}

#[test]
fn test_repeated_singleton_constraint() {
    assert_eq!(
        parse_query("match $x isa movie, isa person; get;"),
        Err(Error::RepeatedConstraint {
            head: "$x".to_owned(),
            constraint: "isa",
        })
    );
    assert_eq!(
        parse_query("define person sub entity, sub thing;"),
        Err(Error::RepeatedConstraint {
            head: "person".to_owned(),
            constraint: "sub",
        })
    );
}

#[test]
fn test_mixed_statement_families() {
    assert!(matches!(
        parse_query("match $x sub entity, isa movie; get;"),
        Err(Error::InvalidStatementKind { .. })
    ));
}

#[test]
fn test_schema_statement_in_insert() {
    assert!(matches!(
        parse_query("insert person sub entity;"),
        Err(Error::InvalidStatementKind {
            context: "an insert",
            ..
        })
    ));
}

#[test]
fn test_instance_statement_in_define() {
    assert!(matches!(
        parse_query("define $x isa movie;"),
        Err(Error::InvalidStatementKind { .. })
    ));
}

#[test]
fn test_query_list_stops_at_first_error() {
    let mut queries = parse_queries("match $x isa movie; get; match $$$;");
    assert!(queries.next().unwrap().is_ok());
    assert!(queries.next().unwrap().is_err());
    assert!(queries.next().is_none());
}

#[test]
fn test_pattern_entry_points() {
    let pattern = parse_pattern("$x isa movie;").unwrap();
    assert!(pattern.as_statement().is_some());

    let braced = parse_pattern("{ $x isa movie; $x has title \"Spy\"; };").unwrap();
    assert!(matches!(braced, typeql::Pattern::Conjunction(_)));

    assert_eq!(parse_pattern(""), Err(Error::EmptyInput));
    assert_eq!(
        parse_pattern("$x isa movie; $y isa person;"),
        Err(Error::MultipleQueries)
    );
}

#[test]
fn test_error_display_contains_caret() {
    let err = parse_query("match $x isa ").unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("line 1"), "rendered: {rendered}");
    assert!(rendered.contains('^'), "rendered: {rendered}");
}

#[test]
fn test_invalid_casting() {
    let query = parse_query("match $x isa movie; get;").unwrap();
    let err = query.as_define().unwrap_err();
    assert_eq!(
        err,
        Error::InvalidCasting {
            from: "get query",
            to: "define query",
        }
    );
}
