//! Round-trip Tests
//!
//! The printer is the inverse of the parser: reparsing printed output
//! reconstructs an equal AST in both pretty and compact modes, and
//! printing is byte-stable across a parse/print cycle.

use rstest::rstest;
use typeql::parser::parse_query;
use typeql::FormatOptions;

fn assert_round_trip(input: &str) {
    let query = parse_query(input).unwrap_or_else(|err| panic!("failed to parse {input:?}: {err}"));

    let pretty = query.to_typeql(&FormatOptions::default());
    let compact = query.to_typeql(&FormatOptions::compact());

    let from_pretty =
        parse_query(&pretty).unwrap_or_else(|err| panic!("failed to reparse {pretty:?}: {err}"));
    let from_compact =
        parse_query(&compact).unwrap_or_else(|err| panic!("failed to reparse {compact:?}: {err}"));

    assert_eq!(query, from_pretty, "pretty round trip of {input:?}");
    assert_eq!(query, from_compact, "compact round trip of {input:?}");

    // print determinism: print(parse(print(q))) == print(q)
    assert_eq!(pretty, from_pretty.to_typeql(&FormatOptions::default()));
    assert_eq!(compact, from_compact.to_typeql(&FormatOptions::compact()));
}

#[rstest]
#[case("match $x isa movie; get;")]
#[case("match $x isa movie, has title \"Spy\"; get $x;")]
#[case("match $x isa! person; get;")]
#[case("match $x has age > 18; get;")]
#[case("match $x has age $y; $y > 18; get;")]
#[case("match $x has salary ?s; get;")]
#[case("match $x isa person; $y isa person; $x != $y; get;")]
#[case("match $x type person; get $x;")]
#[case("match $x id V123; get;")]
#[case("match $m (wife: $x, husband: $y) isa marriage; get;")]
#[case("match ($x, $y) isa friendship; get;")]
#[case("match ($role: $x) isa employment; get;")]
#[case("match $x isa movie; not { $x has genre \"horror\"; }; get;")]
#[case("match $x isa movie, has title $t; get $x, $t; sort $t asc; offset 10; limit 5;")]
#[case("match $x isa movie, has title $t; get; sort $t;")]
#[case("match $x isa movie, has rating $r; get; count;")]
#[case("match $x isa movie, has rating $r; get; mean $r;")]
#[case("match $x isa movie, has rating $r; get; group $x;")]
#[case("match $x isa movie, has rating $r; get; group $x; median $r;")]
#[case("insert $x isa movie, has title \"Spy\";")]
#[case("match $x isa movie; insert $x has genre \"drama\";")]
#[case("match $x isa movie; delete $x;")]
#[case("define person sub entity, has name, plays marriage:spouse, key email;")]
#[case("define name sub attribute, value string, regex \"\\w+\";")]
#[case("define animal sub entity, abstract;")]
#[case("define child sub! person;")]
#[case("define fatherhood sub parenthood, relates father as parent, relates child;")]
#[case(
    "define all-movies-are-drama sub rule, when { $x isa movie; }, then { $x has genre \"drama\"; };"
)]
#[case("undefine person plays marriage:spouse;")]
#[case("compute count;")]
#[case("compute count in movie;")]
#[case("compute max of age, in [movie, person];")]
#[case("compute path from V123, to V456;")]
#[case("compute path from V123, to V456, in [movie, person];")]
#[case("compute centrality of person, using k-core, where min-k = 3;")]
#[case("compute centrality in [movie, person], using degree;")]
#[case("compute cluster in [movie, person], using k-core, where k = 10;")]
#[case("compute cluster using connected-component, where [size = 5, contains = V123];")]
fn test_round_trip(#[case] input: &str) {
    assert_round_trip(input);
}

#[test]
fn test_round_trip_disjunction() {
    assert_round_trip(
        "match $x isa movie, has title $t; \
         { $t \"Apocalypse Now\"; } or { $t < \"Juno\"; $t > \"Godfather\"; } or { $t \"Spy\"; }; \
         $t !== \"Apocalypse Now\"; get;",
    );
}

#[test]
fn test_quote_style_canonicalises() {
    let single = parse_query("match $x has title 'Spy'; get;").unwrap();
    let double = parse_query("match $x has title \"Spy\"; get;").unwrap();
    assert_eq!(single, double);

    let printed = single.to_typeql(&FormatOptions::compact());
    assert!(printed.contains("\"Spy\""), "printed: {printed}");
    assert!(!printed.contains('\''));
}

#[test]
fn test_comment_transparency() {
    let plain = parse_query("match $x isa movie; get;").unwrap();
    let commented =
        parse_query("# leading\nmatch # mid\n$x isa # more\nmovie; get; # trailing").unwrap();
    assert_eq!(plain, commented);
}

#[test]
fn test_date_time_prints_milliseconds_only_when_nonzero() {
    let query = parse_query("match $x has release-date 1000-11-12T13:14:15.1; get;").unwrap();
    let printed = query.to_typeql(&FormatOptions::compact());
    assert!(printed.contains("1000-11-12T13:14:15.100"), "printed: {printed}");
    assert_round_trip("match $x has release-date 1000-11-12T13:14:15.100; get;");

    let midnight = parse_query("match $x has release-date 1000-11-12; get;").unwrap();
    let printed = midnight.to_typeql(&FormatOptions::compact());
    assert!(printed.contains("1000-11-12T00:00;"), "printed: {printed}");
    assert_round_trip("match $x has release-date 1000-11-12; get;");
}

#[test]
fn test_signed_year_printing() {
    assert_round_trip("match $x has start-date +12345-01-02; get;");
    assert_round_trip("match $x has start-date -0042-01-02; get;");
}

#[test]
fn test_pretty_output_shape() {
    let query = parse_query("match $x isa movie, has title $t; get $x;").unwrap();
    assert_eq!(
        query.to_typeql(&FormatOptions::default()),
        "match\n$x isa movie, has title $t;\nget $x;"
    );
}

#[test]
fn test_pretty_rule_is_indented() {
    let query = parse_query(
        "define all-movies-are-drama sub rule, when { $x isa movie; }, then { $x has genre \"drama\"; };",
    )
    .unwrap();
    assert_eq!(
        query.to_typeql(&FormatOptions::default()),
        "define\nall-movies-are-drama sub rule, when {\n  $x isa movie;\n}, then {\n  $x has genre \"drama\";\n};"
    );
    assert_eq!(
        query.to_typeql(&FormatOptions::compact()),
        "define all-movies-are-drama sub rule, when { $x isa movie; }, then { $x has genre \"drama\"; };"
    );
}

#[test]
fn test_compute_defaults_are_materialised() {
    let query = parse_query("compute cluster in [movie, person];").unwrap();
    assert_eq!(
        query.to_typeql(&FormatOptions::compact()),
        "compute cluster in [movie, person], using connected-component;"
    );
    assert_round_trip("compute cluster in [movie, person];");
}

#[test]
fn test_empty_in_equals_absent_in() {
    let bare = parse_query("compute count;").unwrap();
    let bracketed = parse_query("compute count in [];").unwrap();
    assert_eq!(bare, bracketed);
    assert_eq!(
        bracketed.to_typeql(&FormatOptions::compact()),
        "compute count;"
    );
}
