//! Parser Tests - Queries
//!
//! End-to-end parsing of every query form into the AST.

use rstest::rstest;
use typeql::parser::parse_query;
use typeql::syntax::constraint::{HasAttribute, ThingConstraint, TypeConstraint, TypeRef};
use typeql::syntax::query::AggregateMethod;
use typeql::syntax::statement::Statement;
use typeql::{Query, Reference};

fn parsed(typeql: &str) -> Query {
    parse_query(typeql).unwrap_or_else(|err| panic!("failed to parse {typeql:?}: {err}"))
}

#[test]
fn test_simple_get() {
    let query = parsed("match $x isa movie; get;");
    let get = query.as_get().expect("should be a get query");
    assert!(get.filter().is_empty());
    assert_eq!(get.match_clause().patterns().len(), 1);

    let statement = get.match_clause().patterns()[0]
        .as_statement()
        .expect("should be a statement");
    assert_eq!(statement.head(), &Reference::concept("x"));
    let thing = statement.as_thing().unwrap();
    let (type_ref, exact) = thing.isa_constraint().unwrap();
    assert_eq!(type_ref, &TypeRef::from("movie"));
    assert!(!exact);
}

#[test]
fn test_get_with_filter_keeps_order() {
    let query = parsed("match $x isa movie, has title $t; get $t, $x;");
    let get = query.as_get().unwrap();
    let filter: Vec<_> = get.filter().iter().map(|v| v.as_str()).collect();
    assert_eq!(filter, ["t", "x"]);
}

#[test]
fn test_modifiers() {
    let query = parsed("match $x isa movie, has title $t; get $x; sort $x asc; offset 10; limit 5;");
    let get = query.as_get().unwrap();
    let sorting = get.sorting().unwrap();
    assert_eq!(sorting.var.as_str(), "x");
    assert_eq!(get.offset(), Some(10));
    assert_eq!(get.limit(), Some(5));
}

#[rstest]
#[case("match $x isa movie, has rating $r; get; count;", AggregateMethod::Count, None)]
#[case("match $x isa movie, has rating $r; get; max $r;", AggregateMethod::Max, Some("r"))]
#[case("match $x isa movie, has rating $r; get; mean $r;", AggregateMethod::Mean, Some("r"))]
#[case("match $x isa movie, has rating $r; get; std $r;", AggregateMethod::Std, Some("r"))]
fn test_aggregates(
    #[case] input: &str,
    #[case] method: AggregateMethod,
    #[case] var: Option<&str>,
) {
    let query = parsed(input);
    let aggregate = query.as_aggregate().unwrap();
    assert_eq!(aggregate.method(), method);
    assert_eq!(aggregate.var(), var);
}

#[test]
fn test_group_and_group_aggregate() {
    let query = parsed("match $x isa movie, has rating $r; get; group $x;");
    assert_eq!(query.as_group().unwrap().var(), "x");

    let query = parsed("match $x isa movie, has rating $r; get; group $x; mean $r;");
    let group_aggregate = query.as_group_aggregate().unwrap();
    assert_eq!(group_aggregate.group_query().var(), "x");
    assert_eq!(group_aggregate.method(), AggregateMethod::Mean);
    assert_eq!(group_aggregate.var(), Some("r"));
}

#[test]
fn test_insert() {
    let query = parsed("insert $x isa movie, has title \"Spy\";");
    let insert = query.as_insert().unwrap();
    assert!(insert.match_clause().is_none());
    assert_eq!(insert.statements().len(), 1);
}

#[test]
fn test_match_insert() {
    let query = parsed("match $x isa movie; insert $x has genre \"drama\";");
    let insert = query.as_insert().unwrap();
    assert!(insert.match_clause().is_some());
}

#[test]
fn test_delete_with_bare_variable() {
    let query = parsed("match $x isa movie; delete $x;");
    let delete = query.as_delete().unwrap();
    let statement = &delete.statements()[0];
    assert_eq!(statement.head(), &Reference::concept("x"));
    assert!(statement.as_thing().unwrap().constraints().is_empty());
}

#[test]
fn test_define_schema() {
    let query = parsed(
        "define person sub entity, has name, plays marriage:spouse, key email; \
         name sub attribute, value string, regex \"\\w+\";",
    );
    let define = query.as_define().unwrap();
    assert_eq!(define.statements().len(), 2);

    let person = &define.statements()[0];
    assert!(person.constraints().iter().any(|c| matches!(
        c,
        TypeConstraint::Owns { is_key: true, .. }
    )));
    assert!(person.constraints().iter().any(|c| match c {
        TypeConstraint::Plays(role) => role.scope.as_deref() == Some("marriage"),
        _ => false,
    }));
}

#[test]
fn test_undefine() {
    let query = parsed("undefine person plays marriage:spouse;");
    assert!(query.as_undefine().is_ok());
}

#[test]
fn test_relation_statement() {
    let query = parsed("match $m (wife: $x, husband: $y) isa marriage; get;");
    let get = query.as_get().unwrap();
    let statement = get.match_clause().patterns()[0].as_statement().unwrap();
    let relation = statement.as_relation().unwrap();
    assert_eq!(relation.relation().role_players().len(), 2);
    assert!(relation
        .relation()
        .role_players()
        .iter()
        .all(|rp| rp.role_type.is_some()));
}

#[test]
fn test_role_without_type_is_recorded_as_none() {
    let query = parsed("match ($x, $y) isa friendship; get;");
    let get = query.as_get().unwrap();
    let statement = get.match_clause().patterns()[0].as_statement().unwrap();
    let relation = statement.as_relation().unwrap();
    assert!(!relation.head().is_visible());
    assert!(relation
        .relation()
        .role_players()
        .iter()
        .all(|rp| rp.role_type.is_none()));
}

#[test]
fn test_has_shorthand_expands() {
    let query = parsed("match $x has title \"Spy\"; get;");
    let get = query.as_get().unwrap();
    let statement = get.match_clause().patterns()[0].as_statement().unwrap();
    match &statement.as_thing().unwrap().constraints()[0] {
        ThingConstraint::Has(has) => {
            assert_eq!(has.attribute_type.as_deref(), Some("title"));
            assert!(matches!(has.attribute, HasAttribute::Statement(_)));
        }
        other => panic!("expected has constraint, got {other:?}"),
    }
}

#[test]
fn test_has_variable_side_is_not_inlined() {
    let query = parsed("match $x has age $y; $y > 18; get;");
    let get = query.as_get().unwrap();
    let first = get.match_clause().patterns()[0].as_statement().unwrap();
    match &first.as_thing().unwrap().constraints()[0] {
        ThingConstraint::Has(has) => {
            assert_eq!(has.attribute, HasAttribute::Variable(Reference::concept("y")));
        }
        other => panic!("expected has constraint, got {other:?}"),
    }
    // the later comparison stays its own statement
    assert!(matches!(
        get.match_clause().patterns()[1].as_statement().unwrap(),
        Statement::Attribute(_)
    ));
}

#[rstest]
#[case("match $x isa! person; get;", true)]
#[case("match $x isa person; get;", false)]
fn test_isa_exactness(#[case] input: &str, #[case] exact: bool) {
    let query = parsed(input);
    let get = query.as_get().unwrap();
    let statement = get.match_clause().patterns()[0].as_statement().unwrap();
    let (_, is_exact) = statement.as_thing().unwrap().isa_constraint().unwrap();
    assert_eq!(is_exact, exact);
}

#[test]
fn test_type_constraint_binds_label() {
    let query = parsed("match $x type person; get $x;");
    let get = query.as_get().unwrap();
    let statement = get.match_clause().patterns()[0].as_statement().unwrap();
    let type_statement = statement.as_type().unwrap();
    assert!(matches!(
        type_statement.constraints()[0],
        TypeConstraint::Label(_)
    ));
}

#[test]
fn test_variable_inequality() {
    let query = parsed("match $x isa person; $y isa person; $x != $y; get;");
    let get = query.as_get().unwrap();
    let statement = get.match_clause().patterns()[2].as_statement().unwrap();
    assert!(matches!(
        statement.as_thing().unwrap().constraints()[0],
        ThingConstraint::Neq(_)
    ));
}

#[test]
fn test_value_variable() {
    let query = parsed("match $x has salary ?s; get;");
    let get = query.as_get().unwrap();
    let statement = get.match_clause().patterns()[0].as_statement().unwrap();
    match &statement.as_thing().unwrap().constraints()[0] {
        ThingConstraint::Has(has) => {
            assert_eq!(has.attribute, HasAttribute::Variable(Reference::value("s")));
        }
        other => panic!("expected has constraint, got {other:?}"),
    }
}

#[test]
fn test_three_branch_disjunction() {
    let query = parsed(
        "match $x isa movie, has title $t; \
         { $t \"Apocalypse Now\"; } or { $t < \"Juno\"; $t > \"Godfather\"; } or { $t \"Spy\"; }; \
         $t !== \"Apocalypse Now\"; get;",
    );
    let get = query.as_get().unwrap();
    match &get.match_clause().patterns()[1] {
        typeql::Pattern::Disjunction(disjunction) => {
            assert_eq!(disjunction.patterns().len(), 3);
        }
        other => panic!("expected a disjunction, got {other:?}"),
    }

    let inequality = get.match_clause().patterns()[2].as_statement().unwrap();
    match inequality.as_attribute().unwrap().operation() {
        typeql::syntax::constraint::ValueOperation::Comparison { comparator, .. } => {
            assert_eq!(*comparator, typeql::syntax::constraint::Comparator::Neq);
        }
        other => panic!("expected a comparison, got {other:?}"),
    }
}

#[test]
fn test_literal_kinds_are_not_coerced() {
    use typeql::syntax::constraint::{ComparisonRhs, ValueOperation};
    use typeql::Value;

    let long = parsed("match $a > 18; get;");
    let double = parsed("match $a > 18.0; get;");
    let rhs = |query: &Query| -> Value {
        let get = query.as_get().unwrap();
        let statement = get.match_clause().patterns()[0].as_statement().unwrap();
        match statement.as_attribute().unwrap().operation() {
            ValueOperation::Comparison {
                rhs: ComparisonRhs::Value(value),
                ..
            } => value.clone(),
            other => panic!("expected a value comparison, got {other:?}"),
        }
    };
    assert_eq!(rhs(&long), Value::Long(18));
    assert_eq!(rhs(&double), Value::Double(18.0));
    assert_ne!(rhs(&long), rhs(&double));
}

#[test]
fn test_query_list_is_lazy_and_ordered() {
    let queries: Vec<_> = typeql::parse_queries(
        "define person sub entity; insert $x isa person; match $x isa person; get;",
    )
    .collect::<Result<_, _>>()
    .unwrap();
    assert_eq!(queries.len(), 3);
    assert!(queries[0].as_define().is_ok());
    assert!(queries[1].as_insert().is_ok());
    assert!(queries[2].as_get().is_ok());
}
