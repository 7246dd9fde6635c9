//! Compute query tests
//!
//! The method/algorithm/argument matrix drives both parsing and the
//! builder; these tests exercise the acceptance table from both sides.

use rstest::rstest;
use typeql::error::ComputeError;
use typeql::parser::parse_query;
use typeql::syntax::compute::{ArgKind, ArgValue, ConditionKind};
use typeql::{compute, Algorithm, ComputeMethod, Error};

fn compute_error(input: &str) -> (ComputeMethod, ComputeError) {
    match parse_query(input) {
        Err(Error::InvalidCompute { method, reason }) => (method, reason),
        other => panic!("expected an invalid-compute error, got {other:?}"),
    }
}

#[test]
fn test_count() {
    let query = parse_query("compute count;").unwrap();
    let compute = query.as_compute().unwrap();
    assert_eq!(compute.method(), ComputeMethod::Count);
    assert!(compute.in_types().is_empty());
    assert_eq!(compute.algorithm(), None);
}

#[test]
fn test_statistics_carry_of_and_in() {
    let query = parse_query("compute max of age, in [movie, person];").unwrap();
    let compute = query.as_compute().unwrap();
    assert_eq!(compute.method(), ComputeMethod::Max);
    assert_eq!(compute.of_types().len(), 1);
    assert_eq!(compute.in_types().len(), 2);
}

#[test]
fn test_path_endpoints() {
    let query = parse_query("compute path from V123, to V456;").unwrap();
    let compute = query.as_compute().unwrap();
    assert_eq!(compute.from_id(), Some("V123"));
    assert_eq!(compute.to_id(), Some("V456"));
}

#[rstest]
#[case("compute max;", ComputeMethod::Max, vec![ConditionKind::Of])]
#[case("compute mean;", ComputeMethod::Mean, vec![ConditionKind::Of])]
#[case("compute path;", ComputeMethod::Path, vec![ConditionKind::From, ConditionKind::To])]
#[case("compute path from V123;", ComputeMethod::Path, vec![ConditionKind::To])]
fn test_missing_conditions(
    #[case] input: &str,
    #[case] method: ComputeMethod,
    #[case] missing: Vec<ConditionKind>,
) {
    let (found_method, reason) = compute_error(input);
    assert_eq!(found_method, method);
    assert_eq!(reason, ComputeError::MissingCondition(missing));
}

#[rstest]
#[case("compute count of movie;", ConditionKind::Of)]
#[case("compute count using degree;", ConditionKind::Using)]
#[case("compute max of age, from V1;", ConditionKind::From)]
#[case("compute path from V1, to V2, where k = 2;", ConditionKind::Where)]
fn test_unexpected_conditions(#[case] input: &str, #[case] condition: ConditionKind) {
    let (_, reason) = compute_error(input);
    assert_eq!(reason, ComputeError::UnexpectedCondition(condition));
}

#[test]
fn test_cluster_algorithms() {
    let query = parse_query("compute cluster in movie, using k-core;").unwrap();
    assert_eq!(query.as_compute().unwrap().algorithm(), Some(Algorithm::KCore));

    let (_, reason) = compute_error("compute cluster using degree;");
    assert_eq!(
        reason,
        ComputeError::InvalidAlgorithm {
            algorithm: Algorithm::Degree,
            allowed: vec![Algorithm::ConnectedComponent, Algorithm::KCore],
        }
    );
}

#[test]
fn test_centrality_defaults_to_degree() {
    let query = parse_query("compute centrality of person;").unwrap();
    assert_eq!(
        query.as_compute().unwrap().algorithm(),
        Some(Algorithm::Degree)
    );
}

#[test]
fn test_arguments_last_write_wins() {
    let query =
        parse_query("compute cluster in [movie, person], using k-core, where [k = 5, k = 10];")
            .unwrap();
    let compute = query.as_compute().unwrap();
    assert_eq!(compute.args().len(), 1);
    assert_eq!(compute.args().get(&ArgKind::K), Some(&ArgValue::Long(10)));
    assert_eq!(compute.k(), 10);
}

#[test]
fn test_argument_must_match_algorithm() {
    let (_, reason) = compute_error("compute cluster using k-core, where size = 5;");
    assert_eq!(
        reason,
        ComputeError::InvalidArgument {
            param: ArgKind::Size,
            allowed: vec![ArgKind::K],
        }
    );
}

#[test]
fn test_argument_against_default_algorithm() {
    // without `using`, cluster defaults to connected-component, which
    // accepts size and contains but not k
    let (_, reason) = compute_error("compute cluster where k = 2;");
    assert_eq!(
        reason,
        ComputeError::InvalidArgument {
            param: ArgKind::K,
            allowed: vec![ArgKind::Size, ArgKind::Contains],
        }
    );
    assert!(parse_query("compute cluster where [size = 5, contains = V1];").is_ok());
}

#[test]
fn test_unrecognised_algorithm_and_argument() {
    assert_eq!(
        parse_query("compute cluster using page-rank;"),
        Err(Error::UnrecognisedToken {
            token: "page-rank".to_owned(),
            context: "compute algorithm",
        })
    );
    assert_eq!(
        parse_query("compute cluster where coolness = 3;"),
        Err(Error::UnrecognisedToken {
            token: "coolness".to_owned(),
            context: "compute argument",
        })
    );
}

#[test]
fn test_builder_matches_parsed() {
    let parsed = parse_query("compute cluster in [movie, person], using k-core, where k = 10;")
        .unwrap();
    let built = compute(ComputeMethod::Cluster)
        .in_(["movie", "person"])
        .unwrap()
        .using(Algorithm::KCore)
        .unwrap()
        .arg(ArgKind::K, 10)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(parsed, built.into());
}

#[test]
fn test_builder_rejects_at_mutation() {
    let err = compute(ComputeMethod::Count).of(["movie"]).unwrap_err();
    assert_eq!(
        err,
        Error::InvalidCompute {
            method: ComputeMethod::Count,
            reason: ComputeError::UnexpectedCondition(ConditionKind::Of),
        }
    );
}
