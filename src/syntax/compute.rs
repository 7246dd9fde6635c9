//! Compute queries: analytics over the graph.
//!
//! The method/condition/algorithm/argument matrix is data, not code:
//! [`COMPUTE_MATRIX`] is a static table the builder and the validator
//! consult, so adding a method or algorithm is a table change.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

use crate::error::{ComputeError, Error};
use crate::parser::keywords;
use crate::syntax::variable::Label;

/// Compute methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputeMethod {
    Count,
    Max,
    Min,
    Mean,
    Median,
    Sum,
    Std,
    Path,
    Centrality,
    Cluster,
}

impl fmt::Display for ComputeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Count => keywords::COUNT,
            Self::Max => keywords::MAX,
            Self::Min => keywords::MIN,
            Self::Mean => keywords::MEAN,
            Self::Median => keywords::MEDIAN,
            Self::Sum => keywords::SUM,
            Self::Std => keywords::STD,
            Self::Path => keywords::PATH,
            Self::Centrality => keywords::CENTRALITY,
            Self::Cluster => keywords::CLUSTER,
        })
    }
}

/// Compute algorithms selected with `using`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Degree,
    KCore,
    ConnectedComponent,
}

impl Algorithm {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            keywords::DEGREE => Some(Self::Degree),
            keywords::K_CORE => Some(Self::KCore),
            keywords::CONNECTED_COMPONENT => Some(Self::ConnectedComponent),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Degree => keywords::DEGREE,
            Self::KCore => keywords::K_CORE,
            Self::ConnectedComponent => keywords::CONNECTED_COMPONENT,
        })
    }
}

/// Argument parameters accepted inside `where`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    MinK,
    K,
    Size,
    Contains,
}

impl ArgKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            keywords::MIN_K => Some(Self::MinK),
            keywords::K => Some(Self::K),
            keywords::SIZE => Some(Self::Size),
            keywords::CONTAINS => Some(Self::Contains),
            _ => None,
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MinK => keywords::MIN_K,
            Self::K => keywords::K,
            Self::Size => keywords::SIZE,
            Self::Contains => keywords::CONTAINS,
        })
    }
}

/// An argument value: a long, or a concept id for `contains`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Long(i64),
    Id(SmolStr),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(value) => write!(f, "{}", value),
            Self::Id(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Long(value as i64)
    }
}

impl From<&str> for ArgValue {
    fn from(id: &str) -> Self {
        Self::Id(SmolStr::from(id))
    }
}

/// Condition clauses a compute query can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    From,
    To,
    Of,
    In,
    Using,
    Where,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::From => keywords::FROM,
            Self::To => keywords::TO,
            Self::Of => keywords::OF,
            Self::In => keywords::IN,
            Self::Using => keywords::USING,
            Self::Where => keywords::WHERE,
        })
    }
}

/// One algorithm a method accepts, with the argument parameters the
/// algorithm understands.
#[derive(Debug)]
pub struct AlgorithmSpec {
    pub algorithm: Algorithm,
    pub args: &'static [ArgKind],
}

/// One row of the compute matrix.
#[derive(Debug)]
pub struct MethodSpec {
    pub method: ComputeMethod,
    pub required: &'static [ConditionKind],
    pub optional: &'static [ConditionKind],
    pub algorithms: &'static [AlgorithmSpec],
    pub default_algorithm: Option<Algorithm>,
}

impl MethodSpec {
    fn accepts(&self, condition: ConditionKind) -> bool {
        if self.required.contains(&condition) || self.optional.contains(&condition) {
            return true;
        }
        matches!(condition, ConditionKind::Using | ConditionKind::Where) && !self.algorithms.is_empty()
    }

    fn allowed_algorithms(&self) -> Vec<Algorithm> {
        self.algorithms.iter().map(|spec| spec.algorithm).collect()
    }

    fn allowed_args(&self, algorithm: Algorithm) -> &'static [ArgKind] {
        self.algorithms
            .iter()
            .find(|spec| spec.algorithm == algorithm)
            .map(|spec| spec.args)
            .unwrap_or(&[])
    }
}

/// The compute matrix: every method with its conditions, algorithms,
/// and argument parameters.
pub static COMPUTE_MATRIX: &[MethodSpec] = &[
    MethodSpec {
        method: ComputeMethod::Count,
        required: &[],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Max,
        required: &[ConditionKind::Of],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Min,
        required: &[ConditionKind::Of],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Mean,
        required: &[ConditionKind::Of],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Median,
        required: &[ConditionKind::Of],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Sum,
        required: &[ConditionKind::Of],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Std,
        required: &[ConditionKind::Of],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Path,
        required: &[ConditionKind::From, ConditionKind::To],
        optional: &[ConditionKind::In],
        algorithms: &[],
        default_algorithm: None,
    },
    MethodSpec {
        method: ComputeMethod::Centrality,
        required: &[],
        optional: &[ConditionKind::In, ConditionKind::Of],
        algorithms: &[
            AlgorithmSpec {
                algorithm: Algorithm::Degree,
                args: &[],
            },
            AlgorithmSpec {
                algorithm: Algorithm::KCore,
                args: &[ArgKind::MinK],
            },
        ],
        default_algorithm: Some(Algorithm::Degree),
    },
    MethodSpec {
        method: ComputeMethod::Cluster,
        required: &[],
        optional: &[ConditionKind::In],
        algorithms: &[
            AlgorithmSpec {
                algorithm: Algorithm::ConnectedComponent,
                args: &[ArgKind::Size, ArgKind::Contains],
            },
            AlgorithmSpec {
                algorithm: Algorithm::KCore,
                args: &[ArgKind::K],
            },
        ],
        default_algorithm: Some(Algorithm::ConnectedComponent),
    },
];

/// Look up the matrix row for a method.
pub fn method_spec(method: ComputeMethod) -> &'static MethodSpec {
    COMPUTE_MATRIX
        .iter()
        .find(|spec| spec.method == method)
        .expect("every method has a matrix row")
}

/// Default argument values applied by accessors when an argument is not
/// provided.
pub const DEFAULT_MIN_K: i64 = 2;
pub const DEFAULT_K: i64 = 2;

// =============================================================================
// The query
// =============================================================================

/// A validated compute query.
///
/// The algorithm is materialised at build time (a `cluster` without
/// `using` carries `connected-component`), so printed output always
/// names the algorithm the engine will run. Argument defaults stay
/// accessor-level so the printed `where` clause mirrors the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeQuery {
    method: ComputeMethod,
    from: Option<SmolStr>,
    to: Option<SmolStr>,
    of: IndexSet<Label>,
    in_: IndexSet<Label>,
    algorithm: Option<Algorithm>,
    args: IndexMap<ArgKind, ArgValue>,
}

impl ComputeQuery {
    pub fn method(&self) -> ComputeMethod {
        self.method
    }

    pub fn from_id(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to_id(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn of_types(&self) -> &IndexSet<Label> {
        &self.of
    }

    pub fn in_types(&self) -> &IndexSet<Label> {
        &self.in_
    }

    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    pub fn args(&self) -> &IndexMap<ArgKind, ArgValue> {
        &self.args
    }

    /// The `min-k` argument, defaulting to [`DEFAULT_MIN_K`].
    pub fn min_k(&self) -> i64 {
        match self.args.get(&ArgKind::MinK) {
            Some(ArgValue::Long(value)) => *value,
            _ => DEFAULT_MIN_K,
        }
    }

    /// The `k` argument, defaulting to [`DEFAULT_K`].
    pub fn k(&self) -> i64 {
        match self.args.get(&ArgKind::K) {
            Some(ArgValue::Long(value)) => *value,
            _ => DEFAULT_K,
        }
    }
}

// =============================================================================
// The builder
// =============================================================================

/// Builds a [`ComputeQuery`], validating each condition against the
/// matrix as it is set and the whole against the required set on
/// [`build`](ComputeBuilder::build).
#[derive(Debug, Clone)]
pub struct ComputeBuilder {
    method: ComputeMethod,
    from: Option<SmolStr>,
    to: Option<SmolStr>,
    of: IndexSet<Label>,
    in_: IndexSet<Label>,
    algorithm: Option<Algorithm>,
    args: IndexMap<ArgKind, ArgValue>,
}

impl ComputeBuilder {
    pub fn new(method: ComputeMethod) -> Self {
        Self {
            method,
            from: None,
            to: None,
            of: IndexSet::new(),
            in_: IndexSet::new(),
            algorithm: None,
            args: IndexMap::new(),
        }
    }

    fn reject(&self, reason: ComputeError) -> Error {
        Error::InvalidCompute {
            method: self.method,
            reason,
        }
    }

    fn accept(&self, condition: ConditionKind) -> Result<(), Error> {
        if method_spec(self.method).accepts(condition) {
            Ok(())
        } else {
            Err(self.reject(ComputeError::UnexpectedCondition(condition)))
        }
    }

    pub fn from(mut self, id: impl Into<SmolStr>) -> Result<Self, Error> {
        self.accept(ConditionKind::From)?;
        self.from = Some(id.into());
        Ok(self)
    }

    pub fn to(mut self, id: impl Into<SmolStr>) -> Result<Self, Error> {
        self.accept(ConditionKind::To)?;
        self.to = Some(id.into());
        Ok(self)
    }

    pub fn of<I, T>(mut self, types: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<Label>,
    {
        self.accept(ConditionKind::Of)?;
        self.of.extend(types.into_iter().map(Into::into));
        Ok(self)
    }

    pub fn in_<I, T>(mut self, types: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<Label>,
    {
        self.accept(ConditionKind::In)?;
        self.in_.extend(types.into_iter().map(Into::into));
        Ok(self)
    }

    pub fn using(mut self, algorithm: Algorithm) -> Result<Self, Error> {
        self.accept(ConditionKind::Using)?;
        let spec = method_spec(self.method);
        if !spec.allowed_algorithms().contains(&algorithm) {
            return Err(self.reject(ComputeError::InvalidAlgorithm {
                algorithm,
                allowed: spec.allowed_algorithms(),
            }));
        }
        self.algorithm = Some(algorithm);
        Ok(self)
    }

    /// Set one `where` argument; repeated parameters keep the last
    /// occurrence.
    pub fn arg(mut self, kind: ArgKind, value: impl Into<ArgValue>) -> Result<Self, Error> {
        self.accept(ConditionKind::Where)?;
        self.args.insert(kind, value.into());
        Ok(self)
    }

    pub fn build(self) -> Result<ComputeQuery, Error> {
        let spec = method_spec(self.method);

        let missing: Vec<ConditionKind> = spec
            .required
            .iter()
            .copied()
            .filter(|condition| match condition {
                ConditionKind::From => self.from.is_none(),
                ConditionKind::To => self.to.is_none(),
                ConditionKind::Of => self.of.is_empty(),
                ConditionKind::In => self.in_.is_empty(),
                ConditionKind::Using => self.algorithm.is_none(),
                ConditionKind::Where => self.args.is_empty(),
            })
            .collect();
        if !missing.is_empty() {
            return Err(self.reject(ComputeError::MissingCondition(missing)));
        }

        let algorithm = self.algorithm.or(spec.default_algorithm);
        if let Some(algorithm) = algorithm {
            let allowed = spec.allowed_args(algorithm);
            for param in self.args.keys() {
                if !allowed.contains(param) {
                    return Err(self.reject(ComputeError::InvalidArgument {
                        param: *param,
                        allowed: allowed.to_vec(),
                    }));
                }
            }
        }

        Ok(ComputeQuery {
            method: self.method,
            from: self.from,
            to: self.to,
            of: self.of,
            in_: self.in_,
            algorithm,
            args: self.args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_accepts_in_only() {
        assert!(ComputeBuilder::new(ComputeMethod::Count)
            .in_(["movie"])
            .unwrap()
            .build()
            .is_ok());
        assert!(ComputeBuilder::new(ComputeMethod::Count).of(["movie"]).is_err());
    }

    #[test]
    fn test_statistics_require_of() {
        let err = ComputeBuilder::new(ComputeMethod::Max).build().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCompute {
                method: ComputeMethod::Max,
                reason: ComputeError::MissingCondition(vec![ConditionKind::Of]),
            }
        );
    }

    #[test]
    fn test_path_requires_from_and_to() {
        let err = ComputeBuilder::new(ComputeMethod::Path).build().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCompute {
                method: ComputeMethod::Path,
                reason: ComputeError::MissingCondition(vec![ConditionKind::From, ConditionKind::To]),
            }
        );
    }

    #[test]
    fn test_cluster_defaults_to_connected_component() {
        let query = ComputeBuilder::new(ComputeMethod::Cluster).build().unwrap();
        assert_eq!(query.algorithm(), Some(Algorithm::ConnectedComponent));
    }

    #[test]
    fn test_cluster_rejects_degree() {
        let err = ComputeBuilder::new(ComputeMethod::Cluster)
            .using(Algorithm::Degree)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidCompute {
                reason: ComputeError::InvalidAlgorithm { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_repeated_args_keep_last() {
        let query = ComputeBuilder::new(ComputeMethod::Cluster)
            .using(Algorithm::KCore)
            .unwrap()
            .arg(ArgKind::K, 5)
            .unwrap()
            .arg(ArgKind::K, 10)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(query.args().get(&ArgKind::K), Some(&ArgValue::Long(10)));
        assert_eq!(query.k(), 10);
    }

    #[test]
    fn test_arg_must_match_algorithm() {
        let err = ComputeBuilder::new(ComputeMethod::Cluster)
            .using(Algorithm::KCore)
            .unwrap()
            .arg(ArgKind::Size, 3)
            .unwrap()
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidCompute {
                method: ComputeMethod::Cluster,
                reason: ComputeError::InvalidArgument {
                    param: ArgKind::Size,
                    allowed: vec![ArgKind::K],
                },
            }
        );
    }

    #[test]
    fn test_default_arg_accessors() {
        let query = ComputeBuilder::new(ComputeMethod::Centrality)
            .using(Algorithm::KCore)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(query.min_k(), DEFAULT_MIN_K);
    }
}
