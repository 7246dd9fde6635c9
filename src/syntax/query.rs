//! Queries: the top of the AST.
//!
//! Every query variant is assembled through a validating constructor, so
//! a value of [`Query`] is always well-formed regardless of whether it
//! came from the parser or the builder API.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::fmt;

use crate::error::Error;
use crate::parser::keywords;
use crate::semantic;
use crate::syntax::compute::ComputeQuery;
use crate::syntax::pattern::{Conjunction, Pattern};
use crate::syntax::statement::{Statement, TypeStatement};
use crate::syntax::variable::Reference;

/// A validated TypeQL query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Define(DefineQuery),
    Undefine(UndefineQuery),
    Insert(InsertQuery),
    Delete(DeleteQuery),
    Get(GetQuery),
    Aggregate(AggregateQuery),
    Group(GroupQuery),
    GroupAggregate(GroupAggregateQuery),
    Compute(ComputeQuery),
}

impl Query {
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Define(_) => "define query",
            Self::Undefine(_) => "undefine query",
            Self::Insert(_) => "insert query",
            Self::Delete(_) => "delete query",
            Self::Get(_) => "get query",
            Self::Aggregate(_) => "aggregate query",
            Self::Group(_) => "group query",
            Self::GroupAggregate(_) => "group-aggregate query",
            Self::Compute(_) => "compute query",
        }
    }

    pub fn as_define(&self) -> Result<&DefineQuery, Error> {
        match self {
            Self::Define(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "define query")),
        }
    }

    pub fn as_undefine(&self) -> Result<&UndefineQuery, Error> {
        match self {
            Self::Undefine(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "undefine query")),
        }
    }

    pub fn as_insert(&self) -> Result<&InsertQuery, Error> {
        match self {
            Self::Insert(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "insert query")),
        }
    }

    pub fn as_delete(&self) -> Result<&DeleteQuery, Error> {
        match self {
            Self::Delete(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "delete query")),
        }
    }

    pub fn as_get(&self) -> Result<&GetQuery, Error> {
        match self {
            Self::Get(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "get query")),
        }
    }

    pub fn into_get(self) -> Result<GetQuery, Error> {
        match self {
            Self::Get(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "get query")),
        }
    }

    pub fn as_aggregate(&self) -> Result<&AggregateQuery, Error> {
        match self {
            Self::Aggregate(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "aggregate query")),
        }
    }

    pub fn as_group(&self) -> Result<&GroupQuery, Error> {
        match self {
            Self::Group(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "group query")),
        }
    }

    pub fn as_group_aggregate(&self) -> Result<&GroupAggregateQuery, Error> {
        match self {
            Self::GroupAggregate(query) => Ok(query),
            other => Err(Error::invalid_casting(
                other.variant_name(),
                "group-aggregate query",
            )),
        }
    }

    pub fn as_compute(&self) -> Result<&ComputeQuery, Error> {
        match self {
            Self::Compute(query) => Ok(query),
            other => Err(Error::invalid_casting(other.variant_name(), "compute query")),
        }
    }
}

// =============================================================================
// Match clause
// =============================================================================

/// An incomplete query: a conjunction of patterns waiting for `get`,
/// `insert`, or `delete` to finish it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchClause {
    conjunction: Conjunction,
}

impl MatchClause {
    pub fn new(patterns: Vec<Pattern>) -> Result<Self, Error> {
        if patterns.is_empty() {
            return Err(Error::EmptyMatch);
        }
        for pattern in &patterns {
            pattern.validate()?;
        }
        Ok(Self {
            conjunction: Conjunction::new(patterns),
        })
    }

    pub fn patterns(&self) -> &[Pattern] {
        self.conjunction.patterns()
    }

    /// The named concept variables of the match block.
    pub fn named_concept_names(&self) -> FxHashSet<SmolStr> {
        let mut references = FxHashSet::default();
        for pattern in self.patterns() {
            pattern.collect_named(&mut references);
        }
        references
            .into_iter()
            .filter_map(|reference| match reference {
                Reference::Concept(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Finish as a get query. An empty filter selects every named
    /// variable of the match block.
    pub fn get<I, T>(self, filter: I) -> Result<GetQuery, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<SmolStr>,
    {
        GetQuery::new(self, filter.into_iter().map(Into::into).collect())
    }

    /// Finish as a match-insert query.
    pub fn insert<I, T>(self, statements: I) -> Result<InsertQuery, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<Statement>,
    {
        InsertQuery::new(
            Some(self),
            statements.into_iter().map(Into::into).collect(),
        )
    }

    /// Finish as a delete query.
    pub fn delete<I, T>(self, statements: I) -> Result<DeleteQuery, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<Statement>,
    {
        DeleteQuery::new(self, statements.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// Schema queries
// =============================================================================

/// `define <type statements>;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineQuery {
    statements: Vec<TypeStatement>,
}

impl DefineQuery {
    pub fn new(statements: Vec<TypeStatement>) -> Result<Self, Error> {
        validate_type_statements(&statements)?;
        Ok(Self { statements })
    }

    pub fn statements(&self) -> &[TypeStatement] {
        &self.statements
    }
}

/// `undefine <type statements>;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndefineQuery {
    statements: Vec<TypeStatement>,
}

impl UndefineQuery {
    pub fn new(statements: Vec<TypeStatement>) -> Result<Self, Error> {
        validate_type_statements(&statements)?;
        Ok(Self { statements })
    }

    pub fn statements(&self) -> &[TypeStatement] {
        &self.statements
    }
}

fn validate_type_statements(statements: &[TypeStatement]) -> Result<(), Error> {
    if statements.is_empty() {
        return Err(Error::EmptyMatch);
    }
    for statement in statements {
        statement.validate()?;
        semantic::rule::validate_if_rule(statement)?;
    }
    Ok(())
}

// =============================================================================
// Data queries
// =============================================================================

/// `insert ...;` optionally preceded by a match clause (match-insert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertQuery {
    match_clause: Option<MatchClause>,
    statements: Vec<Statement>,
}

impl InsertQuery {
    pub fn new(match_clause: Option<MatchClause>, statements: Vec<Statement>) -> Result<Self, Error> {
        validate_instance_statements(&statements, "an insert")?;
        Ok(Self {
            match_clause,
            statements,
        })
    }

    pub fn match_clause(&self) -> Option<&MatchClause> {
        self.match_clause.as_ref()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

/// `match ...; delete ...;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteQuery {
    match_clause: MatchClause,
    statements: Vec<Statement>,
}

impl DeleteQuery {
    pub fn new(match_clause: MatchClause, statements: Vec<Statement>) -> Result<Self, Error> {
        validate_instance_statements(&statements, "a delete")?;
        Ok(Self {
            match_clause,
            statements,
        })
    }

    pub fn match_clause(&self) -> &MatchClause {
        &self.match_clause
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

fn validate_instance_statements(statements: &[Statement], context: &'static str) -> Result<(), Error> {
    if statements.is_empty() {
        return Err(Error::EmptyMatch);
    }
    for statement in statements {
        if statement.is_type() {
            return Err(Error::InvalidStatementKind {
                statement: statement.to_string(),
                context,
            });
        }
        statement.validate()?;
    }
    Ok(())
}

// =============================================================================
// Get queries and modifiers
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Asc,
    Desc,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => keywords::ASC,
            Self::Desc => keywords::DESC,
        })
    }
}

/// `sort $t asc;` - the direction is kept only when written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorting {
    pub var: SmolStr,
    pub order: Option<Order>,
}

/// `match ...; get ...;` with optional sort/offset/limit modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetQuery {
    match_clause: MatchClause,
    filter: IndexSet<SmolStr>,
    sort: Option<Sorting>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl GetQuery {
    pub fn new(match_clause: MatchClause, filter: IndexSet<SmolStr>) -> Result<Self, Error> {
        let in_scope = match_clause.named_concept_names();
        for var in &filter {
            if !in_scope.contains(var) {
                return Err(Error::VariableOutOfScope {
                    variable: format!("${}", var),
                });
            }
        }
        Ok(Self {
            match_clause,
            filter,
            sort: None,
            offset: None,
            limit: None,
        })
    }

    pub fn match_clause(&self) -> &MatchClause {
        &self.match_clause
    }

    /// The explicit filter; empty means every named variable of the
    /// match block.
    pub fn filter(&self) -> &IndexSet<SmolStr> {
        &self.filter
    }

    pub fn sorting(&self) -> Option<&Sorting> {
        self.sort.as_ref()
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Whether a variable is retrievable from this query: in the filter,
    /// or anywhere in the match block when the filter is empty.
    pub fn selects(&self, var: &str) -> bool {
        if self.filter.is_empty() {
            self.match_clause.named_concept_names().contains(var)
        } else {
            self.filter.contains(var)
        }
    }

    pub fn sort(mut self, var: impl Into<SmolStr>, order: Option<Order>) -> Result<Self, Error> {
        let var = var.into();
        if !self.selects(&var) {
            return Err(Error::VariableOutOfScope {
                variable: format!("${}", var),
            });
        }
        self.sort = Some(Sorting { var, order });
        Ok(self)
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    // -------------------------------------------------------------------------
    // Aggregates
    // -------------------------------------------------------------------------

    pub fn count(self) -> AggregateQuery {
        AggregateQuery {
            query: Box::new(self),
            method: AggregateMethod::Count,
            var: None,
        }
    }

    pub fn max(self, var: impl Into<SmolStr>) -> Result<AggregateQuery, Error> {
        self.aggregate(AggregateMethod::Max, var.into())
    }

    pub fn min(self, var: impl Into<SmolStr>) -> Result<AggregateQuery, Error> {
        self.aggregate(AggregateMethod::Min, var.into())
    }

    pub fn mean(self, var: impl Into<SmolStr>) -> Result<AggregateQuery, Error> {
        self.aggregate(AggregateMethod::Mean, var.into())
    }

    pub fn median(self, var: impl Into<SmolStr>) -> Result<AggregateQuery, Error> {
        self.aggregate(AggregateMethod::Median, var.into())
    }

    pub fn sum(self, var: impl Into<SmolStr>) -> Result<AggregateQuery, Error> {
        self.aggregate(AggregateMethod::Sum, var.into())
    }

    pub fn std(self, var: impl Into<SmolStr>) -> Result<AggregateQuery, Error> {
        self.aggregate(AggregateMethod::Std, var.into())
    }

    pub(crate) fn aggregate(
        self,
        method: AggregateMethod,
        var: SmolStr,
    ) -> Result<AggregateQuery, Error> {
        if !self.selects(&var) {
            return Err(Error::VariableOutOfScope {
                variable: format!("${}", var),
            });
        }
        Ok(AggregateQuery {
            query: Box::new(self),
            method,
            var: Some(var),
        })
    }

    pub fn group(self, var: impl Into<SmolStr>) -> Result<GroupQuery, Error> {
        let var = var.into();
        if !self.selects(&var) {
            return Err(Error::VariableOutOfScope {
                variable: format!("${}", var),
            });
        }
        Ok(GroupQuery {
            query: Box::new(self),
            var,
        })
    }
}

// =============================================================================
// Aggregates and groups
// =============================================================================

/// Aggregate methods over a get query's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateMethod {
    Count,
    Max,
    Min,
    Mean,
    Median,
    Sum,
    Std,
}

impl fmt::Display for AggregateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Count => keywords::COUNT,
            Self::Max => keywords::MAX,
            Self::Min => keywords::MIN,
            Self::Mean => keywords::MEAN,
            Self::Median => keywords::MEDIAN,
            Self::Sum => keywords::SUM,
            Self::Std => keywords::STD,
        })
    }
}

/// `match ...; get ...; count;` and friends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    query: Box<GetQuery>,
    method: AggregateMethod,
    var: Option<SmolStr>,
}

impl AggregateQuery {
    pub fn get_query(&self) -> &GetQuery {
        &self.query
    }

    pub fn method(&self) -> AggregateMethod {
        self.method
    }

    pub fn var(&self) -> Option<&str> {
        self.var.as_deref()
    }
}

/// `match ...; get ...; group $x;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupQuery {
    query: Box<GetQuery>,
    var: SmolStr,
}

impl GroupQuery {
    pub fn get_query(&self) -> &GetQuery {
        &self.query
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn count(self) -> GroupAggregateQuery {
        GroupAggregateQuery {
            group: self,
            method: AggregateMethod::Count,
            var: None,
        }
    }

    pub fn max(self, var: impl Into<SmolStr>) -> Result<GroupAggregateQuery, Error> {
        self.aggregate(AggregateMethod::Max, var.into())
    }

    pub fn min(self, var: impl Into<SmolStr>) -> Result<GroupAggregateQuery, Error> {
        self.aggregate(AggregateMethod::Min, var.into())
    }

    pub fn mean(self, var: impl Into<SmolStr>) -> Result<GroupAggregateQuery, Error> {
        self.aggregate(AggregateMethod::Mean, var.into())
    }

    pub fn median(self, var: impl Into<SmolStr>) -> Result<GroupAggregateQuery, Error> {
        self.aggregate(AggregateMethod::Median, var.into())
    }

    pub fn sum(self, var: impl Into<SmolStr>) -> Result<GroupAggregateQuery, Error> {
        self.aggregate(AggregateMethod::Sum, var.into())
    }

    pub fn std(self, var: impl Into<SmolStr>) -> Result<GroupAggregateQuery, Error> {
        self.aggregate(AggregateMethod::Std, var.into())
    }

    pub(crate) fn aggregate(
        self,
        method: AggregateMethod,
        var: SmolStr,
    ) -> Result<GroupAggregateQuery, Error> {
        if !self.query.selects(&var) {
            return Err(Error::VariableOutOfScope {
                variable: format!("${}", var),
            });
        }
        Ok(GroupAggregateQuery {
            group: self,
            method,
            var: Some(var),
        })
    }
}

/// `match ...; get ...; group $x; count;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAggregateQuery {
    group: GroupQuery,
    method: AggregateMethod,
    var: Option<SmolStr>,
}

impl GroupAggregateQuery {
    pub fn group_query(&self) -> &GroupQuery {
        &self.group
    }

    pub fn method(&self) -> AggregateMethod {
        self.method
    }

    pub fn var(&self) -> Option<&str> {
        self.var.as_deref()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<DefineQuery> for Query {
    fn from(query: DefineQuery) -> Self {
        Self::Define(query)
    }
}

impl From<UndefineQuery> for Query {
    fn from(query: UndefineQuery) -> Self {
        Self::Undefine(query)
    }
}

impl From<InsertQuery> for Query {
    fn from(query: InsertQuery) -> Self {
        Self::Insert(query)
    }
}

impl From<DeleteQuery> for Query {
    fn from(query: DeleteQuery) -> Self {
        Self::Delete(query)
    }
}

impl From<GetQuery> for Query {
    fn from(query: GetQuery) -> Self {
        Self::Get(query)
    }
}

impl From<AggregateQuery> for Query {
    fn from(query: AggregateQuery) -> Self {
        Self::Aggregate(query)
    }
}

impl From<GroupQuery> for Query {
    fn from(query: GroupQuery) -> Self {
        Self::Group(query)
    }
}

impl From<GroupAggregateQuery> for Query {
    fn from(query: GroupAggregateQuery) -> Self {
        Self::GroupAggregate(query)
    }
}

impl From<ComputeQuery> for Query {
    fn from(query: ComputeQuery) -> Self {
        Self::Compute(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::statement::ThingStatement;
    use crate::syntax::variable::Reference;

    fn match_movies() -> MatchClause {
        MatchClause::new(vec![
            ThingStatement::new(Reference::concept("x"))
                .isa("movie")
                .has("title", Reference::concept("t"))
                .into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_filter_must_be_in_scope() {
        let err = match_movies().get(["y"]).unwrap_err();
        assert_eq!(
            err,
            Error::VariableOutOfScope {
                variable: "$y".to_owned()
            }
        );
    }

    #[test]
    fn test_filter_order_and_dedup() {
        let query = match_movies().get(["t", "x", "t"]).unwrap();
        let filter: Vec<_> = query.filter().iter().map(|s| s.as_str()).collect();
        assert_eq!(filter, ["t", "x"]);
    }

    #[test]
    fn test_sort_var_must_be_selected() {
        let query = match_movies().get(["x"]).unwrap();
        assert!(query.sort("t", None).is_err());

        let query = match_movies().get([] as [&str; 0]).unwrap();
        assert!(query.sort("t", Some(Order::Asc)).is_ok());
    }

    #[test]
    fn test_aggregate_var_scope() {
        let query = match_movies().get([] as [&str; 0]).unwrap();
        assert!(query.clone().max("t").is_ok());
        assert!(query.max("missing").is_err());
    }

    #[test]
    fn test_insert_rejects_schema_statements() {
        let statement: Statement = TypeStatement::new(Reference::label("person"))
            .sub("entity")
            .into();
        let err = InsertQuery::new(None, vec![statement]).unwrap_err();
        assert!(matches!(err, Error::InvalidStatementKind { .. }));
    }
}
