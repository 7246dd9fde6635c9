//! Programmatic builders mirroring the AST.
//!
//! Hosts construct queries without going through text:
//!
//! ```
//! use typeql::{match_, var};
//!
//! let query = match_([var("x").isa("movie")])
//!     .unwrap()
//!     .get(["x"])
//!     .unwrap();
//! ```
//!
//! Builder steps that cross a validation boundary (finishing a match
//! into a query, concluding a rule) return `Result`; the values they
//! yield are indistinguishable from parsed ASTs.

use smol_str::SmolStr;

use crate::error::Error;
use crate::semantic;
use crate::syntax::compute::{ComputeBuilder, ComputeMethod};
use crate::syntax::constraint::{
    Comparator, ComparisonRhs, RelationConstraint, RolePlayer, TypeRef, ValueOperation,
};
use crate::syntax::pattern::{Conjunction, Pattern};
use crate::syntax::query::{DefineQuery, InsertQuery, MatchClause, UndefineQuery};
use crate::syntax::statement::{
    AttributeStatement, HasArg, RelationStatement, Statement, ThingStatement, TypeStatement,
};
use crate::syntax::value::ValueType;
use crate::syntax::variable::{Label, Reference};

// =============================================================================
// Roots
// =============================================================================

/// A named concept variable, ready to grow into a statement.
pub fn var(name: impl Into<SmolStr>) -> UnboundVariable {
    UnboundVariable {
        reference: Reference::Concept(name.into()),
    }
}

/// A named value variable (`?x`).
pub fn value_var(name: impl Into<SmolStr>) -> UnboundVariable {
    UnboundVariable {
        reference: Reference::Value(name.into()),
    }
}

/// A type statement headed by a label: `type_("person").sub("entity")`.
pub fn type_(label: impl Into<Label>) -> TypeStatement {
    TypeStatement::new(Reference::Label(label.into()))
}

/// A headless relation with its first role player:
/// `rel(("wife", "x")).rel(("husband", "y")).isa("marriage")`.
pub fn rel(player: impl Into<RolePlayer>) -> RelationStatement {
    RelationStatement::new(
        Reference::hidden(),
        RelationConstraint::new(vec![player.into()]),
    )
}

/// Begin a match: `match_([...])?.get([...])?`.
pub fn match_<I, T>(patterns: I) -> Result<MatchClause, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<Pattern>,
{
    MatchClause::new(patterns.into_iter().map(Into::into).collect())
}

/// An insert query with no match clause.
pub fn insert<I, T>(statements: I) -> Result<InsertQuery, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<Statement>,
{
    InsertQuery::new(None, statements.into_iter().map(Into::into).collect())
}

/// A define query over type statements (rules are validated here).
pub fn define<I, T>(statements: I) -> Result<DefineQuery, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<TypeStatement>,
{
    DefineQuery::new(statements.into_iter().map(Into::into).collect())
}

/// An undefine query over type statements.
pub fn undefine<I, T>(statements: I) -> Result<UndefineQuery, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<TypeStatement>,
{
    UndefineQuery::new(statements.into_iter().map(Into::into).collect())
}

/// A compute query builder for the given method.
pub fn compute(method: ComputeMethod) -> ComputeBuilder {
    ComputeBuilder::new(method)
}

// =============================================================================
// Pattern composition
// =============================================================================

/// Conjoin patterns; a single pattern is returned unwrapped.
pub fn and<I, T>(patterns: I) -> Result<Pattern, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<Pattern>,
{
    Pattern::and(patterns.into_iter().map(Into::into).collect())
}

/// Disjoin patterns; requires at least two branches.
pub fn or<I, T>(patterns: I) -> Result<Pattern, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<Pattern>,
{
    Pattern::or(patterns.into_iter().map(Into::into).collect())
}

/// Negate a pattern.
pub fn not(pattern: impl Into<Pattern>) -> Pattern {
    Pattern::not(pattern.into())
}

// =============================================================================
// Value predicates
// =============================================================================

fn comparison(comparator: Comparator, rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    ValueOperation::comparison(comparator, rhs)
}

pub fn eq(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Eq, rhs)
}

pub fn neq(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Neq, rhs)
}

pub fn lt(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Lt, rhs)
}

pub fn lte(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Lte, rhs)
}

pub fn gt(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Gt, rhs)
}

pub fn gte(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Gte, rhs)
}

pub fn contains(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Contains, rhs)
}

pub fn like(rhs: impl Into<ComparisonRhs>) -> ValueOperation {
    comparison(Comparator::Like, rhs)
}

// =============================================================================
// Rules
// =============================================================================

/// Begin a rule definition; `.when(...)` then `.then(...)` yields the
/// validated type statement.
pub fn rule(label: impl Into<Label>) -> RuleBuilder {
    RuleBuilder {
        label: label.into(),
    }
}

pub struct RuleBuilder {
    label: Label,
}

impl RuleBuilder {
    pub fn when(self, pattern: impl Into<Pattern>) -> RuleWhen {
        let when = match pattern.into() {
            conjunction @ Pattern::Conjunction(_) => conjunction,
            other => Pattern::Conjunction(Conjunction::new(vec![other])),
        };
        RuleWhen {
            label: self.label,
            when,
        }
    }
}

/// A rule with a body, waiting for its conclusion.
pub struct RuleWhen {
    label: Label,
    when: Pattern,
}

impl RuleWhen {
    pub fn then(self, statement: impl Into<Statement>) -> Result<TypeStatement, Error> {
        let statement = TypeStatement::new(Reference::Label(self.label))
            .sub("rule")
            .when(self.when)
            .then(statement);
        semantic::rule::validate_if_rule(&statement)?;
        Ok(statement)
    }
}

// =============================================================================
// Unbound variables
// =============================================================================

/// A variable reference with no constraints yet. Every method consumes
/// it and returns the statement family the first constraint implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundVariable {
    reference: Reference,
}

impl UnboundVariable {
    pub fn into_reference(self) -> Reference {
        self.reference
    }

    // -- data statements ------------------------------------------------------

    pub fn isa(self, type_ref: impl Into<TypeRef>) -> ThingStatement {
        ThingStatement::new(self.reference).isa(type_ref)
    }

    pub fn isa_exact(self, type_ref: impl Into<TypeRef>) -> ThingStatement {
        ThingStatement::new(self.reference).isa_exact(type_ref)
    }

    pub fn has(
        self,
        attribute_type: impl Into<SmolStr>,
        attribute: impl Into<HasArg>,
    ) -> ThingStatement {
        ThingStatement::new(self.reference).has(attribute_type, attribute)
    }

    pub fn has_variable(self, attribute: impl Into<Reference>) -> ThingStatement {
        ThingStatement::new(self.reference).has_variable(attribute.into())
    }

    pub fn key(
        self,
        attribute_type: impl Into<SmolStr>,
        attribute: impl Into<HasArg>,
    ) -> ThingStatement {
        ThingStatement::new(self.reference).key(attribute_type, attribute)
    }

    pub fn id(self, id: impl Into<SmolStr>) -> ThingStatement {
        ThingStatement::new(self.reference).id(id)
    }

    pub fn neq(self, other: impl Into<Reference>) -> ThingStatement {
        ThingStatement::new(self.reference).neq(other.into())
    }

    /// An attribute statement: `var("t").value("Spy")` or
    /// `var("t").value(lt("Juno"))`.
    pub fn value(self, operation: impl Into<ValueOperation>) -> AttributeStatement {
        AttributeStatement::new(self.reference, operation.into())
    }

    /// A relation statement headed by this variable.
    pub fn rel(self, player: impl Into<RolePlayer>) -> RelationStatement {
        RelationStatement::new(
            self.reference,
            RelationConstraint::new(vec![player.into()]),
        )
    }

    // -- schema statements ----------------------------------------------------

    pub fn sub(self, type_ref: impl Into<TypeRef>) -> TypeStatement {
        TypeStatement::new(self.reference).sub(type_ref)
    }

    pub fn sub_exact(self, type_ref: impl Into<TypeRef>) -> TypeStatement {
        TypeStatement::new(self.reference).sub_exact(type_ref)
    }

    pub fn type_(self, label: impl Into<Label>) -> TypeStatement {
        TypeStatement::new(self.reference).type_(label)
    }

    pub fn plays(self, role: impl Into<Label>) -> TypeStatement {
        TypeStatement::new(self.reference).plays(role)
    }

    pub fn relates(self, role: impl Into<Label>) -> TypeStatement {
        TypeStatement::new(self.reference).relates(role)
    }

    pub fn regex(self, pattern: impl Into<String>) -> TypeStatement {
        TypeStatement::new(self.reference).regex(pattern)
    }

    pub fn value_type(self, value_type: ValueType) -> TypeStatement {
        TypeStatement::new(self.reference).value(value_type)
    }

    pub fn abstract_(self) -> TypeStatement {
        TypeStatement::new(self.reference).abstract_()
    }
}

impl From<UnboundVariable> for Reference {
    fn from(var: UnboundVariable) -> Self {
        var.reference
    }
}

impl From<UnboundVariable> for TypeRef {
    fn from(var: UnboundVariable) -> Self {
        TypeRef::Variable(var.reference)
    }
}

impl From<UnboundVariable> for ComparisonRhs {
    fn from(var: UnboundVariable) -> Self {
        ComparisonRhs::Variable(var.reference)
    }
}

impl From<UnboundVariable> for HasArg {
    fn from(var: UnboundVariable) -> Self {
        HasArg::Variable(var.reference)
    }
}

// =============================================================================
// Role player sugar
// =============================================================================

impl From<&str> for RolePlayer {
    fn from(player: &str) -> Self {
        RolePlayer::new(None, Reference::concept(player))
    }
}

impl From<UnboundVariable> for RolePlayer {
    fn from(player: UnboundVariable) -> Self {
        RolePlayer::new(None, player.reference)
    }
}

impl From<(&str, &str)> for RolePlayer {
    fn from((role, player): (&str, &str)) -> Self {
        RolePlayer::new(Some(TypeRef::from(role)), Reference::concept(player))
    }
}

impl From<(&str, UnboundVariable)> for RolePlayer {
    fn from((role, player): (&str, UnboundVariable)) -> Self {
        RolePlayer::new(Some(TypeRef::from(role)), player.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::formatter::FormatOptions;
    use crate::syntax::query::Query;

    #[test]
    fn test_match_get_builder() {
        let query: Query = match_([var("x").isa("movie")])
            .unwrap()
            .get(["x"])
            .unwrap()
            .into();
        assert_eq!(
            query.to_typeql(&FormatOptions::compact()),
            "match $x isa movie; get $x;"
        );
    }

    #[test]
    fn test_relation_builder() {
        let statement = rel(("wife", "x")).rel(("husband", "y")).isa("marriage");
        assert_eq!(
            Statement::from(statement).to_string(),
            "(wife: $x, husband: $y) isa marriage"
        );
    }

    #[test]
    fn test_rule_builder_validates() {
        let err = rule("movies-are-good")
            .when(var("x").isa("movie"))
            .then(var("y").has("rating", 10))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRule { .. }));

        let statement = rule("movies-are-good")
            .when(var("x").isa("movie"))
            .then(var("x").has("rating", 10))
            .unwrap();
        assert!(statement.when_pattern().is_some());
        assert!(statement.then_statement().is_some());
    }

    #[test]
    fn test_value_predicates() {
        let statement = var("t").value(lt("Juno"));
        assert_eq!(Statement::from(statement).to_string(), "$t < \"Juno\"");
    }

    #[test]
    fn test_or_builder_requires_two() {
        let only: Vec<Pattern> = vec![var("x").isa("movie").into()];
        assert_eq!(or(only), Err(Error::EmptyDisjunction));
    }
}
