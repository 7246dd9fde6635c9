//! Patterns: the recursive composition layer over statements.

use rustc_hash::FxHashSet;

use crate::error::Error;
use crate::syntax::statement::{
    AttributeStatement, RelationStatement, Statement, ThingStatement, TypeStatement,
};
use crate::syntax::variable::Reference;

/// A pattern: a statement, or a boolean composition of patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Conjunction(Conjunction),
    Disjunction(Disjunction),
    Negation(Negation),
    Statement(Statement),
}

impl Pattern {
    /// Conjoin patterns. A single pattern is returned unwrapped; this is
    /// also the canonical shape for braced groups, so parsed and built
    /// patterns agree.
    pub fn and(patterns: Vec<Pattern>) -> Result<Pattern, Error> {
        match patterns.len() {
            0 => Err(Error::EmptyMatch),
            1 => Ok(patterns.into_iter().next().expect("len checked")),
            _ => Ok(Pattern::Conjunction(Conjunction::new(patterns))),
        }
    }

    /// Disjoin patterns; at least two branches are required.
    pub fn or(patterns: Vec<Pattern>) -> Result<Pattern, Error> {
        if patterns.len() < 2 {
            return Err(Error::EmptyDisjunction);
        }
        Ok(Pattern::Disjunction(Disjunction::new(patterns)))
    }

    pub fn not(pattern: Pattern) -> Pattern {
        Pattern::Negation(Negation::new(pattern))
    }

    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Self::Statement(statement) => Some(statement),
            _ => None,
        }
    }

    pub fn is_negation(&self) -> bool {
        matches!(self, Self::Negation(_))
    }

    /// Validate every statement reachable from this pattern.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Self::Conjunction(conjunction) => {
                conjunction.patterns.iter().try_for_each(Pattern::validate)
            }
            Self::Disjunction(disjunction) => {
                if disjunction.patterns.len() < 2 {
                    return Err(Error::EmptyDisjunction);
                }
                disjunction.patterns.iter().try_for_each(Pattern::validate)
            }
            Self::Negation(negation) => negation.pattern.validate(),
            Self::Statement(statement) => statement.validate(),
        }
    }

    pub(crate) fn collect_named(&self, out: &mut FxHashSet<Reference>) {
        match self {
            Self::Conjunction(conjunction) => {
                for pattern in &conjunction.patterns {
                    pattern.collect_named(out);
                }
            }
            Self::Disjunction(disjunction) => {
                for pattern in &disjunction.patterns {
                    pattern.collect_named(out);
                }
            }
            Self::Negation(negation) => negation.pattern.collect_named(out),
            Self::Statement(statement) => statement.collect_named(out),
        }
    }

    /// The named variables of the pattern, including nested branches.
    pub fn named_references(&self) -> FxHashSet<Reference> {
        let mut out = FxHashSet::default();
        self.collect_named(&mut out);
        out
    }
}

/// A conjunction of one or more patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjunction {
    patterns: Vec<Pattern>,
}

impl Conjunction {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// A disjunction of two or more branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disjunction {
    patterns: Vec<Pattern>,
}

impl Disjunction {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

/// A negated pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negation {
    pattern: Box<Pattern>,
}

impl Negation {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern: Box::new(pattern),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl From<Statement> for Pattern {
    fn from(statement: Statement) -> Self {
        Self::Statement(statement)
    }
}

impl From<TypeStatement> for Pattern {
    fn from(statement: TypeStatement) -> Self {
        Self::Statement(statement.into())
    }
}

impl From<ThingStatement> for Pattern {
    fn from(statement: ThingStatement) -> Self {
        Self::Statement(statement.into())
    }
}

impl From<RelationStatement> for Pattern {
    fn from(statement: RelationStatement) -> Self {
        Self::Statement(statement.into())
    }
}

impl From<AttributeStatement> for Pattern {
    fn from(statement: AttributeStatement) -> Self {
        Self::Statement(statement.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::statement::ThingStatement;
    use crate::syntax::variable::Reference;

    fn statement(name: &str) -> Pattern {
        ThingStatement::new(Reference::concept(name))
            .isa("movie")
            .into()
    }

    #[test]
    fn test_and_unwraps_single_pattern() {
        let pattern = Pattern::and(vec![statement("x")]).unwrap();
        assert!(matches!(pattern, Pattern::Statement(_)));
    }

    #[test]
    fn test_and_of_none_is_an_error() {
        assert_eq!(Pattern::and(vec![]), Err(Error::EmptyMatch));
    }

    #[test]
    fn test_or_requires_two_branches() {
        assert_eq!(
            Pattern::or(vec![statement("x")]),
            Err(Error::EmptyDisjunction)
        );
        let pattern = Pattern::or(vec![statement("x"), statement("y")]).unwrap();
        assert!(matches!(pattern, Pattern::Disjunction(_)));
    }

    #[test]
    fn test_named_references_cross_branches() {
        let pattern = Pattern::or(vec![statement("x"), statement("y")]).unwrap();
        let names = pattern.named_references();
        assert!(names.contains(&Reference::concept("x")));
        assert!(names.contains(&Reference::concept("y")));
    }
}
