//! Constraints attached to statement head variables.
//!
//! The sums are split per statement family: schema statements carry
//! [`TypeConstraint`]s, data statements carry [`ThingConstraint`]s.
//! Value predicates form their own small algebra ([`ValueOperation`]).

use std::fmt;

use smol_str::SmolStr;

use crate::parser::keywords;
use crate::syntax::pattern::Pattern;
use crate::syntax::statement::{AttributeStatement, Statement};
use crate::syntax::value::{Value, ValueType};
use crate::syntax::variable::{Label, Reference};

/// A type reference in constraint position: a label (`movie`) or a
/// variable (`$t`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Label(Label),
    Variable(Reference),
}

impl TypeRef {
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Self::Label(label) => Some(label),
            Self::Variable(_) => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Reference> {
        match self {
            Self::Variable(var) => Some(var),
            Self::Label(_) => None,
        }
    }
}

impl From<&str> for TypeRef {
    fn from(label: &str) -> Self {
        Self::Label(Label::from(label))
    }
}

impl From<Label> for TypeRef {
    fn from(label: Label) -> Self {
        Self::Label(label)
    }
}

impl From<Reference> for TypeRef {
    fn from(var: Reference) -> Self {
        Self::Variable(var)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "{}", label),
            Self::Variable(var) => write!(f, "{}", var),
        }
    }
}

/// A constraint on a schema (type) statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeConstraint {
    /// `abstract`
    Abstract,
    /// `type movie` - binds a variable to a type by label
    Label(Label),
    /// `plays marriage:spouse`
    Plays(Label),
    /// `regex "..."`
    Regex(String),
    /// `relates spouse` / `relates spouse as partner`
    Relates {
        role: Label,
        overridden: Option<Label>,
    },
    /// `sub entity` / `sub! entity`
    Sub { type_ref: TypeRef, exact: bool },
    /// `value long`
    ValueType(ValueType),
    /// `has title` / `key email` - attribute ownership declarations
    Owns { attribute: Label, is_key: bool },
    /// `when { ... }` - a rule body
    When(Pattern),
    /// `then { ... }` - a rule conclusion
    Then(Box<Statement>),
}

impl TypeConstraint {
    /// The keyword this constraint is written with, used in diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Abstract => keywords::ABSTRACT,
            Self::Label(_) => keywords::TYPE,
            Self::Plays(_) => keywords::PLAYS,
            Self::Regex(_) => keywords::REGEX,
            Self::Relates { .. } => keywords::RELATES,
            Self::Sub { .. } => keywords::SUB,
            Self::ValueType(_) => keywords::VALUE,
            Self::Owns { is_key: false, .. } => keywords::HAS,
            Self::Owns { is_key: true, .. } => keywords::KEY,
            Self::When(_) => keywords::WHEN,
            Self::Then(_) => keywords::THEN,
        }
    }

    /// Whether a statement may carry at most one of this constraint.
    pub fn is_singleton(&self) -> bool {
        !matches!(self, Self::Plays(_) | Self::Relates { .. } | Self::Owns { .. })
    }
}

/// A constraint on a data (thing) statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThingConstraint {
    /// `isa movie` / `isa! movie`
    Isa { type_ref: TypeRef, exact: bool },
    /// `has title "x"` / `has title $t` / `key email $e`
    Has(Has),
    /// `id V123`
    Id(SmolStr),
    /// `!= $other`
    Neq(Reference),
}

impl ThingConstraint {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Isa { .. } => keywords::ISA,
            Self::Has(has) if has.is_key => keywords::KEY,
            Self::Has(_) => keywords::HAS,
            Self::Id(_) => keywords::ID,
            Self::Neq(_) => keywords::NEQ_VAR,
        }
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::Isa { .. } | Self::Id(_))
    }
}

/// Attribute ownership with a value or variable attribute side.
///
/// `has title "Spy"` expands the shorthand to an anonymous
/// [`AttributeStatement`] with a value assignment; `has title $t` records
/// the variable reference and leaves any later constraints on `$t` where
/// they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Has {
    pub attribute_type: Option<SmolStr>,
    pub attribute: HasAttribute,
    pub is_key: bool,
}

/// The attribute side of a [`Has`] constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HasAttribute {
    Variable(Reference),
    Statement(Box<AttributeStatement>),
}

/// A relation's role-player tuple: `(wife: $x, husband: $y)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationConstraint {
    role_players: Vec<RolePlayer>,
}

impl RelationConstraint {
    pub fn new(role_players: Vec<RolePlayer>) -> Self {
        Self { role_players }
    }

    pub fn role_players(&self) -> &[RolePlayer] {
        &self.role_players
    }

    pub(crate) fn push(&mut self, role_player: RolePlayer) {
        self.role_players.push(role_player);
    }
}

/// One role player; the role type is absent when the source leaves the
/// role to be resolved by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePlayer {
    pub role_type: Option<TypeRef>,
    pub player: Reference,
}

impl RolePlayer {
    pub fn new(role_type: Option<TypeRef>, player: Reference) -> Self {
        Self { role_type, player }
    }
}

/// A value predicate: a bare assignment (`$t "Spy"`) or a comparison
/// (`$t < "Juno"`, `$a contains "x"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueOperation {
    Assignment(Value),
    Comparison {
        comparator: Comparator,
        rhs: ComparisonRhs,
    },
}

impl ValueOperation {
    pub fn comparison(comparator: Comparator, rhs: impl Into<ComparisonRhs>) -> Self {
        Self::Comparison {
            comparator,
            rhs: rhs.into(),
        }
    }

    pub fn as_assignment(&self) -> Option<&Value> {
        match self {
            Self::Assignment(value) => Some(value),
            Self::Comparison { .. } => None,
        }
    }
}

impl From<Value> for ValueOperation {
    fn from(value: Value) -> Self {
        Self::Assignment(value)
    }
}

macro_rules! assignment_from {
    ($($ty:ty),+ $(,)?) => {
        $(impl From<$ty> for ValueOperation {
            fn from(value: $ty) -> Self {
                Self::Assignment(Value::from(value))
            }
        })+
    };
}

assignment_from!(i64, i32, f64, bool, &str, String, chrono::NaiveDate);

/// The right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonRhs {
    Value(Value),
    Variable(Reference),
}

impl From<Value> for ComparisonRhs {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Reference> for ComparisonRhs {
    fn from(var: Reference) -> Self {
        Self::Variable(var)
    }
}

macro_rules! rhs_from {
    ($($ty:ty),+ $(,)?) => {
        $(impl From<$ty> for ComparisonRhs {
            fn from(value: $ty) -> Self {
                Self::Value(Value::from(value))
            }
        })+
    };
}

rhs_from!(i64, i32, f64, bool, &str, String, chrono::NaiveDate);

/// Value comparators. `=` in source normalises to `==`, and `!==` is the
/// value inequality (variable inequality `!=` is a [`ThingConstraint`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Contains,
    Like,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eq => keywords::EQ,
            Self::Neq => keywords::NEQ,
            Self::Lt => keywords::LT,
            Self::Lte => keywords::LTE,
            Self::Gt => keywords::GT,
            Self::Gte => keywords::GTE,
            Self::Contains => keywords::CONTAINS,
            Self::Like => keywords::LIKE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_from_literals() {
        assert_eq!(
            ValueOperation::from("Spy"),
            ValueOperation::Assignment(Value::String("Spy".to_owned()))
        );
        assert_eq!(
            ValueOperation::from(42),
            ValueOperation::Assignment(Value::Long(42))
        );
    }

    #[test]
    fn test_comparator_display() {
        assert_eq!(Comparator::Neq.to_string(), "!==");
        assert_eq!(Comparator::Contains.to_string(), "contains");
    }

    #[test]
    fn test_type_ref_from_label_text() {
        let type_ref = TypeRef::from("marriage:spouse");
        assert_eq!(type_ref.as_label().unwrap().to_string(), "marriage:spouse");
    }
}
