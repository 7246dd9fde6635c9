//! Statements: a head variable bound to an ordered, deduplicated
//! collection of constraints.
//!
//! Chaining methods accumulate constraints and silently drop exact
//! duplicates; the singleton invariants (at most one `isa`, one `sub`,
//! one `value`, one `regex`, one `id`) are enforced by [`validate`]
//! (Statement::validate) at every query-assembly boundary, so parsed and
//! built statements pass through the same checks.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::error::Error;
use crate::parser::keywords;
use crate::syntax::constraint::{
    Has, HasAttribute, RelationConstraint, RolePlayer, ThingConstraint, TypeConstraint, TypeRef,
    ValueOperation,
};
use crate::syntax::pattern::Pattern;
use crate::syntax::value::ValueType;
use crate::syntax::variable::{Label, Reference};

/// A statement of any family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Type(TypeStatement),
    Thing(ThingStatement),
    Relation(RelationStatement),
    Attribute(AttributeStatement),
}

impl Statement {
    pub fn head(&self) -> &Reference {
        match self {
            Self::Type(s) => &s.head,
            Self::Thing(s) => &s.head,
            Self::Relation(s) => &s.head,
            Self::Attribute(s) => &s.head,
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Type(_) => "type statement",
            Self::Thing(_) => "thing statement",
            Self::Relation(_) => "relation statement",
            Self::Attribute(_) => "attribute statement",
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Self::Type(_))
    }

    pub fn is_instance(&self) -> bool {
        !self.is_type()
    }

    pub fn as_type(&self) -> Result<&TypeStatement, Error> {
        match self {
            Self::Type(s) => Ok(s),
            other => Err(Error::invalid_casting(other.variant_name(), "type statement")),
        }
    }

    pub fn into_type(self) -> Result<TypeStatement, Error> {
        match self {
            Self::Type(s) => Ok(s),
            other => Err(Error::invalid_casting(other.variant_name(), "type statement")),
        }
    }

    pub fn as_thing(&self) -> Result<&ThingStatement, Error> {
        match self {
            Self::Thing(s) => Ok(s),
            other => Err(Error::invalid_casting(other.variant_name(), "thing statement")),
        }
    }

    pub fn as_relation(&self) -> Result<&RelationStatement, Error> {
        match self {
            Self::Relation(s) => Ok(s),
            other => Err(Error::invalid_casting(
                other.variant_name(),
                "relation statement",
            )),
        }
    }

    pub fn as_attribute(&self) -> Result<&AttributeStatement, Error> {
        match self {
            Self::Attribute(s) => Ok(s),
            other => Err(Error::invalid_casting(
                other.variant_name(),
                "attribute statement",
            )),
        }
    }

    /// Check the singleton-constraint invariants.
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Self::Type(s) => s.validate(),
            Self::Thing(s) => validate_thing_constraints(&s.head, &s.constraints),
            Self::Relation(s) => validate_thing_constraints(&s.head, &s.constraints),
            Self::Attribute(s) => validate_thing_constraints(&s.head, &s.constraints),
        }
    }

    /// Collect every named variable reference in the statement, including
    /// those nested in rule bodies and attribute shorthands.
    pub(crate) fn collect_named(&self, out: &mut FxHashSet<Reference>) {
        if self.head().is_named() {
            out.insert(self.head().clone());
        }
        match self {
            Self::Type(s) => {
                for constraint in &s.constraints {
                    match constraint {
                        TypeConstraint::Sub { type_ref, .. } => collect_type_ref(type_ref, out),
                        TypeConstraint::When(pattern) => pattern.collect_named(out),
                        TypeConstraint::Then(statement) => statement.collect_named(out),
                        _ => {}
                    }
                }
            }
            Self::Thing(s) => collect_thing_constraints(&s.constraints, out),
            Self::Relation(s) => {
                for role_player in s.relation.role_players() {
                    if let Some(role) = &role_player.role_type {
                        collect_type_ref(role, out);
                    }
                    if role_player.player.is_named() {
                        out.insert(role_player.player.clone());
                    }
                }
                collect_thing_constraints(&s.constraints, out);
            }
            Self::Attribute(s) => {
                collect_value_operation(&s.value, out);
                collect_thing_constraints(&s.constraints, out);
            }
        }
    }

    /// The named variables of this statement, in no particular order.
    pub fn named_references(&self) -> FxHashSet<Reference> {
        let mut out = FxHashSet::default();
        self.collect_named(&mut out);
        out
    }
}

fn collect_type_ref(type_ref: &TypeRef, out: &mut FxHashSet<Reference>) {
    if let TypeRef::Variable(var) = type_ref {
        if var.is_named() {
            out.insert(var.clone());
        }
    }
}

fn collect_value_operation(operation: &ValueOperation, out: &mut FxHashSet<Reference>) {
    if let ValueOperation::Comparison {
        rhs: crate::syntax::constraint::ComparisonRhs::Variable(var),
        ..
    } = operation
    {
        if var.is_named() {
            out.insert(var.clone());
        }
    }
}

fn collect_thing_constraints(constraints: &[ThingConstraint], out: &mut FxHashSet<Reference>) {
    for constraint in constraints {
        match constraint {
            ThingConstraint::Isa { type_ref, .. } => collect_type_ref(type_ref, out),
            ThingConstraint::Has(has) => match &has.attribute {
                HasAttribute::Variable(var) => {
                    if var.is_named() {
                        out.insert(var.clone());
                    }
                }
                HasAttribute::Statement(statement) => {
                    collect_value_operation(&statement.value, out);
                    collect_thing_constraints(&statement.constraints, out);
                }
            },
            ThingConstraint::Neq(var) => {
                if var.is_named() {
                    out.insert(var.clone());
                }
            }
            ThingConstraint::Id(_) => {}
        }
    }
}

fn validate_thing_constraints(
    head: &Reference,
    constraints: &[ThingConstraint],
) -> Result<(), Error> {
    for singleton in [keywords::ISA, keywords::ID] {
        let count = constraints
            .iter()
            .filter(|c| c.is_singleton() && c.keyword() == singleton)
            .count();
        if count > 1 {
            return Err(Error::RepeatedConstraint {
                head: head.to_string(),
                constraint: singleton,
            });
        }
    }
    Ok(())
}

fn push_deduped<T: PartialEq>(constraints: &mut Vec<T>, constraint: T) {
    if !constraints.contains(&constraint) {
        constraints.push(constraint);
    }
}

// =============================================================================
// Type statements
// =============================================================================

/// A schema statement: `person sub entity, has name;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeStatement {
    head: Reference,
    constraints: Vec<TypeConstraint>,
}

impl TypeStatement {
    pub fn new(head: Reference) -> Self {
        Self {
            head,
            constraints: Vec::new(),
        }
    }

    pub fn head(&self) -> &Reference {
        &self.head
    }

    pub fn constraints(&self) -> &[TypeConstraint] {
        &self.constraints
    }

    pub fn constrain(mut self, constraint: TypeConstraint) -> Self {
        push_deduped(&mut self.constraints, constraint);
        self
    }

    pub fn sub(self, type_ref: impl Into<TypeRef>) -> Self {
        self.constrain(TypeConstraint::Sub {
            type_ref: type_ref.into(),
            exact: false,
        })
    }

    pub fn sub_exact(self, type_ref: impl Into<TypeRef>) -> Self {
        self.constrain(TypeConstraint::Sub {
            type_ref: type_ref.into(),
            exact: true,
        })
    }

    pub fn abstract_(self) -> Self {
        self.constrain(TypeConstraint::Abstract)
    }

    pub fn type_(self, label: impl Into<Label>) -> Self {
        self.constrain(TypeConstraint::Label(label.into()))
    }

    pub fn plays(self, role: impl Into<Label>) -> Self {
        self.constrain(TypeConstraint::Plays(role.into()))
    }

    pub fn relates(self, role: impl Into<Label>) -> Self {
        self.constrain(TypeConstraint::Relates {
            role: role.into(),
            overridden: None,
        })
    }

    pub fn relates_as(self, role: impl Into<Label>, overridden: impl Into<Label>) -> Self {
        self.constrain(TypeConstraint::Relates {
            role: role.into(),
            overridden: Some(overridden.into()),
        })
    }

    pub fn regex(self, pattern: impl Into<String>) -> Self {
        self.constrain(TypeConstraint::Regex(pattern.into()))
    }

    pub fn value(self, value_type: ValueType) -> Self {
        self.constrain(TypeConstraint::ValueType(value_type))
    }

    /// Declare attribute ownership: `has name`.
    pub fn has(self, attribute: impl Into<Label>) -> Self {
        self.constrain(TypeConstraint::Owns {
            attribute: attribute.into(),
            is_key: false,
        })
    }

    /// Declare key attribute ownership: `key email`.
    pub fn key(self, attribute: impl Into<Label>) -> Self {
        self.constrain(TypeConstraint::Owns {
            attribute: attribute.into(),
            is_key: true,
        })
    }

    pub fn when(self, pattern: Pattern) -> Self {
        self.constrain(TypeConstraint::When(pattern))
    }

    pub fn then(self, statement: impl Into<Statement>) -> Self {
        self.constrain(TypeConstraint::Then(Box::new(statement.into())))
    }

    /// Find the rule body, if this statement defines one.
    pub fn when_pattern(&self) -> Option<&Pattern> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::When(pattern) => Some(pattern),
            _ => None,
        })
    }

    /// Find the rule conclusion, if this statement defines one.
    pub fn then_statement(&self) -> Option<&Statement> {
        self.constraints.iter().find_map(|c| match c {
            TypeConstraint::Then(statement) => Some(statement.as_ref()),
            _ => None,
        })
    }

    /// The label this statement is about, for diagnostics.
    pub fn label_name(&self) -> String {
        match &self.head {
            Reference::Label(label) => label.to_string(),
            other => other.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        let singletons = self
            .constraints
            .iter()
            .filter(|c| c.is_singleton())
            .map(|c| c.keyword());
        let mut seen: Vec<&'static str> = Vec::new();
        for keyword in singletons {
            if seen.contains(&keyword) {
                return Err(Error::RepeatedConstraint {
                    head: self.head.to_string(),
                    constraint: keyword,
                });
            }
            seen.push(keyword);
        }
        Ok(())
    }
}

impl From<TypeStatement> for Statement {
    fn from(statement: TypeStatement) -> Self {
        Self::Type(statement)
    }
}

// =============================================================================
// Thing statements
// =============================================================================

/// A data statement about a concept: `$x isa movie, has title $t;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThingStatement {
    head: Reference,
    constraints: Vec<ThingConstraint>,
}

impl ThingStatement {
    pub fn new(head: Reference) -> Self {
        Self {
            head,
            constraints: Vec::new(),
        }
    }

    pub fn head(&self) -> &Reference {
        &self.head
    }

    pub fn constraints(&self) -> &[ThingConstraint] {
        &self.constraints
    }

    pub fn constrain(mut self, constraint: ThingConstraint) -> Self {
        push_deduped(&mut self.constraints, constraint);
        self
    }

    pub fn isa(self, type_ref: impl Into<TypeRef>) -> Self {
        self.constrain(ThingConstraint::Isa {
            type_ref: type_ref.into(),
            exact: false,
        })
    }

    pub fn isa_exact(self, type_ref: impl Into<TypeRef>) -> Self {
        self.constrain(ThingConstraint::Isa {
            type_ref: type_ref.into(),
            exact: true,
        })
    }

    pub fn has(self, attribute_type: impl Into<SmolStr>, attribute: impl Into<HasArg>) -> Self {
        self.constrain(has_constraint(Some(attribute_type.into()), attribute, false))
    }

    pub fn has_variable(self, attribute: Reference) -> Self {
        self.constrain(has_constraint(None, attribute, false))
    }

    pub fn key(self, attribute_type: impl Into<SmolStr>, attribute: impl Into<HasArg>) -> Self {
        self.constrain(has_constraint(Some(attribute_type.into()), attribute, true))
    }

    pub fn id(self, id: impl Into<SmolStr>) -> Self {
        self.constrain(ThingConstraint::Id(id.into()))
    }

    pub fn neq(self, other: Reference) -> Self {
        self.constrain(ThingConstraint::Neq(other))
    }

    /// The `isa` constraint, if present.
    pub fn isa_constraint(&self) -> Option<(&TypeRef, bool)> {
        self.constraints.iter().find_map(|c| match c {
            ThingConstraint::Isa { type_ref, exact } => Some((type_ref, *exact)),
            _ => None,
        })
    }
}

impl From<ThingStatement> for Statement {
    fn from(statement: ThingStatement) -> Self {
        Self::Thing(statement)
    }
}

// =============================================================================
// Relation statements
// =============================================================================

/// A relation statement: `$m (wife: $x, husband: $y) isa marriage;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationStatement {
    head: Reference,
    relation: RelationConstraint,
    constraints: Vec<ThingConstraint>,
}

impl RelationStatement {
    pub fn new(head: Reference, relation: RelationConstraint) -> Self {
        Self {
            head,
            relation,
            constraints: Vec::new(),
        }
    }

    pub fn head(&self) -> &Reference {
        &self.head
    }

    pub fn relation(&self) -> &RelationConstraint {
        &self.relation
    }

    pub fn constraints(&self) -> &[ThingConstraint] {
        &self.constraints
    }

    pub fn constrain(mut self, constraint: ThingConstraint) -> Self {
        push_deduped(&mut self.constraints, constraint);
        self
    }

    /// Add another role player to the tuple.
    pub fn rel(mut self, role_player: impl Into<RolePlayer>) -> Self {
        self.relation.push(role_player.into());
        self
    }

    pub fn isa(self, type_ref: impl Into<TypeRef>) -> Self {
        self.constrain(ThingConstraint::Isa {
            type_ref: type_ref.into(),
            exact: false,
        })
    }

    pub fn isa_exact(self, type_ref: impl Into<TypeRef>) -> Self {
        self.constrain(ThingConstraint::Isa {
            type_ref: type_ref.into(),
            exact: true,
        })
    }

    pub fn has(self, attribute_type: impl Into<SmolStr>, attribute: impl Into<HasArg>) -> Self {
        self.constrain(has_constraint(Some(attribute_type.into()), attribute, false))
    }

    pub fn isa_constraint(&self) -> Option<(&TypeRef, bool)> {
        self.constraints.iter().find_map(|c| match c {
            ThingConstraint::Isa { type_ref, exact } => Some((type_ref, *exact)),
            _ => None,
        })
    }
}

impl From<RelationStatement> for Statement {
    fn from(statement: RelationStatement) -> Self {
        Self::Relation(statement)
    }
}

// =============================================================================
// Attribute statements
// =============================================================================

/// An attribute statement headed by a value operation:
/// `$t "Apocalypse Now";` or `$t < "Juno";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeStatement {
    pub(crate) head: Reference,
    pub(crate) value: ValueOperation,
    pub(crate) constraints: Vec<ThingConstraint>,
}

impl AttributeStatement {
    pub fn new(head: Reference, value: ValueOperation) -> Self {
        Self {
            head,
            value,
            constraints: Vec::new(),
        }
    }

    pub fn head(&self) -> &Reference {
        &self.head
    }

    pub fn operation(&self) -> &ValueOperation {
        &self.value
    }

    pub fn constraints(&self) -> &[ThingConstraint] {
        &self.constraints
    }

    pub fn constrain(mut self, constraint: ThingConstraint) -> Self {
        push_deduped(&mut self.constraints, constraint);
        self
    }

    pub fn isa(self, type_ref: impl Into<TypeRef>) -> Self {
        self.constrain(ThingConstraint::Isa {
            type_ref: type_ref.into(),
            exact: false,
        })
    }

    pub fn has(self, attribute_type: impl Into<SmolStr>, attribute: impl Into<HasArg>) -> Self {
        self.constrain(has_constraint(Some(attribute_type.into()), attribute, false))
    }
}

impl From<AttributeStatement> for Statement {
    fn from(statement: AttributeStatement) -> Self {
        Self::Attribute(statement)
    }
}

// =============================================================================
// Has argument sugar
// =============================================================================

/// What the attribute side of a `has` can be built from: a value (or a
/// whole value operation), or a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HasArg {
    Operation(ValueOperation),
    Variable(Reference),
}

impl From<ValueOperation> for HasArg {
    fn from(operation: ValueOperation) -> Self {
        Self::Operation(operation)
    }
}

impl From<Reference> for HasArg {
    fn from(var: Reference) -> Self {
        Self::Variable(var)
    }
}

macro_rules! has_arg_from {
    ($($ty:ty),+ $(,)?) => {
        $(impl From<$ty> for HasArg {
            fn from(value: $ty) -> Self {
                Self::Operation(ValueOperation::from(value))
            }
        })+
    };
}

has_arg_from!(i64, i32, f64, bool, &str, String, chrono::NaiveDate);

fn has_constraint(
    attribute_type: Option<SmolStr>,
    attribute: impl Into<HasArg>,
    is_key: bool,
) -> ThingConstraint {
    let attribute = match attribute.into() {
        HasArg::Operation(operation) => HasAttribute::Statement(Box::new(
            AttributeStatement::new(Reference::hidden(), operation),
        )),
        HasArg::Variable(var) => HasAttribute::Variable(var),
    };
    ThingConstraint::Has(Has {
        attribute_type,
        attribute,
        is_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::value::Value;

    #[test]
    fn test_constraints_are_deduplicated() {
        let statement = ThingStatement::new(Reference::concept("x"))
            .isa("movie")
            .isa("movie");
        assert_eq!(statement.constraints().len(), 1);
    }

    #[test]
    fn test_repeated_isa_is_invalid() {
        let statement: Statement = ThingStatement::new(Reference::concept("x"))
            .isa("movie")
            .isa("person")
            .into();
        assert_eq!(
            statement.validate(),
            Err(Error::RepeatedConstraint {
                head: "$x".to_owned(),
                constraint: "isa",
            })
        );
    }

    #[test]
    fn test_has_shorthand_expands_to_attribute_statement() {
        let statement = ThingStatement::new(Reference::concept("x")).has("title", "Spy");
        match &statement.constraints()[0] {
            ThingConstraint::Has(has) => {
                assert_eq!(has.attribute_type.as_deref(), Some("title"));
                match &has.attribute {
                    HasAttribute::Statement(attr) => {
                        assert_eq!(
                            attr.operation().as_assignment(),
                            Some(&Value::String("Spy".to_owned()))
                        );
                        assert!(!attr.head().is_visible());
                    }
                    other => panic!("expected attribute statement, got {:?}", other),
                }
            }
            other => panic!("expected has constraint, got {:?}", other),
        }
    }

    #[test]
    fn test_named_references_include_nested() {
        let statement: Statement = ThingStatement::new(Reference::concept("x"))
            .has("title", Reference::concept("t"))
            .neq(Reference::concept("y"))
            .into();
        let names = statement.named_references();
        assert!(names.contains(&Reference::concept("x")));
        assert!(names.contains(&Reference::concept("t")));
        assert!(names.contains(&Reference::concept("y")));
    }
}
