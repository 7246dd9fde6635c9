//! Rule well-formedness.
//!
//! A rule is a type statement carrying `when` and `then` constraints.
//! The conclusion must be a single `has`, or a relation with exactly one
//! `isa`; every named variable it mentions must be bound by the body.

use crate::error::{Error, RuleError};
use crate::syntax::constraint::{HasAttribute, ThingConstraint};
use crate::syntax::pattern::Pattern;
use crate::syntax::statement::{Statement, TypeStatement};
use crate::syntax::variable::Reference;

/// Validate the rule shape of a type statement, if it defines one.
///
/// Statements without `when`/`then` constraints pass unchanged.
pub fn validate_if_rule(statement: &TypeStatement) -> Result<(), Error> {
    let when = statement.when_pattern();
    let then = statement.then_statement();
    if when.is_none() && then.is_none() {
        return Ok(());
    }

    let label = statement.label_name();
    let reject = |reason: RuleError| Error::InvalidRule {
        label: label.clone(),
        reason,
    };

    let Some(Pattern::Conjunction(when)) = when else {
        return Err(reject(RuleError::MissingWhen));
    };
    if when.patterns().is_empty() {
        return Err(reject(RuleError::MissingWhen));
    }
    for pattern in when.patterns() {
        check_negations(pattern, false).map_err(&reject)?;
    }

    let then = then.ok_or_else(|| reject(RuleError::MissingThen))?;
    check_then_shape(then).map_err(&reject)?;

    let mut bound = rustc_hash::FxHashSet::default();
    for pattern in when.patterns() {
        pattern.collect_named(&mut bound);
    }
    for reference in then.named_references() {
        if !bound.contains(&reference) {
            return Err(reject(RuleError::ThenUnboundVariable(reference.to_string())));
        }
    }

    Ok(())
}

/// Rule bodies forbid negation-within-negation.
fn check_negations(pattern: &Pattern, inside_negation: bool) -> Result<(), RuleError> {
    match pattern {
        Pattern::Conjunction(conjunction) => conjunction
            .patterns()
            .iter()
            .try_for_each(|p| check_negations(p, inside_negation)),
        Pattern::Disjunction(disjunction) => disjunction
            .patterns()
            .iter()
            .try_for_each(|p| check_negations(p, inside_negation)),
        Pattern::Negation(negation) => {
            if inside_negation {
                Err(RuleError::NestedNegation)
            } else {
                check_negations(negation.pattern(), true)
            }
        }
        Pattern::Statement(_) => Ok(()),
    }
}

/// The conclusion must be exactly one `has`, or a relation with exactly
/// one `isa` and nothing else.
fn check_then_shape(then: &Statement) -> Result<(), RuleError> {
    match then {
        Statement::Thing(thing) => match thing.constraints() {
            [ThingConstraint::Has(has)] => {
                if has.attribute_type.is_some()
                    && matches!(has.attribute, HasAttribute::Variable(Reference::Concept(_)))
                {
                    Err(RuleError::ThenHasVariableShape)
                } else {
                    Ok(())
                }
            }
            _ => Err(RuleError::BadThenShape),
        },
        Statement::Relation(relation) => {
            if !matches!(relation.constraints(), [ThingConstraint::Isa { .. }]) {
                return Err(RuleError::BadThenShape);
            }
            if relation
                .relation()
                .role_players()
                .iter()
                .any(|role_player| role_player.role_type.is_none())
            {
                return Err(RuleError::ThenImplicitRole);
            }
            if relation.head().is_named() {
                return Err(RuleError::ThenNamedRelation);
            }
            Ok(())
        }
        _ => Err(RuleError::BadThenShape),
    }
}
