//! Lowering of patterns, statements, constraints, and literal values.

use chrono::{NaiveDate, NaiveDateTime};
use smol_str::SmolStr;

use crate::error::Error;
use crate::syntax::constraint::{
    Comparator, ComparisonRhs, Has, HasAttribute, RelationConstraint, RolePlayer, ThingConstraint,
    TypeConstraint, TypeRef, ValueOperation,
};
use crate::syntax::pattern::{Conjunction, Pattern};
use crate::syntax::statement::{
    AttributeStatement, RelationStatement, Statement, ThingStatement, TypeStatement,
};
use crate::syntax::value::{Value, ValueType};
use crate::syntax::variable::{Label, Reference};

use super::super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};
use super::{child_node, child_nodes, token_of, tokens, var_name};

/// Which statement family a clause expects by default.
///
/// Only the bare `has name` shape depends on it: a schema statement
/// declares ownership, a data statement matches an attribute of that
/// type with an invisible attribute variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementContext {
    Schema,
    Data,
}

// =============================================================================
// Patterns
// =============================================================================

pub(crate) fn lower_pattern(node: &SyntaxNode) -> Result<Pattern, Error> {
    match node.kind() {
        SyntaxKind::CONJUNCTION => lower_branch(node),
        SyntaxKind::DISJUNCTION => {
            let mut branches = Vec::new();
            for child in child_nodes(node, SyntaxKind::CONJUNCTION) {
                branches.push(lower_branch(&child)?);
            }
            Pattern::or(branches)
        }
        SyntaxKind::NEGATION => {
            let inner = child_node(node, SyntaxKind::CONJUNCTION).ok_or(Error::EmptyMatch)?;
            Ok(Pattern::not(lower_branch(&inner)?))
        }
        SyntaxKind::STATEMENT => Ok(Pattern::Statement(lower_statement(
            node,
            StatementContext::Data,
        )?)),
        _ => Err(Error::EmptyMatch),
    }
}

/// A braced group: one pattern stays bare, several become a conjunction.
fn lower_branch(conjunction: &SyntaxNode) -> Result<Pattern, Error> {
    let mut patterns = Vec::new();
    for child in conjunction.children() {
        patterns.push(lower_pattern(&child)?);
    }
    Pattern::and(patterns)
}

/// A rule body keeps its conjunction wrapper even around one pattern.
fn lower_rule_body(conjunction: &SyntaxNode) -> Result<Pattern, Error> {
    let mut patterns = Vec::new();
    for child in conjunction.children() {
        patterns.push(lower_pattern(&child)?);
    }
    Ok(Pattern::Conjunction(Conjunction::new(patterns)))
}

// =============================================================================
// Statements
// =============================================================================

enum LoweredConstraint {
    Type(TypeConstraint),
    Thing(ThingConstraint),
    /// `has name` / `key email` with no value side; resolved by family.
    BareHas { attribute: Label, is_key: bool },
}

pub(crate) fn lower_statement(
    node: &SyntaxNode,
    context: StatementContext,
) -> Result<Statement, Error> {
    let head = lower_head(node);
    let relation = match child_node(node, SyntaxKind::RELATION) {
        Some(relation) => Some(lower_relation(&relation)?),
        None => None,
    };
    let value = match child_node(node, SyntaxKind::VALUE_OPERATION) {
        Some(operation) => Some(lower_value_operation(&operation)?),
        None => None,
    };

    let mut constraints = Vec::new();
    for child in node.children() {
        if let Some(constraint) = lower_constraint(&child)? {
            constraints.push(constraint);
        }
    }

    let is_schema = context == StatementContext::Schema
        || matches!(head, Reference::Label(_))
        || constraints
            .iter()
            .any(|constraint| matches!(constraint, LoweredConstraint::Type(_)));

    if is_schema {
        let mixed = relation.is_some()
            || value.is_some()
            || constraints
                .iter()
                .any(|constraint| matches!(constraint, LoweredConstraint::Thing(_)));
        if mixed {
            return Err(Error::InvalidStatementKind {
                statement: head.to_string(),
                context: "both a schema and a data",
            });
        }
        let mut statement = TypeStatement::new(head);
        for constraint in constraints {
            statement = match constraint {
                LoweredConstraint::Type(constraint) => statement.constrain(constraint),
                LoweredConstraint::BareHas { attribute, is_key } => {
                    statement.constrain(TypeConstraint::Owns { attribute, is_key })
                }
                LoweredConstraint::Thing(_) => unreachable!("mixed families checked above"),
            };
        }
        return Ok(Statement::Type(statement));
    }

    let thing_constraints: Vec<ThingConstraint> = constraints
        .into_iter()
        .map(|constraint| match constraint {
            LoweredConstraint::Thing(constraint) => constraint,
            LoweredConstraint::BareHas { attribute, is_key } => ThingConstraint::Has(Has {
                attribute_type: Some(attribute.name),
                attribute: HasAttribute::Variable(Reference::hidden()),
                is_key,
            }),
            LoweredConstraint::Type(_) => unreachable!("family decided above"),
        })
        .collect();

    if let Some(relation) = relation {
        let mut statement = RelationStatement::new(head, relation);
        for constraint in thing_constraints {
            statement = statement.constrain(constraint);
        }
        Ok(Statement::Relation(statement))
    } else if let Some(value) = value {
        let mut statement = AttributeStatement::new(head, value);
        for constraint in thing_constraints {
            statement = statement.constrain(constraint);
        }
        Ok(Statement::Attribute(statement))
    } else {
        let mut statement = ThingStatement::new(head);
        for constraint in thing_constraints {
            statement = statement.constrain(constraint);
        }
        Ok(Statement::Thing(statement))
    }
}

/// The statement head: an explicit variable or label, or a fresh hidden
/// anonymous head when the source omits one (headless relations).
fn lower_head(node: &SyntaxNode) -> Reference {
    for element in node.children_with_tokens() {
        match element {
            rowan::NodeOrToken::Token(token) => match token.kind() {
                SyntaxKind::VAR => return Reference::Concept(var_name(&token)),
                SyntaxKind::VAR_ANON => return Reference::anonymous(),
                SyntaxKind::VALUE_VAR => return Reference::Value(var_name(&token)),
                kind if kind.is_trivia() => continue,
                _ => break,
            },
            rowan::NodeOrToken::Node(child) => {
                if child.kind() == SyntaxKind::LABEL_REF {
                    return Reference::Label(lower_label(&child));
                }
                break;
            }
        }
    }
    Reference::hidden()
}

pub(crate) fn lower_label(node: &SyntaxNode) -> Label {
    let segments: Vec<SmolStr> = tokens(node)
        .filter(|token| token.kind() != SyntaxKind::COLON)
        .map(|token| SmolStr::from(token.text()))
        .collect();
    match segments.as_slice() {
        [scope, name] => Label::scoped(scope.clone(), name.clone()),
        [name] => Label::new(name.clone()),
        _ => Label::new(""),
    }
}

fn lower_type_ref(node: &SyntaxNode) -> TypeRef {
    if let Some(label) = child_node(node, SyntaxKind::LABEL_REF) {
        return TypeRef::Label(lower_label(&label));
    }
    match token_of(node, &[SyntaxKind::VAR]) {
        Some(token) => TypeRef::Variable(Reference::Concept(var_name(&token))),
        None => TypeRef::Label(Label::new("")),
    }
}

// =============================================================================
// Constraints
// =============================================================================

fn lower_constraint(node: &SyntaxNode) -> Result<Option<LoweredConstraint>, Error> {
    let constraint = match node.kind() {
        SyntaxKind::CONSTRAINT_ISA => {
            let exact = token_of(node, &[SyntaxKind::ISA_EXACT_KW]).is_some();
            let type_ref = child_node(node, SyntaxKind::TYPE_REF)
                .map(|child| lower_type_ref(&child))
                .ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Thing(ThingConstraint::Isa { type_ref, exact })
        }
        SyntaxKind::CONSTRAINT_SUB => {
            let exact = token_of(node, &[SyntaxKind::SUB_EXACT_KW]).is_some();
            let type_ref = child_node(node, SyntaxKind::TYPE_REF)
                .map(|child| lower_type_ref(&child))
                .ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Type(TypeConstraint::Sub { type_ref, exact })
        }
        SyntaxKind::CONSTRAINT_HAS => return lower_has(node).map(Some),
        SyntaxKind::CONSTRAINT_PLAYS => {
            let label = child_node(node, SyntaxKind::LABEL_REF)
                .map(|child| lower_label(&child))
                .ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Type(TypeConstraint::Plays(label))
        }
        SyntaxKind::CONSTRAINT_RELATES => {
            let labels = child_nodes(node, SyntaxKind::LABEL_REF);
            let role = labels.first().map(lower_label).ok_or(Error::EmptyMatch)?;
            let overridden = labels.get(1).map(lower_label);
            LoweredConstraint::Type(TypeConstraint::Relates { role, overridden })
        }
        SyntaxKind::CONSTRAINT_REGEX => {
            let token = token_of(node, &[SyntaxKind::STRING]).ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Type(TypeConstraint::Regex(unescape(token.text())))
        }
        SyntaxKind::CONSTRAINT_VALUE_TYPE => {
            let token = tokens(node).nth(1).ok_or(Error::EmptyMatch)?;
            let value_type = match token.kind() {
                SyntaxKind::LONG_KW => ValueType::Long,
                SyntaxKind::DOUBLE_KW => ValueType::Double,
                SyntaxKind::STRING_KW => ValueType::String,
                SyntaxKind::BOOLEAN_KW => ValueType::Boolean,
                SyntaxKind::DATETIME_KW => ValueType::DateTime,
                _ => return Err(Error::unrecognised(token.text(), "value type")),
            };
            LoweredConstraint::Type(TypeConstraint::ValueType(value_type))
        }
        SyntaxKind::CONSTRAINT_ABSTRACT => LoweredConstraint::Type(TypeConstraint::Abstract),
        SyntaxKind::CONSTRAINT_TYPE => {
            let label = child_node(node, SyntaxKind::LABEL_REF)
                .map(|child| lower_label(&child))
                .ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Type(TypeConstraint::Label(label))
        }
        SyntaxKind::CONSTRAINT_WHEN => {
            let body = child_node(node, SyntaxKind::CONJUNCTION).ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Type(TypeConstraint::When(lower_rule_body(&body)?))
        }
        SyntaxKind::CONSTRAINT_THEN => {
            let statement = child_node(node, SyntaxKind::STATEMENT).ok_or(Error::EmptyMatch)?;
            let statement = lower_statement(&statement, StatementContext::Data)?;
            LoweredConstraint::Type(TypeConstraint::Then(Box::new(statement)))
        }
        SyntaxKind::CONSTRAINT_ID => {
            let token = tokens(node).nth(1).ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Thing(ThingConstraint::Id(SmolStr::from(token.text())))
        }
        SyntaxKind::CONSTRAINT_NEQ => {
            let token = token_of(node, &[SyntaxKind::VAR]).ok_or(Error::EmptyMatch)?;
            LoweredConstraint::Thing(ThingConstraint::Neq(Reference::Concept(var_name(&token))))
        }
        _ => return Ok(None),
    };
    Ok(Some(constraint))
}

fn lower_has(node: &SyntaxNode) -> Result<LoweredConstraint, Error> {
    let is_key = tokens(node)
        .next()
        .map(|token| token.kind() == SyntaxKind::KEY_KW)
        .unwrap_or(false);
    let label = child_node(node, SyntaxKind::LABEL_REF).map(|child| lower_label(&child));
    let variable = token_of(node, &[SyntaxKind::VAR, SyntaxKind::VALUE_VAR]).map(|token| {
        match token.kind() {
            SyntaxKind::VAR => Reference::Concept(var_name(&token)),
            _ => Reference::Value(var_name(&token)),
        }
    });
    let operation = match child_node(node, SyntaxKind::VALUE_OPERATION) {
        Some(operation) => Some(lower_value_operation(&operation)?),
        None => None,
    };

    let constraint = match (label, variable, operation) {
        (Some(attribute), None, None) => LoweredConstraint::BareHas { attribute, is_key },
        (label, Some(variable), None) => LoweredConstraint::Thing(ThingConstraint::Has(Has {
            attribute_type: label.map(|label| label.name),
            attribute: HasAttribute::Variable(variable),
            is_key,
        })),
        (label, None, Some(operation)) => LoweredConstraint::Thing(ThingConstraint::Has(Has {
            attribute_type: label.map(|label| label.name),
            attribute: HasAttribute::Statement(Box::new(AttributeStatement::new(
                Reference::hidden(),
                operation,
            ))),
            is_key,
        })),
        _ => return Err(Error::unrecognised("has", "constraint")),
    };
    Ok(constraint)
}

fn lower_relation(node: &SyntaxNode) -> Result<RelationConstraint, Error> {
    let mut role_players = Vec::new();
    for child in child_nodes(node, SyntaxKind::ROLE_PLAYER) {
        let role_type = child_node(&child, SyntaxKind::TYPE_REF).map(|role| lower_type_ref(&role));
        let player = token_of(&child, &[SyntaxKind::VAR, SyntaxKind::VAR_ANON])
            .map(|token| match token.kind() {
                SyntaxKind::VAR => Reference::Concept(var_name(&token)),
                _ => Reference::anonymous(),
            })
            .ok_or(Error::EmptyMatch)?;
        role_players.push(RolePlayer::new(role_type, player));
    }
    Ok(RelationConstraint::new(role_players))
}

// =============================================================================
// Values
// =============================================================================

fn lower_value_operation(node: &SyntaxNode) -> Result<ValueOperation, Error> {
    let comparator = tokens(node).next().and_then(|token| match token.kind() {
        SyntaxKind::EQ | SyntaxKind::EQ_EQ => Some(Comparator::Eq),
        SyntaxKind::BANG_EQ_EQ => Some(Comparator::Neq),
        SyntaxKind::LT => Some(Comparator::Lt),
        SyntaxKind::LT_EQ => Some(Comparator::Lte),
        SyntaxKind::GT => Some(Comparator::Gt),
        SyntaxKind::GT_EQ => Some(Comparator::Gte),
        SyntaxKind::CONTAINS_KW => Some(Comparator::Contains),
        SyntaxKind::LIKE_KW => Some(Comparator::Like),
        _ => None,
    });

    match comparator {
        Some(comparator) => {
            let rhs = tokens(node).nth(1).ok_or(Error::EmptyMatch)?;
            let rhs = match rhs.kind() {
                SyntaxKind::VAR => ComparisonRhs::Variable(Reference::Concept(var_name(&rhs))),
                SyntaxKind::VALUE_VAR => {
                    ComparisonRhs::Variable(Reference::Value(var_name(&rhs)))
                }
                _ => ComparisonRhs::Value(lower_value(&rhs)?),
            };
            Ok(ValueOperation::Comparison { comparator, rhs })
        }
        None => {
            let token = tokens(node).next().ok_or(Error::EmptyMatch)?;
            Ok(ValueOperation::Assignment(lower_value(&token)?))
        }
    }
}

fn lower_value(token: &SyntaxToken) -> Result<Value, Error> {
    let text = token.text();
    match token.kind() {
        SyntaxKind::INTEGER => text
            .parse::<i64>()
            .map(Value::Long)
            .map_err(|_| Error::unrecognised(text, "integer literal")),
        SyntaxKind::REAL => text
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| Error::unrecognised(text, "real literal")),
        SyntaxKind::TRUE_KW => Ok(Value::Boolean(true)),
        SyntaxKind::FALSE_KW => Ok(Value::Boolean(false)),
        SyntaxKind::STRING => Ok(Value::String(unescape(text))),
        SyntaxKind::DATE => parse_date(text)
            .map(Value::from)
            .ok_or_else(|| Error::unrecognised(text, "date literal")),
        SyntaxKind::DATE_TIME => {
            let value = parse_date_time(text).ok_or_else(|| Error::unrecognised(text, "date-time literal"))?;
            Value::date_time(value)
        }
        _ => Err(Error::unrecognised(text, "value literal")),
    }
}

/// `(+|-)?YYYY-MM-DD` with four-or-more year digits.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let mut parts = rest.splitn(3, '-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(if negative { -year } else { year }, month, day)
}

/// `<date>THH:MM(:SS(.fff)?)?`; the fraction is milliseconds,
/// right-padded so `.1` means one hundred milliseconds.
fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let (date, time) = text.split_once('T')?;
    let date = parse_date(date)?;
    let mut parts = time.splitn(3, ':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    let (second, milli) = match parts.next() {
        Some(seconds) => match seconds.split_once('.') {
            Some((second, fraction)) => {
                let padded = format!("{:0<3}", fraction);
                (second.parse().ok()?, padded.parse().ok()?)
            }
            None => (seconds.parse().ok()?, 0),
        },
        None => (0, 0),
    };
    date.and_hms_milli_opt(hour, minute, second, milli)
}

/// Strip quotes and process the escape set; unknown escapes (regex
/// classes like `\d`) keep their backslash.
fn unescape(text: &str) -> String {
    let inner = &text[1..text.len().saturating_sub(1)];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_variants() {
        assert!(parse_date("2020-02-29").is_some());
        assert!(parse_date("2020-13-01").is_none());
        assert_eq!(
            parse_date("-0042-01-01").map(|d| chrono::Datelike::year(&d)),
            Some(-42)
        );
        assert_eq!(
            parse_date("+12345-01-01").map(|d| chrono::Datelike::year(&d)),
            Some(12345)
        );
    }

    #[test]
    fn test_fraction_pads_to_milliseconds() {
        let value = parse_date_time("1000-11-12T13:14:15.1").unwrap();
        assert_eq!(chrono::Timelike::nanosecond(&value), 100_000_000);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#""a\"b""#), "a\"b");
        assert_eq!(unescape(r#""a\\d+""#), r"a\d+");
        assert_eq!(unescape(r#""re\d+""#), r"re\d+");
        assert_eq!(unescape("'it\\'s'"), "it's");
        assert_eq!(unescape(r#""a\/b""#), "a/b");
    }
}
