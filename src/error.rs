//! Error taxonomy for the TypeQL language library.
//!
//! Every fallible operation in the crate reports through [`Error`].
//! Syntax errors carry a caret-pointer snippet of the offending line;
//! validation errors carry the structured reason that produced them.

use std::fmt;

use thiserror::Error;

use crate::base::{LineCol, LineIndex};
use crate::syntax::compute::{Algorithm, ArgKind, ComputeMethod, ConditionKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The diagnostic parse failed.
    #[error("{message} at line {line}, column {column}:\n{snippet}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        /// The offending line, verbatim, followed by a caret pointer.
        snippet: String,
        expected: Option<String>,
    },

    /// The query string was empty or whitespace-only.
    #[error("the query string is empty")]
    EmptyInput,

    /// `parse` received more than one query.
    #[error("more than one query was provided; use the query-list parser")]
    MultipleQueries,

    /// A rule failed a structural well-formedness check.
    #[error("invalid rule '{label}': {reason}")]
    InvalidRule { label: String, reason: RuleError },

    /// A compute query failed the method/algorithm/argument matrix.
    #[error("invalid 'compute {method}' query: {reason}")]
    InvalidCompute {
        method: ComputeMethod,
        reason: ComputeError,
    },

    /// A variant accessor was applied to the wrong variant.
    #[error("invalid cast from '{from}' to '{to}'")]
    InvalidCasting {
        from: &'static str,
        to: &'static str,
    },

    /// A date-time literal carried sub-millisecond precision.
    #[error("date-time precision finer than milliseconds is not supported")]
    InvalidDateTimeNanos,

    /// A word matched the grammar but is not a known symbol.
    #[error("unrecognised {context} '{token}'")]
    UnrecognisedToken {
        token: String,
        context: &'static str,
    },

    /// A clause that requires content was assembled empty: a match
    /// clause or conjunction without patterns, or a define, undefine,
    /// insert, or delete without statements.
    #[error("expected at least one pattern or statement")]
    EmptyMatch,

    /// An `or` pattern was assembled with fewer than two branches.
    #[error("an 'or' pattern requires at least two branches")]
    EmptyDisjunction,

    /// A filter, sort, group, or aggregate variable is not available in
    /// the query it modifies.
    #[error("the variable '{variable}' is not in scope of the query")]
    VariableOutOfScope { variable: String },

    /// A statement repeated a constraint that may occur at most once.
    #[error("the statement '{head}' repeats the '{constraint}' constraint")]
    RepeatedConstraint {
        head: String,
        constraint: &'static str,
    },

    /// A statement kind is not allowed in the clause it appeared in,
    /// e.g. a schema statement inside `insert`.
    #[error("'{statement}' is not allowed as {context} statement")]
    InvalidStatementKind {
        statement: String,
        context: &'static str,
    },
}

impl Error {
    pub fn invalid_casting(from: &'static str, to: &'static str) -> Self {
        Self::InvalidCasting { from, to }
    }

    pub(crate) fn unrecognised(token: impl Into<String>, context: &'static str) -> Self {
        Self::UnrecognisedToken {
            token: token.into(),
            context,
        }
    }
}

/// Reasons a rule definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("the 'when' block is missing or empty")]
    MissingWhen,
    #[error("the 'then' block is missing")]
    MissingThen,
    #[error("a negation inside 'when' may not contain another negation")]
    NestedNegation,
    #[error(
        "the 'then' block must be a single statement with exactly one 'has', \
         or exactly one 'isa' on a relation"
    )]
    BadThenShape,
    #[error("the 'then' 'has' may not name both an attribute type and a named attribute variable")]
    ThenHasVariableShape,
    #[error("the variable '{0}' in 'then' is not bound by 'when'")]
    ThenUnboundVariable(String),
    #[error("every role player in the 'then' relation must name its role type")]
    ThenImplicitRole,
    #[error("the relation in 'then' may not be headed by a named variable")]
    ThenNamedRelation,
}

/// Reasons a compute query is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    MissingCondition(Vec<ConditionKind>),
    InvalidAlgorithm {
        algorithm: Algorithm,
        allowed: Vec<Algorithm>,
    },
    InvalidArgument {
        param: ArgKind,
        allowed: Vec<ArgKind>,
    },
    UnexpectedCondition(ConditionKind),
}

impl fmt::Display for ComputeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(items: &[T]) -> String {
            items
                .iter()
                .map(|item| format!("'{}'", item))
                .collect::<Vec<_>>()
                .join(", ")
        }
        match self {
            Self::MissingCondition(required) => {
                write!(f, "missing required condition(s) {}", join(required))
            }
            Self::InvalidAlgorithm { algorithm, allowed } => {
                write!(
                    f,
                    "the algorithm '{}' is not applicable; accepted: {}",
                    algorithm,
                    join(allowed)
                )
            }
            Self::InvalidArgument { param, allowed } => {
                if allowed.is_empty() {
                    write!(f, "the argument '{}' is not accepted", param)
                } else {
                    write!(
                        f,
                        "the argument '{}' is not accepted; accepted: {}",
                        param,
                        join(allowed)
                    )
                }
            }
            Self::UnexpectedCondition(condition) => {
                write!(f, "the condition '{}' is not accepted", condition)
            }
        }
    }
}

impl std::error::Error for ComputeError {}

/// Render a syntax error with a caret pointer into the offending line.
///
/// The line is reproduced verbatim; the caret is aligned by character
/// count, so multi-line inputs keep their whitespace in the report.
pub(crate) fn syntax_error(
    source: &str,
    offset: usize,
    message: impl Into<String>,
    expected: Option<String>,
) -> Error {
    let index = LineIndex::new(source);
    let LineCol { line, column } = index.line_col(offset);
    let (start, end) = index.line_range(line, source);
    let line_text = &source[start..end];
    let caret_at = source[start..offset.clamp(start, end)].chars().count();

    let mut snippet = String::with_capacity(line_text.len() + caret_at + 2);
    snippet.push_str(line_text);
    snippet.push('\n');
    for _ in 0..caret_at {
        snippet.push(' ');
    }
    snippet.push('^');

    Error::Syntax {
        message: message.into(),
        line,
        column,
        snippet,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_alignment() {
        let source = "match $x isa ";
        let err = syntax_error(source, 13, "syntax error", None);
        match err {
            Error::Syntax {
                line,
                column,
                snippet,
                ..
            } => {
                assert_eq!(line, 1);
                assert_eq!(column, 14);
                assert_eq!(snippet, "match $x isa \n             ^");
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_caret_on_second_line() {
        let source = "match\n$x isa \nget;";
        let err = syntax_error(source, 13, "syntax error", None);
        match err {
            Error::Syntax { line, snippet, .. } => {
                assert_eq!(line, 2);
                assert!(snippet.starts_with("$x isa \n"));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }
}
