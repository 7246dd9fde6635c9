//! AST types: variables, values, constraints, statements, patterns,
//! queries, and the canonical formatter.
//!
//! AST values are immutable once constructed and compare structurally.
//! Composite nodes are assembled through validating constructors, so
//! parsed and built values are indistinguishable.

pub mod compute;
pub mod constraint;
pub mod formatter;
pub mod pattern;
pub mod query;
pub mod statement;
pub mod value;
pub mod variable;
