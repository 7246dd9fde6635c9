//! # typeql-lang
//!
//! Core library for TypeQL parsing, AST construction, validation, and
//! printing.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! builder   → programmatic query construction
//!   ↓
//! semantic  → rule and compute validation passes
//!   ↓
//! syntax    → AST types, validating constructors, formatter
//!   ↓
//! parser    → logos lexer, rowan parse tree, lowering, grammar artifact
//!   ↓
//! base      → primitives (LineCol, LineIndex)
//! ```
//!
//! The pipeline: text → tokens → parse tree → AST → validated AST, and
//! back out through the formatter. `parse(print(q)) == q` holds for
//! every validated AST in both pretty and compact modes. The library
//! executes nothing and performs no I/O; it turns strings into
//! structured values and structured values back into strings.

// ============================================================================
// MODULES (dependency order: base → parser → syntax → semantic → builder)
// ============================================================================

/// Foundation types: LineCol, LineIndex
pub mod base;

/// Error taxonomy shared by the whole crate
pub mod error;

/// Parser: logos lexer, rowan parse tree, lowering to the AST
pub mod parser;

/// Syntax: AST types, validating constructors, formatter
pub mod syntax;

/// Semantic validation passes (rules)
pub mod semantic;

/// Builder API mirroring the AST
pub mod builder;

// Re-export commonly needed items
pub use parser::keywords;

pub use builder::{
    and, compute, contains, define, eq, gt, gte, insert, like, lt, lte, match_, neq, not, or,
    rel, rule, type_, undefine, value_var, var,
};
pub use error::Error;
pub use parser::{parse_pattern, parse_patterns, parse_queries, parse_query};
pub use syntax::compute::{Algorithm, ArgKind, ComputeMethod};
pub use syntax::formatter::{FormatOptions, format_pattern, format_query};
pub use syntax::pattern::Pattern;
pub use syntax::query::Query;
pub use syntax::value::{Value, ValueType};
pub use syntax::variable::{Label, Reference};
