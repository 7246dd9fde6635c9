//! Structural validation passes.
//!
//! The checks here are non-local: they relate a rule's conclusion to its
//! body, which no single constraint can see. They run at every
//! query-assembly boundary, so parsed and built ASTs are held to the
//! same rules.

pub mod rule;
