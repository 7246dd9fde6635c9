//! Foundation types for the TypeQL language library.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`LineCol`], [`LineIndex`] - byte-offset to line/column conversion
//!
//! This module has NO dependencies on other typeql modules.

mod position;

pub use position::{LineCol, LineIndex};
