//! Rowan-based parser for TypeQL
//!
//! This module provides a lossless parser using:
//! - **logos** for fast lexing
//! - **rowan** for the parse tree (CST)
//!
//! We build a lossless parse tree that preserves all whitespace and
//! comments, then lower it to the owned AST in `crate::syntax`. The
//! surface grammar is documented in `typeql.pest`, shipped next to this
//! module.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → parse tree with parent pointers
//!     ↓
//! Lowering → validated AST values
//! ```
//!
//! The parser is error-tolerant and always produces both the tree and
//! positioned diagnostics in a single pass; diagnostics are rendered
//! into caret snippets only when an error is actually reported, so
//! well-formed input never pays for error formatting.
//!
//! Query lists are parsed iteratively, one query per parser run over the
//! shared token buffer: ten thousand concatenated queries use the same
//! stack depth as one.

#[allow(clippy::module_inception)]
mod parser;

pub(crate) mod grammar;
pub mod keywords;
mod lexer;
pub(crate) mod lower;
mod syntax_kind;

pub use lexer::{Lexer, Token, tokenize};
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TypeQLLanguage};

use crate::error::{self, Error};
use crate::syntax::pattern::Pattern;
use crate::syntax::query::Query;
use parser::Parser;

/// Parse exactly one query.
///
/// Empty (or whitespace/comment-only) input and trailing content are
/// both rejected.
pub fn parse_query(typeql: &str) -> Result<Query, Error> {
    let mut queries = parse_queries(typeql);
    let first = queries.next().ok_or(Error::EmptyInput)??;
    if queries.next().is_some() {
        return Err(Error::MultipleQueries);
    }
    Ok(first)
}

/// Lazily parse a sequence of queries.
///
/// Each call to `next` parses one query; parsing stops at the first
/// error.
pub fn parse_queries(typeql: &str) -> Queries<'_> {
    tracing::trace!(len = typeql.len(), "parsing query list");
    Queries {
        source: typeql,
        tokens: tokenize(typeql),
        pos: 0,
        failed: false,
    }
}

/// Parse exactly one pattern: a statement, or a braced pattern ending
/// with `;`.
pub fn parse_pattern(typeql: &str) -> Result<Pattern, Error> {
    let mut patterns = parse_patterns(typeql);
    let first = patterns.next().ok_or(Error::EmptyInput)??;
    if patterns.next().is_some() {
        return Err(Error::MultipleQueries);
    }
    Ok(first)
}

/// Lazily parse a sequence of patterns.
pub fn parse_patterns(typeql: &str) -> Patterns<'_> {
    tracing::trace!(len = typeql.len(), "parsing pattern list");
    Patterns {
        source: typeql,
        tokens: tokenize(typeql),
        pos: 0,
        failed: false,
    }
}

/// Lazy query sequence over a shared token buffer.
pub struct Queries<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    failed: bool,
}

impl Iterator for Queries<'_> {
    type Item = Result<Query, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let root = next_tree(
            self.source,
            &self.tokens,
            &mut self.pos,
            &mut self.failed,
            |p| grammar::query::parse_query(p),
        )?;
        let result = root.and_then(|root| lower::lower_query(&root));
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Lazy pattern sequence over a shared token buffer.
pub struct Patterns<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    failed: bool,
}

impl Iterator for Patterns<'_> {
    type Item = Result<Pattern, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let root = next_tree(
            self.source,
            &self.tokens,
            &mut self.pos,
            &mut self.failed,
            |p| {
                p.start_node(SyntaxKind::PATTERN);
                if grammar::pattern::can_start_pattern(p.peek()) {
                    grammar::pattern::parse_pattern(p);
                } else {
                    p.error("expected a pattern");
                }
                p.finish_node();
            },
        )?;
        let result = root.and_then(|root| {
            let child = root.children().next().ok_or(Error::EmptyInput)?;
            let pattern = lower::pattern::lower_pattern(&child)?;
            pattern.validate()?;
            Ok(pattern)
        });
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Run one parser pass from the current position, returning the tree or
/// the first diagnostic, rendered against the source.
fn next_tree(
    source: &str,
    tokens: &[Token<'_>],
    pos: &mut usize,
    failed: &mut bool,
    parse: impl FnOnce(&mut Parser),
) -> Option<Result<SyntaxNode, Error>> {
    if *failed {
        return None;
    }
    while tokens.get(*pos).map(|t| t.kind.is_trivia()).unwrap_or(false) {
        *pos += 1;
    }
    if *pos >= tokens.len() {
        return None;
    }

    let mut parser = Parser::new(&tokens[*pos..], source.len());
    parse(&mut parser);
    let result = parser.finish();

    if let Some(first) = result.errors.first() {
        *failed = true;
        return Some(Err(error::syntax_error(
            source,
            first.offset,
            first.message.clone(),
            first.expected.clone(),
        )));
    }
    *pos += result.consumed;
    Some(Ok(SyntaxNode::new_root(result.green)))
}
