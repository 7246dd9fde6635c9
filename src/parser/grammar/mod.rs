//! Grammar productions for the TypeQL parser.
//!
//! One module per grammar area, as free functions over the parser state.
//! Based on the shipped typeql.pest grammar.

pub(crate) mod compute;
pub(crate) mod pattern;
pub(crate) mod query;
pub(crate) mod statement;

use super::parser::Parser;
use super::syntax_kind::SyntaxKind;

/// Tokens accepted as a type-label segment. `rule` is reserved but valid
/// in label position (`sub rule`).
pub(crate) fn at_label(p: &Parser) -> bool {
    matches!(p.peek(), SyntaxKind::IDENT | SyntaxKind::RULE_KW)
}

/// label_ref = label_segment (':' label_segment)?
///
/// The scope is consumed only when another label segment follows the
/// colon, so a role player's `role: $x` colon is left alone.
pub(crate) fn parse_label(p: &mut Parser) {
    p.start_node(SyntaxKind::LABEL_REF);
    p.bump();
    if p.at(SyntaxKind::COLON) && matches!(p.nth(1), SyntaxKind::IDENT | SyntaxKind::RULE_KW) {
        p.bump();
        p.bump();
    }
    p.finish_node();
}

/// type_ref = VAR | label_ref
pub(crate) fn parse_type_ref(p: &mut Parser) {
    p.start_node(SyntaxKind::TYPE_REF);
    if p.at(SyntaxKind::VAR) {
        p.bump();
    } else if at_label(p) {
        parse_label(p);
    } else {
        p.error_recover(
            "expected a type label or variable",
            &[SyntaxKind::SEMICOLON, SyntaxKind::COMMA, SyntaxKind::R_BRACE],
        );
    }
    p.finish_node();
}
