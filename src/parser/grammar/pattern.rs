//! pattern = disjunction | conjunction | negation | statement
//!
//! Braced groups become CONJUNCTION nodes; `or`-joined groups are
//! wrapped into a DISJUNCTION after the fact via a checkpoint.

use super::super::parser::Parser;
use super::super::syntax_kind::SyntaxKind;
use super::statement;

pub(crate) fn can_start_pattern(kind: SyntaxKind) -> bool {
    statement::can_start_statement(kind)
        || matches!(kind, SyntaxKind::L_BRACE | SyntaxKind::NOT_KW)
}

pub(crate) fn parse_pattern(p: &mut Parser) {
    match p.peek() {
        SyntaxKind::L_BRACE => parse_braced_or_disjunction(p),
        SyntaxKind::NOT_KW => parse_negation(p),
        _ => statement::parse_statement(p),
    }
}

/// A braced conjunction, possibly the first branch of a disjunction:
/// `{ ... };` or `{ ... } or { ... };`
fn parse_braced_or_disjunction(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_braced_conjunction(p);
    if p.at(SyntaxKind::OR_KW) {
        p.start_node_at(checkpoint, SyntaxKind::DISJUNCTION);
        while p.eat(SyntaxKind::OR_KW) {
            if p.at(SyntaxKind::L_BRACE) {
                parse_braced_conjunction(p);
            } else {
                p.error_recover("expected '{' after 'or'", &[SyntaxKind::SEMICOLON]);
                break;
            }
        }
        p.expect(SyntaxKind::SEMICOLON);
        p.finish_node();
    } else {
        p.expect(SyntaxKind::SEMICOLON);
    }
}

/// negation = 'not' '{' pattern+ '}' ';'
fn parse_negation(p: &mut Parser) {
    p.start_node(SyntaxKind::NEGATION);
    p.bump();
    if p.at(SyntaxKind::L_BRACE) {
        parse_braced_conjunction(p);
    } else {
        p.error_recover("expected '{' after 'not'", &[SyntaxKind::SEMICOLON]);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// conjunction = '{' pattern+ '}'
pub(crate) fn parse_braced_conjunction(p: &mut Parser) {
    p.start_node(SyntaxKind::CONJUNCTION);
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at_eof() {
        if can_start_pattern(p.peek()) {
            parse_pattern(p);
        } else {
            p.error_recover(
                "expected a pattern",
                &[SyntaxKind::R_BRACE, SyntaxKind::SEMICOLON],
            );
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}
