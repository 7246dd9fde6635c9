//! compute_clause = 'compute' method (condition (',' condition)*)? ';'
//!
//! Algorithm and argument names are contextual identifiers (`k-core`
//! lexes as a plain identifier), so the grammar accepts any identifier
//! here and lowering resolves it against the compute matrix.

use super::super::parser::Parser;
use super::super::syntax_kind::SyntaxKind;
use super::{at_label, parse_label};

const COMPUTE_METHODS: &[SyntaxKind] = &[
    SyntaxKind::COUNT_KW,
    SyntaxKind::MAX_KW,
    SyntaxKind::MIN_KW,
    SyntaxKind::MEAN_KW,
    SyntaxKind::MEDIAN_KW,
    SyntaxKind::SUM_KW,
    SyntaxKind::STD_KW,
    SyntaxKind::PATH_KW,
    SyntaxKind::CENTRALITY_KW,
    SyntaxKind::CLUSTER_KW,
];

const CONDITION_RECOVERY: &[SyntaxKind] = &[SyntaxKind::SEMICOLON, SyntaxKind::COMMA];

pub(crate) fn parse_compute_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::COMPUTE_CLAUSE);
    p.bump();
    if p.at_any(COMPUTE_METHODS) {
        p.bump();
    } else {
        p.error_recover("expected a compute method", &[SyntaxKind::SEMICOLON]);
    }
    if !p.at(SyntaxKind::SEMICOLON) && !p.at_eof() {
        loop {
            parse_condition(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn parse_condition(p: &mut Parser) {
    p.start_node(SyntaxKind::COMPUTE_CONDITION);
    match p.peek() {
        SyntaxKind::FROM_KW | SyntaxKind::TO_KW => {
            p.bump();
            if p.at_any(&[SyntaxKind::IDENT, SyntaxKind::INTEGER]) {
                p.bump();
            } else {
                p.error_recover("expected a concept id", CONDITION_RECOVERY);
            }
        }
        SyntaxKind::OF_KW | SyntaxKind::IN_KW => {
            p.bump();
            parse_type_list(p);
        }
        SyntaxKind::USING_KW => {
            p.bump();
            if p.at(SyntaxKind::IDENT) {
                p.bump();
            } else {
                p.error_recover("expected an algorithm name", CONDITION_RECOVERY);
            }
        }
        SyntaxKind::WHERE_KW => {
            p.bump();
            parse_args(p);
        }
        _ => p.error_recover(
            "expected a compute condition ('from', 'to', 'of', 'in', 'using', or 'where')",
            CONDITION_RECOVERY,
        ),
    }
    p.finish_node();
}

/// type_list = label_ref | '[' (label_ref (',' label_ref)*)? ']'
fn parse_type_list(p: &mut Parser) {
    if p.eat(SyntaxKind::L_BRACKET) {
        while at_label(p) {
            parse_label(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.expect(SyntaxKind::R_BRACKET);
    } else if at_label(p) {
        parse_label(p);
    } else {
        p.error_recover("expected a type or '['", CONDITION_RECOVERY);
    }
}

/// args = arg | '[' arg (',' arg)* ']'
fn parse_args(p: &mut Parser) {
    if p.eat(SyntaxKind::L_BRACKET) {
        loop {
            parse_arg(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.expect(SyntaxKind::R_BRACKET);
    } else {
        parse_arg(p);
    }
}

/// arg = param '=' (integer | id)
fn parse_arg(p: &mut Parser) {
    p.start_node(SyntaxKind::COMPUTE_ARG);
    if p.at_any(&[SyntaxKind::IDENT, SyntaxKind::CONTAINS_KW]) {
        p.bump();
        p.expect(SyntaxKind::EQ);
        if p.at_any(&[SyntaxKind::INTEGER, SyntaxKind::IDENT]) {
            p.bump();
        } else {
            p.error_recover("expected an argument value", CONDITION_RECOVERY);
        }
    } else {
        p.error_recover("expected an argument name", CONDITION_RECOVERY);
    }
    p.finish_node();
}
