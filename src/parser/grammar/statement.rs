//! statement = head? relation? value_operation? constraint (',' constraint)* ';'
//!
//! The grammar is deliberately permissive about which constraints sit on
//! which statement family; lowering classifies and rejects mixtures.

use super::super::parser::Parser;
use super::super::syntax_kind::SyntaxKind;
use super::{at_label, parse_label, parse_type_ref, pattern};

const STATEMENT_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::SEMICOLON,
    SyntaxKind::COMMA,
    SyntaxKind::R_BRACE,
];

pub(crate) fn can_start_statement(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::VAR
            | SyntaxKind::VAR_ANON
            | SyntaxKind::VALUE_VAR
            | SyntaxKind::IDENT
            | SyntaxKind::RULE_KW
            | SyntaxKind::L_PAREN
    )
}

fn at_constraint_start(p: &Parser) -> bool {
    matches!(
        p.peek(),
        SyntaxKind::ISA_KW
            | SyntaxKind::ISA_EXACT_KW
            | SyntaxKind::SUB_KW
            | SyntaxKind::SUB_EXACT_KW
            | SyntaxKind::HAS_KW
            | SyntaxKind::KEY_KW
            | SyntaxKind::PLAYS_KW
            | SyntaxKind::RELATES_KW
            | SyntaxKind::REGEX_KW
            | SyntaxKind::VALUE_KW
            | SyntaxKind::ABSTRACT_KW
            | SyntaxKind::TYPE_KW
            | SyntaxKind::WHEN_KW
            | SyntaxKind::THEN_KW
            | SyntaxKind::ID_KW
            | SyntaxKind::BANG_EQ
    )
}

pub(crate) fn parse_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::STATEMENT);

    match p.peek() {
        SyntaxKind::VAR | SyntaxKind::VAR_ANON | SyntaxKind::VALUE_VAR => p.bump(),
        SyntaxKind::IDENT | SyntaxKind::RULE_KW => parse_label(p),
        SyntaxKind::L_PAREN => {} // headless relation
        _ => {
            p.error_recover("expected a variable or type label", STATEMENT_RECOVERY);
            p.eat(SyntaxKind::SEMICOLON);
            p.finish_node();
            return;
        }
    }

    if p.at(SyntaxKind::L_PAREN) {
        parse_relation(p);
    }

    // A value operation directly after the head makes this an attribute
    // statement: `$t "Spy"` or `$t < "Juno"`.
    if p.peek().is_literal() || p.peek().is_comparator() {
        parse_value_operation(p);
    }

    if at_constraint_start(p) {
        loop {
            parse_constraint(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
            if !at_constraint_start(p) {
                p.error_recover("expected a constraint after ','", STATEMENT_RECOVERY);
                break;
            }
        }
    }

    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

fn parse_constraint(p: &mut Parser) {
    match p.peek() {
        SyntaxKind::ISA_KW | SyntaxKind::ISA_EXACT_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_ISA);
            p.bump();
            parse_type_ref(p);
            p.finish_node();
        }
        SyntaxKind::SUB_KW | SyntaxKind::SUB_EXACT_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_SUB);
            p.bump();
            parse_type_ref(p);
            p.finish_node();
        }
        SyntaxKind::HAS_KW | SyntaxKind::KEY_KW => parse_has(p),
        SyntaxKind::PLAYS_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_PLAYS);
            p.bump();
            if at_label(p) {
                parse_label(p);
            } else {
                p.error_recover("expected a role type after 'plays'", STATEMENT_RECOVERY);
            }
            p.finish_node();
        }
        SyntaxKind::RELATES_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_RELATES);
            p.bump();
            if at_label(p) {
                parse_label(p);
            } else {
                p.error_recover("expected a role type after 'relates'", STATEMENT_RECOVERY);
            }
            if p.eat(SyntaxKind::AS_KW) {
                if at_label(p) {
                    parse_label(p);
                } else {
                    p.error_recover("expected a role type after 'as'", STATEMENT_RECOVERY);
                }
            }
            p.finish_node();
        }
        SyntaxKind::REGEX_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_REGEX);
            p.bump();
            p.expect(SyntaxKind::STRING);
            p.finish_node();
        }
        SyntaxKind::VALUE_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_VALUE_TYPE);
            p.bump();
            // Unknown words are accepted here and rejected during
            // lowering with the offending name.
            if p.at_any(&[
                SyntaxKind::LONG_KW,
                SyntaxKind::DOUBLE_KW,
                SyntaxKind::STRING_KW,
                SyntaxKind::BOOLEAN_KW,
                SyntaxKind::DATETIME_KW,
                SyntaxKind::IDENT,
            ]) {
                p.bump();
            } else {
                p.error_recover("expected a value type", STATEMENT_RECOVERY);
            }
            p.finish_node();
        }
        SyntaxKind::ABSTRACT_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_ABSTRACT);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::TYPE_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_TYPE);
            p.bump();
            if at_label(p) {
                parse_label(p);
            } else {
                p.error_recover("expected a type label after 'type'", STATEMENT_RECOVERY);
            }
            p.finish_node();
        }
        SyntaxKind::WHEN_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_WHEN);
            p.bump();
            if p.at(SyntaxKind::L_BRACE) {
                pattern::parse_braced_conjunction(p);
            } else {
                p.error_recover("expected '{' after 'when'", STATEMENT_RECOVERY);
            }
            p.finish_node();
        }
        SyntaxKind::THEN_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_THEN);
            p.bump();
            if p.eat(SyntaxKind::L_BRACE) {
                parse_statement(p);
                p.expect(SyntaxKind::R_BRACE);
            } else {
                p.error_recover("expected '{' after 'then'", STATEMENT_RECOVERY);
            }
            p.finish_node();
        }
        SyntaxKind::ID_KW => {
            p.start_node(SyntaxKind::CONSTRAINT_ID);
            p.bump();
            if p.at_any(&[SyntaxKind::IDENT, SyntaxKind::INTEGER]) {
                p.bump();
            } else {
                p.error_recover("expected an id after 'id'", STATEMENT_RECOVERY);
            }
            p.finish_node();
        }
        SyntaxKind::BANG_EQ => {
            p.start_node(SyntaxKind::CONSTRAINT_NEQ);
            p.bump();
            p.expect(SyntaxKind::VAR);
            p.finish_node();
        }
        _ => p.error_recover("expected a constraint", STATEMENT_RECOVERY),
    }
}

/// has = ('has' | 'key') (var | label (var | value_operation)?)
///
/// `has name` with nothing after the label is a schema ownership
/// declaration; with a value or variable it is a data constraint.
fn parse_has(p: &mut Parser) {
    p.start_node(SyntaxKind::CONSTRAINT_HAS);
    p.bump();
    match p.peek() {
        SyntaxKind::VAR | SyntaxKind::VALUE_VAR => p.bump(),
        SyntaxKind::IDENT | SyntaxKind::RULE_KW => {
            parse_label(p);
            match p.peek() {
                SyntaxKind::VAR | SyntaxKind::VALUE_VAR => p.bump(),
                kind if kind.is_literal() || kind.is_comparator() => parse_value_operation(p),
                _ => {}
            }
        }
        _ => p.error_recover(
            "expected an attribute type or variable after 'has'",
            STATEMENT_RECOVERY,
        ),
    }
    p.finish_node();
}

/// value_operation = comparator (value | var) | value
fn parse_value_operation(p: &mut Parser) {
    p.start_node(SyntaxKind::VALUE_OPERATION);
    if p.peek().is_comparator() {
        p.bump();
        match p.peek() {
            kind if kind.is_literal() => p.bump(),
            SyntaxKind::VAR | SyntaxKind::VALUE_VAR => p.bump(),
            _ => p.error_recover("expected a value or variable", STATEMENT_RECOVERY),
        }
    } else {
        p.bump();
    }
    p.finish_node();
}

/// relation = '(' role_player (',' role_player)* ')'
fn parse_relation(p: &mut Parser) {
    p.start_node(SyntaxKind::RELATION);
    p.expect(SyntaxKind::L_PAREN);
    loop {
        parse_role_player(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// role_player = (type_ref ':')? var
fn parse_role_player(p: &mut Parser) {
    p.start_node(SyntaxKind::ROLE_PLAYER);
    if p.ahead_before(
        SyntaxKind::COLON,
        &[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::SEMICOLON],
    ) {
        parse_type_ref(p);
        p.expect(SyntaxKind::COLON);
    }
    if p.at_any(&[SyntaxKind::VAR, SyntaxKind::VAR_ANON]) {
        p.bump();
    } else {
        p.error_recover(
            "expected a player variable",
            &[SyntaxKind::COMMA, SyntaxKind::R_PAREN, SyntaxKind::SEMICOLON],
        );
    }
    p.finish_node();
}
