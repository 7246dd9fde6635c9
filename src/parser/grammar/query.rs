//! query = define | undefine | insert | match_query | compute

use super::super::parser::Parser;
use super::super::syntax_kind::SyntaxKind;
use super::{compute, pattern, statement};

const QUERY_STARTS: &[SyntaxKind] = &[
    SyntaxKind::MATCH_KW,
    SyntaxKind::DEFINE_KW,
    SyntaxKind::UNDEFINE_KW,
    SyntaxKind::INSERT_KW,
    SyntaxKind::COMPUTE_KW,
];

pub(crate) fn parse_query(p: &mut Parser) {
    p.start_node(SyntaxKind::QUERY);
    match p.peek() {
        SyntaxKind::DEFINE_KW => parse_schema_clause(p, SyntaxKind::DEFINE_CLAUSE),
        SyntaxKind::UNDEFINE_KW => parse_schema_clause(p, SyntaxKind::UNDEFINE_CLAUSE),
        SyntaxKind::INSERT_KW => parse_insert_clause(p),
        SyntaxKind::MATCH_KW => parse_match_query(p),
        SyntaxKind::COMPUTE_KW => compute::parse_compute_clause(p),
        _ => p.error_recover(
            "expected a query ('match', 'define', 'undefine', 'insert', or 'compute')",
            QUERY_STARTS,
        ),
    }
    p.finish_node();
}

fn parse_schema_clause(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    parse_statements(p);
    p.finish_node();
}

fn parse_insert_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::INSERT_CLAUSE);
    p.bump();
    parse_statements(p);
    p.finish_node();
}

fn parse_statements(p: &mut Parser) {
    if !statement::can_start_statement(p.peek()) {
        p.error("expected a statement");
        return;
    }
    while statement::can_start_statement(p.peek()) {
        statement::parse_statement(p);
    }
}

/// match_query = match_clause (get_clause modifiers group? aggregate?
///              | insert_clause | delete_clause)
fn parse_match_query(p: &mut Parser) {
    p.start_node(SyntaxKind::MATCH_CLAUSE);
    p.bump();
    if !pattern::can_start_pattern(p.peek()) {
        p.error("expected a pattern after 'match'");
    }
    while pattern::can_start_pattern(p.peek()) {
        pattern::parse_pattern(p);
    }
    p.finish_node();

    match p.peek() {
        SyntaxKind::GET_KW => {
            parse_get_clause(p);
            parse_modifiers(p);
            parse_group_and_aggregate(p);
        }
        SyntaxKind::INSERT_KW => parse_insert_clause(p),
        SyntaxKind::DELETE_KW => {
            p.start_node(SyntaxKind::DELETE_CLAUSE);
            p.bump();
            parse_statements(p);
            p.finish_node();
        }
        _ => p.error("expected 'get', 'insert', or 'delete' after the match patterns"),
    }
}

/// get_clause = 'get' (var (',' var)*)? ';'
fn parse_get_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::GET_CLAUSE);
    p.bump();
    if p.at(SyntaxKind::VAR) {
        p.bump();
        while p.eat(SyntaxKind::COMMA) {
            p.expect(SyntaxKind::VAR);
        }
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.finish_node();
}

/// modifiers = (sort | offset | limit)*
fn parse_modifiers(p: &mut Parser) {
    loop {
        match p.peek() {
            SyntaxKind::SORT_KW => {
                p.start_node(SyntaxKind::SORT_CLAUSE);
                p.bump();
                p.expect(SyntaxKind::VAR);
                if p.at_any(&[SyntaxKind::ASC_KW, SyntaxKind::DESC_KW]) {
                    p.bump();
                }
                p.expect(SyntaxKind::SEMICOLON);
                p.finish_node();
            }
            SyntaxKind::OFFSET_KW => {
                p.start_node(SyntaxKind::OFFSET_CLAUSE);
                p.bump();
                p.expect(SyntaxKind::INTEGER);
                p.expect(SyntaxKind::SEMICOLON);
                p.finish_node();
            }
            SyntaxKind::LIMIT_KW => {
                p.start_node(SyntaxKind::LIMIT_CLAUSE);
                p.bump();
                p.expect(SyntaxKind::INTEGER);
                p.expect(SyntaxKind::SEMICOLON);
                p.finish_node();
            }
            _ => break,
        }
    }
}

const AGGREGATE_METHODS: &[SyntaxKind] = &[
    SyntaxKind::COUNT_KW,
    SyntaxKind::MAX_KW,
    SyntaxKind::MIN_KW,
    SyntaxKind::MEAN_KW,
    SyntaxKind::MEDIAN_KW,
    SyntaxKind::SUM_KW,
    SyntaxKind::STD_KW,
];

/// group? aggregate? after the get clause
fn parse_group_and_aggregate(p: &mut Parser) {
    if p.at(SyntaxKind::GROUP_KW) {
        p.start_node(SyntaxKind::GROUP_CLAUSE);
        p.bump();
        p.expect(SyntaxKind::VAR);
        p.expect(SyntaxKind::SEMICOLON);
        p.finish_node();
    }
    if p.at_any(AGGREGATE_METHODS) {
        p.start_node(SyntaxKind::AGGREGATE_CLAUSE);
        let is_count = p.at(SyntaxKind::COUNT_KW);
        p.bump();
        if !is_count {
            p.expect(SyntaxKind::VAR);
        }
        p.expect(SyntaxKind::SEMICOLON);
        p.finish_node();
    }
}
