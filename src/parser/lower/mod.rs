//! Lowering: parse tree to AST.
//!
//! A depth-first walk over the syntax tree that produces owned AST
//! values through the same validating constructors the builder API uses.
//! Canonicalisations happen here: hidden anonymous heads, `key` folding
//! into `has` with a flag, `sub!`/`isa!` exactness flags, comparator
//! normalisation, and the `has <type> <value>` shorthand expanding to an
//! anonymous attribute statement.

pub(crate) mod pattern;

use indexmap::IndexSet;
use smol_str::SmolStr;

use crate::error::Error;
use crate::syntax::compute::{Algorithm, ArgKind, ArgValue, ComputeBuilder, ComputeMethod};
use crate::syntax::query::{
    AggregateMethod, DefineQuery, DeleteQuery, GetQuery, InsertQuery, MatchClause, Order, Query,
    UndefineQuery,
};
use crate::syntax::statement::{Statement, TypeStatement};
use crate::syntax::variable::Label;

use super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};
use pattern::StatementContext;

// =============================================================================
// Tree access helpers
// =============================================================================

pub(crate) fn child_node(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|child| child.kind() == kind)
}

pub(crate) fn child_nodes(node: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
    node.children().filter(|child| child.kind() == kind).collect()
}

pub(crate) fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + use<> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .filter(|token| !token.kind().is_trivia())
}

pub(crate) fn token_of(node: &SyntaxNode, kinds: &[SyntaxKind]) -> Option<SyntaxToken> {
    tokens(node).find(|token| kinds.contains(&token.kind()))
}

/// The name of a variable token, without its `$`/`?` sigil.
pub(crate) fn var_name(token: &SyntaxToken) -> SmolStr {
    SmolStr::from(&token.text()[1..])
}

// =============================================================================
// Queries
// =============================================================================

pub(crate) fn lower_query(root: &SyntaxNode) -> Result<Query, Error> {
    if let Some(clause) = child_node(root, SyntaxKind::DEFINE_CLAUSE) {
        return Ok(DefineQuery::new(lower_schema_statements(&clause)?)?.into());
    }
    if let Some(clause) = child_node(root, SyntaxKind::UNDEFINE_CLAUSE) {
        return Ok(UndefineQuery::new(lower_schema_statements(&clause)?)?.into());
    }
    if let Some(clause) = child_node(root, SyntaxKind::COMPUTE_CLAUSE) {
        return Ok(lower_compute(&clause)?.into());
    }

    let match_clause = match child_node(root, SyntaxKind::MATCH_CLAUSE) {
        Some(clause) => Some(lower_match_clause(&clause)?),
        None => None,
    };

    if let Some(clause) = child_node(root, SyntaxKind::INSERT_CLAUSE) {
        let statements = lower_data_statements(&clause)?;
        return Ok(InsertQuery::new(match_clause, statements)?.into());
    }
    if let Some(clause) = child_node(root, SyntaxKind::DELETE_CLAUSE) {
        let statements = lower_data_statements(&clause)?;
        let match_clause = match_clause.ok_or(Error::EmptyMatch)?;
        return Ok(DeleteQuery::new(match_clause, statements)?.into());
    }

    let get_clause = child_node(root, SyntaxKind::GET_CLAUSE).ok_or(Error::EmptyInput)?;
    let match_clause = match_clause.ok_or(Error::EmptyMatch)?;
    let get = lower_get(root, &get_clause, match_clause)?;

    let group = child_node(root, SyntaxKind::GROUP_CLAUSE);
    let aggregate = child_node(root, SyntaxKind::AGGREGATE_CLAUSE);
    match (group, aggregate) {
        (None, None) => Ok(get.into()),
        (None, Some(clause)) => {
            let (method, var) = lower_aggregate(&clause)?;
            match var {
                Some(var) => Ok(get.aggregate(method, var)?.into()),
                None => Ok(get.count().into()),
            }
        }
        (Some(clause), None) => {
            let var = group_var(&clause)?;
            Ok(get.group(var)?.into())
        }
        (Some(group_clause), Some(clause)) => {
            let group = get.group(group_var(&group_clause)?)?;
            let (method, var) = lower_aggregate(&clause)?;
            match var {
                Some(var) => Ok(group.aggregate(method, var)?.into()),
                None => Ok(group.count().into()),
            }
        }
    }
}

fn lower_match_clause(clause: &SyntaxNode) -> Result<MatchClause, Error> {
    let mut patterns = Vec::new();
    for child in clause.children() {
        patterns.push(pattern::lower_pattern(&child)?);
    }
    MatchClause::new(patterns)
}

fn lower_schema_statements(clause: &SyntaxNode) -> Result<Vec<TypeStatement>, Error> {
    let mut statements = Vec::new();
    for child in child_nodes(clause, SyntaxKind::STATEMENT) {
        match pattern::lower_statement(&child, StatementContext::Schema)? {
            Statement::Type(statement) => statements.push(statement),
            other => {
                return Err(Error::InvalidStatementKind {
                    statement: other.to_string(),
                    context: "a schema",
                });
            }
        }
    }
    Ok(statements)
}

fn lower_data_statements(clause: &SyntaxNode) -> Result<Vec<Statement>, Error> {
    let mut statements = Vec::new();
    for child in child_nodes(clause, SyntaxKind::STATEMENT) {
        statements.push(pattern::lower_statement(&child, StatementContext::Data)?);
    }
    Ok(statements)
}

fn lower_get(
    root: &SyntaxNode,
    get_clause: &SyntaxNode,
    match_clause: MatchClause,
) -> Result<GetQuery, Error> {
    let filter: IndexSet<SmolStr> = tokens(get_clause)
        .filter(|token| token.kind() == SyntaxKind::VAR)
        .map(|token| var_name(&token))
        .collect();
    let mut get = GetQuery::new(match_clause, filter)?;

    if let Some(clause) = child_node(root, SyntaxKind::SORT_CLAUSE) {
        let var = token_of(&clause, &[SyntaxKind::VAR]).ok_or(Error::EmptyInput)?;
        let order = token_of(&clause, &[SyntaxKind::ASC_KW, SyntaxKind::DESC_KW]).map(|token| {
            match token.kind() {
                SyntaxKind::ASC_KW => Order::Asc,
                _ => Order::Desc,
            }
        });
        get = get.sort(var_name(&var), order)?;
    }
    if let Some(clause) = child_node(root, SyntaxKind::OFFSET_CLAUSE) {
        get = get.with_offset(integer_of(&clause, "offset")?);
    }
    if let Some(clause) = child_node(root, SyntaxKind::LIMIT_CLAUSE) {
        get = get.with_limit(integer_of(&clause, "limit")?);
    }
    Ok(get)
}

fn integer_of(clause: &SyntaxNode, context: &'static str) -> Result<u64, Error> {
    let token = token_of(clause, &[SyntaxKind::INTEGER]).ok_or(Error::EmptyInput)?;
    token
        .text()
        .parse::<u64>()
        .map_err(|_| Error::unrecognised(token.text(), context))
}

fn lower_aggregate(clause: &SyntaxNode) -> Result<(AggregateMethod, Option<SmolStr>), Error> {
    let method = tokens(clause)
        .find_map(|token| match token.kind() {
            SyntaxKind::COUNT_KW => Some(AggregateMethod::Count),
            SyntaxKind::MAX_KW => Some(AggregateMethod::Max),
            SyntaxKind::MIN_KW => Some(AggregateMethod::Min),
            SyntaxKind::MEAN_KW => Some(AggregateMethod::Mean),
            SyntaxKind::MEDIAN_KW => Some(AggregateMethod::Median),
            SyntaxKind::SUM_KW => Some(AggregateMethod::Sum),
            SyntaxKind::STD_KW => Some(AggregateMethod::Std),
            _ => None,
        })
        .ok_or(Error::EmptyInput)?;
    let var = token_of(clause, &[SyntaxKind::VAR]).map(|token| var_name(&token));
    Ok((method, var))
}

fn group_var(clause: &SyntaxNode) -> Result<SmolStr, Error> {
    token_of(clause, &[SyntaxKind::VAR])
        .map(|token| var_name(&token))
        .ok_or(Error::EmptyInput)
}

// =============================================================================
// Compute
// =============================================================================

fn lower_compute(clause: &SyntaxNode) -> Result<crate::syntax::compute::ComputeQuery, Error> {
    let method = tokens(clause)
        .find_map(|token| match token.kind() {
            SyntaxKind::COUNT_KW => Some(ComputeMethod::Count),
            SyntaxKind::MAX_KW => Some(ComputeMethod::Max),
            SyntaxKind::MIN_KW => Some(ComputeMethod::Min),
            SyntaxKind::MEAN_KW => Some(ComputeMethod::Mean),
            SyntaxKind::MEDIAN_KW => Some(ComputeMethod::Median),
            SyntaxKind::SUM_KW => Some(ComputeMethod::Sum),
            SyntaxKind::STD_KW => Some(ComputeMethod::Std),
            SyntaxKind::PATH_KW => Some(ComputeMethod::Path),
            SyntaxKind::CENTRALITY_KW => Some(ComputeMethod::Centrality),
            SyntaxKind::CLUSTER_KW => Some(ComputeMethod::Cluster),
            _ => None,
        })
        .ok_or(Error::EmptyInput)?;

    let mut builder = ComputeBuilder::new(method);
    for condition in child_nodes(clause, SyntaxKind::COMPUTE_CONDITION) {
        let keyword = tokens(&condition).next().ok_or(Error::EmptyInput)?;
        match keyword.kind() {
            SyntaxKind::FROM_KW => {
                let id = condition_id(&condition)?;
                builder = builder.from(id)?;
            }
            SyntaxKind::TO_KW => {
                let id = condition_id(&condition)?;
                builder = builder.to(id)?;
            }
            SyntaxKind::OF_KW => {
                builder = builder.of(condition_labels(&condition))?;
            }
            SyntaxKind::IN_KW => {
                builder = builder.in_(condition_labels(&condition))?;
            }
            SyntaxKind::USING_KW => {
                let name = token_of(&condition, &[SyntaxKind::IDENT]).ok_or(Error::EmptyInput)?;
                let algorithm = Algorithm::from_name(name.text())
                    .ok_or_else(|| Error::unrecognised(name.text(), "compute algorithm"))?;
                builder = builder.using(algorithm)?;
            }
            SyntaxKind::WHERE_KW => {
                for arg in child_nodes(&condition, SyntaxKind::COMPUTE_ARG) {
                    let (kind, value) = lower_compute_arg(&arg)?;
                    builder = builder.arg(kind, value)?;
                }
            }
            _ => return Err(Error::unrecognised(keyword.text(), "compute condition")),
        }
    }
    builder.build()
}

fn condition_id(condition: &SyntaxNode) -> Result<SmolStr, Error> {
    tokens(condition)
        .nth(1)
        .map(|token| SmolStr::from(token.text()))
        .ok_or(Error::EmptyInput)
}

fn condition_labels(condition: &SyntaxNode) -> Vec<Label> {
    child_nodes(condition, SyntaxKind::LABEL_REF)
        .iter()
        .map(pattern::lower_label)
        .collect()
}

fn lower_compute_arg(arg: &SyntaxNode) -> Result<(ArgKind, ArgValue), Error> {
    let mut parts = tokens(arg);
    let name = parts.next().ok_or(Error::EmptyInput)?;
    let kind = ArgKind::from_name(name.text())
        .ok_or_else(|| Error::unrecognised(name.text(), "compute argument"))?;
    let value = parts
        .find(|token| matches!(token.kind(), SyntaxKind::INTEGER | SyntaxKind::IDENT))
        .ok_or(Error::EmptyInput)?;
    let value = match value.kind() {
        SyntaxKind::INTEGER => ArgValue::Long(
            value
                .text()
                .parse::<i64>()
                .map_err(|_| Error::unrecognised(value.text(), "compute argument value"))?,
        ),
        _ => ArgValue::Id(SmolStr::from(value.text())),
    };
    Ok((kind, value))
}
