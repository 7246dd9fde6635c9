//! Canonical serialisation of queries and patterns.
//!
//! The printer is deterministic and is the inverse of parsing: for every
//! validated AST `q`, `parse(format(q))` reconstructs a value equal to
//! `q`, in both pretty and compact modes. Strings always come out
//! double-quoted; hidden anonymous heads come out invisible.

mod options;

pub use options::FormatOptions;

use std::fmt;

use crate::parser::keywords;
use crate::syntax::compute::ComputeQuery;
use crate::syntax::constraint::{
    ComparisonRhs, Has, HasAttribute, ThingConstraint, TypeConstraint, ValueOperation,
};
use crate::syntax::pattern::Pattern;
use crate::syntax::query::{
    AggregateQuery, DefineQuery, DeleteQuery, GetQuery, GroupAggregateQuery, GroupQuery,
    InsertQuery, MatchClause, Query, UndefineQuery,
};
use crate::syntax::statement::{
    AttributeStatement, RelationStatement, Statement, ThingStatement, TypeStatement,
};
use crate::syntax::value::quoted;
use crate::syntax::variable::Label;

/// Serialise a query.
pub fn format_query(query: &Query, options: &FormatOptions) -> String {
    let formatter = Formatter { options };
    let mut parts = Vec::new();
    formatter.query_parts(query, &mut parts);
    parts.join(formatter.separator())
}

/// Serialise a pattern, terminated like a match-block line.
pub fn format_pattern(pattern: &Pattern, options: &FormatOptions) -> String {
    let formatter = Formatter { options };
    formatter.pattern_line(pattern, 0)
}

struct Formatter<'a> {
    options: &'a FormatOptions,
}

impl Formatter<'_> {
    fn separator(&self) -> &'static str {
        if self.options.pretty { "\n" } else { " " }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    fn query_parts(&self, query: &Query, parts: &mut Vec<String>) {
        match query {
            Query::Define(query) => self.define_parts(query, parts),
            Query::Undefine(query) => self.undefine_parts(query, parts),
            Query::Insert(query) => self.insert_parts(query, parts),
            Query::Delete(query) => self.delete_parts(query, parts),
            Query::Get(query) => self.get_parts(query, parts),
            Query::Aggregate(query) => self.aggregate_parts(query, parts),
            Query::Group(query) => {
                self.get_parts(query.get_query(), parts);
                parts.push(self.group_line(query));
            }
            Query::GroupAggregate(query) => self.group_aggregate_parts(query, parts),
            Query::Compute(query) => parts.push(self.compute_line(query)),
        }
    }

    fn define_parts(&self, query: &DefineQuery, parts: &mut Vec<String>) {
        parts.push(keywords::DEFINE.to_owned());
        for statement in query.statements() {
            parts.push(format!("{};", self.type_statement(statement, 0)));
        }
    }

    fn undefine_parts(&self, query: &UndefineQuery, parts: &mut Vec<String>) {
        parts.push(keywords::UNDEFINE.to_owned());
        for statement in query.statements() {
            parts.push(format!("{};", self.type_statement(statement, 0)));
        }
    }

    fn insert_parts(&self, query: &InsertQuery, parts: &mut Vec<String>) {
        if let Some(match_clause) = query.match_clause() {
            self.match_parts(match_clause, parts);
        }
        parts.push(keywords::INSERT.to_owned());
        for statement in query.statements() {
            parts.push(format!("{};", self.statement(statement, 0)));
        }
    }

    fn delete_parts(&self, query: &DeleteQuery, parts: &mut Vec<String>) {
        self.match_parts(query.match_clause(), parts);
        parts.push(keywords::DELETE.to_owned());
        for statement in query.statements() {
            parts.push(format!("{};", self.statement(statement, 0)));
        }
    }

    fn match_parts(&self, match_clause: &MatchClause, parts: &mut Vec<String>) {
        parts.push(keywords::MATCH.to_owned());
        for pattern in match_clause.patterns() {
            parts.push(self.pattern_line(pattern, 0));
        }
    }

    fn get_parts(&self, query: &GetQuery, parts: &mut Vec<String>) {
        self.match_parts(query.match_clause(), parts);

        let mut get_line = keywords::GET.to_owned();
        for (i, var) in query.filter().iter().enumerate() {
            get_line.push_str(if i == 0 { " $" } else { ", $" });
            get_line.push_str(var);
        }
        get_line.push(';');
        parts.push(get_line);

        if let Some(sorting) = query.sorting() {
            let mut line = format!("{} ${}", keywords::SORT, sorting.var);
            if let Some(order) = sorting.order {
                line.push(' ');
                line.push_str(&order.to_string());
            }
            line.push(';');
            parts.push(line);
        }
        if let Some(offset) = query.offset() {
            parts.push(format!("{} {};", keywords::OFFSET, offset));
        }
        if let Some(limit) = query.limit() {
            parts.push(format!("{} {};", keywords::LIMIT, limit));
        }
    }

    fn aggregate_parts(&self, query: &AggregateQuery, parts: &mut Vec<String>) {
        self.get_parts(query.get_query(), parts);
        parts.push(self.aggregate_line(query.method().to_string(), query.var()));
    }

    fn group_aggregate_parts(&self, query: &GroupAggregateQuery, parts: &mut Vec<String>) {
        self.get_parts(query.group_query().get_query(), parts);
        parts.push(self.group_line(query.group_query()));
        parts.push(self.aggregate_line(query.method().to_string(), query.var()));
    }

    fn group_line(&self, query: &GroupQuery) -> String {
        format!("{} ${};", keywords::GROUP, query.var())
    }

    fn aggregate_line(&self, method: String, var: Option<&str>) -> String {
        match var {
            Some(var) => format!("{} ${};", method, var),
            None => format!("{};", method),
        }
    }

    fn compute_line(&self, query: &ComputeQuery) -> String {
        let mut conditions = Vec::new();
        if let Some(id) = query.from_id() {
            conditions.push(format!("{} {}", keywords::FROM, id));
        }
        if let Some(id) = query.to_id() {
            conditions.push(format!("{} {}", keywords::TO, id));
        }
        if !query.of_types().is_empty() {
            conditions.push(format!(
                "{} {}",
                keywords::OF,
                type_set(query.of_types().iter())
            ));
        }
        if !query.in_types().is_empty() {
            conditions.push(format!(
                "{} {}",
                keywords::IN,
                type_set(query.in_types().iter())
            ));
        }
        if let Some(algorithm) = query.algorithm() {
            conditions.push(format!("{} {}", keywords::USING, algorithm));
        }
        if !query.args().is_empty() {
            let args: Vec<String> = query
                .args()
                .iter()
                .map(|(kind, value)| format!("{} = {}", kind, value))
                .collect();
            let rendered = if args.len() == 1 {
                args.into_iter().next().expect("length checked")
            } else {
                format!("[{}]", args.join(", "))
            };
            conditions.push(format!("{} {}", keywords::WHERE, rendered));
        }

        let mut line = format!("{} {}", keywords::COMPUTE, query.method());
        if !conditions.is_empty() {
            line.push(' ');
            line.push_str(&conditions.join(", "));
        }
        line.push(';');
        line
    }

    // -------------------------------------------------------------------------
    // Patterns
    // -------------------------------------------------------------------------

    /// A pattern as one line of a match or rule body, with terminator.
    fn pattern_line(&self, pattern: &Pattern, indent: usize) -> String {
        format!("{};", self.pattern(pattern, indent))
    }

    fn pattern(&self, pattern: &Pattern, indent: usize) -> String {
        match pattern {
            Pattern::Statement(statement) => self.statement(statement, indent),
            Pattern::Conjunction(conjunction) => {
                self.braced_patterns(conjunction.patterns(), indent)
            }
            Pattern::Disjunction(disjunction) => disjunction
                .patterns()
                .iter()
                .map(|branch| self.brace(branch, indent))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", keywords::OR)),
            Pattern::Negation(negation) => {
                format!("{} {}", keywords::NOT, self.brace(negation.pattern(), indent))
            }
        }
    }

    /// Render a pattern inside braces, flattening a conjunction into its
    /// member patterns.
    fn brace(&self, pattern: &Pattern, indent: usize) -> String {
        match pattern {
            Pattern::Conjunction(conjunction) => {
                self.braced_patterns(conjunction.patterns(), indent)
            }
            other => self.braced_patterns(std::slice::from_ref(other), indent),
        }
    }

    fn braced_patterns(&self, patterns: &[Pattern], indent: usize) -> String {
        let inner = patterns
            .iter()
            .map(|pattern| self.pattern_line(pattern, indent))
            .collect::<Vec<_>>()
            .join(" ");
        format!("{{ {} }}", inner)
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn statement(&self, statement: &Statement, indent: usize) -> String {
        match statement {
            Statement::Type(s) => self.type_statement(s, indent),
            Statement::Thing(s) => self.thing_statement(s),
            Statement::Relation(s) => self.relation_statement(s),
            Statement::Attribute(s) => self.attribute_statement(s),
        }
    }

    fn type_statement(&self, statement: &TypeStatement, indent: usize) -> String {
        let constraints = statement
            .constraints()
            .iter()
            .map(|constraint| self.type_constraint(constraint, indent))
            .collect::<Vec<_>>()
            .join(", ");
        join_head(statement.head().to_string(), constraints)
    }

    fn thing_statement(&self, statement: &ThingStatement) -> String {
        let constraints = statement
            .constraints()
            .iter()
            .map(|constraint| self.thing_constraint(constraint))
            .collect::<Vec<_>>()
            .join(", ");
        join_head(statement.head().to_string(), constraints)
    }

    fn relation_statement(&self, statement: &RelationStatement) -> String {
        let players = statement
            .relation()
            .role_players()
            .iter()
            .map(|role_player| match &role_player.role_type {
                Some(role) => format!("{}: {}", role, role_player.player),
                None => role_player.player.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let tuple = format!("({})", players);
        let constraints = statement
            .constraints()
            .iter()
            .map(|constraint| self.thing_constraint(constraint))
            .collect::<Vec<_>>()
            .join(", ");
        join_head(
            join_head(statement.head().to_string(), tuple),
            constraints,
        )
    }

    fn attribute_statement(&self, statement: &AttributeStatement) -> String {
        let mut pieces = vec![self.value_operation(statement.operation())];
        pieces.extend(
            statement
                .constraints()
                .iter()
                .map(|constraint| self.thing_constraint(constraint)),
        );
        join_head(statement.head().to_string(), pieces.join(", "))
    }

    // -------------------------------------------------------------------------
    // Constraints
    // -------------------------------------------------------------------------

    fn type_constraint(&self, constraint: &TypeConstraint, indent: usize) -> String {
        match constraint {
            TypeConstraint::Abstract => keywords::ABSTRACT.to_owned(),
            TypeConstraint::Label(label) => format!("{} {}", keywords::TYPE, label),
            TypeConstraint::Plays(role) => format!("{} {}", keywords::PLAYS, role),
            TypeConstraint::Regex(pattern) => format!("{} {}", keywords::REGEX, quoted(pattern)),
            TypeConstraint::Relates { role, overridden } => match overridden {
                Some(overridden) => {
                    format!("{} {} {} {}", keywords::RELATES, role, keywords::AS, overridden)
                }
                None => format!("{} {}", keywords::RELATES, role),
            },
            TypeConstraint::Sub { type_ref, exact } => {
                let keyword = if *exact { keywords::SUB_EXACT } else { keywords::SUB };
                format!("{} {}", keyword, type_ref)
            }
            TypeConstraint::ValueType(value_type) => {
                format!("{} {}", keywords::VALUE, value_type)
            }
            TypeConstraint::Owns { attribute, is_key } => {
                let keyword = if *is_key { keywords::KEY } else { keywords::HAS };
                format!("{} {}", keyword, attribute)
            }
            TypeConstraint::When(pattern) => {
                format!("{} {}", keywords::WHEN, self.rule_block(pattern, indent))
            }
            TypeConstraint::Then(statement) => format!(
                "{} {}",
                keywords::THEN,
                self.rule_statement_block(statement, indent)
            ),
        }
    }

    /// A rule body: indented one level in pretty mode.
    fn rule_block(&self, pattern: &Pattern, indent: usize) -> String {
        let patterns: &[Pattern] = match pattern {
            Pattern::Conjunction(conjunction) => conjunction.patterns(),
            other => std::slice::from_ref(other),
        };
        if !self.options.pretty {
            return self.braced_patterns(patterns, indent);
        }
        let body_indent = self.options.indent(indent + 1);
        let mut out = String::from("{\n");
        for pattern in patterns {
            out.push_str(&body_indent);
            out.push_str(&self.pattern_line(pattern, indent + 1));
            out.push('\n');
        }
        out.push_str(&self.options.indent(indent));
        out.push('}');
        out
    }

    fn rule_statement_block(&self, statement: &Statement, indent: usize) -> String {
        if !self.options.pretty {
            return format!("{{ {}; }}", self.statement(statement, indent));
        }
        format!(
            "{{\n{}{};\n{}}}",
            self.options.indent(indent + 1),
            self.statement(statement, indent + 1),
            self.options.indent(indent)
        )
    }

    fn thing_constraint(&self, constraint: &ThingConstraint) -> String {
        match constraint {
            ThingConstraint::Isa { type_ref, exact } => {
                let keyword = if *exact { keywords::ISA_EXACT } else { keywords::ISA };
                format!("{} {}", keyword, type_ref)
            }
            ThingConstraint::Has(has) => self.has(has),
            ThingConstraint::Id(id) => format!("{} {}", keywords::ID, id),
            ThingConstraint::Neq(other) => format!("{} {}", keywords::NEQ_VAR, other),
        }
    }

    fn has(&self, has: &Has) -> String {
        let keyword = if has.is_key { keywords::KEY } else { keywords::HAS };
        let mut parts = vec![keyword.to_owned()];
        if let Some(attribute_type) = &has.attribute_type {
            parts.push(attribute_type.to_string());
        }
        match &has.attribute {
            HasAttribute::Variable(var) if var.is_visible() => parts.push(var.to_string()),
            HasAttribute::Variable(_) => {}
            HasAttribute::Statement(statement) => {
                parts.push(self.value_operation(statement.operation()));
            }
        }
        parts.join(" ")
    }

    fn value_operation(&self, operation: &ValueOperation) -> String {
        match operation {
            ValueOperation::Assignment(value) => value.to_string(),
            ValueOperation::Comparison { comparator, rhs } => {
                let rhs = match rhs {
                    ComparisonRhs::Value(value) => value.to_string(),
                    ComparisonRhs::Variable(var) => var.to_string(),
                };
                format!("{} {}", comparator, rhs)
            }
        }
    }
}

/// Join a statement head with its rendered constraints, dropping the
/// space when the head is invisible or there is nothing to join.
fn join_head(head: String, rest: String) -> String {
    if head.is_empty() {
        rest
    } else if rest.is_empty() {
        head
    } else {
        format!("{} {}", head, rest)
    }
}

fn type_set<'a>(types: impl ExactSizeIterator<Item = &'a Label>) -> String {
    if types.len() == 1 {
        let mut types = types;
        types.next().expect("length checked").to_string()
    } else {
        let rendered: Vec<String> = types.map(Label::to_string).collect();
        format!("[{}]", rendered.join(", "))
    }
}

// =============================================================================
// Display entry points
// =============================================================================

impl Query {
    /// Serialise with explicit options.
    pub fn to_typeql(&self, options: &FormatOptions) -> String {
        format_query(self, options)
    }
}

impl Pattern {
    pub fn to_typeql(&self, options: &FormatOptions) -> String {
        format_pattern(self, options)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_query(self, &FormatOptions::default()))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_pattern(self, &FormatOptions::default()))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = Formatter {
            options: &FormatOptions::compact(),
        };
        f.write_str(&formatter.statement(self, 0))
    }
}

impl fmt::Display for TypeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = Formatter {
            options: &FormatOptions::compact(),
        };
        f.write_str(&formatter.type_statement(self, 0))
    }
}

impl fmt::Display for ThingStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = Formatter {
            options: &FormatOptions::compact(),
        };
        f.write_str(&formatter.thing_statement(self))
    }
}

impl fmt::Display for RelationStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = Formatter {
            options: &FormatOptions::compact(),
        };
        f.write_str(&formatter.relation_statement(self))
    }
}

impl fmt::Display for AttributeStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatter = Formatter {
            options: &FormatOptions::compact(),
        };
        f.write_str(&formatter.attribute_statement(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::statement::ThingStatement;
    use crate::syntax::variable::Reference;

    fn movie_statement() -> ThingStatement {
        ThingStatement::new(Reference::concept("x"))
            .isa("movie")
            .has("title", "Spy")
    }

    #[test]
    fn test_statement_rendering() {
        assert_eq!(
            movie_statement().to_string() + ";",
            "$x isa movie, has title \"Spy\";"
        );
    }

    #[test]
    fn test_get_query_compact_and_pretty() {
        let query: Query = MatchClause::new(vec![movie_statement().into()])
            .unwrap()
            .get(["x"])
            .unwrap()
            .into();
        assert_eq!(
            query.to_typeql(&FormatOptions::compact()),
            "match $x isa movie, has title \"Spy\"; get $x;"
        );
        assert_eq!(
            query.to_typeql(&FormatOptions::default()),
            "match\n$x isa movie, has title \"Spy\";\nget $x;"
        );
    }

    #[test]
    fn test_relation_with_hidden_head() {
        use crate::syntax::constraint::{RelationConstraint, RolePlayer, TypeRef};
        let statement: Statement = crate::syntax::statement::RelationStatement::new(
            Reference::hidden(),
            RelationConstraint::new(vec![
                RolePlayer::new(Some(TypeRef::from("wife")), Reference::concept("x")),
                RolePlayer::new(None, Reference::concept("y")),
            ]),
        )
        .isa("marriage")
        .into();
        assert_eq!(statement.to_string(), "(wife: $x, $y) isa marriage");
    }
}
