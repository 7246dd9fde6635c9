//! Recursive descent parser for TypeQL
//!
//! Builds a rowan GreenNode tree from tokens. The parser is
//! error-tolerant: it always produces a tree, and collects positioned
//! errors that the entry points render as caret diagnostics. Parsing a
//! query list runs this parser once per query over the shared token
//! buffer, so arbitrarily long inputs use constant stack.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};

use super::lexer::Token;
use super::syntax_kind::SyntaxKind;

/// Parse result for a single query or pattern: the green tree, any
/// errors, and how many tokens were consumed.
#[derive(Debug)]
pub(crate) struct Parse {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
    pub consumed: usize,
}

/// A positioned parse error, rendered later against the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    pub message: String,
    pub offset: usize,
    pub expected: Option<String>,
}

/// Convert a SyntaxKind to a human-readable name for error messages
pub(crate) fn kind_to_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::WHITESPACE => "whitespace",
        SyntaxKind::COMMENT => "comment",

        SyntaxKind::IDENT => "identifier",
        SyntaxKind::VAR => "variable",
        SyntaxKind::VAR_ANON => "anonymous variable",
        SyntaxKind::VALUE_VAR => "value variable",
        SyntaxKind::INTEGER => "integer",
        SyntaxKind::REAL => "number",
        SyntaxKind::STRING => "string",
        SyntaxKind::DATE => "date",
        SyntaxKind::DATE_TIME => "date-time",
        SyntaxKind::ERROR => "illegal character",

        SyntaxKind::SEMICOLON => "';'",
        SyntaxKind::COMMA => "','",
        SyntaxKind::COLON => "':'",
        SyntaxKind::L_BRACE => "'{'",
        SyntaxKind::R_BRACE => "'}'",
        SyntaxKind::L_BRACKET => "'['",
        SyntaxKind::R_BRACKET => "']'",
        SyntaxKind::L_PAREN => "'('",
        SyntaxKind::R_PAREN => "')'",
        SyntaxKind::EQ => "'='",
        SyntaxKind::EQ_EQ => "'=='",
        SyntaxKind::BANG_EQ => "'!='",
        SyntaxKind::BANG_EQ_EQ => "'!=='",
        SyntaxKind::LT => "'<'",
        SyntaxKind::LT_EQ => "'<='",
        SyntaxKind::GT => "'>'",
        SyntaxKind::GT_EQ => "'>='",

        SyntaxKind::MATCH_KW => "'match'",
        SyntaxKind::GET_KW => "'get'",
        SyntaxKind::DEFINE_KW => "'define'",
        SyntaxKind::UNDEFINE_KW => "'undefine'",
        SyntaxKind::INSERT_KW => "'insert'",
        SyntaxKind::DELETE_KW => "'delete'",
        SyntaxKind::COMPUTE_KW => "'compute'",
        SyntaxKind::SUB_KW => "'sub'",
        SyntaxKind::SUB_EXACT_KW => "'sub!'",
        SyntaxKind::ISA_KW => "'isa'",
        SyntaxKind::ISA_EXACT_KW => "'isa!'",
        SyntaxKind::ABSTRACT_KW => "'abstract'",
        SyntaxKind::RELATES_KW => "'relates'",
        SyntaxKind::PLAYS_KW => "'plays'",
        SyntaxKind::HAS_KW => "'has'",
        SyntaxKind::KEY_KW => "'key'",
        SyntaxKind::VALUE_KW => "'value'",
        SyntaxKind::REGEX_KW => "'regex'",
        SyntaxKind::AS_KW => "'as'",
        SyntaxKind::WHEN_KW => "'when'",
        SyntaxKind::THEN_KW => "'then'",
        SyntaxKind::RULE_KW => "'rule'",
        SyntaxKind::TYPE_KW => "'type'",
        SyntaxKind::ID_KW => "'id'",
        SyntaxKind::NOT_KW => "'not'",
        SyntaxKind::OR_KW => "'or'",
        SyntaxKind::SORT_KW => "'sort'",
        SyntaxKind::OFFSET_KW => "'offset'",
        SyntaxKind::LIMIT_KW => "'limit'",
        SyntaxKind::GROUP_KW => "'group'",
        SyntaxKind::ASC_KW => "'asc'",
        SyntaxKind::DESC_KW => "'desc'",
        SyntaxKind::COUNT_KW => "'count'",
        SyntaxKind::MAX_KW => "'max'",
        SyntaxKind::MIN_KW => "'min'",
        SyntaxKind::MEAN_KW => "'mean'",
        SyntaxKind::MEDIAN_KW => "'median'",
        SyntaxKind::SUM_KW => "'sum'",
        SyntaxKind::STD_KW => "'std'",
        SyntaxKind::PATH_KW => "'path'",
        SyntaxKind::CENTRALITY_KW => "'centrality'",
        SyntaxKind::CLUSTER_KW => "'cluster'",
        SyntaxKind::FROM_KW => "'from'",
        SyntaxKind::TO_KW => "'to'",
        SyntaxKind::OF_KW => "'of'",
        SyntaxKind::IN_KW => "'in'",
        SyntaxKind::USING_KW => "'using'",
        SyntaxKind::WHERE_KW => "'where'",
        SyntaxKind::CONTAINS_KW => "'contains'",
        SyntaxKind::LIKE_KW => "'like'",
        SyntaxKind::LONG_KW => "'long'",
        SyntaxKind::DOUBLE_KW => "'double'",
        SyntaxKind::STRING_KW => "'string'",
        SyntaxKind::BOOLEAN_KW => "'boolean'",
        SyntaxKind::DATETIME_KW => "'datetime'",
        SyntaxKind::TRUE_KW => "'true'",
        SyntaxKind::FALSE_KW => "'false'",

        SyntaxKind::QUERY => "query",
        SyntaxKind::PATTERN => "pattern",
        SyntaxKind::STATEMENT => "statement",
        SyntaxKind::LABEL_REF => "type label",
        SyntaxKind::TYPE_REF => "type reference",

        _ => "token",
    }
}

/// The parser state
pub(crate) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    /// Offset reported for errors at end of input.
    eof_offset: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a [Token<'a>], eof_offset: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            eof_offset,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
            consumed: self.pos,
        }
    }

    // =========================================================================
    // Token inspection (lookahead never moves past trivia implicitly)
    // =========================================================================

    fn nth_token(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    /// The next non-trivia kind; ERROR at end of input.
    pub(crate) fn peek(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.peek())
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.nth_token(0).is_none()
    }

    /// Whether `kind` appears before any of `stop` in the lookahead.
    pub(crate) fn ahead_before(&self, kind: SyntaxKind, stop: &[SyntaxKind]) -> bool {
        for token in self.tokens[self.pos..].iter().filter(|t| !t.kind.is_trivia()) {
            if token.kind == kind {
                return true;
            }
            if stop.contains(&token.kind) {
                return false;
            }
        }
        false
    }

    /// The byte offset of the next non-trivia token, or end of input.
    pub(crate) fn current_offset(&self) -> usize {
        self.nth_token(0).map(|t| t.offset).unwrap_or(self.eof_offset)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Move trivia into the tree so every consumption starts at a
    /// meaningful token.
    pub(crate) fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Consume the next non-trivia token into the tree.
    pub(crate) fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            let expected = kind_to_name(kind);
            let found = self
                .nth_token(0)
                .map(|t| kind_to_name(t.kind))
                .unwrap_or("end of input");
            self.error_expecting(format!("expected {}, found {}", expected, found), expected);
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(ParseError {
            message: message.into(),
            offset: self.current_offset(),
            expected: None,
        });
    }

    pub(crate) fn error_expecting(&mut self, message: impl Into<String>, expected: &str) {
        self.errors.push(ParseError {
            message: message.into(),
            offset: self.current_offset(),
            expected: Some(expected.to_owned()),
        });
    }

    /// Report an error, then consume tokens into an ERROR node until a
    /// recovery point. Always makes progress.
    pub(crate) fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building
    // =========================================================================

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        // Trivia belongs to the enclosing node, not the one starting.
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }
}
