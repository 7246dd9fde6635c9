//! Syntax kinds for the rowan-based parse tree.
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! It follows the shipped `typeql.pest` grammar structure.

/// All syntax kinds (tokens and nodes) in TypeQL
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation, literals).
/// Nodes are composite (queries, clauses, patterns, constraints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    COMMENT, // # ... to end of line

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,     // identifier, may contain interior '-'
    VAR,       // $x
    VAR_ANON,  // $_
    VALUE_VAR, // ?x
    INTEGER,   // 42, -7
    REAL,      // 3.14
    STRING,    // "hello" or 'hello'
    DATE,      // 2020-01-01
    DATE_TIME, // 2020-01-01T10:30:05.123

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    SEMICOLON, // ;
    COMMA,     // ,
    COLON,     // :
    L_BRACE,   // {
    R_BRACE,   // }
    L_BRACKET, // [
    R_BRACKET, // ]
    L_PAREN,   // (
    R_PAREN,   // )
    EQ,        // =
    EQ_EQ,     // ==
    BANG_EQ,   // !=  (variable inequality)
    BANG_EQ_EQ, // !== (value inequality)
    LT,        // <
    LT_EQ,     // <=
    GT,        // >
    GT_EQ,     // >=

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    // Commands
    MATCH_KW,
    GET_KW,
    DEFINE_KW,
    UNDEFINE_KW,
    INSERT_KW,
    DELETE_KW,
    COMPUTE_KW,

    // Schema
    SUB_KW,
    SUB_EXACT_KW, // sub!
    ISA_KW,
    ISA_EXACT_KW, // isa!
    ABSTRACT_KW,
    RELATES_KW,
    PLAYS_KW,
    HAS_KW,
    KEY_KW,
    VALUE_KW,
    REGEX_KW,
    AS_KW,
    WHEN_KW,
    THEN_KW,
    RULE_KW,
    TYPE_KW,
    ID_KW,

    // Patterns
    NOT_KW,
    OR_KW,

    // Modifiers
    SORT_KW,
    OFFSET_KW,
    LIMIT_KW,
    GROUP_KW,
    ASC_KW,
    DESC_KW,

    // Aggregate / compute methods
    COUNT_KW,
    MAX_KW,
    MIN_KW,
    MEAN_KW,
    MEDIAN_KW,
    SUM_KW,
    STD_KW,
    PATH_KW,
    CENTRALITY_KW,
    CLUSTER_KW,

    // Compute conditions
    FROM_KW,
    TO_KW,
    OF_KW,
    IN_KW,
    USING_KW,
    WHERE_KW,

    // Comparators
    CONTAINS_KW,
    LIKE_KW,

    // Value types
    LONG_KW,
    DOUBLE_KW,
    STRING_KW,
    BOOLEAN_KW,
    DATETIME_KW,

    // Boolean literals
    TRUE_KW,
    FALSE_KW,

    // =========================================================================
    // COMPOSITE NODES (non-terminals in the grammar)
    // =========================================================================
    // Roots
    QUERY,
    PATTERN,

    // Query clauses
    MATCH_CLAUSE,
    GET_CLAUSE,
    INSERT_CLAUSE,
    DELETE_CLAUSE,
    DEFINE_CLAUSE,
    UNDEFINE_CLAUSE,
    COMPUTE_CLAUSE,
    SORT_CLAUSE,
    OFFSET_CLAUSE,
    LIMIT_CLAUSE,
    AGGREGATE_CLAUSE,
    GROUP_CLAUSE,

    // Patterns
    CONJUNCTION,
    DISJUNCTION,
    NEGATION,
    STATEMENT,

    // Constraints
    CONSTRAINT_ISA,
    CONSTRAINT_SUB,
    CONSTRAINT_HAS,
    CONSTRAINT_PLAYS,
    CONSTRAINT_RELATES,
    CONSTRAINT_REGEX,
    CONSTRAINT_VALUE_TYPE,
    CONSTRAINT_ABSTRACT,
    CONSTRAINT_TYPE,
    CONSTRAINT_WHEN,
    CONSTRAINT_THEN,
    CONSTRAINT_ID,
    CONSTRAINT_NEQ,
    VALUE_OPERATION,
    RELATION,
    ROLE_PLAYER,

    // References
    LABEL_REF, // possibly scoped: marriage:spouse
    TYPE_REF,  // label or variable in a type position

    // Compute
    COMPUTE_CONDITION,
    COMPUTE_ARG,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::MATCH_KW as u16) && (self as u16) <= (Self::FALSE_KW as u16)
    }

    /// Check if this is a value literal token
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INTEGER
                | Self::REAL
                | Self::STRING
                | Self::DATE
                | Self::DATE_TIME
                | Self::TRUE_KW
                | Self::FALSE_KW
        )
    }

    /// Check if this token can open a value comparison
    pub fn is_comparator(self) -> bool {
        matches!(
            self,
            Self::EQ
                | Self::EQ_EQ
                | Self::BANG_EQ_EQ
                | Self::LT
                | Self::LT_EQ
                | Self::GT
                | Self::GT_EQ
                | Self::CONTAINS_KW
                | Self::LIKE_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeQLLanguage {}

impl rowan::Language for TypeQLLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<TypeQLLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TypeQLLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TypeQLLanguage>;
