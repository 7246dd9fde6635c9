//! Logos-based lexer for TypeQL
//!
//! Fast tokenization using the logos crate. Trivia (whitespace and
//! `#`-to-end-of-line comments) is produced as tokens so the parse tree
//! stays lossless; the parser skips it.

use logos::Logos;

use super::syntax_kind::SyntaxKind;

/// A token with its kind, text, and byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.offset;
        self.offset += text.len();

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"#[^\n]*")]
    Comment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    // Interior '-' is allowed in identifiers, so `k-core` and `min-k`
    // lex as single identifiers and are resolved contextually.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[regex(r"\$[a-zA-Z0-9_-]+")]
    Var,

    // Priority beats the named-variable regex for the bare `$_`; a
    // longer `$_x` still lexes as a named variable by maximal munch.
    #[token("$_", priority = 10)]
    VarAnon,

    #[regex(r"\?[a-zA-Z0-9_-]+")]
    ValueVar,

    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Real,

    // Date-time fractions lex at most three digits; a longer fraction
    // leaves digits behind and the parser reports the syntax error.
    #[regex(r"[+-]?[0-9]{4,}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]{1,3})?)?")]
    DateTime,

    #[regex(r"[+-]?[0-9]{4,}-[0-9]{2}-[0-9]{2}")]
    Date,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    String,

    // =========================================================================
    // PUNCTUATION (multi-character first)
    // =========================================================================
    #[token("!==")]
    BangEqEq,

    #[token("!=")]
    BangEq,

    #[token("==")]
    EqEq,

    #[token("=")]
    Eq,

    #[token("<=")]
    LtEq,

    #[token("<")]
    Lt,

    #[token(">=")]
    GtEq,

    #[token(">")]
    Gt,

    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("match")]
    MatchKw,
    #[token("get")]
    GetKw,
    #[token("define")]
    DefineKw,
    #[token("undefine")]
    UndefineKw,
    #[token("insert")]
    InsertKw,
    #[token("delete")]
    DeleteKw,
    #[token("compute")]
    ComputeKw,

    #[token("sub!")]
    SubExactKw,
    #[token("sub")]
    SubKw,
    #[token("isa!")]
    IsaExactKw,
    #[token("isa")]
    IsaKw,
    #[token("abstract")]
    AbstractKw,
    #[token("relates")]
    RelatesKw,
    #[token("plays")]
    PlaysKw,
    #[token("has")]
    HasKw,
    #[token("key")]
    KeyKw,
    #[token("value")]
    ValueKw,
    #[token("regex")]
    RegexKw,
    #[token("as")]
    AsKw,
    #[token("when")]
    WhenKw,
    #[token("then")]
    ThenKw,
    #[token("rule")]
    RuleKw,
    #[token("type")]
    TypeKw,
    #[token("id")]
    IdKw,

    #[token("not")]
    NotKw,
    #[token("or")]
    OrKw,

    #[token("sort")]
    SortKw,
    #[token("offset")]
    OffsetKw,
    #[token("limit")]
    LimitKw,
    #[token("group")]
    GroupKw,
    #[token("asc")]
    AscKw,
    #[token("desc")]
    DescKw,

    #[token("count")]
    CountKw,
    #[token("max")]
    MaxKw,
    #[token("min")]
    MinKw,
    #[token("mean")]
    MeanKw,
    #[token("median")]
    MedianKw,
    #[token("sum")]
    SumKw,
    #[token("std")]
    StdKw,
    #[token("path")]
    PathKw,
    #[token("centrality")]
    CentralityKw,
    #[token("cluster")]
    ClusterKw,

    #[token("from")]
    FromKw,
    #[token("to")]
    ToKw,
    #[token("of")]
    OfKw,
    #[token("in")]
    InKw,
    #[token("using")]
    UsingKw,
    #[token("where")]
    WhereKw,

    #[token("contains")]
    ContainsKw,
    #[token("like")]
    LikeKw,

    #[token("long")]
    LongKw,
    #[token("double")]
    DoubleKw,
    #[token("string")]
    StringKw,
    #[token("boolean")]
    BooleanKw,
    #[token("datetime")]
    DatetimeKw,

    #[token("true")]
    TrueKw,
    #[token("false")]
    FalseKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            Comment => SyntaxKind::COMMENT,

            // Literals
            Ident => SyntaxKind::IDENT,
            Var => SyntaxKind::VAR,
            VarAnon => SyntaxKind::VAR_ANON,
            ValueVar => SyntaxKind::VALUE_VAR,
            Integer => SyntaxKind::INTEGER,
            Real => SyntaxKind::REAL,
            DateTime => SyntaxKind::DATE_TIME,
            Date => SyntaxKind::DATE,
            String => SyntaxKind::STRING,

            // Punctuation
            BangEqEq => SyntaxKind::BANG_EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            EqEq => SyntaxKind::EQ_EQ,
            Eq => SyntaxKind::EQ,
            LtEq => SyntaxKind::LT_EQ,
            Lt => SyntaxKind::LT,
            GtEq => SyntaxKind::GT_EQ,
            Gt => SyntaxKind::GT,
            Semicolon => SyntaxKind::SEMICOLON,
            Comma => SyntaxKind::COMMA,
            Colon => SyntaxKind::COLON,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,

            // Keywords
            MatchKw => SyntaxKind::MATCH_KW,
            GetKw => SyntaxKind::GET_KW,
            DefineKw => SyntaxKind::DEFINE_KW,
            UndefineKw => SyntaxKind::UNDEFINE_KW,
            InsertKw => SyntaxKind::INSERT_KW,
            DeleteKw => SyntaxKind::DELETE_KW,
            ComputeKw => SyntaxKind::COMPUTE_KW,
            SubExactKw => SyntaxKind::SUB_EXACT_KW,
            SubKw => SyntaxKind::SUB_KW,
            IsaExactKw => SyntaxKind::ISA_EXACT_KW,
            IsaKw => SyntaxKind::ISA_KW,
            AbstractKw => SyntaxKind::ABSTRACT_KW,
            RelatesKw => SyntaxKind::RELATES_KW,
            PlaysKw => SyntaxKind::PLAYS_KW,
            HasKw => SyntaxKind::HAS_KW,
            KeyKw => SyntaxKind::KEY_KW,
            ValueKw => SyntaxKind::VALUE_KW,
            RegexKw => SyntaxKind::REGEX_KW,
            AsKw => SyntaxKind::AS_KW,
            WhenKw => SyntaxKind::WHEN_KW,
            ThenKw => SyntaxKind::THEN_KW,
            RuleKw => SyntaxKind::RULE_KW,
            TypeKw => SyntaxKind::TYPE_KW,
            IdKw => SyntaxKind::ID_KW,
            NotKw => SyntaxKind::NOT_KW,
            OrKw => SyntaxKind::OR_KW,
            SortKw => SyntaxKind::SORT_KW,
            OffsetKw => SyntaxKind::OFFSET_KW,
            LimitKw => SyntaxKind::LIMIT_KW,
            GroupKw => SyntaxKind::GROUP_KW,
            AscKw => SyntaxKind::ASC_KW,
            DescKw => SyntaxKind::DESC_KW,
            CountKw => SyntaxKind::COUNT_KW,
            MaxKw => SyntaxKind::MAX_KW,
            MinKw => SyntaxKind::MIN_KW,
            MeanKw => SyntaxKind::MEAN_KW,
            MedianKw => SyntaxKind::MEDIAN_KW,
            SumKw => SyntaxKind::SUM_KW,
            StdKw => SyntaxKind::STD_KW,
            PathKw => SyntaxKind::PATH_KW,
            CentralityKw => SyntaxKind::CENTRALITY_KW,
            ClusterKw => SyntaxKind::CLUSTER_KW,
            FromKw => SyntaxKind::FROM_KW,
            ToKw => SyntaxKind::TO_KW,
            OfKw => SyntaxKind::OF_KW,
            InKw => SyntaxKind::IN_KW,
            UsingKw => SyntaxKind::USING_KW,
            WhereKw => SyntaxKind::WHERE_KW,
            ContainsKw => SyntaxKind::CONTAINS_KW,
            LikeKw => SyntaxKind::LIKE_KW,
            LongKw => SyntaxKind::LONG_KW,
            DoubleKw => SyntaxKind::DOUBLE_KW,
            StringKw => SyntaxKind::STRING_KW,
            BooleanKw => SyntaxKind::BOOLEAN_KW,
            DatetimeKw => SyntaxKind::DATETIME_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            FalseKw => SyntaxKind::FALSE_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_lex_simple_match() {
        assert_eq!(
            kinds("match $x isa movie; get;"),
            vec![
                SyntaxKind::MATCH_KW,
                SyntaxKind::VAR,
                SyntaxKind::ISA_KW,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON,
                SyntaxKind::GET_KW,
                SyntaxKind::SEMICOLON,
            ]
        );
    }

    #[test]
    fn test_lex_comment_is_trivia() {
        let tokens = tokenize("# a comment\nmatch");
        assert_eq!(tokens[0].kind, SyntaxKind::COMMENT);
        assert_eq!(tokens[1].kind, SyntaxKind::WHITESPACE);
        assert_eq!(tokens[2].kind, SyntaxKind::MATCH_KW);
    }

    #[test]
    fn test_lex_variables() {
        assert_eq!(
            kinds("$x $_ $_hidden ?v"),
            vec![
                SyntaxKind::VAR,
                SyntaxKind::VAR_ANON,
                SyntaxKind::VAR,
                SyntaxKind::VALUE_VAR,
            ]
        );
    }

    #[test]
    fn test_lex_dashed_identifiers() {
        let tokens = tokenize("k-core connected-component min-k");
        let idents: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == SyntaxKind::IDENT)
            .map(|t| t.text)
            .collect();
        assert_eq!(idents, vec!["k-core", "connected-component", "min-k"]);
    }

    #[test]
    fn test_lex_exact_keywords() {
        assert_eq!(
            kinds("sub sub! isa isa!"),
            vec![
                SyntaxKind::SUB_KW,
                SyntaxKind::SUB_EXACT_KW,
                SyntaxKind::ISA_KW,
                SyntaxKind::ISA_EXACT_KW,
            ]
        );
    }

    #[test]
    fn test_lex_dates() {
        assert_eq!(kinds("1000-11-12"), vec![SyntaxKind::DATE]);
        assert_eq!(kinds("1000-11-12T13:14:15.123"), vec![SyntaxKind::DATE_TIME]);
        assert_eq!(kinds("+12345-01-01"), vec![SyntaxKind::DATE]);
        assert_eq!(kinds("-0042-01-01"), vec![SyntaxKind::DATE]);
        // A sub-millisecond fraction does not extend the date-time token.
        assert_eq!(
            kinds("1000-11-12T13:14:15.000123456"),
            vec![SyntaxKind::DATE_TIME, SyntaxKind::INTEGER]
        );
    }

    #[test]
    fn test_lex_strings_either_quote() {
        assert_eq!(kinds(r#""double" 'single'"#), vec![
            SyntaxKind::STRING,
            SyntaxKind::STRING
        ]);
    }

    #[test]
    fn test_lex_comparators() {
        assert_eq!(
            kinds("= == != !== < <= > >="),
            vec![
                SyntaxKind::EQ,
                SyntaxKind::EQ_EQ,
                SyntaxKind::BANG_EQ,
                SyntaxKind::BANG_EQ_EQ,
                SyntaxKind::LT,
                SyntaxKind::LT_EQ,
                SyntaxKind::GT,
                SyntaxKind::GT_EQ,
            ]
        );
    }

    #[test]
    fn test_lex_illegal_character() {
        let tokens = tokenize("match @");
        assert!(tokens.iter().any(|t| t.kind == SyntaxKind::ERROR));
    }
}
