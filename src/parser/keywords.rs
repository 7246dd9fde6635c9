//! Reserved words of the TypeQL surface grammar.
//!
//! The lexer, the lowering pass, and the formatter all spell keywords
//! through these constants so the three can never drift apart.

// Commands
pub const MATCH: &str = "match";
pub const GET: &str = "get";
pub const DEFINE: &str = "define";
pub const UNDEFINE: &str = "undefine";
pub const INSERT: &str = "insert";
pub const DELETE: &str = "delete";
pub const COMPUTE: &str = "compute";

// Schema
pub const SUB: &str = "sub";
pub const SUB_EXACT: &str = "sub!";
pub const ISA: &str = "isa";
pub const ISA_EXACT: &str = "isa!";
pub const ABSTRACT: &str = "abstract";
pub const RELATES: &str = "relates";
pub const PLAYS: &str = "plays";
pub const HAS: &str = "has";
pub const KEY: &str = "key";
pub const VALUE: &str = "value";
pub const REGEX: &str = "regex";
pub const AS: &str = "as";
pub const WHEN: &str = "when";
pub const THEN: &str = "then";
pub const RULE: &str = "rule";
pub const TYPE: &str = "type";
pub const ID: &str = "id";
pub const NOT: &str = "not";
pub const OR: &str = "or";

// Modifiers
pub const SORT: &str = "sort";
pub const OFFSET: &str = "offset";
pub const LIMIT: &str = "limit";
pub const GROUP: &str = "group";
pub const ASC: &str = "asc";
pub const DESC: &str = "desc";

// Aggregate / compute methods
pub const COUNT: &str = "count";
pub const MAX: &str = "max";
pub const MIN: &str = "min";
pub const MEAN: &str = "mean";
pub const MEDIAN: &str = "median";
pub const SUM: &str = "sum";
pub const STD: &str = "std";
pub const PATH: &str = "path";
pub const CENTRALITY: &str = "centrality";
pub const CLUSTER: &str = "cluster";

// Compute conditions
pub const FROM: &str = "from";
pub const TO: &str = "to";
pub const OF: &str = "of";
pub const IN: &str = "in";
pub const USING: &str = "using";
pub const WHERE: &str = "where";

// Compute algorithms and argument parameters.
//
// These are contextual words, not reserved tokens: `k-core` and friends
// lex as plain identifiers (the identifier grammar allows interior `-`)
// and are resolved during lowering.
pub const DEGREE: &str = "degree";
pub const K_CORE: &str = "k-core";
pub const CONNECTED_COMPONENT: &str = "connected-component";
pub const MIN_K: &str = "min-k";
pub const K: &str = "k";
pub const SIZE: &str = "size";
pub const CONTAINS: &str = "contains";

// Comparators
pub const LIKE: &str = "like";
pub const EQ: &str = "==";
pub const NEQ: &str = "!==";
pub const NEQ_VAR: &str = "!=";
pub const LT: &str = "<";
pub const LTE: &str = "<=";
pub const GT: &str = ">";
pub const GTE: &str = ">=";

// Value types
pub const LONG: &str = "long";
pub const DOUBLE: &str = "double";
pub const STRING: &str = "string";
pub const BOOLEAN: &str = "boolean";
pub const DATETIME: &str = "datetime";

// Literals
pub const TRUE: &str = "true";
pub const FALSE: &str = "false";
