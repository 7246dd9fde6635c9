//! Variable references.
//!
//! Every statement is about exactly one head reference, and constraints
//! embed further references (role players, attribute variables, comparison
//! operands). A named concept variable `$x` and a named value variable
//! `?x` with the same name are distinct references.

use smol_str::SmolStr;
use std::fmt;

/// A type label, optionally scoped to its owning relation type.
///
/// `spouse` is unscoped; `marriage:spouse` carries the scope `marriage`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    pub scope: Option<SmolStr>,
    pub name: SmolStr,
}

impl Label {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            scope: None,
            name: name.into(),
        }
    }

    pub fn scoped(scope: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            scope: Some(scope.into()),
            name: name.into(),
        }
    }
}

impl From<&str> for Label {
    /// Splits on `:` so builder call sites can write `"marriage:spouse"`.
    fn from(text: &str) -> Self {
        match text.split_once(':') {
            Some((scope, name)) => Self::scoped(scope, name),
            None => Self::new(text),
        }
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Label::from(text.as_str())
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "{}:", scope)?;
        }
        write!(f, "{}", self.name)
    }
}

/// A variable reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Named concept variable: `$x`
    Concept(SmolStr),
    /// Named value variable: `?x`
    Value(SmolStr),
    /// A type label standing in variable position
    Label(Label),
    /// Anonymous variable: `$_` when visible; hidden anonymous variables
    /// occupy an AST slot but never appear in printed output.
    Anonymous { visible: bool },
}

impl Reference {
    pub fn concept(name: impl Into<SmolStr>) -> Self {
        Self::Concept(name.into())
    }

    pub fn value(name: impl Into<SmolStr>) -> Self {
        Self::Value(name.into())
    }

    pub fn label(label: impl Into<Label>) -> Self {
        Self::Label(label.into())
    }

    /// A visible anonymous variable, printed as `$_`.
    pub fn anonymous() -> Self {
        Self::Anonymous { visible: true }
    }

    /// A hidden anonymous variable, produced for statement heads the
    /// source text omits.
    pub fn hidden() -> Self {
        Self::Anonymous { visible: false }
    }

    /// The user-given name, for named concept and value variables.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Concept(name) | Self::Value(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Self::Concept(_) | Self::Value(_))
    }

    pub fn is_concept(&self) -> bool {
        matches!(self, Self::Concept(_))
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Self::Label(_))
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }

    /// Whether the reference appears in printed output.
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Anonymous { visible: false })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concept(name) => write!(f, "${}", name),
            Self::Value(name) => write!(f, "?{}", name),
            Self::Label(label) => write!(f, "{}", label),
            Self::Anonymous { visible: true } => write!(f, "$_"),
            Self::Anonymous { visible: false } => Ok(()),
        }
    }
}
