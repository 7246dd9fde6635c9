//! Formatting options

/// Options for serialising queries and patterns.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Separate clauses and top-level patterns with newlines; rule
    /// bodies are indented. When false, everything joins on one line.
    pub pretty: bool,
    /// Number of spaces per indentation level in pretty mode
    pub tab_size: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            tab_size: 2,
        }
    }
}

impl FormatOptions {
    /// Single-line output.
    pub fn compact() -> Self {
        Self {
            pretty: false,
            ..Self::default()
        }
    }

    /// Generate indentation for the given level (empty in compact mode).
    pub fn indent(&self, level: usize) -> String {
        if self.pretty {
            " ".repeat(self.tab_size * level)
        } else {
            String::new()
        }
    }
}
