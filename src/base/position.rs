/// Line/column conversion for diagnostics.
///
/// Byte offsets are what the lexer and parse tree track; error reporting
/// wants 1-indexed line/column pairs and the text of the offending line.
/// A position in source code (1-indexed, as rendered in diagnostics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

/// Maps byte offsets to line/column positions.
///
/// Built once per source buffer; lookups are a binary search over the
/// recorded line starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line, beginning with 0.
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Convert a byte offset into a 1-indexed line/column pair.
    ///
    /// Offsets past the end of the buffer resolve to one past the last
    /// column of the final line, so end-of-input diagnostics point after
    /// the last character.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }

    /// Byte range of a 1-indexed line, excluding its terminating newline.
    pub fn line_range(&self, line: usize, text: &str) -> (usize, usize) {
        let idx = line.saturating_sub(1).min(self.line_starts.len() - 1);
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.len);
        let end = if end > start && text.as_bytes().get(end - 1) == Some(&b'\r') {
            end - 1
        } else {
            end
        };
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_single_line() {
        let index = LineIndex::new("match $x isa movie;");
        assert_eq!(index.line_col(0), LineCol { line: 1, column: 1 });
        assert_eq!(index.line_col(6), LineCol { line: 1, column: 7 });
    }

    #[test]
    fn test_line_col_multi_line() {
        let index = LineIndex::new("match\n$x isa movie;\nget;");
        assert_eq!(index.line_col(6), LineCol { line: 2, column: 1 });
        assert_eq!(index.line_col(20), LineCol { line: 3, column: 1 });
    }

    #[test]
    fn test_line_col_past_end() {
        let index = LineIndex::new("match $x isa ");
        let pos = index.line_col(100);
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 14);
    }

    #[test]
    fn test_line_range() {
        let text = "match\n$x isa movie;\nget;";
        let index = LineIndex::new(text);
        let (start, end) = index.line_range(2, text);
        assert_eq!(&text[start..end], "$x isa movie;");
    }
}
