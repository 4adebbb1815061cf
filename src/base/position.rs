/// Position tracking for diagnostics
///
/// Converts byte offsets reported by the lexer into line/column coordinates
/// for error reporting.
use text_size::TextSize;

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Compute the position of a byte offset within `text`.
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to the
    /// end of the text.
    pub fn at_offset(text: &str, offset: TextSize) -> Self {
        let offset = usize::from(offset).min(text.len());
        let mut line = 0;
        let mut column = 0;
        for (idx, ch) in text.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 0;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}
