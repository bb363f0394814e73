//! Source location tracking for diagnostics.
//!
//! Parser errors report offsets in characters. `Location` turns such an
//! offset back into a 1-based line and column for human-facing messages.

/// A line/column position in the source text.
///
/// # Example
///
/// ```rust
/// use bloks_core::span::Location;
///
/// let loc = Location::from_offset("(a,\n  x)", 6);
/// assert_eq!((loc.line, loc.column), (2, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters.
    pub column: usize,
}

impl Location {
    /// Resolve a character offset against `input`.
    ///
    /// Offsets past the end clamp to the position just after the last
    /// character.
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for ch in input.chars().take(offset) {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
