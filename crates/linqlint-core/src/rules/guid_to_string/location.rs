//! Maps byte offsets inside a leaf's raw text to source positions.

use std::ops::Range;

/// A 1-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The position reached after walking over `text`.
    pub fn advance(self, text: &str) -> Self {
        text.chars().fold(self, |pos, ch| {
            if ch == '\n' {
                Position::new(pos.line + 1, 1)
            } else {
                Position::new(pos.line, pos.column + 1)
            }
        })
    }
}

/// Source range covered by `range` of `raw`, where `raw` starts at `start`.
/// The end is exclusive. `range` must lie on character boundaries.
pub fn locate(start: Position, raw: &str, range: Range<usize>) -> Option<(Position, Position)> {
    let before = raw.get(..range.start)?;
    let matched = raw.get(range)?;

    let from = start.advance(before);
    let to = from.advance(matched);
    Some((from, to))
}
