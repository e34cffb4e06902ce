//! Source locations.
//!
//! Tokens carry the points the tokenizer assigned to them. The compiler never
//! stores those points directly: every point that ends up in the tree is
//! copied through [`StartPoint::rebase`], which shifts it onto the point the
//! markdown value started at.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One place in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Line in the source file (1-indexed).
    pub line: usize,
    /// Column in the source file (1-indexed).
    pub column: usize,
    /// Byte offset in the source file (0-indexed).
    pub offset: usize,
}

impl Point {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Location of a node in a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// A zero-width position at `point`.
    pub fn at(point: Point) -> Self {
        Self::new(point, point)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Point before the first character of the markdown value.
///
/// Tokenizers count from `1:1` (offset `0`). When the value being compiled was
/// cut out of a larger document, node positions should be relative to where
/// it was cut from instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartPoint(Point);

impl StartPoint {
    pub fn new(point: Point) -> Self {
        Self(point)
    }

    pub fn point(&self) -> Point {
        self.0
    }

    /// Copy `point` into a tree point relative to this start.
    ///
    /// Lines and offsets shift by the start's distance from `1:1`/`0`.
    /// Columns only shift on the first line: later lines begin at column 1
    /// regardless of where the value started.
    pub fn rebase(&self, point: &Point) -> Point {
        let from = self.0;
        let column = if point.line == 1 {
            point.column + from.column.saturating_sub(1)
        } else {
            point.column
        };

        Point {
            line: point.line + from.line.saturating_sub(1),
            column,
            offset: point.offset + from.offset,
        }
    }

    pub fn rebase_position(&self, start: &Point, end: &Point) -> Position {
        Position::new(self.rebase(start), self.rebase(end))
    }
}

impl From<Point> for StartPoint {
    fn from(point: Point) -> Self {
        Self(point)
    }
}
