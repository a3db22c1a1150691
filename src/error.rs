//! Validation errors raised while reading requests.

use std::fmt;

use crate::board::Color;

/// Malformed input rejected at a boundary before the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The input ended before all expected lines were read.
    MissingLines { expected: usize, found: usize },
    /// The side-to-move line was not `1` or `2`.
    InvalidSideToMove(String),
    /// A board had zero rows.
    EmptyBoard,
    /// A row length did not match the number of rows.
    NotSquare { rows: usize, row: usize, len: usize },
    /// The board is smaller or larger than the engine supports.
    UnsupportedSize(usize),
    /// A cell held something other than 0, 1 or 2.
    InvalidCell { row: usize, col: usize, value: String },
    /// A color name other than `black` or `white`.
    UnknownColor(String),
    /// A coordinate outside the board.
    CoordinateOutOfRange { row: i64, col: i64, size: usize },
    /// The reported last move does not hold a stone of the reported color.
    LastMoveMismatch { row: usize, col: usize, color: Color },
}

impl std::error::Error for FormatError {}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::MissingLines { expected, found } => {
                write!(f, "expected {expected} input lines, found {found}")
            }
            FormatError::InvalidSideToMove(s) => {
                write!(f, "side to move must be 1 or 2, got {s:?}")
            }
            FormatError::EmptyBoard => write!(f, "board has no rows"),
            FormatError::NotSquare { rows, row, len } => write!(
                f,
                "board is not square: {rows} rows but row {row} has {len} cells"
            ),
            FormatError::UnsupportedSize(size) => {
                write!(f, "unsupported board size {size}")
            }
            FormatError::InvalidCell { row, col, value } => write!(
                f,
                "invalid cell {value:?} at {row},{col} (expected 0, 1 or 2)"
            ),
            FormatError::UnknownColor(s) => {
                write!(f, "unknown stone color {s:?} (expected black or white)")
            }
            FormatError::CoordinateOutOfRange { row, col, size } => write!(
                f,
                "coordinate {row},{col} is outside the {size}x{size} board"
            ),
            FormatError::LastMoveMismatch { row, col, color } => {
                write!(f, "last move {row},{col} does not hold a {color} stone")
            }
        }
    }
}
