//! Constants for board dimensions, scoring, search depth and the opening book.
//!
//! The engine plays on any square board, but every default here is tuned for
//! the canonical 5x5 game.

use crate::board::Point;

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN) used by the demo and by the file protocol example.
pub const DEFAULT_SIZE: usize = 5;

/// Smallest board the boundaries accept.
pub const MIN_SIZE: usize = 2;

/// Largest board the boundaries accept. Search cost grows quickly with N.
pub const MAX_SIZE: usize = 19;

/// Orthogonal neighbour offsets as (row, col) deltas: down, up, right, left.
pub const DELTA: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// =============================================================================
// Scoring
// =============================================================================

/// Komi granted to White (the second player) to offset Black's first move.
pub const KOMI: f64 = 2.5;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default search depth in plies: our candidate move, then the best reply.
pub const MAX_DEPTH: usize = 2;

/// Liberty count that marks an opposing group as one move from atari.
pub const ATARI_TARGET_LIBERTIES: u32 = 2;

// =============================================================================
// Opening Book
// =============================================================================

/// The reply book is consulted while at most this many stones are on the board.
pub const OPENING_MAX_STONES: usize = 4;

/// Number of leading scan-order points the reply book tries.
pub const OPENING_REPLY_POINTS: usize = 5;

/// Canonical 5x5 scan order: center first, spreading outward in a diamond.
pub const SCAN_ORDER_5X5: [Point; 25] = [
    (2, 2),
    (2, 3),
    (3, 2),
    (2, 1),
    (1, 2),
    (1, 1),
    (1, 3),
    (3, 1),
    (3, 3),
    (0, 2),
    (4, 2),
    (1, 0),
    (0, 1),
    (0, 3),
    (1, 4),
    (3, 0),
    (4, 1),
    (4, 3),
    (3, 4),
    (2, 0),
    (2, 4),
    (0, 0),
    (0, 4),
    (4, 0),
    (4, 4),
];
