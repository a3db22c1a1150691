//! Board states, move application and legality.
//!
//! A [`BoardState`] is an immutable snapshot: a grid, the side to move, the
//! move that produced it, and links to the two positions before it. Every move
//! (including a pass) builds a new state; nothing is mutated in place.
//!
//! The links are threaded so that the Ko rule reduces to an equality test:
//! - `opponent` is the state this one was played from (one ply back),
//! - `own_previous` is the position the same side faced two plies back.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::board::{color_slot, liberties, remove_dead, Color, Grid, LibertyTable, Point};
use crate::error::FormatError;

/// A move: a stone placement or a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Pass,
    Play(Point),
}

impl Move {
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Pass => None,
            Move::Play(pt) => Some(pt),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pass => write!(f, "PASS"),
            Move::Play((row, col)) => write!(f, "{row},{col}"),
        }
    }
}

/// Reason a placement was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// Point is off the board
    OutOfBounds,
    /// Point is not empty
    Occupied,
    /// Move would leave the placed stone without liberties after captures
    Suicide,
    /// Move recreates the position this side faced two plies ago
    Ko,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::OutOfBounds => write!(f, "illegal move: point off the board"),
            MoveError::Occupied => write!(f, "illegal move: point not empty"),
            MoveError::Suicide => write!(f, "illegal move: suicide"),
            MoveError::Ko => write!(f, "illegal move: retakes ko"),
        }
    }
}

impl std::error::Error for MoveError {}

/// An immutable position with the side to move.
pub struct BoardState {
    pub grid: Grid,
    pub to_move: Color,
    /// Move that produced this state (`Pass` for root states built from input).
    pub last: Move,
    own_previous: Option<Rc<BoardState>>,
    opponent: Option<Rc<BoardState>>,
    liberty_cache: [OnceCell<LibertyTable>; 2],
}

impl BoardState {
    /// A standalone state with no history.
    pub fn new(grid: Grid, to_move: Color) -> Self {
        Self::linked(grid, to_move, Move::Pass, None, None)
    }

    /// An empty board with Black to move.
    pub fn empty(size: usize) -> Self {
        Self::new(Grid::new(size), Color::Black)
    }

    /// A state whose previous position is `previous`, with the other side to move there.
    ///
    /// This is how boundaries rebuild the one ply of history needed for Ko:
    /// moves from the returned state are checked against `previous`.
    pub fn with_predecessor(grid: Grid, to_move: Color, previous: Grid, last: Move) -> Self {
        let previous = Rc::new(BoardState::new(previous, to_move.opponent()));
        Self::linked(grid, to_move, last, None, Some(previous))
    }

    fn linked(
        grid: Grid,
        to_move: Color,
        last: Move,
        own_previous: Option<Rc<BoardState>>,
        opponent: Option<Rc<BoardState>>,
    ) -> Self {
        Self {
            grid,
            to_move,
            last,
            own_previous,
            opponent,
            liberty_cache: [OnceCell::new(), OnceCell::new()],
        }
    }

    pub fn size(&self) -> usize {
        self.grid.size
    }

    /// The position this side faced two plies back, if known.
    pub fn own_previous(&self) -> Option<&BoardState> {
        self.own_previous.as_deref()
    }

    /// The position this state was played from, if known.
    pub fn opponent(&self) -> Option<&BoardState> {
        self.opponent.as_deref()
    }

    /// Liberty table for `color`, computed on first use.
    pub fn liberties(&self, color: Color) -> &LibertyTable {
        self.liberty_cache[color_slot(color)].get_or_init(|| liberties(&self.grid, color))
    }

    /// True if this state repeats the position this side faced two plies ago.
    pub fn is_ko(&self) -> bool {
        self.own_previous.as_deref().is_some_and(|prev| self == prev)
    }

    /// Apply a move for the side to move, without legality checks.
    ///
    /// A placement removes dead opponent groups first and only then dead groups
    /// of the mover, so a capture can save the placed stone.
    pub fn play(self: &Rc<Self>, mv: Move) -> BoardState {
        let mover = self.to_move;
        let grid = match mv {
            Move::Pass => self.grid.clone(),
            Move::Play(pt) => {
                let mut grid = self.grid.clone();
                grid.set(pt, Some(mover));
                let (grid, _) = remove_dead(&grid, mover.opponent());
                let (grid, _) = remove_dead(&grid, mover);
                grid
            }
        };
        BoardState::linked(
            grid,
            mover.opponent(),
            mv,
            self.opponent.clone(),
            Some(Rc::clone(self)),
        )
    }

    /// Apply a placement if it is legal.
    pub fn try_play(self: &Rc<Self>, pt: Point) -> Result<BoardState, MoveError> {
        if !self.grid.contains(pt) {
            return Err(MoveError::OutOfBounds);
        }
        if !self.grid.is_empty_at(pt) {
            return Err(MoveError::Occupied);
        }
        let next = self.play(Move::Play(pt));
        if next.grid.is_empty_at(pt) {
            return Err(MoveError::Suicide);
        }
        if next.is_ko() {
            return Err(MoveError::Ko);
        }
        Ok(next)
    }

    /// All legal placements in row-major order.
    pub fn legal_moves(self: &Rc<Self>) -> Vec<Point> {
        self.grid
            .points()
            .filter(|&pt| self.try_play(pt).is_ok())
            .collect()
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.to_move == other.to_move && self.grid == other.grid
    }
}

impl Eq for BoardState {}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardState")
            .field("to_move", &self.to_move)
            .field("last", &self.last)
            .field("grid", &self.grid.to_digits())
            .finish()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} to move (last: {})", self.to_move, self.last)?;
        write!(f, "{}", self.grid)
    }
}

/// Resolve captures on an arbitrary grid as if `color` had just moved.
///
/// Dead groups of the other color are removed first, then dead groups of
/// `color`. Returns the removed points in row-major order.
pub fn resolve_captures(grid: &Grid, color: Color) -> Vec<Point> {
    let (after_enemy, _) = remove_dead(grid, color.opponent());
    let (after_own, _) = remove_dead(&after_enemy, color);
    grid.points()
        .filter(|&pt| grid.get(pt) != after_own.get(pt))
        .collect()
}

/// Parse a move written as `PASS` or `row,col`.
pub fn parse_move(s: &str, size: usize) -> Result<Move, FormatError> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("pass") {
        return Ok(Move::Pass);
    }
    let bad = || FormatError::InvalidCell {
        row: 0,
        col: 0,
        value: s.to_string(),
    };
    let (r, c) = s.split_once(',').ok_or_else(bad)?;
    let row: i64 = r.trim().parse().map_err(|_| bad())?;
    let col: i64 = c.trim().parse().map_err(|_| bad())?;
    checked_point(row, col, size).map(Move::Play)
}

/// Validate a signed coordinate against the board size.
pub fn checked_point(row: i64, col: i64, size: usize) -> Result<Point, FormatError> {
    if row < 0 || col < 0 || row >= size as i64 || col >= size as i64 {
        return Err(FormatError::CoordinateOutOfRange { row, col, size });
    }
    Ok((row as usize, col as usize))
}
