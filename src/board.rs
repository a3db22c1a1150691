//! Square board grid and liberty counting.
//!
//! A [`Grid`] is a flattened, row-major N x N array of cells where each cell
//! is either empty (`None`) or holds a stone of one [`Color`]. Grids are plain
//! values: applying a move always produces a new grid.

use std::fmt;
use std::str::FromStr;

use crate::constants::{DELTA, MAX_SIZE, MIN_SIZE};
use crate::error::FormatError;

/// Stone color. Black moves first; White receives komi.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Digit used by the text and JSON boundaries (1 = Black, 2 = White).
    pub fn digit(self) -> u8 {
        match self {
            Color::Black => 1,
            Color::White => 2,
        }
    }

    pub fn from_digit(d: u8) -> Option<Color> {
        match d {
            1 => Some(Color::Black),
            2 => Some(Color::White),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self.digit() as usize - 1
    }
}

impl FromStr for Color {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "black" | "b" | "1" => Ok(Color::Black),
            "white" | "w" | "2" => Ok(Color::White),
            _ => Err(FormatError::UnknownColor(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// A (row, col) coordinate, zero-indexed from the top-left corner.
pub type Point = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    pub size: usize,
    cells: Vec<Option<Color>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Parse a board from rows of digits (`0` empty, `1` Black, `2` White).
    pub fn parse_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, FormatError> {
        let digits = rows
            .iter()
            .enumerate()
            .map(|(row, line)| {
                line.as_ref()
                    .trim_end()
                    .chars()
                    .enumerate()
                    .map(|(col, c)| match c.to_digit(10) {
                        Some(d @ 0..=2) => Ok(d as u8),
                        _ => Err(FormatError::InvalidCell {
                            row,
                            col,
                            value: c.to_string(),
                        }),
                    })
                    .collect::<Result<Vec<u8>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_digits(&digits)
    }

    /// Build a board from a matrix of cell values, validating shape and values.
    pub fn from_digits(rows: &[Vec<u8>]) -> Result<Self, FormatError> {
        let size = rows.len();
        if size == 0 {
            return Err(FormatError::EmptyBoard);
        }
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
            return Err(FormatError::UnsupportedSize(size));
        }
        let mut grid = Grid::new(size);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != size {
                return Err(FormatError::NotSquare {
                    rows: size,
                    row,
                    len: values.len(),
                });
            }
            for (col, &v) in values.iter().enumerate() {
                let cell = match v {
                    0 => None,
                    d => Some(Color::from_digit(d).ok_or_else(|| FormatError::InvalidCell {
                        row,
                        col,
                        value: d.to_string(),
                    })?),
                };
                grid.set((row, col), cell);
            }
        }
        Ok(grid)
    }

    /// Rows of digits, the inverse of [`Grid::from_digits`].
    pub fn to_digits(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|c| c.map_or(0, Color::digit)).collect())
            .collect()
    }

    #[inline]
    fn idx(&self, (row, col): Point) -> usize {
        row * self.size + col
    }

    pub fn contains(&self, (row, col): Point) -> bool {
        row < self.size && col < self.size
    }

    pub fn get(&self, pt: Point) -> Option<Color> {
        if !self.contains(pt) {
            return None;
        }
        self.cells[self.idx(pt)]
    }

    pub(crate) fn set(&mut self, pt: Point, cell: Option<Color>) {
        let i = self.idx(pt);
        self.cells[i] = cell;
    }

    pub fn is_empty_at(&self, pt: Point) -> bool {
        self.contains(pt) && self.cells[self.idx(pt)].is_none()
    }

    /// Number of stones of `color` on the board.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|&&c| c == Some(color)).count()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn stone_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (0..size * size).map(move |i| (i / size, i % size))
    }

    /// Orthogonal neighbours inside the board, in down, up, right, left order.
    pub fn neighbors(&self, (row, col): Point) -> impl Iterator<Item = Point> + use<> {
        let size = self.size as isize;
        DELTA.into_iter().filter_map(move |(dr, dc)| {
            let (r, c) = (row as isize + dr, col as isize + dc);
            (r >= 0 && r < size && c >= 0 && c < size).then_some((r as usize, c as usize))
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for cell in row {
                let ch = match cell {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-cell liberty counts of one color's groups.
///
/// Every stone of a group carries the liberty count of the whole group;
/// empty cells and stones of the other color hold 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LibertyTable {
    pub size: usize,
    counts: Vec<u32>,
}

impl LibertyTable {
    pub fn get(&self, (row, col): Point) -> u32 {
        self.counts[row * self.size + col]
    }

    /// Sum of the table over all cells.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Points holding exactly `libs` liberties, row-major.
    pub fn points_with(&self, libs: u32) -> impl Iterator<Item = Point> + '_ {
        let size = self.size;
        self.counts
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == libs)
            .map(move |(i, _)| (i / size, i % size))
    }
}

/// Count liberties of every `color` group on the grid.
///
/// Each group is flood-filled through same-color stones. An empty cell reached
/// from several stones of the same group is counted once; opponent stones and
/// the board edge stop the fill.
pub fn liberties(grid: &Grid, color: Color) -> LibertyTable {
    let n = grid.size * grid.size;
    let mut counts = vec![0u32; n];
    let mut visited = vec![false; n];
    // Stamp of the group that last counted an empty cell, so shared liberties
    // are counted once per group but still counted by every adjacent group.
    let mut liberty_owner = vec![usize::MAX; n];
    let mut stack = Vec::new();
    let mut group = Vec::new();

    for start in grid.points() {
        let si = grid.idx(start);
        if visited[si] || grid.cells[si] != Some(color) {
            continue;
        }
        visited[si] = true;
        stack.push(start);
        group.clear();
        let mut libs = 0u32;

        while let Some(pt) = stack.pop() {
            group.push(grid.idx(pt));
            for nb in grid.neighbors(pt) {
                let ni = grid.idx(nb);
                match grid.cells[ni] {
                    None => {
                        if liberty_owner[ni] != si {
                            liberty_owner[ni] = si;
                            libs += 1;
                        }
                    }
                    Some(c) if c == color && !visited[ni] => {
                        visited[ni] = true;
                        stack.push(nb);
                    }
                    _ => {}
                }
            }
        }

        for &i in &group {
            counts[i] = libs;
        }
    }

    LibertyTable {
        size: grid.size,
        counts,
    }
}

/// Remove every `color` group without liberties.
///
/// Returns the cleaned grid and the removed points in row-major order.
pub fn remove_dead(grid: &Grid, color: Color) -> (Grid, Vec<Point>) {
    let table = liberties(grid, color);
    let mut out = grid.clone();
    let mut removed = Vec::new();
    for pt in grid.points() {
        if grid.get(pt) == Some(color) && table.get(pt) == 0 {
            out.set(pt, None);
            removed.push(pt);
        }
    }
    (out, removed)
}

/// Per-color slot index for caches keyed by [`Color`].
pub(crate) fn color_slot(color: Color) -> usize {
    color.index()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use quickcheck::quickcheck;

    use super::*;

    fn grid(rows: &[&str]) -> Grid {
        Grid::parse_rows(rows).unwrap()
    }

    /// Liberties of the group at `start`, counted with explicit sets.
    fn brute_force_liberties(grid: &Grid, start: Point) -> u32 {
        let color = grid.get(start).unwrap();
        let mut group = HashSet::from([start]);
        let mut libs = HashSet::new();
        let mut stack = vec![start];
        while let Some(pt) = stack.pop() {
            for nb in grid.neighbors(pt) {
                match grid.get(nb) {
                    None => {
                        libs.insert(nb);
                    }
                    Some(c) if c == color && group.insert(nb) => stack.push(nb),
                    _ => {}
                }
            }
        }
        libs.len() as u32
    }

    quickcheck! {
        fn liberties_match_brute_force(cells: Vec<u8>) -> bool {
            let size = 5;
            let mut rows = vec![vec![0u8; size]; size];
            for (i, v) in cells.iter().take(size * size).enumerate() {
                rows[i / size][i % size] = v % 3;
            }
            let grid = Grid::from_digits(&rows).unwrap();
            [Color::Black, Color::White].into_iter().all(|color| {
                let table = liberties(&grid, color);
                grid.points().all(|pt| match grid.get(pt) {
                    Some(c) if c == color => table.get(pt) == brute_force_liberties(&grid, pt),
                    _ => table.get(pt) == 0,
                })
            })
        }
    }

    #[test]
    fn test_single_stone_liberties() {
        let g = grid(&["000", "010", "000"]);
        let t = liberties(&g, Color::Black);
        assert_eq!(t.get((1, 1)), 4);
        assert_eq!(t.get((0, 0)), 0);
    }

    #[test]
    fn test_corner_and_edge_liberties() {
        let g = grid(&["100", "000", "010"]);
        let t = liberties(&g, Color::Black);
        assert_eq!(t.get((0, 0)), 2);
        assert_eq!(t.get((2, 1)), 3);
    }

    #[test]
    fn test_shared_liberty_counted_once_per_group() {
        // Two separate black stones share the liberty at (0, 1).
        let g = grid(&["101", "000", "000"]);
        let t = liberties(&g, Color::Black);
        assert_eq!(t.get((0, 0)), 2);
        assert_eq!(t.get((0, 2)), 2);
    }

    #[test]
    fn test_opponent_blocks_liberties() {
        let g = grid(&["120", "200", "000"]);
        let black = liberties(&g, Color::Black);
        assert_eq!(black.get((0, 0)), 0);
        let white = liberties(&g, Color::White);
        assert_eq!(white.get((0, 1)), 2);
        assert_eq!(white.get((1, 0)), 2);
        assert_eq!(white.get((0, 0)), 0);
    }

    #[test]
    fn test_remove_dead() {
        let g = grid(&["120", "200", "000"]);
        let (cleaned, removed) = remove_dead(&g, Color::Black);
        assert_eq!(removed, vec![(0, 0)]);
        assert_eq!(cleaned.get((0, 0)), None);
        assert_eq!(cleaned.count(Color::White), 2);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            Grid::parse_rows(&["000", "00", "000"]),
            Err(FormatError::NotSquare {
                rows: 3,
                row: 1,
                len: 2
            })
        );
        assert!(matches!(
            Grid::parse_rows(&["000", "030", "000"]),
            Err(FormatError::InvalidCell { row: 1, col: 1, .. })
        ));
        assert_eq!(Grid::parse_rows::<&str>(&[]), Err(FormatError::EmptyBoard));
    }

    #[test]
    fn test_neighbors_at_edges() {
        let g = Grid::new(5);
        assert_eq!(g.neighbors((0, 0)).count(), 2);
        assert_eq!(g.neighbors((0, 2)).count(), 3);
        assert_eq!(g.neighbors((2, 2)).count(), 4);
        assert_eq!(
            g.neighbors((2, 2)).collect::<Vec<_>>(),
            vec![(3, 2), (1, 2), (2, 3), (2, 1)]
        );
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("black".parse::<Color>(), Ok(Color::Black));
        assert_eq!("White".parse::<Color>(), Ok(Color::White));
        assert!("red".parse::<Color>().is_err());
    }
}
