//! Move ordering for the search.
//!
//! Candidates are always tried in a fixed scan order. The order bounds the
//! branching (only listed points are tried) and breaks ties: among moves of
//! equal value the one scanned first wins. Before a decision the order can be
//! re-ranked so attacks on weak opposing groups are tried first.

use crate::board::{Color, Point};
use crate::constants::{ATARI_TARGET_LIBERTIES, SCAN_ORDER_5X5};
use crate::position::BoardState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOrder {
    points: Vec<Point>,
}

impl ScanOrder {
    /// Center-outward order for a board of the given size.
    ///
    /// 5x5 uses the hand-tuned table; other sizes sort every point by
    /// Manhattan distance from the center, row-major among equals.
    pub fn canonical(size: usize) -> Self {
        if size * size == SCAN_ORDER_5X5.len() {
            return Self {
                points: SCAN_ORDER_5X5.to_vec(),
            };
        }
        let center = size / 2;
        let mut points: Vec<Point> = (0..size * size).map(|i| (i / size, i % size)).collect();
        points.sort_by_key(|&(r, c)| r.abs_diff(center) + c.abs_diff(center));
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Move `pt` to the front of the order.
    pub fn promote(&mut self, pt: Point) {
        if let Some(i) = self.points.iter().position(|&p| p == pt) {
            self.points.remove(i);
        }
        self.points.insert(0, pt);
    }

    /// Promote every empty point next to a `target` group with two liberties.
    ///
    /// Groups are visited row-major and their neighbours in down, up, right,
    /// left order, each point at most once; later promotions end up in front.
    /// Returns the number of promoted points.
    pub fn promote_atari_attacks(&mut self, state: &BoardState, target: Color) -> usize {
        let grid = &state.grid;
        let table = state.liberties(target);
        let mut seen = vec![false; grid.size * grid.size];
        let mut promoted = 0;
        for stone in table.points_with(ATARI_TARGET_LIBERTIES) {
            for nb in grid.neighbors(stone) {
                let i = nb.0 * grid.size + nb.1;
                if seen[i] {
                    continue;
                }
                seen[i] = true;
                if grid.is_empty_at(nb) {
                    self.promote(nb);
                    promoted += 1;
                }
            }
        }
        promoted
    }
}
