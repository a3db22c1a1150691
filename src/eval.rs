//! Static evaluation of board states.
//!
//! A position is valued by a two-component [`Utility`]: material first, then
//! a liberty-based mobility term that only breaks ties between equal material.

use crate::board::{Color, Grid};
use crate::position::BoardState;

/// Value of a position for the searching side.
///
/// Ordering is lexicographic: `material` decides and `mobility` breaks ties.
/// The derived `PartialOrd` compares fields in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Utility {
    pub material: f64,
    pub mobility: f64,
}

impl Utility {
    /// Lower bound for alpha-beta windows.
    pub const MIN: Utility = Utility::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    /// Upper bound for alpha-beta windows.
    pub const MAX: Utility = Utility::new(f64::INFINITY, f64::INFINITY);

    pub const fn new(material: f64, mobility: f64) -> Self {
        Self { material, mobility }
    }

    /// The larger of two utilities, keeping `self` on ties.
    pub fn max(self, other: Utility) -> Utility {
        if other > self { other } else { self }
    }

    /// The smaller of two utilities, keeping `self` on ties.
    pub fn min(self, other: Utility) -> Utility {
        if other < self { other } else { self }
    }
}

/// Stone difference from `perspective`'s side, adjusted by komi for White.
pub fn score(grid: &Grid, perspective: Color, komi: f64) -> f64 {
    let own = grid.count(perspective) as f64;
    let opp = grid.count(perspective.opponent()) as f64;
    let adjust = match perspective {
        Color::White => komi,
        Color::Black => -komi,
    };
    own - opp + adjust
}

/// Average group liberty count over `color`'s stones; 0 when it has none.
pub fn mobility(state: &BoardState, color: Color) -> f64 {
    let stones = state.grid.count(color);
    if stones == 0 {
        return 0.0;
    }
    state.liberties(color).total() as f64 / stones as f64
}

/// Full utility of `state` for `perspective`.
///
/// When behind on material only our own safety counts; otherwise the
/// liberty gap to the opponent is widened.
pub fn utility(state: &BoardState, perspective: Color, komi: f64) -> Utility {
    let material = score(&state.grid, perspective, komi);
    let own = mobility(state, perspective);
    let mobility = if material < 0.0 {
        own
    } else {
        own - mobility(state, perspective.opponent())
    };
    Utility::new(material, mobility)
}
