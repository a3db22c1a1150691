//! Integration tests for the rules engine: liberties, capture, suicide and Ko.

use std::rc::Rc;

use little_go::board::{liberties, Color, Grid};
use little_go::eval::mobility;
use little_go::position::{resolve_captures, BoardState, Move, MoveError};
use little_go::protocol::FileRequest;

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

/// Build a grid from digit rows (0 empty, 1 black, 2 white).
fn grid(rows: &[&str]) -> Grid {
    Grid::parse_rows(rows).expect("test grid should parse")
}

/// A standalone state with the given side to move.
fn setpos(rows: &[&str], to_move: Color) -> Rc<BoardState> {
    Rc::new(BoardState::new(grid(rows), to_move))
}

/// Play a sequence of placements from `start`, panicking on illegal moves.
fn play_all(start: &Rc<BoardState>, moves: &[(usize, usize)]) -> Rc<BoardState> {
    moves.iter().fold(Rc::clone(start), |state, &pt| {
        let next = state
            .try_play(pt)
            .unwrap_or_else(|e| panic!("move {pt:?} rejected: {e}"));
        Rc::new(next)
    })
}

/// A classic ko shape. Black captures at (1,2); White could retake at (1,1).
const KO_SHAPE: [&str; 5] = ["01200", "12020", "01200", "00000", "00000"];

// =============================================================================
// Liberty tests
// =============================================================================

#[test]
fn test_surrounded_stone_has_no_liberties() {
    let g = grid(&["00000", "00100", "01210", "00100", "00000"]);
    let white = liberties(&g, Color::White);
    assert_eq!(white.get((2, 2)), 0);
    // Black stones each keep three liberties.
    let black = liberties(&g, Color::Black);
    assert_eq!(black.get((1, 2)), 3);
    assert_eq!(black.get((2, 1)), 3);
}

#[test]
fn test_capture_removes_surrounded_stone() {
    let g = grid(&["00000", "00100", "01210", "00100", "00000"]);
    let removed = resolve_captures(&g, Color::Black);
    assert_eq!(removed, vec![(2, 2)]);
}

#[test]
fn test_capture_by_play_empties_point() {
    let start = setpos(&["00000", "00100", "01210", "00000", "00000"], Color::Black);
    let after = start.try_play((3, 2)).unwrap();
    assert_eq!(after.grid.get((2, 2)), None);
    assert_eq!(after.grid.count(Color::White), 0);
    assert_eq!(after.grid.count(Color::Black), 4);
}

#[test]
fn test_l_shaped_group_shares_liberties() {
    // Black L at (0,1), (1,1), (1,2); the white stone at (0,0) takes one
    // liberty away, leaving (0,2), (1,0), (2,1), (2,2), (1,3).
    let g = grid(&["21000", "01100", "00000", "00000", "00000"]);
    let black = liberties(&g, Color::Black);
    for pt in [(0, 1), (1, 1), (1, 2)] {
        assert_eq!(black.get(pt), 5, "stone at {pt:?}");
    }
    assert_eq!(black.get((0, 0)), 0);
    assert_eq!(black.get((2, 2)), 0);
}

#[test]
fn test_liberty_table_is_cached_per_state() {
    let s = setpos(&["100", "000", "002"], Color::Black);
    let first: *const _ = s.liberties(Color::Black);
    let second: *const _ = s.liberties(Color::Black);
    assert!(std::ptr::eq(first, second));
    assert_eq!(s.liberties(Color::White).get((2, 2)), 2);
}

// =============================================================================
// Capture order and suicide tests
// =============================================================================

#[test]
fn test_suicide_in_corner() {
    let s = setpos(&["01000", "10000", "00000", "00000", "00000"], Color::White);
    assert_eq!(s.try_play((0, 0)).err(), Some(MoveError::Suicide));
}

#[test]
fn test_suicide_of_group() {
    // White playing (0,1) would join (0,0) into a group with no liberties.
    let s = setpos(&["20100", "11000", "00000", "00000", "00000"], Color::White);
    assert_eq!(s.try_play((0, 1)).err(), Some(MoveError::Suicide));
}

#[test]
fn test_capture_before_suicide_check() {
    // Black at (0,0) has no liberties on placement, but both white
    // neighbours are captured first, which frees the corner.
    let s = setpos(&["02100", "21000", "10000", "00000", "00000"], Color::Black);
    let next = s.try_play((0, 0)).unwrap();
    assert_eq!(next.grid.get((0, 0)), Some(Color::Black));
    assert_eq!(next.grid.get((0, 1)), None);
    assert_eq!(next.grid.get((1, 0)), None);
}

#[test]
fn test_occupied_point_rejected() {
    let s = setpos(&["00000", "00000", "00100", "00000", "00000"], Color::White);
    assert_eq!(s.try_play((2, 2)).err(), Some(MoveError::Occupied));
    assert_eq!(s.try_play((5, 5)).err(), Some(MoveError::OutOfBounds));
}

// =============================================================================
// Ko tests
// =============================================================================

#[test]
fn test_ko_retake_rejected() {
    let start = setpos(&KO_SHAPE, Color::Black);
    let captured = play_all(&start, &[(1, 2)]);
    assert_eq!(captured.grid.get((1, 1)), None);

    assert_eq!(captured.try_play((1, 1)).err(), Some(MoveError::Ko));
}

#[test]
fn test_ko_rejection_is_reproducible() {
    for _ in 0..2 {
        let start = setpos(&KO_SHAPE, Color::Black);
        let captured = play_all(&start, &[(1, 2)]);
        assert_eq!(captured.try_play((1, 1)).err(), Some(MoveError::Ko));
    }
}

#[test]
fn test_ko_retake_allowed_after_exchange() {
    // After an exchange elsewhere the position two plies back differs.
    let start = setpos(&KO_SHAPE, Color::Black);
    let state = play_all(&start, &[(1, 2), (4, 4), (4, 0)]);
    let retake = state.try_play((1, 1)).unwrap();
    assert_eq!(retake.grid.get((1, 2)), None);
    assert_eq!(retake.grid.get((1, 1)), Some(Color::White));
}

#[test]
fn test_pass_then_replay_is_not_ko() {
    let start = Rc::new(BoardState::empty(5));
    let a = Rc::new(start.play(Move::Play((0, 0))));
    let b = Rc::new(a.play(Move::Pass));
    // Black's own previous position had (0,0) empty, so a stone differs.
    assert!(b.try_play((4, 4)).is_ok());
    assert!(!b.is_ko());
}

#[test]
fn test_file_request_links_ko_history() {
    // White's last position was KO_SHAPE; Black then captured at (1,2).
    let input = format!(
        "2\n{}\n{}\n",
        KO_SHAPE.join("\n"),
        ["01200", "10120", "01200", "00000", "00000"].join("\n")
    );
    let request = FileRequest::parse(&input).unwrap();
    assert_eq!(request.opponent_move(), Move::Play((1, 2)));
    let state = request.state();
    assert_eq!(state.try_play((1, 1)).err(), Some(MoveError::Ko));
    assert!(state.try_play((3, 3)).is_ok());
}

// =============================================================================
// Evaluation edge cases
// =============================================================================

#[test]
fn test_mobility_of_absent_color_is_zero() {
    let s = setpos(&["00000", "01000", "00000", "00010", "00000"], Color::White);
    assert_eq!(mobility(&s, Color::White), 0.0);
    assert_eq!(mobility(&s, Color::Black), 4.0);
}
