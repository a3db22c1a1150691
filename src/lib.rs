//! Little-Go: a minimax player for small-board Go.
//!
//! This crate picks the next move on a small square board (canonically 5x5)
//! under Go rules: liberties, capture, no suicide and a positional Ko check
//! against the position two plies back. Moves are chosen by a shallow minimax
//! search with alpha-beta pruning over tuple-valued utilities.
//!
//! ## Modules
//!
//! - [`constants`] - Board size, komi, search depth and opening book limits
//! - [`board`] - Grid representation and liberty counting
//! - [`position`] - Immutable board states, move application, legality and Ko
//! - [`ordering`] - Candidate scan order and atari re-ranking
//! - [`eval`] - Material and mobility evaluation
//! - [`search`] - Game tree, alpha-beta minimax and the opening book
//! - [`protocol`] - File and JSON-lines request boundaries
//! - [`error`] - Input format errors
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use little_go::position::{BoardState, Move};
//! use little_go::search::Engine;
//!
//! // Black opens on an empty 5x5 board
//! let state = Rc::new(BoardState::empty(5));
//! let engine = Engine::default();
//! assert_eq!(engine.decide(&state), Move::Play((2, 2)));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod eval;
pub mod ordering;
pub mod position;
pub mod protocol;
pub mod search;
