//! Request boundaries around the engine.
//!
//! Two front ends build board states, hand them to the [`Engine`] and write
//! the answer back:
//!
//! ## File protocol
//!
//! The input holds the side to move (`1` Black, `2` White) on the first line,
//! then the player's previous board and the current board as rows of digits.
//! The output is `PASS` or `row,col`.
//!
//! ```text
//! 1
//! 00000
//! 00000
//! 00100
//! 00000
//! 00000
//! 00000
//! 00000
//! 00100
//! 00200
//! 00000
//! ```
//!
//! ## JSON lines
//!
//! One request object per line, tagged by `type`:
//!
//! - `next_move`: `{"type":"next_move","board":[[..]],"last_stone_color":"black","last_point":[r,c]}`
//!   answered by `{"move":[r,c]}`, or `{"move":null}` for a pass
//! - `capture_stones`: `{"type":"capture_stones","board":[[..]],"stone_color":"white"}`
//!   answered by `{"captured":[[r,c],..]}`
//!
//! Malformed requests are answered with `{"error":".."}` and serving goes on.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, ToSocketAddrs};
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::{Color, Grid, Point};
use crate::error::FormatError;
use crate::position::{checked_point, resolve_captures, BoardState, Move};
use crate::search::Engine;

// =============================================================================
// File protocol
// =============================================================================

/// A decision request read from the file protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileRequest {
    /// Side to move.
    pub player: Color,
    /// The board right after the player's own previous move.
    pub previous: Grid,
    /// The board now, after the opponent's reply.
    pub current: Grid,
}

impl FileRequest {
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }
        let Some(side) = lines.first() else {
            return Err(FormatError::MissingLines {
                expected: 1,
                found: 0,
            });
        };
        let player = side
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(Color::from_digit)
            .ok_or_else(|| FormatError::InvalidSideToMove(side.trim().to_string()))?;

        let size = lines.get(1).map_or(0, |l| l.trim().len());
        if size == 0 {
            return Err(FormatError::EmptyBoard);
        }
        let expected = 1 + 2 * size;
        if lines.len() < expected {
            return Err(FormatError::MissingLines {
                expected,
                found: lines.len(),
            });
        }
        let previous = Grid::parse_rows(&lines[1..1 + size])?;
        let current = Grid::parse_rows(&lines[1 + size..expected])?;
        Ok(Self {
            player,
            previous,
            current,
        })
    }

    /// The opponent's last move, recovered by diffing the two boards.
    pub fn opponent_move(&self) -> Move {
        let opponent = Some(self.player.opponent());
        self.current
            .points()
            .find(|&pt| {
                self.current.get(pt) != self.previous.get(pt) && self.current.get(pt) == opponent
            })
            .map_or(Move::Pass, Move::Play)
    }

    /// The state to decide from, linked to the previous board for Ko.
    pub fn state(&self) -> Rc<BoardState> {
        Rc::new(BoardState::with_predecessor(
            self.current.clone(),
            self.player,
            self.previous.clone(),
            self.opponent_move(),
        ))
    }
}

/// Answer the request in `input` and write the move to `output`.
pub fn run_file(input: &Path, output: &Path, engine: &Engine) -> anyhow::Result<Move> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let request = FileRequest::parse(&text)
        .with_context(|| format!("malformed input in {}", input.display()))?;
    debug!(player = %request.player, "read file request");

    let mv = engine.decide(&request.state());
    fs::write(output, mv.to_string())
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(mv)
}

// =============================================================================
// JSON lines
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Choose the reply to the last move on `board`.
    NextMove {
        board: Vec<Vec<u8>>,
        last_stone_color: String,
        /// Absent when the last move was a pass.
        #[serde(default)]
        last_point: Option<[i64; 2]>,
    },
    /// Remove dead stones after `stone_color` moved.
    CaptureStones {
        board: Vec<Vec<u8>>,
        stone_color: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Move {
        #[serde(rename = "move")]
        mv: Option<[usize; 2]>,
    },
    Captured {
        captured: Vec<[usize; 2]>,
    },
    Error {
        error: String,
    },
}

fn pair((row, col): Point) -> [usize; 2] {
    [row, col]
}

/// Answer one request.
pub fn handle(request: &Request, engine: &Engine) -> Result<Response, FormatError> {
    match request {
        Request::NextMove {
            board,
            last_stone_color,
            last_point,
        } => {
            let grid = Grid::from_digits(board)?;
            let last_mover: Color = last_stone_color.parse()?;
            let mut previous = grid.clone();
            let last = match last_point {
                Some([row, col]) => {
                    let pt = checked_point(*row, *col, grid.size)?;
                    if grid.get(pt) != Some(last_mover) {
                        return Err(FormatError::LastMoveMismatch {
                            row: pt.0,
                            col: pt.1,
                            color: last_mover,
                        });
                    }
                    previous.set(pt, None);
                    Move::Play(pt)
                }
                None => Move::Pass,
            };
            let state = Rc::new(BoardState::with_predecessor(
                grid,
                last_mover.opponent(),
                previous,
                last,
            ));
            let mv = engine.decide(&state);
            Ok(Response::Move {
                mv: mv.point().map(pair),
            })
        }
        Request::CaptureStones { board, stone_color } => {
            let grid = Grid::from_digits(board)?;
            let color: Color = stone_color.parse()?;
            let captured = resolve_captures(&grid, color);
            Ok(Response::Captured {
                captured: captured.into_iter().map(pair).collect(),
            })
        }
    }
}

/// Parse and answer one JSON line; failures become error responses.
pub fn handle_line(line: &str, engine: &Engine) -> Response {
    let outcome = serde_json::from_str::<Request>(line)
        .map_err(|e| e.to_string())
        .and_then(|req| handle(&req, engine).map_err(|e| e.to_string()));
    match outcome {
        Ok(response) => response,
        Err(error) => {
            warn!(%error, "rejected request");
            Response::Error { error }
        }
    }
}

/// Serve JSON-line requests from `reader` until EOF.
///
/// Returns the number of requests answered.
pub fn serve<R: BufRead, W: Write>(reader: R, mut writer: W, engine: &Engine) -> anyhow::Result<usize> {
    let mut served = 0;
    for line in reader.lines() {
        let line = line.context("failed to read request")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = handle_line(line, engine);
        serde_json::to_writer(&mut writer, &response)?;
        writeln!(writer)?;
        writer.flush()?;
        served += 1;
    }
    Ok(served)
}

/// Accept TCP connections one at a time and serve JSON lines on each.
pub fn serve_tcp<A: ToSocketAddrs>(addr: A, engine: &Engine) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).context("failed to bind listener")?;
    info!(addr = %listener.local_addr()?, "listening");
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to accept connection");
                continue;
            }
        };
        let peer = stream.peer_addr().ok();
        let reader = BufReader::new(stream.try_clone()?);
        match serve(reader, stream, engine) {
            Ok(served) => info!(?peer, served, "connection closed"),
            Err(e) => warn!(?peer, error = %e, "connection failed"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = "1\n00000\n00000\n00100\n00000\n00000\n00000\n00000\n00100\n00200\n00000\n";

    #[test]
    fn test_parse_file_request() {
        let req = FileRequest::parse(INPUT).unwrap();
        assert_eq!(req.player, Color::Black);
        assert_eq!(req.current.get((3, 2)), Some(Color::White));
        assert_eq!(req.opponent_move(), Move::Play((3, 2)));
        let state = req.state();
        assert_eq!(state.to_move, Color::Black);
        assert!(state.opponent().is_some_and(|p| p.to_move == Color::White));
    }

    #[test]
    fn test_parse_file_request_errors() {
        assert!(matches!(
            FileRequest::parse("3\n000\n000\n000\n000\n000\n000"),
            Err(FormatError::InvalidSideToMove(_))
        ));
        assert!(matches!(
            FileRequest::parse("1\n000\n000\n000\n000"),
            Err(FormatError::MissingLines { expected: 7, found: 5 })
        ));
        assert!(matches!(
            FileRequest::parse("1\n000\n0000\n000\n000\n000\n000"),
            Err(FormatError::NotSquare { .. })
        ));
        assert!(FileRequest::parse("").is_err());
    }

    #[test]
    fn test_capture_request() {
        let line = r#"{"type":"capture_stones","board":[[0,1,0],[1,2,1],[0,1,0]],"stone_color":"black"}"#;
        let response = handle_line(line, &Engine::default());
        assert_eq!(
            response,
            Response::Captured {
                captured: vec![[1, 1]]
            }
        );
    }

    #[test]
    fn test_bad_request_reports_error() {
        let engine = Engine::default();
        let response = handle_line(r#"{"type":"capture_stones","board":[[0,1],[1]],"stone_color":"black"}"#, &engine);
        assert!(matches!(response, Response::Error { .. }));
        let response = handle_line("not json", &engine);
        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn test_next_move_checks_last_stone() {
        let engine = Engine::default();
        let empty = r#"{"type":"next_move","board":[[0,0,0],[0,1,0],[0,0,0]],"last_stone_color":"black","last_point":[0,0]}"#;
        let wrong_color = r#"{"type":"next_move","board":[[0,0,0],[0,1,0],[0,0,0]],"last_stone_color":"white","last_point":[1,1]}"#;
        for line in [empty, wrong_color] {
            let request: Request = serde_json::from_str(line).unwrap();
            assert!(matches!(
                handle(&request, &engine),
                Err(FormatError::LastMoveMismatch { .. })
            ));
        }

        let ok = r#"{"type":"next_move","board":[[0,0,0],[0,1,0],[0,0,0]],"last_stone_color":"black","last_point":[1,1]}"#;
        assert!(matches!(handle_line(ok, &engine), Response::Move { mv: Some(_) }));
    }

    #[test]
    fn test_response_json_shape() {
        let pass = serde_json::to_string(&Response::Move { mv: None }).unwrap();
        assert_eq!(pass, r#"{"move":null}"#);
        let play = serde_json::to_string(&Response::Move { mv: Some([2, 3]) }).unwrap();
        assert_eq!(play, r#"{"move":[2,3]}"#);
    }
}
