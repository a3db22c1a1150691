//! Little-Go: a minimax player for small-board Go.
//!
//! ## Usage
//!
//! - `little-go move` - Read `input.txt`, write the chosen move to `output.txt`
//! - `little-go serve` - Answer JSON-line requests on stdin, or on TCP with `--listen`
//! - `little-go demo` - Play the engine against a random mover

use std::io;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use little_go::board::Color;
use little_go::constants::{DEFAULT_SIZE, KOMI, MAX_DEPTH, MAX_SIZE, MIN_SIZE};
use little_go::eval::score;
use little_go::position::{BoardState, Move};
use little_go::protocol::{run_file, serve, serve_tcp};
use little_go::search::{Engine, SearchConfig};

/// Little-Go: a minimax player for small-board Go
#[derive(Parser)]
#[command(name = "little-go")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search depth in plies
    #[arg(long, global = true, default_value_t = MAX_DEPTH)]
    depth: usize,

    /// Komi granted to White
    #[arg(long, global = true, default_value_t = KOMI)]
    komi: f64,

    /// Always search, even in the opening
    #[arg(long, global = true, default_value_t = false)]
    no_book: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a file request: side to move, previous board, current board
    Move {
        #[arg(short, long, default_value = "input.txt")]
        input: PathBuf,
        #[arg(short, long, default_value = "output.txt")]
        output: PathBuf,
    },
    /// Serve JSON-line requests (next_move, capture_stones)
    Serve {
        /// Address to listen on; stdin/stdout when omitted
        #[arg(long)]
        listen: Option<String>,
    },
    /// Play the engine (Black) against a random mover (White)
    Demo {
        /// RNG seed for the random mover
        #[arg(long)]
        seed: Option<u64>,
        /// Board size
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    initialize_logging(cli.log_level);

    let engine = Engine::new(SearchConfig {
        depth: cli.depth,
        komi: cli.komi,
        opening_book: !cli.no_book,
    });

    match cli.command {
        Some(Commands::Move { input, output }) => {
            let mv = run_file(&input, &output, &engine)?;
            info!(%mv, output = %output.display(), "wrote move");
        }
        Some(Commands::Serve { listen: Some(addr) }) => serve_tcp(addr.as_str(), &engine)?,
        Some(Commands::Serve { listen: None }) => {
            let served = serve(io::stdin().lock(), io::stdout().lock(), &engine)?;
            info!(served, "input closed");
        }
        Some(Commands::Demo { seed, size }) => run_demo(&engine, seed, size)?,
        None => run_demo(&engine, None, DEFAULT_SIZE)?,
    }
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}

/// A uniformly random legal placement, or a pass when none exists.
fn random_move(state: &Rc<BoardState>, rng: &mut fastrand::Rng) -> Move {
    let moves = state.legal_moves();
    if moves.is_empty() {
        return Move::Pass;
    }
    Move::Play(moves[rng.usize(..moves.len())])
}

fn run_demo(engine: &Engine, seed: Option<u64>, size: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        (MIN_SIZE..=MAX_SIZE).contains(&size),
        "board size must be between {MIN_SIZE} and {MAX_SIZE}"
    );
    let seed = seed.unwrap_or_else(|| fastrand::u64(..));
    info!(seed, size, "starting demo game");
    let mut rng = fastrand::Rng::with_seed(seed);

    println!("Little-Go: engine (X) vs random (O)\n");
    let mut state = Rc::new(BoardState::empty(size));
    let mut passes = 0;
    for turn in 1..size * size {
        let mv = match state.to_move {
            Color::Black => engine.decide(&state),
            Color::White => random_move(&state, &mut rng),
        };
        let next = match mv {
            Move::Play(pt) => state
                .try_play(pt)
                .with_context(|| format!("{} chose an illegal move {mv}", state.to_move))?,
            Move::Pass => state.play(Move::Pass),
        };
        println!("Move {turn}: {} plays {mv}", state.to_move);
        state = Rc::new(next);
        println!("{}", state.grid);

        passes = if mv == Move::Pass { passes + 1 } else { 0 };
        if passes == 2 {
            break;
        }
    }

    let black = score(&state.grid, Color::Black, engine.config().komi);
    let winner = if black > 0.0 { Color::Black } else { Color::White };
    println!("Final margin for black: {black:+.1} ({winner} wins)");
    Ok(())
}
