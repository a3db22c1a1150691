//! Depth-bounded minimax search with alpha-beta pruning.
//!
//! This module implements the move decision:
//! - A lazily expanded game tree of [`SearchNode`]s, one child per legal move
//!   in scan order
//! - Minimax over tuple-valued [`Utility`]s with lexicographic alpha-beta bounds
//! - A small opening book that bypasses search while the board is nearly empty
//!
//! Everything that varies per decision (perspective color, re-ranked scan
//! order, node statistics) lives in a [`SearchContext`] built fresh for each
//! call, so an [`Engine`] can serve any number of unrelated decisions.

use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::board::Color;
use crate::constants::{KOMI, MAX_DEPTH, OPENING_MAX_STONES, OPENING_REPLY_POINTS};
use crate::eval::{utility, Utility};
use crate::ordering::ScanOrder;
use crate::position::{BoardState, Move};

/// Engine settings shared by every decision.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Plies searched below the root (at least 1).
    pub depth: usize,
    /// Komi granted to White in evaluations.
    pub komi: f64,
    /// Whether the opening book may answer before searching.
    pub opening_book: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: MAX_DEPTH,
            komi: KOMI,
            opening_book: true,
        }
    }
}

/// State scoped to a single decision.
#[derive(Debug)]
pub struct SearchContext {
    /// Color the whole tree is valued for: the side to move at the root.
    pub perspective: Color,
    /// Scan order for this decision, after atari re-ranking.
    pub order: ScanOrder,
    pub depth: usize,
    pub komi: f64,
    /// Nodes whose children were generated.
    pub expanded: usize,
    /// Nodes valued by the evaluator.
    pub evaluated: usize,
    /// Alpha-beta cutoffs taken.
    pub cutoffs: usize,
}

impl SearchContext {
    pub fn new(root: &BoardState, config: &SearchConfig) -> Self {
        let perspective = root.to_move;
        let mut order = ScanOrder::canonical(root.size());
        let promoted = order.promote_atari_attacks(root, perspective.opponent());
        if promoted > 0 {
            debug!(promoted, "re-ranked scan order toward weak groups");
        }
        Self {
            perspective,
            order,
            depth: config.depth.max(1),
            komi: config.komi,
            expanded: 0,
            evaluated: 0,
            cutoffs: 0,
        }
    }
}

/// A node in the search tree.
///
/// Children are generated at most once, on first need, and owned by the node.
pub struct SearchNode {
    pub state: Rc<BoardState>,
    children: Option<Vec<SearchNode>>,
    utility: Option<Utility>,
}

impl SearchNode {
    pub fn new(state: Rc<BoardState>) -> Self {
        Self {
            state,
            children: None,
            utility: None,
        }
    }

    /// Move that led to this node.
    pub fn mv(&self) -> Move {
        self.state.last
    }

    /// Memoized value, once the node has been fully searched or evaluated.
    pub fn utility(&self) -> Option<Utility> {
        self.utility
    }

    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }

    /// Children generated so far (empty before expansion).
    pub fn children(&self) -> &[SearchNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Generate one child per legal move in `order`, unless already done.
    pub fn expand(&mut self, order: &ScanOrder) -> &mut [SearchNode] {
        let state = &self.state;
        self.children.get_or_insert_with(|| {
            order
                .iter()
                .filter_map(|pt| match state.try_play(pt) {
                    Ok(next) => Some(SearchNode::new(Rc::new(next))),
                    Err(err) => {
                        trace!(?pt, %err, "candidate rejected");
                        None
                    }
                })
                .collect()
        })
    }
}

/// Outcome of one decision.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Chosen move; `Pass` when nothing legal exists.
    pub best_move: Move,
    /// Backed-up value of the root, when the tree was searched.
    pub value: Option<Utility>,
    /// True when the opening book answered without searching.
    pub from_book: bool,
    pub expanded: usize,
    pub evaluated: usize,
    pub cutoffs: usize,
}

/// The move-selection engine.
///
/// Holds only immutable settings; each call to [`Engine::search`] builds its
/// own [`SearchContext`] and tree.
#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: SearchConfig,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Choose a move for the side to move in `state`.
    pub fn decide(&self, state: &Rc<BoardState>) -> Move {
        self.search(state).best_move
    }

    /// Choose a move and report search statistics.
    pub fn search(&self, state: &Rc<BoardState>) -> SearchResult {
        if let Some(mv) = self.config.opening_book.then(|| opening_move(state)).flatten() {
            info!(%mv, color = %state.to_move, "opening book move");
            return SearchResult {
                best_move: mv,
                value: None,
                from_book: true,
                expanded: 0,
                evaluated: 0,
                cutoffs: 0,
            };
        }

        let mut ctx = SearchContext::new(state, &self.config);
        let mut root = SearchNode::new(Rc::clone(state));
        let (value, best) = max_value(&mut root, &mut ctx, Utility::MIN, Utility::MAX, 0);
        let best_move = best.map_or(Move::Pass, |i| root.children()[i].mv());

        debug!(
            expanded = ctx.expanded,
            evaluated = ctx.evaluated,
            cutoffs = ctx.cutoffs,
            material = value.material,
            mobility = value.mobility,
            "search finished"
        );
        info!(mv = %best_move, color = %state.to_move, "search move");

        SearchResult {
            best_move,
            value: Some(value),
            from_book: false,
            expanded: ctx.expanded,
            evaluated: ctx.evaluated,
            cutoffs: ctx.cutoffs,
        }
    }
}

/// Fixed answers for the first moves of a game.
///
/// On an empty board the center is played. While at most a few stones are on
/// the board, White replies with the first legal point among the leading
/// scan-order points. Returns `None` when search should decide.
pub fn opening_move(state: &Rc<BoardState>) -> Option<Move> {
    let size = state.size();
    let stones = state.grid.stone_count();
    if stones == 0 {
        return Some(Move::Play((size / 2, size / 2)));
    }
    if stones <= OPENING_MAX_STONES && state.to_move == Color::White {
        return ScanOrder::canonical(size)
            .iter()
            .take(OPENING_REPLY_POINTS)
            .find(|&pt| state.try_play(pt).is_ok())
            .map(Move::Play);
    }
    None
}

/// Value nodes at the depth limit or without legal moves; `None` otherwise.
fn leaf_value(node: &mut SearchNode, ctx: &mut SearchContext, ply: usize) -> Option<Utility> {
    if ply < ctx.depth {
        if !node.is_expanded() {
            ctx.expanded += 1;
        }
        if !node.expand(&ctx.order).is_empty() {
            return None;
        }
    }
    let u = utility(&node.state, ctx.perspective, ctx.komi);
    ctx.evaluated += 1;
    node.utility = Some(u);
    Some(u)
}

/// Maximizing step: the perspective side is to move.
///
/// Returns the value and the index of the best child. Equal values keep the
/// child scanned first.
fn max_value(
    node: &mut SearchNode,
    ctx: &mut SearchContext,
    mut alpha: Utility,
    beta: Utility,
    ply: usize,
) -> (Utility, Option<usize>) {
    if let Some(u) = node.utility {
        return (u, None);
    }
    if let Some(u) = leaf_value(node, ctx, ply) {
        return (u, None);
    }

    let mut best = Utility::MIN;
    let mut best_idx = None;
    for (i, child) in node.expand(&ctx.order).iter_mut().enumerate() {
        let v = min_value(child, ctx, alpha, beta, ply + 1);
        if v > best {
            best = v;
            best_idx = Some(i);
        }
        if best >= beta {
            ctx.cutoffs += 1;
            return (best, best_idx);
        }
        alpha = alpha.max(best);
    }
    node.utility = Some(best);
    (best, best_idx)
}

/// Minimizing step: the opponent of the perspective side is to move.
fn min_value(
    node: &mut SearchNode,
    ctx: &mut SearchContext,
    alpha: Utility,
    mut beta: Utility,
    ply: usize,
) -> Utility {
    if let Some(u) = node.utility {
        return u;
    }
    if let Some(u) = leaf_value(node, ctx, ply) {
        return u;
    }

    let mut best = Utility::MAX;
    for child in node.expand(&ctx.order).iter_mut() {
        let (v, _) = max_value(child, ctx, alpha, beta, ply + 1);
        best = best.min(v);
        if best <= alpha {
            ctx.cutoffs += 1;
            return best;
        }
        beta = beta.min(best);
    }
    node.utility = Some(best);
    best
}
