//! Search: iterative-deepening negamax with transposition and history tables.

pub mod control;
pub mod history;
pub mod negamax;
pub mod ordering;
pub mod see;
pub mod tt;

use std::time::Duration;

use skewer_core::{Board, Move, generate_legal_moves};

use control::SearchControl;
use history::History;
use negamax::{SearchContext, negamax};
use ordering::ordered_moves;
use tt::{Bound, DEFAULT_TABLE_MB, Transpositions};

use crate::value::{Depth, MAX_PLY, MAX_VALUE, MIN_VALUE, Value};

/// Result of a completed search. Immutable after return.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult {
    /// Best move at the root.
    pub best_move: Move,
    /// Value of the best move, from the mover's perspective.
    pub value: Value,
    /// Deepest fully completed iteration.
    pub depth: Depth,
    /// Wall time spent.
    pub time: Duration,
    /// Number of nodes visited.
    pub visited: u64,
}

/// The search engine.
///
/// Owns the transposition and history tables. Both persist across
/// successive [`search`](Search::search) calls on the same instance:
/// the transposition table ages by generation, and history scores carry
/// over for move-ordering continuity. Not usable by concurrent searches;
/// give each concurrent search its own instance.
pub struct Search {
    transpositions: Transpositions,
    history: History,
}

impl Search {
    /// Create a searcher with the default transposition table size.
    pub fn new() -> Self {
        Self::with_table_size(DEFAULT_TABLE_MB)
    }

    /// Create a searcher with a transposition table of `mb` megabytes.
    pub fn with_table_size(mb: usize) -> Self {
        Self {
            transpositions: Transpositions::new(mb),
            history: History::new(),
        }
    }

    /// Reallocate the transposition table (for `setoption name Hash`).
    pub fn resize_table(&mut self, mb: usize) {
        self.transpositions = Transpositions::new(mb);
    }

    /// Forget all cached search state (for `ucinewgame`).
    pub fn clear_tables(&mut self) {
        self.transpositions.clear();
        self.history.clear();
    }

    /// Find the best move for the side to move in `position`.
    ///
    /// Runs iterative deepening up to `max_depth` under `control`'s
    /// budget. `game_history` holds hashes of earlier game positions for
    /// repetition detection. `on_iter` fires after each completed
    /// iteration with (depth, value, visited, best move).
    ///
    /// Caller precondition: the position has at least one legal move.
    /// Budget exhaustion degrades the result to the deepest completed
    /// iteration but always yields a legal move.
    pub fn search<F>(
        &mut self,
        position: &mut Board,
        max_depth: Depth,
        control: &SearchControl,
        game_history: &[u64],
        mut on_iter: F,
    ) -> SearchResult
    where
        F: FnMut(Depth, Value, u64, Move),
    {
        self.transpositions.new_generation();

        let mut ctx = SearchContext {
            visited: 0,
            transpositions: &mut self.transpositions,
            history: &mut self.history,
            control,
            game_history,
            path: Vec::with_capacity(MAX_PLY),
        };

        let mut result = SearchResult {
            best_move: Move::NULL,
            value: MIN_VALUE,
            depth: 0,
            time: Duration::ZERO,
            visited: 0,
        };

        for depth in 1..=max_depth.max(1) {
            if depth > 1 && control.should_stop_iterating() {
                break;
            }

            let (value, best_move, aborted) = search_root(position, depth, &mut ctx);

            if aborted {
                // Keep the partial iteration's move only when nothing
                // completed yet, so the result is never empty.
                if result.best_move.is_null() && !best_move.is_null() {
                    result.best_move = best_move;
                    result.value = value;
                    result.depth = depth;
                }
                break;
            }

            result.best_move = best_move;
            result.value = value;
            result.depth = depth;
            tracing::debug!(depth, value, visited = ctx.visited, best = %best_move, "iteration complete");
            on_iter(depth, value, ctx.visited, best_move);
        }

        result.visited = ctx.visited;
        result.time = control.elapsed();
        result
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Search {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Search")
            .field("transpositions", &self.transpositions)
            .finish()
    }
}

/// One root iteration: order the root moves, search each child with the
/// negated window, track the best. Returns (value, best move, aborted).
fn search_root(
    board: &mut Board,
    depth: Depth,
    ctx: &mut SearchContext<'_>,
) -> (Value, Move, bool) {
    let moves = generate_legal_moves(board);
    debug_assert!(
        !moves.is_empty(),
        "search requires a position with legal moves"
    );
    if moves.is_empty() {
        return (0, Move::NULL, false);
    }

    let hash = board.hash();
    let hash_move = ctx
        .transpositions
        .probe(hash, 0)
        .map_or(Move::NULL, |e| e.best_move);
    let ordered = ordered_moves(board, moves, ctx.history, hash_move);

    let mut alpha = MIN_VALUE;
    let mut best_move = ordered[0].0;
    let mut aborted = false;

    ctx.path.push(hash);
    for &(mv, _) in &ordered {
        let undo = board.make(mv);
        let value = -negamax(board, depth - 1, 1, -MAX_VALUE, -alpha, ctx);
        board.unmake(mv, undo);

        if ctx.control.should_stop(ctx.visited) {
            aborted = true;
            break;
        }

        if value > alpha {
            alpha = value;
            best_move = mv;
        }
    }
    ctx.path.pop();

    if !aborted {
        ctx.transpositions
            .store(hash, depth, alpha, best_move, Bound::Exact, 0);
    }

    (alpha, best_move, aborted)
}
