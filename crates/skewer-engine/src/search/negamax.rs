//! Recursive negamax with alpha-beta pruning.
//!
//! Every value is from the perspective of the side to move at that node;
//! a parent negates its child's value before comparing. Each recursion
//! level applies exactly one move and reverts it on every exit path.

use skewer_core::{Board, Move, MoveKind, generate_legal_moves};

use crate::eval::evaluate;
use crate::search::control::SearchControl;
use crate::search::history::History;
use crate::search::ordering::{can_reduce_move, ordered_moves};
use crate::search::tt::{Bound, Transpositions};
use crate::value::{Depth, MIN_VALUE, Value, mated_in};

/// Mutable search state threaded through the recursion.
pub(super) struct SearchContext<'a> {
    /// Negamax invocations so far (the `visited` count of the result).
    pub visited: u64,
    pub transpositions: &'a mut Transpositions,
    pub history: &'a mut History,
    pub control: &'a SearchControl,
    /// Hashes of positions played before the search root.
    pub game_history: &'a [u64],
    /// Hashes of ancestors on the current search path.
    pub path: Vec<u64>,
}

impl SearchContext<'_> {
    /// Whether `hash` repeats an ancestor or a game-history position.
    fn is_repetition(&self, hash: u64) -> bool {
        self.path.iter().rev().any(|&h| h == hash)
            || self.game_history.iter().any(|&h| h == hash)
    }
}

/// Search one node. Returns the best value for the side to move.
///
/// Abort (budget exhaustion) makes children return garbage zeros, so the
/// caller must re-check the control after every child before trusting a
/// value; this function does the same for its own children.
pub(super) fn negamax(
    board: &mut Board,
    depth: Depth,
    ply: u8,
    mut alpha: Value,
    beta: Value,
    ctx: &mut SearchContext<'_>,
) -> Value {
    ctx.visited += 1;

    if ctx.control.should_stop(ctx.visited) {
        return 0;
    }

    // Draws by rule trump everything else.
    if board.halfmove_clock() >= 100 || ctx.is_repetition(board.hash()) {
        return 0;
    }

    // Transposition probe: a stored result that searched at least as
    // deep and whose bound is compatible with the window ends the node.
    let hash = board.hash();
    let mut hash_move = Move::NULL;
    if let Some(entry) = ctx.transpositions.probe(hash, ply) {
        hash_move = entry.best_move;
        if entry.depth >= depth {
            let usable = match entry.bound {
                Bound::Exact => true,
                Bound::Lower => entry.value >= beta,
                Bound::Upper => entry.value <= alpha,
            };
            if usable {
                return entry.value;
            }
        }
    }

    let moves = generate_legal_moves(board);

    // Terminal: mate scores offset by ply so nearer mates rank higher.
    if moves.is_empty() {
        return if board.in_check(board.side_to_move()) {
            mated_in(ply)
        } else {
            0
        };
    }

    if depth == 0 {
        return evaluate(board);
    }

    let us = board.side_to_move();
    let in_check = board.in_check(us);
    let original_alpha = alpha;
    let mut best_value = MIN_VALUE;
    let mut best_move = Move::NULL;
    let mut aborted = false;

    let ordered = ordered_moves(board, moves, ctx.history, hash_move);
    ctx.path.push(hash);

    for (index, &(mv, move_value)) in ordered.iter().enumerate() {
        let undo = board.make(mv);
        let gives_check = board.in_check(board.side_to_move());

        let value = if !in_check && !gives_check && can_reduce_move(mv, move_value, index, depth) {
            // Late-move reduction: try a shallower search first and only
            // pay full depth when the move beats alpha anyway.
            let reduced = -negamax(board, depth - 2, ply + 1, -beta, -alpha, ctx);
            if reduced > alpha {
                -negamax(board, depth - 1, ply + 1, -beta, -alpha, ctx)
            } else {
                reduced
            }
        } else {
            -negamax(board, depth - 1, ply + 1, -beta, -alpha, ctx)
        };

        board.unmake(mv, undo);

        if ctx.control.should_stop(ctx.visited) {
            aborted = true;
            break;
        }

        if value > best_value {
            best_value = value;
            best_move = mv;
            if value > alpha {
                alpha = value;
            }
        }

        if alpha >= beta {
            // Beta cutoff. Reward the quiet move that caused it so it is
            // tried earlier elsewhere; captures are already ordered by SEE.
            let is_quiet =
                mv.kind() == MoveKind::Normal && board.piece_on(mv.target()).is_none();
            if is_quiet && let Some(mover) = board.piece_on(mv.origin()) {
                ctx.history.reward(us, mover.kind, mv.target(), depth);
            }
            break;
        }
    }

    ctx.path.pop();

    if !aborted {
        let bound = if best_value <= original_alpha {
            Bound::Upper
        } else if best_value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        ctx.transpositions
            .store(hash, depth, best_value, best_move, bound, ply);
    }

    best_value
}
