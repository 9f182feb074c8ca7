//! Move ordering: hash move first, captures by SEE, quiets by history.
//!
//! Ordering quality directly determines pruning efficiency — a good
//! first move makes alpha-beta skip most of the remaining siblings.

use skewer_core::{Board, Move, MoveKind, Promotion};

use crate::search::history::History;
use crate::search::see::see;
use crate::value::Depth;

/// Ordering priority of one candidate move, computed fresh per node.
pub type MoveValue = i32;

/// Score bands, highest searched first:
/// hash move > winning/equal captures > queen promotions > quiets
/// (history, 0..=16384) > underpromotions > losing captures.
const HASH_MOVE_VALUE: MoveValue = 100_000;
const WINNING_CAPTURE_BASE: MoveValue = 20_000;
const QUEEN_PROMOTION_VALUE: MoveValue = 18_000;
const UNDER_PROMOTION_VALUE: MoveValue = -1;
const LOSING_CAPTURE_BASE: MoveValue = -20_000;

/// Minimum remaining depth for a late-move reduction.
const LMR_MIN_DEPTH: Depth = 3;
/// Moves ordered before this index are never reduced.
const LMR_MIN_INDEX: usize = 4;

/// Static exchange value of a capture; 0 for non-captures.
pub fn evaluate_capture(board: &Board, mv: Move) -> MoveValue {
    see(board, mv)
}

/// Ordering priority for one move.
pub fn evaluate_move(board: &Board, mv: Move, history: &History, hash_move: Move) -> MoveValue {
    if !hash_move.is_null() && mv == hash_move {
        return HASH_MOVE_VALUE;
    }

    match mv.kind() {
        MoveKind::Promotion => {
            let gain = evaluate_capture(board, mv);
            match mv.promotion_piece() {
                Promotion::Queen => QUEEN_PROMOTION_VALUE + gain,
                _ => UNDER_PROMOTION_VALUE + gain,
            }
        }
        MoveKind::EnPassant => {
            let gain = evaluate_capture(board, mv);
            if gain >= 0 {
                WINNING_CAPTURE_BASE + gain
            } else {
                LOSING_CAPTURE_BASE + gain
            }
        }
        MoveKind::Normal if board.piece_on(mv.target()).is_some() => {
            let gain = evaluate_capture(board, mv);
            if gain >= 0 {
                WINNING_CAPTURE_BASE + gain
            } else {
                LOSING_CAPTURE_BASE + gain
            }
        }
        _ => {
            // Quiet move (including castling): past cutoff success.
            let mover = board
                .piece_on(mv.origin())
                .expect("ordered move must have a mover");
            history.score(mover.color, mover.kind, mv.target())
        }
    }
}

/// Score every move and sort descending by [`MoveValue`].
pub fn ordered_moves(
    board: &Board,
    moves: Vec<Move>,
    history: &History,
    hash_move: Move,
) -> Vec<(Move, MoveValue)> {
    let mut scored: Vec<(Move, MoveValue)> = moves
        .into_iter()
        .map(|mv| (mv, evaluate_move(board, mv, history, hash_move)))
        .collect();
    scored.sort_unstable_by(|a, b| b.1.cmp(&a.1));
    scored
}

/// Whether a move is eligible for late-move reduction.
///
/// Only quiet moves in the history band qualify, and only when they are
/// ordered late at sufficient remaining depth. Check conditions on
/// either side of the move are the caller's responsibility, since they
/// need the board state around `make`.
pub fn can_reduce_move(mv: Move, value: MoveValue, index: usize, depth: Depth) -> bool {
    depth >= LMR_MIN_DEPTH
        && index >= LMR_MIN_INDEX
        && mv.kind() == MoveKind::Normal
        && (0..QUEEN_PROMOTION_VALUE).contains(&value)
}
