//! Static evaluation: material and piece placement.

pub mod material;
pub mod pst;

use skewer_core::{Board, Color};

use crate::value::Value;

/// Evaluate a position from the side to move's perspective.
///
/// Positive means the mover stands better. The search relies on this
/// orientation: a parent negates a child's value (negamax convention).
pub fn evaluate(board: &Board) -> Value {
    let white = material::material(board) + pst::placement(board);
    match board.side_to_move() {
        Color::White => white,
        Color::Black => -white,
    }
}
