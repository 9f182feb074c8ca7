//! Piece-square tables.
//!
//! Tables are written visually: the first row is rank 8, the last row is
//! rank 1, files a through h left to right. A White piece on square `s`
//! reads `TABLE[s.flip_rank()]`; a Black piece reads `TABLE[s]` with the
//! sign flipped. The mirrored indexing makes the tables color-symmetric
//! by construction.

use skewer_core::{Board, Color, PieceKind, Square};

use crate::value::Value;

#[rustfmt::skip]
const PAWN: [Value; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [Value; 64] = [
   -50,-40,-30,-30,-30,-30,-40,-50,
   -40,-20,  0,  0,  0,  0,-20,-40,
   -30,  0, 10, 15, 15, 10,  0,-30,
   -30,  5, 15, 20, 20, 15,  5,-30,
   -30,  0, 15, 20, 20, 15,  0,-30,
   -30,  5, 10, 15, 15, 10,  5,-30,
   -40,-20,  0,  5,  5,  0,-20,-40,
   -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP: [Value; 64] = [
   -20,-10,-10,-10,-10,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5, 10, 10,  5,  0,-10,
   -10,  5,  5, 10, 10,  5,  5,-10,
   -10,  0, 10, 10, 10, 10,  0,-10,
   -10, 10, 10, 10, 10, 10, 10,-10,
   -10,  5,  0,  0,  0,  0,  5,-10,
   -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK: [Value; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN: [Value; 64] = [
   -20,-10,-10, -5, -5,-10,-10,-20,
   -10,  0,  0,  0,  0,  0,  0,-10,
   -10,  0,  5,  5,  5,  5,  0,-10,
    -5,  0,  5,  5,  5,  5,  0, -5,
     0,  0,  5,  5,  5,  5,  0, -5,
   -10,  5,  5,  5,  5,  5,  0,-10,
   -10,  0,  5,  0,  0,  0,  0,-10,
   -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING: [Value; 64] = [
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -10,-20,-20,-20,-20,-20,-20,-10,
    20, 20,  0,  0,  0,  0, 20, 20,
    20, 30, 10,  0,  0, 10, 30, 20,
];

/// Table lookup for one piece kind, in visual (rank-8-first) indexing.
fn table(kind: PieceKind) -> &'static [Value; 64] {
    match kind {
        PieceKind::Pawn => &PAWN,
        PieceKind::Knight => &KNIGHT,
        PieceKind::Bishop => &BISHOP,
        PieceKind::Rook => &ROOK,
        PieceKind::Queen => &QUEEN,
        PieceKind::King => &KING,
    }
}

/// Evaluate piece placement from White's perspective.
pub fn placement(board: &Board) -> Value {
    let mut score = 0;
    for sq in Square::all() {
        let Some(piece) = board.piece_on(sq) else {
            continue;
        };
        let t = table(piece.kind);
        match piece.color {
            Color::White => score += t[sq.flip_rank().index()],
            Color::Black => score -= t[sq.index()],
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use skewer_core::Board;

    use super::placement;

    #[test]
    fn starting_position_is_symmetric() {
        assert_eq!(placement(&Board::starting_position()), 0);
    }

    #[test]
    fn centralized_knight_beats_rim_knight() {
        let center: Board = "4k3/8/8/8/4N3/8/8/4K3 w - - 0 1".parse().unwrap();
        let rim: Board = "4k3/8/8/8/N7/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(placement(&center) > placement(&rim));
    }

    #[test]
    fn advanced_pawn_beats_home_pawn() {
        let advanced: Board = "4k3/8/8/8/8/4P3/8/4K3 w - - 0 1".parse().unwrap();
        let home: Board = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".parse().unwrap();
        assert!(placement(&advanced) > placement(&home));
    }

    #[test]
    fn color_mirrored_piece_cancels() {
        // A white knight on c3 and a black knight on c6 occupy mirrored
        // squares, so their placement scores cancel exactly.
        let board: Board = "4k3/8/2n5/8/8/2N5/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(placement(&board), 0);
    }
}
