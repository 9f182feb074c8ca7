//! Attack detection by outward scanning from a target square.

use crate::board::Board;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// Knight move deltas as (file, rank) steps.
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// King move deltas as (file, rank) steps.
pub const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Diagonal ray directions (bishop, queen).
pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Orthogonal ray directions (rook, queen).
pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl Board {
    /// Return `true` if `target` is attacked by any piece of `by`.
    ///
    /// Scans outward from the target: fixed deltas for knights, kings,
    /// and pawns; rays until the first occupied square for sliders.
    pub fn is_square_attacked(&self, target: Square, by: Color) -> bool {
        // Pawns attack diagonally forward, so look one rank backward
        // from the target for an attacking pawn.
        let pawn = Piece::new(PieceKind::Pawn, by);
        for df in [-1, 1] {
            if let Some(sq) = target.offset(df, -by.pawn_direction())
                && self.piece_on(sq) == Some(pawn)
            {
                return true;
            }
        }

        let knight = Piece::new(PieceKind::Knight, by);
        for (df, dr) in KNIGHT_DELTAS {
            if let Some(sq) = target.offset(df, dr)
                && self.piece_on(sq) == Some(knight)
            {
                return true;
            }
        }

        let king = Piece::new(PieceKind::King, by);
        for (df, dr) in KING_DELTAS {
            if let Some(sq) = target.offset(df, dr)
                && self.piece_on(sq) == Some(king)
            {
                return true;
            }
        }

        for (df, dr) in BISHOP_DIRECTIONS {
            if let Some(piece) = self.first_piece_along(target, df, dr)
                && piece.color == by
                && matches!(piece.kind, PieceKind::Bishop | PieceKind::Queen)
            {
                return true;
            }
        }

        for (df, dr) in ROOK_DIRECTIONS {
            if let Some(piece) = self.first_piece_along(target, df, dr)
                && piece.color == by
                && matches!(piece.kind, PieceKind::Rook | PieceKind::Queen)
            {
                return true;
            }
        }

        false
    }

    /// Return `true` if `color`'s king is attacked.
    pub fn in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_square_attacked(king, !color),
            None => false,
        }
    }

    /// The first piece encountered walking from `from` along (df, dr).
    fn first_piece_along(&self, from: Square, df: i8, dr: i8) -> Option<Piece> {
        let mut sq = from;
        while let Some(next) = sq.offset(df, dr) {
            sq = next;
            if let Some(piece) = self.piece_on(sq) {
                return Some(piece);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::color::Color;
    use crate::square::Square;

    #[test]
    fn starting_position_no_check() {
        let board = Board::starting_position();
        assert!(!board.in_check(Color::White));
        assert!(!board.in_check(Color::Black));
    }

    #[test]
    fn rook_attacks_along_open_file() {
        let board: Board = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        assert!(board.is_square_attacked(Square::A8, Color::White));
        assert!(board.is_square_attacked(Square::A4, Color::White));
        assert!(!board.is_square_attacked(Square::B2, Color::White));
    }

    #[test]
    fn slider_attack_is_blocked() {
        // A black pawn on a5 blocks the rook's file beyond it.
        let board: Board = "4k3/8/8/p7/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        assert!(board.is_square_attacked(Square::A5, Color::White));
        assert!(!board.is_square_attacked(Square::A8, Color::White));
    }

    #[test]
    fn pawn_attacks_are_directional() {
        let board: Board = "4k3/8/8/8/3P4/8/8/4K3 w - - 0 1".parse().unwrap();
        // A white pawn on d4 attacks c5 and e5, not c3 or d5.
        assert!(board.is_square_attacked(Square::C5, Color::White));
        assert!(board.is_square_attacked(Square::E5, Color::White));
        assert!(!board.is_square_attacked(Square::D5, Color::White));
        assert!(!board.is_square_attacked(Square::C3, Color::White));
    }

    #[test]
    fn knight_attacks_jump_over_pieces() {
        let board = Board::starting_position();
        // The g1 knight attacks f3 through the pawn wall.
        assert!(board.is_square_attacked(Square::F3, Color::White));
    }

    #[test]
    fn back_rank_check_detected() {
        let board: Board = "4k3/8/8/8/8/8/8/4R1K1 b - - 0 1".parse().unwrap();
        assert!(board.in_check(Color::Black));
        assert!(!board.in_check(Color::White));
    }

    #[test]
    fn queen_attacks_both_ray_kinds() {
        let board: Board = "4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(board.is_square_attacked(Square::D8, Color::White));
        assert!(board.is_square_attacked(Square::H8, Color::White));
        assert!(board.is_square_attacked(Square::A4, Color::White));
        assert!(!board.is_square_attacked(Square::C8, Color::White));
    }
}
