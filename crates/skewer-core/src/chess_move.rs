//! Move representation, bit-packed into a u16.

use std::fmt;

use crate::board::Board;
use crate::movegen::generate_legal_moves;
use crate::piece::PieceKind;
use crate::square::Square;

const ORIGIN_SHIFT: u32 = 0;
const TARGET_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 12;
const PROMO_SHIFT: u32 = 14;
const SQUARE_MASK: u16 = 0x3F;

/// The category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Quiet move or ordinary capture.
    Normal = 0,
    /// Pawn promotion (possibly capturing).
    Promotion = 1,
    /// En passant capture.
    EnPassant = 2,
    /// Castling, encoded by the king's origin and target.
    Castle = 3,
}

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Promotion {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
}

impl Promotion {
    /// All promotion choices in index order.
    pub const ALL: [Promotion; 4] = [
        Promotion::Knight,
        Promotion::Bishop,
        Promotion::Rook,
        Promotion::Queen,
    ];

    /// Convert to the corresponding [`PieceKind`].
    pub const fn piece_kind(self) -> PieceKind {
        match self {
            Promotion::Knight => PieceKind::Knight,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Rook => PieceKind::Rook,
            Promotion::Queen => PieceKind::Queen,
        }
    }

    /// UCI suffix character ("q" in "e7e8q").
    pub const fn uci_char(self) -> char {
        match self {
            Promotion::Knight => 'n',
            Promotion::Bishop => 'b',
            Promotion::Rook => 'r',
            Promotion::Queen => 'q',
        }
    }
}

/// A move encoded in 16 bits.
///
/// ```text
/// bits  0-5:  origin square      (0-63)
/// bits  6-11: target square      (0-63)
/// bits 12-13: move kind          (Normal=0, Promotion=1, EnPassant=2, Castle=3)
/// bits 14-15: promotion piece    (Knight=0, Bishop=1, Rook=2, Queen=3)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Null move sentinel (A1->A1, Normal). Never a legal move.
    pub const NULL: Move = Move(0);

    /// Create a normal (quiet or capturing) move.
    pub const fn new(origin: Square, target: Square) -> Move {
        Move(
            ((origin.index() as u16) << ORIGIN_SHIFT)
                | ((target.index() as u16) << TARGET_SHIFT),
        )
    }

    /// Create a promotion move.
    pub const fn promotion(origin: Square, target: Square, promo: Promotion) -> Move {
        Move(
            ((origin.index() as u16) << ORIGIN_SHIFT)
                | ((target.index() as u16) << TARGET_SHIFT)
                | ((MoveKind::Promotion as u16) << KIND_SHIFT)
                | ((promo as u16) << PROMO_SHIFT),
        )
    }

    /// Create an en passant capture.
    pub const fn en_passant(origin: Square, target: Square) -> Move {
        Move(
            ((origin.index() as u16) << ORIGIN_SHIFT)
                | ((target.index() as u16) << TARGET_SHIFT)
                | ((MoveKind::EnPassant as u16) << KIND_SHIFT),
        )
    }

    /// Create a castling move using the king's origin and target squares.
    pub const fn castle(king_origin: Square, king_target: Square) -> Move {
        Move(
            ((king_origin.index() as u16) << ORIGIN_SHIFT)
                | ((king_target.index() as u16) << TARGET_SHIFT)
                | ((MoveKind::Castle as u16) << KIND_SHIFT),
        )
    }

    /// Extract the origin square.
    #[inline]
    pub const fn origin(self) -> Square {
        Square::from_index_unchecked(((self.0 >> ORIGIN_SHIFT) & SQUARE_MASK) as u8)
    }

    /// Extract the target square.
    #[inline]
    pub const fn target(self) -> Square {
        Square::from_index_unchecked(((self.0 >> TARGET_SHIFT) & SQUARE_MASK) as u8)
    }

    /// Extract the move kind.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        match (self.0 >> KIND_SHIFT) & 0x3 {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castle,
        }
    }

    /// Extract the promotion piece. Only meaningful for promotion moves.
    #[inline]
    pub const fn promotion_piece(self) -> Promotion {
        match (self.0 >> PROMO_SHIFT) & 0x3 {
            0 => Promotion::Knight,
            1 => Promotion::Bishop,
            2 => Promotion::Rook,
            _ => Promotion::Queen,
        }
    }

    /// Return `true` if this is the null move sentinel.
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Return the UCI string ("e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        if self.kind() == MoveKind::Promotion {
            format!(
                "{}{}{}",
                self.origin(),
                self.target(),
                self.promotion_piece().uci_char()
            )
        } else {
            format!("{}{}", self.origin(), self.target())
        }
    }

    /// Resolve a UCI move string against the legal moves of `board`.
    ///
    /// Returns `None` when the string is malformed or names no legal move.
    /// Castling is accepted in king-move notation ("e1g1").
    pub fn from_uci(s: &str, board: &Board) -> Option<Move> {
        if s.len() != 4 && s.len() != 5 {
            return None;
        }
        let origin = Square::from_algebraic(&s[0..2])?;
        let target = Square::from_algebraic(&s[2..4])?;
        let promo = match s.as_bytes().get(4).copied() {
            Some(b'n') => Some(Promotion::Knight),
            Some(b'b') => Some(Promotion::Bishop),
            Some(b'r') => Some(Promotion::Rook),
            Some(b'q') => Some(Promotion::Queen),
            Some(_) => return None,
            None => None,
        };

        generate_legal_moves(board).into_iter().find(|mv| {
            mv.origin() == origin
                && mv.target() == target
                && match mv.kind() {
                    MoveKind::Promotion => promo == Some(mv.promotion_piece()),
                    _ => promo.is_none(),
                }
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "0000")
        } else {
            write!(f, "{}", self.to_uci())
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} kind={:?})", self, self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveKind, Promotion};
    use crate::board::Board;
    use crate::square::Square;

    #[test]
    fn size_of_move() {
        assert_eq!(std::mem::size_of::<Move>(), 2);
    }

    #[test]
    fn normal_roundtrip() {
        let mv = Move::new(Square::E2, Square::E4);
        assert_eq!(mv.origin(), Square::E2);
        assert_eq!(mv.target(), Square::E4);
        assert_eq!(mv.kind(), MoveKind::Normal);
        assert!(!mv.is_null());
    }

    #[test]
    fn promotion_roundtrip() {
        for promo in Promotion::ALL {
            let mv = Move::promotion(Square::E7, Square::E8, promo);
            assert_eq!(mv.origin(), Square::E7);
            assert_eq!(mv.target(), Square::E8);
            assert_eq!(mv.kind(), MoveKind::Promotion);
            assert_eq!(mv.promotion_piece(), promo);
        }
    }

    #[test]
    fn en_passant_roundtrip() {
        let mv = Move::en_passant(Square::E5, Square::D6);
        assert_eq!(mv.origin(), Square::E5);
        assert_eq!(mv.target(), Square::D6);
        assert_eq!(mv.kind(), MoveKind::EnPassant);
    }

    #[test]
    fn castle_roundtrip() {
        let mv = Move::castle(Square::E1, Square::G1);
        assert_eq!(mv.origin(), Square::E1);
        assert_eq!(mv.target(), Square::G1);
        assert_eq!(mv.kind(), MoveKind::Castle);
    }

    #[test]
    fn null_sentinel() {
        assert!(Move::NULL.is_null());
        assert_eq!(format!("{}", Move::NULL), "0000");
    }

    #[test]
    fn uci_strings() {
        assert_eq!(Move::new(Square::E2, Square::E4).to_uci(), "e2e4");
        assert_eq!(
            Move::promotion(Square::A7, Square::A8, Promotion::Queen).to_uci(),
            "a7a8q"
        );
    }

    #[test]
    fn exhaustive_normal_roundtrip() {
        for origin in Square::all() {
            for target in Square::all() {
                let mv = Move::new(origin, target);
                assert_eq!(mv.origin(), origin);
                assert_eq!(mv.target(), target);
                assert_eq!(mv.kind(), MoveKind::Normal);
            }
        }
    }

    #[test]
    fn from_uci_resolves_legal_moves() {
        let board = Board::starting_position();
        let mv = Move::from_uci("e2e4", &board).unwrap();
        assert_eq!(mv.origin(), Square::E2);
        assert_eq!(mv.target(), Square::E4);

        assert_eq!(Move::from_uci("e2e5", &board), None);
        assert_eq!(Move::from_uci("xyzw", &board), None);
        assert_eq!(Move::from_uci("e2e4q", &board), None);
    }
}
