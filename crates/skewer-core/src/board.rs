//! Mailbox board state with reversible make/unmake mutation.

use crate::castling::{CastleRights, CastleSide};
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// State needed to revert one [`Board::make`] call.
///
/// Returned by `make` and consumed by `unmake`. Every search recursion
/// level applies exactly one move and must revert it on every exit path
/// before returning control to its caller.
#[derive(Debug, Clone, Copy)]
pub struct Undo {
    captured: Option<Piece>,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    hash: u64,
}

/// A chess position: 64 mailbox squares plus game state.
///
/// The Zobrist hash is maintained incrementally by [`make`](Board::make)
/// and restored from the [`Undo`] snapshot by [`unmake`](Board::unmake).
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) squares: [Option<Piece>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
}

impl Board {
    /// An empty board with White to move and no castling rights.
    pub(crate) fn empty() -> Board {
        Board {
            squares: [None; 64],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    /// The piece on `sq`, if any.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// The side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// The castling rights still available.
    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The en passant target square, if the last move was a double pawn push.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last pawn move or capture (fifty-move rule counter).
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The fullmove number, starting at 1 and incremented after Black moves.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// The Zobrist hash of this position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// The square of `color`'s king.
    ///
    /// Returns `None` only for malformed positions; FEN parsing rejects those.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&sq| {
            self.squares[sq.index()] == Some(Piece::new(PieceKind::King, color))
        })
    }

    /// The square a move captures on: the target, except for en passant.
    fn capture_square(&self, mv: Move, mover: Color) -> Square {
        if mv.kind() == MoveKind::EnPassant {
            // The captured pawn sits one rank behind the en passant square.
            mv.target()
                .offset(0, -mover.pawn_direction())
                .unwrap_or_else(|| mv.target())
        } else {
            mv.target()
        }
    }

    /// The rook's origin and target squares for a castle, keyed by the
    /// king's target square.
    fn castle_rook_squares(king_target: Square) -> (Square, Square) {
        match king_target {
            Square::G1 => (Square::H1, Square::F1),
            Square::C1 => (Square::A1, Square::D1),
            Square::G8 => (Square::H8, Square::F8),
            _ => (Square::A8, Square::D8),
        }
    }

    /// Castling rights after a move touching `origin` and `target`.
    fn castling_after(mut rights: CastleRights, origin: Square, target: Square) -> CastleRights {
        for sq in [origin, target] {
            rights = match sq {
                Square::E1 => rights.revoke_all(Color::White),
                Square::H1 => rights.revoke(Color::White, CastleSide::King),
                Square::A1 => rights.revoke(Color::White, CastleSide::Queen),
                Square::E8 => rights.revoke_all(Color::Black),
                Square::H8 => rights.revoke(Color::Black, CastleSide::King),
                Square::A8 => rights.revoke(Color::Black, CastleSide::Queen),
                _ => rights,
            };
        }
        rights
    }

    /// Apply a move, returning the state needed to revert it.
    ///
    /// `mv` must come from this position's legal (or pseudo-legal) move
    /// generation; applying an arbitrary move is undefined behavior at
    /// the chess level, though never memory-unsafe.
    pub fn make(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let origin = mv.origin();
        let target = mv.target();
        let piece = self.squares[origin.index()]
            .expect("move origin must hold a piece of the side to move");

        let capture_sq = self.capture_square(mv, us);
        let captured = self.squares[capture_sq.index()];

        let undo = Undo {
            captured,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        };

        // Piece placement and incremental hash.
        self.hash ^= zobrist::PIECE_SQUARE[piece.index()][origin.index()];
        self.squares[origin.index()] = None;

        if let Some(victim) = captured {
            self.hash ^= zobrist::PIECE_SQUARE[victim.index()][capture_sq.index()];
            self.squares[capture_sq.index()] = None;
        }

        let placed = if mv.kind() == MoveKind::Promotion {
            Piece::new(mv.promotion_piece().piece_kind(), us)
        } else {
            piece
        };
        self.hash ^= zobrist::PIECE_SQUARE[placed.index()][target.index()];
        self.squares[target.index()] = Some(placed);

        if mv.kind() == MoveKind::Castle {
            let (rook_origin, rook_target) = Self::castle_rook_squares(target);
            let rook = Piece::new(PieceKind::Rook, us);
            self.hash ^= zobrist::PIECE_SQUARE[rook.index()][rook_origin.index()];
            self.hash ^= zobrist::PIECE_SQUARE[rook.index()][rook_target.index()];
            self.squares[rook_origin.index()] = None;
            self.squares[rook_target.index()] = Some(rook);
        }

        // Castling rights.
        let new_castling = Self::castling_after(self.castling, origin, target);
        if new_castling != self.castling {
            self.hash ^= zobrist::CASTLING[self.castling.bits() as usize];
            self.hash ^= zobrist::CASTLING[new_castling.bits() as usize];
            self.castling = new_castling;
        }

        // En passant square.
        if let Some(old_ep) = self.en_passant {
            self.hash ^= zobrist::EN_PASSANT_FILE[old_ep.file() as usize];
        }
        let double_push = piece.kind == PieceKind::Pawn
            && (origin.rank() as i8 - target.rank() as i8).abs() == 2;
        self.en_passant = if double_push {
            origin.offset(0, us.pawn_direction())
        } else {
            None
        };
        if let Some(new_ep) = self.en_passant {
            self.hash ^= zobrist::EN_PASSANT_FILE[new_ep.file() as usize];
        }

        // Clocks.
        if piece.kind == PieceKind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        // Side to move.
        self.side_to_move = !us;
        self.hash ^= zobrist::SIDE_TO_MOVE;

        undo
    }

    /// Revert a move made by [`make`](Board::make).
    ///
    /// `mv` and `undo` must be the exact pair returned by the matching
    /// `make` call, with no intervening unreverted mutation.
    pub fn unmake(&mut self, mv: Move, undo: Undo) {
        let mover = !self.side_to_move;
        self.side_to_move = mover;
        if mover == Color::Black {
            self.fullmove_number -= 1;
        }

        let origin = mv.origin();
        let target = mv.target();
        let placed = self.squares[target.index()]
            .expect("unmake() target must hold the moved piece");

        // The mover returns to the origin; a promotion reverts to a pawn.
        let original = if mv.kind() == MoveKind::Promotion {
            Piece::new(PieceKind::Pawn, mover)
        } else {
            placed
        };
        self.squares[origin.index()] = Some(original);
        self.squares[target.index()] = None;

        let capture_sq = self.capture_square(mv, mover);
        self.squares[capture_sq.index()] = undo.captured;

        if mv.kind() == MoveKind::Castle {
            let (rook_origin, rook_target) = Self::castle_rook_squares(target);
            let rook = Piece::new(PieceKind::Rook, mover);
            self.squares[rook_target.index()] = None;
            self.squares[rook_origin.index()] = Some(rook);
        }

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }
}
