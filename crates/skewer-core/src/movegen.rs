//! Legal move generation: pseudo-legal expansion filtered by king safety.

use crate::attacks::{BISHOP_DIRECTIONS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DIRECTIONS};
use crate::board::Board;
use crate::castling::CastleSide;
use crate::chess_move::{Move, Promotion};
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// Terminal state of a position, from the side to move's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Legal moves remain and no draw rule applies.
    Ongoing,
    /// No legal moves and the side to move is in check.
    Checkmate,
    /// No legal moves and the side to move is not in check.
    Stalemate,
    /// Fifty-move rule reached.
    Draw,
}

/// Classify the position: checkmate, stalemate, fifty-move draw, or ongoing.
///
/// Threefold repetition needs the game history and is the caller's concern.
pub fn game_status(board: &Board) -> GameStatus {
    if generate_legal_moves(board).is_empty() {
        if board.in_check(board.side_to_move()) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    } else if board.halfmove_clock() >= 100 {
        GameStatus::Draw
    } else {
        GameStatus::Ongoing
    }
}

/// Generate all legal moves for the side to move.
pub fn generate_legal_moves(board: &Board) -> Vec<Move> {
    let us = board.side_to_move();
    let mut moves = Vec::with_capacity(48);

    for sq in Square::all() {
        let Some(piece) = board.piece_on(sq) else {
            continue;
        };
        if piece.color != us {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => pawn_moves(board, sq, us, &mut moves),
            PieceKind::Knight => delta_moves(board, sq, us, &KNIGHT_DELTAS, &mut moves),
            PieceKind::King => delta_moves(board, sq, us, &KING_DELTAS, &mut moves),
            PieceKind::Bishop => ray_moves(board, sq, us, &BISHOP_DIRECTIONS, &mut moves),
            PieceKind::Rook => ray_moves(board, sq, us, &ROOK_DIRECTIONS, &mut moves),
            PieceKind::Queen => {
                ray_moves(board, sq, us, &BISHOP_DIRECTIONS, &mut moves);
                ray_moves(board, sq, us, &ROOK_DIRECTIONS, &mut moves);
            }
        }
    }

    castle_moves(board, us, &mut moves);

    // Filter to legal: make each candidate on a scratch board and reject
    // those that leave the mover's king attacked. This also covers the
    // en-passant discovered-check and pin cases for free.
    let mut scratch = board.clone();
    moves.retain(|&mv| {
        let undo = scratch.make(mv);
        let legal = !scratch.in_check(us);
        scratch.unmake(mv, undo);
        legal
    });

    moves
}

/// Pawn pushes, double pushes, captures, en passant, and promotions.
fn pawn_moves(board: &Board, origin: Square, us: Color, moves: &mut Vec<Move>) {
    let dir = us.pawn_direction();

    if let Some(one) = origin.offset(0, dir)
        && board.piece_on(one).is_none()
    {
        push_pawn_move(origin, one, us, moves);
        if origin.rank() == us.pawn_start_rank()
            && let Some(two) = one.offset(0, dir)
            && board.piece_on(two).is_none()
        {
            moves.push(Move::new(origin, two));
        }
    }

    for df in [-1, 1] {
        let Some(target) = origin.offset(df, dir) else {
            continue;
        };
        match board.piece_on(target) {
            Some(victim) if victim.color != us => push_pawn_move(origin, target, us, moves),
            None if board.en_passant() == Some(target) => {
                moves.push(Move::en_passant(origin, target));
            }
            _ => {}
        }
    }
}

/// Push a pawn move, expanding to all four promotions on the last rank.
fn push_pawn_move(origin: Square, target: Square, us: Color, moves: &mut Vec<Move>) {
    if target.rank() == us.promotion_rank() {
        for promo in Promotion::ALL {
            moves.push(Move::promotion(origin, target, promo));
        }
    } else {
        moves.push(Move::new(origin, target));
    }
}

/// Fixed-delta moves for knights and kings.
fn delta_moves(
    board: &Board,
    origin: Square,
    us: Color,
    deltas: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in deltas {
        if let Some(target) = origin.offset(df, dr)
            && board.piece_on(target).is_none_or(|p| p.color != us)
        {
            moves.push(Move::new(origin, target));
        }
    }
}

/// Sliding moves: walk each ray until a blocker, capturing enemies.
fn ray_moves(
    board: &Board,
    origin: Square,
    us: Color,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut sq = origin;
        while let Some(target) = sq.offset(df, dr) {
            match board.piece_on(target) {
                None => moves.push(Move::new(origin, target)),
                Some(piece) => {
                    if piece.color != us {
                        moves.push(Move::new(origin, target));
                    }
                    break;
                }
            }
            sq = target;
        }
    }
}

/// Castling: rights intact, path empty, king neither in check nor
/// crossing an attacked square. The destination square is covered by
/// the generic legality filter.
fn castle_moves(board: &Board, us: Color, moves: &mut Vec<Move>) {
    let (king_sq, rook_k, rook_q) = match us {
        Color::White => (Square::E1, Square::H1, Square::A1),
        Color::Black => (Square::E8, Square::H8, Square::A8),
    };
    if board.piece_on(king_sq) != Some(Piece::new(PieceKind::King, us)) || board.in_check(us) {
        return;
    }
    let them = !us;
    let rook = Piece::new(PieceKind::Rook, us);

    if board.castling().has(us, CastleSide::King)
        && board.piece_on(rook_k) == Some(rook)
        && let (Some(f), Some(g)) = (king_sq.offset(1, 0), king_sq.offset(2, 0))
        && board.piece_on(f).is_none()
        && board.piece_on(g).is_none()
        && !board.is_square_attacked(f, them)
    {
        moves.push(Move::castle(king_sq, g));
    }

    if board.castling().has(us, CastleSide::Queen)
        && board.piece_on(rook_q) == Some(rook)
        && let (Some(d), Some(c), Some(b)) = (
            king_sq.offset(-1, 0),
            king_sq.offset(-2, 0),
            king_sq.offset(-3, 0),
        )
        && board.piece_on(d).is_none()
        && board.piece_on(c).is_none()
        && board.piece_on(b).is_none()
        && !board.is_square_attacked(d, them)
    {
        moves.push(Move::castle(king_sq, c));
    }
}
