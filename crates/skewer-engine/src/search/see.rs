//! Static Exchange Evaluation.
//!
//! Simulates the full recapture sequence on one square, each side using
//! its least valuable attacker, and returns the net material outcome
//! assuming both sides stop capturing when continuing would lose.

use skewer_core::{
    BISHOP_DIRECTIONS, Board, Color, KING_DELTAS, KNIGHT_DELTAS, Move, MoveKind, Piece, PieceKind,
    ROOK_DIRECTIONS, Square,
};

use crate::value::Value;

/// Exchange values, indexed by [`PieceKind::index()`]. The king's value
/// keeps it from ever being "won" in an exchange.
pub(crate) const SEE_VALUE: [Value; PieceKind::COUNT] = [100, 320, 330, 500, 900, 20_000];

/// Longest recapture chain considered (every piece could pile on once).
const MAX_EXCHANGES: usize = 32;

/// Net material outcome of `mv` for the side to move.
///
/// Non-captures return 0. En passant and promotion captures are handled:
/// the en-passant victim counts as a pawn, and a promoting attacker
/// stands on the target as its promoted piece for later recaptures.
pub fn see(board: &Board, mv: Move) -> Value {
    let target = mv.target();
    let us = board.side_to_move();

    let victim_value = match mv.kind() {
        MoveKind::EnPassant => SEE_VALUE[PieceKind::Pawn.index()],
        _ => match board.piece_on(target) {
            Some(victim) => SEE_VALUE[victim.kind.index()],
            None => return 0,
        },
    };

    let Some(attacker) = board.piece_on(mv.origin()) else {
        return 0;
    };

    // Squares vacated so far. Ray scans skip them, which is what lets
    // x-ray attackers (a rook behind a rook, a bishop behind a pawn)
    // join the exchange once the piece in front has captured.
    let mut vacated = [false; Square::COUNT];
    vacated[mv.origin().index()] = true;
    if mv.kind() == MoveKind::EnPassant
        && let Some(ep_victim) = target.offset(0, -us.pawn_direction())
    {
        vacated[ep_victim.index()] = true;
    }

    // Value of the piece currently standing on the target square.
    let mut occupant_value = if mv.kind() == MoveKind::Promotion {
        SEE_VALUE[mv.promotion_piece().piece_kind().index()]
    } else {
        SEE_VALUE[attacker.kind.index()]
    };

    let mut gain: [Value; MAX_EXCHANGES] = [0; MAX_EXCHANGES];
    gain[0] = victim_value;
    let mut depth = 0usize;
    let mut side = !us;

    while depth + 1 < MAX_EXCHANGES {
        let Some((sq, kind)) = least_valuable_attacker(board, target, side, &vacated) else {
            break;
        };

        depth += 1;
        gain[depth] = occupant_value - gain[depth - 1];

        occupant_value = SEE_VALUE[kind.index()];
        vacated[sq.index()] = true;
        side = !side;
    }

    // Minimax the chain backward: each side recaptures only when it pays.
    while depth > 0 {
        depth -= 1;
        gain[depth] = -Value::max(-gain[depth], gain[depth + 1]);
    }

    gain[0]
}

/// The cheapest piece of `side` attacking `target`, ignoring vacated
/// squares. Ray scans treat vacated squares as empty, revealing x-rays.
fn least_valuable_attacker(
    board: &Board,
    target: Square,
    side: Color,
    vacated: &[bool; Square::COUNT],
) -> Option<(Square, PieceKind)> {
    let mut best: Option<(Square, PieceKind)> = None;
    let consider = |sq: Square, kind: PieceKind, best: &mut Option<(Square, PieceKind)>| {
        if best.is_none_or(|(_, k)| SEE_VALUE[kind.index()] < SEE_VALUE[k.index()]) {
            *best = Some((sq, kind));
        }
    };

    let pawn = Piece::new(PieceKind::Pawn, side);
    for df in [-1, 1] {
        if let Some(sq) = target.offset(df, -side.pawn_direction())
            && !vacated[sq.index()]
            && board.piece_on(sq) == Some(pawn)
        {
            // A pawn is always the cheapest possible attacker.
            return Some((sq, PieceKind::Pawn));
        }
    }

    let knight = Piece::new(PieceKind::Knight, side);
    for (df, dr) in KNIGHT_DELTAS {
        if let Some(sq) = target.offset(df, dr)
            && !vacated[sq.index()]
            && board.piece_on(sq) == Some(knight)
        {
            consider(sq, PieceKind::Knight, &mut best);
        }
    }

    for (df, dr) in BISHOP_DIRECTIONS {
        if let Some((sq, piece)) = first_piece_along(board, target, df, dr, vacated)
            && piece.color == side
            && matches!(piece.kind, PieceKind::Bishop | PieceKind::Queen)
        {
            consider(sq, piece.kind, &mut best);
        }
    }

    for (df, dr) in ROOK_DIRECTIONS {
        if let Some((sq, piece)) = first_piece_along(board, target, df, dr, vacated)
            && piece.color == side
            && matches!(piece.kind, PieceKind::Rook | PieceKind::Queen)
        {
            consider(sq, piece.kind, &mut best);
        }
    }

    if best.is_none() {
        let king = Piece::new(PieceKind::King, side);
        for (df, dr) in KING_DELTAS {
            if let Some(sq) = target.offset(df, dr)
                && !vacated[sq.index()]
                && board.piece_on(sq) == Some(king)
            {
                return Some((sq, PieceKind::King));
            }
        }
    }

    best
}

/// First non-vacated piece walking from `from` along (df, dr).
fn first_piece_along(
    board: &Board,
    from: Square,
    df: i8,
    dr: i8,
    vacated: &[bool; Square::COUNT],
) -> Option<(Square, Piece)> {
    let mut sq = from;
    while let Some(next) = sq.offset(df, dr) {
        sq = next;
        if vacated[sq.index()] {
            continue;
        }
        if let Some(piece) = board.piece_on(sq) {
            return Some((sq, piece));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use skewer_core::{Board, Move, MoveKind, Square, generate_legal_moves};

    use super::see;

    fn find_move(board: &Board, from: Square, to: Square) -> Move {
        generate_legal_moves(board)
            .into_iter()
            .find(|m| m.origin() == from && m.target() == to)
            .expect("move should be legal")
    }

    #[test]
    fn non_capture_is_neutral() {
        let board = Board::starting_position();
        let mv = find_move(&board, Square::E2, Square::E4);
        assert_eq!(see(&board, mv), 0);
    }

    #[test]
    fn undefended_piece_is_won_outright() {
        // White pawn e4 takes an undefended knight on d5.
        let board: Board = "4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let mv = find_move(&board, Square::E4, Square::D5);
        assert_eq!(see(&board, mv), 320);
    }

    #[test]
    fn defended_piece_costs_the_attacker() {
        // Pawn takes knight, pawn recaptures: 320 - 100 = 220.
        let board: Board = "4k3/8/4p3/3n4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let mv = find_move(&board, Square::E4, Square::D5);
        assert_eq!(see(&board, mv), 220);
    }

    #[test]
    fn queen_grabbing_defended_pawn_loses() {
        // QxP, pxQ: 100 - 900 = -800.
        let board: Board = "4k3/8/3p4/2p5/8/4Q3/8/4K3 w - - 0 1".parse().unwrap();
        let mv = find_move(&board, Square::E3, Square::C5);
        assert_eq!(see(&board, mv), -800);
    }

    #[test]
    fn rook_for_knight_exchange_loses_the_difference() {
        // RxN with the knight defended by a rook: Black recaptures
        // because rook-for-knight pays, leaving White 320 - 500 = -180.
        let board: Board = "3r2k1/8/8/3n4/8/8/8/3R2K1 w - - 0 1".parse().unwrap();
        let mv = find_move(&board, Square::D1, Square::D5);
        assert_eq!(see(&board, mv), -180);
    }

    #[test]
    fn xray_attacker_joins_the_exchange() {
        // Doubled white rooks on the d-file, black pawn on d6 defended
        // by the e7 pawn. The front rook's capture reveals the back rook
        // through the vacated square: RxP, pxR, Rxp. Black recaptures
        // because winning rook-for-pawn pays even against the x-ray, so
        // White nets 100 + 100 - 500 = -300.
        let board: Board = "4k3/4p3/3p4/8/8/3R4/3R4/4K3 w - - 0 1".parse().unwrap();
        let mv = find_move(&board, Square::D3, Square::D6);
        assert_eq!(see(&board, mv), -300);
    }

    #[test]
    fn en_passant_counts_the_bypassing_pawn() {
        let board: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
            .parse()
            .unwrap();
        let mv = generate_legal_moves(&board)
            .into_iter()
            .find(|m| m.kind() == MoveKind::EnPassant)
            .unwrap();
        // Pawn takes pawn; the c7 pawn can recapture on d6: 100 - 100 = 0.
        assert_eq!(see(&board, mv), 0);
    }

    #[test]
    fn king_cannot_be_traded_away() {
        // King takes an undefended queen: fine, nets the queen.
        let board: Board = "7k/8/8/8/8/8/6q1/7K w - - 0 1".parse().unwrap();
        let mv = find_move(&board, Square::H1, Square::G2);
        assert_eq!(see(&board, mv), 900);
    }
}
