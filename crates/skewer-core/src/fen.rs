//! FEN parsing and formatting.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::castling::CastleRights;
use crate::color::Color;
use crate::error::{FenError, PositionError};
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// The standard starting position.
    pub fn starting_position() -> Board {
        STARTING_FEN.parse().expect("starting FEN is valid")
    }

    /// Format this position as a FEN string.
    pub fn fen(&self) -> String {
        let mut out = String::with_capacity(80);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_on(Square::at(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push((b'0' + empty) as char);
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push((b'0' + empty) as char);
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push_str(&self.side_to_move().to_string());
        out.push(' ');
        out.push_str(&self.castling().to_string());
        out.push(' ');
        match self.en_passant() {
            Some(sq) => out.push_str(&sq.to_string()),
            None => out.push('-'),
        }
        out.push_str(&format!(
            " {} {}",
            self.halfmove_clock(),
            self.fullmove_number()
        ));

        out
    }

    /// Reject positions the engine cannot meaningfully search.
    fn validate(&self) -> Result<(), PositionError> {
        for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
            let count = Square::all()
                .filter(|&sq| self.piece_on(sq) == Some(Piece::new(PieceKind::King, color)))
                .count();
            if count != 1 {
                return Err(PositionError::InvalidKingCount { color: name, count });
            }
        }

        let back_rank_pawn = Square::all().any(|sq| {
            (sq.rank() == 0 || sq.rank() == 7)
                && self.piece_on(sq).is_some_and(|p| p.kind == PieceKind::Pawn)
        });
        if back_rank_pawn {
            return Err(PositionError::PawnOnBackRank);
        }

        Ok(())
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let mut board = Board::empty();

        // Field 1: piece placement, rank 8 down to rank 1.
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or(FenError::InvalidPieceChar { character: c })?;
                    if file < 8 {
                        board.squares[Square::at(file as u8, rank).index()] = Some(piece);
                    }
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadRankLength {
                    rank: rank + 1,
                    length: file,
                });
            }
        }

        // Field 2: active color.
        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };

        // Field 3: castling rights.
        board.castling = CastleRights::from_fen(fields[2]).ok_or_else(|| {
            FenError::InvalidCastling {
                found: fields[2].to_string(),
            }
        })?;

        // Field 4: en passant square.
        board.en_passant = match fields[3] {
            "-" => None,
            other => Some(Square::from_algebraic(other).ok_or_else(|| {
                FenError::InvalidEnPassant {
                    found: other.to_string(),
                }
            })?),
        };

        // Fields 5-6: halfmove clock and fullmove number.
        board.halfmove_clock = fields[4].parse().map_err(|_| FenError::InvalidCounter {
            field: "halfmove clock",
            found: fields[4].to_string(),
        })?;
        board.fullmove_number = fields[5].parse().map_err(|_| FenError::InvalidCounter {
            field: "fullmove number",
            found: fields[5].to_string(),
        })?;

        board.validate()?;
        board.hash = zobrist::hash_from_scratch(&board);

        tracing::trace!(fen = %s, hash = board.hash, "parsed position");
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.fen())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::board::Board;
    use crate::color::Color;
    use crate::error::FenError;
    use crate::piece::{Piece, PieceKind};
    use crate::square::Square;

    #[test]
    fn starting_fen_roundtrip() {
        let board = Board::starting_position();
        assert_eq!(board.fen(), STARTING_FEN);
    }

    #[test]
    fn parse_places_pieces_correctly() {
        let board = Board::starting_position();
        assert_eq!(
            board.piece_on(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            board.piece_on(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(
            board.piece_on(Square::A2),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(board.piece_on(Square::E4), None);
    }

    #[test]
    fn arbitrary_fen_roundtrip() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "8/4P3/8/8/8/2k5/8/4K3 w - - 12 40",
        ];
        for fen in fens {
            let board: Board = fen.parse().unwrap();
            assert_eq!(board.fen(), fen);
        }
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = "8/8/8/8/8/8/8/8 w - -".parse::<Board>().unwrap_err();
        assert!(matches!(err, FenError::WrongFieldCount { found: 4 }));
    }

    #[test]
    fn rejects_bad_piece_char() {
        let err = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1"
            .parse::<Board>()
            .unwrap_err();
        assert!(matches!(err, FenError::InvalidPieceChar { character: 'X' }));
    }

    #[test]
    fn rejects_short_rank() {
        let err = "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse::<Board>()
            .unwrap_err();
        assert!(matches!(err, FenError::BadRankLength { .. }));
    }

    #[test]
    fn rejects_missing_king() {
        let err = "8/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Board>().unwrap_err();
        assert!(matches!(err, FenError::InvalidPosition { .. }));
    }

    #[test]
    fn rejects_back_rank_pawn() {
        let err = "P3k3/8/8/8/8/8/8/4K3 w - - 0 1".parse::<Board>().unwrap_err();
        assert!(matches!(err, FenError::InvalidPosition { .. }));
    }

    #[test]
    fn rejects_bad_color_and_en_passant() {
        assert!(matches!(
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1".parse::<Board>().unwrap_err(),
            FenError::InvalidColor { .. }
        ));
        assert!(matches!(
            "4k3/8/8/8/8/8/8/4K3 w - e9 0 1".parse::<Board>().unwrap_err(),
            FenError::InvalidEnPassant { .. }
        ));
    }
}
