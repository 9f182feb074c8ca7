//! Core chess types: board representation, move generation, and game rules.

mod attacks;
mod board;
mod castling;
mod chess_move;
mod color;
mod error;
mod fen;
mod movegen;
mod perft;
mod piece;
mod square;
mod zobrist;

pub use attacks::{BISHOP_DIRECTIONS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DIRECTIONS};
pub use board::{Board, Undo};
pub use castling::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveKind, Promotion};
pub use color::Color;
pub use error::{FenError, PositionError};
pub use fen::STARTING_FEN;
pub use movegen::{GameStatus, game_status, generate_legal_moves};
pub use perft::{perft, perft_divide};
pub use piece::{Piece, PieceKind};
pub use square::Square;
