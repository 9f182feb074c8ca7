//! Perft: exhaustive move-path counting for move generator validation.

use crate::board::Board;
use crate::movegen::generate_legal_moves;

/// Count leaf nodes of the legal move tree to the given depth.
pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for mv in moves {
        let undo = board.make(mv);
        nodes += perft(board, depth - 1);
        board.unmake(mv, undo);
    }
    nodes
}

/// Perft with per-root-move subtotals, for divergence hunting.
pub fn perft_divide(board: &mut Board, depth: u32) -> u64 {
    let mut total = 0;
    for mv in generate_legal_moves(board) {
        let undo = board.make(mv);
        let nodes = perft(board, depth.saturating_sub(1));
        board.unmake(mv, undo);
        tracing::debug!(%mv, nodes, "perft divide");
        total += nodes;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_divide};
    use crate::board::Board;

    #[test]
    fn starting_position_depth_1() {
        let mut board = Board::starting_position();
        assert_eq!(perft(&mut board, 1), 20);
    }

    #[test]
    fn starting_position_depth_2() {
        let mut board = Board::starting_position();
        assert_eq!(perft(&mut board, 2), 400);
    }

    #[test]
    fn starting_position_depth_3() {
        let mut board = Board::starting_position();
        assert_eq!(perft(&mut board, 3), 8_902);
    }

    #[test]
    fn kiwipete_depth_1() {
        let mut board: Board =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
                .parse()
                .unwrap();
        assert_eq!(perft(&mut board, 1), 48);
    }

    #[test]
    fn kiwipete_depth_2() {
        let mut board: Board =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
                .parse()
                .unwrap();
        assert_eq!(perft(&mut board, 2), 2_039);
    }

    #[test]
    fn en_passant_heavy_position_depth_1() {
        // Position 3 from the CPW perft suite.
        let mut board: Board = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1".parse().unwrap();
        assert_eq!(perft(&mut board, 1), 14);
    }

    #[test]
    fn en_passant_heavy_position_depth_2() {
        let mut board: Board = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1".parse().unwrap();
        assert_eq!(perft(&mut board, 2), 191);
    }

    #[test]
    fn divide_totals_match_perft() {
        let mut board = Board::starting_position();
        assert_eq!(perft_divide(&mut board, 2), 400);
    }

    #[test]
    fn perft_leaves_board_unchanged() {
        let mut board = Board::starting_position();
        let before = board.clone();
        perft(&mut board, 3);
        assert_eq!(board, before);
    }
}
