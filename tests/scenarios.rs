// Copyright 2026 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use mailbox_chess::*;
use Square::*;

fn play(board: &mut Board, moves: &[(Square, Square)]) {
    for &(from, to) in moves {
        assert!(board.move_piece(from, to), "{} -> {} rejected", from, to);
    }
}

fn chess960(pieces: [Piece; 8]) -> Board {
    Board::from_backrank(Variant::Chess960, BackRank::build(pieces).unwrap())
}

#[test]
fn test_fools_mate() {
    let mut board = Board::classical();
    play(&mut board, &[(F2, F3), (E7, E5), (G2, G4), (D8, H4)]);
    assert!(board.is_king_in_check(Color::White));
    assert!(!board.has_any_legal_move(Color::White));
    assert_eq!(board.board_result(Color::White), Some(BoardResult::CheckMate(Color::Black)));
}

#[test]
fn test_scholars_mate() {
    let mut board = Board::classical();
    play(&mut board, &[(E2, E4), (E7, E5), (F1, C4), (B8, C6), (D1, H5), (G8, F6)]);
    assert_eq!(board.board_result(Color::Black), None);
    assert_eq!(board.board_result(Color::White), None);
    play(&mut board, &[(H5, F7)]);
    assert!(board.is_king_in_check(Color::Black));
    assert_eq!(board.board_result(Color::Black), Some(BoardResult::CheckMate(Color::White)));
    assert_eq!(board.history().last().unwrap().captured(), Some(Material::BP));
}

fn en_passant_setup() -> Board {
    let mut board = Board::classical();
    board.set_piece_at(E5, Some(Material::WP));
    board.set_piece_at(E2, None);
    assert!(board.move_piece(D7, D5));
    board
}

#[test]
fn test_en_passant_capture() {
    let mut board = en_passant_setup();
    assert_eq!(board.en_passant_target(), Some(D6));
    assert_eq!(D6, Square::at(2, 3));
    assert!(board.legal_moves(E5).contains(D6));
    assert!(board.move_piece(E5, D6));
    assert_eq!(board.piece_at(D6), Some(Material::WP));
    assert_eq!(board.piece_at(D5), None);
    assert_eq!(board.piece_at(E5), None);
    assert_eq!(board.en_passant_target(), None);
    assert_eq!(board.history().last().unwrap().captured(), Some(Material::BP));
}

#[test]
fn test_en_passant_expires() {
    let mut board = en_passant_setup();
    play(&mut board, &[(A2, A3)]);
    assert_eq!(board.en_passant_target(), None);
    play(&mut board, &[(H7, H6)]);
    assert!(!board.legal_moves(E5).contains(D6));
    assert!(!board.move_piece(E5, D6));
}

#[test]
fn test_classical_kingside_castle() {
    let mut board = Board::classical();
    board.set_piece_at(F1, None);
    board.set_piece_at(G1, None);
    assert!(board.legal_moves(E1).contains(G1));
    assert!(board.move_piece(E1, G1));
    assert_eq!(board.piece_at(G1), Some(Material::WK));
    assert_eq!(board.piece_at(F1), Some(Material::WR));
    assert_eq!(board.piece_at(H1), None);
    assert_eq!(board.piece_at(E1), None);
    assert!(!board.can_castle(Color::White, CastlingSide::KingSide));
    assert!(!board.can_castle(Color::White, CastlingSide::QueenSide));
    assert!(board.can_castle(Color::Black, CastlingSide::KingSide));
}

#[test]
fn test_castle_refused_through_attack() {
    let mut board = Board::classical();
    board.set_piece_at(F1, None);
    board.set_piece_at(G1, None);
    board.set_piece_at(F2, None);
    board.set_piece_at(F5, Some(Material::BR));
    assert!(!board.legal_moves(E1).contains(G1));
    assert!(!board.move_piece(E1, G1));
}

#[test]
fn test_chess960_castle_king_stays() {
    use Piece::*;
    let mut board = chess960([Bishop, Rook, Queen, Knight, Knight, Bishop, King, Rook]);
    board.set_piece_at(F1, None);
    let moves = board.legal_moves(G1);
    assert!(moves.contains(G1));
    assert!(moves.contains(H1));
    assert!(board.move_piece(G1, G1));
    assert_eq!(board.piece_at(G1), Some(Material::WK));
    assert_eq!(board.piece_at(F1), Some(Material::WR));
    assert_eq!(board.piece_at(H1), None);
    assert!(!board.can_castle(Color::White, CastlingSide::KingSide));
    assert!(!board.can_castle(Color::White, CastlingSide::QueenSide));
}

#[test]
fn test_chess960_castle_onto_rook_square() {
    use Piece::*;
    let mut board = chess960([Bishop, Rook, Queen, Knight, Knight, Bishop, King, Rook]);
    board.set_piece_at(F1, None);
    assert!(board.move_piece(G1, H1));
    assert_eq!(board.piece_at(G1), Some(Material::WK));
    assert_eq!(board.piece_at(F1), Some(Material::WR));
}

#[test]
fn test_chess960_castle_rook_stays() {
    use Piece::*;
    let setup = || {
        let mut board = chess960([Bishop, Rook, Queen, Knight, King, Rook, Knight, Bishop]);
        board.set_piece_at(G1, None);
        board.set_piece_at(H1, None);
        board
    };
    let mut board = setup();
    assert_eq!(board.legal_moves(E1), Mask::from_squares([F1, G1]));
    assert!(board.move_piece(E1, G1));
    assert_eq!(board.piece_at(G1), Some(Material::WK));
    assert_eq!(board.piece_at(F1), Some(Material::WR));
    assert_eq!(board.piece_at(E1), None);
    assert!(!board.can_castle(Color::White, CastlingSide::KingSide));
    assert!(!board.can_castle(Color::White, CastlingSide::QueenSide));

    let mut board = setup();
    assert!(board.move_piece(E1, F1));
    assert_eq!(board.piece_at(G1), Some(Material::WK));
    assert_eq!(board.piece_at(F1), Some(Material::WR));
    let record = board.history().last().unwrap();
    assert_eq!((record.from(), record.to()), (E1, G1));
}

#[test]
fn test_promotion_callback() {
    let mut board = Board::classical();
    board.set_piece_at(A8, None);
    board.set_piece_at(A7, Some(Material::WP));
    let mut asked = None;
    let mut promoter = |side: Color, square: Square| {
        asked = Some((side, square));
        Some(Promotion::Rook)
    };
    assert!(board.move_piece_with(A7, A8, &mut promoter));
    assert_eq!(asked, Some((Color::White, Square::at(0, 0))));
    assert_eq!(board.piece_at(A8), Some(Material::new(Color::White, Piece::Rook)));
}

#[test]
fn test_snapshot_restores_chess960_rights() {
    use Piece::*;
    let mut board = chess960([Bishop, Rook, Queen, Knight, Knight, Bishop, King, Rook]);
    board.set_piece_at(F1, None);
    board.set_piece_at(B2, None);
    play(&mut board, &[(B1, B3)]);
    assert!(!board.can_castle(Color::White, CastlingSide::QueenSide));
    let restored = Board::from_snapshot(board.snapshot()).unwrap();
    assert_eq!(restored.backrank(), board.backrank());
    assert_eq!(restored.legal_moves(G1), board.legal_moves(G1));
    assert!(restored.legal_moves(G1).contains(H1));
    assert!(!restored.can_castle(Color::White, CastlingSide::QueenSide));
}

#[cfg(feature = "random")]
mod playouts {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use strum::IntoEnumIterator;

    fn king_count(board: &Board, color: Color) -> usize {
        Square::iter()
            .filter(|&square| board.piece_at(square) == Some(Material::new(color, Piece::King)))
            .count()
    }

    fn all_moves(board: &Board, side: Color) -> Vec<(Square, Square)> {
        board
            .position()
            .occupied_by(side)
            .iter()
            .flat_map(|from| board.legal_moves(from).iter().map(move |to| (from, to)))
            .collect()
    }

    fn playout(mut board: Board, rng: &mut StdRng, plies: usize) {
        let mut side = Color::White;
        for _ in 0..plies {
            let before = board.clone();
            let moves = all_moves(&board, side);
            assert_eq!(board, before);
            if moves.is_empty() {
                assert!(board.board_result(side).is_some());
                return;
            }
            let ours = board.position().occupied_by(side).len();
            let theirs = board.position().occupied_by(!side).len();
            let (from, to) = moves[rng.gen_range(0..moves.len())];
            assert!(board.move_piece(from, to));

            assert_eq!(board.position().occupied_by(side).len(), ours);
            let taken = theirs - board.position().occupied_by(!side).len();
            assert!(taken <= 1);
            assert!(!board.is_king_in_check(side));
            for color in Color::iter() {
                assert_eq!(king_count(&board, color), 1);
            }
            if let Some(target) = board.en_passant_target() {
                assert!(matches!(target.row(), 2 | 5));
                assert_eq!(board.piece_at(target), None);
            }
            assert_eq!(board.history().len(), before.history().len() + 1);
            side = !side;
        }
    }

    #[test]
    fn test_classical_playouts_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            playout(Board::classical(), &mut rng, 120);
        }
    }

    #[test]
    fn test_chess960_playouts_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(960);
        for _ in 0..20 {
            let board = Board::chess960_with(&mut rng);
            playout(board, &mut rng, 120);
        }
    }
}
