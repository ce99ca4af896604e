// Copyright 2023 Tobin Edwards
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

use serde::{Deserialize, Serialize};

use super::material::Color;
use super::moves::LegalMoves;
use super::position::Position;

/// A finished board. `CheckMate` carries the winning side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardResult {
    CheckMate(Color),
    StaleMate,
}

/// Terminal detection, layered over legal move generation.
pub trait Play: LegalMoves {
    fn has_any_legal_move(&self, side: Color) -> bool {
        let pos: &Position = self.as_ref();
        pos.occupied_by(side)
            .iter()
            .any(|from| !self.legal_move_set(from).is_empty())
    }

    /// How the board stands with `side` to move: checkmate or stalemate
    /// when it has no legal move, otherwise `None`.
    fn board_result(&self, side: Color) -> Option<BoardResult> {
        if self.has_any_legal_move(side) {
            None
        } else if self.is_king_in_check(side) {
            Some(BoardResult::CheckMate(!side))
        } else {
            Some(BoardResult::StaleMate)
        }
    }
}

impl<T: LegalMoves> Play for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::backrank::{BackRank, Variant};
    use crate::board::material::Material;
    use crate::board::square::Square::*;
    use Color::*;

    fn empty() -> Position {
        Position::empty(Variant::Classical, BackRank::standard())
    }

    #[test]
    fn test_start_position_is_open() {
        let position = Position::default();
        assert!(position.has_any_legal_move(White));
        assert!(position.has_any_legal_move(Black));
        assert_eq!(position.board_result(White), None);
    }
    #[test]
    fn test_back_rank_mate() {
        let position = empty()
            .with_contents(G8, Some(Material::BK))
            .with_contents(F7, Some(Material::BP))
            .with_contents(G7, Some(Material::BP))
            .with_contents(H7, Some(Material::BP))
            .with_contents(A8, Some(Material::WR))
            .with_contents(G1, Some(Material::WK));
        assert!(position.is_king_in_check(Black));
        assert!(!position.has_any_legal_move(Black));
        assert_eq!(position.board_result(Black), Some(BoardResult::CheckMate(White)));
        assert_eq!(position.board_result(White), None);
    }
    #[test]
    fn test_stalemate() {
        let position = empty()
            .with_contents(A8, Some(Material::BK))
            .with_contents(B6, Some(Material::WQ))
            .with_contents(C6, Some(Material::WK));
        assert!(!position.is_king_in_check(Black));
        assert_eq!(position.board_result(Black), Some(BoardResult::StaleMate));
    }
    #[test]
    fn test_check_is_not_mate_when_it_can_be_blocked() {
        let position = empty()
            .with_contents(G8, Some(Material::BK))
            .with_contents(F7, Some(Material::BP))
            .with_contents(G7, Some(Material::BP))
            .with_contents(H7, Some(Material::BP))
            .with_contents(C6, Some(Material::BB))
            .with_contents(A8, Some(Material::WR))
            .with_contents(G1, Some(Material::WK));
        assert!(position.is_king_in_check(Black));
        assert!(position.has_any_legal_move(Black));
        assert_eq!(position.board_result(Black), None);
    }
}
