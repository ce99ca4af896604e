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

//! Turn keeping on top of a `Board`
//!
//! The board enforces movement rules only. A `Game` adds the side to move,
//! rejects moves made out of turn and records how the game ended.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{
    Board, BoardResult, Color, LegalMoves, Play, Promoter, Promotion, Square,
};
#[cfg(feature = "random")]
use crate::board::Variant;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("The game is over")]
    GameOver,
    #[error("No piece on {0}")]
    EmptySquare(Square),
    #[error("It is {0}'s turn")]
    NotYourTurn(Color),
    #[error("Illegal move from {0} to {1}")]
    IllegalMove(Square, Square),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    Win(Color, WinReason),
    Draw(DrawReason),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WinReason {
    CheckMate,
    TimeExpired,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    StaleMate,
}

impl From<BoardResult> for GameResult {
    fn from(value: BoardResult) -> Self {
        match value {
            BoardResult::CheckMate(winner) => Self::Win(winner, WinReason::CheckMate),
            BoardResult::StaleMate => Self::Draw(DrawReason::StaleMate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Color,
    result: Option<GameResult>,
}

impl Game {
    #[cfg(feature = "random")]
    pub fn new(variant: Variant) -> Self {
        Self::from_board(Board::new(variant), Color::White)
    }

    /// Takes over `board` with `turn` to move. A board that is already
    /// finished for `turn` starts out with its result.
    pub fn from_board(board: Board, turn: Color) -> Self {
        let result = board.board_result(turn).map(GameResult::from);
        Self { board, turn, result }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// The side whose king is attacked, if any.
    pub fn in_check(&self) -> Option<Color> {
        [self.turn, !self.turn]
            .into_iter()
            .find(|&color| self.board.is_king_in_check(color))
    }

    pub fn submit_move(&mut self, from: Square, to: Square) -> Result<()> {
        self.submit_move_with(from, to, &mut Promotion::Queen)
    }

    pub fn submit_move_with<P>(&mut self, from: Square, to: Square, promoter: &mut P) -> Result<()>
    where
        P: Promoter + ?Sized,
    {
        if self.result.is_some() {
            return Err(GameError::GameOver.into());
        }
        let Some(material) = self.board.piece_at(from) else {
            return Err(GameError::EmptySquare(from).into());
        };
        if material.color() != self.turn {
            return Err(GameError::NotYourTurn(self.turn).into());
        }
        if !self.board.move_piece_with(from, to, promoter) {
            return Err(GameError::IllegalMove(from, to).into());
        }
        self.turn = !self.turn;
        self.result = self.board.board_result(self.turn).map(GameResult::from);
        Ok(())
    }

    /// Ends the game on time, `side` having run out.
    pub fn time_expired(&mut self, side: Color) -> Result<()> {
        if self.result.is_some() {
            return Err(GameError::GameOver.into());
        }
        self.result = Some(GameResult::Win(!side, WinReason::TimeExpired));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Material, Piece};
    use strum::IntoEnumIterator;
    use Color::*;
    use Square::*;

    fn error(result: Result<()>) -> GameError {
        *result.unwrap_err().downcast_ref::<GameError>().unwrap()
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::from_board(Board::classical(), White);
        assert_eq!(game.turn(), White);
        game.submit_move(E2, E4).unwrap();
        assert_eq!(game.turn(), Black);
        assert_eq!(error(game.submit_move(D2, D4)), GameError::NotYourTurn(Black));
        game.submit_move(E7, E5).unwrap();
        assert_eq!(game.turn(), White);
        assert_eq!(game.board().history().len(), 2);
    }
    #[test]
    fn test_rejections_leave_game_unchanged() {
        let mut game = Game::from_board(Board::classical(), White);
        let before = game.clone();
        assert_eq!(error(game.submit_move(E4, E5)), GameError::EmptySquare(E4));
        assert_eq!(error(game.submit_move(E2, E5)), GameError::IllegalMove(E2, E5));
        assert_eq!(error(game.submit_move(E7, E5)), GameError::NotYourTurn(White));
        assert_eq!(game, before);
    }
    #[test]
    fn test_fools_mate_ends_game() {
        let mut game = Game::from_board(Board::classical(), White);
        for (from, to) in [(F2, F3), (E7, E5), (G2, G4), (D8, H4)] {
            game.submit_move(from, to).unwrap();
        }
        assert_eq!(game.in_check(), Some(White));
        assert_eq!(game.result(), Some(&GameResult::Win(Black, WinReason::CheckMate)));
        assert_eq!(error(game.submit_move(A2, A3)), GameError::GameOver);
    }
    #[test]
    fn test_stalemate_is_a_draw() {
        let mut board = Board::classical();
        for square in Square::iter() {
            board.set_piece_at(square, None);
        }
        board.set_piece_at(A8, Some(Material::BK));
        board.set_piece_at(C6, Some(Material::WK));
        board.set_piece_at(B5, Some(Material::WQ));
        let mut game = Game::from_board(board, White);
        assert_eq!(game.result(), None);
        game.submit_move(B5, B6).unwrap();
        assert_eq!(game.in_check(), None);
        assert_eq!(game.result(), Some(&GameResult::Draw(DrawReason::StaleMate)));
    }
    #[test]
    fn test_promotion_choice_through_game() {
        let mut board = Board::classical();
        board.set_piece_at(B7, Some(Material::WP));
        let mut game = Game::from_board(board, White);
        game.submit_move_with(B7, A8, &mut Promotion::Rook).unwrap();
        assert_eq!(game.board().piece_at(A8), Some(Material::new(White, Piece::Rook)));
    }
    #[test]
    fn test_time_expired() {
        let mut game = Game::from_board(Board::classical(), White);
        game.time_expired(White).unwrap();
        assert!(game.is_over());
        assert_eq!(game.result(), Some(&GameResult::Win(Black, WinReason::TimeExpired)));
        assert_eq!(error(game.time_expired(Black)), GameError::GameOver);
    }
}
