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

//! Chess board supporting standard chess and Chess960
//!
//! A _board_ holds the state of a chess game and enforces the rules of
//! movement. It does not know whose turn it is; that is left to the
//! driver that owns it (see `Game`). The following features are
//! supported:
//!
//! [x] Standard chess rules
//! [x] Chess960 rules, including castling from any starting arrangement
//! [x] En passant and promotion (with a caller supplied choice)
//! [x] Checkmate and stalemate detection
//! [x] Snapshots for persistence
//! [ ] Three-fold repetition, fifty-move rule, insufficient material
//! [ ] Take backs
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square
//!   on an 8-by-8 board. Squares are laid out row by row starting
//!   from Black's back rank, so `Square::at(0, 0)` is `A8` and
//!   `Square::at(7, 4)` is `E1`. A square displays as `"(row, col)"`.
//!
//! * A `Mask` is a 64-bit (u64) value in which each bit maps to a
//!   square on the board. Masks are useful for efficiently representing
//!   which squares contain pawns, for instance, or which squares are
//!   legal move destinations for a piece. Masks can be combined or
//!   modified using bitwise `|`, `|=`, `&`, `&=` and `!` operators.
//!   The `iter()` method provides an efficient double-ended iterator.
//!
//! * `Material` represents a piece of a specific color. A `Piece` has
//!   six variants: `King`, `Queen`, `Rook`, `Bishop`, `Knight` and `Pawn`.
//!   `Color` is either `White` or `Black`. Pawns promote to a
//!   `Promotion`, which only has the four variants a pawn may become.
//!
//! * A `Position` holds the contents of each square together with the
//!   castling rights, the en-passant target and the back rank the game
//!   started from. The `LegalMoves` trait generates pseudo-legal and
//!   legal moves for any type that can lend out a position, and `Play`
//!   builds checkmate and stalemate detection on top of it.
//!
//! * `Board` wraps a position with the history of executed moves and is
//!   the only type that executes moves for a host. A rejected move leaves
//!   the board untouched.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use thiserror::Error;

mod backrank;
mod castling;
mod history;
mod material;
mod moves;
mod play;
mod position;
mod square;

pub use backrank::*;
pub use castling::*;
pub use history::*;
pub use material::*;
pub use moves::*;
pub use play::*;
pub use position::*;
pub use square::*;

/// Chooses the piece a pawn becomes when it reaches the last row.
///
/// Returning `None` promotes to a queen.
pub trait Promoter {
    fn choose_promotion(&mut self, side: Color, square: Square) -> Option<Promotion>;
}

impl<F> Promoter for F
where
    F: FnMut(Color, Square) -> Option<Promotion>,
{
    fn choose_promotion(&mut self, side: Color, square: Square) -> Option<Promotion> {
        self(side, square)
    }
}

impl Promoter for Promotion {
    fn choose_promotion(&mut self, _side: Color, _square: Square) -> Option<Promotion> {
        Some(*self)
    }
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Expecting 64 squares, found {0}")]
    GridSize(usize),
    #[error("Expecting exactly one {0} king, found {1}")]
    KingCount(Color, usize),
    #[error("En passant target {0} must be a vacant square on row 2 or row 5")]
    EnPassant(Square),
}

/// Everything needed to rebuild a board. The encoding is left to the
/// persistence layer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// 64 squares in row-major order, starting from `A8`.
    pub grid: Vec<Option<Material>>,
    pub variant: Variant,
    pub backrank: BackRank,
    pub castling: Pair<CastlingRights>,
    pub en_passant: Option<Square>,
    pub history: Vec<MoveRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    position: Position,
    history: History,
}

impl Default for Board {
    fn default() -> Self {
        Self::classical()
    }
}

impl Board {
    /// Sets up a new board. Chess960 draws its back rank from the thread
    /// local generator.
    #[cfg(feature = "random")]
    pub fn new(variant: Variant) -> Self {
        match variant {
            Variant::Classical => Self::classical(),
            Variant::Chess960 => Self::chess960(),
        }
    }

    pub fn classical() -> Self {
        Self::from_backrank(Variant::Classical, BackRank::standard())
    }

    #[cfg(feature = "random")]
    pub fn chess960() -> Self {
        Self::from_backrank(Variant::Chess960, BackRank::shuffled())
    }

    #[cfg(feature = "random")]
    pub fn chess960_with<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_backrank(Variant::Chess960, BackRank::shuffled_with(rng))
    }

    /// Sets up both sides from `backrank`, mirrored, with pawns in front.
    pub fn from_backrank(variant: Variant, backrank: BackRank) -> Self {
        Self {
            position: Position::new(variant, backrank),
            history: History::new(),
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn variant(&self) -> Variant {
        self.position.variant()
    }

    pub fn backrank(&self) -> &BackRank {
        self.position.backrank()
    }

    pub fn piece_at(&self, square: Square) -> Option<Material> {
        self.position.contents(square)
    }

    /// Places or clears a piece. Castling rights, en passant and history
    /// are left alone.
    pub fn set_piece_at(&mut self, square: Square, value: Option<Material>) {
        self.position.set_contents(square, value);
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.position.en_passant()
    }

    pub fn castling_rights(&self, color: Color) -> CastlingRights {
        self.position.rights()[color]
    }

    pub fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        self.castling_rights(color).has(side)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Moves the piece on `from` to `to` if that is one of its legal moves.
    /// Pawns reaching the last row become queens.
    ///
    /// Returns `false`, leaving the board unchanged, when the move is not
    /// legal.
    pub fn move_piece(&mut self, from: Square, to: Square) -> bool {
        self.move_piece_with(from, to, &mut Promotion::Queen)
    }

    /// Like `move_piece`, but asks `promoter` what a pawn reaching the last
    /// row becomes. The choice is made before the board is touched.
    pub fn move_piece_with<P>(&mut self, from: Square, to: Square, promoter: &mut P) -> bool
    where
        P: Promoter + ?Sized,
    {
        let Some(mv) = self.legal_move_set(from).get(to) else {
            return false;
        };
        let promotion = match (mv, self.position.contents(from)) {
            (LegalMove::Standard(..), Some(material))
                if material.piece().is_pawn() && to.rank().is_back_rank(!material.color()) =>
            {
                let choice = promoter.choose_promotion(material.color(), to);
                Some(choice.map(Piece::from).unwrap_or(Piece::Queen))
            }
            _ => None,
        };
        match self.position.apply_move(mv, promotion) {
            Some(record) => {
                self.history.push(record);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.position.squares().to_vec(),
            variant: self.position.variant(),
            backrank: *self.position.backrank(),
            castling: self.position.rights(),
            en_passant: self.position.en_passant(),
            history: self.history.as_slice().to_vec(),
        }
    }

    /// Rebuilds a board from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a `SnapshotError` if the grid does not hold 64 squares, if
    /// either side does not have exactly one king, or if the en-passant
    /// target is not a vacant square on row 2 or row 5.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let Snapshot { grid, variant, backrank, castling, en_passant, history } = snapshot;
        if grid.len() != 64 {
            return Err(SnapshotError::GridSize(grid.len()).into());
        }
        let mut position = Position::empty(variant, backrank);
        for (square, material) in Square::iter().zip(grid) {
            position.set_contents(square, material);
        }
        for color in Color::iter() {
            let king = Material::new(color, Piece::King);
            let count = position
                .squares()
                .iter()
                .filter(|(_, material)| *material == Some(king))
                .count();
            if count != 1 {
                return Err(SnapshotError::KingCount(color, count).into());
            }
        }
        if let Some(target) = en_passant {
            if !matches!(target.row(), 2 | 5) || !position.is_vacant(target) {
                return Err(SnapshotError::EnPassant(target).into());
            }
        }
        position.set_rights(Pair::new(
            CastlingRights::new(Color::White, castling.white().oo(), castling.white().ooo()),
            CastlingRights::new(Color::Black, castling.black().oo(), castling.black().ooo()),
        ));
        position.set_en_passant(en_passant);
        Ok(Self {
            position,
            history: history.into(),
        })
    }
}

impl AsRef<Position> for Board {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}

impl LegalMoves for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter() {
            write!(f, "{}", rank)?;
            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(material) => write!(f, " {}", material)?,
                    None => write!(f, " ·")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, " ")?;
        for file in File::iter() {
            write!(f, " {}", file)?;
        }
        writeln!(f)
    }
}
