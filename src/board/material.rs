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

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

/// A piece of a specific color. Values are copied onto squares, never shared.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
}

impl Material {
    pub const WK: Self = Self::new(White, King);
    pub const WQ: Self = Self::new(White, Queen);
    pub const WR: Self = Self::new(White, Rook);
    pub const WB: Self = Self::new(White, Bishop);
    pub const WN: Self = Self::new(White, Knight);
    pub const WP: Self = Self::new(White, Pawn);

    pub const BK: Self = Self::new(Black, King);
    pub const BQ: Self = Self::new(Black, Queen);
    pub const BR: Self = Self::new(Black, Rook);
    pub const BB: Self = Self::new(Black, Bishop);
    pub const BN: Self = Self::new(Black, Knight);
    pub const BP: Self = Self::new(Black, Pawn);

    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        Self { color, piece }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub fn set_piece(&mut self, piece: Piece) {
        self.piece = piece
    }

    /// Unicode chess symbol, hollow for White and filled for Black.
    pub const fn glyph(&self) -> char {
        match (self.color, self.piece) {
            (White, King) => '♔',
            (White, Queen) => '♕',
            (White, Rook) => '♖',
            (White, Bishop) => '♗',
            (White, Knight) => '♘',
            (White, Pawn) => '♙',
            (Black, King) => '♚',
            (Black, Queen) => '♛',
            (Black, Rook) => '♜',
            (Black, Bishop) => '♝',
            (Black, Knight) => '♞',
            (Black, Pawn) => '♟',
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

use Color::{Black, White};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }
}

/// One value per side, indexed by `Color`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self((white, black))
    }
    pub fn white(&self) -> &T {
        &self.0 .0
    }
    pub fn white_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn black(&self) -> &T {
        &self.0 .1
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.white().hash(state);
        self.black().hash(state);
    }
}

impl<T> Index<Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        match index {
            White => self.white(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            White => self.white_mut(),
            Black => self.black_mut(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
use Piece::{Bishop, King, Knight, Pawn, Queen, Rook};

impl Piece {
    pub fn is_king(&self) -> bool {
        matches!(*self, King)
    }
    pub fn is_pawn(&self) -> bool {
        matches!(*self, Pawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_glyphs_differ_by_color() {
        for piece in Piece::iter() {
            let white = Material::new(White, piece);
            let black = Material::new(Black, piece);
            assert_ne!(white.glyph(), black.glyph());
        }
        assert_eq!(Material::WK.glyph(), '♔');
        assert_eq!(Material::BP.to_string(), "♟");
    }
    #[test]
    fn test_pair_indexing() {
        let mut pair = Pair::new(1, 2);
        assert_eq!(pair[White], 1);
        assert_eq!(pair[Black], 2);
        pair[Black] = 5;
        assert_eq!(*pair.black(), 5);
    }
    #[test]
    fn test_color_not() {
        assert_eq!(!White, Black);
        assert_eq!(!Black, White);
    }
    #[test]
    fn test_material_is_a_value() {
        let mut promoted = Material::WP;
        promoted.set_piece(Queen);
        assert_eq!(promoted, Material::WQ);
        assert_eq!(Material::WP.piece(), Pawn);
    }
}
