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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::{Index, IndexMut};
use strum::IntoEnumIterator;

use super::backrank::{BackRank, Variant};
use super::castling::{
    Castling, CastlingMut, CastlingRights, CastlingRightsMut, CastlingRightsRef,
};
use super::history::MoveRecord;
use super::material::{Color, Material, Pair, Piece};
use super::moves::LegalMove;
use super::square::{Direction, File, Mask, Rank, Square};

use Color::*;
use Piece::*;

/// The 64 squares of the grid, row-major from `A8`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squares([Option<Material>; 64]);

impl Squares {
    fn empty() -> Self {
        Self([None; 64])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, Option<Material>)> + '_ {
        Square::iter().map(|square| (square, self[square]))
    }

    pub fn to_vec(&self) -> Vec<Option<Material>> {
        self.0.to_vec()
    }
}

impl Index<Square> for Squares {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Squares {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

/// Occupancy by color, plus where the kings stand.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Masks {
    pieces: Pair<Mask>,
    kings: Mask,
}

impl From<&Squares> for Masks {
    fn from(value: &Squares) -> Self {
        let mut masks = Masks::empty();
        for (square, material) in value.iter() {
            if let Some(material) = material {
                masks.set(square, material);
            }
        }
        masks
    }
}

impl Masks {
    fn empty() -> Self {
        Self {
            pieces: Pair::new(Mask::empty(), Mask::empty()),
            kings: Mask::empty(),
        }
    }

    fn set(&mut self, square: Square, material: Material) {
        self.pieces[material.color()] |= square;
        if material.piece().is_king() {
            self.kings |= square;
        }
    }

    fn reset(&mut self, square: Square, material: Material) {
        self.pieces[material.color()].reset(square);
        if material.piece().is_king() {
            self.kings.reset(square);
        }
    }
}

/// Grid contents plus everything the rules need besides history: castling
/// rights, the en-passant target and the back rank the game started from.
///
/// A position does not know whose turn it is. Every query takes the side
/// it is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    squares: Squares,
    masks: Masks,
    variant: Variant,
    backrank: BackRank,
    castling: Pair<CastlingRights>,
    en_passant: Option<Square>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new(Variant::Classical, BackRank::standard())
    }
}

impl Position {
    pub fn new(variant: Variant, backrank: BackRank) -> Self {
        let position = Self::empty(variant, backrank);
        position.init()
    }

    /// A position with no pieces. Castling rights start out granted.
    pub fn empty(variant: Variant, backrank: BackRank) -> Self {
        Self {
            squares: Squares::empty(),
            masks: Masks::empty(),
            variant,
            backrank,
            castling: CastlingRights::initial(),
            en_passant: None,
        }
    }

    fn init(mut self) -> Self {
        for file in File::iter() {
            self.init_file(file, self.backrank[file]);
        }
        self
    }

    fn init_file(&mut self, file: File, piece: Piece) {
        for color in Color::iter() {
            let square = Square::new(file, Rank::pawn_rank(color));
            let _ = self.place(square, Material::new(color, Pawn));
            let square = Square::new(file, Rank::back_rank(color));
            let _ = self.place(square, Material::new(color, piece));
        }
    }

    pub fn squares(&self) -> &Squares {
        &self.squares
    }

    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn backrank(&self) -> &BackRank {
        &self.backrank
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn rights(&self) -> Pair<CastlingRights> {
        self.castling
    }

    #[inline]
    pub fn contents(&self, square: Square) -> Option<Material> {
        self.squares[square]
    }

    #[inline]
    pub fn occupied_by(&self, color: Color) -> Mask {
        self.masks.pieces[color]
    }

    #[inline]
    pub fn occupied(&self) -> Mask {
        self.masks.pieces[White] | self.masks.pieces[Black]
    }

    #[inline]
    pub fn is_vacant(&self, square: Square) -> bool {
        self.squares[square].is_none()
    }

    /// Square of `color`'s king, if it has one.
    #[inline]
    pub fn king(&self, color: Color) -> Option<Square> {
        (self.masks.pieces[color] & self.masks.kings).iter().next()
    }

    #[inline]
    pub fn castling(&self, color: Color) -> CastlingRightsRef<'_> {
        CastlingRightsRef::new(&self.castling[color], &self.backrank)
    }

    #[inline]
    pub fn castling_mut(&mut self, color: Color) -> CastlingRightsMut<'_> {
        CastlingRightsMut::new(&mut self.castling[color], &self.backrank)
    }

    /// Overwrites a square without touching castling rights or en passant.
    pub fn set_contents(&mut self, square: Square, value: Option<Material>) {
        match value {
            Some(material) => {
                let _ = self.place(square, material);
            }
            None => {
                let _ = self.remove(square);
            }
        }
    }

    pub(super) fn set_rights(&mut self, rights: Pair<CastlingRights>) {
        self.castling = rights;
    }

    pub(super) fn set_en_passant(&mut self, value: Option<Square>) {
        self.en_passant = value;
    }

    /// Plays `mv` and returns the record of what happened. `promotion`
    /// replaces the moving piece when it is given.
    ///
    /// The move must come from the legal move set of this position.
    pub fn apply_move(&mut self, mv: LegalMove, promotion: Option<Piece>) -> Option<MoveRecord> {
        match mv {
            LegalMove::Castle(color, side) => {
                let castling = self.castling(color);
                let king_src = castling.king_src();
                let rook_src = castling.rook_src(side);
                let king_dest = castling.king_dest(side);
                let rook_dest = castling.rook_dest(side);
                let king = self.remove(king_src)?;
                let rook = self.remove(rook_src)?;
                self.place(king_dest, king);
                self.place(rook_dest, rook);
                self.castling_mut(color).clear();
                self.en_passant = None;
                Some(MoveRecord::new(king_src, king_dest, king, None, None))
            }
            LegalMove::Standard(from, to)
            | LegalMove::DoubleAdvance(from, to)
            | LegalMove::EnPassant(from, to) => {
                let material = self.contents(from)?;
                let color = material.color();
                let captured = match mv {
                    LegalMove::EnPassant(..) => self.remove(Square::new(to.file(), from.rank())),
                    _ => self.contents(to),
                };
                self.en_passant = match mv {
                    LegalMove::DoubleAdvance(..) => between(from, to).iter().next(),
                    _ => None,
                };
                if material.piece().is_king() {
                    self.castling_mut(color).clear();
                } else {
                    self.castling_mut(color).update(from);
                }
                if captured.is_some() {
                    self.castling_mut(!color).update(to);
                }
                let record = MoveRecord::new(from, to, material, captured, promotion);
                let mut placed = self.remove(from)?;
                if let Some(piece) = promotion {
                    placed.set_piece(piece);
                }
                self.place(to, placed);
                Some(record)
            }
        }
    }

    pub(super) fn place(&mut self, square: Square, material: Material) -> Option<Material> {
        let replaced = self.remove(square);
        self.squares[square] = Some(material);
        self.masks.set(square, material);
        replaced
    }

    pub(super) fn remove(&mut self, square: Square) -> Option<Material> {
        if let Some(material) = self.squares[square] {
            self.squares[square] = None;
            self.masks.reset(square, material);
            return Some(material);
        }
        None
    }
}

impl Index<Square> for Position {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

#[inline]
pub(super) fn blocked(from: Square, to: Square) -> Mask {
    let index = from.to_index() * 64 + to.to_index();
    SQUARES_SHIELDED[index] | to.to_mask()
}

#[inline]
pub(super) fn shielded(from: Square, to: Square) -> Mask {
    let index = from.to_index() * 64 + to.to_index();
    SQUARES_SHIELDED[index]
}

#[inline]
pub(super) fn between(from: Square, to: Square) -> Mask {
    let index = from.to_index() * 64 + to.to_index();
    SQUARES_BETWEEN[index]
}

pub(super) static SQUARES_BETWEEN: Lazy<[Mask; 64 * 64]> = Lazy::new(|| {
    // Returns a mask of squares between `start` and `end` (exclusive of both)
    // if they are not equal and in a line. Otherwise returns an empty mask.
    fn squares_between(start: Square, end: Square) -> Mask {
        let mut mask = Mask::empty();
        if let Some(step) = (end - start).to_unit() {
            let mut next = start + step;
            while let Some(square) = next {
                if square == end {
                    break;
                }
                mask |= square;
                next = square + step;
            }
        }
        mask
    }

    let mut array = [Mask::empty(); 64 * 64];
    let mut visited = HashSet::new();
    for start in Square::iter() {
        let start_index = start.to_index();
        for end in Square::iter() {
            if start == end {
                continue;
            }
            let end_index = end.to_index();
            let index1 = start_index * 64 + end_index;
            let index2 = end_index * 64 + start_index;
            if visited.insert(index1) {
                visited.insert(index2);
                if ALL_LINES[start_index].contains(end) {
                    let mask = squares_between(start, end);
                    array[index1] = mask;
                    array[index2] = mask;
                }
            }
        }
    }
    array
});

pub(super) static SQUARES_SHIELDED: Lazy<[Mask; 64 * 64]> = Lazy::new(|| {
    // Returns a mask of squares between `end` (exclusive) and the edge of
    // the board if we draw a line from `start` through `end`. Empty if
    // `start` and `end` are equal or not in a line.
    fn squares_shielded(start: Square, end: Square) -> Mask {
        let mut mask = Mask::empty();
        if let Some(step) = (end - start).to_unit() {
            let mut next = end + step;
            while let Some(square) = next {
                mask |= square;
                next = square + step;
            }
        }
        mask
    }

    let mut array = [Mask::empty(); 64 * 64];
    for start in Square::iter() {
        let start_index = start.to_index();
        for end in Square::iter() {
            if start == end {
                continue;
            }
            if ALL_LINES[start_index].contains(end) {
                array[start_index * 64 + end.to_index()] = squares_shielded(start, end);
            }
        }
    }
    array
});

pub(super) static HORIZONTALS: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = square.file().to_mask() | square.rank().to_mask();
    }
    array
});

pub(super) static DIAGONALS: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        let mut mask = square.to_mask();
        Direction::diagonals().for_each(|dir| {
            let mut next = square + dir;
            while let Some(sq) = next {
                mask |= sq;
                next = sq + dir;
            }
        });
        array[square] = mask;
    }
    array
});

pub(super) static ALL_LINES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = HORIZONTALS[square] | DIAGONALS[square];
    }
    array
});

#[cfg(test)]
impl Position {
    pub fn with_contents(mut self, square: Square, value: Option<Material>) -> Self {
        self.set_contents(square, value);
        self
    }
    pub fn with_en_passant(mut self, value: Option<Square>) -> Self {
        self.en_passant = value;
        self
    }
    pub fn clear_white_oo(mut self) -> Self {
        self.castling[White].clear_oo();
        self
    }
    pub fn clear_white_ooo(mut self) -> Self {
        self.castling[White].clear_ooo();
        self
    }
}
