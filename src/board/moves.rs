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
use std::collections::HashMap;
use std::ops::Index;
use std::ops::{BitOr, BitOrAssign};
use strum::IntoEnumIterator;

use super::backrank::Variant;
use super::castling::{Castling, CastlingSide};
use super::material::{Color, Material, Piece};
use super::position::{blocked, shielded, Position};
use super::position::{ALL_LINES, DIAGONALS, HORIZONTALS};
use super::square::{Direction, File, Mask, Offset, Rank, Square};

use Color::*;
use Piece::*;
use Rank::*;

/// Move generation and king safety over anything that can lend out a
/// `Position`.
///
/// None of these methods mutate the position they are asked about. King
/// safety is tested on a scratch copy, so the caller's grid is never in
/// an intermediate state.
pub trait LegalMoves: AsRef<Position> {
    /// Pseudo-legal destinations of the piece on `from`: its movement rule
    /// and board occupancy, ignoring whether its own king ends up in check.
    /// Castling and en passant are not included.
    fn possible_moves(&self, from: Square) -> Mask {
        let pos: &Position = self.as_ref();
        let Some(material) = pos.contents(from) else {
            return Mask::empty();
        };
        let color = material.color();
        let ours = pos.occupied_by(color);
        let theirs = pos.occupied_by(!color);
        match material.piece() {
            King => KING_MOVES[from] - ours,
            Knight => KNIGHT_MOVES[from] - ours,
            Queen => exclude_blocked_moves(from, QUEEN_MOVES[from], ours, theirs),
            Rook => exclude_blocked_moves(from, ROOK_MOVES[from], ours, theirs),
            Bishop => exclude_blocked_moves(from, BISHOP_MOVES[from], ours, theirs),
            Pawn => {
                let vacant = !pos.occupied();
                let mut advances = single_advances(color, from) & vacant;
                if !advances.is_empty() {
                    advances |= double_advances(color, from) & vacant;
                }
                advances | (pawn_attacks(color, from) & theirs)
            }
        }
    }

    /// Squares the piece on `from` attacks, whatever stands on them. Pawns
    /// attack their two forward diagonals even when those are empty.
    fn attacks(&self, from: Square) -> Mask {
        let pos: &Position = self.as_ref();
        let Some(material) = pos.contents(from) else {
            return Mask::empty();
        };
        let occupied = pos.occupied();
        match material.piece() {
            King => KING_MOVES[from],
            Knight => KNIGHT_MOVES[from],
            Queen => exclude_blocked_attacks(from, QUEEN_MOVES[from], occupied),
            Rook => exclude_blocked_attacks(from, ROOK_MOVES[from], occupied),
            Bishop => exclude_blocked_attacks(from, BISHOP_MOVES[from], occupied),
            Pawn => pawn_attacks(material.color(), from),
        }
    }

    /// Whether any piece of `defender`'s opponent attacks `square`.
    fn is_square_attacked(&self, square: Square, defender: Color) -> bool {
        let pos: &Position = self.as_ref();
        pos.occupied_by(!defender)
            .iter()
            .any(|from| self.attacks(from).contains(square))
    }

    /// False when `side` has no king on the board.
    fn is_king_in_check(&self, side: Color) -> bool {
        let pos: &Position = self.as_ref();
        match pos.king(side) {
            Some(king) => self.is_square_attacked(king, side),
            None => false,
        }
    }

    /// Plays `from -> to` on a scratch copy and reports whether the mover's
    /// king is safe afterwards. An en-passant capture also lifts the
    /// captured pawn from the copy.
    fn is_legal_move(&self, from: Square, to: Square) -> bool {
        let pos: &Position = self.as_ref();
        let Some(material) = pos.contents(from) else {
            return false;
        };
        let mut scratch = pos.clone();
        if material.piece().is_pawn()
            && pos.en_passant() == Some(to)
            && from.col() != to.col()
            && pos.is_vacant(to)
        {
            scratch.remove(Square::new(to.file(), from.rank()));
        }
        scratch.remove(from);
        scratch.place(to, material);
        !scratch.is_king_in_check(material.color())
    }

    fn legal_moves(&self, from: Square) -> Mask {
        self.legal_move_set(from).destinations()
    }

    /// Every legal destination of the piece on `from`, keyed to the kind of
    /// move that reaches it. Empty if `from` is vacant.
    fn legal_move_set(&self, from: Square) -> MoveSet<LegalMove> {
        let mut result = MoveSet::new();
        let pos: &Position = self.as_ref();
        let Some(material) = pos.contents(from) else {
            return result;
        };
        for dest in self.possible_moves(from).iter() {
            if self.is_legal_move(from, dest) {
                let mv = if material.piece().is_pawn() && from.row().abs_diff(dest.row()) == 2 {
                    LegalMove::DoubleAdvance(from, dest)
                } else {
                    LegalMove::Standard(from, dest)
                };
                result.insert(dest, mv);
            }
        }
        match material.piece() {
            King => {
                // an ordinary king step keeps its meaning when castling
                // lands on the same square
                let castles = self.castle_moves(from, material.color());
                for (dest, mv) in castles.iter() {
                    if !result.contains(dest) {
                        result.insert(dest, mv);
                    }
                }
            }
            Pawn => result |= self.en_passant_moves(from, material.color()),
            _ => {}
        }
        result
    }

    /// Castling moves for the `color` king standing on `from`.
    ///
    /// The king must be on its starting square and not in check, the
    /// castling rook on its starting square, the lanes both pieces use
    /// vacant, and no square the king stands on or crosses attacked. In
    /// Chess960 the rook's square is accepted as a destination too.
    fn castle_moves(&self, from: Square, color: Color) -> MoveSet<LegalMove> {
        let mut result = MoveSet::new();
        let pos: &Position = self.as_ref();
        let castling = pos.castling(color);
        if from != castling.king_src() || self.is_king_in_check(color) {
            return result;
        }
        let rook = Material::new(color, Rook);
        let mut castles = Vec::new();
        for side in CastlingSide::iter() {
            let rook_src = castling.rook_src(side);
            if castling.has(side)
                && pos.contents(rook_src) == Some(rook)
                && (castling.blocking_lane(side) & pos.occupied()).is_empty()
                && !castling
                    .king_path(side)
                    .iter()
                    .any(|square| self.is_square_attacked(square, color))
                && self.is_safe_castle(color, side)
            {
                castles.push((side, rook_src, castling.king_dest(side)));
            }
        }
        if pos.variant() == Variant::Chess960 {
            for (side, rook_src, _) in castles.iter() {
                result.insert(*rook_src, LegalMove::Castle(color, *side));
            }
        }
        for (side, _, king_dest) in castles {
            result.insert(king_dest, LegalMove::Castle(color, side));
        }
        result
    }

    /// Whether the king is out of check once the castle has been played.
    fn is_safe_castle(&self, color: Color, side: CastlingSide) -> bool {
        let pos: &Position = self.as_ref();
        let mut scratch = pos.clone();
        match scratch.apply_move(LegalMove::Castle(color, side), None) {
            Some(_) => !scratch.is_king_in_check(color),
            None => false,
        }
    }

    /// The en-passant capture for the `color` pawn on `from`, if any.
    fn en_passant_moves(&self, from: Square, color: Color) -> MoveSet<LegalMove> {
        let mut result = MoveSet::new();
        let pos: &Position = self.as_ref();
        if let Some(target) = pos.en_passant() {
            let victim = Square::new(target.file(), from.rank());
            if from.rank() == Rank::en_passant_rank(color)
                && target.rank() == Rank::skipped_rank(!color)
                && pawn_attacks(color, from).contains(target)
                && pos.contents(victim) == Some(Material::new(!color, Pawn))
                && self.is_legal_move(from, target)
            {
                result.insert(target, LegalMove::EnPassant(from, target));
            }
        }
        result
    }
}

impl LegalMoves for Position {}

impl AsRef<Position> for Position {
    fn as_ref(&self) -> &Position {
        self
    }
}

fn exclude_blocked_moves(from: Square, mut mask: Mask, ours: Mask, theirs: Mask) -> Mask {
    for square in (ours & mask).iter() {
        // exclude squares blocked by our own pieces
        mask &= !blocked(from, square);
    }
    for square in (theirs & mask).iter() {
        // exclude squares shielded by their pieces
        mask &= !shielded(from, square);
    }
    mask
}

fn exclude_blocked_attacks(from: Square, mut mask: Mask, occupied: Mask) -> Mask {
    for square in (occupied & mask).iter() {
        mask &= !shielded(from, square);
    }
    mask
}

#[inline]
fn single_advances(color: Color, from: Square) -> Mask {
    match color {
        White => WHITE_SINGLE_ADVANCES[from],
        Black => BLACK_SINGLE_ADVANCES[from],
    }
}

#[inline]
fn double_advances(color: Color, from: Square) -> Mask {
    match color {
        White => WHITE_DOUBLE_ADVANCES[from],
        Black => BLACK_DOUBLE_ADVANCES[from],
    }
}

#[inline]
fn pawn_attacks(color: Color, from: Square) -> Mask {
    match color {
        White => WHITE_PAWN_ATTACKS[from],
        Black => BLACK_PAWN_ATTACKS[from],
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl From<Promotion> for Piece {
    fn from(value: Promotion) -> Self {
        match value {
            Promotion::Queen => Piece::Queen,
            Promotion::Rook => Piece::Rook,
            Promotion::Bishop => Piece::Bishop,
            Promotion::Knight => Piece::Knight,
        }
    }
}

impl TryFrom<Piece> for Promotion {
    type Error = Piece;
    fn try_from(value: Piece) -> Result<Self, Self::Error> {
        match value {
            Piece::Queen => Ok(Promotion::Queen),
            Piece::Rook => Ok(Promotion::Rook),
            Piece::Bishop => Ok(Promotion::Bishop),
            Piece::Knight => Ok(Promotion::Knight),
            other => Err(other),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalMove {
    Standard(Square, Square),
    DoubleAdvance(Square, Square),
    EnPassant(Square, Square),
    Castle(Color, CastlingSide),
}

#[derive(Debug, Clone)]
pub struct MoveSet<T> {
    destinations: Mask,
    map: HashMap<Square, T>,
}

impl<T: Copy> MoveSet<T> {
    pub fn new() -> Self {
        Self {
            destinations: Mask::empty(),
            map: HashMap::new(),
        }
    }
    pub fn insert(&mut self, dest: Square, mv: T) {
        self.destinations |= dest;
        self.map.insert(dest, mv);
    }
    pub fn destinations(&self) -> Mask {
        self.destinations
    }
    pub fn get(&self, dest: Square) -> Option<T> {
        self.map.get(&dest).copied()
    }
    pub fn contains(&self, dest: Square) -> bool {
        self.destinations.contains(dest)
    }
    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
    /// Destinations with their moves, in row-major square order.
    pub fn iter(&self) -> impl Iterator<Item = (Square, T)> + '_ {
        self.destinations
            .iter()
            .filter_map(|dest| self.get(dest).map(|mv| (dest, mv)))
    }
}

impl<T: Copy> Default for MoveSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> BitOr for MoveSet<T> {
    type Output = Self;
    fn bitor(mut self, rhs: Self) -> Self::Output {
        self |= rhs;
        self
    }
}

impl<T: Copy> BitOrAssign for MoveSet<T> {
    fn bitor_assign(&mut self, rhs: Self) {
        for (dest, mv) in rhs.iter() {
            self.insert(dest, mv);
        }
    }
}

impl<T: Copy> Index<Square> for MoveSet<T> {
    type Output = T;
    fn index(&self, dest: Square) -> &Self::Output {
        self.map.index(&dest)
    }
}

static KING_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = Mask::from_squares(Direction::iter().filter_map(|dir| square + dir));
    }
    array
});

static QUEEN_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = ALL_LINES[square] - square;
    }
    array
});

static ROOK_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = HORIZONTALS[square] - square;
    }
    array
});

static BISHOP_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] = DIAGONALS[square] - square;
    }
    array
});

static KNIGHT_MOVES: Lazy<[Mask; 64]> = Lazy::new(|| {
    const OFFSETS: [Offset; 8] = [
        Offset::new(-2, -1),
        Offset::new(-2, 1),
        Offset::new(2, -1),
        Offset::new(2, 1),
        Offset::new(-1, -2),
        Offset::new(-1, 2),
        Offset::new(1, -2),
        Offset::new(1, 2),
    ];
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        array[square] =
            Mask::from_squares(OFFSETS.into_iter().filter_map(|offset| square + offset));
    }
    array
});

static WHITE_SINGLE_ADVANCES: Lazy<[Mask; 64]> = Lazy::new(|| single_advance_table(White));
static BLACK_SINGLE_ADVANCES: Lazy<[Mask; 64]> = Lazy::new(|| single_advance_table(Black));

fn single_advance_table(color: Color) -> [Mask; 64] {
    let forward = Direction::forward(color);
    let mut array = [Mask::empty(); 64];
    for rank in Rank::iter() {
        match rank {
            Rank1 | Rank8 => {}
            _ => {
                for file in File::iter() {
                    let square = Square::new(file, rank);
                    if let Some(dest) = square + forward {
                        array[square] = dest.to_mask();
                    }
                }
            }
        };
    }
    array
}

static WHITE_DOUBLE_ADVANCES: Lazy<[Mask; 64]> = Lazy::new(|| double_advance_table(White));
static BLACK_DOUBLE_ADVANCES: Lazy<[Mask; 64]> = Lazy::new(|| double_advance_table(Black));

fn double_advance_table(color: Color) -> [Mask; 64] {
    let forward: Offset = Direction::forward(color).into();
    let offset = Offset::new(0, forward.y * 2);
    let mut array = [Mask::default(); 64];
    for file in File::iter() {
        let square = Square::new(file, Rank::pawn_rank(color));
        if let Some(dest) = square + offset {
            array[square] = dest.to_mask();
        }
    }
    array
}

static WHITE_PAWN_ATTACKS: Lazy<[Mask; 64]> = Lazy::new(|| pawn_attack_table(White));
static BLACK_PAWN_ATTACKS: Lazy<[Mask; 64]> = Lazy::new(|| pawn_attack_table(Black));

fn pawn_attack_table(color: Color) -> [Mask; 64] {
    let forward: Offset = Direction::forward(color).into();
    let offsets = [Offset::new(-1, forward.y), Offset::new(1, forward.y)];
    let mut array = [Mask::default(); 64];
    for square in Square::iter() {
        if matches!(square.rank(), Rank1 | Rank8) {
            continue;
        }
        array[square] =
            Mask::from_squares(offsets.into_iter().filter_map(|offset| square + offset));
    }
    array
}
