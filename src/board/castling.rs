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
use strum_macros::{Display, EnumIter};

use super::backrank::BackRank;
use super::material::{Color, Pair};
use super::position::between;
use super::square::{File, Mask, Rank, Square};

use File::*;

/// The wing a side castles towards.
#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}

impl CastlingSide {
    /// File the king ends up on, whatever the starting arrangement.
    #[inline]
    pub const fn king_to(self) -> File {
        match self {
            CastlingSide::KingSide => FileG,
            CastlingSide::QueenSide => FileC,
        }
    }
    /// File the rook ends up on, whatever the starting arrangement.
    #[inline]
    pub const fn rook_to(self) -> File {
        match self {
            CastlingSide::KingSide => FileF,
            CastlingSide::QueenSide => FileD,
        }
    }
}

/// Castling lanes for one side, derived from the back rank the game
/// started with.
pub trait Castling: AsRef<BackRank> + AsRef<CastlingRights> {
    fn has(&self, side: CastlingSide) -> bool {
        let rights: &CastlingRights = self.as_ref();
        rights.has(side)
    }
    #[inline]
    fn king_src(&self) -> Square {
        let backrank: &BackRank = self.as_ref();
        let rights: &CastlingRights = self.as_ref();
        Square::new(backrank.king(), rights.rank())
    }
    #[inline]
    fn rook_src(&self, side: CastlingSide) -> Square {
        let backrank: &BackRank = self.as_ref();
        let rights: &CastlingRights = self.as_ref();
        let [left, right] = backrank.rooks();
        match side {
            CastlingSide::KingSide => Square::new(right, rights.rank()),
            CastlingSide::QueenSide => Square::new(left, rights.rank()),
        }
    }
    #[inline]
    fn king_dest(&self, side: CastlingSide) -> Square {
        let rights: &CastlingRights = self.as_ref();
        Square::new(side.king_to(), rights.rank())
    }
    #[inline]
    fn rook_dest(&self, side: CastlingSide) -> Square {
        let rights: &CastlingRights = self.as_ref();
        Square::new(side.rook_to(), rights.rank())
    }
    /// Squares that must be vacant, apart from the castling king and rook.
    fn blocking_lane(&self, side: CastlingSide) -> Mask {
        let king_src = self.king_src();
        let rook_src = self.rook_src(side);
        let king_dest = self.king_dest(side);
        let rook_dest = self.rook_dest(side);
        let lane = between(king_src, rook_src)
            | between(king_src, king_dest)
            | between(rook_src, rook_dest)
            | king_dest
            | rook_dest;
        lane - king_src - rook_src
    }
    /// Squares the king stands on or crosses, both ends included.
    fn king_path(&self, side: CastlingSide) -> Mask {
        let king_src = self.king_src();
        let king_dest = self.king_dest(side);
        between(king_src, king_dest) | king_src | king_dest
    }
}

pub trait CastlingMut: Castling + AsMut<CastlingRights> {
    /// Drops any right that depends on a piece standing on `square`.
    fn update(&mut self, square: Square) {
        let king = self.king_src();
        let oo_rook = self.rook_src(CastlingSide::KingSide);
        let ooo_rook = self.rook_src(CastlingSide::QueenSide);
        let rights: &mut CastlingRights = self.as_mut();
        if rights.oo() && (square == king || square == oo_rook) {
            rights.clear_oo();
        }
        if rights.ooo() && (square == king || square == ooo_rook) {
            rights.clear_ooo();
        }
    }
    fn clear(&mut self) {
        let rights: &mut CastlingRights = self.as_mut();
        rights.clear();
    }
}

pub struct CastlingRightsRef<'a> {
    rights: &'a CastlingRights,
    backrank: &'a BackRank,
}

impl<'a> CastlingRightsRef<'a> {
    #[inline]
    pub fn new(rights: &'a CastlingRights, backrank: &'a BackRank) -> Self {
        Self { rights, backrank }
    }
}

impl AsRef<BackRank> for CastlingRightsRef<'_> {
    fn as_ref(&self) -> &BackRank {
        self.backrank
    }
}
impl AsRef<CastlingRights> for CastlingRightsRef<'_> {
    fn as_ref(&self) -> &CastlingRights {
        self.rights
    }
}
impl Castling for CastlingRightsRef<'_> {}

pub struct CastlingRightsMut<'a> {
    rights: &'a mut CastlingRights,
    backrank: &'a BackRank,
}

impl<'a> CastlingRightsMut<'a> {
    #[inline]
    pub fn new(rights: &'a mut CastlingRights, backrank: &'a BackRank) -> Self {
        Self { rights, backrank }
    }
}

impl AsRef<BackRank> for CastlingRightsMut<'_> {
    fn as_ref(&self) -> &BackRank {
        self.backrank
    }
}
impl AsRef<CastlingRights> for CastlingRightsMut<'_> {
    fn as_ref(&self) -> &CastlingRights {
        self.rights
    }
}
impl AsMut<CastlingRights> for CastlingRightsMut<'_> {
    fn as_mut(&mut self) -> &mut CastlingRights {
        self.rights
    }
}

impl Castling for CastlingRightsMut<'_> {}

impl CastlingMut for CastlingRightsMut<'_> {}

/// The kingside (`oo`) and queenside (`ooo`) flags of one side.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    color: Color,
    oo: bool,
    ooo: bool,
}

impl CastlingRights {
    pub fn new(color: Color, oo: bool, ooo: bool) -> Self {
        Self { color, oo, ooo }
    }
    /// Both sides may castle on both wings.
    pub fn initial() -> Pair<Self> {
        Pair::new(
            Self::new(Color::White, true, true),
            Self::new(Color::Black, true, true),
        )
    }
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
    #[inline]
    pub fn oo(&self) -> bool {
        self.oo
    }
    #[inline]
    pub fn ooo(&self) -> bool {
        self.ooo
    }
    #[inline]
    pub fn has(&self, side: CastlingSide) -> bool {
        match side {
            CastlingSide::KingSide => self.oo,
            CastlingSide::QueenSide => self.ooo,
        }
    }
    #[inline]
    pub fn rank(&self) -> Rank {
        Rank::back_rank(self.color)
    }
    pub fn clear(&mut self) {
        self.oo = false;
        self.ooo = false;
    }
    pub fn clear_oo(&mut self) {
        self.oo = false;
    }
    pub fn clear_ooo(&mut self) {
        self.ooo = false;
    }
}
