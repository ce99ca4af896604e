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
use std::ops::Index;

use super::material::{Material, Piece};
use super::square::Square;

/// One executed move. The captured piece is read before it is overwritten.
/// For castling, `from` and `to` are the king's squares.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    from: Square,
    to: Square,
    moved: Material,
    captured: Option<Material>,
    promotion: Option<Piece>,
}

impl MoveRecord {
    pub fn new(
        from: Square,
        to: Square,
        moved: Material,
        captured: Option<Material>,
        promotion: Option<Piece>,
    ) -> Self {
        Self { from, to, moved, captured, promotion }
    }
    pub fn from(&self) -> Square {
        self.from
    }
    pub fn to(&self) -> Square {
        self.to
    }
    pub fn moved(&self) -> Material {
        self.moved
    }
    pub fn captured(&self) -> Option<Material> {
        self.captured
    }
    pub fn promotion(&self) -> Option<Piece> {
        self.promotion
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.moved, self.from, self.to)?;
        if let Some(captured) = self.captured {
            write!(f, " x{}", captured)?;
        }
        if let Some(piece) = self.promotion {
            write!(f, " ={}", Material::new(self.moved.color(), piece))?;
        }
        Ok(())
    }
}

/// Append-only log of executed moves. Legality never consults it.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct History(Vec<MoveRecord>);

impl History {
    pub fn new() -> Self {
        Self(Vec::new())
    }
    pub(super) fn push(&mut self, record: MoveRecord) {
        self.0.push(record);
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn last(&self) -> Option<&MoveRecord> {
        self.0.last()
    }
    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.0.iter()
    }
    pub fn as_slice(&self) -> &[MoveRecord] {
        &self.0
    }
}

impl From<Vec<MoveRecord>> for History {
    fn from(value: Vec<MoveRecord>) -> Self {
        Self(value)
    }
}

impl Index<usize> for History {
    type Output = MoveRecord;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}
