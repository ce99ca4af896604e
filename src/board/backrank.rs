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

use std::collections::HashMap;
#[cfg(feature = "random")]
use rand::{thread_rng, Rng};
use thiserror::Error;
use anyhow::Result;
use strum::IntoEnumIterator;
use std::ops::Index;
use std::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

use super::square::File;
use super::material::Piece;
use File::{FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH};
use Piece::{King, Queen, Rook, Bishop, Knight};

#[derive(Error, Debug, Serialize, Deserialize)]
pub enum BackRankError {
    #[error("Expecting 1 king, 1 queen, and 2 of each other piece")]
    ArgError,
    #[error("Bishops must be placed on different colored squares")]
    MisplacedBishop,
    #[error("King must be placed between rooks")]
    MisplacedKing,
}

use BackRankError::*;

/// Starting-position family. Fixed when a board is created.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    Classical,
    Chess960,
}

/// Represents a configuration of pieces on a chessboard's back rank.
///
/// Both sides use the same arrangement, mirrored across the board. The
/// files of the rooks are remembered here so castling rights can be
/// tied to the rooks' original squares after they have been shuffled.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq)]
pub struct BackRank {
    pieces: [Piece; 8],
    king: File,
    queen: File,
    rooks: [File; 2],
    bishops: [File; 2],
    knights: [File; 2],
}

impl PartialEq for BackRank {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
    }
}

impl Hash for BackRank {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pieces.hash(state);
    }
}

impl Default for BackRank {
    fn default() -> Self {
        Self::standard()
    }
}

impl BackRank {
    /// Creates a standard back rank configuration suitable for the
    /// standard chess game.
    pub fn standard() -> Self {
        Self {
            pieces: [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook],
            king: FileE,
            queen: FileD,
            rooks: [FileA, FileH],
            knights: [FileB, FileG],
            bishops: [FileC, FileF],
        }
    }

    /// Creates a shuffled back rank configuration suitable for the chess
    /// variant Chess960 (aka Fischer random chess).
    #[cfg(feature = "random")]
    pub fn shuffled() -> Self {
        Self::shuffled_with(&mut thread_rng())
    }

    /// Draws a Chess960 back rank from `rng`.
    ///
    /// The bishops go first, one on an even file and one on an odd file.
    /// The queen and both knights are then drawn from the empty files. The
    /// three files left over receive a rook, the king and the other rook,
    /// in that order, which keeps the king between the rooks.
    #[cfg(feature = "random")]
    pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut slots: [Option<Piece>; 8] = [None; 8];
        slots[rng.gen_range(0..4usize) * 2] = Some(Bishop);
        slots[rng.gen_range(0..4usize) * 2 + 1] = Some(Bishop);
        for piece in [Queen, Knight, Knight] {
            loop {
                let index = rng.gen_range(0..8usize);
                if slots[index].is_none() {
                    slots[index] = Some(piece);
                    break;
                }
            }
        }
        let mut remaining = [Rook, King, Rook].into_iter();
        let pieces = slots.map(|slot| match slot {
            Some(piece) => piece,
            // the three free files take R K R, left to right
            None => remaining.next().unwrap_or(Rook),
        });
        // bishops on opposite colors and the king between the rooks always validate
        Self::build(pieces).unwrap_or_default()
    }

    /// Builds a BackRank instance from a sequence of pieces. Validates that
    /// exactly 8 pieces are provided (1 king, 1 queen, 2 rooks, 2 bishops and 2
    /// knights), that the bishops are on different colored squares and that the
    /// king is between the two rooks.
    ///
    /// # Arguments
    ///
    /// * `pieces` - A sequence of `Piece` values ordered from the a-file to the h-file.
    ///
    /// # Errors
    ///
    /// Returns a `BackRankError` if the provided configuration is invalid.
    pub fn build<I>(pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item=Piece>,
    {
        let pieces = into_array(pieces)?;
        let mut map: HashMap<Piece, Vec<File>> = HashMap::new();
        for file in File::iter() {
            map.entry(pieces[file.to_index()])
                .or_default()
                .push(file);
        }
        let king = into_item(map.remove(&King).unwrap_or_default())?;
        let queen = into_item(map.remove(&Queen).unwrap_or_default())?;
        let rooks = into_array(map.remove(&Rook).unwrap_or_default())?;
        let bishops = into_array(map.remove(&Bishop).unwrap_or_default())?;
        let knights = into_array(map.remove(&Knight).unwrap_or_default())?;
        if !map.is_empty() {
            return Err(ArgError.into());
        }

        if (bishops[0].to_index() & 0x1) == (bishops[1].to_index() & 0x1) {
            return Err(MisplacedBishop.into());
        }
        if king < rooks[0] || king > rooks[1] {
            return Err(MisplacedKing.into())
        }
        Ok(Self {pieces, king, queen, rooks, bishops, knights})
    }

    pub fn is_standard(&self) -> bool {
        *self == Self::standard()
    }
    pub fn pieces(&self) -> [Piece; 8] {
        self.pieces
    }
    pub fn king(&self) -> File {
        self.king
    }
    pub fn queen(&self) -> File {
        self.queen
    }
    /// Files of the queenside (left) and kingside (right) rooks.
    pub fn rooks(&self) -> [File; 2] {
        self.rooks
    }
    pub fn bishops(&self) -> [File; 2] {
        self.bishops
    }
    pub fn knights(&self) -> [File; 2] {
        self.knights
    }
}

impl Index<File> for BackRank {
    type Output = Piece;
    fn index(&self, file: File) -> &Self::Output {
        &self.pieces[file.to_index()]
    }
}

/// Converts an iterator of values into an array of size `N`.
///
/// # Errors
///
/// Returns an error if `values` does not contain exactly `N` items.
fn into_array<T, I, const N: usize>(values: I) -> Result<[T; N]>
where
    I: IntoIterator<Item=T>,
{
    let vec: Vec<T> = values.into_iter().collect();
    vec.try_into().map_err(|_| ArgError.into())
}

/// Converts an iterator of values into a single item.
///
/// # Errors
///
/// Returns an error if `values` does not contain exactly one item.
fn into_item<T: Copy, I>(values: I) -> Result<T>
where
    I: IntoIterator<Item=T>,
{
    let array: [T; 1] = into_array(values)?;
    Ok(array[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use Piece::Pawn;

    #[test]
    fn test_standard_backrank() {
        let backrank = BackRank::standard();
        assert_eq!(backrank.king(), FileE);
        assert_eq!(backrank.queen(), FileD);
        assert_eq!(backrank.rooks(), [FileA, FileH]);
        assert_eq!(backrank.knights(), [FileB, FileG]);
        assert_eq!(backrank.bishops(), [FileC, FileF]);
        assert!(backrank.is_standard());
        assert_eq!(backrank[FileE], King);
    }
    #[test]
    fn test_build_accepts_valid_arrangement() {
        let backrank = BackRank::build([Bishop, Queen, Knight, Bishop, Knight, Rook, King, Rook])
            .expect("arrangement should be valid");
        assert_eq!(backrank.king(), FileG);
        assert_eq!(backrank.rooks(), [FileF, FileH]);
        assert_eq!(backrank.bishops(), [FileA, FileD]);
        assert!(!backrank.is_standard());
    }
    #[test]
    fn test_build_rejects_same_colored_bishops() {
        let err = BackRank::build([Bishop, Knight, Bishop, Queen, King, Rook, Knight, Rook])
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<BackRankError>(), Some(MisplacedBishop)));
    }
    #[test]
    fn test_build_rejects_king_outside_rooks() {
        let err = BackRank::build([King, Rook, Bishop, Bishop, Queen, Knight, Knight, Rook])
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<BackRankError>(), Some(MisplacedKing)));
    }
    #[test]
    fn test_build_rejects_wrong_material() {
        let err = BackRank::build([Rook, Knight, Bishop, Queen, King, Bishop, Knight, Pawn])
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<BackRankError>(), Some(ArgError)));
        let err = BackRank::build([Rook, Knight, Bishop, Queen, King]).unwrap_err();
        assert!(matches!(err.downcast_ref::<BackRankError>(), Some(ArgError)));
    }

    #[cfg(feature = "random")]
    #[test]
    fn test_shuffled_backranks_are_valid() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        for seed in 0..500u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let backrank = BackRank::shuffled_with(&mut rng);
            let [b1, b2] = backrank.bishops();
            assert_ne!(b1.to_index() % 2, b2.to_index() % 2);
            let [r1, r2] = backrank.rooks();
            assert!(r1 < backrank.king() && backrank.king() < r2);
            assert!(BackRank::build(backrank.pieces()).is_ok());
            seen.insert(backrank);
        }
        assert!(seen.len() > 100);
    }
    #[cfg(feature = "random")]
    #[test]
    fn test_shuffled_is_deterministic_for_a_seed() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let first = BackRank::shuffled_with(&mut StdRng::seed_from_u64(42));
        let second = BackRank::shuffled_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
