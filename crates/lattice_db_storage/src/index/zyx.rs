use super::{check_key_len, check_modulus, fmt_hex, IndexScheme};
use crate::Result;

use lattice_db_core::prelude::*;

use std::fmt;

/// Simple indexing on Z, then Y, then X of a chunk coordinate.
///
/// The key is the three components written as big-endian `i32`s in Z, Y, X order, so a byte-wise comparison of two keys is
/// a Z-major comparison of the chunks (for components of the same sign).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IndexZyx(pub ChunkCoord);

impl IndexZyx {
    pub const KEY_LEN: usize = 12;

    #[inline]
    pub fn new(chunk: ChunkCoord) -> Self {
        Self(chunk)
    }

    #[inline]
    pub fn chunk(&self) -> ChunkCoord {
        self.0
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; Self::KEY_LEN] {
        let mut bytes = [0; Self::KEY_LEN];
        bytes[0..4].copy_from_slice(&self.0.z().to_be_bytes());
        bytes[4..8].copy_from_slice(&self.0.y().to_be_bytes());
        bytes[8..12].copy_from_slice(&self.0.x().to_be_bytes());

        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_key_len(IndexScheme::Zyx, bytes)?;

        let z = read_i32_be(&bytes[0..4]);
        let y = read_i32_be(&bytes[4..8]);
        let x = read_i32_be(&bytes[8..12]);

        Ok(Self(ChunkCoord::new(x, y, z)))
    }

    /// Returns an integer in `[0, n)`.
    ///
    /// This sums all three components rather than hashing any single one, so a range query along X, Y, or Z alone is spread
    /// over many handlers instead of landing on one.
    pub fn hash(&self, n: usize) -> Result<usize> {
        check_modulus(n)?;

        let sum = i64::from(self.0.x()) + i64::from(self.0.y()) + i64::from(self.0.z());

        Ok(sum.rem_euclid(n as i64) as usize)
    }

    /// The first voxel within the chunk addressed by this index.
    #[inline]
    pub fn point_in_chunk(&self, size: &ChunkSize) -> VoxelCoord {
        self.0.min_voxel(size)
    }

    pub fn min(&self, other: &Self) -> (Self, bool) {
        let min = self.0.meet(&other.0);

        (Self(min), min != self.0)
    }

    pub fn max(&self, other: &Self) -> (Self, bool) {
        let max = self.0.join(&other.0);

        (Self(max), max != self.0)
    }
}

#[inline]
pub(crate) fn read_i32_be(bytes: &[u8]) -> i32 {
    let mut be = [0; 4];
    be.copy_from_slice(bytes);

    i32::from_be_bytes(be)
}

impl fmt::Display for IndexZyx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hex(&self.to_bytes(), f)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
