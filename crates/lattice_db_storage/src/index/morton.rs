use super::{check_key_len, check_modulus, fmt_hex, IndexScheme};
use crate::Result;

use lattice_db_core::prelude::*;

use std::fmt;

/// Z-order (Morton) indexing of a chunk coordinate. Chunks inside any aligned power-of-2 cube are contiguous in key
/// space, and the byte order is correct across the full signed range.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IndexMorton(pub Morton3);

impl IndexMorton {
    pub const KEY_LEN: usize = Morton3::NUM_BYTES;

    #[inline]
    pub fn new(chunk: ChunkCoord) -> Self {
        Self(Morton3::from(chunk))
    }

    #[inline]
    pub fn chunk(&self) -> ChunkCoord {
        ChunkCoord::from(self.0)
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; Self::KEY_LEN] {
        self.0.to_be_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_key_len(IndexScheme::Morton, bytes)?;

        let mut morton_bytes = [0; Self::KEY_LEN];
        morton_bytes.copy_from_slice(bytes);

        Ok(Self(Morton3::from_be_bytes(morton_bytes)))
    }

    /// Returns an integer in `[0, n)`.
    pub fn hash(&self, n: usize) -> Result<usize> {
        check_modulus(n)?;

        Ok((self.0 .0 % n as u128) as usize)
    }

    #[inline]
    pub fn point_in_chunk(&self, size: &ChunkSize) -> VoxelCoord {
        self.chunk().min_voxel(size)
    }

    /// Component-wise minimum of the decoded chunk coordinates.
    pub fn min(&self, other: &Self) -> (Self, bool) {
        let chunk = self.chunk();
        let min = chunk.meet(&other.chunk());

        (Self::new(min), min != chunk)
    }

    /// Component-wise maximum of the decoded chunk coordinates.
    pub fn max(&self, other: &Self) -> (Self, bool) {
        let chunk = self.chunk();
        let max = chunk.join(&other.chunk());

        (Self::new(max), max != chunk)
    }
}

impl fmt::Display for IndexMorton {
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keys_order_correctly_across_zero() {
        let chunks = [
            ChunkCoord::new(-2, -2, -2),
            ChunkCoord::new(-1, -1, -1),
            ChunkCoord::new(0, 0, 0),
            ChunkCoord::new(1, 1, 1),
        ];

        let keys: Vec<_> = chunks.iter().map(|&c| IndexMorton::new(c).to_bytes()).collect();
        let mut sorted = keys.clone();
        sorted.sort();

        assert_eq!(keys, sorted);
    }

    #[test]
    fn decodes_back_to_chunk() {
        let chunk = ChunkCoord::new(-123, 456, i32::MIN);
        let index = IndexMorton::from_bytes(&IndexMorton::new(chunk).to_bytes()).unwrap();

        assert_eq!(index.chunk(), chunk);
    }
}
