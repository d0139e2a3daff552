//! Byte-ordered keys for a sorted key-value store.
//!
//! An `Index` maps a chunk coordinate (or a small integer) to a fixed-width byte key. The underlying store only offers
//! ordered range scans over raw bytes, so every encoding here is chosen such that comparing keys byte-wise agrees with
//! comparing the indices themselves:
//!
//! - `IndexUint8`: 1 byte, as-is.
//! - `IndexZyx`: 12 bytes, big-endian Z, then Y, then X.
//! - `IndexCzyx`: 16 bytes, big-endian channel followed by the ZYX key.
//! - `IndexMorton`: 12 bytes, the significant bits of a `Morton3`, most significant first.
//!
//! The ZYX keys are written as plain two's-complement integers to stay compatible with data written by earlier versions of
//! the store. That means the byte order only agrees with numeric order when the compared components have the same sign;
//! a negative component sorts *after* every non-negative one. The Morton keys translate components into unsigned space first,
//! so they are totally ordered over the whole `i32` range.

mod czyx;
mod morton;
mod uint8;
mod zyx;

pub use czyx::IndexCzyx;
pub use morton::IndexMorton;
pub use uint8::IndexUint8;
pub use zyx::IndexZyx;

use crate::{Result, StorageError};

use lattice_db_core::prelude::*;

use std::fmt;

/// Identifies the encoding of an `Index`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum IndexScheme {
    Uint8,
    Zyx,
    Czyx,
    Morton,
}

impl IndexScheme {
    /// The fixed length of every key in this scheme.
    #[inline]
    pub fn key_len(self) -> usize {
        match self {
            IndexScheme::Uint8 => IndexUint8::KEY_LEN,
            IndexScheme::Zyx => IndexZyx::KEY_LEN,
            IndexScheme::Czyx => IndexCzyx::KEY_LEN,
            IndexScheme::Morton => IndexMorton::KEY_LEN,
        }
    }

    /// A human readable description.
    pub fn description(self) -> &'static str {
        match self {
            IndexScheme::Uint8 => "Unsigned 8-bit Indexing",
            IndexScheme::Zyx => "ZYX Indexing",
            IndexScheme::Czyx => "CZYX Indexing",
            IndexScheme::Morton => "Morton/Z-order Indexing",
        }
    }
}

impl fmt::Display for IndexScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Returns an error unless `bytes` has exactly the length of a `scheme` key.
pub(crate) fn check_key_len(scheme: IndexScheme, bytes: &[u8]) -> Result<()> {
    let expected = scheme.key_len();
    if bytes.len() != expected {
        return Err(StorageError::MalformedIndex {
            scheme,
            expected,
            actual: bytes.len(),
        });
    }

    Ok(())
}

pub(crate) fn check_modulus(n: usize) -> Result<()> {
    if n == 0 {
        return Err(StorageError::InvalidHashModulus);
    }

    Ok(())
}

pub(crate) fn fmt_hex(bytes: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for b in bytes {
        write!(f, "{:02x}", b)?;
    }

    Ok(())
}

/// A one-dimensional, totally ordered key derived from a spatial (or otherwise small) coordinate.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Index {
    Uint8(IndexUint8),
    Zyx(IndexZyx),
    Czyx(IndexCzyx),
    Morton(IndexMorton),
}

impl From<IndexUint8> for Index {
    fn from(i: IndexUint8) -> Self {
        Index::Uint8(i)
    }
}

impl From<IndexZyx> for Index {
    fn from(i: IndexZyx) -> Self {
        Index::Zyx(i)
    }
}

impl From<IndexCzyx> for Index {
    fn from(i: IndexCzyx) -> Self {
        Index::Czyx(i)
    }
}

impl From<IndexMorton> for Index {
    fn from(i: IndexMorton) -> Self {
        Index::Morton(i)
    }
}

impl Index {
    #[inline]
    pub fn scheme(&self) -> IndexScheme {
        match self {
            Index::Uint8(_) => IndexScheme::Uint8,
            Index::Zyx(_) => IndexScheme::Zyx,
            Index::Czyx(_) => IndexScheme::Czyx,
            Index::Morton(_) => IndexScheme::Morton,
        }
    }

    /// The key bytes. `Index::from_bytes(self.scheme(), &self.to_bytes())` returns `self`.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Index::Uint8(i) => i.to_bytes().to_vec(),
            Index::Zyx(i) => i.to_bytes().to_vec(),
            Index::Czyx(i) => i.to_bytes().to_vec(),
            Index::Morton(i) => i.to_bytes().to_vec(),
        }
    }

    /// Decodes a key of the given `scheme`.
    pub fn from_bytes(scheme: IndexScheme, bytes: &[u8]) -> Result<Self> {
        Ok(match scheme {
            IndexScheme::Uint8 => IndexUint8::from_bytes(bytes)?.into(),
            IndexScheme::Zyx => IndexZyx::from_bytes(bytes)?.into(),
            IndexScheme::Czyx => IndexCzyx::from_bytes(bytes)?.into(),
            IndexScheme::Morton => IndexMorton::from_bytes(bytes)?.into(),
        })
    }

    /// A stable mapping into `[0, n)`, used to distribute indices across `n` handlers.
    pub fn hash(&self, n: usize) -> Result<usize> {
        match self {
            Index::Uint8(i) => i.hash(n),
            Index::Zyx(i) => i.hash(n),
            Index::Czyx(i) => i.hash(n),
            Index::Morton(i) => i.hash(n),
        }
    }

    /// The chunk coordinate this index addresses, if it is spatial.
    pub fn chunk(&self) -> Option<ChunkCoord> {
        match self {
            Index::Uint8(_) => None,
            Index::Zyx(i) => Some(i.chunk()),
            Index::Czyx(i) => Some(i.zyx.chunk()),
            Index::Morton(i) => Some(i.chunk()),
        }
    }

    /// The component for `axis` (X = 0, Y = 1, Z = 2), if this index is spatial.
    pub fn value(&self, axis: usize) -> Option<i32> {
        self.chunk().map(|c| c.at(axis))
    }

    /// The first voxel within the chunk addressed by this index, if it is spatial.
    pub fn point_in_chunk(&self, size: &ChunkSize) -> Option<VoxelCoord> {
        self.chunk().map(|c| c.min_voxel(size))
    }

    /// The component-wise minimum of `self` and `other`, and whether any component of `self` was replaced.
    pub fn min(&self, other: &Index) -> Result<(Index, bool)> {
        Ok(match (self, other) {
            (Index::Uint8(a), Index::Uint8(b)) => into_index(a.min(b)),
            (Index::Zyx(a), Index::Zyx(b)) => into_index(a.min(b)),
            (Index::Czyx(a), Index::Czyx(b)) => into_index(a.min(b)),
            (Index::Morton(a), Index::Morton(b)) => into_index(a.min(b)),
            _ => return Err(self.mismatch(other)),
        })
    }

    /// The component-wise maximum of `self` and `other`, and whether any component of `self` was replaced.
    pub fn max(&self, other: &Index) -> Result<(Index, bool)> {
        Ok(match (self, other) {
            (Index::Uint8(a), Index::Uint8(b)) => into_index(a.max(b)),
            (Index::Zyx(a), Index::Zyx(b)) => into_index(a.max(b)),
            (Index::Czyx(a), Index::Czyx(b)) => into_index(a.max(b)),
            (Index::Morton(a), Index::Morton(b)) => into_index(a.max(b)),
            _ => return Err(self.mismatch(other)),
        })
    }

    fn mismatch(&self, other: &Index) -> StorageError {
        StorageError::MismatchedIndex {
            left: self.scheme(),
            right: other.scheme(),
        }
    }
}

fn into_index<I: Into<Index>>((i, changed): (I, bool)) -> (Index, bool) {
    (i.into(), changed)
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Uint8(i) => i.fmt(f),
            Index::Zyx(i) => i.fmt(f),
            Index::Czyx(i) => i.fmt(f),
            Index::Morton(i) => i.fmt(f),
        }
    }
}

/// The extent of available data, as the (inclusive) minimum and maximum indices. Both ends always have the same scheme.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IndexRange {
    minimum: Index,
    maximum: Index,
}

impl IndexRange {
    pub fn new(minimum: Index, maximum: Index) -> Result<Self> {
        if minimum.scheme() != maximum.scheme() {
            return Err(minimum.mismatch(&maximum));
        }

        Ok(Self { minimum, maximum })
    }

    /// The range containing only `index`.
    pub fn from_index(index: Index) -> Self {
        Self {
            minimum: index,
            maximum: index,
        }
    }

    #[inline]
    pub fn minimum(&self) -> Index {
        self.minimum
    }

    #[inline]
    pub fn maximum(&self) -> Index {
        self.maximum
    }

    #[inline]
    pub fn scheme(&self) -> IndexScheme {
        self.minimum.scheme()
    }

    /// Grows the range component-wise so it also bounds `index`. Returns `true` iff the range changed.
    pub fn extend(&mut self, index: &Index) -> Result<bool> {
        let (minimum, min_changed) = self.minimum.min(index)?;
        let (maximum, max_changed) = self.maximum.max(index)?;
        self.minimum = minimum;
        self.maximum = maximum;

        Ok(min_changed || max_changed)
    }

    /// Returns `true` iff every component of `index` lies within the bounds of this range.
    pub fn contains(&self, index: &Index) -> Result<bool> {
        let (_, below) = self.minimum.min(index)?;
        let (_, above) = self.maximum.max(index)?;

        Ok(!below && !above)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
