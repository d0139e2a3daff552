//! Decomposition of a chunk-space query region into contiguous key spans.
//!
//! For a ZYX keyed store, all of the chunks on one X scanline (fixed Y and Z) are adjacent in key space. So rather than
//! looking up every chunk of a region one at a time, a reader can do a single range scan per scanline. The iterators here
//! yield those `(begin, end)` key pairs in scan order, Z slowest and Y fastest.
//!
//! ```
//! use lattice_db_core::ChunkCoord;
//! use lattice_db_storage::{Index, IndexIterator, IndexZyx, IndexZyxIterator};
//!
//! let mut it = IndexZyxIterator::new(ChunkCoord::new(0, 0, 0), ChunkCoord::new(2, 1, 0));
//! let mut spans = Vec::new();
//! while it.valid() {
//!     spans.push(it.index_span());
//!     it.next_span();
//! }
//!
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans[1].0, Index::from(IndexZyx::new(ChunkCoord::new(0, 1, 0))));
//! assert_eq!(spans[1].1, Index::from(IndexZyx::new(ChunkCoord::new(2, 1, 0))));
//! ```

use crate::{Index, IndexCzyx, IndexZyx};

use lattice_db_core::prelude::*;

/// A cursor over the key spans of a region. Not restartable; construct a new one to scan again.
pub trait IndexIterator {
    /// Returns `true` iff the cursor has not advanced past the end of the region.
    ///
    /// The current Z is compared numerically with the end Z, not as encoded key bytes. Two's-complement keys put negative
    /// coordinates after positive ones, so a byte comparison would stop early on any region spanning zero.
    fn valid(&self) -> bool;

    /// The inclusive `(begin, end)` keys of the current scanline. Only meaningful while `valid()`.
    fn index_span(&self) -> (Index, Index);

    /// Moves to the next scanline.
    fn next_span(&mut self);
}

/// The Y/Z scanline cursor shared by the ZYX and CZYX iterators.
#[derive(Clone, Debug)]
struct ScanlineCursor {
    begin: ChunkCoord,
    end: ChunkCoord,
    y: i32,
    z: i32,
    exhausted: bool,
}

impl ScanlineCursor {
    fn new(begin: ChunkCoord, end: ChunkCoord) -> Self {
        Self {
            begin,
            end,
            y: begin.y(),
            z: begin.z(),
            // An inverted axis means there is nothing to scan.
            exhausted: !(begin <= end),
        }
    }

    #[inline]
    fn valid(&self) -> bool {
        !self.exhausted && self.z <= self.end.z()
    }

    #[inline]
    fn span(&self) -> (ChunkCoord, ChunkCoord) {
        (
            ChunkCoord::new(self.begin.x(), self.y, self.z),
            ChunkCoord::new(self.end.x(), self.y, self.z),
        )
    }

    fn advance(&mut self) {
        if self.exhausted {
            return;
        }
        if self.y < self.end.y() {
            self.y += 1;
        } else if self.z < self.end.z() {
            self.y = self.begin.y();
            self.z += 1;
        } else {
            // Stepping past `end.z` could overflow at `i32::MAX`.
            self.exhausted = true;
        }
    }

    fn remaining(&self) -> usize {
        if !self.valid() {
            return 0;
        }
        let rows = i64::from(self.end.y()) - i64::from(self.begin.y()) + 1;
        let full_planes = i64::from(self.end.z()) - i64::from(self.z);
        let this_plane = i64::from(self.end.y()) - i64::from(self.y) + 1;

        (full_planes * rows + this_plane) as usize
    }
}

/// Iterates over the X scanlines of the chunk region `[begin, end]` (inclusive on every axis), keyed by `IndexZyx`.
#[derive(Clone, Debug)]
pub struct IndexZyxIterator {
    cursor: ScanlineCursor,
}

impl IndexZyxIterator {
    pub fn new(begin: ChunkCoord, end: ChunkCoord) -> Self {
        Self {
            cursor: ScanlineCursor::new(begin, end),
        }
    }
}

impl IndexIterator for IndexZyxIterator {
    #[inline]
    fn valid(&self) -> bool {
        self.cursor.valid()
    }

    #[inline]
    fn index_span(&self) -> (Index, Index) {
        let (begin, end) = self.cursor.span();

        (IndexZyx::new(begin).into(), IndexZyx::new(end).into())
    }

    #[inline]
    fn next_span(&mut self) {
        self.cursor.advance()
    }
}

/// Like `IndexZyxIterator`, but every key carries a fixed `channel` prefix. One iterator scans exactly one channel.
#[derive(Clone, Debug)]
pub struct IndexCzyxIterator {
    channel: i32,
    cursor: ScanlineCursor,
}

impl IndexCzyxIterator {
    pub fn new(channel: i32, begin: ChunkCoord, end: ChunkCoord) -> Self {
        Self {
            channel,
            cursor: ScanlineCursor::new(begin, end),
        }
    }

    #[inline]
    pub fn channel(&self) -> i32 {
        self.channel
    }
}

impl IndexIterator for IndexCzyxIterator {
    #[inline]
    fn valid(&self) -> bool {
        self.cursor.valid()
    }

    #[inline]
    fn index_span(&self) -> (Index, Index) {
        let (begin, end) = self.cursor.span();

        (
            IndexCzyx::new(self.channel, begin).into(),
            IndexCzyx::new(self.channel, end).into(),
        )
    }

    #[inline]
    fn next_span(&mut self) {
        self.cursor.advance()
    }
}

macro_rules! impl_span_iterator {
    ($iter:ty) => {
        impl Iterator for $iter {
            type Item = (Index, Index);

            fn next(&mut self) -> Option<Self::Item> {
                if !self.valid() {
                    return None;
                }
                let span = self.index_span();
                self.next_span();

                Some(span)
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let n = self.cursor.remaining();

                (n, Some(n))
            }
        }

        impl ExactSizeIterator for $iter {}
        impl std::iter::FusedIterator for $iter {}
    };
}

impl_span_iterator!(IndexZyxIterator);
impl_span_iterator!(IndexCzyxIterator);

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
