use super::{check_key_len, check_modulus, fmt_hex, zyx::read_i32_be, IndexScheme, IndexZyx};
use crate::Result;

use lattice_db_core::prelude::*;

use std::fmt;

/// Indexing on a "channel" C, then Z, then Y, then X. All of the chunks of one channel are contiguous in key space.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct IndexCzyx {
    pub channel: i32,
    pub zyx: IndexZyx,
}

impl IndexCzyx {
    pub const KEY_LEN: usize = 4 + IndexZyx::KEY_LEN;

    #[inline]
    pub fn new(channel: i32, chunk: ChunkCoord) -> Self {
        Self {
            channel,
            zyx: IndexZyx::new(chunk),
        }
    }

    #[inline]
    pub fn chunk(&self) -> ChunkCoord {
        self.zyx.chunk()
    }

    #[inline]
    pub fn to_bytes(&self) -> [u8; Self::KEY_LEN] {
        let mut bytes = [0; Self::KEY_LEN];
        bytes[0..4].copy_from_slice(&self.channel.to_be_bytes());
        bytes[4..].copy_from_slice(&self.zyx.to_bytes());

        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_key_len(IndexScheme::Czyx, bytes)?;

        Ok(Self {
            channel: read_i32_be(&bytes[0..4]),
            zyx: IndexZyx::from_bytes(&bytes[4..])?,
        })
    }

    /// Returns an integer in `[0, n)`. The channel does not participate, so every channel of a chunk lands on the same
    /// handler.
    pub fn hash(&self, n: usize) -> Result<usize> {
        check_modulus(n)?;

        self.zyx.hash(n)
    }

    #[inline]
    pub fn point_in_chunk(&self, size: &ChunkSize) -> VoxelCoord {
        self.zyx.point_in_chunk(size)
    }

    /// Component-wise minimum, where the channel counts as a component.
    pub fn min(&self, other: &Self) -> (Self, bool) {
        let (zyx, zyx_changed) = self.zyx.min(&other.zyx);
        let channel = self.channel.min(other.channel);

        (Self { channel, zyx }, zyx_changed || channel != self.channel)
    }

    /// Component-wise maximum, where the channel counts as a component.
    pub fn max(&self, other: &Self) -> (Self, bool) {
        let (zyx, zyx_changed) = self.zyx.max(&other.zyx);
        let channel = self.channel.max(other.channel);

        (Self { channel, zyx }, zyx_changed || channel != self.channel)
    }
}

impl fmt::Display for IndexCzyx {
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

    use rand::Rng;

    #[test]
    fn channel_prefixes_zyx_key() {
        let index = IndexCzyx::new(2, ChunkCoord::new(1, 2, 3));
        let key = index.to_bytes();

        assert_eq!(&key[0..4], &[0, 0, 0, 2]);
        assert_eq!(&key[4..], &index.zyx.to_bytes());
        assert_eq!(IndexCzyx::from_bytes(&key).unwrap(), index);
    }

    #[test]
    fn channel_major_ordering() {
        let low_channel_far_chunk = IndexCzyx::new(0, ChunkCoord::new(999, 999, 999)).to_bytes();
        let high_channel_near_chunk = IndexCzyx::new(1, ChunkCoord::ZERO).to_bytes();

        assert!(low_channel_far_chunk < high_channel_near_chunk);
    }

    #[test]
    fn byte_order_matches_czyx_order_for_same_sign_components() {
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            // The same sign for the channel and every component across both indices.
            let sign = if rng.gen() { 1 } else { -1 };
            let mut random_index = || {
                IndexCzyx::new(
                    sign * rng.gen_range(1..8),
                    ChunkCoord::new(
                        sign * rng.gen_range(1..1000),
                        sign * rng.gen_range(1..1000),
                        sign * rng.gen_range(1..1000),
                    ),
                )
            };
            let (a, b) = (random_index(), random_index());

            let czyx = |i: &IndexCzyx| (i.channel, i.zyx.0.z(), i.zyx.0.y(), i.zyx.0.x());
            assert_eq!(
                a.to_bytes().cmp(&b.to_bytes()),
                czyx(&a).cmp(&czyx(&b)),
                "{} vs {}",
                a,
                b
            );
        }
    }

    #[test]
    fn round_trip_negative_channel() {
        let index = IndexCzyx::new(-7, ChunkCoord::new(-1, 0, i32::MIN));

        assert_eq!(IndexCzyx::from_bytes(&index.to_bytes()).unwrap(), index);
    }

    #[test]
    fn channel_participates_in_min_max() {
        let a = IndexCzyx::new(3, ChunkCoord::new(1, 1, 1));
        let b = IndexCzyx::new(1, ChunkCoord::new(2, 2, 2));

        assert_eq!(a.min(&b), (IndexCzyx::new(1, ChunkCoord::new(1, 1, 1)), true));
        assert_eq!(a.max(&b), (IndexCzyx::new(3, ChunkCoord::new(2, 2, 2)), true));
    }
}
