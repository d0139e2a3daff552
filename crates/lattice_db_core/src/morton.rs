use crate::Point3;

use morton_encoding::{morton_decode, morton_encode};
use std::fmt;

/// The Z-order code of a `Point3`, with X in the least significant bit of every triple.
///
/// Each component has its sign bit flipped before interleaving, so `i32::MIN` maps to 0 and the order of codes follows the
/// Z-order curve over the whole signed range. A `u128` holds the 96 bits.
///
/// <https://en.wikipedia.org/wiki/Z-order_curve>
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Morton3(pub u128);

impl Morton3 {
    pub const NUM_BYTES: usize = 12;

    pub const MIN: Self = Self(0);
    pub const MAX: Self = Self((1 << 96) - 1);

    /// The significant bytes, most significant first. Byte-wise comparison of these agrees with comparison of the codes.
    #[inline]
    pub fn to_be_bytes(self) -> [u8; Self::NUM_BYTES] {
        let wide = self.0.to_be_bytes();
        let mut bytes = [0; Self::NUM_BYTES];
        bytes.copy_from_slice(&wide[16 - Self::NUM_BYTES..]);

        bytes
    }

    #[inline]
    pub fn from_be_bytes(bytes: [u8; Self::NUM_BYTES]) -> Self {
        let mut wide = [0; 16];
        wide[16 - Self::NUM_BYTES..].copy_from_slice(&bytes);

        Self(u128::from_be_bytes(wide))
    }
}

impl fmt::Debug for Morton3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Morton3({:#026x})", self.0)
    }
}

const SIGN_BIT: u32 = 1 << 31;

impl<U> From<Point3<U>> for Morton3 {
    #[inline]
    fn from(p: Point3<U>) -> Self {
        let [x, y, z] = p.as_array();

        // `morton_encode` puts the first coordinate in the most significant position.
        Self(morton_encode([
            z as u32 ^ SIGN_BIT,
            y as u32 ^ SIGN_BIT,
            x as u32 ^ SIGN_BIT,
        ]))
    }
}

impl<U> From<Morton3> for Point3<U> {
    #[inline]
    fn from(m: Morton3) -> Self {
        let [z, y, x]: [u32; 3] = morton_decode(m.0);

        Self::new(
            (x ^ SIGN_BIT) as i32,
            (y ^ SIGN_BIT) as i32,
            (z ^ SIGN_BIT) as i32,
        )
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
    use crate::{ChunkCoord, ChunkExtent};

    use pretty_assertions::assert_eq;

    #[test]
    fn extremes_map_to_extreme_codes() {
        assert_eq!(Morton3::from(ChunkCoord::MIN), Morton3::MIN);
        assert_eq!(Morton3::from(ChunkCoord::MAX), Morton3::MAX);
        assert_eq!(ChunkCoord::from(Morton3::MIN), ChunkCoord::MIN);
        assert_eq!(ChunkCoord::from(Morton3::MAX), ChunkCoord::MAX);
    }

    #[test]
    fn x_is_least_significant() {
        let origin = Morton3::from(ChunkCoord::ZERO).0;

        assert_eq!(Morton3::from(ChunkCoord::new(1, 0, 0)).0 - origin, 0b001);
        assert_eq!(Morton3::from(ChunkCoord::new(0, 1, 0)).0 - origin, 0b010);
        assert_eq!(Morton3::from(ChunkCoord::new(0, 0, 1)).0 - origin, 0b100);
    }

    #[test]
    fn aligned_cubes_are_contiguous() {
        for &min in [[-4, -4, -4], [0, -4, 0], [-4, 4, 0], [8, 8, 8]].iter() {
            let cube = ChunkExtent::from_min_and_shape(ChunkCoord::from(min), ChunkCoord::fill(4));
            let mut codes: Vec<u128> = cube.iter_points().map(|p| Morton3::from(p).0).collect();
            codes.sort_unstable();

            let first = codes[0];
            for (i, &code) in codes.iter().enumerate() {
                assert_eq!(code, first + i as u128, "cube at {:?}", min);
            }
            assert_eq!(ChunkCoord::from(Morton3(first)), ChunkCoord::from(min));
        }
    }

    #[test]
    fn decode_inverts_encode() {
        for &xyz in [[0, 0, 0], [-1, 2, -3], [i32::MIN, i32::MAX, 0], [77, -77, 1 << 20]].iter() {
            let p = ChunkCoord::from(xyz);
            assert_eq!(ChunkCoord::from(Morton3::from(p)), p);
        }
    }

    #[test]
    fn byte_order_matches_code_order_across_zero() {
        let below = Morton3::from(ChunkCoord::new(-1, -1, -1));
        let above = Morton3::from(ChunkCoord::ZERO);

        assert!(below < above);
        assert!(below.to_be_bytes() < above.to_be_bytes());
        assert_eq!(Morton3::from_be_bytes(above.to_be_bytes()), above);
    }
}
