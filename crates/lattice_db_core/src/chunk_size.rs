use crate::{ChunkCoord, VoxelCoord};

/// The shape of every chunk in a chunked voxel map. All components are positive.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ChunkSize(VoxelCoord);

impl ChunkSize {
    /// Returns `None` unless all components are positive.
    #[inline]
    pub fn new(x: i32, y: i32, z: i32) -> Option<Self> {
        Self::from_shape(VoxelCoord::new(x, y, z))
    }

    /// A cube with side length `side`.
    #[inline]
    pub fn cube(side: i32) -> Option<Self> {
        Self::new(side, side, side)
    }

    #[inline]
    pub fn from_shape(shape: VoxelCoord) -> Option<Self> {
        if shape > VoxelCoord::ZERO {
            Some(Self(shape))
        } else {
            None
        }
    }

    /// The shape in voxels.
    #[inline]
    pub fn shape(&self) -> VoxelCoord {
        self.0
    }

    /// Number of voxels in one chunk.
    #[inline]
    pub fn num_voxels(&self) -> i64 {
        self.0.volume()
    }
}

impl VoxelCoord {
    /// The chunk containing this voxel. Uses floor division, so voxel `-1` lives in chunk `-1`.
    #[inline]
    pub fn chunk(&self, size: &ChunkSize) -> ChunkCoord {
        ChunkCoord::from_array(self.vector_div_floor(&size.0).as_array())
    }

    /// The offset of this voxel from the minimum voxel of its chunk.
    #[inline]
    pub fn offset_in_chunk(&self, size: &ChunkSize) -> VoxelCoord {
        self.vector_mod_floor(&size.0)
    }
}

impl ChunkCoord {
    /// The first (minimum) voxel of this chunk.
    ///
    /// Components wrap in two's complement when the voxel lies outside the `i32` range. Every chunk coordinate is a valid
    /// key, even one whose voxels cannot be addressed.
    #[inline]
    pub fn min_voxel(&self, size: &ChunkSize) -> VoxelCoord {
        VoxelCoord::from_array(self.as_array()).map_components_binary(&size.0, i32::wrapping_mul)
    }

    /// The last (maximum) voxel of this chunk. Wraps like `min_voxel`.
    #[inline]
    pub fn max_voxel(&self, size: &ChunkSize) -> VoxelCoord {
        self.min_voxel(size)
            .map_components_binary(&size.0, |min, side| min.wrapping_add(side - 1))
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
    fn rejects_non_positive_shapes() {
        assert!(ChunkSize::new(32, 32, 32).is_some());
        assert!(ChunkSize::new(32, 0, 32).is_none());
        assert!(ChunkSize::new(-1, 32, 32).is_none());
    }

    #[test]
    fn voxel_chunk_round_trip() {
        let size = ChunkSize::new(32, 16, 8).unwrap();
        for &v in [
            VoxelCoord::new(0, 0, 0),
            VoxelCoord::new(31, 15, 7),
            VoxelCoord::new(32, 16, 8),
            VoxelCoord::new(-1, -1, -1),
            VoxelCoord::new(-33, 100, -8),
        ]
        .iter()
        {
            let chunk = v.chunk(&size);
            let min = chunk.min_voxel(&size);
            assert_eq!(min + v.offset_in_chunk(&size), v);
            assert!(min <= v && v <= chunk.max_voxel(&size));
        }
    }

    #[test]
    fn negative_voxels_land_in_negative_chunks() {
        let size = ChunkSize::cube(32).unwrap();

        assert_eq!(VoxelCoord::new(-1, 0, 31).chunk(&size), ChunkCoord::new(-1, 0, 0));
        assert_eq!(ChunkCoord::new(-1, 0, 0).min_voxel(&size), VoxelCoord::new(-32, 0, 0));
    }

    #[test]
    fn voxels_of_far_chunks_wrap() {
        let size = ChunkSize::cube(32).unwrap();

        let far = ChunkCoord::new(i32::MAX / 16, i32::MIN, i32::MAX);
        let min = far.min_voxel(&size);
        assert_eq!(min.x(), (i32::MAX / 16).wrapping_mul(32));
        assert_eq!(min.y(), 0);
        assert_eq!(min.z(), -32);
        assert_eq!(far.max_voxel(&size), VoxelCoord::new(min.x() + 31, 31, -1));

        // Chunks whose voxels fit are unaffected.
        let edge = ChunkCoord::new(i32::MAX / 32, i32::MIN / 32, 0);
        assert_eq!(edge.min_voxel(&size), VoxelCoord::new(i32::MAX / 32 * 32, i32::MIN, 0));
        assert_eq!(edge.max_voxel(&size).x(), i32::MAX / 32 * 32 + 31);
    }
}
