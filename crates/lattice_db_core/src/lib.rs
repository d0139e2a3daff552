//! The core data types for addressing a 3D voxel lattice:
//! - `Point3<U>`: a 3-dimensional integer point, most importantly `VoxelCoord` and `ChunkCoord`
//! - `Extent3<U>`: a 3-dimensional box, most importantly `VoxelExtent` and `ChunkExtent`
//! - `ChunkSize`: the bridge between voxel and chunk units
//! - `Morton3`: the Z-order code of a point

pub mod chunk_size;
pub mod extent;
pub mod morton;
pub mod point;

pub use chunk_size::ChunkSize;
pub use extent::{ChunkExtent, Extent3, Extent3PointIter, VoxelExtent};
pub use morton::Morton3;
pub use point::{Chunk, ChunkCoord, Point3, Unit, Voxel, VoxelCoord};

pub use num;

pub mod prelude {
    pub use super::{
        Chunk, ChunkCoord, ChunkExtent, ChunkSize, Extent3, Morton3, Point3, Unit, Voxel,
        VoxelCoord, VoxelExtent,
    };
}
