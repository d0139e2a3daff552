//! Spatial keys and self-describing values for versioned voxel stores on sorted key-value engines.
//!
//! This library is organized into two crates:
//! - **core**: voxel and chunk coordinates, extents, and Morton codes
//! - **storage**: the `Index` key family, span iterators, the payload codec, and `BlockDb`
//!
//! A typical write and read of one block:
//!
//! ```
//! use lattice_db::prelude::*;
//!
//! let key = VersionKey::new(DatasetLocalId(1), DataLocalId(1), VersionLocalId(1));
//! let config: DataConfig = "gzip:6".parse::<Compression>().map(|compression| DataConfig {
//!     compression,
//!     ..DataConfig::default()
//! })?;
//! let db = BlockDb::new(MemoryStore::new(), key, config);
//!
//! let chunk = ChunkCoord::new(0, 0, 0);
//! db.put_block(&chunk, b"voxels")?;
//! assert_eq!(db.get_block(&chunk)?, Some(b"voxels".to_vec()));
//! # Ok::<(), StorageError>(())
//! ```

pub use lattice_db_core as core;
pub use lattice_db_storage as storage;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::storage::prelude::*;
    pub use super::storage::{DataLocalId, DatasetLocalId, VersionLocalId};
}
