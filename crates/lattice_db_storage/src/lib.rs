#![allow(clippy::len_without_is_empty, clippy::new_without_default)]

//! Keys, values, and block storage for a versioned voxel store built on an ordered key-value engine.
//!
//! Keys come from the `Index` family:
//!   - `IndexUint8`: single byte keys for small tables
//!   - `IndexZyx`: Z-major chunk keys, one contiguous key span per X scanline
//!   - `IndexCzyx`: `IndexZyx` keys grouped by channel
//!   - `IndexMorton`: Z-order chunk keys, contiguous for aligned power-of-2 cubes
//!
//! `IndexZyxIterator` and `IndexCzyxIterator` decompose a chunk region into those key spans.
//!
//! Values are written with `serialize_data`, which prefixes a format byte and optional CRC32 to a payload compressed with
//! Snappy, LZ4, or gzip. `serialize_object` does the same for any `serde` type via bincode.
//!
//! `BlockDb` ties these together for one version of one data instance, over any `KeyValueStore`. Writers of the same version
//! are serialized by the `VersionMutexes` registry.

pub mod compression;
pub mod config;
pub mod database;
pub mod error;
pub mod index;
pub mod iterator;
pub mod object;
pub mod serialization;
pub mod version_mutex;

pub use compression::*;
pub use config::*;
pub use database::*;
pub use error::*;
pub use index::*;
pub use iterator::*;
pub use object::*;
pub use serialization::*;
pub use version_mutex::*;

pub mod prelude {
    pub use super::{
        deserialize_data, deserialize_object, serialize_data, serialize_object, BlockDb, Checksum, Compression,
        CompressionFormat, CompressionLevel, DataConfig, Index, IndexCzyx, IndexCzyxIterator, IndexIterator, IndexMorton,
        IndexRange, IndexScheme, IndexUint8, IndexZyx, IndexZyxIterator, KeyValueStore, MemoryStore, StorageError,
        VersionKey, VersionMutexes,
    };

    #[cfg(feature = "sled")]
    pub use super::SledStore;
}
