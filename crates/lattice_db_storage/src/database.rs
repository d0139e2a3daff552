//! The ordered key-value boundary and the block store built on top of it.
//!
//! The storage engine itself is external. All this crate needs from it is point reads, writes, deletes, and inclusive range
//! scans in ascending byte order of the keys.

mod block_db;
mod memory;
#[cfg(feature = "sled")]
mod sled_store;

pub use block_db::BlockDb;
pub use memory::MemoryStore;
#[cfg(feature = "sled")]
pub use sled_store::SledStore;

#[cfg(feature = "sled")]
pub use sled;

use crate::Result;

/// A key-value pair read from a store.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// An ordered key-value engine.
pub trait KeyValueStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Inserts or overwrites the value at `key`.
    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()>;

    /// Writes every pair. Engines that support it apply the whole batch atomically.
    fn put_batch(&self, batch: Vec<KeyValue>) -> Result<()> {
        for (key, value) in batch.into_iter() {
            self.put(&key, value)?;
        }

        Ok(())
    }

    /// Removes `key`. Missing keys are not an error.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// All pairs with `begin <= key <= end`, in ascending key order. Empty if `begin > end`.
    fn range(&self, begin: &[u8], end: &[u8]) -> Result<Vec<KeyValue>>;
}

impl<S> KeyValueStore for &S
where
    S: KeyValueStore + ?Sized,
{
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn put_batch(&self, batch: Vec<KeyValue>) -> Result<()> {
        (**self).put_batch(batch)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn range(&self, begin: &[u8], end: &[u8]) -> Result<Vec<KeyValue>> {
        (**self).range(begin, end)
    }
}
