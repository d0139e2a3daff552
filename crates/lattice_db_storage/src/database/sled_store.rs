use super::{KeyValue, KeyValueStore};
use crate::Result;

use sled::Tree;

/// A persistent, crash-consistent store backed by a `sled` tree.
///
/// Batches are applied atomically, but range reads are not isolated from concurrent writes.
#[derive(Clone, Debug)]
pub struct SledStore {
    tree: Tree,
}

impl SledStore {
    pub fn new(tree: Tree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn flush(&self) -> Result<usize> {
        Ok(self.tree.flush()?)
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.tree.get(key)?.map(|v| v.to_vec()))
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.tree.insert(key, value)?;

        Ok(())
    }

    fn put_batch(&self, batch: Vec<KeyValue>) -> Result<()> {
        let mut sled_batch = sled::Batch::default();
        for (key, value) in batch.into_iter() {
            sled_batch.insert(key, value);
        }
        self.tree.apply_batch(sled_batch)?;

        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.tree.remove(key)?;

        Ok(())
    }

    fn range(&self, begin: &[u8], end: &[u8]) -> Result<Vec<KeyValue>> {
        if begin > end {
            return Ok(Vec::new());
        }

        let mut kvs = Vec::new();
        for kv in self.tree.range(begin..=end) {
            let (k, v) = kv?;
            kvs.push((k.to_vec(), v.to_vec()));
        }

        Ok(kvs)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
