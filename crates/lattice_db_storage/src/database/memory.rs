use super::{KeyValue, KeyValueStore};
use crate::Result;

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

/// An in-memory ordered store. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.map.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.map.write().insert(key.to_vec(), value);

        Ok(())
    }

    fn put_batch(&self, batch: Vec<KeyValue>) -> Result<()> {
        // Holding the write lock for the whole batch makes it atomic for readers.
        let mut map = self.map.write();
        map.extend(batch);

        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.map.write().remove(key);

        Ok(())
    }

    fn range(&self, begin: &[u8], end: &[u8]) -> Result<Vec<KeyValue>> {
        // `BTreeMap::range` panics on an inverted range.
        if begin > end {
            return Ok(Vec::new());
        }

        Ok(self
            .map
            .read()
            .range::<[u8], _>((Bound::Included(begin), Bound::Included(end)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
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

    use pretty_assertions::assert_eq;

    #[test]
    fn range_is_inclusive_and_ordered() {
        let store = MemoryStore::new();
        for k in [3u8, 1, 4, 2, 5].iter() {
            store.put(&[*k], vec![*k * 10]).unwrap();
        }

        let kvs = store.range(&[2], &[4]).unwrap();
        assert_eq!(
            kvs,
            vec![
                (vec![2], vec![20]),
                (vec![3], vec![30]),
                (vec![4], vec![40])
            ]
        );
        assert!(store.range(&[4], &[2]).unwrap().is_empty());
    }

    #[test]
    fn put_get_delete() {
        let store = MemoryStore::new();
        store.put(b"a", b"1".to_vec()).unwrap();
        store.put(b"a", b"2".to_vec()).unwrap();

        assert_eq!(store.get(b"a").unwrap(), Some(b"2".to_vec()));
        store.delete(b"a").unwrap();
        store.delete(b"missing").unwrap();
        assert_eq!(store.get(b"a").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn batch_writes_every_pair() {
        let store = MemoryStore::new();
        store
            .put_batch(vec![(b"x".to_vec(), vec![1]), (b"y".to_vec(), vec![2])])
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b"y").unwrap(), Some(vec![2]));
    }
}
