//! Process-wide exclusive access to a single (dataset, data, version) triple.
//!
//! Handlers that read-modify-write all of the blocks of one version must not interleave. The registry hands out one
//! `Mutex` per version key, created on first request. Entries are never removed.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Local identifier of a dataset within this store.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DatasetLocalId(pub u16);

/// Local identifier of a data instance within a dataset.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DataLocalId(pub u16);

/// Local identifier of a version node.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VersionLocalId(pub u16);

/// Identifies one version of one data instance.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VersionKey {
    pub dataset: DatasetLocalId,
    pub data: DataLocalId,
    pub version: VersionLocalId,
}

impl VersionKey {
    pub const NUM_BYTES: usize = 6;

    pub fn new(dataset: DatasetLocalId, data: DataLocalId, version: VersionLocalId) -> Self {
        Self {
            dataset,
            data,
            version,
        }
    }

    /// Big-endian dataset, data, version. Used as the key prefix of every block stored for this version.
    pub fn to_bytes(&self) -> [u8; Self::NUM_BYTES] {
        let mut bytes = [0; Self::NUM_BYTES];
        bytes[0..2].copy_from_slice(&self.dataset.0.to_be_bytes());
        bytes[2..4].copy_from_slice(&self.data.0.to_be_bytes());
        bytes[4..6].copy_from_slice(&self.version.0.to_be_bytes());

        bytes
    }
}

impl fmt::Display for VersionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.dataset.0, self.data.0, self.version.0)
    }
}

type VersionMutex = Arc<Mutex<()>>;

/// A registry of per-version mutexes.
///
/// The registry lock only guards the map lookup. It is released before the caller locks the returned mutex, so waiting on one
/// version never blocks access to another.
#[derive(Default)]
pub struct VersionMutexes {
    mutexes: Mutex<HashMap<VersionKey, VersionMutex, ahash::RandomState>>,
}

static GLOBAL: Lazy<VersionMutexes> = Lazy::new(VersionMutexes::default);

impl VersionMutexes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the unique mutex for `key`, creating it if this is the first request. Concurrent first requests for the same
    /// key all receive the same mutex.
    pub fn get(&self, key: VersionKey) -> VersionMutex {
        let mut mutexes = self.mutexes.lock();

        mutexes
            .entry(key)
            .or_insert_with(|| {
                tracing::debug!("creating mutex for version {}", key);
                Arc::new(Mutex::new(()))
            })
            .clone()
    }

    /// Number of versions with a mutex.
    pub fn len(&self) -> usize {
        self.mutexes.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for VersionMutexes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionMutexes").field("len", &self.len()).finish()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
