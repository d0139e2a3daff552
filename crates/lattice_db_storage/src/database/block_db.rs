use super::{KeyValue, KeyValueStore};
use crate::{
    deserialize_data, serialize_data, DataConfig, Index, IndexCzyx, IndexCzyxIterator, IndexIterator, IndexRange, IndexZyx,
    IndexZyxIterator, Result, VersionKey, VersionLocalId, VersionMutexes,
};

use lattice_db_core::prelude::*;

const BLOCK_TAG: u8 = 0x01;
const CHANNEL_BLOCK_TAG: u8 = 0x02;
const PREFIX_LEN: usize = VersionKey::NUM_BYTES + 1;

/// The blocks of one version of one data instance, stored as serialized values in a `KeyValueStore`.
///
/// Keys are the version key bytes, a one byte tag for plain or channel blocks, and then the `IndexZyx` or `IndexCzyx` of the
/// block. So every (instance, version) pair owns a contiguous slice of the key space, and many of them can share one store.
///
/// Writes hold the version's mutex from the process-wide `VersionMutexes`. Unversioned instances store everything under
/// version 0.
pub struct BlockDb<S> {
    store: S,
    version: VersionKey,
    config: DataConfig,
    mutexes: &'static VersionMutexes,
}

impl<S> BlockDb<S> {
    pub fn new(store: S, key: VersionKey, config: DataConfig) -> Self {
        Self::with_mutexes(store, key, config, VersionMutexes::global())
    }

    pub fn with_mutexes(store: S, key: VersionKey, config: DataConfig, mutexes: &'static VersionMutexes) -> Self {
        let version = if config.versioned {
            key
        } else {
            VersionKey {
                version: VersionLocalId(0),
                ..key
            }
        };

        Self {
            store,
            version,
            config,
            mutexes,
        }
    }

    /// The version key that prefixes every stored block.
    pub fn version(&self) -> VersionKey {
        self.version
    }

    pub fn config(&self) -> &DataConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn prefix(&self, tag: u8) -> [u8; PREFIX_LEN] {
        let mut prefix = [0; PREFIX_LEN];
        prefix[..VersionKey::NUM_BYTES].copy_from_slice(&self.version.to_bytes());
        prefix[VersionKey::NUM_BYTES] = tag;

        prefix
    }

    fn block_key(&self, chunk: &ChunkCoord) -> Vec<u8> {
        let mut key = self.prefix(BLOCK_TAG).to_vec();
        key.extend_from_slice(&IndexZyx::new(*chunk).to_bytes());

        key
    }

    fn channel_block_key(&self, channel: i32, chunk: &ChunkCoord) -> Vec<u8> {
        let mut key = self.prefix(CHANNEL_BLOCK_TAG).to_vec();
        key.extend_from_slice(&IndexCzyx::new(channel, *chunk).to_bytes());

        key
    }
}

impl<S> BlockDb<S>
where
    S: KeyValueStore,
{
    /// Serializes `data` with the configured compression and checksum and stores it at `chunk`, overwriting any previous
    /// block.
    pub fn put_block(&self, chunk: &ChunkCoord, data: &[u8]) -> Result<()> {
        let value = self.serialize(data)?;
        let key = self.block_key(chunk);

        let mutex = self.mutexes.get(self.version);
        let _guard = mutex.lock();

        self.store.put(&key, value)
    }

    /// Stores a batch of blocks while holding the version mutex once.
    pub fn put_blocks<D>(&self, blocks: impl IntoIterator<Item = (ChunkCoord, D)>) -> Result<()>
    where
        D: AsRef<[u8]>,
    {
        let mut batch: Vec<KeyValue> = Vec::new();
        for (chunk, data) in blocks.into_iter() {
            batch.push((self.block_key(&chunk), self.serialize(data.as_ref())?));
        }
        // Sorted keys are cheaper for tree engines to apply.
        batch.sort_by(|a, b| a.0.cmp(&b.0));

        let mutex = self.mutexes.get(self.version);
        let _guard = mutex.lock();

        self.store.put_batch(batch)
    }

    pub fn get_block(&self, chunk: &ChunkCoord) -> Result<Option<Vec<u8>>> {
        match self.store.get(&self.block_key(chunk))? {
            Some(value) => Ok(Some(deserialize_data(&value, true)?.0)),
            None => Ok(None),
        }
    }

    pub fn delete_block(&self, chunk: &ChunkCoord) -> Result<()> {
        let key = self.block_key(chunk);

        let mutex = self.mutexes.get(self.version);
        let _guard = mutex.lock();

        self.store.delete(&key)
    }

    /// Reads every stored block in the chunk region `[begin, end]` (inclusive) with one range scan per X scanline.
    ///
    /// Blocks are returned in scan order: Z slowest, then Y, then X ascending.
    pub fn read_span_range(&self, begin: ChunkCoord, end: ChunkCoord) -> Result<Vec<(ChunkCoord, Vec<u8>)>> {
        let prefix = self.prefix(BLOCK_TAG);
        let mut blocks = Vec::new();
        for (span_begin, span_end) in IndexZyxIterator::new(begin, end) {
            self.read_span(&prefix, span_begin, span_end, &mut blocks, |key| {
                Ok(IndexZyx::from_bytes(key)?.chunk())
            })?;
        }

        Ok(blocks)
    }

    /// The `IndexRange` bounding every stored (non-channel) block, or `None` if there are none.
    pub fn extents(&self) -> Result<Option<IndexRange>> {
        let prefix = self.prefix(BLOCK_TAG);
        let mut begin = prefix.to_vec();
        begin.extend_from_slice(&[0x00; IndexZyx::KEY_LEN]);
        let mut end = prefix.to_vec();
        end.extend_from_slice(&[0xff; IndexZyx::KEY_LEN]);

        let mut range: Option<IndexRange> = None;
        for (key, _) in self.store.range(&begin, &end)?.into_iter() {
            let index = Index::from(IndexZyx::from_bytes(&key[PREFIX_LEN..])?);
            match range.as_mut() {
                Some(r) => {
                    r.extend(&index)?;
                }
                None => range = Some(IndexRange::from_index(index)),
            }
        }

        Ok(range)
    }

    pub fn put_channel_block(&self, channel: i32, chunk: &ChunkCoord, data: &[u8]) -> Result<()> {
        let value = self.serialize(data)?;
        let key = self.channel_block_key(channel, chunk);

        let mutex = self.mutexes.get(self.version);
        let _guard = mutex.lock();

        self.store.put(&key, value)
    }

    pub fn get_channel_block(&self, channel: i32, chunk: &ChunkCoord) -> Result<Option<Vec<u8>>> {
        match self.store.get(&self.channel_block_key(channel, chunk))? {
            Some(value) => Ok(Some(deserialize_data(&value, true)?.0)),
            None => Ok(None),
        }
    }

    /// Like `read_span_range`, but only for blocks of `channel`.
    pub fn read_channel_span_range(
        &self,
        channel: i32,
        begin: ChunkCoord,
        end: ChunkCoord,
    ) -> Result<Vec<(ChunkCoord, Vec<u8>)>> {
        let prefix = self.prefix(CHANNEL_BLOCK_TAG);
        let mut blocks = Vec::new();
        let mut it = IndexCzyxIterator::new(channel, begin, end);
        while it.valid() {
            let (span_begin, span_end) = it.index_span();
            self.read_span(&prefix, span_begin, span_end, &mut blocks, |key| {
                Ok(IndexCzyx::from_bytes(key)?.chunk())
            })?;
            it.next_span();
        }

        Ok(blocks)
    }

    fn read_span(
        &self,
        prefix: &[u8],
        span_begin: Index,
        span_end: Index,
        blocks: &mut Vec<(ChunkCoord, Vec<u8>)>,
        decode_key: impl Fn(&[u8]) -> Result<ChunkCoord>,
    ) -> Result<()> {
        tracing::trace!("scanning span {} to {}", span_begin, span_end);

        for (begin, end) in split_span_at_zero_x(span_begin, span_end).iter().flatten() {
            let mut begin_key = prefix.to_vec();
            begin_key.extend_from_slice(&begin.to_bytes());
            let mut end_key = prefix.to_vec();
            end_key.extend_from_slice(&end.to_bytes());

            for (key, value) in self.store.range(&begin_key, &end_key)?.into_iter() {
                let chunk = decode_key(&key[prefix.len()..])?;
                let (data, _format) = deserialize_data(&value, true)?;
                blocks.push((chunk, data));
            }
        }

        Ok(())
    }

    fn serialize(&self, data: &[u8]) -> Result<Vec<u8>> {
        serialize_data(data, self.config.compression, self.config.checksum)
    }
}

/// A scanline whose X range crosses zero is not contiguous in ZYX key space, because negative X keys sort after non-negative
/// ones. Splits such a span into its negative and non-negative halves, negative first.
fn split_span_at_zero_x(begin: Index, end: Index) -> [Option<(Index, Index)>; 2] {
    let (begin_x, end_x) = match (begin.value(0), end.value(0)) {
        (Some(b), Some(e)) => (b, e),
        _ => return [Some((begin, end)), None],
    };
    if !(begin_x < 0 && end_x >= 0) {
        return [Some((begin, end)), None];
    }

    [
        Some((begin, with_x(end, -1))),
        Some((with_x(begin, 0), end)),
    ]
}

fn with_x(index: Index, x: i32) -> Index {
    match index {
        Index::Zyx(i) => {
            let c = i.chunk();
            IndexZyx::new(ChunkCoord::new(x, c.y(), c.z())).into()
        }
        Index::Czyx(i) => {
            let c = i.chunk();
            IndexCzyx::new(i.channel, ChunkCoord::new(x, c.y(), c.z())).into()
        }
        other => other,
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
