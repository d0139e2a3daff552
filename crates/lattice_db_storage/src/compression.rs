//! Byte compression backends used by the payload codec.

mod gzip_compression;
mod lz4_compression;
mod snappy_compression;

pub use gzip_compression::Gzip;
pub use lz4_compression::Lz4;
pub use snappy_compression::Snappy;

use std::io;

/// A compression algorithm that acts directly on a slice of bytes.
///
/// Failures are reported as `io::Error`s so the backend's own diagnostic survives into `StorageError::CorruptPayload`.
pub trait BytesCompression {
    fn compress_bytes(&self, bytes: &[u8], compressed_bytes: impl io::Write) -> io::Result<()>;
    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl io::Write) -> io::Result<()>;
}

/// Compresses `bytes` into a fresh buffer.
pub fn compress_to_vec(compression: &impl BytesCompression, bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut compressed_bytes = Vec::new();
    compression.compress_bytes(bytes, &mut compressed_bytes)?;

    Ok(compressed_bytes)
}

/// Decompresses `compressed_bytes` into a fresh buffer.
pub fn decompress_to_vec<A: BytesCompression>(compressed_bytes: &[u8]) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    A::decompress_bytes(compressed_bytes, &mut bytes)?;

    Ok(bytes)
}
