//! Error types for indexing, serialization, and block storage.

use crate::{index::IndexScheme, serialization::CompressionFormat};

use thiserror::Error;

/// Errors surfaced by the index encoders, the payload codec, and the storage adapters.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key bytes have the wrong length for the index scheme.
    #[error("Malformed {scheme} key: expected {expected} bytes, got {actual}")]
    MalformedIndex {
        scheme: IndexScheme,
        expected: usize,
        actual: usize,
    },

    /// Two indices of different schemes were combined.
    #[error("Mismatched index schemes: {left} vs {right}")]
    MismatchedIndex {
        left: IndexScheme,
        right: IndexScheme,
    },

    #[error("Cannot hash an index into 0 buckets")]
    InvalidHashModulus,

    /// Compression format value outside of the recognized set.
    #[error("Unsupported compression format: {0}")]
    UnsupportedCompression(u8),

    /// Checksum value outside of the recognized set.
    #[error("Unsupported checksum: {0}")]
    UnsupportedChecksum(u8),

    #[error("Gzip compression level must be between 1 and 9 (or -1 for default), got {0}")]
    InvalidGzipLevel(i8),

    /// The serialized value ended before its header did.
    #[error("Truncated payload: needed {needed} bytes, got {actual}")]
    TruncatedPayload { needed: usize, actual: usize },

    /// The stored checksum does not match the stored bytes. The value is corrupt.
    #[error("Bad checksum: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    /// The decompressor rejected the stored bytes.
    #[error("Corrupt {format} payload: {source}")]
    CorruptPayload {
        format: CompressionFormat,
        #[source]
        source: std::io::Error,
    },

    /// Structured object encoding (bincode) failed.
    #[error("Object encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// The underlying key-value engine failed.
    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "sled")]
impl From<sled::Error> for StorageError {
    fn from(e: sled::Error) -> Self {
        StorageError::Store(e.to_string())
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
