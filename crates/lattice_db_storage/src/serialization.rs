//! Self-describing, optionally compressed and checksummed values.
//!
//! Every serialized value has this layout (multi-byte integers are little-endian):
//!
//! ```text
//! byte 0     : format byte (bits 7-5 = compression format, bits 4-3 = checksum, bits 2-0 zero)
//! bytes 1..5 : CRC32 of the remaining bytes, only present if the checksum is not `None`
//! remaining  : payload, compressed with the selected format
//! ```
//!
//! The format byte comes first so a reader always knows how many checksum bytes follow, and the checksum covers the
//! *compressed* bytes so corruption is detected before any decompression work is done.

use crate::{
    compression::{compress_to_vec, decompress_to_vec, BytesCompression, Gzip, Lz4, Snappy},
    Result, StorageError,
};

use std::convert::TryFrom;
use std::fmt;
use std::io;

/// The compression algorithm of a serialized value. Must fit in 3 bits.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum CompressionFormat {
    Uncompressed = 0,
    Snappy = 1,
    /// Gzip stores length and checksum automatically.
    Gzip = 2,
    Lz4 = 4,
}

impl TryFrom<u8> for CompressionFormat {
    type Error = StorageError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => CompressionFormat::Uncompressed,
            1 => CompressionFormat::Snappy,
            2 => CompressionFormat::Gzip,
            4 => CompressionFormat::Lz4,
            other => return Err(StorageError::UnsupportedCompression(other)),
        })
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompressionFormat::Uncompressed => "No compression",
            CompressionFormat::Snappy => "Snappy compression",
            CompressionFormat::Gzip => "gzip compression",
            CompressionFormat::Lz4 => "LZ4 compression",
        })
    }
}

/// Goes from 1 (fastest) to 9 (highest compression) as in deflate. The default is -1, hence the signed type.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CompressionLevel(pub i8);

impl CompressionLevel {
    pub const NO_COMPRESSION: Self = Self(0);
    pub const BEST_SPEED: Self = Self(1);
    pub const BEST_COMPRESSION: Self = Self(9);
    pub const DEFAULT: Self = Self(-1);

    #[inline]
    fn is_valid_gzip(self) -> bool {
        self == Self::DEFAULT || (Self::BEST_SPEED <= self && self <= Self::BEST_COMPRESSION)
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A validated compression format and level. Only gzip makes use of the level; every other format stores the default.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Compression {
    format: CompressionFormat,
    level: CompressionLevel,
}

impl Compression {
    /// Maps a format and level onto a store-wide `Compression`. A level of `NO_COMPRESSION` forces `Uncompressed`, whatever
    /// format was requested.
    pub fn new(format: CompressionFormat, level: CompressionLevel) -> Result<Self> {
        if level == CompressionLevel::NO_COMPRESSION {
            return Ok(Self::none());
        }
        match format {
            CompressionFormat::Gzip => Self::gzip(level),
            other => Ok(Self {
                format: other,
                level: CompressionLevel::DEFAULT,
            }),
        }
    }

    /// Gzip at `level`, which must be in `1..=9` or `CompressionLevel::DEFAULT`.
    pub fn gzip(level: CompressionLevel) -> Result<Self> {
        if !level.is_valid_gzip() {
            return Err(StorageError::InvalidGzipLevel(level.0));
        }

        Ok(Self {
            format: CompressionFormat::Gzip,
            level,
        })
    }

    pub const fn none() -> Self {
        Self {
            format: CompressionFormat::Uncompressed,
            level: CompressionLevel::DEFAULT,
        }
    }

    pub const fn snappy() -> Self {
        Self {
            format: CompressionFormat::Snappy,
            level: CompressionLevel::DEFAULT,
        }
    }

    pub const fn lz4() -> Self {
        Self {
            format: CompressionFormat::Lz4,
            level: CompressionLevel::DEFAULT,
        }
    }

    #[inline]
    pub fn format(&self) -> CompressionFormat {
        self.format
    }

    #[inline]
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    fn gzip_backend(&self) -> Gzip {
        Gzip {
            level: if self.level == CompressionLevel::DEFAULT {
                None
            } else {
                Some(self.level.0 as u32)
            },
        }
    }
}

impl Default for Compression {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, level {}", self.format, self.level.0)
    }
}

/// The checksum used for error checking stored data. Must fit in 2 bits.
///
/// Many storage engines already implement some form of corruption test, so the default is `None`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Checksum {
    None = 0,
    Crc32 = 1,
}

impl Checksum {
    /// Number of bytes the checksum occupies after the format byte.
    #[inline]
    pub fn len(self) -> usize {
        match self {
            Checksum::None => 0,
            Checksum::Crc32 => 4,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Checksum::None
    }
}

impl TryFrom<u8> for Checksum {
    type Error = StorageError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Checksum::None,
            1 => Checksum::Crc32,
            other => return Err(StorageError::UnsupportedChecksum(other)),
        })
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Checksum::None => "No checksum",
            Checksum::Crc32 => "CRC32 checksum",
        })
    }
}

/// The leading byte of every serialized value: compression format and checksum packed together.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SerializationFormat(pub u8);

impl SerializationFormat {
    #[inline]
    pub fn encode(format: CompressionFormat, checksum: Checksum) -> Self {
        let a = (format as u8 & 0x07) << 5;
        let b = (checksum as u8 & 0x03) << 3;

        Self(a | b)
    }

    pub fn decode(self) -> Result<(CompressionFormat, Checksum)> {
        let format = CompressionFormat::try_from(self.0 >> 5)?;
        let checksum = Checksum::try_from((self.0 >> 3) & 0x03)?;

        Ok((format, checksum))
    }
}

/// Serializes a slice of bytes with `compression` and `checksum`.
///
/// The checksum is ignored (forced to `None`) for gzip, which already checks length and CRC.
pub fn serialize_data(data: &[u8], compression: Compression, checksum: Checksum) -> Result<Vec<u8>> {
    let format = compression.format();
    let checksum = if format == CompressionFormat::Gzip && checksum != Checksum::None {
        tracing::debug!("gzip already checks integrity; storing {} without {}", format, checksum);
        Checksum::None
    } else {
        checksum
    };

    let compressed = match format {
        CompressionFormat::Uncompressed => None,
        CompressionFormat::Snappy => Some(compress_with(&Snappy, format, data)?),
        CompressionFormat::Lz4 => Some(compress_with(&Lz4, format, data)?),
        CompressionFormat::Gzip => Some(compress_with(&compression.gzip_backend(), format, data)?),
    };
    let payload = compressed.as_deref().unwrap_or(data);

    let mut buffer = Vec::with_capacity(1 + checksum.len() + payload.len());
    buffer.push(SerializationFormat::encode(format, checksum).0);
    if checksum == Checksum::Crc32 {
        buffer.extend_from_slice(&crc32fast::hash(payload).to_le_bytes());
    }
    // The payload goes last, after any checksum, so we don't have to store its length.
    buffer.extend_from_slice(payload);

    tracing::trace!(
        "serialized {} bytes into {} bytes ({}, {})",
        data.len(),
        buffer.len(),
        compression,
        checksum
    );

    Ok(buffer)
}

fn compress_with(
    backend: &impl BytesCompression,
    format: CompressionFormat,
    data: &[u8],
) -> Result<Vec<u8>> {
    compress_to_vec(backend, data).map_err(|source| StorageError::CorruptPayload { format, source })
}

/// Deserializes bytes written by `serialize_data`, verifying any stored checksum. If `uncompress` is false, the payload is
/// returned still compressed.
///
/// Returns the payload and the compression format it was stored with.
pub fn deserialize_data(s: &[u8], uncompress: bool) -> Result<(Vec<u8>, CompressionFormat)> {
    let (&format_byte, rest) = s
        .split_first()
        .ok_or(StorageError::TruncatedPayload { needed: 1, actual: 0 })?;
    let (format, checksum) = SerializationFormat(format_byte).decode()?;

    if rest.len() < checksum.len() {
        return Err(StorageError::TruncatedPayload {
            needed: 1 + checksum.len(),
            actual: s.len(),
        });
    }
    let (stored_checksum, cdata) = rest.split_at(checksum.len());

    if checksum == Checksum::Crc32 {
        let mut crc_bytes = [0; 4];
        crc_bytes.copy_from_slice(stored_checksum);
        let stored = u32::from_le_bytes(crc_bytes);
        let computed = crc32fast::hash(cdata);
        if stored != computed {
            tracing::warn!("bad checksum: stored {:08x}, computed {:08x}", stored, computed);
            return Err(StorageError::ChecksumMismatch { stored, computed });
        }
    }

    tracing::trace!("deserializing {} bytes ({}, {})", s.len(), format, checksum);

    if !uncompress {
        return Ok((cdata.to_vec(), format));
    }

    let data = match format {
        CompressionFormat::Uncompressed => Ok(cdata.to_vec()),
        CompressionFormat::Snappy => decompress_to_vec::<Snappy>(cdata),
        CompressionFormat::Lz4 => decompress_to_vec::<Lz4>(cdata),
        CompressionFormat::Gzip => decompress_to_vec::<Gzip>(cdata),
    }
    .map_err(|source: io::Error| {
        tracing::warn!("failed to decompress {} payload: {}", format, source);
        StorageError::CorruptPayload { format, source }
    })?;

    Ok((data, format))
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
    use rand::{Rng, RngCore, SeedableRng};

    fn all_compressions() -> Vec<Compression> {
        vec![
            Compression::none(),
            Compression::snappy(),
            Compression::lz4(),
            Compression::gzip(CompressionLevel::DEFAULT).unwrap(),
            Compression::gzip(CompressionLevel::BEST_SPEED).unwrap(),
            Compression::gzip(CompressionLevel::BEST_COMPRESSION).unwrap(),
        ]
    }

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
        let mut bytes = vec![0; len];
        rng.fill_bytes(&mut bytes);

        bytes
    }

    #[test]
    fn hello_with_crc32_layout() {
        let serialized = serialize_data(b"hello", Compression::none(), Checksum::Crc32).unwrap();

        assert_eq!(serialized.len(), 10);
        assert_eq!(serialized[0], 0b0000_1000);
        assert_eq!(&serialized[1..5], &crc32fast::hash(b"hello").to_le_bytes());
        assert_eq!(&serialized[5..], b"hello");

        assert_eq!(
            deserialize_data(&serialized, true).unwrap(),
            (b"hello".to_vec(), CompressionFormat::Uncompressed)
        );

        let mut corrupted = serialized;
        corrupted[9] ^= 0x01;
        assert!(matches!(
            deserialize_data(&corrupted, true),
            Err(StorageError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn round_trip_every_compression_and_checksum() {
        let payloads = vec![Vec::new(), vec![42], random_bytes(1 << 20)];

        for compression in all_compressions() {
            for &checksum in [Checksum::None, Checksum::Crc32].iter() {
                for payload in payloads.iter() {
                    let serialized = serialize_data(payload, compression, checksum).unwrap();
                    let (data, format) = deserialize_data(&serialized, true).unwrap();

                    assert_eq!(format, compression.format());
                    assert!(data == *payload, "{} / {} / {} bytes", compression, checksum, payload.len());
                }
            }
        }
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let payload: Vec<u8> = (0u8..64).collect();

        for &compression in [Compression::none(), Compression::snappy(), Compression::lz4()].iter() {
            let serialized = serialize_data(&payload, compression, Checksum::Crc32).unwrap();
            for byte in 1..serialized.len() {
                for bit in 0..8 {
                    let mut corrupted = serialized.clone();
                    corrupted[byte] ^= 1 << bit;

                    assert!(
                        matches!(
                            deserialize_data(&corrupted, true),
                            Err(StorageError::ChecksumMismatch { .. })
                        ),
                        "{}: byte {} bit {}",
                        compression,
                        byte,
                        bit
                    );
                }
            }
        }
    }

    #[test]
    fn checksum_mismatch_reports_both_values() {
        let mut serialized = serialize_data(b"abc", Compression::none(), Checksum::Crc32).unwrap();
        serialized[1..5].copy_from_slice(&0xdeadbeefu32.to_le_bytes());

        match deserialize_data(&serialized, false) {
            Err(StorageError::ChecksumMismatch { stored, computed }) => {
                assert_eq!(stored, 0xdeadbeef);
                assert_eq!(computed, crc32fast::hash(b"abc"));
            }
            other => panic!("expected ChecksumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn gzip_drops_requested_checksum() {
        let compression = Compression::gzip(CompressionLevel(5)).unwrap();
        let serialized = serialize_data(b"hello gzip", compression, Checksum::Crc32).unwrap();

        assert_eq!(
            SerializationFormat(serialized[0]).decode().unwrap(),
            (CompressionFormat::Gzip, Checksum::None)
        );
        // The gzip stream starts right after the format byte.
        assert_eq!(&serialized[1..3], &[0x1f, 0x8b]);

        // Corruption is left to gzip's own integrity checks.
        let mut corrupted = serialized.clone();
        let last = corrupted.len() - 1;
        corrupted[last] ^= 0xff;
        assert!(matches!(
            deserialize_data(&corrupted, true),
            Err(StorageError::CorruptPayload {
                format: CompressionFormat::Gzip,
                ..
            })
        ));
    }

    #[test]
    fn gzip_level_validation() {
        for level in (1..=9).chain(std::iter::once(-1)) {
            assert!(Compression::gzip(CompressionLevel(level)).is_ok(), "level {}", level);
        }
        for &level in [0, 10, -2, i8::MIN, i8::MAX].iter() {
            assert!(
                matches!(
                    Compression::gzip(CompressionLevel(level)),
                    Err(StorageError::InvalidGzipLevel(l)) if l == level
                ),
                "level {}",
                level
            );
        }
    }

    #[test]
    fn no_compression_level_forces_uncompressed() {
        for &format in [
            CompressionFormat::Snappy,
            CompressionFormat::Lz4,
            CompressionFormat::Gzip,
        ]
        .iter()
        {
            let compression = Compression::new(format, CompressionLevel::NO_COMPRESSION).unwrap();
            assert_eq!(compression, Compression::none());
        }

        let lz4 = Compression::new(CompressionFormat::Lz4, CompressionLevel(7)).unwrap();
        assert_eq!(lz4.level(), CompressionLevel::DEFAULT);
        assert!(Compression::new(CompressionFormat::Gzip, CompressionLevel(12)).is_err());
    }

    #[test]
    fn skip_decompression_returns_stored_bytes() {
        let payload = vec![7u8; 4096];
        let serialized = serialize_data(&payload, Compression::lz4(), Checksum::Crc32).unwrap();

        let (cdata, format) = deserialize_data(&serialized, false).unwrap();
        assert_eq!(format, CompressionFormat::Lz4);
        assert_eq!(&cdata[..], &serialized[5..]);
        assert!(cdata.len() < payload.len());
    }

    #[test]
    fn format_byte_packs_three_and_two_bits() {
        for &format in [
            CompressionFormat::Uncompressed,
            CompressionFormat::Snappy,
            CompressionFormat::Gzip,
            CompressionFormat::Lz4,
        ]
        .iter()
        {
            for &checksum in [Checksum::None, Checksum::Crc32].iter() {
                let byte = SerializationFormat::encode(format, checksum);
                assert_eq!(byte.0 & 0x07, 0);
                assert_eq!(byte.decode().unwrap(), (format, checksum));
            }
        }
        assert_eq!(SerializationFormat::encode(CompressionFormat::Lz4, Checksum::None).0, 0x80);
    }

    #[test]
    fn unknown_descriptors_are_rejected() {
        assert!(matches!(
            deserialize_data(&[3 << 5, 1, 2, 3], true),
            Err(StorageError::UnsupportedCompression(3))
        ));
        assert!(matches!(
            deserialize_data(&[2 << 3, 1, 2, 3], false),
            Err(StorageError::UnsupportedChecksum(2))
        ));
    }

    #[test]
    fn truncated_headers_are_rejected() {
        assert!(matches!(
            deserialize_data(&[], true),
            Err(StorageError::TruncatedPayload { needed: 1, actual: 0 })
        ));
        assert!(matches!(
            deserialize_data(&[0x08, 0xaa, 0xbb], true),
            Err(StorageError::TruncatedPayload { needed: 5, actual: 3 })
        ));
    }

    #[test]
    fn corrupt_lz4_without_checksum_is_reported() {
        // The prefix claims 16 bytes but no valid block follows.
        let mut serialized = vec![SerializationFormat::encode(CompressionFormat::Lz4, Checksum::None).0];
        serialized.extend_from_slice(&16u32.to_le_bytes());
        serialized.extend_from_slice(&[0xff; 3]);

        assert!(matches!(
            deserialize_data(&serialized, true),
            Err(StorageError::CorruptPayload {
                format: CompressionFormat::Lz4,
                ..
            })
        ));

        let short = [SerializationFormat::encode(CompressionFormat::Lz4, Checksum::None).0, 1];
        assert!(matches!(
            deserialize_data(&short, true),
            Err(StorageError::CorruptPayload { .. })
        ));
    }

    #[test]
    fn random_payloads_survive_every_format() {
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let len = rng.gen_range(0..4096);
            let payload: Vec<u8> = (0..len).map(|_| rng.gen_range(0..4)).collect();
            for compression in all_compressions() {
                let serialized = serialize_data(&payload, compression, Checksum::Crc32).unwrap();
                assert_eq!(deserialize_data(&serialized, true).unwrap().0, payload);
            }
        }
    }
}
