use super::BytesCompression;

use std::convert::TryFrom;
use std::io;

/// Length of the little-endian uncompressed size that precedes every LZ4 block.
const SIZE_PREFIX_LEN: usize = 4;

/// The [LZ4 compression algorithm](https://en.wikipedia.org/wiki/LZ4_(compression_algorithm)), block format.
///
/// The LZ4 block decoder needs to know the size of its output up front, so the compressed bytes are
/// `[uncompressed size: u32 LE][LZ4 block]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lz4;

impl BytesCompression for Lz4 {
    fn compress_bytes(&self, bytes: &[u8], mut compressed_bytes: impl io::Write) -> io::Result<()> {
        let original_size = u32::try_from(bytes.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} bytes is too large for an LZ4 block", bytes.len()),
            )
        })?;
        compressed_bytes.write_all(&original_size.to_le_bytes())?;
        if bytes.is_empty() {
            return Ok(());
        }

        let block = lz4::block::compress(bytes, None, false)?;
        compressed_bytes.write_all(&block)
    }

    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl io::Write) -> io::Result<()> {
        if compressed_bytes.len() < SIZE_PREFIX_LEN {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "LZ4 payload of {} bytes is missing its size prefix",
                    compressed_bytes.len()
                ),
            ));
        }
        let (prefix, block) = compressed_bytes.split_at(SIZE_PREFIX_LEN);
        let mut size_bytes = [0; SIZE_PREFIX_LEN];
        size_bytes.copy_from_slice(prefix);
        let original_size = u32::from_le_bytes(size_bytes);
        if original_size == 0 {
            return Ok(());
        }

        let expected_size = i32::try_from(original_size).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("LZ4 size prefix {} is out of range", original_size),
            )
        })?;
        let decoded = lz4::block::decompress(block, Some(expected_size))?;
        if decoded.len() != original_size as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "LZ4 size prefix says {} bytes, block holds {}",
                    original_size,
                    decoded.len()
                ),
            ));
        }

        bytes.write_all(&decoded)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
