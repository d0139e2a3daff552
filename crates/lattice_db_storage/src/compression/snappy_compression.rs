use super::BytesCompression;

use std::io;

/// The [Snappy compression algorithm](https://en.wikipedia.org/wiki/Snappy_(compression)), raw block format. Uses a pure
/// Rust implementation.
///
/// The block format (not the framed stream format) is what earlier versions of the store wrote, so that's what we keep.
#[derive(Clone, Copy, Debug, Default)]
pub struct Snappy;

impl BytesCompression for Snappy {
    fn compress_bytes(&self, bytes: &[u8], mut compressed_bytes: impl io::Write) -> io::Result<()> {
        let encoded = snap::raw::Encoder::new().compress_vec(bytes)?;
        compressed_bytes.write_all(&encoded)
    }

    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl io::Write) -> io::Result<()> {
        let decoded = snap::raw::Decoder::new().decompress_vec(compressed_bytes)?;
        bytes.write_all(&decoded)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
