use super::BytesCompression;

use flate2::{read::GzDecoder, write::GzEncoder};
use std::io::{self, Read, Write};

/// A standard gzip stream. Gzip carries its own length and CRC32, so it detects corruption on its own.
#[derive(Clone, Copy, Debug)]
pub struct Gzip {
    /// The deflate level, from 1 (fastest) to 9 (smallest). `None` uses the deflate default.
    pub level: Option<u32>,
}

impl Gzip {
    fn flate2_level(&self) -> flate2::Compression {
        match self.level {
            Some(level) => flate2::Compression::new(level),
            None => flate2::Compression::default(),
        }
    }
}

impl BytesCompression for Gzip {
    fn compress_bytes(&self, bytes: &[u8], compressed_bytes: impl io::Write) -> io::Result<()> {
        let mut encoder = GzEncoder::new(compressed_bytes, self.flate2_level());
        encoder.write_all(bytes)?;
        encoder.finish()?;

        Ok(())
    }

    fn decompress_bytes(compressed_bytes: &[u8], bytes: &mut impl io::Write) -> io::Result<()> {
        let mut decoder = GzDecoder::new(compressed_bytes);
        let mut decoded = Vec::new();
        decoder.read_to_end(&mut decoded)?;

        bytes.write_all(&decoded)
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
