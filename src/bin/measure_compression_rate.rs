use lattice_db::storage::{serialize_data, Checksum, Compression, CompressionLevel};

use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const PAYLOAD_SIZE: usize = 1 << 20;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<_> = std::env::args().collect();
    let payload = match args.get(1) {
        Some(path) => {
            println!("Loading {}", path);
            match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    eprintln!("Failed to read {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("No input file; using {} bytes of sparse voxel-like data", PAYLOAD_SIZE);
            sparse_payload(PAYLOAD_SIZE)
        }
    };

    let mut compressions = vec![Compression::none(), Compression::snappy(), Compression::lz4()];
    for &level in [
        CompressionLevel::BEST_SPEED,
        CompressionLevel::DEFAULT,
        CompressionLevel::BEST_COMPRESSION,
    ]
    .iter()
    {
        if let Ok(gzip) = Compression::gzip(level) {
            compressions.push(gzip);
        }
    }

    for compression in compressions.into_iter() {
        println!("Compressing with {}:", compression);
        measure_compression_rate(compression, &payload);
    }
}

/// Mostly empty space with runs of a few materials, like a typical terrain chunk.
fn sparse_payload(size: usize) -> Vec<u8> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    let mut payload = Vec::with_capacity(size);
    while payload.len() < size {
        let material = if rng.gen_bool(0.7) { 0 } else { rng.gen_range(1..8) };
        let run = rng.gen_range(1..64).min(size - payload.len());
        payload.extend(std::iter::repeat(material).take(run));
    }

    payload
}

fn measure_compression_rate(compression: Compression, payload: &[u8]) {
    tracing::debug!("serializing {} bytes with {}", payload.len(), compression);
    let start = std::time::Instant::now();
    let serialized = match serialize_data(payload, compression, Checksum::Crc32) {
        Ok(bytes) => bytes,
        Err(e) => {
            println!("failed: {}\n", e);
            return;
        }
    };
    let elapsed = start.elapsed();

    println!(
        "source = {} bytes, serialized = {} bytes; rate = {:.1}%; {:.2?}\n",
        payload.len(),
        serialized.len(),
        100.0 * (serialized.len() as f32 / payload.len().max(1) as f32),
        elapsed
    );
}
