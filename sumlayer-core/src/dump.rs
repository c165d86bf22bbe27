//! Compressed on-disk dumps of a closed layer.
//!
//! Writes the layer's boards as little-endian u64 words, sorted ascending, through a
//! `zstd` encoder at its fastest level — the same fastest-level, streaming-compressor
//! choice the reference driver made with `ZSTD_compress2`, minus the manual
//! mmap-the-output-file trick the safe `zstd` crate makes unnecessary.

use crate::board::Board;
use crate::error::Error;
use std::io::Write;
use std::path::Path;

pub fn write_layer(dir: &Path, tile_sum: u32, boards: &[Board]) -> Result<(), Error> {
    std::fs::create_dir_all(dir).map_err(|source| Error::Dump {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut sorted: Vec<u64> = boards.iter().map(|b| b.0).collect();
    sorted.sort_unstable();

    let path = dir.join(format!("layer-{tile_sum}.bin.zst"));
    let file = std::fs::File::create(&path).map_err(|source| Error::Dump {
        path: path.clone(),
        source,
    })?;

    let mut encoder = zstd::Encoder::new(file, 1).map_err(Error::Compression)?;
    for word in &sorted {
        encoder
            .write_all(&word.to_le_bytes())
            .map_err(|source| Error::Dump { path: path.clone(), source })?;
    }
    encoder.finish().map_err(Error::Compression)?;

    Ok(())
}
