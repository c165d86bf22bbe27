use std::path::PathBuf;

/// The error taxonomy for `sumlayer-core`. Allocation and remap failures are fatal to
/// the caller (there is no recovery path for a folded set that can't grow); dump
/// failures are reported but do not interrupt the BFS driver.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to allocate {bytes} bytes of anonymous memory")]
    Allocation { bytes: usize },

    #[error("failed to remap backing region from {old_bytes} to {new_bytes} bytes")]
    Remap { old_bytes: usize, new_bytes: usize },

    #[error("failed to write layer dump to {path}: {source}")]
    Dump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("compression of layer dump failed: {0}")]
    Compression(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
