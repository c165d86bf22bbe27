//! Concurrent breadth-first enumeration of 2048-style board positions, grouped by
//! tile-sum layer, using a symmetry-folded lock-free hash set to store each layer's
//! canonical positions.

pub mod board;
pub mod config;
pub mod driver;
pub mod dump;
pub mod error;
pub mod fold;
pub mod hash;
pub mod set;
pub mod vm;

mod build_common;

mod generated {
    #![allow(clippy::all)]
    use crate::build_common::{FOLD_TABLE_SIZE, ROW_TABLE_SIZE};
    include!(concat!(env!("OUT_DIR"), "/build_generated.rs"));
}

pub(crate) use generated::{FOLD_TABLE, MOVE_RIGHT_ROW_TABLE};

pub use board::Board;
pub use config::Config;
pub use driver::{run, LayerStats};
pub use error::{Error, Result};
pub use set::{FoldedSet, InsertOutcome};
