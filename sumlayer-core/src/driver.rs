//! The BFS driver: rotates three folded sets across tile-sum layers, generating each
//! layer's successors in parallel and reporting progress.

use crate::board::{repr_to_tile, Board};
use crate::config::Config;
use crate::dump;
use crate::error::Result;
use crate::set::FoldedSet;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, info_span};

/// Every canonicalised placement of two starting tiles (each 2 or 4) on an empty
/// board, deduplicated under the symmetry group. Mirrors the reference
/// `starting_positions`: for every pair of distinct cells and every pair of tile
/// values, place them and canonicalise.
pub fn starting_positions() -> Vec<Board> {
    let mut seen = rustc_hash::FxHashSet::default();
    for i in 0..16usize {
        for j in (i + 1)..16usize {
            for t1 in 1..=2u8 {
                for t2 in 1..=2u8 {
                    let b = Board::EMPTY.set_tile(i, t1).set_tile(j, t2);
                    seen.insert(b.canonical_form().0);
                }
            }
        }
    }
    seen.into_iter().map(Board).collect()
}

/// Buckets seed positions by tile sum into the three initial layers (4, 6, 8).
fn seed_layers(config: &Config) -> Result<(FoldedSet, FoldedSet, FoldedSet)> {
    let mut l4 = FoldedSet::new(4, config.initial_capacity)?;
    let mut l6 = FoldedSet::new(6, config.initial_capacity)?;
    let mut l8 = FoldedSet::new(8, config.initial_capacity)?;

    for b in starting_positions() {
        match b.tile_sum() {
            4 => {
                l4.insert(b);
            }
            6 => {
                l6.insert(b);
            }
            8 => {
                l8.insert(b);
            }
            other => unreachable!("starting position with unexpected tile sum {other}"),
        }
    }

    Ok((l4, l6, l8))
}

/// Summary statistics for one completed layer.
#[derive(Debug, Clone, Copy)]
pub struct LayerStats {
    pub tile_sum: u32,
    pub count: usize,
    pub elapsed_secs: f64,
}

impl LayerStats {
    pub fn positions_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            0.0
        } else {
            self.count as f64 / self.elapsed_secs / 1_000_000.0
        }
    }
}

/// Runs the BFS from the two-tile seed layers until either a layer is empty or
/// `config.stopping_tile_sum` is reached, calling `on_layer` after each completed
/// layer (after compaction, before rotation).
pub fn run(config: &Config, mut on_layer: impl FnMut(LayerStats)) -> Result<()> {
    if config.worker_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .build_global()
            .ok(); // a global pool may already be installed by an embedding caller
    }

    let (mut prev2, mut prev, mut dst) = seed_layers(config)?;

    // Sum-6 positions reachable from a sum-4 start via a single tile-2 spawn aren't
    // captured by `starting_positions` (it only enumerates direct two-tile starts),
    // so the first layer transition is bootstrapped once before the regular loop.
    generate_successors_into(&prev2, 1, &prev);
    prev2.gorge()?;
    prev.gorge()?;

    // A two-tile start always sums to 4, 6, or 8 — the game rules don't leave this
    // configurable, so the first generated layer's sum is fixed rather than derived
    // from `config`.
    let mut tile_sum = 8;

    loop {
        let span = info_span!("layer", tile_sum = dst.tile_sum());
        let _enter = span.enter();
        let start = Instant::now();

        let _ = generate_successors_into(&prev2, 2, &dst);
        let census = generate_successors_into(&prev, 1, &dst);

        info!(?census, "max-tile census for source layer");

        dst.gorge()?;
        let count = dst.parallel_count();

        if config.should_dump(dst.tile_sum()) {
            if let Some(dir) = &config.dump_dir {
                dump::write_layer(dir, dst.tile_sum(), &dst.iterate())?;
            }
        }

        let elapsed_secs = start.elapsed().as_secs_f64();
        let stats = LayerStats {
            tile_sum: dst.tile_sum(),
            count,
            elapsed_secs,
        };
        info!(count, rate_mps = stats.positions_per_sec(), "layer complete");
        on_layer(stats);

        if count == 0 {
            return Ok(());
        }
        if let Some(stop) = config.stopping_tile_sum {
            if dst.tile_sum() >= stop {
                return Ok(());
            }
        }

        // Rotate: prev2 <- prev, prev <- dst, allocate a fresh dst two sums ahead.
        let next_capacity = config.next_capacity(count);
        prev2 = prev;
        prev = dst;
        tile_sum += 2;
        dst = FoldedSet::new(tile_sum, next_capacity)?;
    }
}

/// Generates successors of every board in `source` (spawning tile `spawn`) and
/// inserts them into `dest`, in parallel across `source`'s slots. Returns a per-tile
/// census (index = nibble value, value = count) accumulated only when `spawn == 2`,
/// mirroring the reference driver's census pass over the tile-4-spawning source.
fn generate_successors_into(source: &FoldedSet, spawn: u8, dest: &FoldedSet) -> [u64; 16] {
    source
        .iterate()
        .into_par_iter()
        .fold(
            || ([0u64; 16], Vec::new()),
            |(mut census, mut buf), b| {
                census[b.max_tile() as usize] += 1;
                b.successors(spawn, &mut buf);
                for &succ in &buf {
                    dest.insert(succ);
                }
                (census, buf)
            },
        )
        .map(|(census, _)| census)
        .reduce(
            || [0u64; 16],
            |mut a, b| {
                for i in 0..16 {
                    a[i] += b[i];
                }
                a
            },
        )
}

#[allow(dead_code)]
fn tile_value_label(nibble: u8) -> u32 {
    repr_to_tile(nibble)
}
