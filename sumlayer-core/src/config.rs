use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime configuration for a BFS run, loadable from a TOML file or built up from CLI
/// flags. Defaults mirror the policy constants the original driver hard-coded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// If set, the driver stops after completing this tile sum (inclusive). Primarily
    /// useful for tests and bounded demo runs; an unset value runs until the layer is
    /// empty.
    pub stopping_tile_sum: Option<u32>,

    /// Initial capacity, in slots, for each of the three seed layers.
    pub initial_capacity: usize,

    /// Multiplier applied to the previous layer's post-compaction size when sizing the
    /// next layer.
    pub growth_factor: f64,

    /// Lower bound on any allocated layer's capacity, regardless of `growth_factor`.
    pub capacity_floor: usize,

    /// Upper bound on any allocated layer's capacity.
    pub capacity_ceiling: usize,

    /// Number of worker threads for the rayon pool. Zero means "use host parallelism".
    pub worker_threads: usize,

    /// Directory compressed layer dumps are written to, if dumping is enabled.
    pub dump_dir: Option<PathBuf>,

    /// Dump every layer whose tile sum is a multiple of this value. Zero disables
    /// dumping entirely.
    pub dump_every: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stopping_tile_sum: None,
            initial_capacity: 100,
            growth_factor: 1.2,
            capacity_floor: 10_000_000,
            capacity_ceiling: 70_000_000_000,
            worker_threads: 0,
            dump_dir: None,
            dump_every: 0,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Clamps a proposed next-layer capacity into `[capacity_floor, capacity_ceiling]`.
    pub fn clamp_capacity(&self, proposed: usize) -> usize {
        proposed.clamp(self.capacity_floor, self.capacity_ceiling)
    }

    pub fn next_capacity(&self, previous_occupied: usize) -> usize {
        let grown = (previous_occupied as f64 * self.growth_factor).ceil() as usize;
        self.clamp_capacity(grown.max(self.capacity_floor))
    }

    pub fn should_dump(&self, tile_sum: u32) -> bool {
        self.dump_every != 0 && tile_sum % self.dump_every == 0 && self.dump_dir.is_some()
    }
}
