use clap::Parser;
use std::path::PathBuf;
use sumlayer_core::Config;
use tracing_subscriber::EnvFilter;

/// Enumerate all reachable 2048-style board positions, grouped by tile-sum layer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Load configuration from a TOML file; any flag below overrides a value it loads.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tile sum to stop after (inclusive). Runs until a layer is empty if unset.
    #[arg(long)]
    stop_at: Option<u32>,

    /// Initial capacity, in slots, for each seed layer.
    #[arg(long)]
    initial_capacity: Option<usize>,

    /// Directory to write compressed layer dumps into.
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Dump every layer whose tile sum is a multiple of this value. 0 disables dumping.
    #[arg(long)]
    dump_every: Option<u32>,

    /// Number of worker threads. 0 uses host parallelism.
    #[arg(long)]
    threads: Option<usize>,
}

fn build_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Config::from_toml_str(&text)?
        }
        None => Config::default(),
    };

    if let Some(v) = args.stop_at {
        config.stopping_tile_sum = Some(v);
    }
    if let Some(v) = args.initial_capacity {
        config.initial_capacity = v;
    }
    if let Some(v) = args.dump_dir.clone() {
        config.dump_dir = Some(v);
    }
    if let Some(v) = args.dump_every {
        config.dump_every = v;
    }
    if let Some(v) = args.threads {
        config.worker_threads = v;
    }

    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = build_config(&args)?;

    sumlayer_core::run(&config, |stats| {
        tracing::info!(
            tile_sum = stats.tile_sum,
            count = stats.count,
            rate_mps = stats.positions_per_sec(),
            "layer done"
        );
    })?;

    Ok(())
}
