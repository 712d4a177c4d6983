//! `rowmul <numThreads> <N> <pathA> <pathB> <pathC>`

mod cli;

use crate::cli::{Cli, level_for};
use anyhow::Context;
use clap::Parser;
use log::debug;
use rowmul::{EngineConfig, MultiplyEngine};

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = EngineConfig::new(cli.num_threads as usize, cli.n as usize)?;
    debug!(
        "rowmul: {} threads, {}x{} matrices",
        config.num_threads(),
        config.n(),
        config.n()
    );

    let mut engine = MultiplyEngine::new(config);
    engine.allocate()?;
    engine
        .populate(&cli.path_a, &cli.path_b)
        .context("cannot load input matrices")?;

    let elapsed = engine.run()?;
    println!("Execution time: {:.6} seconds", elapsed.as_secs_f64());

    engine
        .finalize(&cli.path_c)
        .context("error writing to output file")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _ = env_logger::Builder::new()
        .filter_level(level_for(cli.verbose))
        .try_init();

    run(cli)
}
