//! Writes an n x n matrix of random integers in [-5, 5], one per line.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rowmul::generate::write_random_matrix;

#[derive(Parser, Debug)]
#[command(
    name = "genmatrix",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate a random square matrix file for rowmul."
)]
struct Args {
    /// Matrix size (n)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    n: u32,

    /// Output file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    output: PathBuf,

    /// Seed for reproducible output (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .try_init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    write_random_matrix(&args.output, args.n as usize, &mut rng)
        .with_context(|| format!("can't create file {}", args.output.display()))
}
