use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rowmul",
    version = env!("CARGO_PKG_VERSION"),
    about = "Multiply two N x N integer matrices with a fixed pool of threads."
)]
pub struct Cli {
    /// Number of worker threads
    #[arg(value_name = "numThreads", value_parser = clap::value_parser!(u32).range(1..))]
    pub num_threads: u32,

    /// Matrix size (N)
    #[arg(value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub n: u32,

    /// File holding matrix A
    #[arg(value_name = "pathA", value_hint = clap::ValueHint::FilePath)]
    pub path_a: PathBuf,

    /// File holding matrix B
    #[arg(value_name = "pathB", value_hint = clap::ValueHint::FilePath)]
    pub path_b: PathBuf,

    /// File the product C is written to
    #[arg(value_name = "pathC", value_hint = clap::ValueHint::FilePath)]
    pub path_c: PathBuf,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
