use clap::Parser;
use gridrelax::init::write_values;
use rand::prelude::*;
use std::path::PathBuf;

/// Write a file of random grid values in [1, 2) for `relax --file`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Output file.
    #[arg(default_value = "values.txt")]
    path: PathBuf,

    /// Grid side length, the file holds dimension² values.
    #[arg(short, long, default_value = "100")]
    dimension: usize,

    /// Seed for reproducible files.
    #[arg(long)]
    seed: Option<u64>,

    /// Print build information and quit
    #[arg(long)]
    build_info: bool,
}

fn main() {
    let args = Args::parse();
    if args.build_info {
        gridrelax::build_info::print_report("gen_values");
        return;
    }
    env_logger::init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    if let Err(e) = write_values(&args.path, args.dimension, &mut rng) {
        eprintln!("Failed to write {:?}: {e}", args.path);
        std::process::exit(1);
    }
}
