use gridrelax::relax_cli::*;
use gridrelax::solver::{self, gauss_seidel, NoopObserver, IterationObserver};
use std::time::Instant;

fn main() {
    let args = Args::cli_setup("relax");

    #[cfg(feature = "profile-with-puffin")]
    let _profiler = start_profiler();

    if let Err(e) = run(&args) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> gridrelax::error::Result<()> {
    let grid = args.initial_grid()?;
    let config = args.relax_config();

    let mut frames = args.frame_writer();
    let mut noop = NoopObserver;
    let observer: &mut dyn IterationObserver = match frames.as_mut() {
        Some(frames) => frames,
        None => &mut noop,
    };

    let now = Instant::now();
    let outcome = if args.in_place {
        gauss_seidel::relax_observed(grid, &config, observer)?
    } else {
        solver::relax_observed(grid, &config, observer)?
    };
    let elapsed = now.elapsed();
    log::info!("Time taken: {:.6} seconds.", elapsed.as_secs_f64());

    if let Some(frames) = frames {
        frames.finish()?;
    }
    write_outputs(args, &outcome.grid)?;

    if outcome.converged {
        println!(
            "Program complete. Relaxation count: {}.",
            outcome.iterations
        );
    } else {
        println!(
            "Stopped without converging after {} passes.",
            outcome.iterations
        );
    }
    Ok(())
}
