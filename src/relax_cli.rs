use crate::build_info;
use crate::config::*;
use crate::csv::write_csv;
use crate::error::*;
use crate::grid::Grid;
use crate::image::write_png;
use crate::init;
use crate::partition::PartitionStrategy;
use crate::solver::{Driver, IterationObserver, PassReport};
use clap::Parser;
use std::path::PathBuf;

/// Relax a square grid until every interior cell settles.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Worker thread count.
    #[arg(short, long, default_value_t = DEFAULT_CORES)]
    pub cores: usize,

    /// Grid side length, at least 3.
    #[arg(short, long, default_value_t = DEFAULT_DIMENSION)]
    pub dimension: usize,

    /// Stop once no cell changes by more than this in a pass.
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    pub precision: f64,

    /// Read initial values from this file instead of generating them.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Seed for generated values.
    #[arg(long, conflicts_with("file"))]
    pub seed: Option<u64>,

    /// How the worker team is scheduled.
    #[arg(long, value_enum, default_value_t = Driver::default())]
    pub driver: Driver,

    /// How interior cells are split among workers.
    #[arg(long, value_enum, default_value_t = PartitionStrategy::default())]
    pub partition: PartitionStrategy,

    /// Give up after this many passes.
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Use the sequential in-place Gauss-Seidel sweep instead of Jacobi.
    #[arg(long)]
    pub in_place: bool,

    /// Directory for output files, will be created.
    /// WARNING, if this Directory
    /// already exists, current contents will be removed.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write out image frames, WARNING: we do not check image size, so be reasonable.
    #[arg(short, long, requires("output_dir"))]
    pub write_images: bool,

    /// Passes between image frames.
    #[arg(long, default_value = "1")]
    pub image_interval: usize,

    /// Write the final grid as CSV.
    #[arg(long, requires("output_dir"))]
    pub write_csv: bool,

    /// More output, repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print build information and quit
    #[arg(long)]
    pub build_info: bool,
}

impl Args {
    pub fn cli_setup(name: &str) -> Self {
        let args = Args::parse();

        if args.build_info {
            build_info::print_report(name);
            std::process::exit(0);
        }

        init_logging(args.verbose);

        if let Some(output_dir) = &args.output_dir {
            let _ = std::fs::remove_dir_all(output_dir);
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                log::error!("Couldn't create {output_dir:?}: {e}");
                std::process::exit(1);
            }
        }

        args
    }

    pub fn relax_config(&self) -> RelaxConfig {
        RelaxConfig {
            cores: self.cores,
            precision: self.precision,
            max_iterations: self.max_iterations,
            driver: self.driver,
            partition: self.partition,
        }
    }

    pub fn initial_grid(&self) -> Result<Grid> {
        match (&self.file, self.seed) {
            (Some(path), _) => init::from_file(path, self.dimension),
            (None, Some(seed)) => Ok(init::random_seeded(self.dimension, seed)),
            (None, None) => Ok(init::random(self.dimension)),
        }
    }

    pub fn csv_path(&self) -> Option<PathBuf> {
        let mut result = self.output_dir.as_ref()?.clone();
        result.push("final.csv");
        Some(result)
    }

    /// Observer writing a frame every `image_interval` passes,
    /// or `None` when no frames were requested.
    pub fn frame_writer(&self) -> Option<FrameWriter> {
        if !self.write_images {
            return None;
        }
        Some(FrameWriter {
            output_dir: self.output_dir.clone()?,
            interval: self.image_interval.max(1),
            error: None,
        })
    }
}

/// `-v` info, `-vv` debug, `-vvv` trace. `RUST_LOG` takes precedence.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[cfg(feature = "profile-with-puffin")]
pub fn start_profiler() -> Option<puffin_http::Server> {
    println!("Initializing profiling server:");
    let server_addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    println!("Run this to view profiling data:  puffin_viewer {server_addr}");
    match puffin_http::Server::new(&server_addr) {
        Ok(server) => {
            profiling::puffin::set_scopes_on(true);
            Some(server)
        }
        Err(e) => {
            log::error!("Couldn't start profiling server: {e}");
            None
        }
    }
}

pub struct FrameWriter {
    output_dir: PathBuf,
    interval: usize,
    error: Option<RelaxError>,
}

impl FrameWriter {
    /// The first error hit while writing, later passes stop writing.
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn write(&self, report: &PassReport<'_>) -> Result<()> {
        let mut path = self.output_dir.clone();
        path.push(format!("frame_{:04}.png", report.iteration / self.interval));
        write_png(&report.to_grid()?, &path)
    }
}

impl IterationObserver for FrameWriter {
    fn on_pass(&mut self, report: &PassReport<'_>) {
        profiling::finish_frame!();
        if self.error.is_some() || report.iteration % self.interval != 0 {
            return;
        }
        if let Err(e) = self.write(report) {
            log::error!("Failed to write frame {}: {e}", report.iteration);
            self.error = Some(e);
        }
    }
}

pub fn write_outputs(args: &Args, grid: &Grid) -> Result<()> {
    if args.write_csv {
        if let Some(path) = args.csv_path() {
            write_csv(grid, &path)?;
        }
    }
    Ok(())
}
