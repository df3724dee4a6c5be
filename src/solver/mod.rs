//! Orchestration of a relaxation run.
//!
//! Every driver performs pure double buffered Jacobi passes over the same
//! chunk partition, so for the same input they produce the same grid
//! and the same iteration count. They differ only in how the worker team
//! is scheduled and synchronized.

mod copy_back;
mod fork_join;
pub mod gauss_seidel;
mod persistent;
mod pool;
mod sequential;
mod shared;

use crate::config::RelaxConfig;
use crate::error::*;
use crate::grid::Grid;
use crate::partition::*;
use crate::worker::Worker;
use clap::ValueEnum;

#[derive(Copy, Clone, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum Driver {
    /// Spawn a fresh thread team for every pass.
    #[default]
    ForkJoin,

    /// Spawn the team once, swap buffer roles every pass,
    /// one barrier per pass.
    Persistent,

    /// Spawn the team once, copy results back into the current buffer,
    /// three barriers per pass.
    PersistentCopyBack,

    /// Run each pass on a rayon pool with one thread per chunk.
    Rayon,

    /// Single thread reference.
    Sequential,
}

/// Result of a `relax` call.
#[derive(Clone, Debug)]
pub struct RelaxOutcome {
    /// Values computed by the final pass.
    pub grid: Grid,

    /// Passes executed, including the last one.
    pub iterations: usize,

    /// `false` only when the iteration cap stopped the run.
    pub converged: bool,
}

/// What a telemetry sink sees after each pass.
pub struct PassReport<'a> {
    /// One based pass number.
    pub iteration: usize,

    /// Whether every cell of the pass stayed within precision.
    pub within_precision: bool,

    pub dimension: usize,

    /// The freshly computed buffer.
    pub values: &'a [f64],
}

impl PassReport<'_> {
    pub fn to_grid(&self) -> Result<Grid> {
        Grid::from_vec(self.dimension, self.values.to_vec())
    }
}

pub trait IterationObserver: Send {
    fn on_pass(&mut self, report: &PassReport<'_>);
}

pub struct NoopObserver;

impl IterationObserver for NoopObserver {
    fn on_pass(&mut self, _report: &PassReport<'_>) {}
}

impl<F: FnMut(&PassReport<'_>) + Send> IterationObserver for F {
    fn on_pass(&mut self, report: &PassReport<'_>) {
        self(report)
    }
}

/// Everything a driver needs, fixed for the whole run.
pub(crate) struct Run<'a> {
    pub dimension: usize,
    pub precision: f64,
    pub max_iterations: Option<usize>,
    pub chunks: &'a [Chunk],
}

impl Run<'_> {
    pub fn capped(&self, iterations: usize) -> bool {
        self.max_iterations.is_some_and(|m| iterations >= m)
    }

    pub fn workers(&self) -> impl Iterator<Item = Worker> + '_ {
        self.chunks
            .iter()
            .enumerate()
            .map(|(id, chunk)| Worker::new(id, *chunk, self.dimension, self.precision))
    }

    fn report<'b>(&self, iteration: usize, within_precision: bool, values: &'b [f64]) -> PassReport<'b> {
        PassReport {
            iteration,
            within_precision,
            dimension: self.dimension,
            values,
        }
    }
}

pub(crate) struct Finished {
    pub values: Vec<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Relax `grid` until a pass leaves every interior cell within precision.
pub fn relax(grid: Grid, config: &RelaxConfig) -> Result<RelaxOutcome> {
    relax_observed(grid, config, &mut NoopObserver)
}

pub fn relax_observed(
    grid: Grid,
    config: &RelaxConfig,
    observer: &mut dyn IterationObserver,
) -> Result<RelaxOutcome> {
    profiling::scope!("solver::relax");
    let config = config.sanitized();
    let dimension = grid.dimension();
    let workers = match config.driver {
        Driver::Sequential => 1,
        _ => config.cores,
    };
    let chunks = partition(dimension, workers, config.partition)?;

    log::info!("Using {} cores ({} workers).", config.cores, chunks.len());
    log::info!("Using array of dimension {dimension}.");
    log::info!("Working to precision of {:.10}.", config.precision);
    log::info!("Driver: {:?}", config.driver);
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Working with array:\n{}", grid.display(6, true));
    }

    let run = Run {
        dimension,
        precision: config.precision,
        max_iterations: config.max_iterations,
        chunks: &chunks,
    };
    let current = grid.into_buffer();
    let finished = match config.driver {
        Driver::ForkJoin => fork_join::relax(&run, current, observer)?,
        Driver::Persistent => persistent::relax(&run, current, observer)?,
        Driver::PersistentCopyBack => copy_back::relax(&run, current, observer)?,
        Driver::Rayon => pool::relax(&run, current, observer)?,
        Driver::Sequential => sequential::relax(&run, current, observer)?,
    };

    if finished.converged {
        log::info!("Program complete. Relaxation count: {}.", finished.iterations);
    } else {
        log::warn!(
            "Stopped after {} passes without converging.",
            finished.iterations
        );
    }

    let grid = Grid::from_vec(dimension, finished.values)?;
    if log::log_enabled!(log::Level::Debug) {
        log::debug!("Final array:\n{}", grid.display(10, true));
    }
    Ok(RelaxOutcome {
        grid,
        iterations: finished.iterations,
        converged: finished.converged,
    })
}

/// Shared loop of the drivers that join their team every pass.
/// `pass` computes `next` from `current` and returns the reduced result.
fn double_buffered<F>(
    run: &Run<'_>,
    mut current: Vec<f64>,
    observer: &mut dyn IterationObserver,
    mut pass: F,
) -> Result<Finished>
where
    F: FnMut(&[f64], &mut [f64]) -> Result<bool>,
{
    let mut next = current.clone();
    let mut iterations = 0;
    loop {
        iterations += 1;
        let within_precision = pass(&current, &mut next)?;
        log::trace!("Pass {iterations}: within precision {within_precision}");
        observer.on_pass(&run.report(iterations, within_precision, &next));

        std::mem::swap(&mut current, &mut next);
        if within_precision || run.capped(iterations) {
            return Ok(Finished {
                values: current,
                iterations,
                converged: within_precision,
            });
        }
    }
}
