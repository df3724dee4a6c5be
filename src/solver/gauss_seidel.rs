//! In place Gauss-Seidel sweep on a single buffer.
//!
//! Each update sees the already updated neighbours above and to the left,
//! so this is a different iterative method from the Jacobi drivers
//! and usually needs fewer passes. Always sequential.

use crate::config::{RelaxConfig, MIN_DIMENSION};
use crate::error::*;
use crate::grid::Grid;
use super::{IterationObserver, NoopObserver, PassReport, RelaxOutcome};

/// Pass limit used when the config sets no cap.
pub const DEFAULT_GUARD: usize = 200_000;

pub fn relax(grid: Grid, config: &RelaxConfig) -> Result<RelaxOutcome> {
    relax_observed(grid, config, &mut NoopObserver)
}

pub fn relax_observed(
    mut grid: Grid,
    config: &RelaxConfig,
    observer: &mut dyn IterationObserver,
) -> Result<RelaxOutcome> {
    profiling::scope!("gauss_seidel::relax");
    let config = config.sanitized();
    let dimension = grid.dimension();
    if dimension < MIN_DIMENSION {
        return Err(RelaxError::DimensionTooSmall { dimension });
    }
    let guard = config.max_iterations.unwrap_or(DEFAULT_GUARD);
    log::info!("Using array of dimension {dimension}.");
    log::info!("Working to precision of {:.10}.", config.precision);

    let mut iterations = 0;
    let mut within_precision = false;
    while !within_precision && iterations < guard {
        iterations += 1;
        within_precision = sweep(grid.buffer_mut(), dimension, config.precision);
        log::trace!("Pass {iterations}: within precision {within_precision}");
        observer.on_pass(&PassReport {
            iteration: iterations,
            within_precision,
            dimension,
            values: grid.buffer(),
        });
    }

    if within_precision {
        log::info!("Program complete. Relaxation count: {iterations}.");
    } else {
        log::warn!("Stopped after {iterations} passes without converging.");
    }
    Ok(RelaxOutcome {
        grid,
        iterations,
        converged: within_precision,
    })
}

/// One row major sweep, returns whether every cell stayed within precision.
pub fn sweep(values: &mut [f64], dimension: usize, precision: f64) -> bool {
    profiling::scope!("gauss_seidel::sweep");
    let mut within_precision = true;
    for row in 1..dimension - 1 {
        for col in 1..dimension - 1 {
            let i = row * dimension + col;
            let old = values[i];
            let value = (values[i - dimension]
                + values[i + dimension]
                + values[i - 1]
                + values[i + 1])
                / 4.0;
            values[i] = value;
            if (old - value).abs() > precision {
                within_precision = false;
            }
        }
    }
    within_precision
}
