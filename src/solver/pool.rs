//! Fork-join onto a rayon pool.
//! Same per pass structure as `fork_join`, but the threads are reused
//! and scheduling is left to rayon's work stealing.

use super::*;
use crate::worker::relax_chunk;
use rayon::prelude::*;

pub(super) fn relax(
    run: &Run<'_>,
    current: Vec<f64>,
    observer: &mut dyn IterationObserver,
) -> Result<Finished> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(run.chunks.len())
        .thread_name(|i| format!("relax-rayon-{i}"))
        .build()?;

    double_buffered(run, current, observer, |current, next| {
        Ok(pool.install(|| pass(run, current, next)))
    })
}

fn pass(run: &Run<'_>, current: &[f64], next: &mut [f64]) -> bool {
    profiling::scope!("pool::pass");
    split_chunks_mut(next, run.chunks)
        .into_par_iter()
        .zip(run.chunks.par_iter())
        .map(|(next_chunk, chunk)| {
            profiling::scope!("pool::pass Thread Callback");
            relax_chunk(current, next_chunk, chunk, run.dimension, run.precision)
        })
        .reduce(|| true, |a, b| a && b)
}
