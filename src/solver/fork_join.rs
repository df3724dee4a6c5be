//! A fresh team of scoped OS threads per pass.
//! Joining the team orders every write to `next` before the buffer swap,
//! so no barrier is needed.

use super::*;
use std::thread;

pub(super) fn relax(
    run: &Run<'_>,
    current: Vec<f64>,
    observer: &mut dyn IterationObserver,
) -> Result<Finished> {
    double_buffered(run, current, observer, |current, next| pass(run, current, next))
}

fn pass(run: &Run<'_>, current: &[f64], next: &mut [f64]) -> Result<bool> {
    profiling::scope!("fork_join::pass");
    let next_chunks = split_chunks_mut(next, run.chunks);

    thread::scope(|s| -> Result<bool> {
        let mut handles = Vec::with_capacity(run.chunks.len());
        for (worker, next_chunk) in run.workers().zip(next_chunks) {
            // Already spawned workers are joined by the scope on early return
            let handle = thread::Builder::new()
                .name(format!("relax-worker-{}", worker.id))
                .spawn_scoped(s, move || worker.relax(current, next_chunk))
                .map_err(|source| RelaxError::Spawn {
                    worker: worker.id,
                    source,
                })?;
            handles.push(handle);
        }

        // Join everyone before looking at results
        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
        let mut within_precision = true;
        for (id, result) in joined.into_iter().enumerate() {
            within_precision &= result.map_err(|_| RelaxError::WorkerPanicked { worker: id })?;
        }
        Ok(within_precision)
    })
}
