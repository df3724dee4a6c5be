//! One team for the whole run, buffer roles swap every pass.
//!
//! Pass `p` reads buffer `(p - 1) % 2` and writes buffer `p % 2`.
//! A single barrier per pass separates the writes of pass `p`
//! from the reads of pass `p + 1`.
//! The convergence flag of pass `p` lives in coordinator slot `p % 3`,
//! worker 0 resets the slot of pass `p + 1` while computing pass `p`.

use super::shared::*;
use super::*;
use crate::coordinator::Coordinator;
use std::sync::Mutex;

pub(super) fn relax(
    run: &Run<'_>,
    current: Vec<f64>,
    observer: &mut dyn IterationObserver,
) -> Result<Finished> {
    let mut buffers = [current.clone(), current];
    let coordinator = Coordinator::new(run.chunks.len());
    let observer = Mutex::new(observer);

    let (iterations, converged) = {
        let [first, second] = &mut buffers;
        let shared = SharedBuffers::new(first, second);
        run_team(run, |worker| {
            team_loop(worker, run, &shared, &coordinator, &observer)
        })?
    };

    let [even, odd] = buffers;
    Ok(Finished {
        values: if iterations % 2 == 0 { even } else { odd },
        iterations,
        converged,
    })
}

fn team_loop(
    worker: Worker,
    run: &Run<'_>,
    shared: &SharedBuffers<'_>,
    coordinator: &Coordinator,
    observer: &Mutex<&mut dyn IterationObserver>,
) -> (usize, bool) {
    let chunk = worker.chunk;
    let mut pass = 0;
    loop {
        pass += 1;
        let source = (pass - 1) % 2;
        let target = pass % 2;
        if worker.id == 0 {
            coordinator.reset(pass + 1);
        }

        // Pass `pass` only reads `source` and each worker writes its own chunk of `target`
        let within_precision = unsafe {
            worker.relax(
                shared.buffer(source),
                shared.chunk_mut(target, chunk.start, chunk.span_len()),
            )
        };
        if !within_precision {
            coordinator.report_violation(pass);
        }

        let leader = coordinator.wait();
        let converged = coordinator.is_converged(pass);
        if leader {
            profiling::scope!("persistent::observe");
            let mut observer = observer.lock().unwrap_or_else(|e| e.into_inner());
            // `target` is not written again before the next barrier
            let values = unsafe { shared.buffer(target) };
            observer.on_pass(&run.report(pass, converged, values));
        }

        if converged || run.capped(pass) {
            return (pass, converged);
        }
    }
}
