//! One team for the whole run, results copied back every pass.
//!
//! Each pass goes through three barriers:
//! A after computing into NEXT, everyone then reads the flag,
//! B after copying NEXT back into CURRENT, the leader then resets the flag,
//! C so nobody reports a violation before that reset.

use super::shared::*;
use super::*;
use crate::coordinator::Coordinator;
use std::sync::Mutex;

const CURRENT: usize = 0;
const NEXT: usize = 1;
const FLAG: usize = 0;

pub(super) fn relax(
    run: &Run<'_>,
    current: Vec<f64>,
    observer: &mut dyn IterationObserver,
) -> Result<Finished> {
    let mut buffers = [current.clone(), current];
    let coordinator = Coordinator::new(run.chunks.len());
    let observer = Mutex::new(observer);

    let (iterations, converged) = {
        let [current, next] = &mut buffers;
        let shared = SharedBuffers::new(current, next);
        run_team(run, |worker| {
            team_loop(worker, run, &shared, &coordinator, &observer)
        })?
    };

    let [_, next] = buffers;
    Ok(Finished {
        values: next,
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
    let len = chunk.span_len();
    let mut pass = 0;
    loop {
        pass += 1;

        let within_precision = unsafe {
            worker.relax(
                shared.buffer(CURRENT),
                shared.chunk_mut(NEXT, chunk.start, len),
            )
        };
        if !within_precision {
            coordinator.report_violation(FLAG);
        }

        // A
        let leader = coordinator.wait();
        let converged = coordinator.is_converged(FLAG);
        if leader {
            profiling::scope!("copy_back::observe");
            let mut observer = observer.lock().unwrap_or_else(|e| e.into_inner());
            // Until B, NEXT is only read
            let values = unsafe { shared.buffer(NEXT) };
            observer.on_pass(&run.report(pass, converged, values));
        }
        if converged || run.capped(pass) {
            return (pass, converged);
        }

        unsafe {
            worker.copy_back(
                shared.chunk(NEXT, chunk.start, len),
                shared.chunk_mut(CURRENT, chunk.start, len),
            );
        }

        // B
        if coordinator.wait() {
            coordinator.reset(FLAG);
        }

        // C
        coordinator.wait();
    }
}
