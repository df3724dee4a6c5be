use super::*;

/// The whole interior as one chunk on the calling thread.
pub(super) fn relax(
    run: &Run<'_>,
    current: Vec<f64>,
    observer: &mut dyn IterationObserver,
) -> Result<Finished> {
    double_buffered(run, current, observer, |current, next| {
        profiling::scope!("sequential::pass");
        let mut within_precision = true;
        for (worker, next_chunk) in run.workers().zip(split_chunks_mut(next, run.chunks)) {
            within_precision &= worker.relax(current, next_chunk);
        }
        Ok(within_precision)
    })
}
