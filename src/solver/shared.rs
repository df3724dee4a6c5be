//! State shared by the long lived team drivers.

use super::*;
use crate::coordinator::StartGate;
use std::marker::PhantomData;
use std::thread;
use sync_ptr::SyncMutPtr;

/// Two equally sized grids shared by a persistent team.
///
/// Access is only sound under the team's phase discipline:
/// between two barriers a buffer is either read by everyone
/// or written by its chunk owners, never both,
/// and no two workers' mutable chunks overlap.
pub struct SharedBuffers<'a> {
    ptrs: [SyncMutPtr<f64>; 2],
    len: usize,
    _buffers: PhantomData<&'a mut [f64]>,
}

impl<'a> SharedBuffers<'a> {
    pub fn new(first: &'a mut [f64], second: &'a mut [f64]) -> Self {
        debug_assert_eq!(first.len(), second.len());
        let len = first.len();
        let ptrs = unsafe {
            [
                SyncMutPtr::new(first.as_mut_ptr()),
                SyncMutPtr::new(second.as_mut_ptr()),
            ]
        };
        SharedBuffers {
            ptrs,
            len,
            _buffers: PhantomData,
        }
    }

    /// # Safety
    /// Nobody may write to buffer `which` while the slice is alive.
    pub unsafe fn buffer(&self, which: usize) -> &[f64] {
        std::slice::from_raw_parts(self.ptrs[which].inner(), self.len)
    }

    /// # Safety
    /// Nobody may write to the chunk range of buffer `which`
    /// while the slice is alive.
    pub unsafe fn chunk(&self, which: usize, start: usize, len: usize) -> &[f64] {
        debug_assert!(start + len <= self.len);
        std::slice::from_raw_parts(self.ptrs[which].inner().add(start), len)
    }

    /// # Safety
    /// The caller must be the only one touching the chunk range
    /// of buffer `which` while the slice is alive.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn chunk_mut(&self, which: usize, start: usize, len: usize) -> &mut [f64] {
        debug_assert!(start + len <= self.len);
        std::slice::from_raw_parts_mut(self.ptrs[which].inner().add(start), len)
    }
}

/// Spawn one long lived thread per chunk running `body`,
/// and join the whole team.
/// `body` returns `(iterations, converged)`,
/// every member must reach the same answer.
/// A member that panics mid run leaves its teammates waiting at the barrier,
/// so `body` must not panic.
pub(super) fn run_team<F>(run: &Run<'_>, body: F) -> Result<(usize, bool)>
where
    F: Fn(Worker) -> (usize, bool) + Sync,
{
    let gate = StartGate::default();
    thread::scope(|s| -> Result<(usize, bool)> {
        let body = &body;
        let gate = &gate;
        let mut handles = Vec::with_capacity(run.chunks.len());
        for worker in run.workers() {
            let spawned = thread::Builder::new()
                .name(format!("relax-worker-{}", worker.id))
                .spawn_scoped(s, move || gate.wait().then(|| body(worker)));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    log::error!("Failed to spawn worker {}: {source}", worker.id);
                    gate.abort();
                    return Err(RelaxError::Spawn {
                        worker: worker.id,
                        source,
                    });
                }
            }
        }
        log::debug!("Team of {} workers started", handles.len());
        gate.open();

        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
        let mut answer = None;
        for (id, result) in joined.into_iter().enumerate() {
            let result = result
                .map_err(|_| RelaxError::WorkerPanicked { worker: id })?
                .ok_or(RelaxError::WorkerPanicked { worker: id })?;
            debug_assert!(answer.is_none() || answer == Some(result));
            answer.get_or_insert(result);
        }
        answer.ok_or(RelaxError::WorkerPanicked { worker: 0 })
    })
}
