//! Shared convergence state for a worker team.
//!
//! `ConvergenceFlag` aggregates per-worker violations into one boolean.
//! `Coordinator` bundles three flag slots with the team barrier,
//! slot `pass % 3` belongs to pass `pass`.
//! With three slots the slot for pass `p + 1` can be reset during pass `p`
//! while nobody is still reading it (its last readers finished pass `p - 2`
//! before arriving at the barrier of pass `p - 1`).
//!
//! All atomics use relaxed ordering,
//! the barrier provides the happens-before edges between passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Barrier, Condvar, Mutex};

const FLAG_SLOTS: usize = 3;

/// `true` until some worker reports a cell out of precision.
#[derive(Debug)]
pub struct ConvergenceFlag {
    within_precision: AtomicBool,
}

impl Default for ConvergenceFlag {
    fn default() -> Self {
        ConvergenceFlag {
            within_precision: AtomicBool::new(true),
        }
    }
}

impl ConvergenceFlag {
    /// Idempotent, only ever moves the flag to "not converged".
    pub fn report_violation(&self) {
        self.within_precision.store(false, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.within_precision.store(true, Ordering::Relaxed);
    }

    pub fn is_converged(&self) -> bool {
        self.within_precision.load(Ordering::Relaxed)
    }
}

pub struct Coordinator {
    flags: [ConvergenceFlag; FLAG_SLOTS],
    barrier: Barrier,
    team_size: usize,
}

impl Coordinator {
    pub fn new(team_size: usize) -> Self {
        debug_assert!(team_size > 0);
        Coordinator {
            flags: Default::default(),
            barrier: Barrier::new(team_size),
            team_size,
        }
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    pub fn flag(&self, pass: usize) -> &ConvergenceFlag {
        &self.flags[pass % FLAG_SLOTS]
    }

    pub fn report_violation(&self, pass: usize) {
        self.flag(pass).report_violation();
    }

    pub fn reset(&self, pass: usize) {
        self.flag(pass).reset();
    }

    pub fn is_converged(&self, pass: usize) -> bool {
        self.flag(pass).is_converged()
    }

    /// Block until the whole team arrives.
    /// Returns `true` for exactly one participant per generation.
    /// A participant that never arrives deadlocks the team.
    pub fn wait(&self) -> bool {
        self.barrier.wait().is_leader()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GateState {
    Closed,
    Open,
    Aborted,
}

/// Holds a freshly spawned team until every member exists.
/// If spawning fails part way, the gate is aborted
/// and the members already running leave without touching the barrier.
pub struct StartGate {
    state: Mutex<GateState>,
    changed: Condvar,
}

impl Default for StartGate {
    fn default() -> Self {
        StartGate {
            state: Mutex::new(GateState::Closed),
            changed: Condvar::new(),
        }
    }
}

impl StartGate {
    pub fn open(&self) {
        self.set(GateState::Open);
    }

    pub fn abort(&self) {
        self.set(GateState::Aborted);
    }

    fn set(&self, state: GateState) {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *guard = state;
        self.changed.notify_all();
    }

    /// Returns `true` when the team may start, `false` when it must leave.
    pub fn wait(&self) -> bool {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        while *guard == GateState::Closed {
            guard = self
                .changed
                .wait(guard)
                .unwrap_or_else(|e| e.into_inner());
        }
        *guard == GateState::Open
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn flag_test() {
        let flag = ConvergenceFlag::default();
        assert!(flag.is_converged());
        flag.report_violation();
        assert!(!flag.is_converged());
        flag.report_violation();
        assert!(!flag.is_converged());
        flag.reset();
        assert!(flag.is_converged());
    }

    #[test]
    fn slots_rotate_test() {
        let c = Coordinator::new(1);
        c.report_violation(1);
        assert!(c.is_converged(0));
        assert!(!c.is_converged(1));
        assert!(c.is_converged(2));
        assert!(!c.is_converged(4));
        c.reset(4);
        assert!(c.is_converged(1));
        assert_eq!(c.team_size(), 1);
    }

    #[test]
    fn one_leader_test() {
        let team = 4;
        let generations = 50;
        let c = Coordinator::new(team);
        let leaders = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..team {
                s.spawn(|| {
                    for _ in 0..generations {
                        if c.wait() {
                            leaders.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });
        assert_eq!(leaders.load(Ordering::Relaxed), generations);
    }

    #[test]
    fn violation_visible_after_barrier_test() {
        let team = 3;
        let c = Coordinator::new(team);
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..team)
                .map(|w| {
                    let c = &c;
                    s.spawn(move || {
                        if w == 2 {
                            c.report_violation(0);
                        }
                        c.wait();
                        c.is_converged(0)
                    })
                })
                .collect();
            for h in handles {
                assert!(!h.join().unwrap());
            }
        });
    }

    #[test]
    fn start_gate_test() {
        let gate = StartGate::default();
        std::thread::scope(|s| {
            let h = s.spawn(|| gate.wait());
            gate.open();
            assert!(h.join().unwrap());
        });

        let gate = StartGate::default();
        std::thread::scope(|s| {
            let h = s.spawn(|| gate.wait());
            gate.abort();
            assert!(!h.join().unwrap());
        });
    }
}
