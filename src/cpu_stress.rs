use std::hint::black_box;
use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};

use log::trace;

use crate::counter::ProgressCounter;

/// Iterations a worker accumulates privately before adding them to the shared counter.
pub const FLUSH_EVERY: u64 = 1_000_000;

/// One-shot stop request for a single worker.
///
/// The pool keeps one clone and fires it; the worker polls its clone between iterations.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the worker to stop. Returns `false` if it was already fired.
    pub fn fire(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_fired(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Burns the current thread until `stop` fires.
///
/// Each iteration computes `v = v * v^v` on a randomly seeded float. The
/// iteration count is flushed into `counter` every [`FLUSH_EVERY`] iterations;
/// whatever is pending when the stop signal is seen is dropped.
pub fn burn(counter: &ProgressCounter, stop: &StopSignal) {
    let mut v: f64 = rand::random();
    let mut i: u64 = 0;

    while !stop.is_fired() {
        i += 1;
        // the value itself is never read, keep the optimizer from removing the work.
        v = black_box(v * v.powf(v));

        if i == FLUSH_EVERY {
            counter.add(i);
            i = 0;
        }
    }
}

/// Spawns a named burn thread.
pub fn spawn(id: usize, counter: ProgressCounter, stop: StopSignal) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("burn-{id}"))
        .spawn(move || {
            trace!("worker {id} started");
            burn(&counter, &stop);
            trace!("worker {id} stopped");
        })
}
