use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Shared tally of burn iterations.
///
/// Every worker holds a clone and adds its batched iteration count; the monitor
/// loop reads it once per tick. The value only ever grows.
#[derive(Clone, Debug, Default)]
pub struct ProgressCounter(Arc<AtomicU64>);

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flushed batch of iterations.
    pub fn add(&self, iterations: u64) {
        self.0.fetch_add(iterations, Ordering::Relaxed);
    }

    /// Reads the current total.
    pub fn load(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
