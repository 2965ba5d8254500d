use std::cmp::Ordering as Cmp;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, error};

use crate::counter::ProgressCounter;
use crate::cpu_stress::{self, StopSignal};

/// A live worker as seen by the pool.
struct Slot {
    id: usize,
    stop: StopSignal,
}

/// Owns the burn workers and converges them to a requested count.
///
/// Slots are kept in spawn order, so shrinking stops the newest workers first.
/// The slot list always holds exactly the live workers: stopped slots are
/// removed in the same step that fires them.
pub struct WorkerPool {
    counter: ProgressCounter,
    slots: Mutex<Vec<Slot>>,
    active: AtomicUsize,
    next_id: AtomicUsize,
}

impl WorkerPool {
    /// Creates a pool and spawns `initial` workers.
    pub fn new(counter: ProgressCounter, initial: usize) -> Self {
        let pool = Self {
            counter,
            slots: Mutex::new(Vec::new()),
            active: AtomicUsize::new(0),
            next_id: AtomicUsize::new(0),
        };
        pool.resize(initial);
        pool
    }

    /// Spawns or stops workers until exactly `target` are live.
    ///
    /// Stopped workers exit at their next iteration boundary; they are not joined.
    pub fn resize(&self, target: usize) {
        let mut slots = self.lock_slots();
        let current = slots.len();

        match target.cmp(&current) {
            Cmp::Greater => self.grow(&mut slots, target - current),
            Cmp::Less => self.shrink(&mut slots, target),
            Cmp::Equal => return,
        }

        debug!("resized pool: {current} -> {} workers", slots.len());
    }

    /// Number of live workers. Wait-free.
    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// The counter every worker of this pool feeds.
    pub fn counter(&self) -> &ProgressCounter {
        &self.counter
    }

    /// Number of stop signals the pool is still holding.
    pub fn tracked_signals(&self) -> usize {
        self.lock_slots().len()
    }

    fn grow(&self, slots: &mut Vec<Slot>, n: usize) {
        for _ in 0..n {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let stop = StopSignal::new();

            match cpu_stress::spawn(id, self.counter.clone(), stop.clone()) {
                Ok(_detached) => {
                    slots.push(Slot { id, stop });
                    self.active.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => {
                    error!("failed to spawn worker {id}: {e}");
                    break;
                }
            }
        }
    }

    fn shrink(&self, slots: &mut Vec<Slot>, target: usize) {
        for Slot { id, stop } in slots.drain(target..).rev() {
            stop.fire();
            self.active.fetch_sub(1, Ordering::SeqCst);
            debug!("signalled worker {id} to stop");
        }
    }

    fn lock_slots(&self) -> MutexGuard<'_, Vec<Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let slots = self.slots.get_mut().unwrap_or_else(PoisonError::into_inner);
        for slot in slots.drain(..) {
            slot.stop.fire();
        }
        self.active.store(0, Ordering::SeqCst);
    }
}
