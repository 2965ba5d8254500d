use std::{cell::RefCell, collections::VecDeque, time::Instant};

/// A source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The system's monotonic clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

/// A clock that replays a scripted sequence of instants.
///
/// Panics when asked for more instants than it was given.
#[derive(Debug, Default)]
pub struct MockClock {
    times: RefCell<VecDeque<Instant>>,
}

// === impl SystemClock ===

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// === impl MockClock ===

impl MockClock {
    pub fn new(times: impl IntoIterator<Item = Instant>) -> Self {
        Self {
            times: RefCell::new(times.into_iter().collect()),
        }
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        let Self { times } = self;

        times
            .borrow_mut()
            .pop_front()
            .expect("mock times should not be empty")
    }
}
