use std::{
    io, thread,
    time::{Duration, Instant},
};

use log::info;

use crate::{
    clock::{Clock, SystemClock},
    counter::ProgressCounter,
    hardware::{HardwareSnapshot, Sampler},
};

/// Default pace of the sampling loop.
pub const TICK: Duration = Duration::from_secs(1);

/// Whether the run is still going.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    Running,
    Terminated,
}

/// What one tick observed.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Time since the run started.
    pub elapsed: Duration,
    /// Iterations flushed into the counter since the previous tick.
    pub ops_delta: u64,
    pub snapshot: HardwareSnapshot,
}

/// Renders ticks.
pub trait Presenter {
    fn render(&mut self, tick: &Tick) -> io::Result<()>;
}

/// Drives the once-per-second sampling of the progress counter and hardware.
pub struct Monitor<S, C = SystemClock> {
    counter: ProgressCounter,
    sampler: S,
    clock: C,
    start: Instant,
    duration: Duration,
    interval: Duration,
    last: u64,
    state: State,
}

// === impl Monitor ===

impl<S: Sampler> Monitor<S> {
    /// Starts a run of `duration` on the system clock.
    pub fn new(counter: ProgressCounter, sampler: S, duration: Duration) -> Self {
        Self::with_clock(counter, sampler, SystemClock, duration)
    }
}

impl<S: Sampler, C: Clock> Monitor<S, C> {
    /// Starts a run of `duration`, taking the start time from `clock`.
    pub fn with_clock(counter: ProgressCounter, sampler: S, clock: C, duration: Duration) -> Self {
        let start = clock.now();
        Self {
            counter,
            sampler,
            clock,
            start,
            duration,
            interval: TICK,
            last: 0,
            state: State::Running,
        }
    }

    /// Overrides the wall-clock pace of [`Monitor::run_lines`].
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    /// Time since the run started, per this monitor's clock.
    pub fn elapsed(&self) -> Duration {
        self.clock.now().saturating_duration_since(self.start)
    }

    /// Samples the counter and hardware once.
    ///
    /// The run terminates on the first tick whose elapsed time reaches the
    /// configured duration; that tick is still returned so it can be rendered.
    pub fn tick(&mut self) -> Tick {
        let current = self.counter.load();
        let ops_delta = current.saturating_sub(self.last);
        self.last = current;

        let snapshot = self.sampler.sample();
        let elapsed = self.elapsed();

        if self.state == State::Running && elapsed >= self.duration {
            info!("run finished after {elapsed:?}");
            self.state = State::Terminated;
        }

        Tick {
            elapsed,
            ops_delta,
            snapshot,
        }
    }

    /// Renders one tick per interval until the run terminates.
    ///
    /// Ticks are scheduled against fixed deadlines so that the time spent
    /// sampling and rendering does not stretch the cadence.
    pub fn run_lines(&mut self, presenter: &mut impl Presenter) -> io::Result<()> {
        let mut deadline = Instant::now();

        while self.state == State::Running {
            deadline += self.interval;
            thread::sleep(deadline.saturating_duration_since(Instant::now()));

            let tick = self.tick();
            presenter.render(&tick)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::MockClock, hardware::FixedSampler};

    fn at(start: Instant, millis: u64) -> Instant {
        start + Duration::from_millis(millis)
    }

    #[test]
    fn delta_is_measured_against_the_previous_tick() {
        let t0 = Instant::now();
        let counter = ProgressCounter::new();
        let clock = MockClock::new([t0, at(t0, 1000), at(t0, 2000), at(t0, 3000)]);
        let mut monitor = Monitor::with_clock(
            counter.clone(),
            FixedSampler::default(),
            clock,
            Duration::from_secs(60),
        );

        counter.add(5_000_000);
        assert_eq!(monitor.tick().ops_delta, 5_000_000);

        counter.add(2_000_000);
        assert_eq!(monitor.tick().ops_delta, 2_000_000);

        assert_eq!(monitor.tick().ops_delta, 0);
    }

    #[test]
    fn tick_carries_elapsed_and_snapshot() {
        let t0 = Instant::now();
        let snapshot = HardwareSnapshot {
            temperature_c: 48.0,
            ..Default::default()
        };
        let clock = MockClock::new([t0, at(t0, 1004)]);
        let mut monitor = Monitor::with_clock(
            ProgressCounter::new(),
            FixedSampler(snapshot.clone()),
            clock,
            Duration::from_secs(60),
        );

        let tick = monitor.tick();
        assert_eq!(tick.elapsed, Duration::from_millis(1004));
        assert_eq!(tick.snapshot, snapshot);
    }

    #[test]
    fn terminates_on_the_tick_reaching_the_duration() {
        let t0 = Instant::now();
        let clock = MockClock::new([
            t0,
            at(t0, 1001),
            at(t0, 2001),
            at(t0, 2999),
            at(t0, 3000),
        ]);
        let mut monitor = Monitor::with_clock(
            ProgressCounter::new(),
            FixedSampler::default(),
            clock,
            Duration::from_secs(3),
        );

        for _ in 0..3 {
            monitor.tick();
            assert_eq!(monitor.state(), State::Running);
        }

        let last = monitor.tick();
        assert_eq!(last.elapsed, Duration::from_secs(3));
        assert_eq!(monitor.state(), State::Terminated);
    }
}
