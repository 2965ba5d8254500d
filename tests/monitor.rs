use std::io;
use std::thread;
use std::time::{Duration, Instant};

use burnmon::{
    clock::MockClock,
    hardware::FixedSampler,
    line::LinePresenter,
    HardwareSnapshot, Monitor, Presenter, ProgressCounter, State, Tick, WorkerPool,
};

fn secs(start: Instant, s: f64) -> Instant {
    start + Duration::from_secs_f64(s)
}

/// Polls `counter` until it holds still for `quiet`, returning the final value.
fn wait_until_still(counter: &ProgressCounter, quiet: Duration) -> u64 {
    let deadline = Instant::now() + Duration::from_secs(60);
    let mut last = counter.load();
    loop {
        thread::sleep(quiet);
        let now = counter.load();
        if now == last {
            return now;
        }
        assert!(Instant::now() < deadline, "counter never settled");
        last = now;
    }
}

/// Collects every tick it is given.
#[derive(Default)]
struct Recorder(Vec<Tick>);

impl Presenter for Recorder {
    fn render(&mut self, tick: &Tick) -> io::Result<()> {
        self.0.push(tick.clone());
        Ok(())
    }
}

#[test]
fn idle_pool_reports_zero_deltas() {
    let counter = ProgressCounter::new();
    let pool = WorkerPool::new(counter.clone(), 0);
    let t0 = Instant::now();
    let clock = MockClock::new([t0, secs(t0, 1.0), secs(t0, 2.0), secs(t0, 3.0)]);
    let mut monitor = Monitor::with_clock(
        counter,
        FixedSampler::default(),
        clock,
        Duration::from_secs(10),
    );

    for _ in 0..3 {
        assert_eq!(monitor.tick().ops_delta, 0);
    }
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn shrinking_to_zero_workers_stops_the_deltas() {
    let counter = ProgressCounter::new();
    let pool = WorkerPool::new(counter.clone(), 3);
    let mut monitor = Monitor::new(
        counter.clone(),
        FixedSampler::default(),
        Duration::from_secs(3600),
    );

    let deadline = Instant::now() + Duration::from_secs(60);
    while counter.load() == 0 {
        assert!(Instant::now() < deadline, "workers never flushed");
        thread::sleep(Duration::from_millis(5));
    }
    assert!(monitor.tick().ops_delta > 0);

    pool.resize(0);
    assert_eq!(pool.active_count(), 0);
    wait_until_still(&counter, Duration::from_millis(250));

    // absorbs anything flushed between the last tick and the shrink.
    monitor.tick();
    for _ in 0..3 {
        assert_eq!(monitor.tick().ops_delta, 0);
    }
}

#[test]
fn run_lines_stops_on_the_tick_reaching_the_duration() {
    let t0 = Instant::now();
    let clock = MockClock::new([
        t0,
        secs(t0, 1.0),
        secs(t0, 2.0),
        secs(t0, 3.0),
        secs(t0, 4.0),
    ]);
    let mut monitor = Monitor::with_clock(
        ProgressCounter::new(),
        FixedSampler::default(),
        clock,
        Duration::from_secs(3),
    )
    .interval(Duration::from_millis(1));

    let mut recorder = Recorder::default();
    monitor.run_lines(&mut recorder).unwrap();

    let elapsed: Vec<Duration> = recorder.0.iter().map(|t| t.elapsed).collect();
    assert_eq!(
        elapsed,
        [1, 2, 3].map(Duration::from_secs),
        "the final tick is rendered, nothing after it"
    );
    assert_eq!(monitor.state(), State::Terminated);
}

#[test]
fn run_lines_prints_the_line_format() {
    let counter = ProgressCounter::new();
    counter.add(12_000_000);

    let t0 = Instant::now();
    let clock = MockClock::new([t0, secs(t0, 1.2)]);
    let snapshot = HardwareSnapshot {
        cpu_freq_cur_mhz: 2400,
        cpu_freq_max_mhz: 4800,
        cpu_freq_pct: 50.0,
        temperature_c: 0.0,
        fan_rpms: vec![950],
    };
    let mut monitor = Monitor::with_clock(
        counter,
        FixedSampler(snapshot),
        clock,
        Duration::from_secs(1),
    )
    .interval(Duration::from_millis(1));

    let mut presenter = LinePresenter::new(Vec::new());
    monitor.run_lines(&mut presenter).unwrap();

    let out = String::from_utf8(presenter.into_inner()).unwrap();
    assert_eq!(out, "[1s] ops=12M/s | cpu=2400/4800MHz (50%) | fans=950RPM\n");
}

#[test]
fn presenter_failure_ends_the_run() {
    struct Broken;

    impl Presenter for Broken {
        fn render(&mut self, _: &Tick) -> io::Result<()> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
    }

    let t0 = Instant::now();
    let clock = MockClock::new([t0, secs(t0, 1.0)]);
    let mut monitor = Monitor::with_clock(
        ProgressCounter::new(),
        FixedSampler::default(),
        clock,
        Duration::from_secs(30),
    )
    .interval(Duration::from_millis(1));

    let err = monitor.run_lines(&mut Broken).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert_eq!(monitor.state(), State::Running);
}
