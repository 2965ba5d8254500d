use std::collections::VecDeque;
use std::time::Duration;

use crate::hardware::HardwareSnapshot;
use crate::line::OPS_UNIT;
use crate::monitor::Tick;

/// Points kept per chart.
pub const HISTORY_POINTS: usize = 60;

/// A bounded series of samples; the oldest sample falls off when full.
#[derive(Clone, Debug)]
pub struct Series {
    points: VecDeque<f64>,
    capacity: usize,
}

/// Everything the interactive display shows, updated once per tick.
#[derive(Clone, Debug)]
pub struct Dashboard {
    pub duration: Duration,
    pub elapsed: Duration,
    pub ops: Series,
    pub cpu_pct: Series,
    pub temperature: Series,
    pub fan_rpm: Series,
    /// Ops of the latest tick, in millions.
    pub current_ops: u64,
    pub snapshot: HardwareSnapshot,
    max_ops: u64,
    max_fan_rpm: u64,
}

// === impl Series ===

impl Series {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `(x, y)` pairs for charting, x being the sample index.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(x, y)| (x as f64, *y))
            .collect()
    }
}

// === impl Dashboard ===

impl Dashboard {
    const OPS_FLOOR: f64 = 100.0;
    const FAN_FLOOR: f64 = 6000.0;
    const HEADROOM: f64 = 1.2;

    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            ops: Series::new(HISTORY_POINTS),
            cpu_pct: Series::new(HISTORY_POINTS),
            temperature: Series::new(HISTORY_POINTS),
            fan_rpm: Series::new(HISTORY_POINTS),
            current_ops: 0,
            snapshot: HardwareSnapshot::default(),
            max_ops: 10,
            max_fan_rpm: 1000,
        }
    }

    /// Folds one tick into the history.
    ///
    /// Hardware series only grow when the metric is present.
    pub fn record(&mut self, tick: &Tick) {
        self.elapsed = tick.elapsed;
        self.current_ops = tick.ops_delta / OPS_UNIT;
        self.max_ops = self.max_ops.max(self.current_ops);
        self.ops.push(self.current_ops as f64);

        let snapshot = &tick.snapshot;
        if let Some(&fastest) = snapshot.fan_rpms.iter().max() {
            self.max_fan_rpm = self.max_fan_rpm.max(fastest);
        }
        if snapshot.cpu_freq_pct > 0.0 {
            self.cpu_pct.push(snapshot.cpu_freq_pct);
        }
        if snapshot.has_temperature() {
            self.temperature.push(snapshot.temperature_c);
        }
        if let Some(avg) = snapshot.average_fan_rpm() {
            self.fan_rpm.push(avg);
        }

        self.snapshot = snapshot.clone();
    }

    /// Top of the ops chart: the highest rate seen plus headroom, at least 100.
    pub fn ops_upper_bound(&self) -> f64 {
        (self.max_ops as f64 * Self::HEADROOM).max(Self::OPS_FLOOR)
    }

    /// Top of the fan chart: the fastest fan seen plus headroom, at least 6000.
    pub fn fan_upper_bound(&self) -> f64 {
        (self.max_fan_rpm as f64 * Self::HEADROOM).max(Self::FAN_FLOOR)
    }
}
