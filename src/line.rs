use std::io::{self, Write};
use std::time::Duration;

use crate::hardware::HardwareSnapshot;
use crate::monitor::{Presenter, Tick};

/// Burn iterations per reported "M" unit.
pub const OPS_UNIT: u64 = 1_000_000;

/// Prints one status line per tick.
pub struct LinePresenter<W> {
    out: W,
}

impl<W: Write> LinePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for LinePresenter<W> {
    fn render(&mut self, tick: &Tick) -> io::Result<()> {
        let line = format_line(tick.elapsed, tick.ops_delta, &tick.snapshot);
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

/// Formats `[<elapsed>] ops=<N>M/s | cpu=... | temp=... | fans=...`.
///
/// Metrics that are not available are left out together with their separator.
pub fn format_line(elapsed: Duration, ops_delta: u64, snapshot: &HardwareSnapshot) -> String {
    let mut line = format!(
        "[{}] ops={}M/s",
        format_elapsed(elapsed),
        ops_delta / OPS_UNIT
    );
    for segment in hardware_segments(snapshot) {
        line.push_str(" | ");
        line.push_str(&segment);
    }
    line
}

fn hardware_segments(snapshot: &HardwareSnapshot) -> Vec<String> {
    let mut segments = Vec::with_capacity(3);

    if snapshot.has_frequency() {
        segments.push(format!(
            "cpu={}/{}MHz ({:.0}%)",
            snapshot.cpu_freq_cur_mhz, snapshot.cpu_freq_max_mhz, snapshot.cpu_freq_pct
        ));
    }
    if snapshot.has_temperature() {
        segments.push(format!("temp={:.1}C", snapshot.temperature_c));
    }
    if snapshot.has_fans() {
        segments.push(format!("fans={}RPM", join_rpms(&snapshot.fan_rpms)));
    }

    segments
}

/// Joins fan speeds with commas.
pub fn join_rpms(rpms: &[u64]) -> String {
    rpms.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Rounds to whole seconds and prints like `45s`, `1m5s` or `1h0m0s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = (elapsed.as_millis() + 500) / 1000;
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
