//! Best-effort hardware telemetry.
//!
//! Values that cannot be read are left at zero (or empty); the caller only ever
//! asks whether a metric is present, never why it is missing.

use std::fs;
use std::path::{Path, PathBuf};

use log::trace;
use sysinfo::System;

/// One reading of cpu frequency, temperature and fan speeds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HardwareSnapshot {
    /// Current frequency of cpu0 in MHz.
    pub cpu_freq_cur_mhz: u64,
    /// Scaling maximum of cpu0 in MHz.
    pub cpu_freq_max_mhz: u64,
    /// Current frequency as a percentage of the maximum.
    pub cpu_freq_pct: f64,
    /// Cpu temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Speed of every spinning fan, in RPM.
    pub fan_rpms: Vec<u64>,
}

impl HardwareSnapshot {
    pub fn has_frequency(&self) -> bool {
        self.cpu_freq_max_mhz > 0
    }

    pub fn has_temperature(&self) -> bool {
        self.temperature_c > 0.0
    }

    pub fn has_fans(&self) -> bool {
        !self.fan_rpms.is_empty()
    }

    pub fn average_fan_rpm(&self) -> Option<f64> {
        if !self.has_fans() {
            return None;
        }
        let total: u64 = self.fan_rpms.iter().sum();
        Some(total as f64 / self.fan_rpms.len() as f64)
    }
}

/// A source of hardware snapshots.
pub trait Sampler {
    /// Takes a fresh reading. Never fails; unreadable metrics are zero.
    fn sample(&mut self) -> HardwareSnapshot;
}

/// Reads telemetry from the Linux sysfs tree.
#[derive(Clone, Debug)]
pub struct SysfsSampler {
    root: PathBuf,
}

/// Always returns the same snapshot.
#[derive(Clone, Debug, Default)]
pub struct FixedSampler(pub HardwareSnapshot);

/// Static description of the host cpu, used for the startup banner.
#[derive(Clone, Debug)]
pub struct CpuInfo {
    pub brand: String,
    pub logical_cores: usize,
}

// === impl SysfsSampler ===

impl Default for SysfsSampler {
    fn default() -> Self {
        Self::with_root("/")
    }
}

impl Sampler for SysfsSampler {
    fn sample(&mut self) -> HardwareSnapshot {
        let (cpu_freq_cur_mhz, cpu_freq_max_mhz, cpu_freq_pct) = self.frequency();
        HardwareSnapshot {
            cpu_freq_cur_mhz,
            cpu_freq_max_mhz,
            cpu_freq_pct,
            temperature_c: self.temperature(),
            fan_rpms: self.fans(),
        }
    }
}

impl SysfsSampler {
    const CUR_FREQ: &'static str = "sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq";
    const MAX_FREQ: &'static str = "sys/devices/system/cpu/cpu0/cpufreq/scaling_max_freq";
    const TEMP_PATTERNS: [&'static str; 2] = [
        "sys/class/thermal/thermal_zone*/temp",
        "sys/class/hwmon/hwmon*/temp*_input",
    ];
    const FAN_PATTERN: &'static str = "sys/class/hwmon/hwmon*/fan*_input";

    /// Reads sysfs below `root` instead of `/`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns cur MHz, max MHz and percentage, all zero if either file is unreadable.
    fn frequency(&self) -> (u64, u64, f64) {
        let cur = read_int(&self.root.join(Self::CUR_FREQ));
        let max = read_int(&self.root.join(Self::MAX_FREQ));

        let (Some(cur_khz), Some(max_khz)) = (cur, max) else {
            return (0, 0, 0.0);
        };
        let (cur_khz, max_khz) = (cur_khz.max(0) as u64, max_khz.max(0) as u64);

        let pct = if max_khz > 0 {
            cur_khz as f64 / max_khz as f64 * 100.0
        } else {
            0.0
        };
        (cur_khz / 1000, max_khz / 1000, pct)
    }

    /// First readable cpu sensor, in millidegrees on disk.
    fn temperature(&self) -> f64 {
        for pattern in Self::TEMP_PATTERNS {
            for path in self.glob(pattern) {
                if !is_cpu_sensor(&path) {
                    continue;
                }
                if let Some(millis) = read_int(&path) {
                    return millis as f64 / 1000.0;
                }
            }
        }
        0.0
    }

    fn fans(&self) -> Vec<u64> {
        self.glob(Self::FAN_PATTERN)
            .iter()
            .filter_map(|path| read_int(path))
            .filter(|rpm| *rpm > 0)
            .map(|rpm| rpm as u64)
            .collect()
    }

    fn glob(&self, pattern: &str) -> Vec<PathBuf> {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{}/{pattern}", root.trim_end_matches('/'));

        match glob::glob(&full) {
            Ok(paths) => paths.filter_map(Result::ok).collect(),
            Err(e) => {
                trace!("bad sensor pattern {full}: {e}");
                Vec::new()
            }
        }
    }
}

/// A sensor without a label is assumed to be a cpu sensor.
fn is_cpu_sensor(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let label_path = path.with_file_name(format!("{}_label", name.trim_end_matches("_input")));

    match fs::read_to_string(&label_path) {
        Ok(label) => {
            let label = label.trim().to_lowercase();
            label.is_empty() || ["core", "cpu", "package"].iter().any(|k| label.contains(k))
        }
        Err(_) => true,
    }
}

fn read_int(path: &Path) -> Option<i64> {
    let raw = fs::read_to_string(path)
        .map_err(|e| trace!("cannot read {}: {e}", path.display()))
        .ok()?;
    raw.trim()
        .parse()
        .map_err(|e| trace!("cannot parse {}: {e}", path.display()))
        .ok()
}

// === impl FixedSampler ===

impl Sampler for FixedSampler {
    fn sample(&mut self) -> HardwareSnapshot {
        self.0.clone()
    }
}

// === impl CpuInfo ===

impl CpuInfo {
    /// Queries the cpu model and logical core count.
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_all();

        let brand = sys
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_owned())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "unknown".to_owned());

        Self {
            brand,
            logical_cores: num_cpus::get(),
        }
    }
}
