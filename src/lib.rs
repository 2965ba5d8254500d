//! Burns cpu cores with floating-point work while sampling frequency,
//! temperature and fan speeds once per second.
//!
//! A [`WorkerPool`] runs one burn thread per worker, all feeding a shared
//! [`ProgressCounter`]. A [`Monitor`] reads the counter and the hardware on a
//! fixed 1 Hz cadence and hands each [`Tick`] to a presenter: plain lines, or
//! the interactive display in [`tui`], which can also resize the pool.

pub mod clock;
pub mod config;
pub mod control;
pub mod counter;
pub mod cpu_stress;
pub mod error;
pub mod hardware;
pub mod line;
pub mod monitor;
pub mod thread_manager;
pub mod tui;

pub use self::{
    counter::ProgressCounter,
    error::Error,
    hardware::{HardwareSnapshot, Sampler, SysfsSampler},
    monitor::{Monitor, Presenter, State, Tick},
    thread_manager::WorkerPool,
};
