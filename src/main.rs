use std::io;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use burnmon::{
    config::Args, hardware::CpuInfo, line::LinePresenter, tui, Monitor, ProgressCounter,
    SysfsSampler, WorkerPool,
};
use clap::Parser;
use log::{info, warn};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let workers = args.initial_workers();

    let cpu = CpuInfo::detect();
    info!(
        "cpu: {} ({} logical cores), duration {:?}, graph mode {}",
        cpu.brand, cpu.logical_cores, args.duration, args.graph
    );
    println!(
        "{} logical cpus available, spawning {workers} burn workers",
        cpu.logical_cores
    );

    // Give the banner a moment before the display takes over the screen.
    thread::sleep(Duration::from_millis(100));

    let counter = ProgressCounter::new();
    let mut monitor = Monitor::new(counter.clone(), SysfsSampler::default(), args.duration);
    let pool = WorkerPool::new(counter, workers);

    if args.graph {
        tui::run(&mut monitor, &pool)?;
    } else {
        let mut presenter = LinePresenter::new(io::stdout().lock());
        if let Err(e) = monitor.run_lines(&mut presenter) {
            warn!("stopped printing: {e}");
        }
    }

    info!("exiting with {} workers still running", pool.active_count());
    Ok(())
}
