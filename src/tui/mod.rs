//! The interactive display: live charts plus keyboard control of the pool.

use std::io;
use std::time::Instant;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{
    control::{self, Command, Flow},
    error::Error,
    hardware::Sampler,
    monitor::{Monitor, State},
    thread_manager::WorkerPool,
};

use self::dashboard::Dashboard;

mod dashboard;
mod widgets;

/// Raw mode and the alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the interactive display until the monitor terminates or the user quits.
///
/// # Errors
/// Returns an error if the terminal cannot be set up, read or drawn.
pub fn run<S: Sampler>(monitor: &mut Monitor<S>, pool: &WorkerPool) -> Result<(), Error> {
    let _guard = TerminalGuard::enter()?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut view = Dashboard::new(monitor.duration());
    let interval = monitor.tick_interval();
    let mut next_tick = Instant::now() + interval;

    loop {
        if Instant::now() >= next_tick {
            next_tick += interval;
            view.record(&monitor.tick());
            if monitor.state() == State::Terminated {
                break;
            }
        } else {
            view.elapsed = monitor.elapsed();
        }

        terminal.draw(|f| widgets::draw(f, &view, pool.active_count()))?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        if !event::poll(timeout)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let Some(command) = Command::from_key(&key) else {
            continue;
        };

        debug!("key command {command:?}");
        if control::apply(pool, command) == Flow::Quit {
            info!("interactive display closed by user");
            break;
        }
    }

    terminal.show_cursor()?;
    Ok(())
}
