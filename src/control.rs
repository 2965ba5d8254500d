//! Requests from the interactive display back into the worker pool.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;

use crate::thread_manager::WorkerPool;

/// The interactive display never shrinks the pool below this.
pub const MIN_WORKERS: usize = 1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Increase,
    Decrease,
    Quit,
}

/// Whether the display should keep running after a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    /// Maps a key press to a command. Releases and repeats are ignored.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Self::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(Self::Quit),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(Self::Increase),
            KeyCode::Char('-') | KeyCode::Char('_') => Some(Self::Decrease),
            _ => None,
        }
    }
}

/// Applies `command` to `pool`.
pub fn apply(pool: &WorkerPool, command: Command) -> Flow {
    let current = pool.active_count();

    match command {
        Command::Increase => pool.resize(current + 1),
        Command::Decrease if current > MIN_WORKERS => pool.resize(current - 1),
        Command::Decrease => {}
        Command::Quit => {
            info!("quit requested with {current} workers running");
            return Flow::Quit;
        }
    }

    Flow::Continue
}
