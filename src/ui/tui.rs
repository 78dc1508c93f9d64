// src/ui/tui.rs
//! Terminal setup and the refresh loop.

use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{self, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, AppOptions};
use crate::config::REFRESH_RATE_HZ;

/// Paces draw and tick to a fixed refresh rate, independent of how many
/// input events arrive in between.
#[derive(Debug, Clone, Copy)]
pub struct RefreshClock {
    interval: Duration,
    /// Start of the last refresh, `None` before the first one
    last: Option<Instant>,
}

impl RefreshClock {
    pub fn new(rate_hz: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / rate_hz.max(1),
            last: None,
        }
    }

    /// Returns true and starts a new period when a refresh is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// How long input polling may block before the next refresh is due.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self
                .interval
                .saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

/// Run `body`, then `restore` whether or not `body` failed. The body's
/// error wins over a restore error.
fn run_restoring<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    Ok(())
}

/// Run the waterfall until the user quits.
///
/// Each refresh draws the current region first and only then ticks the
/// pipeline, so the row computed in one refresh is shown in the next.
pub fn run(options: AppOptions) -> Result<()> {
    let mut app = App::new(options)?;

    enable_raw_mode()?;
    run_restoring(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;
            terminal.clear()?;
            event_loop(&mut terminal, &mut app)
        },
        restore_terminal,
    )
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut clock = RefreshClock::new(REFRESH_RATE_HZ);

    loop {
        if clock.take_due(Instant::now()) {
            terminal.draw(|f| app.draw(f))?;
            app.tick();
        }

        if event::poll(clock.poll_timeout(Instant::now()))? {
            if let CEvent::Key(key) = event::read()? {
                if app.on_key(key) {
                    return Ok(());
                }
            }
        }
    }
}
