//! Main TUI application.
//!
//! One thread, one loop: sample the visible queues, plan and draw the frame,
//! look at a single pending input event, sleep if there was none.

use std::fmt;
use std::io;
use std::thread;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::{debug, info};

use crate::collector::{InterfaceInfo, QueueRegistry, Sampler};

use super::event::{Event, EventSource, TerminalEvents};
use super::input::{KeyAction, handle_key};
use super::plan::{QueueBar, plan_frame};
use super::render::render;
use super::state::AppState;

/// Failures of the dashboard itself (the terminal surface).
#[derive(Debug)]
pub enum AppError {
    Terminal(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Terminal(e) => write!(f, "terminal error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Terminal(e) => Some(e),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Terminal(e)
    }
}

/// Main TUI application.
pub struct App {
    registry: QueueRegistry,
    sampler: Sampler,
    state: AppState,
}

impl App {
    /// Creates a new App over an already opened registry.
    pub fn new(registry: QueueRegistry, info: &InterfaceInfo, poll_interval: Duration) -> Self {
        Self {
            registry,
            sampler: Sampler::new(),
            state: AppState::new(info, poll_interval),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Runs the dashboard on the controlling terminal until the exit key.
    ///
    /// The terminal is restored and all counter handles are released on
    /// every return path.
    pub fn run(mut self) -> Result<(), AppError> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                let _ = disable_raw_mode();
                return Err(e.into());
            }
        };

        info!(
            interface = %self.state.interface,
            queues = self.registry.len(),
            poll_ms = self.state.poll_millis() as u64,
            "dashboard started"
        );

        let result = terminal
            .hide_cursor()
            .and_then(|()| self.event_loop(&mut terminal, &mut TerminalEvents));

        // Restore terminal
        let restored = restore_terminal(&mut terminal);
        self.registry.close();
        info!(
            reads = self.sampler.reads(),
            failures = self.sampler.failures(),
            "dashboard stopped"
        );

        result?;
        restored?;
        Ok(())
    }

    /// Ticks until the exit key was seen.
    pub fn event_loop<B: Backend, E: EventSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut E,
    ) -> io::Result<()> {
        self.refresh_size(terminal)?;
        while !self.state.should_quit {
            self.tick(terminal, events)?;
        }
        Ok(())
    }

    /// One iteration of the loop.
    pub fn tick<B: Backend, E: EventSource>(
        &mut self,
        terminal: &mut Terminal<B>,
        events: &mut E,
    ) -> io::Result<()> {
        let bars = self.sample_visible();
        let commands = plan_frame(&self.state, &bars);
        terminal.draw(|frame| render(frame, &commands))?;

        match events.poll_event()? {
            Some(Event::Key(key)) => {
                if handle_key(&mut self.state, key) == KeyAction::Quit {
                    self.state.should_quit = true;
                }
            }
            Some(Event::Resize(width, height)) => {
                debug!(width, height, "terminal resized");
                terminal.autoresize()?;
                self.refresh_size(terminal)?;
            }
            None => thread::sleep(self.state.poll_interval),
        }

        self.state.viewport.recompute();
        Ok(())
    }

    /// Samples every queue in the visible range.
    fn sample_visible(&mut self) -> Vec<QueueBar> {
        let range = self.state.viewport.visible_range();
        let mut bars = Vec::with_capacity(range.len());
        for index in range {
            if let Some(queue) = self.registry.queue_mut(index) {
                let sample = self.sampler.sample(queue);
                bars.push(QueueBar { index, sample });
            }
        }
        bars
    }

    /// Re-queries the terminal size and resizes the viewport, keeping the scroll offset.
    fn refresh_size<B: Backend>(&mut self, terminal: &Terminal<B>) -> io::Result<()> {
        let size = terminal.size()?;
        self.state.viewport.resize(size.height, size.width);
        Ok(())
    }
}

fn restore_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
