//! Terminal User Interface for the BQL dashboard.
//!
//! The loop in `app` samples queues, `plan` turns state into draw commands
//! without a terminal, and `render` paints them with ratatui.

mod app;
pub mod color;
mod event;
mod input;
pub mod plan;
mod render;
mod state;
mod style;
pub mod viewport;

pub use app::{App, AppError};
pub use color::{ColorTier, color_tier};
pub use event::{Event, EventSource, TerminalEvents};
pub use input::{KeyAction, handle_key};
pub use plan::{DrawCommand, QueueBar, plan_frame};
pub use state::AppState;
pub use viewport::{COLUMNS_PER_QUEUE, ViewportState};
