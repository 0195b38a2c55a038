//! Horizontal viewport over the queue histogram.
//!
//! Each queue takes a fixed column group. When all groups do not fit in the
//! terminal, one group is given up for the scroll hint and the window
//! `[visible_start, visible_end)` slides by whole groups.

use std::ops::Range;

/// Width of one queue's column group.
pub const COLUMNS_PER_QUEUE: usize = 3;
/// Rows between the bottom of the screen and the base of the bars.
pub const QUEUE_VAL_Y: usize = 4;
/// Column offset of the first bar.
pub const QUEUE_VAL_X: usize = 3;
/// Rows between the bottom of the screen and the separator line.
pub const QUEUE_SEP_Y: usize = 3;
/// Column offset of the separator line and queue labels.
pub const QUEUE_SEP_X: usize = 2;
/// Rows between the bottom of the screen and the queue labels.
pub const QUEUE_NUM_Y: usize = 2;
/// Rows between the limit marker and the scroll hint above it.
pub const QUEUE_ARROW_Y: usize = 4;

/// Visible window over `queue_count` queues for a `cols × rows` terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportState {
    /// Horizontal scroll, in terminal columns (always a multiple of [`COLUMNS_PER_QUEUE`]).
    scroll_offset: usize,
    visible_start: usize,
    visible_end: usize,
    /// Length of the separator line under the bars.
    h_line: usize,
    queue_count: usize,
    rows: u16,
    cols: u16,
}

impl ViewportState {
    pub fn new(queue_count: usize, rows: u16, cols: u16) -> Self {
        let mut state = Self {
            scroll_offset: 0,
            visible_start: 0,
            visible_end: 0,
            h_line: 0,
            queue_count,
            rows,
            cols,
        };
        state.recompute();
        state
    }

    /// Derives the visible range and separator length from scroll offset, width and queue count.
    pub fn recompute(&mut self) {
        let cols = self.cols as usize;
        let needed = self.queue_count * COLUMNS_PER_QUEUE;

        let visible_count = if needed > cols {
            self.h_line = cols.saturating_sub(2 * QUEUE_SEP_Y);
            // One group is reserved for the scroll hint.
            (cols / COLUMNS_PER_QUEUE).saturating_sub(1)
        } else {
            self.h_line = needed.saturating_sub(1);
            self.queue_count
        };

        self.visible_start = (self.scroll_offset / COLUMNS_PER_QUEUE).min(self.queue_count);
        self.visible_end = (self.visible_start + visible_count).min(self.queue_count);
    }

    /// Scrolls one group to the left. Returns `false` (and changes nothing) at the left edge.
    pub fn scroll_left(&mut self) -> bool {
        if self.scroll_offset < COLUMNS_PER_QUEUE {
            return false;
        }
        self.scroll_offset -= COLUMNS_PER_QUEUE;
        self.recompute();
        true
    }

    /// Scrolls one group to the right. Returns `false` (and changes nothing) once the last queue is visible.
    pub fn scroll_right(&mut self) -> bool {
        if self.visible_end >= self.queue_count {
            return false;
        }
        self.scroll_offset += COLUMNS_PER_QUEUE;
        self.recompute();
        true
    }

    /// Applies new terminal dimensions, keeping the scroll offset.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
        self.recompute();
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.visible_start..self.visible_end
    }

    pub fn visible_start(&self) -> usize {
        self.visible_start
    }

    pub fn visible_end(&self) -> usize {
        self.visible_end
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn h_line(&self) -> usize {
        self.h_line
    }

    pub fn queue_count(&self) -> usize {
        self.queue_count
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Queues exist left of the window.
    pub fn has_more_left(&self) -> bool {
        self.visible_start > 0
    }

    /// Queues exist right of the window.
    pub fn has_more_right(&self) -> bool {
        self.visible_end < self.queue_count
    }
}
