//! Frame planning: decides what goes where without touching a terminal.
//!
//! The planner turns the app state and this tick's samples into a flat list
//! of [`DrawCommand`]s in screen coordinates. Anything that would land
//! outside the screen is dropped here; `render` only paints.

use crate::collector::Sample;

use super::color::{ColorTier, color_tier};
use super::state::AppState;
use super::viewport::{
    COLUMNS_PER_QUEUE, QUEUE_ARROW_Y, QUEUE_NUM_Y, QUEUE_SEP_X, QUEUE_SEP_Y, QUEUE_VAL_X,
    QUEUE_VAL_Y, ViewportState,
};

/// Version shown in the header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Column of the left header block.
const PARAMS_X: i64 = 3;
/// First row of both header blocks.
const PARAMS_Y: i64 = 2;

/// Single-cell symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// One unit of in-flight data.
    Bar,
    /// The queue's configured limit.
    LimitMarker,
    HLine,
    LeftArrow,
    RightArrow,
}

impl Glyph {
    pub fn symbol(self) -> &'static str {
        match self {
            Glyph::Bar => "▒",
            Glyph::LimitMarker => "█",
            Glyph::HLine => "─",
            Glyph::LeftArrow => "←",
            Glyph::RightArrow => "→",
        }
    }
}

/// How a command is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Plain,
    Bold,
    /// Queue number label.
    Label,
    Tier(ColorTier),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Text {
        x: u16,
        y: u16,
        text: String,
        paint: Paint,
    },
    Glyph {
        x: u16,
        y: u16,
        glyph: Glyph,
        paint: Paint,
    },
}

/// One visible queue and its fresh sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueBar {
    pub index: usize,
    pub sample: Sample,
}

/// Collects commands, dropping those that start off screen.
struct Canvas {
    rows: i64,
    cols: i64,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    fn new(viewport: &ViewportState) -> Self {
        Self {
            rows: i64::from(viewport.rows()),
            cols: i64::from(viewport.cols()),
            commands: Vec::new(),
        }
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        (0..self.cols).contains(&x) && (0..self.rows).contains(&y)
    }

    fn text(&mut self, x: i64, y: i64, text: impl Into<String>, paint: Paint) {
        if self.contains(x, y) {
            self.commands.push(DrawCommand::Text {
                x: x as u16,
                y: y as u16,
                text: text.into(),
                paint,
            });
        }
    }

    fn glyph(&mut self, x: i64, y: i64, glyph: Glyph, paint: Paint) {
        if self.contains(x, y) {
            self.commands.push(DrawCommand::Glyph {
                x: x as u16,
                y: y as u16,
                glyph,
                paint,
            });
        }
    }
}

/// Plans a full frame: header, separator and every bar in `bars`.
///
/// `bars` should cover the viewport's visible range; queues outside it are
/// still placed by index and clipped like anything else.
pub fn plan_frame(state: &AppState, bars: &[QueueBar]) -> Vec<DrawCommand> {
    let mut canvas = Canvas::new(&state.viewport);
    plan_header(state, &mut canvas);
    plan_separator(&state.viewport, &mut canvas);
    for bar in bars {
        plan_queue(&state.viewport, bar, &mut canvas);
    }
    canvas.commands
}

fn plan_header(state: &AppState, canvas: &mut Canvas) {
    let mut y = PARAMS_Y;
    let label = "Interface: ";
    canvas.text(PARAMS_X, y, label, Paint::Plain);
    canvas.text(PARAMS_X + label.len() as i64, y, state.interface.as_str(), Paint::Bold);

    y += 1;
    let label = "Frequency: ";
    canvas.text(PARAMS_X, y, label, Paint::Plain);
    canvas.text(
        PARAMS_X + label.len() as i64,
        y,
        format!("{} (msecs)", state.poll_millis()),
        Paint::Bold,
    );

    if let Some(driver) = &state.driver {
        y += 1;
        let label = "Driver: ";
        canvas.text(PARAMS_X, y, label, Paint::Plain);
        canvas.text(PARAMS_X + label.len() as i64, y, driver.to_string(), Paint::Bold);
    }

    let version_label = "Version: ";
    let version_x = canvas.cols
        - version_label.len() as i64
        - VERSION.len() as i64
        - COLUMNS_PER_QUEUE as i64;
    let mut y = PARAMS_Y;
    canvas.text(version_x, y, "BQLmon", Paint::Bold);
    y += 1;
    canvas.text(version_x, y, version_label, Paint::Plain);
    canvas.text(version_x + version_label.len() as i64, y, VERSION, Paint::Bold);
    y += 1;
    canvas.text(version_x, y, "F1 to exit", Paint::Bold);
}

fn plan_separator(viewport: &ViewportState, canvas: &mut Canvas) {
    let y = canvas.rows - QUEUE_SEP_Y as i64;
    for i in 0..viewport.h_line() as i64 {
        canvas.glyph(i + QUEUE_SEP_X as i64, y, Glyph::HLine, Paint::Plain);
    }
}

fn plan_queue(viewport: &ViewportState, bar: &QueueBar, canvas: &mut Canvas) {
    let q = bar.index as i64;
    let offset = viewport.scroll_offset() as i64;
    let spacing = COLUMNS_PER_QUEUE as i64;
    let base = canvas.rows - QUEUE_VAL_Y as i64;
    let x = q * spacing + QUEUE_VAL_X as i64 - offset;
    let Sample { inflight, limit } = bar.sample;

    canvas.text(
        q * spacing + QUEUE_SEP_X as i64 - offset,
        canvas.rows - QUEUE_NUM_Y as i64,
        format!("{:02}", bar.index),
        Paint::Label,
    );

    // Segments above the top row can never be seen.
    let drawable = inflight.min(base.max(0) as u64 + 1);
    for i in 0..drawable {
        let tier = color_tier(i, limit);
        canvas.glyph(x, base - i as i64, Glyph::Bar, Paint::Tier(tier));
    }

    let limit_y = base.saturating_sub(i64::try_from(limit).unwrap_or(i64::MAX));
    canvas.glyph(x, limit_y, Glyph::LimitMarker, Paint::Plain);

    let arrow_y = limit_y.saturating_sub(QUEUE_ARROW_Y as i64);
    if bar.index == viewport.visible_start() && viewport.has_more_left() {
        canvas.glyph(x, arrow_y, Glyph::LeftArrow, Paint::Plain);
        canvas.glyph(x + 1, arrow_y, Glyph::HLine, Paint::Plain);
        canvas.glyph(x + 2, arrow_y, Glyph::HLine, Paint::Plain);
    }
    if bar.index + 1 == viewport.visible_end() && viewport.has_more_right() {
        canvas.glyph(x - 2, arrow_y, Glyph::HLine, Paint::Plain);
        canvas.glyph(x - 1, arrow_y, Glyph::HLine, Paint::Plain);
        canvas.glyph(x, arrow_y, Glyph::RightArrow, Paint::Plain);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::collector::{DriverInfo, InterfaceInfo};

    fn state(queue_count: usize, rows: u16, cols: u16) -> AppState {
        let info = InterfaceInfo {
            name: "eth0".to_string(),
            queue_count,
            driver: None,
        };
        let mut state = AppState::new(&info, Duration::from_millis(10));
        state.viewport.resize(rows, cols);
        state
    }

    fn bars(state: &AppState, inflight: u64, limit: u64) -> Vec<QueueBar> {
        state
            .viewport
            .visible_range()
            .map(|index| QueueBar {
                index,
                sample: Sample { inflight, limit },
            })
            .collect()
    }

    fn glyphs(commands: &[DrawCommand], wanted: Glyph) -> Vec<(u16, u16, Paint)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Glyph { x, y, glyph, paint } if *glyph == wanted => {
                    Some((*x, *y, *paint))
                }
                _ => None,
            })
            .collect()
    }

    fn texts(commands: &[DrawCommand]) -> Vec<(u16, u16, &str)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_header() {
        let mut st = state(4, 30, 80);
        st.driver = Some(DriverInfo {
            name: "ixgbe".to_string(),
            version: None,
        });
        let commands = plan_frame(&st, &[]);
        let texts = texts(&commands);
        assert!(texts.contains(&(3, 2, "Interface: ")));
        assert!(texts.contains(&(14, 2, "eth0")));
        assert!(texts.contains(&(14, 3, "10 (msecs)")));
        assert!(texts.contains(&(11, 4, "ixgbe")));

        let version_x = (80 - 9 - VERSION.len() - 3) as u16;
        assert!(texts.contains(&(version_x, 2, "BQLmon")));
        assert!(texts.contains(&(version_x, 4, "F1 to exit")));
    }

    #[test]
    fn test_all_queues_fit_without_hints() {
        let st = state(4, 30, 20);
        assert_eq!(st.viewport.visible_range(), 0..4);
        let commands = plan_frame(&st, &bars(&st, 2, 5));

        let labels: Vec<_> = texts(&commands)
            .into_iter()
            .filter(|(_, y, _)| *y == 28)
            .collect();
        assert_eq!(
            labels,
            vec![(2, 28, "00"), (5, 28, "01"), (8, 28, "02"), (11, 28, "03")]
        );
        assert!(glyphs(&commands, Glyph::LeftArrow).is_empty());
        assert!(glyphs(&commands, Glyph::RightArrow).is_empty());
        // Separator: 4 * 3 - 1 cells starting at column 2.
        let line: Vec<_> = glyphs(&commands, Glyph::HLine);
        assert_eq!(line.len(), 11);
        assert!(line.iter().all(|(_, y, _)| *y == 27));
        assert_eq!(line[0].0, 2);
    }

    #[test]
    fn test_bar_segments_are_tiered() {
        let st = state(1, 60, 20);
        let commands = plan_frame(
            &st,
            &[QueueBar {
                index: 0,
                sample: Sample {
                    inflight: 35,
                    limit: 30,
                },
            }],
        );

        let segments = glyphs(&commands, Glyph::Bar);
        assert_eq!(segments.len(), 35);
        // Bottom segment sits at rows - 4, in column 3.
        assert_eq!(segments[0], (3, 56, Paint::Tier(ColorTier::Low)));
        assert_eq!(segments[10].2, Paint::Tier(ColorTier::Mid));
        assert_eq!(segments[21].2, Paint::Tier(ColorTier::High));
        assert_eq!(segments[30].2, Paint::Tier(ColorTier::High));
        assert_eq!(segments[31].2, Paint::Tier(ColorTier::Overflow));
        assert_eq!(segments[34], (3, 22, Paint::Tier(ColorTier::Overflow)));

        let marker = glyphs(&commands, Glyph::LimitMarker);
        assert_eq!(marker, vec![(3, 26, Paint::Plain)]);
    }

    #[test]
    fn test_limit_marker_drawn_when_idle() {
        let st = state(1, 40, 20);
        let commands = plan_frame(&st, &bars(&st, 0, 10));
        assert!(glyphs(&commands, Glyph::Bar).is_empty());
        assert_eq!(glyphs(&commands, Glyph::LimitMarker), vec![(3, 26, Paint::Plain)]);
    }

    #[test]
    fn test_tall_bars_are_clipped() {
        let st = state(1, 20, 20);
        let commands = plan_frame(&st, &bars(&st, 1_000_000, 5_000_000));
        let segments = glyphs(&commands, Glyph::Bar);
        // Rows 16 down to 0.
        assert_eq!(segments.len(), 17);
        assert!(segments.iter().all(|(_, y, _)| *y <= 16));
        assert!(glyphs(&commands, Glyph::LimitMarker).is_empty());
    }

    #[test]
    fn test_scroll_hints() {
        // 16 queues, 30 columns: 9 visible.
        let mut st = state(16, 40, 30);
        st.viewport.scroll_right();
        assert_eq!(st.viewport.visible_range(), 1..10);
        let commands = plan_frame(&st, &bars(&st, 1, 10));

        // Queue 1 is the leftmost visible: x = 1 * 3 + 3 - 3 = 3; arrow row = 40 - 4 - 10 - 4.
        assert_eq!(glyphs(&commands, Glyph::LeftArrow), vec![(3, 22, Paint::Plain)]);
        // Queue 9 is the rightmost visible: x = 9 * 3 + 3 - 3 = 27.
        assert_eq!(glyphs(&commands, Glyph::RightArrow), vec![(27, 22, Paint::Plain)]);
        let hint_lines: Vec<_> = glyphs(&commands, Glyph::HLine)
            .into_iter()
            .filter(|(_, y, _)| *y == 22)
            .map(|(x, _, _)| x)
            .collect();
        assert_eq!(hint_lines, vec![4, 5, 25, 26]);
    }

    #[test]
    fn test_no_left_hint_at_origin() {
        let st = state(16, 40, 30);
        let commands = plan_frame(&st, &bars(&st, 1, 10));
        assert!(glyphs(&commands, Glyph::LeftArrow).is_empty());
        assert_eq!(glyphs(&commands, Glyph::RightArrow).len(), 1);
    }

    #[test]
    fn test_empty_terminal_plans_nothing() {
        let st = state(4, 0, 0);
        assert!(plan_frame(&st, &bars(&st, 3, 3)).is_empty());
    }
}
