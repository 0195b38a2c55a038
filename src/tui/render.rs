//! Paints planned draw commands onto a ratatui frame.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::plan::{DrawCommand, Paint};
use super::style::Styles;

fn style_for(paint: Paint) -> Style {
    match paint {
        Paint::Plain => Styles::default(),
        Paint::Bold => Styles::bold(),
        Paint::Label => Styles::label(),
        Paint::Tier(tier) => Styles::tier(tier),
    }
}

/// Main render function: border box, then every command in order.
pub fn render(frame: &mut Frame, commands: &[DrawCommand]) {
    let area = frame.area();
    frame.render_widget(
        Block::bordered()
            .border_style(Styles::default())
            .style(Styles::default()),
        area,
    );

    let buf = frame.buffer_mut();
    for command in commands {
        paint_command(buf, command);
    }
}

fn paint_command(buf: &mut Buffer, command: &DrawCommand) {
    match command {
        DrawCommand::Text { x, y, text, paint } => {
            let style = style_for(*paint);
            for (i, ch) in text.chars().enumerate() {
                let Ok(dx) = u16::try_from(i) else { break };
                // Cells past the right edge are silently dropped.
                if let Some(cell) = buf.cell_mut((x.saturating_add(dx), *y)) {
                    cell.set_char(ch).set_style(style);
                }
            }
        }
        DrawCommand::Glyph { x, y, glyph, paint } => {
            if let Some(cell) = buf.cell_mut((*x, *y)) {
                cell.set_symbol(glyph.symbol()).set_style(style_for(*paint));
            }
        }
    }
}
