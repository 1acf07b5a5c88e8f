use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub struct DocumentWidget;

impl DocumentWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let border_style = if app.is_animating() {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.border)
        };

        let block = Block::default()
            .title(format!(" {} ", app.title))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg0));

        let inner = block.inner(area);
        let (line, column) = {
            let mut viewport = app.viewport.borrow_mut();
            viewport.set_visible_size(inner.width, inner.height);
            viewport.scroll_cells()
        };

        // Only hand the visible slice to the paragraph
        let first = line as usize;
        let last = (first + inner.height as usize).min(app.lines.len());
        let lines: Vec<Line> = app.lines[first.min(last)..last]
            .iter()
            .enumerate()
            .map(|(i, text)| {
                if first + i == 0 {
                    Line::styled(
                        text.as_str(),
                        Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::styled(text.as_str(), Style::default().fg(theme.fg0))
                }
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(block).scroll((0, column));
        frame.render_widget(paragraph, area);
    }
}
