use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use easescroll_core::Viewport;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let offset = app.viewport.borrow().offset();
            let position = match app.animator.target_offset(&app.viewport) {
                Some(target) => format!("{} -> {}", offset, target),
                None => format!("{}", offset),
            };
            format!(
                " {} | {:.0}ms | {} | {}",
                app.curve_name(),
                app.duration_secs * 1000.0,
                position,
                app.animation_state()
            )
        };

        let help_hint = " q:quit j/k:scroll [/]:curve -/+:speed ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let state_color = if app.is_animating() { theme.green } else { theme.fg1 };

        let line = Line::from(vec![
            Span::styled(status_text, Style::default().fg(state_color).bg(theme.bg2)),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg2)),
            Span::styled(help_hint, Style::default().fg(theme.grey2).bg(theme.bg2)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
