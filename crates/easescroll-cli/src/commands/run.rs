use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tracing::info;

use easescroll_core::AppConfig;
use easescroll_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, Action},
    keymap::Keymap,
    load_theme,
    widgets::{CurvePlotWidget, DocumentWidget, StatusBarWidget},
};

/// Narrowest terminal that still gets the curve panel
const MIN_WIDTH_FOR_PLOT: u16 = 72;
const PLOT_WIDTH: u16 = 34;

pub fn run(config: AppConfig, file: Option<PathBuf>) -> Result<()> {
    let (title, lines) = match &file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let title = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            (title, text.lines().map(|l| l.replace('\t', "    ")).collect())
        }
        None => ("easescroll".to_string(), App::sample_document()),
    };

    let keymap = Keymap::from_config(&config.keymap);
    let event_handler =
        EventHandler::with_animation_interval(config.ui.tick_rate_ms, config.animation.frame_interval());
    let theme = load_theme(&config.ui.theme);
    let mut app = App::new(config, theme, title, lines);

    info!(lines = app.lines.len(), "Opening pager");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("easescroll"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app, &keymap, &event_handler);

    // Restore terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    keymap: &Keymap,
    event_handler: &EventHandler,
) -> Result<()> {
    loop {
        // One frame for running animations
        let animating = app.update_scroll_animation();

        terminal.draw(|frame| {
            let size = frame.area();

            let main_layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            if app.config.ui.show_curve && size.width >= MIN_WIDTH_FOR_PLOT {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(20), Constraint::Length(PLOT_WIDTH)])
                    .split(main_layout[0]);
                DocumentWidget::render(frame, columns[0], app);
                CurvePlotWidget::render(frame, columns[1], app);
            } else {
                DocumentWidget::render(frame, main_layout[0], app);
            }
            StatusBarWidget::render(frame, main_layout[1], app);
        })?;

        // Poll at the frame rate while animating so frames keep coming
        let event = if animating {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };

        if let Some(AppEvent::Key(key)) = event {
            let action = handle_key_event(key, app, keymap);
            handle_action(app, action);
        }
        // Resize is picked up by the next draw; Tick only paces the loop

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_action(app: &mut App, action: Action) {
    if action == Action::None {
        return;
    }
    app.pending_g = action == Action::PendingG;
    app.status_message = None;

    match action {
        Action::Quit => app.should_quit = true,
        Action::ScrollDown => app.scroll_by(0.0, 1.0),
        Action::ScrollUp => app.scroll_by(0.0, -1.0),
        Action::ScrollLeft => app.scroll_by(-1.0, 0.0),
        Action::ScrollRight => app.scroll_by(1.0, 0.0),
        Action::ScrollHalfPageDown => app.scroll_half_page_down(),
        Action::ScrollHalfPageUp => app.scroll_half_page_up(),
        Action::ScrollPageDown => app.scroll_page_down(),
        Action::ScrollPageUp => app.scroll_page_up(),
        Action::JumpToTop => app.jump_to_top(),
        Action::JumpToBottom => app.jump_to_bottom(),
        Action::NextCurve => app.next_curve(),
        Action::PrevCurve => app.prev_curve(),
        Action::Faster => app.faster(),
        Action::Slower => app.slower(),
        Action::Cancel => app.cancel_animation(),
        Action::PendingG | Action::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easescroll_core::Viewport;
    use std::time::{Duration, Instant};

    fn app() -> App {
        let app = App::new(
            AppConfig::default(),
            Default::default(),
            "test".to_string(),
            App::sample_document(),
        );
        app.viewport.borrow_mut().set_visible_size(60, 20);
        app
    }

    #[test]
    fn test_pending_g_is_cleared_by_next_action() {
        let mut app = app();
        handle_action(&mut app, Action::PendingG);
        assert!(app.pending_g);
        handle_action(&mut app, Action::ScrollDown);
        assert!(!app.pending_g);
        assert!(app.is_animating());
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        handle_action(&mut app, Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_scroll_actions_reach_viewport() {
        let mut app = app();
        handle_action(&mut app, Action::ScrollPageDown);
        handle_action(&mut app, Action::ScrollRight);

        let mut now = Instant::now();
        while app.update_scroll_animation_at(now) {
            now += Duration::from_millis(16);
        }
        assert_eq!(app.viewport.borrow().offset(), easescroll_core::Point::new(1.0, 20.0));
    }
}
