use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    /// Poll interval while an animation is running
    animation_tick_rate: Duration,
}

impl EventHandler {
    /// Create a handler that polls at `animation_interval` while animating
    pub fn with_animation_interval(tick_rate_ms: u64, animation_interval: Duration) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_tick_rate: animation_interval,
        }
    }

    /// Poll for the next event at the idle tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll for the next event at the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.animation_tick_rate)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Poll timed out; doubles as a frame tick while animating
    Tick,
}
