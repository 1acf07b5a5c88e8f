use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use easescroll_core::animation::Phase;
use easescroll_core::{
    AnimateOffsetExt, AppConfig, FrameScheduler, ManualFrameScheduler, Point, ScrollAnimator,
    TimingCurve, Viewport,
};
use tracing::{debug, warn};

use crate::theme::Theme;
use crate::viewport::DocumentViewport;

/// Shortest and longest durations reachable with the faster/slower keys
const MIN_DURATION_SECS: f64 = 0.05;
const MAX_DURATION_SECS: f64 = 5.0;
const DURATION_STEP: f64 = 1.5;

/// Spring-like curve whose output overshoots 1.0
const OVERSHOOT: TimingCurve = TimingCurve::new(0.34, 1.56, 0.64, 1.0);

/// Pager state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    /// Shown in the document border
    pub title: String,
    pub lines: Vec<String>,
    pub viewport: Rc<RefCell<DocumentViewport>>,
    scheduler: Rc<ManualFrameScheduler>,
    pub animator: ScrollAnimator,
    /// Curves reachable with the next/prev curve keys
    pub curves: Vec<(String, TimingCurve)>,
    pub curve_index: usize,
    /// Duration used for the next animation, in seconds
    pub duration_secs: f64,
    pub status_message: Option<String>,
    pub should_quit: bool,
    /// First 'g' of "gg" was pressed
    pub pending_g: bool,
}

impl App {
    pub fn new(config: AppConfig, theme: Theme, title: String, lines: Vec<String>) -> Self {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let frames: Rc<dyn FrameScheduler> = scheduler.clone();
        let animator = ScrollAnimator::with_config(frames, &config.animation);
        let viewport = DocumentViewport::for_lines(&lines).shared();

        let (curves, curve_index) = curve_choices(config.animation.curve);
        let duration_secs = config.animation.default_duration_secs;

        Self {
            config,
            theme,
            title,
            lines,
            viewport,
            scheduler,
            animator,
            curves,
            curve_index,
            duration_secs,
            status_message: None,
            should_quit: false,
            pending_g: false,
        }
    }

    /// Built-in document shown when no file is given
    pub fn sample_document() -> Vec<String> {
        let mut lines = vec![
            "easescroll".to_string(),
            String::new(),
            "Every scroll key animates the offset along the selected timing curve.".to_string(),
            "Press a key again mid-flight to retarget; the new animation starts where".to_string(),
            "the old one was interrupted.".to_string(),
            String::new(),
            "  j/k h/l    scroll by one line or column".to_string(),
            "  C-d/C-u    half page".to_string(),
            "  C-f/C-b    full page".to_string(),
            "  gg/G       top and bottom".to_string(),
            "  [ / ]      previous / next curve".to_string(),
            "  - / +      shorter / longer duration".to_string(),
            "  Esc        stop where it is".to_string(),
            "  q          quit".to_string(),
            String::new(),
        ];
        for i in 1..=200 {
            let ruler = "-".repeat(i % 40 + 10);
            lines.push(format!("{:>4} {} {}", i, ruler, "lorem ipsum dolor sit amet ".repeat(i % 7)));
        }
        lines
    }

    pub fn curve(&self) -> TimingCurve {
        self.curves[self.curve_index].1
    }

    pub fn curve_name(&self) -> &str {
        &self.curves[self.curve_index].0
    }

    /// Deliver one frame to running animations
    ///
    /// Returns true while an animation is still in flight.
    pub fn update_scroll_animation(&mut self) -> bool {
        self.update_scroll_animation_at(Instant::now())
    }

    pub fn update_scroll_animation_at(&mut self, now: Instant) -> bool {
        if !self.scheduler.is_idle() {
            self.scheduler.pump(now);
        }
        self.is_animating()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating(&self.viewport)
    }

    /// Offset the document is heading to: the running target, or where it is now
    pub fn destination(&self) -> Point {
        self.animator
            .target_offset(&self.viewport)
            .unwrap_or_else(|| self.viewport.borrow().offset())
    }

    /// Label for the status bar
    pub fn animation_state(&self) -> &'static str {
        match self.animator.phase(&self.viewport) {
            None => "idle",
            Some(Phase::Pending) => "pending",
            Some(Phase::Running { .. }) => "running",
        }
    }

    /// Animate toward `target`, clamped to the scrollable range
    pub fn scroll_to(&mut self, target: Point) {
        let target = self.viewport.borrow().clamp(target);
        if target == self.destination() {
            return;
        }

        let curve = self.curve();
        let started = if self.duration_secs == self.animator.default_duration_secs() {
            self.viewport.animate_offset(&self.animator, target, curve)
        } else {
            self.viewport
                .animate_offset_with_duration(&self.animator, target, curve, self.duration_secs)
        };
        match started {
            Ok(()) => debug!(to = %target, curve = %curve, "Scroll requested"),
            Err(e) => {
                warn!("Failed to start scroll animation: {}", e);
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    /// Scroll relative to the current destination, so repeated presses accumulate
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let target = self.destination().translate(dx, dy);
        self.scroll_to(target);
    }

    pub fn scroll_half_page_down(&mut self) {
        let step = self.half_page();
        self.scroll_by(0.0, step);
    }

    pub fn scroll_half_page_up(&mut self) {
        let step = self.half_page();
        self.scroll_by(0.0, -step);
    }

    pub fn scroll_page_down(&mut self) {
        let step = self.page();
        self.scroll_by(0.0, step);
    }

    pub fn scroll_page_up(&mut self) {
        let step = self.page();
        self.scroll_by(0.0, -step);
    }

    pub fn jump_to_top(&mut self) {
        let x = self.destination().x;
        self.scroll_to(Point::new(x, 0.0));
    }

    pub fn jump_to_bottom(&mut self) {
        let x = self.destination().x;
        let bottom = self.viewport.borrow().max_offset().y;
        self.scroll_to(Point::new(x, bottom));
    }

    pub fn next_curve(&mut self) {
        self.curve_index = (self.curve_index + 1) % self.curves.len();
        self.status_message = Some(format!("Curve: {}", self.curve_name()));
    }

    pub fn prev_curve(&mut self) {
        self.curve_index = (self.curve_index + self.curves.len() - 1) % self.curves.len();
        self.status_message = Some(format!("Curve: {}", self.curve_name()));
    }

    pub fn faster(&mut self) {
        self.set_duration(self.duration_secs / DURATION_STEP);
    }

    pub fn slower(&mut self) {
        self.set_duration(self.duration_secs * DURATION_STEP);
    }

    fn set_duration(&mut self, secs: f64) {
        self.duration_secs = secs.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
        self.status_message = Some(format!("Duration: {:.0}ms", self.duration_secs * 1000.0));
    }

    /// Stop the running animation, leaving the document where it is
    pub fn cancel_animation(&mut self) {
        if self.animator.cancel(&self.viewport) {
            self.status_message = Some("Animation cancelled".to_string());
        }
    }

    fn half_page(&self) -> f64 {
        (self.viewport.borrow().visible_height() / 2).max(1) as f64
    }

    fn page(&self) -> f64 {
        self.viewport.borrow().visible_height().max(1) as f64
    }
}

/// Preset curves plus the configured one (if custom) and an overshooting curve
fn curve_choices(configured: TimingCurve) -> (Vec<(String, TimingCurve)>, usize) {
    let mut curves: Vec<(String, TimingCurve)> = TimingCurve::PRESETS
        .iter()
        .map(|(name, curve)| (name.to_string(), *curve))
        .collect();

    if configured != OVERSHOOT && !curves.iter().any(|(_, c)| *c == configured) {
        curves.push(("custom".to_string(), configured));
    }
    curves.push(("overshoot".to_string(), OVERSHOOT));

    let index = curves
        .iter()
        .position(|(_, c)| *c == configured)
        .unwrap_or(0);
    (curves, index)
}
