use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;
use std::time::{Duration, Instant};

use crate::curve::TimingCurve;
use crate::geometry::Point;
use crate::interpolate::lerp_point;
use crate::viewport::Viewport;

/// Token distinguishing successive animations on the same viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Generation(pub(crate) u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a registered animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Registered, waiting for its first frame
    Pending,
    /// Clock started on the first frame
    Running { started_at: Instant },
}

/// Result of advancing an animation to a frame timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Sample {
    InFlight(Point),
    /// Elapsed time reached the duration; carries the exact target
    Finished(Point),
}

/// One in-flight offset animation
pub(crate) struct AnimationState {
    pub(crate) owner: Weak<RefCell<dyn Viewport>>,
    pub(crate) start_offset: Point,
    pub(crate) target_offset: Point,
    pub(crate) duration: Duration,
    pub(crate) curve: TimingCurve,
    pub(crate) generation: Generation,
    /// Scheduler subscription driving this animation
    pub(crate) handle: Option<crate::frame::CallbackHandle>,
    phase: Phase,
    last_fraction: f64,
}

impl AnimationState {
    pub(crate) fn new(
        owner: Weak<RefCell<dyn Viewport>>,
        start_offset: Point,
        target_offset: Point,
        duration: Duration,
        curve: TimingCurve,
        generation: Generation,
    ) -> Self {
        Self {
            owner,
            start_offset,
            target_offset,
            duration,
            curve,
            generation,
            handle: None,
            phase: Phase::Pending,
            last_fraction: 0.0,
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    /// Elapsed fraction as of the last frame
    pub(crate) fn progress(&self) -> f64 {
        self.last_fraction
    }

    /// Advance to `now` and compute the offset for this frame
    ///
    /// The first call starts the clock, so time spent waiting for the first
    /// frame does not count against the duration.
    pub(crate) fn sample(&mut self, now: Instant) -> Sample {
        let started_at = match self.phase {
            Phase::Pending => {
                self.phase = Phase::Running { started_at: now };
                now
            }
            Phase::Running { started_at } => started_at,
        };

        let elapsed = now.saturating_duration_since(started_at);
        if elapsed >= self.duration {
            self.last_fraction = 1.0;
            return Sample::Finished(self.target_offset);
        }

        let fraction = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0);
        self.last_fraction = fraction;
        let eased = self.curve.evaluate(fraction);
        Sample::InFlight(lerp_point(self.start_offset, self.target_offset, eased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::MemoryViewport;
    use std::rc::Rc;

    fn state(duration_ms: u64, curve: TimingCurve) -> (Rc<RefCell<MemoryViewport>>, AnimationState) {
        let viewport = MemoryViewport::shared(Point::ORIGIN);
        let owner: Weak<RefCell<MemoryViewport>> = Rc::downgrade(&viewport);
        let owner: Weak<RefCell<dyn Viewport>> = owner;
        let state = AnimationState::new(
            owner,
            Point::ORIGIN,
            Point::new(0.0, 100.0),
            Duration::from_millis(duration_ms),
            curve,
            Generation(1),
        );
        (viewport, state)
    }

    #[test]
    fn test_clock_starts_on_first_sample() {
        let (_viewport, mut state) = state(100, TimingCurve::LINEAR);
        assert_eq!(state.phase(), Phase::Pending);

        let first = Instant::now() + Duration::from_secs(5);
        assert_eq!(state.sample(first), Sample::InFlight(Point::ORIGIN));
        assert_eq!(state.phase(), Phase::Running { started_at: first });
    }

    #[test]
    fn test_linear_midpoint() {
        let (_viewport, mut state) = state(100, TimingCurve::LINEAR);
        let base = Instant::now();
        state.sample(base);

        match state.sample(base + Duration::from_millis(50)) {
            Sample::InFlight(p) => assert!((p.y - 50.0).abs() < 1e-3, "y={}", p.y),
            other => panic!("unexpected {:?}", other),
        }
        assert!((state.progress() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_finishes_on_exact_target() {
        let (_viewport, mut state) = state(100, TimingCurve::EASE);
        let base = Instant::now();
        state.sample(base);

        assert_eq!(
            state.sample(base + Duration::from_millis(100)),
            Sample::Finished(Point::new(0.0, 100.0))
        );
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn test_time_going_backwards_holds_start() {
        let (_viewport, mut state) = state(100, TimingCurve::LINEAR);
        let base = Instant::now() + Duration::from_secs(1);
        state.sample(base);
        assert_eq!(
            state.sample(base - Duration::from_millis(10)),
            Sample::InFlight(Point::ORIGIN)
        );
    }
}
