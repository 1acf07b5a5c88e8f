use std::cell::RefCell;
use std::rc::Rc;

use super::registry::ScrollAnimator;
use crate::curve::TimingCurve;
use crate::geometry::Point;
use crate::viewport::Viewport;
use crate::Result;

/// Entry points as methods on a shared viewport
///
/// ```ignore
/// viewport.animate_offset(&animator, Point::new(0.0, 500.0), TimingCurve::EASE)?;
/// ```
pub trait AnimateOffsetExt {
    /// Animate to `target` over the animator's default duration (0.25 s unless configured)
    fn animate_offset(&self, animator: &ScrollAnimator, target: Point, curve: TimingCurve) -> Result<()>;

    /// Animate to `target` over `duration_secs` seconds
    fn animate_offset_with_duration(
        &self,
        animator: &ScrollAnimator,
        target: Point,
        curve: TimingCurve,
        duration_secs: f64,
    ) -> Result<()>;
}

impl<V: Viewport + 'static> AnimateOffsetExt for Rc<RefCell<V>> {
    #[inline]
    fn animate_offset(&self, animator: &ScrollAnimator, target: Point, curve: TimingCurve) -> Result<()> {
        animator.animate_offset(self, target, curve)
    }

    #[inline]
    fn animate_offset_with_duration(
        &self,
        animator: &ScrollAnimator,
        target: Point,
        curve: TimingCurve,
        duration_secs: f64,
    ) -> Result<()> {
        animator.animate_offset_with_duration(self, target, curve, duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualFrameScheduler;
    use crate::viewport::MemoryViewport;
    use crate::Error;
    use std::time::{Duration, Instant};

    #[test]
    fn test_extension_funnels_into_animator() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let animator = ScrollAnimator::new(scheduler.clone());
        let viewport = MemoryViewport::shared(Point::ORIGIN);

        viewport
            .animate_offset(&animator, Point::new(0.0, 120.0), TimingCurve::EASE_OUT)
            .unwrap();
        assert!(animator.is_animating(&viewport));

        let base = Instant::now();
        scheduler.pump(base);
        scheduler.pump(base + Duration::from_millis(250));
        assert_eq!(viewport.borrow().offset(), Point::new(0.0, 120.0));
    }

    #[test]
    fn test_extension_rejects_bad_duration() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let animator = ScrollAnimator::new(scheduler);
        let viewport = MemoryViewport::shared(Point::ORIGIN);

        let result = viewport.animate_offset_with_duration(&animator, Point::new(1.0, 1.0), TimingCurve::EASE, -1.0);
        assert!(matches!(result, Err(Error::InvalidDuration(_))));
        assert_eq!(viewport.borrow().writes(), 0);
    }
}
