use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use tracing::info;

use easescroll_core::{
    AnimateOffsetExt, AppConfig, FrameScheduler, ManualFrameScheduler, MemoryViewport, Point,
    ScrollAnimator, TimingCurve, Viewport,
};

/// Hard stop for runaway simulations (over 27 minutes at 60fps)
const MAX_FRAMES: u32 = 100_000;

pub struct SimulateOptions {
    pub from: Point,
    pub to: Point,
    pub curve: TimingCurve,
    /// Explicit duration in seconds; the configured default when absent
    pub duration_secs: Option<f64>,
    pub fps: u32,
    /// Retarget to the given offset after this many milliseconds
    pub retarget: Option<(u64, Point)>,
}

/// One delivered frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub frame: u32,
    pub elapsed: Duration,
    pub offset: Point,
    /// Animation still registered after this frame
    pub animating: bool,
}

pub fn run(config: &AppConfig, options: &SimulateOptions) -> Result<()> {
    let records = simulate(config.animation.default_duration_secs, options)?;

    println!(
        "{} -> {} with {} at {}fps",
        options.from, options.to, options.curve, options.fps
    );
    println!("{:>6}  {:>9}  {:>24}", "frame", "ms", "offset");
    for record in &records {
        println!(
            "{:>6}  {:>9.1}  {:>24}{}",
            record.frame,
            record.elapsed.as_secs_f64() * 1000.0,
            record.offset.to_string(),
            if record.animating { "" } else { "  done" }
        );
    }

    Ok(())
}

/// Animate a memory viewport frame by frame with synthetic timestamps
pub fn simulate(default_duration_secs: f64, options: &SimulateOptions) -> Result<Vec<FrameRecord>> {
    if options.fps == 0 {
        bail!("--fps must be greater than zero");
    }
    let interval = Duration::from_secs_f64(1.0 / options.fps as f64);

    let scheduler = Rc::new(ManualFrameScheduler::new());
    let frames: Rc<dyn FrameScheduler> = scheduler.clone();
    let animator = ScrollAnimator::new(frames).with_default_duration(default_duration_secs);
    let viewport = MemoryViewport::shared(options.from);

    start(&viewport, &animator, options.to, options)?;

    let base = Instant::now();
    let mut retarget = options.retarget;
    let mut records = Vec::new();

    for frame in 0..MAX_FRAMES {
        let elapsed = interval * frame;

        if let Some((at_ms, target)) = retarget {
            if elapsed >= Duration::from_millis(at_ms) {
                info!(at = %viewport.borrow().offset(), to = %target, "Retargeting");
                start(&viewport, &animator, target, options)?;
                retarget = None;
            }
        }

        if scheduler.is_idle() {
            // Idle gap before a retarget that comes after the first animation ends
            if retarget.is_none() {
                break;
            }
            continue;
        }

        scheduler.pump(base + elapsed);
        records.push(FrameRecord {
            frame,
            elapsed,
            offset: viewport.borrow().offset(),
            animating: animator.is_animating(&viewport),
        });
    }

    Ok(records)
}

fn start(
    viewport: &Rc<RefCell<MemoryViewport>>,
    animator: &ScrollAnimator,
    target: Point,
    options: &SimulateOptions,
) -> Result<()> {
    match options.duration_secs {
        None => viewport.animate_offset(animator, target, options.curve)?,
        Some(secs) => viewport.animate_offset_with_duration(animator, target, options.curve, secs)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(to: Point) -> SimulateOptions {
        SimulateOptions {
            from: Point::ORIGIN,
            to,
            curve: TimingCurve::EASE,
            duration_secs: None,
            fps: 60,
            retarget: None,
        }
    }

    #[test]
    fn test_default_duration_run() {
        let records = simulate(0.25, &options(Point::new(0.0, 500.0))).unwrap();

        // Clock starts on the first frame
        assert_eq!(records[0].offset, Point::ORIGIN);
        let last = records.last().unwrap();
        assert_eq!(last.offset, Point::new(0.0, 500.0));
        assert!(!last.animating);
        assert!(records[..records.len() - 1].iter().all(|r| r.animating));
        assert!(last.elapsed >= Duration::from_millis(250));
        assert!(last.elapsed < Duration::from_millis(250) + Duration::from_millis(17));
    }

    #[test]
    fn test_offsets_increase_monotonically() {
        let records = simulate(0.25, &options(Point::new(0.0, 500.0))).unwrap();
        assert!(records.windows(2).all(|w| w[0].offset.y <= w[1].offset.y));
    }

    #[test]
    fn test_invalid_duration_is_reported() {
        let mut opts = options(Point::new(0.0, 500.0));
        opts.duration_secs = Some(-1.0);
        let err = simulate(0.25, &opts).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<easescroll_core::Error>(),
            Some(easescroll_core::Error::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_zero_fps_rejected() {
        let mut opts = options(Point::new(0.0, 10.0));
        opts.fps = 0;
        assert!(simulate(0.25, &opts).is_err());
    }

    #[test]
    fn test_retarget_continues_from_interrupted_offset() {
        let mut opts = options(Point::new(0.0, 500.0));
        opts.duration_secs = Some(0.5);
        opts.retarget = Some((200, Point::new(0.0, 100.0)));
        let records = simulate(0.25, &opts).unwrap();

        let last = records.last().unwrap();
        assert_eq!(last.offset, Point::new(0.0, 100.0));
        // Never reached the first target
        assert!(records.iter().all(|r| r.offset.y < 500.0));

        // No jump at the hand-over: the frame after retargeting repeats the
        // interrupted offset because the new clock starts there
        let split = records
            .iter()
            .position(|r| r.elapsed >= Duration::from_millis(200))
            .unwrap();
        assert_eq!(records[split].offset, records[split - 1].offset);
    }

    #[test]
    fn test_noop_animation_completes() {
        let records = simulate(0.25, &options(Point::ORIGIN)).unwrap();
        assert_eq!(records.last().unwrap().offset, Point::ORIGIN);
    }

    #[test]
    fn test_retarget_after_completion_still_runs() {
        let mut opts = options(Point::new(0.0, 500.0));
        opts.retarget = Some((400, Point::new(0.0, 100.0)));
        let records = simulate(0.25, &opts).unwrap();

        assert!(records.iter().any(|r| r.offset == Point::new(0.0, 500.0) && !r.animating));
        let last = records.last().unwrap();
        assert_eq!(last.offset, Point::new(0.0, 100.0));
        assert!(last.elapsed >= Duration::from_millis(400));
    }
}
