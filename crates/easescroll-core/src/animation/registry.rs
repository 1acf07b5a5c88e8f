//! Animation registry and public entry points
//!
//! Keeps at most one animation per viewport. Starting a new animation on a
//! viewport replaces whatever was running there.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::debug;

use super::driver::AnimationDriver;
use super::state::{AnimationState, Generation, Phase};
use crate::config::AnimationConfig;
use crate::curve::TimingCurve;
use crate::frame::FrameScheduler;
use crate::geometry::Point;
use crate::viewport::{Viewport, ViewportKey};
use crate::{Error, Result};

/// Duration used by `animate_offset` unless configured otherwise
pub const DEFAULT_DURATION_SECS: f64 = 0.25;

/// Side table of live animations, keyed by viewport identity
#[derive(Default)]
pub(crate) struct Slots {
    entries: HashMap<ViewportKey, AnimationState>,
    last_generation: u64,
}

impl Slots {
    fn next_generation(&mut self) -> Generation {
        self.last_generation += 1;
        Generation(self.last_generation)
    }

    /// State for `key`, only if it is still the given generation
    pub(crate) fn current_mut(
        &mut self,
        key: ViewportKey,
        generation: Generation,
    ) -> Option<&mut AnimationState> {
        self.entries
            .get_mut(&key)
            .filter(|state| state.generation == generation)
    }

    pub(crate) fn remove(&mut self, key: ViewportKey) -> Option<AnimationState> {
        self.entries.remove(&key)
    }

    fn insert(&mut self, key: ViewportKey, state: AnimationState) -> Option<AnimationState> {
        self.entries.insert(key, state)
    }

    fn get(&self, key: ViewportKey) -> Option<&AnimationState> {
        self.entries.get(&key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Drives curve-based offset animations for any number of viewports
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct ScrollAnimator {
    slots: Rc<RefCell<Slots>>,
    scheduler: Rc<dyn FrameScheduler>,
    default_duration_secs: f64,
}

impl fmt::Debug for ScrollAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnimator")
            .field("active", &self.active_count())
            .field("default_duration_secs", &self.default_duration_secs)
            .finish()
    }
}

impl ScrollAnimator {
    /// Create an animator that requests frames from `scheduler`
    pub fn new(scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots::default())),
            scheduler,
            default_duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    /// Create an animator using the configured default duration
    pub fn with_config(scheduler: Rc<dyn FrameScheduler>, config: &AnimationConfig) -> Self {
        Self::new(scheduler).with_default_duration(config.default_duration_secs)
    }

    /// Override the duration used by `animate_offset`
    pub fn with_default_duration(mut self, secs: f64) -> Self {
        self.default_duration_secs = secs;
        self
    }

    pub fn default_duration_secs(&self) -> f64 {
        self.default_duration_secs
    }

    /// Animate `viewport` to `target` over the default duration
    pub fn animate_offset<V: Viewport + 'static>(
        &self,
        viewport: &Rc<RefCell<V>>,
        target: Point,
        curve: TimingCurve,
    ) -> Result<()> {
        self.animate_offset_with_duration(viewport, target, curve, self.default_duration_secs)
    }

    /// Animate `viewport` to `target` over `duration_secs` seconds
    ///
    /// Fails with `Error::InvalidDuration` unless the duration is positive;
    /// in that case nothing is started and any running animation continues.
    pub fn animate_offset_with_duration<V: Viewport + 'static>(
        &self,
        viewport: &Rc<RefCell<V>>,
        target: Point,
        curve: TimingCurve,
        duration_secs: f64,
    ) -> Result<()> {
        let duration = validate_duration(duration_secs)?;
        self.start(viewport, target, curve, duration);
        Ok(())
    }

    /// Register a new animation, superseding any running one
    ///
    /// The start offset is read from the viewport now; the clock starts on
    /// the first frame.
    fn start<V: Viewport + 'static>(
        &self,
        viewport: &Rc<RefCell<V>>,
        target: Point,
        curve: TimingCurve,
        duration: Duration,
    ) {
        let key = ViewportKey::of(viewport);
        let start_offset = viewport.borrow().offset();
        let owner: Weak<RefCell<V>> = Rc::downgrade(viewport);
        let owner: Weak<RefCell<dyn Viewport>> = owner;

        let (generation, superseded) = {
            let mut slots = self.slots.borrow_mut();
            let generation = slots.next_generation();
            let state = AnimationState::new(owner, start_offset, target, duration, curve, generation);
            (generation, slots.insert(key, state))
        };

        if let Some(previous) = superseded {
            debug!(
                viewport = %key,
                generation = %previous.generation,
                "Superseding running animation"
            );
            if let Some(handle) = previous.handle {
                self.scheduler.cancel(handle);
            }
        }

        let callback = AnimationDriver::new(Rc::downgrade(&self.slots), key, generation).into_callback();
        let handle = self.scheduler.request_callback(callback);
        if let Some(state) = self.slots.borrow_mut().current_mut(key, generation) {
            state.handle = Some(handle);
        }

        debug!(
            viewport = %key,
            generation = %generation,
            from = %start_offset,
            to = %target,
            curve = %curve,
            duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            "Started offset animation"
        );
    }

    /// Stop the animation registered under `key`, if any
    ///
    /// Meant for viewport teardown. Returns whether an animation was removed.
    pub fn cancel_if_present(&self, key: ViewportKey) -> bool {
        let Some(state) = self.slots.borrow_mut().remove(key) else {
            return false;
        };
        if let Some(handle) = state.handle {
            self.scheduler.cancel(handle);
        }
        debug!(viewport = %key, generation = %state.generation, "Animation cancelled");
        true
    }

    /// Stop animating `viewport`, leaving it at its current offset
    pub fn cancel<V: ?Sized>(&self, viewport: &Rc<RefCell<V>>) -> bool {
        self.cancel_if_present(ViewportKey::of(viewport))
    }

    pub fn is_animating<V: ?Sized>(&self, viewport: &Rc<RefCell<V>>) -> bool {
        self.slots.borrow().get(ViewportKey::of(viewport)).is_some()
    }

    /// Target of the running animation for `viewport`
    pub fn target_offset<V: ?Sized>(&self, viewport: &Rc<RefCell<V>>) -> Option<Point> {
        self.slots
            .borrow()
            .get(ViewportKey::of(viewport))
            .map(|state| state.target_offset)
    }

    /// Elapsed fraction (0.0 to 1.0) of the running animation as of its last frame
    pub fn progress<V: ?Sized>(&self, viewport: &Rc<RefCell<V>>) -> Option<f64> {
        self.slots
            .borrow()
            .get(ViewportKey::of(viewport))
            .map(|state| state.progress())
    }

    /// Phase of the running animation for `viewport`
    pub fn phase<V: ?Sized>(&self, viewport: &Rc<RefCell<V>>) -> Option<Phase> {
        self.slots
            .borrow()
            .get(ViewportKey::of(viewport))
            .map(|state| state.phase())
    }

    /// Number of viewports with a live animation
    pub fn active_count(&self) -> usize {
        self.slots.borrow().len()
    }
}

fn validate_duration(secs: f64) -> Result<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(Error::InvalidDuration(secs));
    }
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or(Error::InvalidDuration(secs))
}
