use std::cell::RefCell;
use std::rc::Weak;
use std::time::Instant;

use tracing::{debug, trace};

use super::registry::Slots;
use super::state::{Generation, Sample};
use crate::frame::{FrameAction, FrameCallback};
use crate::viewport::ViewportKey;

/// Frame callback body for one registered animation
///
/// Holds only the lookup key and generation; the animation state itself
/// lives in the registry, so a superseded or cancelled animation is detected
/// by a failed lookup rather than by tearing down the callback.
pub(crate) struct AnimationDriver {
    slots: Weak<RefCell<Slots>>,
    key: ViewportKey,
    generation: Generation,
}

impl AnimationDriver {
    pub(crate) fn new(slots: Weak<RefCell<Slots>>, key: ViewportKey, generation: Generation) -> Self {
        Self {
            slots,
            key,
            generation,
        }
    }

    pub(crate) fn into_callback(self) -> FrameCallback {
        Box::new(move |now| self.on_frame(now))
    }

    fn on_frame(&self, now: Instant) -> FrameAction {
        // Animator dropped
        let Some(slots) = self.slots.upgrade() else {
            return FrameAction::Stop;
        };

        // Registry borrow ends before the viewport is written
        let (owner, sample) = {
            let mut slots = slots.borrow_mut();

            let Some(state) = slots.current_mut(self.key, self.generation) else {
                debug!(
                    viewport = %self.key,
                    generation = %self.generation,
                    "Animation superseded, releasing frame callback"
                );
                return FrameAction::Stop;
            };

            let Some(owner) = state.owner.upgrade() else {
                slots.remove(self.key);
                debug!(
                    viewport = %self.key,
                    generation = %self.generation,
                    "Viewport dropped mid-animation, aborting"
                );
                return FrameAction::Stop;
            };

            let sample = state.sample(now);
            if let Sample::Finished(_) = sample {
                slots.remove(self.key);
            }
            (owner, sample)
        };

        match sample {
            Sample::InFlight(offset) => {
                trace!(viewport = %self.key, offset = %offset, "Animation frame");
                owner.borrow_mut().set_offset(offset);
                FrameAction::Continue
            }
            Sample::Finished(target) => {
                owner.borrow_mut().set_offset(target);
                debug!(
                    viewport = %self.key,
                    generation = %self.generation,
                    target = %target,
                    "Animation completed"
                );
                FrameAction::Stop
            }
        }
    }
}
