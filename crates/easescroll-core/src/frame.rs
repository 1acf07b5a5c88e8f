//! Frame scheduling contract and a host-pumped implementation

use std::cell::RefCell;
use std::collections::HashSet;
use std::time::Instant;

/// What a frame callback wants after running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Call again on the next frame
    Continue,
    /// Release the subscription
    Stop,
}

/// Per-frame callback; receives the frame timestamp
pub type FrameCallback = Box<dyn FnMut(Instant) -> FrameAction>;

/// Subscription handle returned by `FrameScheduler::request_callback`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u64);

/// Source of display-synchronised frame callbacks
///
/// A callback is delivered once per frame until it returns
/// `FrameAction::Stop` or its handle is cancelled. Callbacks requested while
/// a frame is being delivered first run on the following frame.
pub trait FrameScheduler {
    fn request_callback(&self, callback: FrameCallback) -> CallbackHandle;

    /// Cancel a subscription. Unknown or already released handles are ignored.
    fn cancel(&self, handle: CallbackHandle);
}

#[derive(Default)]
struct SchedulerState {
    next_id: u64,
    callbacks: Vec<(CallbackHandle, FrameCallback)>,
    /// Handles cancelled while their callbacks were checked out by `pump`
    cancelled: HashSet<CallbackHandle>,
    pumping: bool,
}

/// Frame scheduler driven by the host's own loop
///
/// The host calls `pump` once per frame with the frame timestamp.
#[derive(Default)]
pub struct ManualFrameScheduler {
    state: RefCell<SchedulerState>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver one frame to every live subscription
    ///
    /// Returns the number of callbacks that ran.
    pub fn pump(&self, now: Instant) -> usize {
        let due = {
            let mut state = self.state.borrow_mut();
            state.pumping = true;
            std::mem::take(&mut state.callbacks)
        };

        let mut kept = Vec::with_capacity(due.len());
        let mut ran = 0;

        for (handle, mut callback) in due {
            if self.state.borrow().cancelled.contains(&handle) {
                continue;
            }
            ran += 1;
            if callback(now) == FrameAction::Continue {
                kept.push((handle, callback));
            }
        }

        let mut state = self.state.borrow_mut();
        state.pumping = false;
        let cancelled = std::mem::take(&mut state.cancelled);
        kept.retain(|(handle, _)| !cancelled.contains(handle));
        // Subscriptions added during this frame go after the surviving ones
        kept.append(&mut state.callbacks);
        state.callbacks = kept;

        ran
    }

    /// Number of live subscriptions
    pub fn pending(&self) -> usize {
        self.state.borrow().callbacks.len()
    }

    /// True when no subscription is waiting for a frame
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn request_callback(&self, callback: FrameCallback) -> CallbackHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = CallbackHandle(state.next_id);
        state.callbacks.push((handle, callback));
        handle
    }

    fn cancel(&self, handle: CallbackHandle) {
        let mut state = self.state.borrow_mut();
        state.callbacks.retain(|(h, _)| *h != handle);
        if state.pumping {
            state.cancelled.insert(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_callback_runs_until_stop() {
        let scheduler = ManualFrameScheduler::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        scheduler.request_callback(Box::new(move |_| {
            seen.set(seen.get() + 1);
            if seen.get() < 3 {
                FrameAction::Continue
            } else {
                FrameAction::Stop
            }
        }));

        let now = Instant::now();
        for _ in 0..5 {
            scheduler.pump(now);
        }
        assert_eq!(count.get(), 3);
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_cancel_releases_subscription() {
        let scheduler = ManualFrameScheduler::new();
        let handle = scheduler.request_callback(Box::new(|_| FrameAction::Continue));
        assert_eq!(scheduler.pending(), 1);
        scheduler.cancel(handle);
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.pump(Instant::now()), 0);
        // Cancelling twice is harmless
        scheduler.cancel(handle);
    }

    #[test]
    fn test_callback_requested_during_pump_runs_next_frame() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let inner_runs = Rc::new(Cell::new(0));

        let sched = scheduler.clone();
        let runs = inner_runs.clone();
        scheduler.request_callback(Box::new(move |_| {
            let runs = runs.clone();
            sched.request_callback(Box::new(move |_| {
                runs.set(runs.get() + 1);
                FrameAction::Stop
            }));
            FrameAction::Stop
        }));

        let now = Instant::now();
        assert_eq!(scheduler.pump(now), 1);
        assert_eq!(inner_runs.get(), 0);
        assert_eq!(scheduler.pump(now), 1);
        assert_eq!(inner_runs.get(), 1);
    }

    #[test]
    fn test_cancel_during_pump_skips_checked_out_callback() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let victim_runs = Rc::new(Cell::new(0));

        let runs = victim_runs.clone();
        let victim = Rc::new(Cell::new(None));
        let victim_slot = victim.clone();
        let sched = scheduler.clone();

        // First callback cancels the second before it gets to run
        scheduler.request_callback(Box::new(move |_| {
            if let Some(handle) = victim_slot.get() {
                sched.cancel(handle);
            }
            FrameAction::Continue
        }));
        let handle = scheduler.request_callback(Box::new(move |_| {
            runs.set(runs.get() + 1);
            FrameAction::Continue
        }));
        victim.set(Some(handle));

        let now = Instant::now();
        assert_eq!(scheduler.pump(now), 1);
        assert_eq!(victim_runs.get(), 0);
        assert_eq!(scheduler.pending(), 1);
    }
}
