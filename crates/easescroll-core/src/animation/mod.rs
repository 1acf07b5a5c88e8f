//! Curve-driven offset animation
//!
//! # Layers
//!
//! ## Atomic
//! - `crate::curve` - cubic Bézier timing curves
//! - `crate::interpolate` - offset interpolation
//!
//! ## Molecular
//! - `state` - one in-flight animation and its phase
//! - `driver` - per-frame callback that advances a state and writes the viewport
//! - `registry` - one animation slot per viewport, entry points
//! - `ext` - entry points as methods on shared viewports
//!
//! # Usage
//!
//! ```ignore
//! use std::rc::Rc;
//! use easescroll_core::{ManualFrameScheduler, MemoryViewport, Point, ScrollAnimator, TimingCurve};
//!
//! let scheduler = Rc::new(ManualFrameScheduler::new());
//! let animator = ScrollAnimator::new(scheduler.clone());
//! let viewport = MemoryViewport::shared(Point::ORIGIN);
//!
//! animator.animate_offset(&viewport, Point::new(0.0, 500.0), TimingCurve::EASE)?;
//!
//! // In the host loop, once per display frame
//! scheduler.pump(std::time::Instant::now());
//! ```

mod driver;
mod ext;
mod registry;
mod state;

pub use ext::AnimateOffsetExt;
pub use registry::{ScrollAnimator, DEFAULT_DURATION_SECS};
pub use state::Phase;
