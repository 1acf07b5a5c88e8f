pub mod animation;
pub mod config;
pub mod curve;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod interpolate;
pub mod viewport;

pub use animation::{AnimateOffsetExt, ScrollAnimator, DEFAULT_DURATION_SECS};
pub use config::{AnimationConfig, AppConfig};
pub use curve::TimingCurve;
pub use error::{Error, Result};
pub use frame::{CallbackHandle, FrameAction, FrameCallback, FrameScheduler, ManualFrameScheduler};
pub use geometry::Point;
pub use viewport::{MemoryViewport, Viewport, ViewportKey};
