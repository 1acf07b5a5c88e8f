//! The scrollable surface an animation drives

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::geometry::Point;

/// A scrollable viewport whose offset can be read and written directly
///
/// `set_offset` must apply the offset immediately, without any animation
/// of its own. Animations hold viewports through `Weak`, so a viewport is
/// shared as `Rc<RefCell<V>>` and destroyed by dropping its last `Rc`.
pub trait Viewport {
    /// Current scroll offset
    fn offset(&self) -> Point;

    /// Jump to an offset (no animation)
    fn set_offset(&mut self, offset: Point);
}

/// Identity of a shared viewport, used as a lookup key only
///
/// Derived from the address of the viewport's shared allocation. It does not
/// keep the viewport alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportKey(usize);

impl ViewportKey {
    pub fn of<V: ?Sized>(viewport: &Rc<RefCell<V>>) -> Self {
        Self(Rc::as_ptr(viewport) as *const () as usize)
    }
}

impl fmt::Display for ViewportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// In-memory viewport that records how many times it was written
#[derive(Debug, Clone, Default)]
pub struct MemoryViewport {
    offset: Point,
    writes: usize,
}

impl MemoryViewport {
    pub fn new(offset: Point) -> Self {
        Self { offset, writes: 0 }
    }

    /// Create a viewport already wrapped for sharing with an animator
    pub fn shared(offset: Point) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(offset)))
    }

    /// Number of `set_offset` calls received
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Viewport for MemoryViewport {
    fn offset(&self) -> Point {
        self.offset
    }

    fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_follows_identity() {
        let a = MemoryViewport::shared(Point::ORIGIN);
        let b = MemoryViewport::shared(Point::ORIGIN);
        assert_eq!(ViewportKey::of(&a), ViewportKey::of(&a.clone()));
        assert_ne!(ViewportKey::of(&a), ViewportKey::of(&b));
    }

    #[test]
    fn test_key_is_stable_through_trait_object() {
        let concrete = MemoryViewport::shared(Point::ORIGIN);
        let erased: Rc<RefCell<dyn Viewport>> = concrete.clone();
        assert_eq!(ViewportKey::of(&concrete), ViewportKey::of(&erased));
    }

    #[test]
    fn test_memory_viewport_counts_writes() {
        let mut viewport = MemoryViewport::new(Point::new(1.0, 2.0));
        assert_eq!(viewport.writes(), 0);
        viewport.set_offset(Point::new(3.0, 4.0));
        assert_eq!(viewport.offset(), Point::new(3.0, 4.0));
        assert_eq!(viewport.writes(), 1);
    }
}
