//! Document viewport shown by the pager

use std::cell::RefCell;
use std::rc::Rc;

use easescroll_core::{Point, Viewport};
use unicode_width::UnicodeWidthStr;

/// Scroll state of a text document inside a terminal area
///
/// Offsets are in terminal cells: x in columns, y in lines. The offset is
/// fractional while animating and rounded only when rendered.
#[derive(Debug, Clone)]
pub struct DocumentViewport {
    offset: Point,
    content_width: u16,
    content_height: u16,
    visible_width: u16,
    visible_height: u16,
}

impl DocumentViewport {
    /// Create a viewport sized to fit `lines`
    pub fn for_lines(lines: &[String]) -> Self {
        let width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        Self {
            offset: Point::ORIGIN,
            content_width: width.min(u16::MAX as usize) as u16,
            content_height: lines.len().min(u16::MAX as usize) as u16,
            visible_width: 0,
            visible_height: 0,
        }
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Update the visible area (called on every draw)
    pub fn set_visible_size(&mut self, width: u16, height: u16) {
        self.visible_width = width;
        self.visible_height = height;
    }

    pub fn visible_height(&self) -> u16 {
        self.visible_height
    }

    /// Largest offset that still fills the visible area
    pub fn max_offset(&self) -> Point {
        Point::new(
            self.content_width.saturating_sub(self.visible_width) as f64,
            self.content_height.saturating_sub(self.visible_height) as f64,
        )
    }

    /// Clamp an offset into the scrollable range
    pub fn clamp(&self, offset: Point) -> Point {
        offset.clamp(Point::ORIGIN, self.max_offset())
    }

    /// Offset rounded to whole cells as `(line, column)`
    pub fn scroll_cells(&self) -> (u16, u16) {
        let clamped = self.clamp(self.offset);
        (clamped.y.round() as u16, clamped.x.round() as u16)
    }
}

impl Viewport for DocumentViewport {
    fn offset(&self) -> Point {
        self.offset
    }

    fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }
}
