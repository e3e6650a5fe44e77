//! Collaborator seams: everything the engine reads from or writes to the
//! outside world goes through these traits, so the engine itself never
//! touches a terminal.

use super::error::WakeLockError;

/// Vertical extent of a rectangle, in the container's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Inclusive vertical overlap test (touching edges count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.bottom() >= other.top && self.top <= other.bottom()
    }
}

/// Geometry of the scrollable container, read fresh on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// The container's own rect.
    pub rect: Rect,
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ViewportGeometry {
    pub fn max_scroll_top(&self) -> f64 {
        self.scroll_height - self.client_height
    }

    pub fn is_scrollable(&self) -> bool {
        self.max_scroll_top() > 0.0
    }
}

/// Index of a highlightable block in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub usize);

/// The scrollable container.
pub trait ScrollSurface {
    /// `None` when no container is attached (nothing loaded).
    fn geometry(&self) -> Option<ViewportGeometry>;

    fn set_scroll_offset(&mut self, offset_px: f64);
}

/// The content tree's highlightable blocks.
pub trait ContentBlocks {
    /// Bounding rects in document order, in the same coordinate space as
    /// [`ViewportGeometry::rect`].
    fn block_rects(&self) -> Vec<(BlockId, Rect)>;

    /// Add or remove the single highlight marker on `id`.  Unknown ids are
    /// ignored.
    fn set_marked(&mut self, id: BlockId, marked: bool);
}

/// Best-effort "keep the screen awake" provider.
pub trait WakeLock {
    fn acquire(&mut self) -> Result<(), WakeLockError>;

    fn release(&mut self) -> Result<(), WakeLockError>;
}
