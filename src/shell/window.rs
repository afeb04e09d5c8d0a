use crate::foundation::core::{FrameSize, Point, Rect};

/// Placement surface of the on-screen pet window.
///
/// Real window layers (chrome, transparency, painting) live outside this crate; the engine only
/// needs to read and move the window inside the usable screen area.
pub trait PetWindow {
    /// Top-left corner in screen coordinates.
    fn position(&self) -> Point;

    /// Move the top-left corner.
    fn set_position(&mut self, position: Point);

    /// Current window extent.
    fn size(&self) -> FrameSize;

    /// Resize the window, e.g. after a frame or scale change.
    fn set_size(&mut self, size: FrameSize);

    /// Usable screen area (screen minus task bars) of the display the window is on.
    fn work_area(&self) -> Rect;
}

/// In-memory window used by the CLI simulator and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessWindow {
    position: Point,
    size: FrameSize,
    work_area: Rect,
}

impl HeadlessWindow {
    /// Create a window at `position` on a display whose usable area is `work_area`.
    pub fn new(position: Point, size: FrameSize, work_area: Rect) -> Self {
        Self {
            position,
            size,
            work_area,
        }
    }
}

impl PetWindow for HeadlessWindow {
    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn size(&self) -> FrameSize {
        self.size
    }

    fn set_size(&mut self, size: FrameSize) {
        self.size = size;
    }

    fn work_area(&self) -> Rect {
        self.work_area
    }
}
