//! Clipping rectangles.

/// A clipping rectangle in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ClipRect {
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the cell at (`px`, `py`) lies inside.
    #[must_use]
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x.saturating_add(self.width)
            && py < self.y.saturating_add(self.height)
    }

    /// Overlap of two rectangles, if any.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self
            .x
            .saturating_add(self.width)
            .min(other.x.saturating_add(other.width));
        let y2 = self
            .y
            .saturating_add(self.height)
            .min(other.y.saturating_add(other.height));
        (x2 > x1 && y2 > y1).then(|| Self::new(x1, y1, x2 - x1, y2 - y1))
    }
}

impl Default for ClipRect {
    fn default() -> Self {
        Self::new(0, 0, u32::MAX, u32::MAX)
    }
}

/// Nested clip rectangles; the effective clip is their intersection.
#[derive(Clone, Debug, Default)]
pub struct ScissorStack {
    saved: Vec<ClipRect>,
    current: ClipRect,
}

impl ScissorStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrow the clip to its intersection with `rect`.
    pub fn push(&mut self, rect: ClipRect) {
        self.saved.push(self.current);
        self.current = self
            .current
            .intersect(&rect)
            .unwrap_or(ClipRect::new(0, 0, 0, 0));
    }

    pub fn pop(&mut self) {
        if let Some(rect) = self.saved.pop() {
            self.current = rect;
        }
    }

    pub fn clear(&mut self) {
        self.saved.clear();
        self.current = ClipRect::default();
    }

    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.current.contains(x, y)
    }
}
