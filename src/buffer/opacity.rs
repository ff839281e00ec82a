//! Opacity stack for faded glyphs.

/// Nested opacity values; the effective opacity is their product.
#[derive(Clone, Debug)]
pub struct OpacityStack {
    saved: Vec<f32>,
    current: f32,
}

impl OpacityStack {
    /// Fully opaque, empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            current: 1.0,
        }
    }

    /// Multiply the current opacity by `opacity` (clamped to `[0, 1]`).
    pub fn push(&mut self, opacity: f32) {
        self.saved.push(self.current);
        self.current *= opacity.clamp(0.0, 1.0);
    }

    /// Undo the last push. Popping an empty stack is a no-op.
    pub fn pop(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    pub fn clear(&mut self) {
        self.saved.clear();
        self.current = 1.0;
    }

    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

impl Default for OpacityStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opacity_multiplies() {
        let mut stack = OpacityStack::new();
        stack.push(0.5);
        stack.push(0.5);
        assert!((stack.current() - 0.25).abs() < f32::EPSILON);
        assert_eq!(stack.depth(), 2);
        stack.pop();
        assert!((stack.current() - 0.5).abs() < f32::EPSILON);
        stack.pop();
        stack.pop();
        assert!((stack.current() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_opacity_clamps() {
        let mut stack = OpacityStack::new();
        stack.push(2.0);
        assert!((stack.current() - 1.0).abs() < f32::EPSILON);
        stack.push(-1.0);
        assert!(stack.current() <= 0.0);
        stack.clear();
        assert_eq!(stack.depth(), 0);
    }
}
