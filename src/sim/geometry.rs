//! Axis-aligned geometry for hit tests and screen bounds
//!
//! Screen space: origin at the top-left corner, +x right, +y down.
//! A `Rect` is anchored at its top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

/// The visible play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when `rect` lies fully outside the viewport on any side
    pub fn is_outside(&self, rect: &Rect) -> bool {
        rect.bottom() < 0.0
            || rect.top() > self.height
            || rect.right() < 0.0
            || rect.left() > self.width
    }

    /// True once `rect` has fallen past the bottom edge
    pub fn is_below(&self, rect: &Rect) -> bool {
        rect.top() > self.height
    }

    /// True once `rect` has risen fully above the top edge
    pub fn is_above(&self, rect: &Rect) -> bool {
        rect.bottom() < 0.0
    }

    /// Clamp a left edge so a body of `width` stays on screen horizontally
    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        x.clamp(0.0, (self.width - width).max(0.0))
    }
}

/// Something bullets and ships can collide with
pub trait Hittable {
    /// Current bounding box
    fn hitbox(&self) -> Rect;

    /// Whether hits currently register (false while invincible)
    fn can_be_hit(&self) -> bool {
        true
    }
}

impl Hittable for Rect {
    fn hitbox(&self) -> Rect {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 5.0, 5.0)));
        // Touching edges is not an overlap
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_centered() {
        let r = Rect::centered(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        assert_eq!(r.left(), 40.0);
        assert_eq!(r.top(), 45.0);
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_viewport_outside() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(!vp.is_outside(&Rect::new(10.0, 10.0, 5.0, 5.0)));
        // Partially visible still counts as on screen
        assert!(!vp.is_outside(&Rect::new(-3.0, -3.0, 5.0, 5.0)));
        assert!(vp.is_outside(&Rect::new(10.0, -20.0, 5.0, 15.0)));
        assert!(vp.is_outside(&Rect::new(10.0, 601.0, 5.0, 5.0)));
        assert!(vp.is_outside(&Rect::new(-6.0, 10.0, 5.0, 5.0)));
        assert!(vp.is_outside(&Rect::new(801.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_clamp_x() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.clamp_x(-10.0, 50.0), 0.0);
        assert_eq!(vp.clamp_x(790.0, 50.0), 750.0);
        assert_eq!(vp.clamp_x(100.0, 50.0), 100.0);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.5f32..200.0, 0.5f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_rect_overlaps_itself(a in arb_rect()) {
            prop_assert!(a.overlaps(&a));
        }
    }
}
