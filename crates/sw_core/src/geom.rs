//! Small 2D helpers shared across screens: axis-aligned rectangles and the
//! circle overlap test the gameplay collision is built on.

use glam::Vec2;

/// Axis-aligned rectangle, Y-down like the rest of the playfield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Shrink the rectangle by `fraction` of its size on every side.
    /// `fraction` 0.05 yields the classic 5% title-safe area.
    pub fn inset_fraction(&self, fraction: f32) -> Self {
        let margin = Vec2::new(self.width() * fraction, self.height() * fraction);
        Self {
            min: self.min + margin,
            max: self.max - margin,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// True when `point` lies strictly inside the circle at `center`.
/// Strict comparison: a projectile grazing the exact radius stays a miss.
pub fn circle_contains(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance(point) < radius
}
