//! Axis-aligned rectangles used for placement and collision

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle: full `size`, centred at the entity position plus `offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub size: Vec2,
    pub offset: Vec2,
}

impl Shape {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// World-space box of this shape placed at `position`
    pub fn aabb_at(&self, position: Vec2) -> Aabb {
        Aabb {
            center: position + self.offset,
            half: self.size * 0.5,
        }
    }
}

/// World-space box in centre / half-extent form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    /// A zero-size box, for entities without a shape
    pub fn point(center: Vec2) -> Self {
        Self {
            center,
            half: Vec2::ZERO,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_includes_offset() {
        let shape = Shape::new(Vec2::new(2.0, 4.0)).with_offset(Vec2::new(1.0, 0.0));
        let aabb = shape.aabb_at(Vec2::new(10.0, 10.0));
        assert_eq!(aabb.min(), Vec2::new(10.0, 8.0));
        assert_eq!(aabb.max(), Vec2::new(12.0, 12.0));
    }
}
