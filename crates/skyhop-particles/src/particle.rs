//! A single simulated particle

use glam::Vec2;
use skyhop_core::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Color,
    /// Lifetime the particle was spawned with
    pub total_life: f32,
    /// Remaining lifetime; the particle is removed at zero
    pub life: f32,
}

impl Particle {
    /// Fraction of the lifetime already spent, in [0, 1]
    pub fn age_ratio(&self) -> f32 {
        if self.total_life <= 0.0 {
            1.0
        } else {
            ((self.total_life - self.life) / self.total_life).clamp(0.0, 1.0)
        }
    }

    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Age by `dt` under `gravity` and recolor along the gradient
    pub fn integrate(&mut self, gravity: Vec2, start: Color, end: Color, dt: f32) {
        self.life -= dt;
        self.velocity += gravity * dt;
        self.position += self.velocity * dt;
        self.color = start.lerp(end, self.age_ratio());
    }
}
