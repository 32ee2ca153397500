//! Emitter configuration and per-system runtime state

use crate::particle::Particle;
use crate::rand::ParticleRng;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use skyhop_core::Color;

/// Tuning every spawned particle system starts from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleEmitterConfig {
    /// Seconds the system keeps emitting
    pub system_life: f32,
    pub particles_per_second: f32,
    /// Mean particle lifetime
    pub particle_life: f32,
    /// Standard deviation of the particle lifetime
    pub particle_life_delta: f32,
    pub start_color: Color,
    pub end_color: Color,
    /// Emission angle range in degrees, 0 pointing along +x, counter-clockwise
    pub angle_min: f32,
    pub angle_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub gravity: Vec2,
}

impl Default for ParticleEmitterConfig {
    fn default() -> Self {
        Self {
            system_life: 0.5,
            particles_per_second: 60.0,
            particle_life: 0.6,
            particle_life_delta: 0.15,
            start_color: Color::new(1.0, 0.9, 0.4, 1.0),
            end_color: Color::new(1.0, 0.2, 0.0, 0.0),
            angle_min: 60.0,
            angle_max: 120.0,
            speed_min: 2.0,
            speed_max: 4.0,
            gravity: Vec2::new(0.0, -9.8),
        }
    }
}

/// One emitter and the particles it produced
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    pub config: ParticleEmitterConfig,
    pub position: Vec2,
    /// Remaining emission time
    pub system_life: f32,
    pub alive: bool,
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// (Re)start emitting at `position`, dropping any lingering particles
    pub fn start(&mut self, config: ParticleEmitterConfig, position: Vec2) {
        self.config = config;
        self.position = position;
        self.system_life = config.system_life;
        self.alive = true;
        self.particles.clear();
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Nothing left to emit or simulate
    pub fn is_finished(&self) -> bool {
        !self.alive && self.particles.is_empty()
    }

    /// Emit, age the system, then integrate and cull particles
    pub fn update(&mut self, rng: &mut ParticleRng, dt: f32) {
        if self.alive {
            let count = (self.config.particles_per_second * dt).floor().max(0.0);
            for _ in 0..count as u32 {
                let particle = self.emit(rng);
                self.particles.push(particle);
            }

            self.system_life -= dt;
            if self.system_life <= 0.0 {
                self.alive = false;
            }
        }

        let ParticleEmitterConfig {
            gravity,
            start_color,
            end_color,
            ..
        } = self.config;
        for particle in &mut self.particles {
            particle.integrate(gravity, start_color, end_color, dt);
        }

        let mut i = 0;
        while i < self.particles.len() {
            if self.particles[i].is_expired() {
                // Order is not preserved
                self.particles.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn emit(&self, rng: &mut ParticleRng) -> Particle {
        let config = &self.config;
        let angle = rng
            .range(config.angle_min, config.angle_max)
            .to_radians();
        let speed = rng.range(config.speed_min, config.speed_max);
        let life = rng
            .normal(config.particle_life, config.particle_life_delta)
            .max(f32::EPSILON);
        Particle {
            position: self.position,
            velocity: Vec2::from_angle(angle) * speed,
            color: config.start_color,
            total_life: life,
            life,
        }
    }
}
