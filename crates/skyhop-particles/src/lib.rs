//! Skyhop Particles - Pooled particle emitters
//!
//! A fixed bank of particle systems with:
//! - stochastic emission (uniform angle and speed, normally distributed lifetime)
//! - linear motion under per-system gravity
//! - color interpolation over each particle's lifetime
//! - swap-remove culling of expired particles

pub mod emitter;
pub mod particle;
pub mod rand;

pub use emitter::{ParticleEmitterConfig, ParticleSystem};
pub use particle::Particle;
pub use rand::ParticleRng;

use glam::Vec2;
use skyhop_core::{Handle, ParticleSystemId, Result, SkyhopError, MAX_PARTICLE_SYSTEMS};
use tracing::debug;

/// Preallocated slots of particle systems
pub struct ParticleBank {
    systems: Vec<ParticleSystem>,
    config: ParticleEmitterConfig,
    rng: ParticleRng,
}

impl ParticleBank {
    pub fn new(config: ParticleEmitterConfig, seed: u64) -> Self {
        Self {
            systems: vec![ParticleSystem::default(); MAX_PARTICLE_SYSTEMS],
            config,
            rng: ParticleRng::new(seed),
        }
    }

    pub fn config(&self) -> &ParticleEmitterConfig {
        &self.config
    }

    /// Start a system at `position`. Fully finished slots are used first; a
    /// slot that stopped emitting but still has particles is reused only when
    /// no finished slot is left, and its particles are dropped.
    pub fn spawn(&mut self, position: Vec2) -> Result<ParticleSystemId> {
        let index = self
            .systems
            .iter()
            .position(ParticleSystem::is_finished)
            .or_else(|| self.systems.iter().position(|system| !system.alive))
            .ok_or(SkyhopError::CapacityExceeded {
                registry: "particle systems",
                capacity: MAX_PARTICLE_SYSTEMS,
            })?;
        self.systems[index].start(self.config, position);
        let id = ParticleSystemId::from_index(index);
        debug!(system = %id, x = position.x, y = position.y, "particle system spawned");
        Ok(id)
    }

    /// Advance every system that is emitting or still has particles
    pub fn update(&mut self, dt: f32) {
        for system in &mut self.systems {
            if system.is_finished() {
                continue;
            }
            let was_alive = system.alive;
            system.update(&mut self.rng, dt);
            if was_alive && !system.alive {
                debug!("particle system stopped emitting");
            }
        }
    }

    pub fn get(&self, id: ParticleSystemId) -> Option<&ParticleSystem> {
        self.systems.get(id.index())
    }

    pub fn get_mut(&mut self, id: ParticleSystemId) -> Option<&mut ParticleSystem> {
        self.systems.get_mut(id.index())
    }

    /// Systems still emitting
    pub fn alive_count(&self) -> usize {
        self.systems.iter().filter(|s| s.alive).count()
    }

    /// Live particles across every system
    pub fn particle_count(&self) -> usize {
        self.systems.iter().map(ParticleSystem::particle_count).sum()
    }

    /// Systems with something to show, alive or decaying
    pub fn active(&self) -> impl Iterator<Item = (ParticleSystemId, &ParticleSystem)> {
        self.systems
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_finished())
            .map(|(i, s)| (ParticleSystemId::from_index(i), s))
    }
}

impl Default for ParticleBank {
    fn default() -> Self {
        Self::new(ParticleEmitterConfig::default(), 0x5EED)
    }
}
