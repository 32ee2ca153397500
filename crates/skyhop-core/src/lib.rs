//! Skyhop Core - Foundational types for the Skyhop gameplay core
//!
//! This crate provides the types every other Skyhop crate depends on:
//! - Dense registry handles (`EntityId`, `ShapeId`, ...)
//! - Fixed registry capacities
//! - `Color` for particle gradients and HUD text
//! - Error types and Result alias

mod error;
mod id;
mod limits;
mod types;

pub use error::{Result, SkyhopError};
pub use id::{BitmapId, ControllerId, EntityId, Handle, ParticleSystemId, PatternId, ShapeId};
pub use limits::{
    MAX_BITMAPS, MAX_CONTROLLERS, MAX_PARTICLE_SYSTEMS, MAX_PATTERNS, MAX_SHAPES, MAX_SKILLS,
    WORLD_SIZE,
};
pub use types::Color;
