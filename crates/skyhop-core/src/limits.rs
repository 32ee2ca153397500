//! Fixed registry capacities. Registries never grow past these.

/// Maximum number of entities in one world
pub const WORLD_SIZE: usize = 256;
pub const MAX_SHAPES: usize = 128;
pub const MAX_PATTERNS: usize = 128;
pub const MAX_BITMAPS: usize = 64;
/// Keyboard plus four gamepads
pub const MAX_CONTROLLERS: usize = 5;
pub const MAX_PARTICLE_SYSTEMS: usize = 32;
/// Skill slots per player
pub const MAX_SKILLS: usize = 4;
