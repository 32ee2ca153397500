//! Skyhop Sim - 2D platformer world simulation
//!
//! Provides the gameplay world:
//! - `World`: fixed-capacity registries of bitmaps, shapes, rendering patterns and entities
//! - `Entity`: position plus optional shape, pattern, rigid body and player data
//! - kinematics: player input, jump state machine, integration and world bounds
//! - collision: AABB intersection and separation between entities
//! - skills: timed abilities (dash, mana recharge, passive regeneration)

pub mod collision;
pub mod entity;
pub mod kinematics;
pub mod pattern;
pub mod player;
pub mod registry;
pub mod shape;
pub mod skills;
pub mod world;

pub use collision::{Contact, COLLISION_EPSILON};
pub use entity::{Entity, EntityFlags, EntityKind, RigidBody};
pub use pattern::{Bitmap, PatternKind, RenderingPattern};
pub use player::{
    Gauge, JumpState, Player, PlayerTuning, StatusFlags, MAX_JUMPS, MAX_JUMP_TIME, MAX_STOP_TIME,
    QUICK_FALL_FACTOR,
};
pub use registry::Registry;
pub use shape::{Aabb, Shape};
pub use skills::{
    Dash, DashConfig, ManaRecharge, ManaRechargeConfig, Regeneration, RegenerationConfig, Skill,
    SkillConfig, SkillEvent, SkillEventKind, SkillKind, SkillState, SkillType,
};
pub use world::{CollisionCallback, World};
