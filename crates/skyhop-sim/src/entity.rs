//! Entities and their optional components

use crate::player::Player;
use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use skyhop_core::{EntityId, PatternId, ShapeId};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Capabilities implied by the attached components
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct EntityFlags: u8 {
        /// Has a rigid body
        const MOVABLE    = 1 << 0;
        /// Has a shape
        const COLLIDABLE = 1 << 1;
        /// Has a rendering pattern
        const RENDERABLE = 1 << 2;
    }
}

/// What an entity is in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Solid,
    Decoration,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Solid => "solid",
            EntityKind::Decoration => "decoration",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "player" => Ok(EntityKind::Player),
            "solid" => Ok(EntityKind::Solid),
            "decoration" | "decor" => Ok(EntityKind::Decoration),
            other => Err(format!("unknown entity type '{other}'")),
        }
    }
}

/// Kinematic state of a movable entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

/// A simulated object. Components are attached through [`crate::World`], which
/// keeps `flags` in agreement with what is attached.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    pub position: Vec2,
    flags: EntityFlags,
    shape: Option<ShapeId>,
    pattern: Option<PatternId>,
    body: Option<RigidBody>,
    player: Option<Player>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, kind: EntityKind, position: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            flags: EntityFlags::empty(),
            shape: None,
            pattern: None,
            body: None,
            player: None,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn flags(&self) -> EntityFlags {
        self.flags
    }

    pub fn has_flag(&self, flag: EntityFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn shape(&self) -> Option<ShapeId> {
        self.shape
    }

    pub fn pattern(&self) -> Option<PatternId> {
        self.pattern
    }

    pub fn body(&self) -> Option<&RigidBody> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut RigidBody> {
        self.body.as_mut()
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Velocity, or zero for entities without a rigid body
    pub fn velocity(&self) -> Vec2 {
        self.body.map(|b| b.velocity).unwrap_or(Vec2::ZERO)
    }

    /// Split borrow of the state skills and the integrator mutate together
    pub fn parts_mut(&mut self) -> (&mut Vec2, Option<&mut RigidBody>, Option<&mut Player>) {
        (
            &mut self.position,
            self.body.as_mut(),
            self.player.as_mut(),
        )
    }

    pub(crate) fn set_shape(&mut self, shape: ShapeId) {
        self.shape = Some(shape);
        self.flags.insert(EntityFlags::COLLIDABLE);
    }

    pub(crate) fn set_pattern(&mut self, pattern: PatternId) {
        self.pattern = Some(pattern);
        self.flags.insert(EntityFlags::RENDERABLE);
    }

    pub(crate) fn set_body(&mut self, body: RigidBody) {
        self.body = Some(body);
        self.flags.insert(EntityFlags::MOVABLE);
    }

    pub(crate) fn set_player(&mut self, player: Player) {
        self.player = Some(player);
    }
}
