//! World - the entity registry and every registry entities reference

use crate::collision::{self, Contact};
use crate::entity::{Entity, EntityFlags, EntityKind, RigidBody};
use crate::kinematics;
use crate::pattern::{Bitmap, RenderingPattern};
use crate::player::{Player, PlayerTuning};
use crate::registry::Registry;
use crate::shape::{Aabb, Shape};
use crate::skills::Skill;
use glam::Vec2;
use skyhop_core::{
    BitmapId, ControllerId, EntityId, PatternId, Result, ShapeId, SkyhopError, MAX_BITMAPS,
    MAX_PATTERNS, MAX_SHAPES, WORLD_SIZE,
};
use skyhop_input::InputState;
use tracing::debug;

/// Gate deciding whether an intersecting pair gets solved at all
pub type CollisionCallback = Box<dyn FnMut(&Entity, &Entity) -> bool>;

/// The simulated world.
///
/// Owns fixed-capacity, append-only registries of bitmaps, shapes, rendering
/// patterns and entities. Nothing is ever removed, so handles stay valid for
/// the lifetime of the world.
pub struct World {
    /// Full width and height of the playable area, centred on the origin
    size: Vec2,
    bitmaps: Registry<BitmapId, Bitmap>,
    shapes: Registry<ShapeId, Shape>,
    patterns: Registry<PatternId, RenderingPattern>,
    entities: Registry<EntityId, Entity>,
    collision_callback: Option<CollisionCallback>,
}

impl World {
    /// Create an empty world of the given full size
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            bitmaps: Registry::with_capacity(MAX_BITMAPS),
            shapes: Registry::with_capacity(MAX_SHAPES),
            patterns: Registry::with_capacity(MAX_PATTERNS),
            entities: Registry::with_capacity(WORLD_SIZE),
            collision_callback: None,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    // --- Registries ---

    pub fn create_bitmap(&mut self, path: impl Into<String>) -> Result<BitmapId> {
        self.bitmaps.push(Bitmap { path: path.into() })
    }

    pub fn create_shape(&mut self, shape: Shape) -> Result<ShapeId> {
        self.shapes.push(shape)
    }

    /// Register a pattern after checking its bitmap list and cells
    pub fn create_pattern(&mut self, pattern: RenderingPattern) -> Result<PatternId> {
        for &bitmap in &pattern.bitmaps {
            self.bitmaps.try_get(bitmap)?;
        }
        for &cell in &pattern.cells {
            if cell as usize > pattern.bitmaps.len() {
                return Err(SkyhopError::InvalidReference {
                    kind: "pattern cell",
                    index: cell as usize,
                });
            }
        }
        self.patterns.push(pattern)
    }

    /// Append a bare entity with no components
    pub fn create_entity(&mut self, kind: EntityKind, position: Vec2) -> Result<EntityId> {
        let id = self
            .entities
            .push_with(|id| Entity::new(id, kind, position))?;
        debug!(entity = %id, %kind, x = position.x, y = position.y, "entity created");
        Ok(id)
    }

    /// Append a player entity with a rigid body and player data
    pub fn create_player(
        &mut self,
        position: Vec2,
        tuning: PlayerTuning,
        controller: ControllerId,
    ) -> Result<EntityId> {
        let id = self.create_entity(EntityKind::Player, position)?;
        let entity = self.entities.try_get_mut(id)?;
        entity.set_body(RigidBody::default());
        entity.set_player(Player::new(tuning, controller));
        Ok(id)
    }

    pub fn attach_shape(&mut self, entity: EntityId, shape: ShapeId) -> Result<()> {
        self.shapes.try_get(shape)?;
        self.entities.try_get_mut(entity)?.set_shape(shape);
        Ok(())
    }

    pub fn attach_rendering_pattern(&mut self, entity: EntityId, pattern: PatternId) -> Result<()> {
        self.patterns.try_get(pattern)?;
        self.entities.try_get_mut(entity)?.set_pattern(pattern);
        Ok(())
    }

    pub fn attach_rigid_body(
        &mut self,
        entity: EntityId,
        velocity: Vec2,
        acceleration: Vec2,
    ) -> Result<()> {
        self.entities.try_get_mut(entity)?.set_body(RigidBody {
            velocity,
            acceleration,
        });
        Ok(())
    }

    /// Put a skill into a player's slot
    pub fn equip_skill(&mut self, entity: EntityId, slot: usize, skill: Skill) -> Result<()> {
        self.entities
            .try_get_mut(entity)?
            .player_mut()
            .ok_or_else(|| SkyhopError::NotAPlayer(entity.to_string()))?
            .equip(slot, skill)
    }

    /// Missing entities have no flags
    pub fn entity_has_flag(&self, entity: EntityId, flag: EntityFlags) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|e| e.has_flag(flag))
    }

    pub fn set_collision_callback(
        &mut self,
        callback: impl FnMut(&Entity, &Entity) -> bool + 'static,
    ) {
        self.collision_callback = Some(Box::new(callback));
    }

    /// Back to solving every intersecting pair
    pub fn clear_collision_callback(&mut self) {
        self.collision_callback = None;
    }

    // --- Lookups ---

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn entities(&self) -> &[Entity] {
        self.entities.as_slice()
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        self.entities.as_mut_slice()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn pattern(&self, id: PatternId) -> Option<&RenderingPattern> {
        self.patterns.get(id)
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn bitmap(&self, id: BitmapId) -> Option<&Bitmap> {
        self.bitmaps.get(id)
    }

    pub fn bitmap_count(&self) -> usize {
        self.bitmaps.len()
    }

    /// World-space box of an entity (a point if it has no shape)
    pub fn aabb(&self, id: EntityId) -> Option<Aabb> {
        let entity = self.entities.get(id)?;
        Some(Self::entity_aabb(&self.shapes, entity))
    }

    fn entity_aabb(shapes: &Registry<ShapeId, Shape>, entity: &Entity) -> Aabb {
        entity
            .shape()
            .and_then(|s| shapes.get(s))
            .map(|s| s.aabb_at(entity.position))
            .unwrap_or_else(|| Aabb::point(entity.position))
    }

    // --- Simulation ---

    /// Kinematics then collisions, for one frame
    pub fn step(&mut self, input: &InputState, dt: f32) -> Vec<Contact> {
        self.integrate(input, dt);
        self.resolve_collisions()
    }

    /// Drive players from input, integrate every movable entity and clamp it to
    /// the world bounds
    pub fn integrate(&mut self, input: &InputState, dt: f32) {
        let half_world = self.size * 0.5;
        let shapes = &self.shapes;
        for entity in self.entities.as_mut_slice() {
            if !entity.has_flag(EntityFlags::MOVABLE) {
                continue;
            }
            let shape = entity.shape().and_then(|s| shapes.get(s)).copied();
            kinematics::step_entity(entity, shape, input, half_world, dt);
        }
    }

    /// Do two entities' boxes intersect?
    pub fn intersects(&self, a: EntityId, b: EntityId) -> Result<bool> {
        let a = Self::entity_aabb(&self.shapes, self.entities.try_get(a)?);
        let b = Self::entity_aabb(&self.shapes, self.entities.try_get(b)?);
        Ok(collision::intersects(&a, &b))
    }

    /// Minimum translation separating `a` from `b`
    pub fn overlap(&self, a: EntityId, b: EntityId) -> Result<Vec2> {
        let a = Self::entity_aabb(&self.shapes, self.entities.try_get(a)?);
        let b = Self::entity_aabb(&self.shapes, self.entities.try_get(b)?);
        Ok(collision::overlap(&a, &b))
    }

    /// Test every collidable pair once and push intersecting ones apart
    pub fn resolve_collisions(&mut self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let count = self.entities.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let entities = self.entities.as_mut_slice();
                let (head, tail) = entities.split_at_mut(j);
                let (first, second) = (&mut head[i], &mut tail[0]);
                if !first.has_flag(EntityFlags::COLLIDABLE)
                    || !second.has_flag(EntityFlags::COLLIDABLE)
                {
                    continue;
                }
                let a = Self::entity_aabb(&self.shapes, &*first);
                let b = Self::entity_aabb(&self.shapes, &*second);
                if !collision::intersects(&a, &b) {
                    continue;
                }
                if let Some(callback) = self.collision_callback.as_mut() {
                    if !callback(&*first, &*second) {
                        continue;
                    }
                }
                let correction = collision::overlap(&a, &b);
                if let Some(contact) = collision::separate(first, second, correction) {
                    contacts.push(contact);
                }
            }
        }
        self.ground_resting_players();
        contacts
    }

    /// Players sitting on another collidable body within tolerance count as
    /// landed even when this frame's sink was too shallow to collide. They are
    /// put back on the surface and stop falling.
    fn ground_resting_players(&mut self) {
        let shapes = &self.shapes;
        let bases: Vec<(EntityId, Aabb)> = self
            .entities
            .as_slice()
            .iter()
            .filter(|e| e.has_flag(EntityFlags::COLLIDABLE))
            .map(|e| (e.id(), Self::entity_aabb(shapes, e)))
            .collect();

        for entity in self.entities.as_mut_slice() {
            if entity.player().is_none()
                || !entity.has_flag(EntityFlags::COLLIDABLE)
                || entity.velocity().y > 0.0
            {
                continue;
            }
            let own = Self::entity_aabb(shapes, entity);
            let id = entity.id();
            let surface = bases
                .iter()
                .filter(|(other, base)| *other != id && collision::rests_on(&own, base))
                .map(|(_, base)| base.max().y)
                .reduce(f32::max);
            let Some(surface) = surface else {
                continue;
            };

            let (position, body, player) = entity.parts_mut();
            position.y += surface - own.min().y;
            if let Some(body) = body {
                body.velocity.y = body.velocity.y.max(0.0);
            }
            if let Some(player) = player {
                player.land();
            }
        }
    }
}
