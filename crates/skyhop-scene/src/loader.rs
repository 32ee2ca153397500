//! Map loading into a `World`

use crate::format::{parse_line, Directive};
use glam::Vec2;
use serde::Serialize;
use skyhop_core::{
    BitmapId, ControllerId, EntityId, Handle, PatternId, Result, ShapeId, SkyhopError,
};
use skyhop_sim::{EntityKind, PlayerTuning, RenderingPattern, Shape, SkillConfig, World};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

/// What players spawned by a map are created with
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub tuning: PlayerTuning,
    pub skills: SkillConfig,
}

/// Counts of everything a map added to the world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MapSummary {
    pub bitmaps: usize,
    pub shapes: usize,
    pub patterns: usize,
    pub entities: usize,
    pub players: usize,
}

/// Load a map file into `world`
pub fn load_map<P: AsRef<Path>>(
    path: P,
    world: &mut World,
    options: &LoadOptions,
) -> Result<MapSummary> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| {
        error!(path = %path.display(), %err, "cannot read map");
        SkyhopError::from(err)
    })?;
    let summary = load_map_str(&content, world, options)?;
    info!(path = %path.display(), entities = summary.entities, players = summary.players, "map loaded");
    Ok(summary)
}

/// Load map text into `world`.
///
/// Entries are appended as they are read; on error the world keeps whatever
/// was added before the failing line.
pub fn load_map_str(content: &str, world: &mut World, options: &LoadOptions) -> Result<MapSummary> {
    let mut loader = MapLoader::new(world, options);
    for (index, text) in content.lines().enumerate() {
        let line = index + 1;
        let result = parse_line(line, text).and_then(|directive| match directive {
            Some(directive) => loader.apply(directive),
            None => Ok(()),
        });
        if let Err(err) = result {
            error!(line, %err, "map load failed");
            return Err(err);
        }
    }
    Ok(loader.summary)
}

/// Maps file-order indices to the handles created for them
struct MapLoader<'w> {
    world: &'w mut World,
    options: &'w LoadOptions,
    bitmaps: Vec<BitmapId>,
    shapes: Vec<ShapeId>,
    patterns: Vec<PatternId>,
    entities: Vec<EntityId>,
    summary: MapSummary,
}

impl<'w> MapLoader<'w> {
    fn new(world: &'w mut World, options: &'w LoadOptions) -> Self {
        Self {
            world,
            options,
            bitmaps: Vec::new(),
            shapes: Vec::new(),
            patterns: Vec::new(),
            entities: Vec::new(),
            summary: MapSummary::default(),
        }
    }

    fn apply(&mut self, directive: Directive) -> Result<()> {
        match directive {
            Directive::Bitmap { path } => {
                self.bitmaps.push(self.world.create_bitmap(path)?);
                self.summary.bitmaps += 1;
            }
            Directive::Shape { size, offset } => {
                let shape = Shape::new(size).with_offset(offset);
                self.shapes.push(self.world.create_shape(shape)?);
                self.summary.shapes += 1;
            }
            Directive::Pattern {
                columns,
                rows,
                cells,
                bitmaps,
                kind,
            } => {
                let bitmaps = bitmaps
                    .into_iter()
                    .map(|index| lookup(&self.bitmaps, index))
                    .collect::<Result<Vec<_>>>()?;
                let pattern = RenderingPattern {
                    columns,
                    rows,
                    cells,
                    bitmaps,
                    kind,
                };
                self.patterns.push(self.world.create_pattern(pattern)?);
                self.summary.patterns += 1;
            }
            Directive::Entity {
                kind,
                position,
                velocity,
                acceleration,
            } => self.spawn_entity(kind, position, velocity, acceleration)?,
            Directive::ShapeToEntity { entity, shape } => {
                let entity = lookup(&self.entities, entity)?;
                let shape = lookup(&self.shapes, shape)?;
                self.world.attach_shape(entity, shape)?;
            }
            Directive::PatternToEntity { entity, pattern } => {
                let entity = lookup(&self.entities, entity)?;
                let pattern = lookup(&self.patterns, pattern)?;
                self.world.attach_rendering_pattern(entity, pattern)?;
            }
        }
        Ok(())
    }

    fn spawn_entity(
        &mut self,
        kind: EntityKind,
        position: Vec2,
        velocity: Option<Vec2>,
        acceleration: Option<Vec2>,
    ) -> Result<()> {
        let id = if kind == EntityKind::Player {
            let controller = ControllerId::from_index(self.summary.players);
            let id = self
                .world
                .create_player(position, self.options.tuning, controller)?;
            self.options.skills.equip(self.world, id)?;
            self.summary.players += 1;
            id
        } else {
            self.world.create_entity(kind, position)?
        };

        if velocity.is_some() || acceleration.is_some() {
            self.world.attach_rigid_body(
                id,
                velocity.unwrap_or(Vec2::ZERO),
                acceleration.unwrap_or(Vec2::ZERO),
            )?;
        }

        debug!(entity = %id, %kind, "map entity added");
        self.entities.push(id);
        self.summary.entities += 1;
        Ok(())
    }
}

/// Resolve a 1-based file index against the handles created so far
fn lookup<H: Handle>(handles: &[H], index: usize) -> Result<H> {
    index
        .checked_sub(1)
        .and_then(|i| handles.get(i).copied())
        .ok_or(SkyhopError::InvalidReference {
            kind: H::KIND,
            index,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyhop_sim::{EntityFlags, PatternKind};

    const MAP: &str = "\
# two platforms and a player
Bitmap assets/ground.png
Bitmap assets/hero.png
Shape 10 1
Shape 1 2 0 0.5
Pattern 2 1 1 1 1 1 tiled
Pattern 1 1 1 1 2
Entity solid 0 -5
Entity player 0 0
Entity decoration 3 3 1 0
Sh2En 1 1
Sh2En 2 2
Pa2En 1 1
Pa2En 2 2
";

    fn world() -> World {
        World::new(Vec2::new(100.0, 100.0))
    }

    #[test]
    fn loads_every_registry() {
        let mut world = world();
        let summary = load_map_str(MAP, &mut world, &LoadOptions::default()).unwrap();
        assert_eq!(
            summary,
            MapSummary {
                bitmaps: 2,
                shapes: 2,
                patterns: 2,
                entities: 3,
                players: 1,
            }
        );
        assert_eq!(world.entity_count(), 3);
        assert_eq!(world.pattern(PatternId::from_index(0)).unwrap().kind, PatternKind::Tiled);
        assert_eq!(
            world.pattern(PatternId::from_index(1)).unwrap().single_bitmap(),
            Some(BitmapId::from_index(1))
        );
    }

    #[test]
    fn wires_components_and_bodies() {
        let mut world = world();
        load_map_str(MAP, &mut world, &LoadOptions::default()).unwrap();
        let ground = EntityId::from_index(0);
        let player = EntityId::from_index(1);
        let decor = EntityId::from_index(2);

        assert!(world.entity_has_flag(ground, EntityFlags::COLLIDABLE));
        assert!(world.entity_has_flag(ground, EntityFlags::RENDERABLE));
        assert!(!world.entity_has_flag(ground, EntityFlags::MOVABLE));

        assert!(world.entity_has_flag(player, EntityFlags::MOVABLE));
        let data = world.entity(player).unwrap().player().unwrap();
        assert_eq!(data.controller, ControllerId::from_index(0));
        assert!(data.skill(0).is_some());

        assert!(world.entity_has_flag(decor, EntityFlags::MOVABLE));
        assert_eq!(world.entity(decor).unwrap().velocity(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn players_get_sequential_controllers() {
        let mut world = world();
        load_map_str(
            "Entity player 0 0\nEntity solid 5 5\nEntity player 2 0\n",
            &mut world,
            &LoadOptions::default(),
        )
        .unwrap();
        let second = world.entity(EntityId::from_index(2)).unwrap();
        assert_eq!(second.player().unwrap().controller, ControllerId::from_index(1));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut world = world();
        let err = load_map_str("Entity solid 0 0\nSh2En 1 3\n", &mut world, &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SkyhopError::InvalidReference { kind: "shape", index: 3 }
        ));
        // No rollback
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn zero_index_is_invalid() {
        let mut world = world();
        let err = load_map_str("Bitmap a.png\nPattern 1 1 1 1 0\n", &mut world, &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, SkyhopError::InvalidReference { kind: "bitmap", .. }));
    }

    #[test]
    fn pattern_cell_beyond_bitmap_list() {
        let mut world = world();
        let err = load_map_str("Bitmap a.png\nPattern 1 1 2 1 1\n", &mut world, &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, SkyhopError::InvalidReference { .. }));
        assert_eq!(world.pattern_count(), 0);
    }

    #[test]
    fn malformed_line_number_is_reported() {
        let mut world = world();
        let err = load_map_str("Bitmap a.png\n\nShape 1\n", &mut world, &LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, SkyhopError::MalformedMap { line: 3, .. }));
        assert_eq!(world.bitmap_count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut world = world();
        let err = load_map("does/not/exist.map", &mut world, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, SkyhopError::IoError(_)));
    }
}
