//! The frame driver tying input, skills, world simulation and particles together

use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::render::Renderer;
use crate::snapshot::EntitySnapshot;
use glam::Vec2;
use skyhop_core::{Color, Handle, Result};
use skyhop_input::InputState;
use skyhop_particles::ParticleBank;
use skyhop_scene::{LoadOptions, MapSummary};
use skyhop_sim::skills::{self, SkillEvent, SkillEventKind, SkillType};
use skyhop_sim::{Contact, EntityFlags, World};
use std::path::Path;
use tracing::{info, warn};

/// What happened during one `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Delta actually simulated after clamping
    pub dt: f32,
    pub skill_events: Vec<SkillEvent>,
    pub contacts: Vec<Contact>,
}

/// Everything one running game owns
pub struct GameState {
    pub world: World,
    pub input: InputState,
    pub particles: ParticleBank,
    pub clock: GameClock,
    config: GameConfig,
}

impl GameState {
    /// Build an empty world and register the configured controllers
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let mut input = InputState::new();
        for controller in &config.controllers {
            input.add_controller(controller.build())?;
        }

        Ok(Self {
            world: World::new(config.world.size),
            input,
            particles: ParticleBank::new(config.particles, config.seed),
            clock: GameClock::new(config.max_frame_time),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            tuning: self.config.player,
            skills: self.config.skills.clone(),
        }
    }

    /// Load a map file into the world
    pub fn load_map<P: AsRef<Path>>(&mut self, path: P) -> Result<MapSummary> {
        let options = self.load_options();
        let summary = skyhop_scene::load_map(path, &mut self.world, &options)?;
        self.check_player_controllers();
        Ok(summary)
    }

    pub fn load_map_str(&mut self, content: &str) -> Result<MapSummary> {
        let options = self.load_options();
        let summary = skyhop_scene::load_map_str(content, &mut self.world, &options)?;
        self.check_player_controllers();
        Ok(summary)
    }

    fn check_player_controllers(&self) {
        let available = self.input.controller_count();
        for entity in self.world.entities() {
            if let Some(player) = entity.player() {
                if player.controller.index() >= available {
                    warn!(
                        entity = %entity.id(),
                        controller = %player.controller,
                        available,
                        "player has no controller; it will not receive input"
                    );
                }
            }
        }
    }

    /// Run one frame.
    ///
    /// Order: input refresh, skill triggers, skill applies, kinematics,
    /// collisions, particles. A skill's status changes are visible to the
    /// kinematic step of the same frame.
    pub fn update(&mut self, dt: f32) -> FrameReport {
        let dt = self.clock.tick(dt);
        self.input.refresh();

        let mut skill_events = Vec::new();
        skills::update_triggers(&mut self.world, &self.input, &mut skill_events);
        self.spawn_skill_effects(&skill_events);
        skills::update_applies(&mut self.world, dt, &mut skill_events);

        self.world.integrate(&self.input, dt);
        let contacts = self.world.resolve_collisions();

        self.particles.update(dt);

        FrameReport {
            dt,
            skill_events,
            contacts,
        }
    }

    fn spawn_skill_effects(&mut self, events: &[SkillEvent]) {
        for event in events {
            if event.kind != SkillEventKind::Triggered || event.skill != SkillType::Dash {
                continue;
            }
            let Some(entity) = self.world.entity(event.entity) else {
                continue;
            };
            if let Err(err) = self.particles.spawn(entity.position) {
                warn!(entity = %event.entity, %err, "no particle system available for dash");
            }
        }
    }

    /// Report every renderable entity and a HUD line per player
    pub fn render<R: Renderer>(&self, renderer: &mut R) {
        for entity in self.world.entities() {
            if !entity.has_flag(EntityFlags::RENDERABLE) {
                continue;
            }
            let (Some(pattern), Some(bounds)) = (
                entity.pattern().and_then(|p| self.world.pattern(p)),
                self.world.aabb(entity.id()),
            ) else {
                continue;
            };

            match pattern.single_bitmap().and_then(|b| self.world.bitmap(b)) {
                Some(bitmap) => renderer.render_bitmap(bitmap, bounds),
                None => {
                    let bitmaps: Vec<_> = pattern
                        .bitmaps
                        .iter()
                        .filter_map(|&b| self.world.bitmap(b))
                        .collect();
                    renderer.render_pattern(pattern, &bitmaps, bounds);
                }
            }
        }

        let top_left = Vec2::new(-self.world.size().x, self.world.size().y) * 0.5;
        let players = self
            .world
            .entities()
            .iter()
            .filter_map(|e| e.player().map(|p| (e.id(), p)));
        for (line, (id, player)) in players.enumerate() {
            let text = format!(
                "{id} HP {:.0}/{:.0} MP {:.0}/{:.0}",
                player.health.current, player.health.max, player.mana.current, player.mana.max
            );
            let position = top_left + Vec2::new(1.0, -1.0 - line as f32);
            renderer.render_text(&text, position, Color::WHITE);
        }
    }

    /// Serializable state of every entity
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.world.entities().iter().map(EntitySnapshot::from).collect()
    }

    /// Run `frames` frames of `dt` each, logging a summary at the end
    pub fn run_frames(&mut self, frames: u64, dt: f32) -> Vec<FrameReport> {
        let reports: Vec<_> = (0..frames).map(|_| self.update(dt)).collect();
        info!(
            frames,
            total_time = self.clock.total_time,
            particles = self.particles.particle_count(),
            "simulation finished"
        );
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCall, RecordingRenderer};
    use skyhop_core::{ControllerId, EntityId};
    use skyhop_input::Action;
    use skyhop_sim::{DashConfig, StatusFlags};

    const DT: f32 = 0.05;

    fn game(map: &str) -> GameState {
        let mut game = GameState::new(GameConfig::default()).unwrap();
        game.load_map_str(map).unwrap();
        game
    }

    fn player(game: &GameState) -> &skyhop_sim::Player {
        game.world
            .entity(EntityId::from_index(0))
            .unwrap()
            .player()
            .unwrap()
    }

    #[test]
    fn default_config_registers_two_controllers() {
        let game = GameState::new(GameConfig::default()).unwrap();
        assert_eq!(game.input.controller_count(), 2);
        assert_eq!(game.world.size(), Vec2::new(64.0, 36.0));
    }

    #[test]
    fn player_falls_and_lands_on_floor() {
        let mut game = game("Entity player 0 0\n");
        for _ in 0..100 {
            game.update(DT);
        }
        let entity = game.world.entity(EntityId::from_index(0)).unwrap();
        assert!((entity.position.y + 18.0).abs() < 1e-4);
        assert!(player(&game).status.contains(StatusFlags::LANDED));
    }

    #[test]
    fn skill_root_applies_to_same_frame_kinematics() {
        let mut game = game("Entity player 0 0\n");
        let kb = ControllerId::from_index(0);
        game.input.set_action(kb, Action::Right, true);
        game.input.set_action(kb, Action::Skill1, true);

        let report = game.update(DT);
        assert!(report
            .skill_events
            .iter()
            .any(|e| e.skill == SkillType::Dash && e.kind == SkillEventKind::Triggered));

        // Dash moved a quarter of its distance; held Right added nothing
        let dash = DashConfig::default();
        let x = game.world.entity(EntityId::from_index(0)).unwrap().position.x;
        assert!((x - dash.distance * DT / dash.duration).abs() < 1e-4);
        assert!(player(&game).status.contains(StatusFlags::ROOTED));
        assert_eq!(game.particles.alive_count(), 1);
    }

    #[test]
    fn dash_completes_and_frees_movement() {
        let mut game = game("Entity player 0 0\n");
        let kb = ControllerId::from_index(0);
        game.input.set_action(kb, Action::Right, true);
        game.input.set_action(kb, Action::Skill1, true);

        let mut finished = false;
        for _ in 0..5 {
            let report = game.update(DT);
            finished |= report
                .skill_events
                .iter()
                .any(|e| e.skill == SkillType::Dash && e.kind == SkillEventKind::Finished);
        }
        assert!(finished);
        assert!(!player(&game).status.contains(StatusFlags::ROOTED));

        let before = game.world.entity(EntityId::from_index(0)).unwrap().position.x;
        game.update(DT);
        let after = game.world.entity(EntityId::from_index(0)).unwrap().position.x;
        assert!(after > before);
    }

    #[test]
    fn mana_recharge_needs_previous_landing() {
        let mut game = game("Entity player 0 -18\n");
        let kb = ControllerId::from_index(0);
        game.world
            .entity_mut(EntityId::from_index(0))
            .unwrap()
            .player_mut()
            .unwrap()
            .mana
            .current = 0.0;

        // Not landed yet on the first frame
        game.input.set_action(kb, Action::Skill2, true);
        game.update(DT);
        assert!(!player(&game).skill(1).unwrap().is_active());

        // Release and press again now that the floor was touched
        game.input.set_action(kb, Action::Skill2, false);
        game.update(DT);
        game.input.set_action(kb, Action::Skill2, true);
        game.update(DT);
        assert!(player(&game).skill(1).unwrap().is_active());
        assert!(player(&game).status.contains(StatusFlags::ROOTED));
    }

    #[test]
    fn solid_ground_stops_falling_player() {
        let map = "\
Shape 20 2
Shape 1 1
Entity solid 0 -5
Entity player 0 0
Sh2En 1 1
Sh2En 2 2
";
        let mut game = game(map);
        let mut touched = false;
        for _ in 0..60 {
            touched |= !game.update(DT).contacts.is_empty();
        }
        assert!(touched);
        let entity = game.world.entity(EntityId::from_index(1)).unwrap();
        // Resting on top: ground top at -4, player half height 0.5
        assert!((entity.position.y + 3.5).abs() < 0.05);
        let data = entity.player().unwrap();
        assert!(data.status.contains(StatusFlags::LANDED));
        assert_eq!(data.jump.nb_jumps, 0);
    }

    #[test]
    fn render_reports_bitmaps_patterns_and_hud() {
        let map = "\
Bitmap hero.png
Bitmap tile.png
Shape 1 1
Shape 4 1
Pattern 1 1 1 1 1
Pattern 2 1 1 1 1 2
Entity player 0 0
Entity solid 0 -5
Entity decoration 3 3
Sh2En 1 1
Sh2En 2 2
Pa2En 1 1
Pa2En 2 2
";
        let game = game(map);
        let mut renderer = RecordingRenderer::default();
        game.render(&mut renderer);

        assert_eq!(renderer.calls.len(), 3);
        assert!(matches!(&renderer.calls[0], DrawCall::Bitmap { path, .. } if path == "hero.png"));
        assert!(matches!(&renderer.calls[1], DrawCall::Pattern { bitmaps, .. } if bitmaps == &["tile.png".to_string()]));
        match &renderer.calls[2] {
            DrawCall::Text { text, .. } => assert!(text.contains("HP 100/100")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn full_particle_bank_does_not_break_dash() {
        let mut game = game("Entity player 0 0\n");
        for _ in 0..skyhop_core::MAX_PARTICLE_SYSTEMS {
            game.particles.spawn(Vec2::ZERO).unwrap();
        }
        let kb = ControllerId::from_index(0);
        game.input.set_action(kb, Action::Left, true);
        game.input.set_action(kb, Action::Skill1, true);
        let report = game.update(DT);
        assert!(report
            .skill_events
            .iter()
            .any(|e| e.skill == SkillType::Dash && e.kind == SkillEventKind::Triggered));
    }

    #[test]
    fn snapshot_lists_every_entity() {
        let game = game("Entity player 1 2\nEntity solid 0 0\n");
        let snapshot = game.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].position, [1.0, 2.0]);
        assert_eq!(snapshot[0].kind, "player");
        assert!(snapshot[0].player.is_some());
        assert!(snapshot[1].player.is_none());
    }

    #[test]
    fn demo_map_runs() {
        let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
        let config = GameConfig::load(demos.join("skyhop.toml")).unwrap();
        let mut game = GameState::new(config).unwrap();
        let summary = game.load_map(demos.join("arena.map")).unwrap();
        assert_eq!(summary.players, 2);
        assert_eq!(summary.entities, 5);

        let reports = game.run_frames(120, 1.0 / 60.0);
        assert_eq!(reports.len(), 120);
        assert_eq!(game.clock.frame, 120);
        // Both players end up standing on the arena floor
        for index in [2, 3] {
            let entity = game.world.entity(EntityId::from_index(index)).unwrap();
            assert!(entity.player().unwrap().status.contains(StatusFlags::LANDED));
        }
    }
}
