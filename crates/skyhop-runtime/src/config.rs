//! Game configuration loaded from TOML
//!
//! ```toml
//! seed = 7
//! max_frame_time = 0.25
//!
//! [world]
//! size = [64.0, 36.0]
//!
//! [player]
//! move_speed = 8.0
//!
//! [skills.dash]
//! distance = 6.0
//!
//! [[controllers]]
//! kind = "keyboard"
//! bindings = { jump = 87 }
//!
//! [[controllers]]
//! kind = "gamepad"
//! index = 0
//! ```

use crate::clock::DEFAULT_MAX_FRAME_TIME;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use skyhop_core::{Result, SkyhopError, MAX_CONTROLLERS};
use skyhop_input::{Action, Controller, ControllerKind, InputCode};
use skyhop_particles::ParticleEmitterConfig;
use skyhop_sim::{PlayerTuning, SkillConfig};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Shortest step a timed skill may be configured with, in seconds
pub const MIN_STEP_DURATION: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Full width and height, centred on the origin
    pub size: Vec2,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(64.0, 36.0),
        }
    }
}

/// One controller and its binding overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(flatten)]
    pub kind: ControllerKind,
    #[serde(default)]
    pub bindings: HashMap<Action, InputCode>,
}

impl ControllerConfig {
    pub fn new(kind: ControllerKind) -> Self {
        Self {
            kind,
            bindings: HashMap::new(),
        }
    }

    /// Default layout for the kind with overrides applied
    pub fn build(&self) -> Controller {
        let mut controller = Controller::for_kind(self.kind);
        for (&action, &code) in &self.bindings {
            controller.bind(action, code);
        }
        controller
    }
}

/// Top-level configuration for a `GameState`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerTuning,
    pub skills: SkillConfig,
    pub particles: ParticleEmitterConfig,
    pub controllers: Vec<ControllerConfig>,
    /// Particle RNG seed
    pub seed: u64,
    pub max_frame_time: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            player: PlayerTuning::default(),
            skills: SkillConfig::default(),
            particles: ParticleEmitterConfig::default(),
            controllers: vec![
                ControllerConfig::new(ControllerKind::Keyboard),
                ControllerConfig::new(ControllerKind::Gamepad { index: 0 }),
            ],
            seed: 0x5EED,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
        }
    }
}

impl GameConfig {
    /// Load and validate a TOML config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.world.size.x <= 0.0 || self.world.size.y <= 0.0 {
            return Err(SkyhopError::Config(format!(
                "world size must be positive, got {}",
                self.world.size
            )));
        }
        if self.max_frame_time <= 0.0 {
            return Err(SkyhopError::Config(
                "max_frame_time must be positive".to_string(),
            ));
        }
        if self.controllers.len() > MAX_CONTROLLERS {
            return Err(SkyhopError::Config(format!(
                "{} controllers configured, at most {MAX_CONTROLLERS} supported",
                self.controllers.len()
            )));
        }
        let tuning = &self.player;
        if tuning.move_speed <= 0.0 || tuning.jump_height <= 0.0 || tuning.jump_distance <= 0.0 {
            return Err(SkyhopError::Config(
                "player move_speed, jump_height and jump_distance must be positive".to_string(),
            ));
        }
        let skills = &self.skills;
        for (name, step) in [
            ("skills.regeneration.health_step", skills.regeneration.health_step),
            ("skills.regeneration.mana_step", skills.regeneration.mana_step),
            ("skills.mana_recharge.step_duration", skills.mana_recharge.step_duration),
        ] {
            if !step.is_finite() || step < MIN_STEP_DURATION {
                return Err(SkyhopError::Config(format!(
                    "{name} must be at least {MIN_STEP_DURATION}s, got {step}"
                )));
            }
        }
        if !skills.dash.duration.is_finite() || skills.dash.duration < 0.0 {
            return Err(SkyhopError::Config(format!(
                "skills.dash.duration must not be negative, got {}",
                skills.dash.duration
            )));
        }
        if self.skills.loadout.len() > skyhop_core::MAX_SKILLS {
            return Err(SkyhopError::Config(format!(
                "loadout has {} skills, at most {} slots",
                self.skills.loadout.len(),
                skyhop_core::MAX_SKILLS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyhop_input::keys;
    use skyhop_sim::SkillType;

    #[test]
    fn empty_document_is_default() {
        let config = GameConfig::from_toml_str("").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
seed = 42

[world]
size = [20.0, 10.0]

[player]
move_speed = 4.0

[skills]
loadout = ["passive_regeneration"]

[skills.dash]
distance = 2.0

[particles]
particles_per_second = 5.0
"#,
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.world.size, Vec2::new(20.0, 10.0));
        assert_eq!(config.player.move_speed, 4.0);
        assert_eq!(config.player.jump_height, PlayerTuning::default().jump_height);
        assert_eq!(config.skills.loadout, vec![SkillType::PassiveRegeneration]);
        assert_eq!(config.skills.dash.distance, 2.0);
        assert_eq!(
            config.skills.dash.duration,
            skyhop_sim::DashConfig::default().duration
        );
        assert_eq!(config.particles.particles_per_second, 5.0);
    }

    #[test]
    fn controllers_with_overrides() {
        let config = GameConfig::from_toml_str(
            r#"
[[controllers]]
kind = "keyboard"
bindings = { jump = 87, skill1 = 69 }

[[controllers]]
kind = "gamepad"
index = 2
"#,
        )
        .unwrap();
        assert_eq!(config.controllers.len(), 2);
        let keyboard = config.controllers[0].build();
        assert_eq!(keyboard.binding(Action::Jump), keys::W);
        assert_eq!(keyboard.binding(Action::Skill1), 69);
        assert_eq!(keyboard.binding(Action::Left), keys::A);
        assert_eq!(
            config.controllers[1].kind,
            ControllerKind::Gamepad { index: 2 }
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        for doc in [
            "[world]\nsize = [0.0, 10.0]",
            "max_frame_time = 0.0",
            "[player]\njump_distance = 0.0",
            "[skills]\nloadout = [\"dash\", \"dash\", \"dash\", \"dash\", \"dash\"]",
            "[skills.regeneration]\nhealth_step = 1e-9",
            "[skills.regeneration]\nmana_step = 0.0",
            "[skills.mana_recharge]\nstep_duration = -0.4",
            "[skills.dash]\nduration = -0.2",
        ] {
            assert!(
                matches!(GameConfig::from_toml_str(doc), Err(SkyhopError::Config(_))),
                "{doc}"
            );
        }
        let six = "[[controllers]]\nkind = \"keyboard\"\n".repeat(6);
        assert!(matches!(
            GameConfig::from_toml_str(&six),
            Err(SkyhopError::Config(_))
        ));
    }

    #[test]
    fn syntax_errors_surface_as_toml_errors() {
        assert!(matches!(
            GameConfig::from_toml_str("seed = ="),
            Err(SkyhopError::TomlParseError(_))
        ));
    }
}
