//! Serializable view of the world for headless hosts

use serde::Serialize;
use skyhop_sim::{Entity, Player, SkillType};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub controller: u32,
    pub health: f32,
    pub mana: f32,
    pub status: Vec<&'static str>,
    pub jumps: u32,
    /// Skills active this frame
    pub active_skills: Vec<SkillType>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub kind: String,
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub flags: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSnapshot>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        Self {
            controller: player.controller.raw(),
            health: player.health.current,
            mana: player.mana.current,
            status: player
                .status
                .iter_names()
                .map(|(name, _)| name)
                .collect(),
            jumps: player.jump.nb_jumps,
            active_skills: player
                .skills
                .iter()
                .flatten()
                .filter(|skill| skill.is_active())
                .map(|skill| skill.skill_type())
                .collect(),
        }
    }
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id().raw(),
            kind: entity.kind().to_string(),
            position: entity.position.to_array(),
            velocity: entity.velocity().to_array(),
            flags: entity.flags().iter_names().map(|(name, _)| name).collect(),
            player: entity.player().map(PlayerSnapshot::from),
        }
    }
}
