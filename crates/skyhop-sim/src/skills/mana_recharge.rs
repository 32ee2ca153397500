//! Mana recharge: stand still on the ground and regain mana in steps

use super::{SkillBehavior, SkillState};
use crate::entity::Entity;
use crate::player::StatusFlags;
use serde::{Deserialize, Serialize};
use skyhop_input::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManaRechargeConfig {
    pub nb_steps: u32,
    /// Mana returned at the end of each step
    pub refund_per_step: f32,
    /// Seconds per step
    pub step_duration: f32,
    pub cooldown: f32,
}

impl Default for ManaRechargeConfig {
    fn default() -> Self {
        Self {
            nb_steps: 5,
            refund_per_step: 4.0,
            step_duration: 0.4,
            cooldown: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManaRecharge {
    pub nb_steps: u32,
    pub refund_per_step: f32,
    pub step_duration: f32,
    pub remaining_steps: u32,
    /// Time accumulated toward the next step
    pub step_timer: f32,
}

impl ManaRecharge {
    pub fn new(config: &ManaRechargeConfig) -> Self {
        Self {
            nb_steps: config.nb_steps,
            refund_per_step: config.refund_per_step,
            step_duration: config.step_duration,
            remaining_steps: 0,
            step_timer: 0.0,
        }
    }
}

impl SkillBehavior for ManaRecharge {
    fn trigger(&mut self, state: &mut SkillState, entity: &mut Entity, _input: &InputState) -> bool {
        let Some(player) = entity.player_mut() else {
            return false;
        };
        if !state.is_ready() || !player.status.contains(StatusFlags::LANDED) {
            return false;
        }

        player.status.insert(StatusFlags::ROOTED);
        self.remaining_steps = self.nb_steps;
        self.step_timer = 0.0;
        state.activate();
        true
    }

    fn apply(&mut self, state: &mut SkillState, entity: &mut Entity, dt: f32) {
        let Some(player) = entity.player_mut() else {
            state.finish();
            return;
        };
        state.elapsed += dt;
        self.step_timer += dt;

        while self.remaining_steps > 0 && self.step_timer >= self.step_duration {
            self.step_timer -= self.step_duration;
            self.remaining_steps -= 1;
            player.mana.refund(self.refund_per_step);
        }

        if self.remaining_steps == 0 {
            player.status.remove(StatusFlags::ROOTED);
            state.finish();
        }
    }
}
