//! Passive regeneration of health and mana on independent timers

use super::{SkillBehavior, SkillState};
use crate::entity::Entity;
use crate::player::StatusFlags;
use serde::{Deserialize, Serialize};
use skyhop_input::InputState;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenerationConfig {
    /// Seconds between health refunds
    pub health_step: f32,
    pub health_refund: f32,
    /// Seconds between mana refunds
    pub mana_step: f32,
    pub mana_refund: f32,
}

impl Default for RegenerationConfig {
    fn default() -> Self {
        Self {
            health_step: 1.0,
            health_refund: 1.0,
            mana_step: 0.5,
            mana_refund: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Regeneration {
    pub health_step: f32,
    pub health_refund: f32,
    pub mana_step: f32,
    pub mana_refund: f32,
    pub health_timer: f32,
    pub mana_timer: f32,
}

impl Regeneration {
    pub fn new(config: &RegenerationConfig) -> Self {
        Self {
            health_step: config.health_step,
            health_refund: config.health_refund,
            mana_step: config.mana_step,
            mana_refund: config.mana_refund,
            health_timer: 0.0,
            mana_timer: 0.0,
        }
    }
}

/// Most refunds a single frame can pay out per timer
const MAX_STEPS_PER_TICK: u32 = 1024;

/// Advance `timer` by `dt` and return how many whole steps elapsed, capped at
/// `MAX_STEPS_PER_TICK`
fn tick(timer: &mut f32, step: f32, dt: f32) -> u32 {
    if step <= 0.0 || !step.is_finite() {
        return 0;
    }
    *timer += dt;
    if *timer < step {
        return 0;
    }
    let whole = (*timer / step).floor();
    *timer = (*timer - whole * step).clamp(0.0, step);
    whole.min(MAX_STEPS_PER_TICK as f32) as u32
}

impl SkillBehavior for Regeneration {
    const PASSIVE: bool = true;

    fn trigger(&mut self, state: &mut SkillState, entity: &mut Entity, _input: &InputState) -> bool {
        if state.active || entity.player().is_none() {
            return false;
        }
        self.health_timer = 0.0;
        self.mana_timer = 0.0;
        state.activate();
        true
    }

    fn apply(&mut self, state: &mut SkillState, entity: &mut Entity, dt: f32) {
        let Some(player) = entity.player_mut() else {
            return;
        };
        if player.status.contains(StatusFlags::STUNNED) {
            return;
        }
        state.elapsed += dt;

        let health_steps = tick(&mut self.health_timer, self.health_step, dt);
        let mana_steps = tick(&mut self.mana_timer, self.mana_step, dt);
        player.health.refund(self.health_refund * health_steps as f32);
        player.mana.refund(self.mana_refund * mana_steps as f32);
    }
}
