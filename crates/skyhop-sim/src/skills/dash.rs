//! Dash: a short, rooted horizontal burst paid for with mana

use super::{SkillBehavior, SkillState};
use crate::entity::Entity;
use crate::player::StatusFlags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use skyhop_input::{Action, InputState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Horizontal distance covered by one dash
    pub distance: f32,
    /// Seconds the dash takes
    pub duration: f32,
    pub mana_cost: f32,
    pub cooldown: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            distance: 6.0,
            duration: 0.2,
            mana_cost: 10.0,
            cooldown: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dash {
    pub distance: f32,
    pub duration: f32,
    pub mana_cost: f32,
    /// -1 for left, +1 for right; fixed when triggered
    pub direction: f32,
    /// Entity position when the dash started
    pub start: Vec2,
}

impl Dash {
    pub fn new(config: &DashConfig) -> Self {
        Self {
            distance: config.distance,
            duration: config.duration,
            mana_cost: config.mana_cost,
            direction: 0.0,
            start: Vec2::ZERO,
        }
    }
}

impl SkillBehavior for Dash {
    fn trigger(&mut self, state: &mut SkillState, entity: &mut Entity, input: &InputState) -> bool {
        let (position, _, player) = entity.parts_mut();
        let Some(player) = player else {
            return false;
        };
        if !state.is_ready()
            || player.mana.current < self.mana_cost
            || player.status.contains(StatusFlags::ROOTED)
        {
            return false;
        }

        let left = input.is_pressed(player.controller, Action::Left);
        let right = input.is_pressed(player.controller, Action::Right);
        self.direction = match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => return false,
        };

        player.mana.spend(self.mana_cost);
        player.status.insert(StatusFlags::ROOTED);
        self.start = *position;
        state.activate();
        true
    }

    fn apply(&mut self, state: &mut SkillState, entity: &mut Entity, dt: f32) {
        state.elapsed = (state.elapsed + dt).min(self.duration);
        let progress = if self.duration > 0.0 {
            state.elapsed / self.duration
        } else {
            1.0
        };

        let (position, body, player) = entity.parts_mut();
        position.x = self.start.x + self.direction * self.distance * progress;
        if let Some(body) = body {
            body.velocity.y = 0.0;
        }

        if progress >= 1.0 {
            if let Some(player) = player {
                player.status.remove(StatusFlags::ROOTED);
            }
            state.finish();
        }
    }
}
