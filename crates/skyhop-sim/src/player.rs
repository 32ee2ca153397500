//! Player-only entity data: resources, movement tuning, jump bookkeeping, status

use crate::skills::Skill;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use skyhop_core::{ControllerId, Result, SkyhopError, MAX_SKILLS};

/// Jumps allowed before touching the ground again
pub const MAX_JUMPS: u32 = 2;
/// Holding jump longer than this no longer cuts the jump on release
pub const MAX_JUMP_TIME: f32 = 0.5;
/// Duration of the heavy-gravity phase after an early release
pub const MAX_STOP_TIME: f32 = 0.1;
/// Gravity multiplier during the heavy-gravity phase
pub const QUICK_FALL_FACTOR: f32 = 5.0;

bitflags! {
    /// Conditions that gate movement and skill triggers
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        /// Input cannot move or jump the entity
        const ROOTED  = 1 << 0;
        /// Skills cannot be triggered
        const MUTED   = 1 << 1;
        /// Skills cannot be triggered and regeneration pauses
        const STUNNED = 1 << 2;
        /// Standing on the world floor or on top of another body
        const LANDED  = 1 << 3;
    }
}

/// A bounded resource such as health or mana
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauge {
    pub current: f32,
    pub max: f32,
}

impl Gauge {
    /// A full gauge
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Spend `cost` if enough is left; returns whether it was spent
    pub fn spend(&mut self, cost: f32) -> bool {
        if self.current < cost {
            return false;
        }
        self.current -= cost;
        true
    }

    /// Add `amount`, clamped to `max`
    pub fn refund(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

/// Movement and resource tuning a player is created with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal speed in units per second
    pub move_speed: f32,
    /// Apex height of a full jump
    pub jump_height: f32,
    /// Horizontal distance covered at `move_speed` while rising to the apex
    pub jump_distance: f32,
    pub max_health: f32,
    pub max_mana: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            jump_height: 3.0,
            jump_distance: 2.5,
            max_health: 100.0,
            max_mana: 50.0,
        }
    }
}

impl PlayerTuning {
    /// Upward launch velocity that reaches `jump_height` after `jump_distance`
    pub fn initial_jump_velocity(&self) -> f32 {
        2.0 * self.jump_height * self.move_speed / self.jump_distance
    }

    /// Constant vertical acceleration (negative, y points up)
    pub fn gravity(&self) -> f32 {
        -2.0 * self.jump_height * self.move_speed * self.move_speed
            / (self.jump_distance * self.jump_distance)
    }
}

/// Jump state machine bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpState {
    pub already_jumping: bool,
    /// Armed while the jump action is released; a press consumes it
    pub new_jump: bool,
    /// Time the jump action has been held since the jump started
    pub jump_time: f32,
    pub quick_fall: bool,
    pub quick_fall_time: f32,
    pub nb_jumps: u32,
}

impl JumpState {
    /// Back on the ground (or a wall): every counter restarts
    pub fn reset(&mut self) {
        self.already_jumping = false;
        self.jump_time = 0.0;
        self.quick_fall = false;
        self.quick_fall_time = 0.0;
        self.nb_jumps = 0;
    }
}

/// Skill slots a player carries
pub type SkillSlots = [Option<Skill>; MAX_SKILLS];

/// Data only player entities carry
#[derive(Debug, Clone)]
pub struct Player {
    pub health: Gauge,
    pub mana: Gauge,
    pub tuning: PlayerTuning,
    /// Derived once from `tuning` at creation
    pub initial_jump_velocity: f32,
    /// Derived once from `tuning` at creation
    pub gravity: f32,
    pub jump: JumpState,
    pub controller: ControllerId,
    pub status: StatusFlags,
    pub skills: SkillSlots,
}

impl Player {
    pub fn new(tuning: PlayerTuning, controller: ControllerId) -> Self {
        Self {
            health: Gauge::full(tuning.max_health),
            mana: Gauge::full(tuning.max_mana),
            initial_jump_velocity: tuning.initial_jump_velocity(),
            gravity: tuning.gravity(),
            tuning,
            jump: JumpState::default(),
            controller,
            status: StatusFlags::empty(),
            skills: Default::default(),
        }
    }

    /// Put a skill into an empty slot
    pub fn equip(&mut self, slot: usize, skill: Skill) -> Result<()> {
        let entry = self
            .skills
            .get_mut(slot)
            .ok_or(SkyhopError::InvalidSkillSlot {
                slot,
                max: MAX_SKILLS,
            })?;
        if entry.is_some() {
            return Err(SkyhopError::SlotOccupied(slot));
        }
        *entry = Some(skill);
        Ok(())
    }

    pub fn skill(&self, slot: usize) -> Option<&Skill> {
        self.skills.get(slot).and_then(Option::as_ref)
    }

    pub fn skill_mut(&mut self, slot: usize) -> Option<&mut Skill> {
        self.skills.get_mut(slot).and_then(Option::as_mut)
    }

    /// Ground contact: flag it and restart the jump state machine
    pub fn land(&mut self) {
        self.status.insert(StatusFlags::LANDED);
        self.jump.reset();
    }
}
