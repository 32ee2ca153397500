//! Skills - timed abilities with trigger, apply and cooldown phases
//!
//! Each player carries up to `MAX_SKILLS` slots. A skill goes
//! idle → triggered → active → cooling down → idle:
//! - `trigger` checks cost, cooldown and status, then activates the skill
//! - `apply` runs every frame: cooldown always decays, and an active skill
//!   advances its own effect until its duration or step budget runs out
//!
//! [`update_triggers`] and [`update_applies`] drive every player's slots once per frame.

mod dash;
mod mana_recharge;
mod regeneration;

pub use dash::{Dash, DashConfig};
pub use mana_recharge::{ManaRecharge, ManaRechargeConfig};
pub use regeneration::{Regeneration, RegenerationConfig};

use crate::entity::Entity;
use crate::player::StatusFlags;
use crate::world::World;
use serde::{Deserialize, Serialize};
use skyhop_core::{EntityId, Result, MAX_SKILLS};
use skyhop_input::{Action, InputState};
use std::fmt;
use tracing::debug;

/// Timers and activity shared by every skill kind
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkillState {
    pub active: bool,
    /// Time spent in the current activation
    pub elapsed: f32,
    /// Cooldown applied when an activation completes
    pub cooldown: f32,
    pub remaining_cooldown: f32,
}

impl SkillState {
    pub fn with_cooldown(cooldown: f32) -> Self {
        Self {
            cooldown,
            ..Self::default()
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.active && self.remaining_cooldown <= 0.0
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
        self.elapsed = 0.0;
    }

    /// End the activation and start the cooldown
    pub(crate) fn finish(&mut self) {
        self.active = false;
        self.remaining_cooldown = self.cooldown;
    }
}

/// Behaviour one skill kind plugs into the trigger/apply cycle
pub trait SkillBehavior {
    /// Re-evaluated every frame instead of waiting for a button press
    const PASSIVE: bool = false;

    /// Try to activate; may spend resources and change status flags
    fn trigger(&mut self, state: &mut SkillState, entity: &mut Entity, input: &InputState) -> bool;

    /// Advance an active skill by `dt`. Cooldown decay is handled by the caller.
    fn apply(&mut self, state: &mut SkillState, entity: &mut Entity, dt: f32);
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum SkillKind {
    Dash(Dash),
    ManaRecharge(ManaRecharge),
    PassiveRegeneration(Regeneration),
}

/// Payload-free name of a skill kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Dash,
    ManaRecharge,
    PassiveRegeneration,
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkillType::Dash => "dash",
            SkillType::ManaRecharge => "mana_recharge",
            SkillType::PassiveRegeneration => "passive_regeneration",
        })
    }
}

/// One skill slot's content
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub state: SkillState,
    pub kind: SkillKind,
}

impl Skill {
    pub fn dash(config: &DashConfig) -> Self {
        Self {
            state: SkillState::with_cooldown(config.cooldown),
            kind: SkillKind::Dash(Dash::new(config)),
        }
    }

    pub fn mana_recharge(config: &ManaRechargeConfig) -> Self {
        Self {
            state: SkillState::with_cooldown(config.cooldown),
            kind: SkillKind::ManaRecharge(ManaRecharge::new(config)),
        }
    }

    pub fn regeneration(config: &RegenerationConfig) -> Self {
        Self {
            state: SkillState::default(),
            kind: SkillKind::PassiveRegeneration(Regeneration::new(config)),
        }
    }

    pub fn skill_type(&self) -> SkillType {
        match self.kind {
            SkillKind::Dash(_) => SkillType::Dash,
            SkillKind::ManaRecharge(_) => SkillType::ManaRecharge,
            SkillKind::PassiveRegeneration(_) => SkillType::PassiveRegeneration,
        }
    }

    pub fn is_passive(&self) -> bool {
        match self.kind {
            SkillKind::Dash(_) => Dash::PASSIVE,
            SkillKind::ManaRecharge(_) => ManaRecharge::PASSIVE,
            SkillKind::PassiveRegeneration(_) => Regeneration::PASSIVE,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    /// Try to activate the skill for `entity`
    pub fn trigger(&mut self, entity: &mut Entity, input: &InputState) -> bool {
        let state = &mut self.state;
        match &mut self.kind {
            SkillKind::Dash(s) => s.trigger(state, entity, input),
            SkillKind::ManaRecharge(s) => s.trigger(state, entity, input),
            SkillKind::PassiveRegeneration(s) => s.trigger(state, entity, input),
        }
    }

    /// Decay the cooldown, then advance the effect if active.
    /// Returns whether the skill is still active.
    pub fn apply(&mut self, entity: &mut Entity, dt: f32) -> bool {
        self.state.remaining_cooldown = (self.state.remaining_cooldown - dt).max(0.0);
        if !self.state.active {
            return false;
        }
        let state = &mut self.state;
        match &mut self.kind {
            SkillKind::Dash(s) => s.apply(state, entity, dt),
            SkillKind::ManaRecharge(s) => s.apply(state, entity, dt),
            SkillKind::PassiveRegeneration(s) => s.apply(state, entity, dt),
        }
        self.state.active
    }
}

/// Tuning for every skill kind plus the slot layout players receive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub dash: DashConfig,
    pub mana_recharge: ManaRechargeConfig,
    pub regeneration: RegenerationConfig,
    /// Skill per slot, starting at slot 0 (bound to `skill1`)
    pub loadout: Vec<SkillType>,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            dash: DashConfig::default(),
            mana_recharge: ManaRechargeConfig::default(),
            regeneration: RegenerationConfig::default(),
            loadout: vec![
                SkillType::Dash,
                SkillType::ManaRecharge,
                SkillType::PassiveRegeneration,
            ],
        }
    }
}

impl SkillConfig {
    pub fn build(&self, skill_type: SkillType) -> Skill {
        match skill_type {
            SkillType::Dash => Skill::dash(&self.dash),
            SkillType::ManaRecharge => Skill::mana_recharge(&self.mana_recharge),
            SkillType::PassiveRegeneration => Skill::regeneration(&self.regeneration),
        }
    }

    /// Equip the configured loadout on a player entity
    pub fn equip(&self, world: &mut World, entity: EntityId) -> Result<()> {
        for (slot, &skill_type) in self.loadout.iter().enumerate() {
            world.equip_skill(entity, slot, self.build(skill_type))?;
        }
        Ok(())
    }
}

/// What happened to a skill this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillEventKind {
    Triggered,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillEvent {
    pub entity: EntityId,
    pub slot: usize,
    pub skill: SkillType,
    pub kind: SkillEventKind,
}

/// Evaluate triggers for every player that is neither muted nor stunned.
///
/// Button skills fire on the rising edge of their slot's action; passive
/// skills are re-evaluated every frame.
pub fn update_triggers(world: &mut World, input: &InputState, events: &mut Vec<SkillEvent>) {
    for entity in world.entities_mut() {
        let Some(player) = entity.player_mut() else {
            continue;
        };
        if player
            .status
            .intersects(StatusFlags::MUTED | StatusFlags::STUNNED)
        {
            continue;
        }
        let controller = player.controller;
        let mut slots = std::mem::take(&mut player.skills);

        for (slot, entry) in slots.iter_mut().enumerate() {
            let Some(skill) = entry else {
                continue;
            };
            let pressed = Action::skill(slot).is_some_and(|a| input.is_rising(controller, a));
            if !(skill.is_passive() || pressed) {
                continue;
            }
            if skill.trigger(entity, input) {
                debug!(entity = %entity.id(), slot, skill = %skill.skill_type(), "skill triggered");
                events.push(SkillEvent {
                    entity: entity.id(),
                    slot,
                    skill: skill.skill_type(),
                    kind: SkillEventKind::Triggered,
                });
            }
        }

        restore_slots(entity, slots);
    }
}

/// Run `apply` for every equipped skill of every player, regardless of status
pub fn update_applies(world: &mut World, dt: f32, events: &mut Vec<SkillEvent>) {
    for entity in world.entities_mut() {
        let Some(player) = entity.player_mut() else {
            continue;
        };
        let mut slots = std::mem::take(&mut player.skills);

        for (slot, entry) in slots.iter_mut().enumerate() {
            let Some(skill) = entry else {
                continue;
            };
            let was_active = skill.is_active();
            if !skill.apply(entity, dt) && was_active {
                debug!(entity = %entity.id(), slot, skill = %skill.skill_type(), "skill finished");
                events.push(SkillEvent {
                    entity: entity.id(),
                    slot,
                    skill: skill.skill_type(),
                    kind: SkillEventKind::Finished,
                });
            }
        }

        restore_slots(entity, slots);
    }
}

/// Triggers for every player, then applies for every player
pub fn update(world: &mut World, input: &InputState, dt: f32) -> Vec<SkillEvent> {
    let mut events = Vec::new();
    update_triggers(world, input, &mut events);
    update_applies(world, dt, &mut events);
    events
}

fn restore_slots(entity: &mut Entity, slots: [Option<Skill>; MAX_SKILLS]) {
    if let Some(player) = entity.player_mut() {
        player.skills = slots;
    }
}
