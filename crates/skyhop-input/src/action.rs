//! Logical gameplay actions

use serde::{Deserialize, Serialize};
use skyhop_core::MAX_SKILLS;
use std::fmt;
use std::str::FromStr;

/// A logical action a controller can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Skill1,
    Skill2,
    Skill3,
    Skill4,
}

impl Action {
    pub const COUNT: usize = 9;

    pub const ALL: [Action; Action::COUNT] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Jump,
        Action::Skill1,
        Action::Skill2,
        Action::Skill3,
        Action::Skill4,
    ];

    /// The action that fires the skill in `slot` (0-based)
    pub fn skill(slot: usize) -> Option<Action> {
        match slot {
            0 => Some(Action::Skill1),
            1 => Some(Action::Skill2),
            2 => Some(Action::Skill3),
            3 => Some(Action::Skill4),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::Jump => "jump",
            Action::Skill1 => "skill1",
            Action::Skill2 => "skill2",
            Action::Skill3 => "skill3",
            Action::Skill4 => "skill4",
        }
    }
}

const _: () = assert!(MAX_SKILLS <= 4, "every skill slot needs a bound action");

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionError(pub String);

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action '{}'", self.0)
    }
}

impl std::error::Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Action::ALL
            .iter()
            .copied()
            .find(|a| a.name() == lower)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}
