//! Controller devices and their action bindings

use crate::action::Action;
use serde::{Deserialize, Serialize};

/// Device-specific input code (key code or gamepad button code)
pub type InputCode = u32;

/// Keyboard codes the default keyboard layout binds to
pub mod keys {
    use super::InputCode;

    pub const A: InputCode = 0x41;
    pub const D: InputCode = 0x44;
    pub const S: InputCode = 0x53;
    pub const W: InputCode = 0x57;
    pub const SPACE: InputCode = 0x20;
    pub const DIGIT_1: InputCode = 0x31;
    pub const DIGIT_2: InputCode = 0x32;
    pub const DIGIT_3: InputCode = 0x33;
    pub const DIGIT_4: InputCode = 0x34;
}

/// Gamepad button codes the default gamepad layout binds to
pub mod buttons {
    use super::InputCode;

    pub const SOUTH: InputCode = 0;
    pub const EAST: InputCode = 1;
    pub const WEST: InputCode = 2;
    pub const NORTH: InputCode = 3;
    pub const LEFT_SHOULDER: InputCode = 4;
    pub const RIGHT_SHOULDER: InputCode = 5;
    pub const DPAD_UP: InputCode = 11;
    pub const DPAD_DOWN: InputCode = 12;
    pub const DPAD_LEFT: InputCode = 13;
    pub const DPAD_RIGHT: InputCode = 14;
}

/// Which physical device a controller reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControllerKind {
    Keyboard,
    Gamepad { index: u32 },
}

/// A device plus one input code per logical action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    pub kind: ControllerKind,
    bindings: [InputCode; Action::COUNT],
}

impl Controller {
    /// Keyboard controller with the default WASD + space + digit layout
    pub fn keyboard() -> Self {
        Self {
            kind: ControllerKind::Keyboard,
            bindings: [
                keys::A,
                keys::D,
                keys::W,
                keys::S,
                keys::SPACE,
                keys::DIGIT_1,
                keys::DIGIT_2,
                keys::DIGIT_3,
                keys::DIGIT_4,
            ],
        }
    }

    /// Gamepad controller with the default d-pad + face button layout
    pub fn gamepad(index: u32) -> Self {
        Self {
            kind: ControllerKind::Gamepad { index },
            bindings: [
                buttons::DPAD_LEFT,
                buttons::DPAD_RIGHT,
                buttons::DPAD_UP,
                buttons::DPAD_DOWN,
                buttons::SOUTH,
                buttons::WEST,
                buttons::NORTH,
                buttons::EAST,
                buttons::RIGHT_SHOULDER,
            ],
        }
    }

    /// Default layout for a device kind
    pub fn for_kind(kind: ControllerKind) -> Self {
        match kind {
            ControllerKind::Keyboard => Self::keyboard(),
            ControllerKind::Gamepad { index } => Self::gamepad(index),
        }
    }

    /// Rebind one action
    pub fn bind(&mut self, action: Action, code: InputCode) {
        self.bindings[action.index()] = code;
    }

    pub fn with_binding(mut self, action: Action, code: InputCode) -> Self {
        self.bind(action, code);
        self
    }

    pub fn binding(&self, action: Action) -> InputCode {
        self.bindings[action.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_defaults() {
        let kb = Controller::keyboard();
        assert_eq!(kb.kind, ControllerKind::Keyboard);
        assert_eq!(kb.binding(Action::Left), keys::A);
        assert_eq!(kb.binding(Action::Jump), keys::SPACE);
        assert_eq!(kb.binding(Action::Skill4), keys::DIGIT_4);
    }

    #[test]
    fn rebinding_replaces_one_action() {
        let pad = Controller::gamepad(1).with_binding(Action::Jump, buttons::EAST);
        assert_eq!(pad.kind, ControllerKind::Gamepad { index: 1 });
        assert_eq!(pad.binding(Action::Jump), buttons::EAST);
        assert_eq!(pad.binding(Action::Left), buttons::DPAD_LEFT);
    }
}
