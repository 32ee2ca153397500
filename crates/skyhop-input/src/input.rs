//! Input state management

use crate::action::Action;
use crate::controller::{Controller, ControllerKind, InputCode};
use skyhop_core::{ControllerId, Handle, Result, SkyhopError, MAX_CONTROLLERS};
use std::collections::HashSet;
use tracing::debug;

/// Per-frame state of one action on one controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    /// Held this frame
    pub pressed: bool,
    /// Went from released to pressed since the previous refresh
    pub rising: bool,
    /// Went from pressed to released since the previous refresh
    pub falling: bool,
}

/// Owns every controller and tracks raw device state between frames.
///
/// Device events may arrive at any time; `refresh` must be called exactly once
/// per frame, before simulation, to latch them into edge-triggered action states.
pub struct InputState {
    /// Keys currently held down
    keys_down: HashSet<InputCode>,
    /// Gamepad buttons currently held, keyed by (gamepad index, button)
    gamepad_buttons_down: HashSet<(u32, InputCode)>,

    controllers: Vec<Controller>,
    /// Actions forced down by a scripted host, per controller
    scripted: Vec<[bool; Action::COUNT]>,
    /// Latched states from the last refresh, per controller
    states: Vec<[ActionState; Action::COUNT]>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            gamepad_buttons_down: HashSet::new(),
            controllers: Vec::with_capacity(MAX_CONTROLLERS),
            scripted: Vec::with_capacity(MAX_CONTROLLERS),
            states: Vec::with_capacity(MAX_CONTROLLERS),
        }
    }

    /// Register a controller, returning its logical id
    pub fn add_controller(&mut self, controller: Controller) -> Result<ControllerId> {
        if self.controllers.len() >= MAX_CONTROLLERS {
            return Err(SkyhopError::CapacityExceeded {
                registry: ControllerId::KIND,
                capacity: MAX_CONTROLLERS,
            });
        }
        let id = ControllerId::from_index(self.controllers.len());
        debug!(controller = %id, kind = ?controller.kind, "controller registered");
        self.controllers.push(controller);
        self.scripted.push([false; Action::COUNT]);
        self.states.push([ActionState::default(); Action::COUNT]);
        Ok(id)
    }

    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(id.index())
    }

    pub fn controller_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.get_mut(id.index())
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    /// Process a key press event
    pub fn process_key_down(&mut self, key: InputCode) {
        self.keys_down.insert(key);
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: InputCode) {
        self.keys_down.remove(&key);
    }

    /// Process a gamepad button press
    pub fn process_gamepad_button_down(&mut self, gamepad: u32, button: InputCode) {
        self.gamepad_buttons_down.insert((gamepad, button));
    }

    /// Process a gamepad button release
    pub fn process_gamepad_button_up(&mut self, gamepad: u32, button: InputCode) {
        self.gamepad_buttons_down.remove(&(gamepad, button));
    }

    /// Force an action up or down regardless of device state (scripted hosts, replays).
    /// Stays in effect until changed. Unknown controllers are ignored.
    pub fn set_action(&mut self, id: ControllerId, action: Action, pressed: bool) {
        if let Some(actions) = self.scripted.get_mut(id.index()) {
            actions[action.index()] = pressed;
        }
    }

    /// Release every scripted action on every controller
    pub fn clear_scripted(&mut self) {
        for actions in &mut self.scripted {
            *actions = [false; Action::COUNT];
        }
    }

    /// Latch device state into action states. Call once per frame before simulation.
    pub fn refresh(&mut self) {
        for (i, controller) in self.controllers.iter().enumerate() {
            for action in Action::ALL {
                let code = controller.binding(action);
                let device_down = match controller.kind {
                    ControllerKind::Keyboard => self.keys_down.contains(&code),
                    ControllerKind::Gamepad { index } => {
                        self.gamepad_buttons_down.contains(&(index, code))
                    }
                };
                let pressed = device_down || self.scripted[i][action.index()];
                let previous = self.states[i][action.index()];
                self.states[i][action.index()] = ActionState {
                    pressed,
                    rising: pressed && !previous.pressed,
                    falling: !pressed && previous.pressed,
                };
            }
        }
    }

    // --- Query methods ---

    /// Latched state of an action. Unknown controllers read as released.
    pub fn action(&self, id: ControllerId, action: Action) -> ActionState {
        self.states
            .get(id.index())
            .map(|states| states[action.index()])
            .unwrap_or_default()
    }

    /// Is the action held this frame?
    pub fn is_pressed(&self, id: ControllerId, action: Action) -> bool {
        self.action(id, action).pressed
    }

    /// Was the action pressed since the previous frame?
    pub fn is_rising(&self, id: ControllerId, action: Action) -> bool {
        self.action(id, action).rising
    }

    /// Was the action released since the previous frame?
    pub fn is_falling(&self, id: ControllerId, action: Action) -> bool {
        self.action(id, action).falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{buttons, keys};

    fn keyboard_input() -> (InputState, ControllerId) {
        let mut input = InputState::new();
        let id = input.add_controller(Controller::keyboard()).unwrap();
        (input, id)
    }

    #[test]
    fn test_edge_transitions() {
        let (mut input, kb) = keyboard_input();

        input.process_key_down(keys::SPACE);
        input.refresh();
        assert_eq!(
            input.action(kb, Action::Jump),
            ActionState {
                pressed: true,
                rising: true,
                falling: false
            }
        );

        // Held across frames: no new edge
        input.refresh();
        assert!(input.is_pressed(kb, Action::Jump));
        assert!(!input.is_rising(kb, Action::Jump));

        input.process_key_up(keys::SPACE);
        input.refresh();
        assert!(!input.is_pressed(kb, Action::Jump));
        assert!(input.is_falling(kb, Action::Jump));

        input.refresh();
        assert_eq!(input.action(kb, Action::Jump), ActionState::default());
    }

    #[test]
    fn test_events_are_invisible_until_refresh() {
        let (mut input, kb) = keyboard_input();
        input.process_key_down(keys::A);
        assert!(!input.is_pressed(kb, Action::Left));
        input.refresh();
        assert!(input.is_pressed(kb, Action::Left));
    }

    #[test]
    fn test_gamepads_are_isolated_by_index() {
        let mut input = InputState::new();
        let pad0 = input.add_controller(Controller::gamepad(0)).unwrap();
        let pad1 = input.add_controller(Controller::gamepad(1)).unwrap();

        input.process_gamepad_button_down(1, buttons::SOUTH);
        input.refresh();
        assert!(!input.is_pressed(pad0, Action::Jump));
        assert!(input.is_rising(pad1, Action::Jump));
    }

    #[test]
    fn test_scripted_actions() {
        let (mut input, kb) = keyboard_input();
        input.set_action(kb, Action::Right, true);
        input.refresh();
        assert!(input.is_rising(kb, Action::Right));

        input.clear_scripted();
        input.refresh();
        assert!(input.is_falling(kb, Action::Right));
    }

    #[test]
    fn test_controller_capacity() {
        let mut input = InputState::new();
        for _ in 0..MAX_CONTROLLERS {
            input.add_controller(Controller::keyboard()).unwrap();
        }
        let err = input.add_controller(Controller::keyboard()).unwrap_err();
        assert!(matches!(err, SkyhopError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_unknown_controller_reads_released() {
        let input = InputState::new();
        assert_eq!(
            input.action(ControllerId::from_raw(3), Action::Left),
            ActionState::default()
        );
    }
}
