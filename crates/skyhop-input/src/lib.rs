//! Skyhop Input - Controller layer
//!
//! Maps logical controllers to edge-triggered action states:
//! - `Action`: the fixed set of logical gameplay actions
//! - `Controller`: a device (keyboard or gamepad) plus its action bindings
//! - `InputState`: owns every controller, receives raw device events and
//!   refreshes pressed / rising / falling states once per frame

mod action;
mod controller;
mod input;

pub use action::{Action, ParseActionError};
pub use controller::{buttons, keys, Controller, ControllerKind, InputCode};
pub use input::{ActionState, InputState};
