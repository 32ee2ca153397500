//! Skyhop Runtime - Frame driver and host-facing surface
//!
//! Provides what a host needs to run the gameplay core:
//! - `GameState`: owns the world, input, particles and clock, and runs one
//!   frame per `update(dt)` in a fixed order
//! - `GameClock`: frame counter and total time with a per-frame clamp
//! - `GameConfig`: TOML configuration for every subsystem
//! - `Renderer`: the port a rendering backend implements

mod clock;
mod config;
mod render;
mod snapshot;
mod state;

pub use clock::{GameClock, DEFAULT_MAX_FRAME_TIME};
pub use config::{ControllerConfig, GameConfig, WorldConfig, MIN_STEP_DURATION};
pub use render::{DrawCall, RecordingRenderer, Renderer};
pub use snapshot::{EntitySnapshot, PlayerSnapshot};
pub use state::{FrameReport, GameState};
