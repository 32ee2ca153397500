//! Skyhop Scene - Map loading
//!
//! Reads the line-oriented map format and populates a `World` with bitmaps,
//! shapes, rendering patterns and entities.

mod format;
mod loader;

pub use format::{parse_line, Directive};
pub use loader::{load_map, load_map_str, LoadOptions, MapSummary};
