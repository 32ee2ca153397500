//! Dense registry handles
//!
//! Every registry in Skyhop is append-only, so a handle is simply the slot index
//! the object was stored at. Handles are never reused within a session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typed index into one fixed-capacity registry.
pub trait Handle: Copy + Eq + fmt::Debug {
    /// Registry name used in error messages
    const KIND: &'static str;

    fn from_index(index: usize) -> Self;

    fn index(self) -> usize;
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a handle from a raw value (for loading and testing)
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw u32 value
            pub const fn raw(&self) -> u32 {
                self.0
            }
        }

        impl Handle for $name {
            const KIND: &'static str = $kind;

            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_handle!(
    /// Identity of a game object: its slot in the entity registry
    EntityId,
    "entity"
);
define_handle!(ShapeId, "shape");
define_handle!(PatternId, "pattern");
define_handle!(BitmapId, "bitmap");
define_handle!(
    /// Logical controller slot owned by the input layer
    ControllerId,
    "controller"
);
define_handle!(ParticleSystemId, "particle system");
