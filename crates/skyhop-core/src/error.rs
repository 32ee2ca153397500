//! Error types for Skyhop

use thiserror::Error;

/// The main error type for Skyhop operations
#[derive(Debug, Error)]
pub enum SkyhopError {
    #[error("{registry} registry is full (capacity {capacity})")]
    CapacityExceeded {
        registry: &'static str,
        capacity: usize,
    },

    #[error("Invalid {kind} reference: {index}")]
    InvalidReference { kind: &'static str, index: usize },

    #[error("Malformed map at line {line}: {message}")]
    MalformedMap { line: usize, message: String },

    #[error("Skill slot {slot} is out of range (max {max})")]
    InvalidSkillSlot { slot: usize, max: usize },

    #[error("Skill slot {0} is already occupied")]
    SlotOccupied(usize),

    #[error("Entity {0} is not a player")]
    NotAPlayer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),
}

impl SkyhopError {
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        SkyhopError::MalformedMap {
            line,
            message: message.into(),
        }
    }
}

/// Result type alias for Skyhop operations
pub type Result<T> = std::result::Result<T, SkyhopError>;

impl From<toml::de::Error> for SkyhopError {
    fn from(err: toml::de::Error) -> Self {
        SkyhopError::TomlParseError(err.to_string())
    }
}
